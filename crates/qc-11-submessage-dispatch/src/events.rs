//! # Event Schema
//!
//! IPC payloads for submessage dispatch, and decoding of the submessage list
//! a contract returns.
//!
//! - **Correlation IDs:** request/response pairs are matched by the caller's
//!   `correlation_id`, never by a field in the payload.

use crate::domain::entities::{CosmosMsgVersion, SubMsg, VerificationInfo};
use crate::domain::value_objects::{Address, Bytes};
use crate::errors::{DispatchError, SystemError};
use serde::{Deserialize, Serialize};

// =============================================================================
// INBOUND EVENTS
// =============================================================================

/// Request to dispatch the submessages of one contract call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DispatchSubmessagesRequestPayload {
    /// Contract that emitted the submessages.
    pub contract: Address,
    /// IBC port of the contract, empty if none.
    #[serde(default)]
    pub ibc_port: String,
    /// Submessages in emission order.
    pub messages: Vec<SubMsg>,
    /// Raw bytes of the original transaction.
    pub og_tx: Bytes,
    /// Signing metadata of the original transaction.
    #[serde(default)]
    pub og_sig_info: VerificationInfo,
    /// Message format version.
    #[serde(default)]
    pub msg_version: CosmosMsgVersion,
}

// =============================================================================
// OUTBOUND EVENTS
// =============================================================================

/// Why a batch did not complete.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchFailurePayload {
    /// Codespace of the error.
    pub codespace: String,
    /// Code within the codespace.
    pub code: u32,
    /// Unredacted error text.
    pub message: String,
    /// True if the batch stopped on a fault.
    pub fatal: bool,
}

impl From<&DispatchError> for DispatchFailurePayload {
    fn from(err: &DispatchError) -> Self {
        let (codespace, code) = err.abci_info();
        Self {
            codespace: codespace.to_string(),
            code,
            message: err.to_string(),
            fatal: err.is_fatal(),
        }
    }
}

/// Response to a dispatch request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DispatchSubmessagesResponsePayload {
    /// Whether every submessage completed without aborting the batch.
    pub success: bool,
    /// Payload of the last reply that returned one, empty otherwise.
    pub data: Bytes,
    /// Gas charged to the caller's context by this batch.
    pub gas_used: u64,
    /// Failure, if the batch aborted.
    pub error: Option<DispatchFailurePayload>,
}

// =============================================================================
// BATCH DECODING
// =============================================================================

/// Decodes the JSON submessage list returned by a contract.
///
/// # Errors
///
/// `SystemError::InvalidRequest` carrying `raw` if the list is malformed.
/// Unknown `reply_on` values are NOT rejected here; the dispatcher rejects
/// them when it reaches the offending submessage.
pub fn decode_submessages(raw: &[u8]) -> Result<Vec<SubMsg>, SystemError> {
    serde_json::from_slice(raw).map_err(|e| SystemError::InvalidRequest {
        error: e.to_string(),
        request: raw.to_vec(),
    })
}

// =============================================================================
// TESTS
// =============================================================================
