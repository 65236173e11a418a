//! # Driving Ports (API - Inbound)
//!
//! The interface exposed to the contract engine: after a contract call
//! returns submessages, the engine hands them here for dispatch.

use crate::context::ExecutionContext;
use crate::domain::entities::{CosmosMsgVersion, SubMsg, VerificationInfo};
use crate::domain::value_objects::{Address, Bytes};
use crate::errors::DispatchError;

// =============================================================================
// DISPATCH REQUEST
// =============================================================================

/// One batch of submessages emitted by a contract call.
#[derive(Clone, Copy, Debug)]
pub struct DispatchRequest<'r> {
    /// Contract that emitted the batch and receives the replies.
    pub contract: &'r Address,
    /// IBC port of the contract, empty if none.
    pub ibc_port: &'r str,
    /// Submessages in emission order.
    pub messages: &'r [SubMsg],
    /// Raw bytes of the original transaction.
    pub og_tx: &'r [u8],
    /// Signing metadata of the original transaction.
    pub og_sig_info: &'r VerificationInfo,
    /// Message format version of the original transaction.
    pub msg_version: CosmosMsgVersion,
}

// =============================================================================
// SUBMESSAGE DISPATCH API (Primary Driving Port)
// =============================================================================

/// Primary API for submessage dispatch.
///
/// ## Usage
///
/// ```ignore
/// let data = dispatcher.dispatch_submessages(&mut ctx, request)?;
/// ```
pub trait SubmessageDispatchApi {
    /// Dispatches a batch in order, delivering replies as the policies ask.
    ///
    /// # Returns
    ///
    /// * `Bytes` - payload of the last reply that returned a non-empty one,
    ///   empty if none did
    ///
    /// # Errors
    ///
    /// The original error of a submessage whose policy aborts the batch, a
    /// reply error, an invalid policy value or an unrecovered fault.
    fn dispatch_submessages(
        &self,
        ctx: &mut ExecutionContext<'_>,
        request: DispatchRequest<'_>,
    ) -> Result<Bytes, DispatchError>;
}
