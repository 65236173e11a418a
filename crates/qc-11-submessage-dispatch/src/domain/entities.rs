//! # Core Domain Entities
//!
//! Main business entities for submessage dispatch: the submessages a contract
//! emits, the outbound messages they wrap, the events they produce and the
//! replies sent back to the contract.

use crate::domain::value_objects::Bytes;
use crate::errors::SystemError;
use serde::{Deserialize, Serialize};

// =============================================================================
// OUTBOUND MESSAGES
// =============================================================================

/// Amount of a single denomination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination.
    pub denom: String,
    /// Amount in base units.
    pub amount: u128,
}

impl Coin {
    /// Creates a coin.
    pub fn new(amount: u128, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

/// Bank module messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankMsg {
    /// Transfer funds from the contract.
    Send {
        /// Recipient.
        to_address: String,
        /// Funds to send.
        amount: Vec<Coin>,
    },
    /// Burn funds held by the contract.
    Burn {
        /// Funds to burn.
        amount: Vec<Coin>,
    },
}

/// Contract-targeted messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WasmMsg {
    /// Execute another contract.
    Execute {
        /// Target contract.
        contract_addr: String,
        /// Expected code hash of the target.
        code_hash: String,
        /// Encrypted or plaintext message body.
        msg: Bytes,
        /// Funds sent along.
        send: Vec<Coin>,
    },
    /// Instantiate a new contract.
    Instantiate {
        /// Stored code to instantiate.
        code_id: u64,
        /// Expected code hash.
        code_hash: String,
        /// Init message body.
        msg: Bytes,
        /// Funds sent along.
        send: Vec<Coin>,
        /// Human readable label.
        label: String,
    },
}

/// A message emitted by a contract, executed by the host.
///
/// The dispatcher treats it as opaque except for [`CosmosMsg::is_contract`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CosmosMsg {
    /// Bank module message.
    Bank(BankMsg),
    /// Contract message.
    Wasm(WasmMsg),
    /// Protobuf-encoded module message.
    Stargate {
        /// Protobuf type URL.
        type_url: String,
        /// Encoded message.
        value: Bytes,
    },
    /// Chain-specific message.
    Custom(Bytes),
}

impl CosmosMsg {
    /// Returns true if the target is a contract.
    #[must_use]
    pub fn is_contract(&self) -> bool {
        matches!(self, Self::Wasm(_))
    }

    /// Routing key of this message.
    #[must_use]
    pub fn route(&self) -> MsgRoute {
        match self {
            Self::Bank(_) => MsgRoute::Bank,
            Self::Wasm(_) => MsgRoute::Wasm,
            Self::Stargate { .. } => MsgRoute::Stargate,
            Self::Custom(_) => MsgRoute::Custom,
        }
    }
}

/// Routing key of a [`CosmosMsg`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MsgRoute {
    /// Bank module.
    Bank,
    /// Contract module.
    Wasm,
    /// Protobuf module messages.
    Stargate,
    /// Chain-specific messages.
    Custom,
}

impl MsgRoute {
    /// Module name, as reported in routing events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Wasm => "wasm",
            Self::Stargate => "stargate",
            Self::Custom => "custom",
        }
    }
}

/// Message format version of the transaction that produced the submessages.
///
/// Passed through to the messenger unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CosmosMsgVersion {
    /// Legacy contract API.
    V010,
    /// Current contract API.
    #[default]
    V1,
}

// =============================================================================
// SUBMESSAGES
// =============================================================================

/// When the originating contract wants to hear about a submessage.
///
/// Discriminants are the wire values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyOn {
    /// Reply on success and on failure.
    Always = 0,
    /// Reply on success only; failure aborts the batch.
    Success = 1,
    /// Reply on failure only.
    Error = 2,
    /// Never reply; failure aborts the batch.
    Never = 3,
}

impl TryFrom<i32> for ReplyOn {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, i32> {
        match value {
            0 => Ok(ReplyOn::Always),
            1 => Ok(ReplyOn::Success),
            2 => Ok(ReplyOn::Error),
            3 => Ok(ReplyOn::Never),
            other => Err(other),
        }
    }
}

impl From<ReplyOn> for i32 {
    fn from(reply_on: ReplyOn) -> Self {
        reply_on as i32
    }
}

/// A submessage as emitted by a contract.
///
/// `reply_on` is kept as its raw wire value and only validated when the
/// dispatcher reaches this submessage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubMsg {
    /// Id echoed back in the reply.
    pub id: u64,
    /// Message to execute.
    pub msg: CosmosMsg,
    /// Optional gas bound for this submessage.
    #[serde(default)]
    pub gas_limit: Option<u64>,
    /// Raw reply policy.
    pub reply_on: i32,
}

impl SubMsg {
    /// Creates a submessage without a gas limit.
    #[must_use]
    pub fn new(id: u64, msg: CosmosMsg, reply_on: ReplyOn) -> Self {
        Self {
            id,
            msg,
            gas_limit: None,
            reply_on: reply_on.into(),
        }
    }

    /// Sets the gas limit.
    #[must_use]
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Validated reply policy.
    ///
    /// # Errors
    ///
    /// `SystemError::InvalidRequest` carrying this submessage as JSON if the
    /// raw value is not a known policy.
    pub fn reply_policy(&self) -> Result<ReplyOn, SystemError> {
        ReplyOn::try_from(self.reply_on).map_err(|_| SystemError::InvalidRequest {
            error: "replyOn value".to_string(),
            request: serde_json::to_vec(self).unwrap_or_default(),
        })
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// Attribute of a ledger-native event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    /// Attribute key.
    pub key: Bytes,
    /// Attribute value.
    pub value: Bytes,
}

/// Ledger-native event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Ordered attributes.
    pub attributes: Vec<EventAttribute>,
}

impl Event {
    /// Creates an event without attributes.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
        }
    }

    /// Appends an attribute.
    #[must_use]
    pub fn add_attribute(mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Self {
        self.attributes.push(EventAttribute {
            key: Bytes::from_slice(key.as_ref()),
            value: Bytes::from_slice(value.as_ref()),
        });
        self
    }
}

/// Attribute of a contract-visible event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogAttribute {
    /// Attribute key.
    pub key: String,
    /// Attribute value.
    pub value: String,
}

/// Contract-visible event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractEvent {
    /// Event type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Ordered attributes.
    pub attributes: Vec<LogAttribute>,
}

// =============================================================================
// DISPATCH OUTPUT
// =============================================================================

/// What a messenger returns for one successfully executed message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutput {
    /// Events produced by the message.
    pub events: Vec<Event>,
    /// Data payloads, one per executed module message.
    pub data: Vec<Bytes>,
}

impl DispatchOutput {
    /// Creates an empty output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    #[must_use]
    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    /// Appends a data payload.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data.push(data.into());
        self
    }
}

// =============================================================================
// REPLIES
// =============================================================================

/// Successful submessage outcome, as shown to the contract.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubMsgResponse {
    /// Filtered, converted events.
    pub events: Vec<ContractEvent>,
    /// First data payload, if any.
    pub data: Option<Bytes>,
}

/// Submessage outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubMsgResult {
    /// The submessage succeeded.
    Ok(SubMsgResponse),
    /// The submessage failed; redacted error text.
    #[serde(rename = "error")]
    Err(String),
}

impl SubMsgResult {
    /// Returns true for the success variant.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

/// Callback into the originating contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Id of the submessage.
    pub id: u64,
    /// Outcome.
    pub result: SubMsgResult,
}

// =============================================================================
// SIGNING METADATA
// =============================================================================

/// Signing mode of a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignMode {
    /// No signature; the enclave treats the message as plaintext.
    #[default]
    #[serde(rename = "SIGN_MODE_UNSPECIFIED")]
    Unspecified,
    /// Protobuf direct signing.
    #[serde(rename = "SIGN_MODE_DIRECT")]
    Direct,
    /// Textual signing.
    #[serde(rename = "SIGN_MODE_TEXTUAL")]
    Textual,
    /// Amino JSON signing.
    #[serde(rename = "SIGN_MODE_LEGACY_AMINO_JSON")]
    LegacyAminoJson,
    /// EIP-191 signing.
    #[serde(rename = "SIGN_MODE_EIP_191")]
    Eip191,
}

/// Signing metadata of the original transaction.
///
/// Attached to a reply only when the reply is confidential.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationInfo {
    /// Signed bytes.
    pub bytes: Bytes,
    /// Encoded mode info.
    pub mode_info: Bytes,
    /// Signer public key.
    pub public_key: Bytes,
    /// Signature.
    pub signature: Bytes,
    /// Signing mode.
    pub sign_mode: SignMode,
}

impl VerificationInfo {
    /// Metadata marking a reply as plaintext.
    #[must_use]
    pub fn plaintext() -> Self {
        Self::default()
    }

    /// Returns true if this carries no signature.
    #[must_use]
    pub fn is_plaintext(&self) -> bool {
        self.sign_mode == SignMode::Unspecified
    }
}

// =============================================================================
// KV GAS CONFIGURATION
// =============================================================================

/// Gas schedule for state access through an execution context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvGasConfig {
    /// Flat cost of `has`.
    pub has_cost: u64,
    /// Flat cost of `delete`.
    pub delete_cost: u64,
    /// Flat cost of `get`.
    pub read_cost_flat: u64,
    /// Per-byte cost of `get` (key and value).
    pub read_cost_per_byte: u64,
    /// Flat cost of `set`.
    pub write_cost_flat: u64,
    /// Per-byte cost of `set` (key and value).
    pub write_cost_per_byte: u64,
}

impl Default for KvGasConfig {
    fn default() -> Self {
        Self {
            has_cost: 1000,
            delete_cost: 1000,
            read_cost_flat: 1000,
            read_cost_per_byte: 3,
            write_cost_flat: 2000,
            write_cost_per_byte: 30,
        }
    }
}

impl KvGasConfig {
    /// Schedule that charges nothing.
    #[must_use]
    pub const fn free() -> Self {
        Self {
            has_cost: 0,
            delete_cost: 0,
            read_cost_flat: 0,
            read_cost_per_byte: 0,
            write_cost_flat: 0,
            write_cost_per_byte: 0,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bank_send() -> CosmosMsg {
        CosmosMsg::Bank(BankMsg::Send {
            to_address: "secret1recipient".to_string(),
            amount: vec![Coin::new(100, "uscrt")],
        })
    }

    #[test]
    fn test_reply_on_wire_values() {
        assert_eq!(i32::from(ReplyOn::Always), 0);
        assert_eq!(i32::from(ReplyOn::Success), 1);
        assert_eq!(i32::from(ReplyOn::Error), 2);
        assert_eq!(i32::from(ReplyOn::Never), 3);
        assert_eq!(ReplyOn::try_from(2), Ok(ReplyOn::Error));
        assert_eq!(ReplyOn::try_from(7), Err(7));
    }

    #[test]
    fn test_submsg_reply_policy_rejects_unknown_value() {
        let mut msg = SubMsg::new(9, bank_send(), ReplyOn::Never);
        assert_eq!(msg.reply_policy(), Ok(ReplyOn::Never));

        msg.reply_on = 7;
        let err = msg.reply_policy().unwrap_err();
        match err {
            SystemError::InvalidRequest { error, request } => {
                assert_eq!(error, "replyOn value");
                let decoded: SubMsg = serde_json::from_slice(&request).unwrap();
                assert_eq!(decoded.id, 9);
                assert_eq!(decoded.reply_on, 7);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_is_contract() {
        assert!(!bank_send().is_contract());
        let wasm = CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: "secret1contract".to_string(),
            code_hash: "abcd".to_string(),
            msg: Bytes::from_slice(b"{}"),
            send: Vec::new(),
        });
        assert!(wasm.is_contract());
        assert_eq!(wasm.route(), MsgRoute::Wasm);
        assert_eq!(MsgRoute::Bank.as_str(), "bank");
    }

    #[test]
    fn test_reply_json_shape() {
        let reply = Reply {
            id: 3,
            result: SubMsgResult::Err("codespace: sdk, code: 11".to_string()),
        };
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(
            json,
            r#"{"id":3,"result":{"error":"codespace: sdk, code: 11"}}"#
        );

        let reply = Reply {
            id: 4,
            result: SubMsgResult::Ok(SubMsgResponse {
                events: vec![ContractEvent {
                    kind: "wasm".to_string(),
                    attributes: vec![LogAttribute {
                        key: "k".to_string(),
                        value: "v".to_string(),
                    }],
                }],
                data: None,
            }),
        };
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(
            json,
            r#"{"id":4,"result":{"ok":{"events":[{"type":"wasm","attributes":[{"key":"k","value":"v"}]}],"data":null}}}"#
        );
    }

    #[test]
    fn test_verification_info_plaintext() {
        let info = VerificationInfo::plaintext();
        assert!(info.is_plaintext());
        assert!(info.bytes.is_empty());
        assert!(info.signature.is_empty());

        let signed = VerificationInfo {
            sign_mode: SignMode::Direct,
            ..VerificationInfo::default()
        };
        assert!(!signed.is_plaintext());
    }

    #[test]
    fn test_event_builder_preserves_order() {
        let event = Event::new("transfer")
            .add_attribute("recipient", "a")
            .add_attribute("sender", "b")
            .add_attribute("amount", "1uscrt");
        let keys: Vec<_> = event.attributes.iter().map(|a| a.key.clone()).collect();
        assert_eq!(
            keys,
            vec![
                Bytes::from_slice(b"recipient"),
                Bytes::from_slice(b"sender"),
                Bytes::from_slice(b"amount"),
            ]
        );
    }
}
