//! # Error Types
//!
//! All error types for submessage dispatch.
//!
//! Errors fall into three groups:
//!
//! - [`SystemError`]: produced only by host code paths that are identical on
//!   every node. These pass through redaction unchanged.
//! - [`CodedError`]: ordinary errors registered under a codespace. Only the
//!   codespace and code survive redaction.
//! - [`Fault`]: fatal signals. Never carried into a reply; the only one that
//!   is ever intercepted is gas exhaustion, at the gas limiter.

use crate::domain::value_objects::GasError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// CODESPACES
// =============================================================================

/// Registered codespaces and codes used by this subsystem.
pub mod codes {
    /// Root SDK codespace.
    pub const SDK_CODESPACE: &str = "sdk";
    /// Codespace of errors that were never registered.
    pub const UNDEFINED_CODESPACE: &str = "undefined";

    /// `undefined/1`: internal error.
    pub const INTERNAL: u32 = 1;
    /// `sdk/5`: insufficient funds.
    pub const INSUFFICIENT_FUNDS: u32 = 5;
    /// `sdk/11`: out of gas.
    pub const OUT_OF_GAS: u32 = 11;
}

// =============================================================================
// SYSTEM ERRORS
// =============================================================================

/// Host errors with deterministic content.
///
/// Serialized the way contracts expect them (`{"no_such_contract":{"addr":"..."}}`).
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemError {
    /// The request could not be interpreted.
    #[error("invalid request: {error} - original request: {}", String::from_utf8_lossy(.request))]
    InvalidRequest {
        /// What was wrong with the request.
        error: String,
        /// The raw request.
        request: Vec<u8>,
    },

    /// A response could not be interpreted.
    #[error("invalid response: {error} - original response: {}", String::from_utf8_lossy(.response))]
    InvalidResponse {
        /// What was wrong with the response.
        error: String,
        /// The raw response.
        response: Vec<u8>,
    },

    /// Target contract does not exist.
    #[error("no such contract: {addr}")]
    NoSuchContract {
        /// Address that was queried.
        addr: String,
    },

    /// Catch-all.
    #[error("unknown system error")]
    Unknown {},

    /// The host does not support this kind of request.
    #[error("unsupported request: {kind}")]
    UnsupportedRequest {
        /// Request kind.
        kind: String,
    },
}

// =============================================================================
// CODED ERRORS
// =============================================================================

/// Ordinary error registered under a codespace.
///
/// The message is free-form and may differ between builds, so it must never
/// reach consensus state. See [`crate::domain::redaction`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CodedError {
    /// Registering module.
    pub codespace: String,
    /// Code within the codespace.
    pub code: u32,
    /// Human readable detail.
    pub message: String,
}

impl CodedError {
    /// Creates a coded error.
    pub fn new(codespace: impl Into<String>, code: u32, message: impl Into<String>) -> Self {
        Self {
            codespace: codespace.into(),
            code,
            message: message.into(),
        }
    }

    /// `sdk/11`, wrapped with `context`.
    pub fn out_of_gas(context: &str) -> Self {
        Self::new(
            codes::SDK_CODESPACE,
            codes::OUT_OF_GAS,
            format!("{context}: out of gas"),
        )
    }

    /// `sdk/5`, wrapped with `context`.
    pub fn insufficient_funds(context: &str) -> Self {
        Self::new(
            codes::SDK_CODESPACE,
            codes::INSUFFICIENT_FUNDS,
            format!("{context}: insufficient funds"),
        )
    }

    /// `undefined/1`, for errors nobody registered.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(codes::UNDEFINED_CODESPACE, codes::INTERNAL, message)
    }

    /// Returns true for `sdk/11`.
    #[must_use]
    pub fn is_out_of_gas(&self) -> bool {
        self.codespace == codes::SDK_CODESPACE && self.code == codes::OUT_OF_GAS
    }
}

// =============================================================================
// FAULTS
// =============================================================================

/// Fatal signals.
///
/// A fault aborts the whole batch. [`Fault::OutOfGas`] raised under a
/// submessage gas limit is the single exception.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Fault {
    /// A gas meter ran past its limit.
    #[error("out of gas in location: {descriptor}; gasWanted: {limit}, gasUsed: {consumed}")]
    OutOfGas {
        /// Reason passed to the failing `consume` call.
        descriptor: String,
        /// Meter limit.
        limit: u64,
        /// Meter consumption after the failing call.
        consumed: u64,
    },

    /// Gas arithmetic overflowed `u64`.
    #[error("gas overflow in location: {descriptor}")]
    GasOverflow {
        /// Reason passed to the failing `consume` call.
        descriptor: String,
    },

    /// Any other unrecoverable condition.
    #[error("system fault: {0}")]
    System(String),
}

impl From<GasError> for Fault {
    fn from(err: GasError) -> Self {
        match err {
            GasError::OutOfGas {
                descriptor,
                limit,
                consumed,
            } => Self::OutOfGas {
                descriptor,
                limit,
                consumed,
            },
            GasError::Overflow { descriptor } => Self::GasOverflow { descriptor },
        }
    }
}

// =============================================================================
// DISPATCH ERRORS
// =============================================================================

/// Error returned by dispatch, by the collaborators and by the dispatcher.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Deterministic host error.
    #[error(transparent)]
    System(#[from] SystemError),

    /// Ordinary error.
    #[error(transparent)]
    Coded(#[from] CodedError),

    /// Ordinary error after redaction.
    #[error("codespace: {codespace}, code: {code}")]
    Redacted {
        /// Codespace of the original error.
        codespace: String,
        /// Code of the original error.
        code: u32,
    },

    /// Fatal signal.
    #[error(transparent)]
    Fault(#[from] Fault),
}

impl DispatchError {
    /// Returns true if this error must abort the batch regardless of policy.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fault(_))
    }

    /// Returns true if this is a gas exhaustion fault.
    #[must_use]
    pub fn is_out_of_gas_fault(&self) -> bool {
        matches!(self, Self::Fault(Fault::OutOfGas { .. }))
    }

    /// Returns the system error, if any.
    #[must_use]
    pub fn as_system_error(&self) -> Option<&SystemError> {
        match self {
            Self::System(err) => Some(err),
            _ => None,
        }
    }

    /// Codespace and code of this error.
    ///
    /// Faults map onto the codes the host would register for them; system
    /// errors are reported as internal.
    #[must_use]
    pub fn abci_info(&self) -> (&str, u32) {
        match self {
            Self::Coded(err) => (err.codespace.as_str(), err.code),
            Self::Redacted { codespace, code } => (codespace.as_str(), *code),
            Self::Fault(Fault::OutOfGas { .. }) => (codes::SDK_CODESPACE, codes::OUT_OF_GAS),
            Self::System(_) | Self::Fault(_) => (codes::UNDEFINED_CODESPACE, codes::INTERNAL),
        }
    }
}

impl From<GasError> for DispatchError {
    fn from(err: GasError) -> Self {
        Self::Fault(err.into())
    }
}

// =============================================================================
// SERVICE ERRORS
// =============================================================================

/// Errors of the service wrapper, raised before a batch reaches the dispatcher.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Configuration rejected by `validate`.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Batch exceeds the configured size.
    #[error("batch too large: {size} submessages (max {max})")]
    BatchTooLarge {
        /// Submessages in the batch.
        size: usize,
        /// Configured maximum.
        max: usize,
    },
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_error_display() {
        let err = SystemError::InvalidRequest {
            error: "replyOn value".to_string(),
            request: b"{\"id\":1}".to_vec(),
        };
        assert_eq!(
            err.to_string(),
            "invalid request: replyOn value - original request: {\"id\":1}"
        );

        let err = SystemError::NoSuchContract {
            addr: "secret1xyz".to_string(),
        };
        assert_eq!(err.to_string(), "no such contract: secret1xyz");

        assert_eq!(SystemError::Unknown {}.to_string(), "unknown system error");
    }

    #[test]
    fn test_system_error_json_shape() {
        let err = SystemError::UnsupportedRequest {
            kind: "stargate".to_string(),
        };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"unsupported_request":{"kind":"stargate"}}"#);

        let json = serde_json::to_string(&SystemError::Unknown {}).unwrap();
        assert_eq!(json, r#"{"unknown":{}}"#);
    }

    #[test]
    fn test_coded_error_constructors() {
        let err = CodedError::out_of_gas("SubMsg hit gas limit");
        assert_eq!(err.codespace, "sdk");
        assert_eq!(err.code, 11);
        assert_eq!(err.to_string(), "SubMsg hit gas limit: out of gas");
        assert!(err.is_out_of_gas());

        let err = CodedError::internal("boom");
        assert_eq!(err.codespace, "undefined");
        assert_eq!(err.code, 1);
        assert!(!err.is_out_of_gas());
    }

    #[test]
    fn test_fault_is_fatal() {
        let err: DispatchError = Fault::System("stack overflow".to_string()).into();
        assert!(err.is_fatal());
        assert!(!err.is_out_of_gas_fault());

        let err: DispatchError = CodedError::insufficient_funds("send").into();
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_gas_error_conversion() {
        let err: DispatchError = GasError::OutOfGas {
            descriptor: "write".to_string(),
            limit: 10,
            consumed: 12,
        }
        .into();
        assert!(err.is_out_of_gas_fault());
        assert_eq!(
            err.to_string(),
            "out of gas in location: write; gasWanted: 10, gasUsed: 12"
        );

        let err: DispatchError = GasError::Overflow {
            descriptor: "write".to_string(),
        }
        .into();
        assert!(err.is_fatal());
        assert!(!err.is_out_of_gas_fault());
    }

    #[test]
    fn test_abci_info() {
        let err: DispatchError = CodedError::new("bank", 2, "no coins").into();
        assert_eq!(err.abci_info(), ("bank", 2));

        let err: DispatchError = SystemError::Unknown {}.into();
        assert_eq!(err.abci_info(), ("undefined", 1));
    }

    #[test]
    fn test_service_error_display() {
        let err = ServiceError::BatchTooLarge { size: 65, max: 64 };
        assert_eq!(err.to_string(), "batch too large: 65 submessages (max 64)");
    }
}
