//! # Error Redaction
//!
//! Errors that reach a reply become part of consensus state. Free-form error
//! text can change between builds, so only system errors (deterministic by
//! construction) keep their content. Everything else is reduced to its
//! codespace and code.

use crate::errors::{DispatchError, SystemError};

/// Classification of an error for redaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass<'a> {
    /// Deterministic host error; passes through.
    System(&'a SystemError),
    /// Anything else; reduced to codespace and code.
    Ordinary,
}

/// Classifies an error.
#[must_use]
pub fn classify(err: &DispatchError) -> ErrorClass<'_> {
    match err.as_system_error() {
        Some(system) => ErrorClass::System(system),
        None => ErrorClass::Ordinary,
    }
}

/// Redacts an error for inclusion in a reply.
///
/// Idempotent: redacting a redacted error yields an equal error.
#[must_use]
pub fn redact_error(err: &DispatchError) -> DispatchError {
    match classify(err) {
        ErrorClass::System(_) => err.clone(),
        ErrorClass::Ordinary => {
            let (codespace, code) = err.abci_info();
            DispatchError::Redacted {
                codespace: codespace.to_string(),
                code,
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
