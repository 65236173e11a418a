//! # Value Objects
//!
//! Immutable domain primitives for submessage dispatch.
//! These types represent concepts that are defined by their value, not identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte account or contract address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 20]>::try_from(slice).ok().map(Self)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// BYTES (variable length)
// =============================================================================

/// Variable-length byte payload: message bodies, reply data, raw transactions.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    /// Creates an empty Bytes.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates Bytes from a slice.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Self {
        Self(slice.to_vec())
    }

    /// Returns the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Returns a reference to the underlying slice.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        if self.0.len() <= 8 {
            for byte in &self.0 {
                write!(f, "{byte:02x}")?;
            }
        } else {
            for byte in &self.0[..4] {
                write!(f, "{byte:02x}")?;
            }
            write!(f, "..({} bytes)", self.0.len())?;
        }
        Ok(())
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(vec: Vec<u8>) -> Self {
        Self(vec)
    }
}

impl From<&[u8]> for Bytes {
    fn from(slice: &[u8]) -> Self {
        Self(slice.to_vec())
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// =============================================================================
// GAS METER
// =============================================================================

/// Failure of a [`GasMeter::consume`] call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GasError {
    /// Consumption went past the limit.
    #[error("out of gas in location: {descriptor}")]
    OutOfGas {
        /// Reason passed to `consume`.
        descriptor: String,
        /// Meter limit.
        limit: u64,
        /// Consumption after the call.
        consumed: u64,
    },

    /// Consumption overflowed `u64`.
    #[error("gas overflow in location: {descriptor}")]
    Overflow {
        /// Reason passed to `consume`.
        descriptor: String,
    },
}

/// Gas view of one execution context.
///
/// ## Invariants
/// - A `consume` that goes past `limit` still records the amount and returns
///   `GasError::OutOfGas`; [`GasMeter::is_past_limit`] stays true afterwards.
/// - `consumed` never wraps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GasMeter {
    /// Gas limit for this context.
    limit: u64,
    /// Gas consumed so far.
    consumed: u64,
}

impl GasMeter {
    /// Creates a new gas meter with the given limit.
    #[must_use]
    pub const fn new(limit: u64) -> Self {
        Self { limit, consumed: 0 }
    }

    /// Creates a meter that can only fail on overflow.
    #[must_use]
    pub const fn infinite() -> Self {
        Self::new(u64::MAX)
    }

    /// Returns the gas limit.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Returns gas consumed so far. May exceed the limit after exhaustion.
    #[must_use]
    pub const fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Returns consumption capped at the limit.
    #[must_use]
    pub fn consumed_to_limit(&self) -> u64 {
        self.consumed.min(self.limit)
    }

    /// Returns remaining gas.
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.consumed)
    }

    /// True once consumption reached the limit.
    #[must_use]
    pub const fn is_out_of_gas(&self) -> bool {
        self.consumed >= self.limit
    }

    /// True once consumption went strictly past the limit.
    #[must_use]
    pub const fn is_past_limit(&self) -> bool {
        self.consumed > self.limit
    }

    /// Consumes gas.
    ///
    /// # Errors
    ///
    /// `GasError::OutOfGas` if the new total is past the limit,
    /// `GasError::Overflow` if it does not fit in a `u64`.
    pub fn consume(&mut self, amount: u64, descriptor: &str) -> Result<(), GasError> {
        let Some(consumed) = self.consumed.checked_add(amount) else {
            self.consumed = u64::MAX;
            return Err(GasError::Overflow {
                descriptor: descriptor.to_string(),
            });
        };
        self.consumed = consumed;
        if self.is_past_limit() {
            return Err(GasError::OutOfGas {
                descriptor: descriptor.to_string(),
                limit: self.limit,
                consumed,
            });
        }
        Ok(())
    }
}

impl Default for GasMeter {
    fn default() -> Self {
        Self::infinite()
    }
}

// =============================================================================
// TESTS
// =============================================================================
