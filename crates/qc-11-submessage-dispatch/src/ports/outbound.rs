//! # Driven Ports (SPI - Outbound)
//!
//! These are the interfaces the dispatcher depends on.
//! External adapters implement these traits to provide:
//! - Key-value state (the ledger store)
//! - Execution of one outbound message (`Messenger`)
//! - The contract's reply entry point (`Replyer`)
//!
//! ## Architecture Compliance
//!
//! - Dependencies point INWARD (adapters implement these traits)
//! - The dispatcher only sees these contracts, never a concrete engine
//! - All calls are synchronous; gas is the only bound on their work

use crate::context::ExecutionContext;
use crate::domain::entities::{CosmosMsg, CosmosMsgVersion, DispatchOutput, Reply, VerificationInfo};
use crate::domain::value_objects::{Address, Bytes};
use crate::errors::DispatchError;
use std::sync::Arc;

// =============================================================================
// KEY-VALUE STORE
// =============================================================================

/// Key-value view of ledger state.
///
/// Implemented by the persistent store and by the cache overlay that backs a
/// submessage scope.
pub trait KvStore {
    /// Reads a value. `None` if the key is absent.
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Writes a value.
    fn set(&mut self, key: &[u8], value: &[u8]);

    /// Removes a key.
    fn delete(&mut self, key: &[u8]);

    /// Returns true if the key is present.
    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }
}

// =============================================================================
// MESSENGER
// =============================================================================

/// Executes one outbound message against the rest of the system.
///
/// ## Implementation Notes
///
/// - Consume gas through `ctx`; propagate the resulting error with `?` so gas
///   exhaustion reaches the dispatcher as a fault.
/// - May recursively dispatch submessages of nested contract calls.
pub trait Messenger {
    /// Dispatches `msg` on behalf of `contract`.
    ///
    /// # Returns
    ///
    /// * `DispatchOutput` - events and data payloads of the executed message
    ///
    /// # Errors
    ///
    /// Any [`DispatchError`]; faults abort the batch.
    fn dispatch_msg(
        &self,
        ctx: &mut ExecutionContext<'_>,
        contract: &Address,
        ibc_port: &str,
        msg: &CosmosMsg,
        msg_version: CosmosMsgVersion,
    ) -> Result<DispatchOutput, DispatchError>;
}

impl<T: Messenger + ?Sized> Messenger for &T {
    fn dispatch_msg(
        &self,
        ctx: &mut ExecutionContext<'_>,
        contract: &Address,
        ibc_port: &str,
        msg: &CosmosMsg,
        msg_version: CosmosMsgVersion,
    ) -> Result<DispatchOutput, DispatchError> {
        (**self).dispatch_msg(ctx, contract, ibc_port, msg, msg_version)
    }
}

impl<T: Messenger + ?Sized> Messenger for Arc<T> {
    fn dispatch_msg(
        &self,
        ctx: &mut ExecutionContext<'_>,
        contract: &Address,
        ibc_port: &str,
        msg: &CosmosMsg,
        msg_version: CosmosMsgVersion,
    ) -> Result<DispatchOutput, DispatchError> {
        (**self).dispatch_msg(ctx, contract, ibc_port, msg, msg_version)
    }
}

// =============================================================================
// REPLYER
// =============================================================================

/// Invokes the reply entry point of a contract.
pub trait Replyer {
    /// Delivers `reply` to `contract`.
    ///
    /// `sig_info` is the original transaction's signing metadata for a
    /// confidential reply, or [`VerificationInfo::plaintext`].
    ///
    /// # Returns
    ///
    /// * `Bytes` - data returned by the reply entry point (may be empty)
    ///
    /// # Errors
    ///
    /// Any [`DispatchError`]; every error aborts the batch.
    fn reply(
        &self,
        ctx: &mut ExecutionContext<'_>,
        contract: &Address,
        reply: Reply,
        og_tx: &[u8],
        sig_info: &VerificationInfo,
    ) -> Result<Bytes, DispatchError>;
}

impl<T: Replyer + ?Sized> Replyer for &T {
    fn reply(
        &self,
        ctx: &mut ExecutionContext<'_>,
        contract: &Address,
        reply: Reply,
        og_tx: &[u8],
        sig_info: &VerificationInfo,
    ) -> Result<Bytes, DispatchError> {
        (**self).reply(ctx, contract, reply, og_tx, sig_info)
    }
}

impl<T: Replyer + ?Sized> Replyer for Arc<T> {
    fn reply(
        &self,
        ctx: &mut ExecutionContext<'_>,
        contract: &Address,
        reply: Reply,
        og_tx: &[u8],
        sig_info: &VerificationInfo,
    ) -> Result<Bytes, DispatchError> {
        (**self).reply(ctx, contract, reply, og_tx, sig_info)
    }
}

// =============================================================================
// TESTS
// =============================================================================
