//! # Execution Context
//!
//! The handle every dispatch step runs against: a state store, a gas meter
//! and an event sink, all borrowed from whoever opened the context.
//!
//! Child contexts come in two shapes:
//!
//! - [`ExecutionContext::begin_scope`]: buffered writes, own events, shared gas
//! - [`ExecutionContext::with_gas_meter`]: same store and events, different meter

pub mod event_manager;
pub mod scope;

pub use event_manager::EventManager;
pub use scope::{CacheStore, Scope};

use crate::domain::entities::{Event, KvGasConfig};
use crate::domain::value_objects::GasMeter;
use crate::errors::DispatchError;
use crate::ports::outbound::KvStore;

/// Gas descriptors used by the KV helpers.
pub mod descriptors {
    /// `has` flat cost.
    pub const HAS: &str = "Has";
    /// `get` flat cost.
    pub const READ_FLAT: &str = "ReadFlat";
    /// `get` per-byte cost.
    pub const READ_PER_BYTE: &str = "ReadPerByte";
    /// `set` flat cost.
    pub const WRITE_FLAT: &str = "WriteFlat";
    /// `set` per-byte cost.
    pub const WRITE_PER_BYTE: &str = "WritePerByte";
    /// `delete` flat cost.
    pub const DELETE: &str = "Delete";
}

/// State, gas and events of one step of execution.
pub struct ExecutionContext<'a> {
    store: &'a mut dyn KvStore,
    gas_meter: &'a mut GasMeter,
    event_manager: &'a mut EventManager,
    kv_gas: KvGasConfig,
}

impl<'a> ExecutionContext<'a> {
    /// Creates a context with the default KV gas schedule.
    pub fn new(
        store: &'a mut dyn KvStore,
        gas_meter: &'a mut GasMeter,
        event_manager: &'a mut EventManager,
    ) -> Self {
        Self {
            store,
            gas_meter,
            event_manager,
            kv_gas: KvGasConfig::default(),
        }
    }

    /// Replaces the KV gas schedule.
    #[must_use]
    pub fn with_kv_gas(mut self, kv_gas: KvGasConfig) -> Self {
        self.kv_gas = kv_gas;
        self
    }

    /// KV gas schedule in effect.
    #[must_use]
    pub fn kv_gas(&self) -> KvGasConfig {
        self.kv_gas
    }

    // =========================================================================
    // GAS
    // =========================================================================

    /// The gas meter of this context.
    #[must_use]
    pub fn gas_meter(&self) -> &GasMeter {
        self.gas_meter
    }

    /// Gas limit of this context.
    #[must_use]
    pub fn gas_limit(&self) -> u64 {
        self.gas_meter.limit()
    }

    /// Gas consumed in this context.
    #[must_use]
    pub fn gas_consumed(&self) -> u64 {
        self.gas_meter.consumed()
    }

    /// Gas left before the limit.
    #[must_use]
    pub fn gas_remaining(&self) -> u64 {
        self.gas_meter.remaining()
    }

    /// Charges gas.
    ///
    /// # Errors
    ///
    /// `DispatchError::Fault` on exhaustion or overflow.
    pub fn consume_gas(&mut self, amount: u64, descriptor: &str) -> Result<(), DispatchError> {
        self.gas_meter.consume(amount, descriptor)?;
        Ok(())
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Emits one event.
    pub fn emit_event(&mut self, event: Event) {
        self.event_manager.emit(event);
    }

    /// Emits events, keeping their order.
    pub fn emit_events<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = Event>,
    {
        self.event_manager.emit_events(events);
    }

    /// Events emitted in this context so far.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        self.event_manager.events()
    }

    // =========================================================================
    // STATE
    // =========================================================================

    /// Uncharged read access to the store.
    #[must_use]
    pub fn store(&self) -> &dyn KvStore {
        &*self.store
    }

    /// Uncharged write access to the store.
    pub fn store_mut(&mut self) -> &mut dyn KvStore {
        &mut *self.store
    }

    /// Reads a key, charging gas.
    ///
    /// # Errors
    ///
    /// `DispatchError::Fault` if the charge fails.
    pub fn kv_get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, DispatchError> {
        self.consume_gas(self.kv_gas.read_cost_flat, descriptors::READ_FLAT)?;
        let value = self.store.get(key);
        let bytes = key.len() + value.as_ref().map_or(0, Vec::len);
        self.consume_gas(
            per_byte(self.kv_gas.read_cost_per_byte, bytes),
            descriptors::READ_PER_BYTE,
        )?;
        Ok(value)
    }

    /// Writes a key, charging gas before the write.
    ///
    /// # Errors
    ///
    /// `DispatchError::Fault` if the charge fails; nothing is written then.
    pub fn kv_set(&mut self, key: &[u8], value: &[u8]) -> Result<(), DispatchError> {
        self.consume_gas(self.kv_gas.write_cost_flat, descriptors::WRITE_FLAT)?;
        self.consume_gas(
            per_byte(self.kv_gas.write_cost_per_byte, key.len() + value.len()),
            descriptors::WRITE_PER_BYTE,
        )?;
        self.store.set(key, value);
        Ok(())
    }

    /// Deletes a key, charging gas.
    ///
    /// # Errors
    ///
    /// `DispatchError::Fault` if the charge fails; nothing is deleted then.
    pub fn kv_delete(&mut self, key: &[u8]) -> Result<(), DispatchError> {
        self.consume_gas(self.kv_gas.delete_cost, descriptors::DELETE)?;
        self.store.delete(key);
        Ok(())
    }

    /// Checks a key, charging gas.
    ///
    /// # Errors
    ///
    /// `DispatchError::Fault` if the charge fails.
    pub fn kv_has(&mut self, key: &[u8]) -> Result<bool, DispatchError> {
        self.consume_gas(self.kv_gas.has_cost, descriptors::HAS)?;
        Ok(self.store.has(key))
    }

    // =========================================================================
    // CHILD CONTEXTS
    // =========================================================================

    /// Opens a cached scope over this context.
    pub fn begin_scope(&mut self) -> Scope<'_> {
        Scope::new(&mut *self.store, &mut *self.gas_meter, self.kv_gas)
    }

    /// Same store and event sink, metered by `gas_meter` instead.
    pub fn with_gas_meter<'b>(&'b mut self, gas_meter: &'b mut GasMeter) -> ExecutionContext<'b> {
        ExecutionContext {
            store: &mut *self.store,
            gas_meter,
            event_manager: &mut *self.event_manager,
            kv_gas: self.kv_gas,
        }
    }
}

fn per_byte(cost: u64, bytes: usize) -> u64 {
    cost.saturating_mul(u64::try_from(bytes).unwrap_or(u64::MAX))
}

// =============================================================================
// TESTS
// =============================================================================
