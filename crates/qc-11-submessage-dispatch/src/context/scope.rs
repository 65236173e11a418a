//! # Cached Scopes
//!
//! A scope is a child execution context whose state writes are buffered in
//! a [`CacheStore`] and whose events go to a fresh [`EventManager`]. The gas
//! meter is shared with the parent, so gas spent inside a scope stays spent
//! even when the scope is discarded.
//!
//! - [`Scope::commit`] flushes the buffered writes into the parent store and
//!   hands back the scope's events.
//! - Dropping a scope without committing discards both.

use crate::context::{EventManager, ExecutionContext};
use crate::domain::entities::{Event, KvGasConfig};
use crate::domain::value_objects::GasMeter;
use crate::ports::outbound::KvStore;
use std::collections::BTreeMap;
use tracing::trace;

// =============================================================================
// CACHE STORE
// =============================================================================

/// Write-buffering overlay over a parent store.
///
/// `None` in the overlay marks a pending delete.
pub struct CacheStore<'p> {
    parent: &'p mut dyn KvStore,
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'p> CacheStore<'p> {
    /// Creates an empty overlay.
    pub fn new(parent: &'p mut dyn KvStore) -> Self {
        Self {
            parent,
            writes: BTreeMap::new(),
        }
    }

    /// Number of buffered writes and deletes.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Flushes the overlay into the parent, in key order.
    pub fn write(&mut self) {
        for (key, value) in std::mem::take(&mut self.writes) {
            match value {
                Some(value) => self.parent.set(&key, &value),
                None => self.parent.delete(&key),
            }
        }
    }
}

impl KvStore for CacheStore<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.get(key) {
            Some(buffered) => buffered.clone(),
            None => self.parent.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
    }

    fn delete(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }
}

impl Drop for CacheStore<'_> {
    fn drop(&mut self) {
        if !self.writes.is_empty() {
            trace!(pending = self.writes.len(), "Discarding uncommitted scope writes");
        }
    }
}

// =============================================================================
// SCOPE
// =============================================================================

/// Child context that can be committed or discarded as a unit.
pub struct Scope<'p> {
    store: CacheStore<'p>,
    gas_meter: &'p mut GasMeter,
    event_manager: EventManager,
    kv_gas: KvGasConfig,
}

impl<'p> Scope<'p> {
    /// Opens a scope over the given parent store and gas meter.
    pub fn new(parent: &'p mut dyn KvStore, gas_meter: &'p mut GasMeter, kv_gas: KvGasConfig) -> Self {
        Self {
            store: CacheStore::new(parent),
            gas_meter,
            event_manager: EventManager::new(),
            kv_gas,
        }
    }

    /// Execution context that reads and writes through this scope.
    pub fn context(&mut self) -> ExecutionContext<'_> {
        ExecutionContext::new(&mut self.store, &mut *self.gas_meter, &mut self.event_manager)
            .with_kv_gas(self.kv_gas)
    }

    /// Events emitted in this scope so far.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        self.event_manager.events()
    }

    /// Number of buffered writes.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.store.pending_writes()
    }

    /// Flushes buffered writes into the parent and returns the scope's events.
    ///
    /// The events are NOT emitted on the parent; the caller decides what
    /// reaches it.
    #[must_use]
    pub fn commit(self) -> Vec<Event> {
        let Self {
            mut store,
            event_manager,
            ..
        } = self;
        store.write();
        event_manager.into_events()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemStore;

    #[test]
    fn test_reads_see_buffered_writes() {
        let mut parent = MemStore::new();
        parent.set(b"a", b"1");
        parent.set(b"b", b"2");

        let mut cache = CacheStore::new(&mut parent);
        cache.set(b"a", b"10");
        cache.delete(b"b");

        assert_eq!(cache.get(b"a"), Some(b"10".to_vec()));
        assert_eq!(cache.get(b"b"), None);
        assert!(!cache.has(b"b"));
        assert_eq!(cache.pending_writes(), 2);
    }

    #[test]
    fn test_commit_flushes_writes_and_returns_events() {
        let mut parent = MemStore::new();
        parent.set(b"gone", b"x");
        let mut gas = GasMeter::new(1_000_000);

        let mut scope = Scope::new(&mut parent, &mut gas, KvGasConfig::free());
        {
            let mut ctx = scope.context();
            ctx.kv_set(b"k", b"v").unwrap();
            ctx.kv_delete(b"gone").unwrap();
            ctx.emit_event(Event::new("transfer"));
        }
        assert_eq!(scope.events().len(), 1);

        let events = scope.commit();
        assert_eq!(events.len(), 1);
        assert_eq!(parent.get(b"k"), Some(b"v".to_vec()));
        assert_eq!(parent.get(b"gone"), None);
    }

    #[test]
    fn test_drop_discards_writes_but_keeps_gas() {
        let mut parent = MemStore::new();
        let mut gas = GasMeter::new(1_000_000);

        {
            let mut scope = Scope::new(&mut parent, &mut gas, KvGasConfig::default());
            let mut ctx = scope.context();
            ctx.kv_set(b"k", b"v").unwrap();
        }

        assert!(parent.is_empty());
        assert!(gas.consumed() > 0);
    }

    #[test]
    fn test_nested_scopes_commit_inward_out() {
        let mut parent = MemStore::new();
        let mut gas = GasMeter::infinite();

        let mut outer = Scope::new(&mut parent, &mut gas, KvGasConfig::free());
        {
            let mut outer_ctx = outer.context();
            let mut inner = outer_ctx.begin_scope();
            inner.context().kv_set(b"inner", b"1").unwrap();
            let _ = inner.commit();
            assert!(outer_ctx.kv_has(b"inner").unwrap());
        }
        drop(outer);

        assert!(parent.is_empty());
    }
}
