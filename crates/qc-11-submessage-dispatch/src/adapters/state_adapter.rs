//! # State Adapter
//!
//! In-memory key-value store for testing and for hosts without persistence.
//! Production implementation would be backed by the State Management
//! subsystem's committed store.

use crate::ports::outbound::KvStore;
use std::collections::BTreeMap;

/// In-memory ordered key-value store.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if no key is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.data.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}

impl KvStore for MemStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.get(key).cloned()
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.data.insert(key.to_vec(), value.to_vec());
    }

    fn delete(&mut self, key: &[u8]) {
        self.data.remove(key);
    }

    fn has(&self, key: &[u8]) -> bool {
        self.data.contains_key(key)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_delete() {
        let mut store = MemStore::new();
        assert!(store.is_empty());

        store.set(b"b", b"2");
        store.set(b"a", b"1");
        assert_eq!(store.get(b"a"), Some(b"1".to_vec()));
        assert_eq!(store.len(), 2);

        // Iteration is key-ordered
        let keys: Vec<_> = store.iter().map(|(k, _)| k.to_vec()).collect();
        assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec()]);

        store.delete(b"a");
        assert!(!store.has(b"a"));
        assert_eq!(store.get(b"a"), None);
    }
}
