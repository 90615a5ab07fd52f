//! Key-value state storage interface and in-memory implementation.
//!
//! The scheduler only needs `has` / `get` / `set` over a module-private
//! namespace. [`MemoryStore`] backs tests and simulations; the node uses
//! RocksDB (mintage-node). [`Prefixed`] scopes any store to a namespace.
//!
//! Not thread-safe: the caller's block pipeline serializes access.
//!
//! Multi-key updates go through [`KvStore::write_batch`], which is all or
//! nothing: a failed batch leaves every key as it was.

use std::collections::BTreeMap;

use crate::error::StoreError;

/// Byte-keyed state storage.
pub trait KvStore {
    /// Read the value under `key`. Returns `None` if the key was never set.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Write every `(key, value)` pair atomically. On error none of them is
    /// visible.
    fn write_batch(&mut self, entries: &[(&[u8], &[u8])]) -> Result<(), StoreError>;

    /// Whether a value exists under `key`.
    ///
    /// Default implementation delegates to [`get`](Self::get).
    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KvStore + ?Sized> KvStore for &mut S {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn write_batch(&mut self, entries: &[(&[u8], &[u8])]) -> Result<(), StoreError> {
        (**self).write_batch(entries)
    }

    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        (**self).has(key)
    }
}

/// In-memory key-value store.
///
/// Ordered so that two stores holding the same entries compare equal and
/// iterate identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.entries.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn write_batch(&mut self, entries: &[(&[u8], &[u8])]) -> Result<(), StoreError> {
        for (key, value) in entries {
            self.entries.insert(key.to_vec(), value.to_vec());
        }
        Ok(())
    }

    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.entries.contains_key(key))
    }
}

/// A view of `inner` where every key is prefixed with a fixed namespace.
#[derive(Debug, Clone)]
pub struct Prefixed<S> {
    inner: S,
    prefix: Vec<u8>,
}

impl<S> Prefixed<S> {
    pub fn new(inner: S, prefix: &[u8]) -> Self {
        Self {
            inner,
            prefix: prefix.to_vec(),
        }
    }

    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn full_key(&self, key: &[u8]) -> Vec<u8> {
        let mut full = Vec::with_capacity(self.prefix.len() + key.len());
        full.extend_from_slice(&self.prefix);
        full.extend_from_slice(key);
        full
    }
}

impl<S: KvStore> KvStore for Prefixed<S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(&self.full_key(key))
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let full = self.full_key(key);
        self.inner.set(&full, value)
    }

    fn write_batch(&mut self, entries: &[(&[u8], &[u8])]) -> Result<(), StoreError> {
        let keys: Vec<Vec<u8>> = entries.iter().map(|(k, _)| self.full_key(k)).collect();
        let batch: Vec<(&[u8], &[u8])> = keys
            .iter()
            .zip(entries)
            .map(|(k, (_, v))| (k.as_slice(), *v))
            .collect();
        self.inner.write_batch(&batch)
    }

    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        self.inner.has(&self.full_key(key))
    }
}
