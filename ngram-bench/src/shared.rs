//! A read-write locked n-gram map.
//!
//! The maps in [`ngram_map`] have no internal locking: while any thread holds
//! a shared reference, nobody can insert. When writes have to interleave with
//! concurrent lookups, wrap the map in a [`SharedNgramMap`]. Readers share the
//! read lock; each insert takes the write lock.
//!
//! For the common load-then-query pattern, skip the lock entirely: build the
//! map single-threaded and share `&map` (or an `Arc`) with the readers.

use ngram_map::NgramMap;
use parking_lot::{RwLock, RwLockReadGuard};

/// An [`NgramMap`] behind a [`parking_lot::RwLock`].
#[derive(Debug, Default)]
pub struct SharedNgramMap<M> {
    inner: RwLock<M>,
}

impl<M> SharedNgramMap<M> {
    /// Wraps `map`.
    pub fn new(map: M) -> Self {
        Self {
            inner: RwLock::new(map),
        }
    }

    /// Releases the map, e.g. to serve lock-free reads once loading is done.
    pub fn into_inner(self) -> M {
        self.inner.into_inner()
    }

    /// Holds the read lock for a batch of lookups.
    pub fn read(&self) -> RwLockReadGuard<'_, M> {
        self.inner.read()
    }

    /// Looks up `key` under the read lock.
    pub fn get<V>(&self, key: &[u8]) -> Option<V>
    where
        M: NgramMap<V>,
    {
        self.inner.read().get(key)
    }

    /// Checks `key` under the read lock.
    pub fn contains_key<V>(&self, key: &[u8]) -> bool
    where
        M: NgramMap<V>,
    {
        self.inner.read().contains_key(key)
    }

    /// Inserts under the write lock, returning the previous value.
    pub fn insert<V>(&self, key: &[u8], value: V) -> Option<V>
    where
        M: NgramMap<V>,
    {
        self.inner.write().insert(key, value)
    }

    /// Entry count under the read lock.
    pub fn len<V>(&self) -> usize
    where
        M: NgramMap<V>,
    {
        self.inner.read().len()
    }
}
