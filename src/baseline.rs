//! Plain `HashMap`-backed n-gram map used as a comparison baseline.
//!
//! Every key, whatever its length, is stored as an owned byte string in a
//! single hash map. It honours the same contract as
//! [`TieredNgramMap`](crate::TieredNgramMap), including the empty-key panic,
//! so the two can be swapped behind [`NgramMap`].

use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::{check_key, NgramMap, NgramValue};

/// A single `HashMap<Box<[u8]>, V>` with no tiering.
#[derive(Clone, Debug)]
pub struct HashNgramMap<V, S = RandomState> {
    map: HashMap<Box<[u8]>, V, S>,
}

impl<V: NgramValue> HashNgramMap<V, RandomState> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }
}

impl<V: NgramValue, S: BuildHasher> HashNgramMap<V, S> {
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, hasher),
        }
    }

    #[inline]
    pub fn get(&self, key: &[u8]) -> Option<V> {
        check_key(key);
        self.map.get(key).copied()
    }

    #[inline]
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    pub fn insert(&mut self, key: &[u8], value: V) -> Option<V> {
        check_key(key);
        if let Some(slot) = self.map.get_mut(key) {
            return Some(std::mem::replace(slot, value));
        }
        self.map.insert(key.into(), value)
    }

    /// O(1), unlike [`TieredNgramMap::len`](crate::TieredNgramMap::len).
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Approximate heap bytes held by the map.
    pub fn memory_usage(&self) -> usize {
        let entry = std::mem::size_of::<(Box<[u8]>, V)>() + 1;
        let keys: usize = self.map.keys().map(|k| k.len()).sum();
        self.map.capacity() * entry + keys
    }
}

impl<V: NgramValue> Default for HashNgramMap<V, RandomState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: NgramValue, S: BuildHasher> NgramMap<V> for HashNgramMap<V, S> {
    #[inline]
    fn get(&self, key: &[u8]) -> Option<V> {
        HashNgramMap::get(self, key)
    }

    fn insert(&mut self, key: &[u8], value: V) -> Option<V> {
        HashNgramMap::insert(self, key, value)
    }

    fn len(&self) -> usize {
        HashNgramMap::len(self)
    }
}
