//! # ngram-map
//!
//! A lookup map for short byte n-grams, tiered by key length.
//!
//! Natural-language n-gram frequency tables are dominated by very short keys:
//! single bytes, byte pairs and 3/4-byte sequences (including single multi-byte
//! UTF-8 characters). [`TieredNgramMap`] partitions the key space by exact
//! byte length and picks the cheapest storage for each length:
//!
//! | Tier | Key length | Storage |
//! |---|---|---|
//! | [`Tier::Unigram`] | 1 | dense array of 256 slots + presence flags |
//! | [`Tier::Bigram`] | 2 | dense array of 65536 slots + presence flags |
//! | [`Tier::Trigram`] | 3 | `HashMap<u32, V>` keyed by the dispersed packed key |
//! | [`Tier::Quadrigram`] | 4 | `HashMap<u32, V>` keyed by the dispersed packed key |
//! | [`Tier::Long`] | 5+ | `HashMap<Box<[u8]>, V>` keyed by the raw bytes |
//!
//! ## Example
//!
//! ```rust
//! use ngram_map::TieredNgramMap;
//!
//! let mut map: TieredNgramMap<u32> = TieredNgramMap::new();
//! map.insert(b"a", 10);
//! map.insert("é".as_bytes(), 20);
//! map.insert(b"abcde", 50);
//!
//! assert_eq!(map.get(b"a"), Some(10));
//! assert_eq!(map.get("é".as_bytes()), Some(20));
//! assert_eq!(map.get(b"abcdef"), None);
//! assert_eq!(map.len(), 3);
//! ```
//!
//! ## Concurrency
//!
//! The map has no internal locking. Writes take `&mut self` and reads take
//! `&self`, so the single-writer/multiple-reader discipline is enforced by the
//! borrow checker: load the map, then share it (by reference or `Arc`) with as
//! many reader threads as needed. Workloads that must interleave writes with
//! concurrent reads wrap the map in an external read-write lock.

use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;

use num_traits::Zero;

mod baseline;

pub use baseline::HashNgramMap;

// =============================================================================
// Configuration
// =============================================================================

const UNIGRAM_SLOTS: usize = 1 << 8;
const BIGRAM_SLOTS: usize = 1 << 16;

/// Multiplier applied to packed 3- and 4-byte keys (Knuth's multiplicative
/// hashing constant, `floor(2^32 / phi)`).
///
/// The multiplier is odd, so multiplication modulo `2^32` is a bijection: two
/// distinct packed keys never map to the same hashed-tier key.
pub const DISPERSION_PRIME: u32 = 2_654_435_761;

// =============================================================================
// Value bound and capability trait
// =============================================================================

/// Numeric values storable in an n-gram map.
///
/// Values are stored by copy and need a zero, which fills unused dense slots
/// and is what [`TieredNgramMap::get_or_zero`] returns for absent keys. Zero is
/// still a valid stored value: presence is tracked separately.
pub trait NgramValue: Copy + Zero {}

impl<T: Copy + Zero> NgramValue for T {}

/// The lookup capabilities shared by every n-gram map in this crate.
///
/// Benchmarks and loaders are written against this trait so that
/// [`TieredNgramMap`] and the [`HashNgramMap`] baseline are interchangeable.
///
/// All methods taking a key panic if the key is empty.
pub trait NgramMap<V> {
    /// Returns the value stored for `key`, or `None` if it was never inserted.
    fn get(&self, key: &[u8]) -> Option<V>;

    /// Returns `true` if `key` has a value. Always agrees with [`NgramMap::get`].
    fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Stores `value` for `key`, returning the previous value if the key was
    /// already present. Updates never change [`NgramMap::len`].
    fn insert(&mut self, key: &[u8], value: V) -> Option<V>;

    /// Number of distinct keys stored.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Tier classification
// =============================================================================

/// Storage tier selected by a key's byte length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    /// 1-byte keys.
    Unigram,
    /// 2-byte keys.
    Bigram,
    /// 3-byte keys.
    Trigram,
    /// 4-byte keys.
    Quadrigram,
    /// Keys of 5 bytes or more.
    Long,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Unigram,
        Tier::Bigram,
        Tier::Trigram,
        Tier::Quadrigram,
        Tier::Long,
    ];

    /// Tier for `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is empty.
    #[inline]
    pub fn of(key: &[u8]) -> Tier {
        match key.len() {
            0 => empty_key(),
            1 => Tier::Unigram,
            2 => Tier::Bigram,
            3 => Tier::Trigram,
            4 => Tier::Quadrigram,
            _ => Tier::Long,
        }
    }
}

#[cold]
#[inline(never)]
fn empty_key() -> ! {
    panic!("n-gram keys must be at least one byte long")
}

#[inline]
pub(crate) fn check_key(key: &[u8]) {
    if key.is_empty() {
        empty_key();
    }
}

// =============================================================================
// Key transforms
// =============================================================================

// All packing is little endian: byte 0 of the key lands in the low-order bits.

#[inline]
fn bigram_index(key: &[u8]) -> usize {
    key[0] as usize | (key[1] as usize) << 8
}

#[inline]
fn trigram_key(key: &[u8]) -> u32 {
    let packed = key[0] as u32 | (key[1] as u32) << 8 | (key[2] as u32) << 16;
    packed.wrapping_mul(DISPERSION_PRIME)
}

#[inline]
fn quadrigram_key(key: &[u8]) -> u32 {
    u32::from_le_bytes([key[0], key[1], key[2], key[3]]).wrapping_mul(DISPERSION_PRIME)
}

// =============================================================================
// Dense tier
// =============================================================================

/// Direct-indexed slots with a parallel presence array.
#[derive(Clone)]
struct DenseTier<V> {
    values: Box<[V]>,
    present: Box<[bool]>,
}

impl<V: NgramValue> DenseTier<V> {
    fn new(slots: usize) -> Self {
        Self {
            values: vec![V::zero(); slots].into_boxed_slice(),
            present: vec![false; slots].into_boxed_slice(),
        }
    }

    #[inline]
    fn get(&self, idx: usize) -> Option<V> {
        if self.present[idx] {
            Some(self.values[idx])
        } else {
            None
        }
    }

    #[inline]
    fn insert(&mut self, idx: usize, value: V) -> Option<V> {
        let old = self.get(idx);
        self.values[idx] = value;
        self.present[idx] = true;
        old
    }

    /// Linear scan of the presence flags.
    fn count(&self) -> usize {
        self.present.iter().filter(|&&set| set).count()
    }

    fn memory_usage(&self) -> usize {
        self.values.len() * std::mem::size_of::<V>() + self.present.len()
    }
}

// =============================================================================
// TieredNgramMap
// =============================================================================

/// Per-tier entry counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TierStats {
    pub unigrams: usize,
    pub bigrams: usize,
    pub trigrams: usize,
    pub quadrigrams: usize,
    pub long: usize,
}

impl TierStats {
    pub fn total(&self) -> usize {
        self.unigrams + self.bigrams + self.trigrams + self.quadrigrams + self.long
    }
}

/// A map from non-empty byte n-grams to numeric values, tiered by key length.
///
/// Lookups for 1- and 2-byte keys are a single array index. 3- and 4-byte keys
/// are packed into a `u32`, multiplied by [`DISPERSION_PRIME`] and looked up in
/// a `u32`-keyed hash map. Longer keys go to a byte-keyed hash map with no
/// length limit.
///
/// Both dense tiers are allocated in full at construction (about
/// `65792 * (size_of::<V>() + 1)` bytes). `S` is the hasher used by the three
/// hashed tiers.
///
/// # Concurrency
///
/// There is no internal synchronization. Any number of threads may call
/// [`get`](Self::get), [`contains_key`](Self::contains_key) and
/// [`len`](Self::len) through a shared reference, provided no
/// [`insert`](Self::insert) runs at the same time; safe Rust guarantees this,
/// since `insert` needs `&mut self`. Callers that must interleave writes with
/// concurrent reads put the map behind a read-write lock.
///
/// # Panics
///
/// Every operation taking a key panics if the key is empty.
#[derive(Clone)]
pub struct TieredNgramMap<V, S = RandomState> {
    unigrams: DenseTier<V>,
    bigrams: DenseTier<V>,
    trigrams: HashMap<u32, V, S>,
    quadrigrams: HashMap<u32, V, S>,
    long: HashMap<Box<[u8]>, V, S>,
}

impl<V: NgramValue> TieredNgramMap<V, RandomState> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a map whose long-key tier (5+ bytes) is pre-sized for
    /// `long_capacity` entries. The hint only affects allocation; longer or
    /// more numerous keys are accepted regardless.
    pub fn with_capacity(long_capacity: usize) -> Self {
        Self::with_capacity_and_hasher(long_capacity, RandomState::new())
    }
}

impl<V: NgramValue, S: BuildHasher + Clone> TieredNgramMap<V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(long_capacity: usize, hasher: S) -> Self {
        Self {
            unigrams: DenseTier::new(UNIGRAM_SLOTS),
            bigrams: DenseTier::new(BIGRAM_SLOTS),
            trigrams: HashMap::with_hasher(hasher.clone()),
            quadrigrams: HashMap::with_hasher(hasher.clone()),
            long: HashMap::with_capacity_and_hasher(long_capacity, hasher),
        }
    }
}

impl<V: NgramValue, S: BuildHasher> TieredNgramMap<V, S> {
    #[inline]
    pub fn get(&self, key: &[u8]) -> Option<V> {
        match Tier::of(key) {
            Tier::Unigram => self.unigrams.get(key[0] as usize),
            Tier::Bigram => self.bigrams.get(bigram_index(key)),
            Tier::Trigram => self.trigrams.get(&trigram_key(key)).copied(),
            Tier::Quadrigram => self.quadrigrams.get(&quadrigram_key(key)).copied(),
            Tier::Long => self.long.get(key).copied(),
        }
    }

    /// Like [`get`](Self::get), but returns zero for absent keys.
    #[inline]
    pub fn get_or_zero(&self, key: &[u8]) -> V {
        self.get(key).unwrap_or_else(V::zero)
    }

    #[inline]
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Stores `value` for `key`. Returns the previous value if the key was
    /// already present, in which case [`len`](Self::len) is unchanged.
    pub fn insert(&mut self, key: &[u8], value: V) -> Option<V> {
        match Tier::of(key) {
            Tier::Unigram => self.unigrams.insert(key[0] as usize, value),
            Tier::Bigram => self.bigrams.insert(bigram_index(key), value),
            Tier::Trigram => self.trigrams.insert(trigram_key(key), value),
            Tier::Quadrigram => self.quadrigrams.insert(quadrigram_key(key), value),
            Tier::Long => {
                // Avoid allocating a boxed key on update.
                if let Some(slot) = self.long.get_mut(key) {
                    return Some(std::mem::replace(slot, value));
                }
                self.long.insert(key.into(), value)
            }
        }
    }

    /// Number of distinct keys stored.
    ///
    /// This is not O(1): it scans the presence flags of both dense tiers
    /// (256 + 65536 slots), which dominates the cost, then adds the sizes of
    /// the hashed tiers.
    pub fn len(&self) -> usize {
        self.tier_stats().total()
    }

    pub fn is_empty(&self) -> bool {
        self.trigrams.is_empty()
            && self.quadrigrams.is_empty()
            && self.long.is_empty()
            && !self.unigrams.present.contains(&true)
            && !self.bigrams.present.contains(&true)
    }

    /// Number of entries stored in `tier`.
    pub fn tier_len(&self, tier: Tier) -> usize {
        match tier {
            Tier::Unigram => self.unigrams.count(),
            Tier::Bigram => self.bigrams.count(),
            Tier::Trigram => self.trigrams.len(),
            Tier::Quadrigram => self.quadrigrams.len(),
            Tier::Long => self.long.len(),
        }
    }

    pub fn tier_stats(&self) -> TierStats {
        TierStats {
            unigrams: self.unigrams.count(),
            bigrams: self.bigrams.count(),
            trigrams: self.trigrams.len(),
            quadrigrams: self.quadrigrams.len(),
            long: self.long.len(),
        }
    }

    /// Approximate heap bytes held by the map.
    pub fn memory_usage(&self) -> usize {
        let hashed_entry = std::mem::size_of::<(u32, V)>() + 1;
        let long_entry = std::mem::size_of::<(Box<[u8]>, V)>() + 1;
        let long_keys: usize = self.long.keys().map(|k| k.len()).sum();

        self.unigrams.memory_usage()
            + self.bigrams.memory_usage()
            + (self.trigrams.capacity() + self.quadrigrams.capacity()) * hashed_entry
            + self.long.capacity() * long_entry
            + long_keys
    }

    /// Shrinks the hashed tiers. The dense tiers are fixed-size.
    pub fn shrink_to_fit(&mut self) {
        self.trigrams.shrink_to_fit();
        self.quadrigrams.shrink_to_fit();
        self.long.shrink_to_fit();
    }
}

impl<V: NgramValue> Default for TieredNgramMap<V, RandomState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: NgramValue, S: BuildHasher> fmt::Debug for TieredNgramMap<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TieredNgramMap")
            .field("tiers", &self.tier_stats())
            .finish_non_exhaustive()
    }
}

impl<V: NgramValue, S: BuildHasher> NgramMap<V> for TieredNgramMap<V, S> {
    #[inline]
    fn get(&self, key: &[u8]) -> Option<V> {
        TieredNgramMap::get(self, key)
    }

    #[inline]
    fn contains_key(&self, key: &[u8]) -> bool {
        TieredNgramMap::contains_key(self, key)
    }

    fn insert(&mut self, key: &[u8], value: V) -> Option<V> {
        TieredNgramMap::insert(self, key, value)
    }

    fn len(&self) -> usize {
        TieredNgramMap::len(self)
    }

    fn is_empty(&self) -> bool {
        TieredNgramMap::is_empty(self)
    }
}

impl<K: AsRef<[u8]>, V: NgramValue, S: BuildHasher> Extend<(K, V)> for TieredNgramMap<V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key.as_ref(), value);
        }
    }
}

impl<K: AsRef<[u8]>, V: NgramValue, S: BuildHasher + Clone + Default> FromIterator<(K, V)>
    for TieredNgramMap<V, S>
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end() {
        let mut m: TieredNgramMap<i64> = TieredNgramMap::new();
        m.insert(b"a", 10);
        m.insert(b"ab", 20);
        m.insert(b"abc", 30);
        m.insert(b"abcd", 40);
        m.insert(b"abcde", 50);

        assert_eq!(m.len(), 5);
        assert_eq!(m.get(b"a"), Some(10));
        assert_eq!(m.get(b"abc"), Some(30));
        assert_eq!(m.get(b"abcdef"), None);
        assert_eq!(m.get_or_zero(b"abcdef"), 0);

        assert_eq!(m.insert(b"a", 99), Some(10));
        assert_eq!(m.len(), 5);
        assert_eq!(m.get(b"a"), Some(99));
    }

    #[test]
    fn test_absent_before_insert() {
        let m: TieredNgramMap<u32> = TieredNgramMap::new();
        for key in [&b"x"[..], b"xy", b"xyz", b"wxyz", b"vwxyz", b"a much longer key"] {
            assert_eq!(m.get(key), None);
            assert!(!m.contains_key(key));
            assert_eq!(m.get_or_zero(key), 0);
        }
        assert_eq!(m.len(), 0);
        assert!(m.is_empty());
    }

    #[test]
    fn test_zero_is_a_stored_value() {
        let mut m: TieredNgramMap<u64> = TieredNgramMap::new();
        m.insert(b"z", 0);
        m.insert(b"zz", 0);
        assert_eq!(m.get(b"z"), Some(0));
        assert_eq!(m.get(b"zz"), Some(0));
        assert!(m.contains_key(b"z"));
        assert!(!m.contains_key(b"y"));
        assert!(!m.is_empty());
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn test_tier_boundaries() {
        let mut m: TieredNgramMap<u32> = TieredNgramMap::new();
        let keys: [&[u8]; 5] = [b"a", b"aa", b"aaa", b"aaaa", b"aaaaa"];
        for (i, key) in keys.iter().enumerate() {
            m.insert(key, i as u32 + 1);
        }

        for (key, tier) in keys.iter().zip(Tier::ALL) {
            assert_eq!(Tier::of(key), tier);
            assert_eq!(m.tier_len(tier), 1, "tier {:?}", tier);
        }
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(m.get(key), Some(i as u32 + 1));
        }
        assert_eq!(
            m.tier_stats(),
            TierStats {
                unigrams: 1,
                bigrams: 1,
                trigrams: 1,
                quadrigrams: 1,
                long: 1,
            }
        );
    }

    #[test]
    fn test_same_bytes_different_lengths_do_not_collide() {
        let mut m: TieredNgramMap<u32> = TieredNgramMap::new();
        // Zero bytes pack to the same integer at every length.
        m.insert(&[0], 1);
        m.insert(&[0, 0], 2);
        m.insert(&[0, 0, 0], 3);
        m.insert(&[0, 0, 0, 0], 4);
        m.insert(&[0, 0, 0, 0, 0], 5);
        assert_eq!(m.get(&[0]), Some(1));
        assert_eq!(m.get(&[0, 0]), Some(2));
        assert_eq!(m.get(&[0, 0, 0]), Some(3));
        assert_eq!(m.get(&[0, 0, 0, 0]), Some(4));
        assert_eq!(m.get(&[0, 0, 0, 0, 0]), Some(5));
        assert_eq!(m.get(&[0, 0, 0, 0, 0, 0]), None);
        assert_eq!(m.len(), 5);
    }

    #[test]
    fn test_byte_order_matters() {
        let mut m: TieredNgramMap<u32> = TieredNgramMap::new();
        m.insert(b"ab", 1);
        m.insert(b"abc", 2);
        m.insert(b"abcd", 3);
        assert_eq!(m.get(b"ba"), None);
        assert_eq!(m.get(b"cba"), None);
        assert_eq!(m.get(b"dcba"), None);
        assert_eq!(bigram_index(b"ab"), 0x6261);
        assert_eq!(trigram_key(b"abc"), 0x0063_6261u32.wrapping_mul(DISPERSION_PRIME));
        assert_eq!(quadrigram_key(b"abcd"), 0x6463_6261u32.wrapping_mul(DISPERSION_PRIME));
    }

    #[test]
    fn test_multibyte_characters() {
        let mut m: TieredNgramMap<u32> = TieredNgramMap::new();
        let cases = [
            ("a", Tier::Unigram),
            ("é", Tier::Bigram),
            ("中", Tier::Trigram),
            ("😀", Tier::Quadrigram),
            ("αβγ", Tier::Long),
        ];
        for (i, (s, tier)) in cases.iter().enumerate() {
            assert_eq!(Tier::of(s.as_bytes()), *tier, "{s}");
            m.insert(s.as_bytes(), i as u32);
        }
        for tier in Tier::ALL {
            assert_eq!(m.tier_len(tier), 1);
        }
        for (i, (s, _)) in cases.iter().enumerate() {
            assert_eq!(m.get(s.as_bytes()), Some(i as u32));
        }
    }

    #[test]
    fn test_repeated_characters_up_to_seven() {
        let chars = [
            'a', 'b', 'c', '中', '文', 'α', 'β', 'γ', '😀', '😃', '😄', 'न', 'प', 'é', 'ñ', '𐍈',
        ];
        let mut m: TieredNgramMap<f64> = TieredNgramMap::new();
        let mut total = 0;

        for (ci, c) in chars.iter().enumerate() {
            for n in 1..=7 {
                let key = c.to_string().repeat(n);
                assert!(!m.contains_key(key.as_bytes()), "{key:?} present too early");
                let value = (ci * 10 + n) as f64 * 0.5;
                assert_eq!(m.insert(key.as_bytes(), value), None);
                total += 1;
                assert_eq!(m.get(key.as_bytes()), Some(value));
                assert_eq!(m.len(), total);
            }
        }

        assert_eq!(m.insert(b"aaa", -1.0), Some(1.5));
        assert_eq!(m.len(), total);
        assert_eq!(m.get(b"aaa"), Some(-1.0));
        assert_eq!(m.get(b"nonexistent"), None);
    }

    #[test]
    fn test_every_dense_slot() {
        let mut m: TieredNgramMap<u32> = TieredNgramMap::new();
        for b in 0..=255u8 {
            m.insert(&[b], b as u32);
        }
        for i in 0..BIGRAM_SLOTS {
            let key = (i as u16).to_le_bytes();
            m.insert(&key, i as u32);
        }
        assert_eq!(m.tier_len(Tier::Unigram), UNIGRAM_SLOTS);
        assert_eq!(m.tier_len(Tier::Bigram), BIGRAM_SLOTS);
        assert_eq!(m.len(), UNIGRAM_SLOTS + BIGRAM_SLOTS);
        assert_eq!(m.get(&[0xff]), Some(255));
        assert_eq!(m.get(&[0x34, 0x12]), Some(0x1234));
    }

    #[test]
    fn test_long_keys_ignore_capacity_hint() {
        let mut m: TieredNgramMap<u16> = TieredNgramMap::with_capacity(1);
        let key = vec![b'q'; 4096];
        m.insert(&key, 7);
        m.insert(b"fivef", 5);
        m.insert(b"sixsix", 6);
        assert_eq!(m.get(&key), Some(7));
        assert_eq!(m.get(&key[..4095]), None);
        assert_eq!(m.tier_len(Tier::Long), 3);
    }

    #[test]
    #[should_panic(expected = "at least one byte")]
    fn test_empty_key_insert_panics() {
        let mut m: TieredNgramMap<u32> = TieredNgramMap::new();
        m.insert(b"", 1);
    }

    #[test]
    #[should_panic(expected = "at least one byte")]
    fn test_empty_key_get_panics() {
        let m: TieredNgramMap<u32> = TieredNgramMap::new();
        m.get(b"");
    }

    #[test]
    fn test_extend_and_collect() {
        let pairs = vec![("a", 1u32), ("bc", 2), ("def", 3), ("ghij", 4), ("klmno", 5), ("a", 6)];
        let m: TieredNgramMap<u32> = pairs.iter().copied().collect();
        assert_eq!(m.len(), 5);
        assert_eq!(m.get(b"a"), Some(6));
        assert_eq!(m.get(b"klmno"), Some(5));

        let mut m2: TieredNgramMap<u32> = TieredNgramMap::new();
        m2.extend(pairs.into_iter().map(|(k, v)| (k.to_string(), v)));
        assert_eq!(m2.tier_stats(), m.tier_stats());
    }

    #[test]
    fn test_clone_and_debug() {
        let mut m: TieredNgramMap<u8> = TieredNgramMap::new();
        m.insert(b"abc", 1);
        let c = m.clone();
        m.insert(b"abc", 2);
        assert_eq!(c.get(b"abc"), Some(1));
        assert_eq!(m.get(b"abc"), Some(2));
        assert!(format!("{:?}", c).contains("trigrams: 1"));
    }

    #[test]
    fn test_memory_usage_and_shrink() {
        let mut m: TieredNgramMap<u32> = TieredNgramMap::new();
        let base = m.memory_usage();
        assert!(base >= (UNIGRAM_SLOTS + BIGRAM_SLOTS) * 5);
        for i in 0..1000u32 {
            m.insert(format!("k{:04}", i).as_bytes(), i);
        }
        assert!(m.memory_usage() > base);
        m.shrink_to_fit();
        assert_eq!(m.len(), 1000);
        assert_eq!(m.get(b"k0999"), Some(999));
    }

    #[test]
    fn test_trait_object_dispatch() {
        let mut maps: Vec<Box<dyn NgramMap<u32>>> = vec![
            Box::new(TieredNgramMap::<u32>::new()),
            Box::new(HashNgramMap::<u32>::new()),
        ];
        for m in maps.iter_mut() {
            assert!(m.is_empty());
            for (i, key) in [&b"a"[..], b"ab", b"abc", b"abcd", b"abcde"].iter().enumerate() {
                assert_eq!(m.insert(key, i as u32), None);
            }
            assert_eq!(m.insert(b"ab", 9), Some(1));
            assert_eq!(m.len(), 5);
            assert!(m.contains_key(b"abcd"));
            assert!(!m.contains_key(b"abcdef"));
        }
    }

    #[test]
    fn test_randomized_against_hashmap() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(3);
        let mut t: TieredNgramMap<u64> = TieredNgramMap::new();
        let mut m: HashMap<Vec<u8>, u64> = HashMap::new();

        for _ in 0..50_000 {
            let len = match rng.gen_range(0..10) {
                0..=3 => rng.gen_range(1..=2),
                4..=7 => rng.gen_range(3..=4),
                _ => rng.gen_range(5..=9),
            };
            // Narrow alphabet so updates are frequent.
            let key: Vec<u8> = (0..len).map(|_| rng.gen_range(b'a'..=b'f')).collect();

            if rng.gen_bool(0.6) {
                let v: u64 = rng.gen();
                assert_eq!(t.insert(&key, v), m.insert(key, v));
            } else {
                assert_eq!(t.get(&key), m.get(&key).copied());
                assert_eq!(t.contains_key(&key), m.contains_key(&key));
            }
        }

        assert_eq!(t.len(), m.len());
        for (k, v) in &m {
            assert_eq!(t.get(k), Some(*v));
        }
    }

    #[test]
    fn test_concurrent_readers() {
        const ENTRIES: usize = 100;
        const READERS: usize = 20;
        const ITERATIONS: usize = 1000;

        // One key family per tier: "7", "42", "k07", "k007", "key07".
        let reference: Vec<(String, u32)> = (0..ENTRIES)
            .flat_map(|i| {
                [
                    i.to_string(),
                    format!("k{i:02}"),
                    format!("k{i:03}"),
                    format!("key{i:02}"),
                ]
                .into_iter()
                .zip(0u32..)
                .map(move |(key, family)| (key, i as u32 * 4 + family))
            })
            .collect();

        let mut m: TieredNgramMap<u32> = TieredNgramMap::new();
        for (key, value) in &reference {
            assert_eq!(m.insert(key.as_bytes(), *value), None);
        }
        let expected_len = reference.len();

        std::thread::scope(|s| {
            for reader in 0..READERS {
                let m = &m;
                let reference = &reference;
                s.spawn(move || {
                    for j in 0..ITERATIONS {
                        assert_eq!(m.len(), expected_len, "reader {reader}");
                        let (key, value) = &reference[(j + reader) % reference.len()];
                        assert_eq!(m.get(key.as_bytes()), Some(*value), "reader {reader} key {key:?}");
                        assert!(m.contains_key(key.as_bytes()));
                        assert!(!m.contains_key(b"absent key"));
                    }
                });
            }
        });
    }
}

#[cfg(test)]
mod proptests;
