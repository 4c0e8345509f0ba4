use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;

fn validate_map<V: NgramValue, S: BuildHasher>(t: &TieredNgramMap<V, S>) {
    let stats = t.tier_stats();
    assert_eq!(stats.total(), t.len(), "tier counts must sum to len");
    for tier in Tier::ALL {
        let expected = match tier {
            Tier::Unigram => stats.unigrams,
            Tier::Bigram => stats.bigrams,
            Tier::Trigram => stats.trigrams,
            Tier::Quadrigram => stats.quadrigrams,
            Tier::Long => stats.long,
        };
        assert_eq!(t.tier_len(tier), expected);
    }
    assert!(stats.unigrams <= UNIGRAM_SLOTS);
    assert!(stats.bigrams <= BIGRAM_SLOTS);
    assert_eq!(t.is_empty(), t.len() == 0);
}

fn key_strategy() -> BoxedStrategy<Vec<u8>> {
    // Mostly a four-letter alphabet so that keys repeat and updates happen;
    // the occasional arbitrary byte covers the full dense-tier range.
    let byte = prop_oneof![3 => 0u8..4, 1 => any::<u8>()];
    prop_oneof![
        4 => prop::collection::vec(byte.clone(), 1..=2),
        3 => prop::collection::vec(byte.clone(), 3..=4),
        2 => prop::collection::vec(byte, 5..=9),
    ]
    .boxed()
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Insert(#[proptest(strategy = "key_strategy()")] Vec<u8>, u32),
    #[proptest(weight = 4)]
    Get(#[proptest(strategy = "key_strategy()")] Vec<u8>),
    #[proptest(weight = 1)]
    Len,
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_u32(ops in prop::collection::vec(any::<Op>(), 0..=1000)) {
        let mut t: TieredNgramMap<u32> = TieredNgramMap::new();
        let mut m: HashMap<Vec<u8>, u32> = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let old_t = t.insert(&key, value);
                    let old_m = m.insert(key, value);
                    prop_assert_eq!(old_t, old_m);
                }
                Op::Get(key) => {
                    let got_t = t.get(&key);
                    let got_m = m.get(key.as_slice()).copied();
                    prop_assert_eq!(got_t, got_m);
                    prop_assert_eq!(t.contains_key(&key), got_m.is_some());
                    prop_assert_eq!(t.get_or_zero(&key), got_m.unwrap_or(0));
                }
                Op::Len => {
                    prop_assert_eq!(t.len(), m.len());
                }
            }
        }

        validate_map(&t);
        prop_assert_eq!(t.len(), m.len());
        for (key, value) in &m {
            prop_assert_eq!(t.get(key), Some(*value));
        }
    }

    #[test]
    fn prop_tiered_matches_baseline(
        pairs in prop::collection::vec((key_strategy(), any::<i64>()), 0..=500),
    ) {
        let mut t: TieredNgramMap<i64> = TieredNgramMap::with_capacity(pairs.len());
        let mut b: HashNgramMap<i64> = HashNgramMap::with_capacity(pairs.len());

        for (key, value) in &pairs {
            prop_assert_eq!(t.insert(key, *value), b.insert(key, *value));
        }

        validate_map(&t);
        prop_assert_eq!(t.len(), b.len());
        for (key, _) in &pairs {
            prop_assert_eq!(t.get(key), b.get(key));
            let tier = Tier::of(key);
            prop_assert!(t.tier_len(tier) > 0);
        }
    }

    #[test]
    fn prop_dispersion_is_injective(a in any::<[u8; 4]>(), b in any::<[u8; 4]>()) {
        prop_assume!(a != b);
        prop_assert_ne!(quadrigram_key(&a), quadrigram_key(&b));
        if a[..3] != b[..3] {
            prop_assert_ne!(trigram_key(&a[..3]), trigram_key(&b[..3]));
        }
    }
}

#[test]
fn exhaustive_trigram_prefixes_round_trip() {
    // Every 3-byte key over a small alphabet, interleaved with its 4-byte
    // extensions, must stay distinct.
    let alphabet = [0u8, 1, b'a', 0x7f, 0x80, 0xff];
    let mut t: TieredNgramMap<u32> = TieredNgramMap::new();
    let mut expected = 0usize;

    for &x in &alphabet {
        for &y in &alphabet {
            for &z in &alphabet {
                let v = expected as u32;
                assert_eq!(t.insert(&[x, y, z], v), None);
                assert_eq!(t.insert(&[x, y, z, x], v + 1_000_000), None);
                expected += 1;
            }
        }
    }

    validate_map(&t);
    assert_eq!(t.tier_len(Tier::Trigram), expected);
    assert_eq!(t.tier_len(Tier::Quadrigram), expected);

    let mut i = 0u32;
    for &x in &alphabet {
        for &y in &alphabet {
            for &z in &alphabet {
                assert_eq!(t.get(&[x, y, z]), Some(i));
                assert_eq!(t.get(&[x, y, z, x]), Some(i + 1_000_000));
                i += 1;
            }
        }
    }
}
