//! Basic usage examples for ngram-map and ngram-bench.

use std::sync::Arc;
use std::thread;

use ngram_bench::{Profile, SharedNgramMap};
use ngram_map::{Tier, TieredNgramMap};

const SAMPLES: &[&str] = &[
    "el niño come pan",
    "la niña bebe agua",
    "el año que viene",
    "中文也可以",
];

fn main() {
    example_tiered_map();
    example_load_then_share();
    example_shared_writer();
}

fn example_tiered_map() {
    println!("=== TieredNgramMap ===\n");

    let mut map: TieredNgramMap<u32> = TieredNgramMap::new();
    for key in ["a", "ñ", "中", "niño", "corazón"] {
        map.insert(key.as_bytes(), key.chars().count() as u32);
        println!("{key:>8} -> {:?} ({} bytes)", Tier::of(key.as_bytes()), key.len());
    }

    println!("niño = {:?}", map.get("niño".as_bytes()));
    println!("missing = {:?}", map.get(b"missing"));
    println!("{:?}\n", map.tier_stats());
}

fn example_load_then_share() {
    println!("=== Load, then share with readers ===\n");

    let profile = Profile::from_lines(SAMPLES, &[1, 2, 3]);
    let ranking = profile.ranking(200);
    let mut map: TieredNgramMap<u64> = TieredNgramMap::with_capacity(ranking.len());
    profile
        .load_into(&mut map, &ranking)
        .expect("counts fit in u64");

    // Loading is over: readers share the map without any lock.
    let map = Arc::new(map);
    let handles: Vec<_> = (0..4)
        .map(|id| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                let hits = ["el", "ni", "ñ", "zzz"]
                    .iter()
                    .filter(|k| map.contains_key(k.as_bytes()))
                    .count();
                println!("reader {id}: {hits}/4 hits, len {}", map.len());
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("reader panicked");
    }
    println!();
}

fn example_shared_writer() {
    println!("=== SharedNgramMap (writes interleaved with reads) ===\n");

    let shared = Arc::new(SharedNgramMap::new(TieredNgramMap::<u32>::new()));
    let writer = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || {
            for (i, sample) in SAMPLES.iter().enumerate() {
                shared.insert(sample.as_bytes(), i as u32);
            }
        })
    };
    writer.join().expect("writer panicked");

    let map = Arc::try_unwrap(shared)
        .map(SharedNgramMap::into_inner)
        .unwrap_or_else(|_| unreachable!("writer has finished"));
    println!("Count: {}", map.len());
}
