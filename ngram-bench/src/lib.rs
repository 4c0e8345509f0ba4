//! # ngram-bench
//!
//! Corpus plumbing and lookup benchmarks around [`ngram_map`].
//!
//! - [`ngrams`]: character n-gram extraction from text
//! - [`profile`]: n-gram frequency profiles, rankings and bulk loading
//! - [`corpus`]: corpus file reading and random line sampling
//! - [`shared`]: a read-write locked wrapper for interleaved writers and readers
//! - [`harness`]: the lookup benchmark comparing the tiered map to a plain hash map
//!
//! ## Example
//!
//! ```rust
//! use ngram_bench::Profile;
//! use ngram_map::TieredNgramMap;
//!
//! let profile = Profile::from_lines(["el perro", "el gato"], &[1, 2, 3]);
//! let ranking = profile.ranking(100);
//!
//! let mut map: TieredNgramMap<u32> = TieredNgramMap::new();
//! profile.load_into(&mut map, &ranking).unwrap();
//!
//! assert_eq!(map.get(b"el"), Some(2));
//! assert_eq!(map.len(), ranking.len());
//! ```

#![warn(missing_docs)]

pub mod corpus;
pub mod errors;
pub mod harness;
pub mod ngrams;
pub mod profile;
pub mod shared;

pub use errors::{BenchError, Result};
pub use harness::{run_lookup_benchmark, BenchConfig, BenchReport, HasherKind, Implementation};
pub use profile::Profile;
pub use shared::SharedNgramMap;
