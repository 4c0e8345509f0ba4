//! Lookup benchmark: tiered map vs. a plain hash map.
//!
//! For one language corpus, the harness
//!
//! 1. builds an n-gram frequency [`Profile`] from the corpus,
//! 2. loads the `ranking_size` most frequent n-grams into the map under test,
//! 3. samples `num_samples` random lines and extracts their n-grams, and
//! 4. looks every extracted n-gram up, over and over, until the time budget is
//!    spent.
//!
//! The result is reported as time per lookup.

use std::fmt;
use std::hash::BuildHasher;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use ngram_map::{HashNgramMap, NgramMap, TieredNgramMap};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::corpus;
use crate::errors::{BenchError, Result};
use crate::ngrams::collect_ngrams;
use crate::profile::Profile;

/// Map implementations the harness can measure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Implementation {
    /// [`TieredNgramMap`].
    Tiered,
    /// [`HashNgramMap`], a single hash map over all keys.
    Hash,
}

impl Implementation {
    /// Every implementation, baseline first.
    pub const ALL: [Implementation; 2] = [Implementation::Hash, Implementation::Tiered];

    /// Human-readable name used in reports.
    pub fn name(self) -> &'static str {
        match self {
            Implementation::Tiered => "N-grams tiered map",
            Implementation::Hash => "std HashMap",
        }
    }
}

impl fmt::Display for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hasher used by the hashed storage of both maps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HasherKind {
    /// `std`'s SipHash-based `RandomState`.
    #[default]
    Std,
    /// `foldhash::fast::RandomState`.
    Foldhash,
}

/// Configuration for a benchmark run.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Corpus name; the corpus is read from `<corpus_dir>/<language>.txt`.
    pub language: String,
    /// Directory holding the corpus files.
    pub corpus_dir: PathBuf,
    /// N-gram sizes, in characters.
    pub gram_sizes: Vec<usize>,
    /// How many of the most frequent n-grams to load into the map.
    pub ranking_size: usize,
    /// How many random corpus lines to draw lookup queries from.
    pub num_samples: usize,
    /// Minimum total time spent in lookups.
    pub time_budget: Duration,
    /// Seed for line sampling; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Hasher for the hashed storage.
    pub hasher: HasherKind,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            language: "spa-latn".to_string(),
            corpus_dir: PathBuf::from("corpora"),
            gram_sizes: vec![1, 2, 3],
            ranking_size: 30_000,
            num_samples: 50,
            time_budget: Duration::from_secs(20),
            seed: None,
            hasher: HasherKind::Std,
        }
    }
}

impl BenchConfig {
    /// Path of the corpus file for [`BenchConfig::language`].
    pub fn corpus_path(&self) -> PathBuf {
        self.corpus_dir.join(format!("{}.txt", self.language))
    }
}

/// Outcome of one benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchReport {
    /// [`Implementation::name`] of the measured map.
    pub implementation: String,
    /// Corpus name.
    pub language: String,
    /// N-gram sizes, in characters.
    pub gram_sizes: Vec<usize>,
    /// Requested number of ranked n-grams.
    #[serde(rename = "ngramsRankingSize")]
    pub ranking_size: usize,
    /// Entries actually loaded into the map.
    pub entries: usize,
    /// Total lookups performed.
    pub lookups: u64,
    /// Lookups that found a value.
    pub hits: u64,
    /// Mean time per lookup in nanoseconds.
    pub time_per_lookup_ns: u64,
    /// Mean time per lookup, formatted.
    pub time_per_lookup_str: String,
}

impl BenchReport {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Totals of a timed lookup loop.
#[derive(Debug, Clone, Copy, Default)]
struct LookupTiming {
    elapsed: Duration,
    lookups: u64,
    hits: u64,
}

impl LookupTiming {
    fn per_lookup(&self) -> Duration {
        if self.lookups == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos((self.elapsed.as_nanos() / self.lookups as u128) as u64)
    }
}

/// Runs the lookup benchmark for `implementation`.
pub fn run_lookup_benchmark(config: &BenchConfig, implementation: Implementation) -> Result<BenchReport> {
    let path = config.corpus_path();
    let lines = corpus::read_lines(&path)?;
    if lines.is_empty() {
        return Err(BenchError::EmptyCorpus(path));
    }

    let profile = Profile::from_lines(&lines, &config.gram_sizes);
    let ranking = profile.ranking(config.ranking_size);
    log::info!(
        "{}: {} distinct n-grams, loading top {}",
        config.language,
        profile.len(),
        ranking.len()
    );

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let samples = corpus::sample(lines, config.num_samples, &mut rng);
    let queries: Vec<String> = samples
        .iter()
        .flat_map(|line| collect_ngrams(line, &config.gram_sizes))
        .collect();
    if queries.is_empty() {
        return Err(BenchError::NoQueries {
            sizes: config.gram_sizes.clone(),
        });
    }
    log::debug!("{} sampled lines yield {} queries", samples.len(), queries.len());

    let (entries, timing) = match config.hasher {
        HasherKind::Std => measure(
            implementation,
            std::collections::hash_map::RandomState::new(),
            &profile,
            &ranking,
            &queries,
            config.time_budget,
        )?,
        HasherKind::Foldhash => measure(
            implementation,
            foldhash::fast::RandomState::default(),
            &profile,
            &ranking,
            &queries,
            config.time_budget,
        )?,
    };

    let per_lookup = timing.per_lookup();
    log::info!(
        "{implementation}: {} lookups in {:?} ({:?}/lookup, {} hits)",
        timing.lookups,
        timing.elapsed,
        per_lookup,
        timing.hits
    );

    Ok(BenchReport {
        implementation: implementation.name().to_string(),
        language: config.language.clone(),
        gram_sizes: config.gram_sizes.clone(),
        ranking_size: config.ranking_size,
        entries,
        lookups: timing.lookups,
        hits: timing.hits,
        time_per_lookup_ns: per_lookup.as_nanos() as u64,
        time_per_lookup_str: format!("{per_lookup:?}"),
    })
}

fn measure<S: BuildHasher + Clone>(
    implementation: Implementation,
    hasher: S,
    profile: &Profile,
    ranking: &[&str],
    queries: &[String],
    budget: Duration,
) -> Result<(usize, LookupTiming)> {
    match implementation {
        Implementation::Tiered => {
            let mut map: TieredNgramMap<u64, S> =
                TieredNgramMap::with_capacity_and_hasher(ranking.len(), hasher);
            profile.load_into(&mut map, ranking)?;
            Ok((map.len(), time_lookups(&map, queries, budget)))
        }
        Implementation::Hash => {
            let mut map: HashNgramMap<u64, S> =
                HashNgramMap::with_capacity_and_hasher(ranking.len(), hasher);
            profile.load_into(&mut map, ranking)?;
            Ok((map.len(), time_lookups(&map, queries, budget)))
        }
    }
}

fn time_lookups<M: NgramMap<u64>>(map: &M, queries: &[String], budget: Duration) -> LookupTiming {
    let mut timing = LookupTiming::default();
    let mut checksum = 0u64;

    // Always at least one full pass.
    loop {
        let start = Instant::now();
        for query in queries {
            if let Some(v) = map.get(query.as_bytes()) {
                timing.hits += 1;
                checksum = checksum.wrapping_add(v);
            }
        }
        timing.elapsed += start.elapsed();
        timing.lookups += queries.len() as u64;
        if timing.elapsed >= budget {
            break;
        }
    }

    std::hint::black_box(checksum);
    timing
}
