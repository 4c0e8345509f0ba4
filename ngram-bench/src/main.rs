//! Command-line runner for the n-gram lookup benchmark.
//!
//! ```text
//! ngram-bench --language spa-latn --gram-sizes 1,2,3 --implementation both
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use ngram_bench::{run_lookup_benchmark, BenchConfig, HasherKind, Implementation};

/// Which maps to measure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum ImplementationArg {
    Tiered,
    Hash,
    Both,
}

impl ImplementationArg {
    fn implementations(self) -> Vec<Implementation> {
        match self {
            ImplementationArg::Tiered => vec![Implementation::Tiered],
            ImplementationArg::Hash => vec![Implementation::Hash],
            ImplementationArg::Both => Implementation::ALL.to_vec(),
        }
    }
}

/// ngram-bench
#[derive(clap::Parser, Debug)]
#[command(about = "Time n-gram lookups against a language profile")]
struct Args {
    /// Corpus name; reads `<corpus-dir>/<language>.txt`.
    #[arg(long)]
    language: Option<String>,

    /// Directory holding the corpus files.
    #[arg(long)]
    corpus_dir: Option<PathBuf>,

    /// Comma-separated n-gram sizes, in characters.
    #[arg(long, value_delimiter = ',')]
    gram_sizes: Option<Vec<usize>>,

    /// Number of most frequent n-grams loaded into the map.
    #[arg(long)]
    ranking_size: Option<usize>,

    /// Number of random corpus lines to take lookups from.
    #[arg(long)]
    samples: Option<usize>,

    /// Minimum time spent looking up, in milliseconds.
    #[arg(long)]
    budget_ms: Option<u64>,

    /// Seed for line sampling.
    #[arg(long)]
    seed: Option<u64>,

    /// Use foldhash instead of SipHash for hashed storage.
    #[arg(long)]
    foldhash: bool,

    /// Map implementation(s) to measure.
    #[arg(long, value_enum, default_value_t = ImplementationArg::Both)]
    implementation: ImplementationArg,
}

impl Args {
    fn config(&self) -> BenchConfig {
        let defaults = BenchConfig::default();
        BenchConfig {
            language: self.language.clone().unwrap_or(defaults.language),
            corpus_dir: self.corpus_dir.clone().unwrap_or(defaults.corpus_dir),
            gram_sizes: self.gram_sizes.clone().unwrap_or(defaults.gram_sizes),
            ranking_size: self.ranking_size.unwrap_or(defaults.ranking_size),
            num_samples: self.samples.unwrap_or(defaults.num_samples),
            time_budget: self
                .budget_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.time_budget),
            seed: self.seed,
            hasher: if self.foldhash {
                HasherKind::Foldhash
            } else {
                HasherKind::Std
            },
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.config();
    log::debug!("{config:?}");

    for implementation in args.implementation.implementations() {
        let report = run_lookup_benchmark(&config, implementation)?;
        println!("{}", report.to_json()?);
    }

    Ok(())
}
