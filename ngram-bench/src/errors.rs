//! # Error Types

use std::path::PathBuf;

/// Errors from corpus loading and benchmark runs.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// A corpus file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The corpus has no lines to profile or sample.
    #[error("corpus {} contains no lines", .0.display())]
    EmptyCorpus(PathBuf),

    /// The sampled lines yielded no n-grams to look up.
    #[error("sampled lines produced no n-grams of sizes {sizes:?}")]
    NoQueries {
        /// The requested n-gram sizes.
        sizes: Vec<usize>,
    },

    /// An n-gram frequency does not fit the map's value type.
    #[error("frequency {count} of n-gram {ngram:?} does not fit the map value type")]
    ValueOverflow {
        /// The n-gram being loaded.
        ngram: String,
        /// Its occurrence count.
        count: u64,
    },

    /// Report serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BenchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BenchError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for ngram-bench operations.
pub type Result<T> = std::result::Result<T, BenchError>;
