//! N-gram frequency profiles.
//!
//! A [`Profile`] counts how often each character n-gram occurs across a set of
//! text samples. Its [`ranking`](Profile::ranking) of the most frequent
//! n-grams is what gets loaded into a map for lookup benchmarks.

use std::collections::HashMap;
use std::path::Path;

use ngram_map::NgramMap;
use num_traits::NumCast;

use crate::corpus;
use crate::errors::{BenchError, Result};
use crate::ngrams::ngrams;

/// Occurrence counts of the n-grams found in a set of text samples.
#[derive(Clone, Debug, Default)]
pub struct Profile {
    counts: HashMap<String, u64>,
    sizes: Vec<usize>,
}

impl Profile {
    /// An empty profile counting n-grams of the given character sizes.
    pub fn new(sizes: &[usize]) -> Self {
        Self {
            counts: HashMap::new(),
            sizes: sizes.to_vec(),
        }
    }

    /// Profile of every line in `lines`.
    pub fn from_lines<I, L>(lines: I, sizes: &[usize]) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let mut profile = Self::new(sizes);
        for line in lines {
            profile.add_text(line.as_ref());
        }
        profile
    }

    /// Profile of a corpus file with one sample per line.
    pub fn from_corpus(path: impl AsRef<Path>, sizes: &[usize]) -> Result<Self> {
        let path = path.as_ref();
        let lines = corpus::read_lines(path)?;
        if lines.is_empty() {
            return Err(BenchError::EmptyCorpus(path.to_path_buf()));
        }
        let profile = Self::from_lines(&lines, sizes);
        log::info!(
            "profiled {} lines of {}: {} distinct n-grams",
            lines.len(),
            path.display(),
            profile.len()
        );
        Ok(profile)
    }

    /// Counts the n-grams of one text sample.
    pub fn add_text(&mut self, text: &str) {
        for ngram in ngrams(text, &self.sizes) {
            match self.counts.get_mut(ngram) {
                Some(count) => *count += 1,
                None => {
                    self.counts.insert(ngram.to_owned(), 1);
                }
            }
        }
    }

    /// The n-gram sizes this profile counts.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of distinct n-grams seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if no n-gram has been seen.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Occurrences of `ngram`, zero if never seen.
    pub fn count(&self, ngram: &str) -> u64 {
        self.counts.get(ngram).copied().unwrap_or(0)
    }

    /// The `limit` most frequent n-grams, most frequent first.
    ///
    /// Equal counts are ordered by byte value so the ranking is deterministic.
    pub fn ranking(&self, limit: usize) -> Vec<&str> {
        let mut entries: Vec<(&str, u64)> =
            self.counts.iter().map(|(k, &v)| (k.as_str(), v)).collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(limit);
        entries.into_iter().map(|(ngram, _)| ngram).collect()
    }

    /// Inserts each n-gram of `ranking` into `map` with its frequency.
    ///
    /// Returns the number of n-grams inserted. Fails without inserting the
    /// offending entry if a frequency does not fit `V`.
    pub fn load_into<V, M, I, S>(&self, map: &mut M, ranking: I) -> Result<usize>
    where
        V: NumCast,
        M: NgramMap<V> + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut loaded = 0;
        for ngram in ranking {
            let ngram = ngram.as_ref();
            if ngram.is_empty() {
                log::warn!("skipping empty n-gram");
                continue;
            }
            let count = self.count(ngram);
            let value = V::from(count).ok_or_else(|| BenchError::ValueOverflow {
                ngram: ngram.to_owned(),
                count,
            })?;
            map.insert(ngram.as_bytes(), value);
            loaded += 1;
        }
        log::debug!("loaded {loaded} n-grams; map holds {} entries", map.len());
        Ok(loaded)
    }
}
