//! Corpus files: one text sample per line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rand::Rng;

use crate::errors::{BenchError, Result};

/// Reads every line of a UTF-8 text file, without line terminators.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| BenchError::io(path, e))?;
    let lines = BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .map_err(|e| BenchError::io(path, e))?;
    log::debug!("read {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Picks at most `n` distinct lines uniformly at random.
///
/// Returns all of `lines` (in their original order) when there are `n` or
/// fewer.
pub fn sample<R: Rng + ?Sized>(mut lines: Vec<String>, n: usize, rng: &mut R) -> Vec<String> {
    if lines.len() <= n {
        return lines;
    }
    rand::seq::index::sample(rng, lines.len(), n)
        .into_iter()
        .map(|i| std::mem::take(&mut lines[i]))
        .collect()
}

/// Reads at most `n` random lines from a corpus file.
pub fn sample_lines<R: Rng + ?Sized>(
    path: impl AsRef<Path>,
    n: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    Ok(sample(read_lines(path)?, n, rng))
}
