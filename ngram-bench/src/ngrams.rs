//! Character n-gram extraction.
//!
//! N-gram sizes count Unicode scalar values, not bytes: the 1-gram `"中"` is
//! three bytes long once used as a map key. Sizes of zero are ignored.

/// Number of n-grams of the given sizes in `text`.
///
/// Sizes longer than the text contribute nothing. Repeated sizes are counted
/// once per occurrence, matching [`ngrams`].
pub fn ngram_count(text: &str, sizes: &[usize]) -> usize {
    let chars = text.chars().count();
    sizes
        .iter()
        .filter(|&&size| size > 0 && size <= chars)
        .map(|&size| chars - size + 1)
        .sum()
}

/// Iterates over every n-gram of the given sizes in `text`.
///
/// Shorter n-grams come first; within a size, n-grams are yielded in text
/// order. Each item borrows from `text`.
pub fn ngrams<'a>(text: &'a str, sizes: &[usize]) -> Ngrams<'a> {
    let mut sizes: Vec<usize> = sizes.iter().copied().filter(|&size| size > 0).collect();
    sizes.sort_unstable();

    let bounds = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    Ngrams {
        text,
        bounds,
        sizes,
        size_idx: 0,
        start: 0,
    }
}

/// All n-grams of the given sizes in `text`, as owned strings.
pub fn collect_ngrams(text: &str, sizes: &[usize]) -> Vec<String> {
    let mut out = Vec::with_capacity(ngram_count(text, sizes));
    out.extend(ngrams(text, sizes).map(str::to_owned));
    out
}

/// Iterator returned by [`ngrams`].
#[derive(Clone, Debug)]
pub struct Ngrams<'a> {
    text: &'a str,
    /// Byte offset of every character start, plus `text.len()`.
    bounds: Vec<usize>,
    sizes: Vec<usize>,
    size_idx: usize,
    /// Character index of the next n-gram's first character.
    start: usize,
}

impl<'a> Iterator for Ngrams<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let chars = self.bounds.len() - 1;
        loop {
            let size = *self.sizes.get(self.size_idx)?;
            let end = self.start + size;
            if end <= chars {
                let ngram = &self.text[self.bounds[self.start]..self.bounds[end]];
                self.start += 1;
                return Some(ngram);
            }
            self.size_idx += 1;
            self.start = 0;
        }
    }
}
