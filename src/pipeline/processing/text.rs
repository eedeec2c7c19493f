use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold a string for accent-insensitive comparison: canonical
/// decomposition, combining marks dropped, lowercased and trimmed.
pub fn fold_accents(s: &str) -> String {
    let stripped: String = s.nfd().filter(|c| !is_combining_mark(*c)).collect();
    stripped.to_lowercase().trim().to_string()
}

/// A product title split on runs of whitespace. Words keep their casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title<'a> {
    raw: &'a str,
    words: Vec<&'a str>,
}

impl<'a> Title<'a> {
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw,
            words: raw.split_whitespace().collect(),
        }
    }

    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn word(&self, index: usize) -> Option<&'a str> {
        self.words.get(index).copied()
    }

    /// `(index, word)` pairs in left-to-right order.
    pub fn words(&self) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        self.words.iter().copied().enumerate()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
