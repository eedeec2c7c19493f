use regex::{Regex, RegexBuilder};

use crate::error::Result;
use crate::pipeline::processing::policy::{MatchPolicy, Placement};
use crate::pipeline::processing::text::{fold_accents, Title};

/// Finds occurrences of a single brand in product titles.
///
/// Everything that only depends on the brand (lowercase and folded forms,
/// the word-boundary pattern, the placement rule) is prepared once so the
/// matcher can be reused across a whole product feed.
#[derive(Debug, Clone)]
pub struct TitleMatcher {
    brand: String,
    lower: String,
    folded: String,
    boundary: Regex,
    placement: Placement,
    ignored: bool,
}

impl TitleMatcher {
    pub fn new(brand: &str, policy: &MatchPolicy) -> Result<Self> {
        let lower = brand.to_lowercase();
        let boundary = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(&lower)))
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            brand: brand.to_string(),
            folded: fold_accents(brand),
            lower,
            boundary,
            placement: policy.placement_for(brand),
            ignored: policy.is_ignored(brand),
        })
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    fn word_matches(&self, word: &str) -> bool {
        if word == self.brand || word.to_lowercase() == self.lower {
            return true;
        }

        let folded_word = fold_accents(word);
        if folded_word == self.folded {
            return true;
        }

        // Brand glued to punctuation or a suffix ("xyz®", "xyz-forte")
        self.boundary.is_match(word) && folded_word.contains(&self.folded)
    }

    /// Every word index the brand occurs at, before positional filtering.
    pub fn occurrences(&self, title: &Title<'_>) -> Vec<usize> {
        title
            .words()
            .filter(|(_, word)| self.word_matches(word))
            .map(|(index, _)| index)
            .collect()
    }

    /// Index of the occurrence that counts for this brand, if any.
    ///
    /// Ignored brands never match. Among occurrences that pass the placement
    /// rule, index 0 wins; otherwise the first one in scan order.
    pub fn check(&self, title: &Title<'_>) -> Option<usize> {
        if self.ignored {
            return None;
        }

        let valid: Vec<usize> = self
            .occurrences(title)
            .into_iter()
            .filter(|&index| self.placement.allows(title, index))
            .collect();

        valid
            .iter()
            .copied()
            .find(|&index| index == 0)
            .or_else(|| valid.first().copied())
    }
}

/// One-off check of a single brand against a raw title.
pub fn check_brand_match(title: &str, brand: &str, policy: &MatchPolicy) -> Result<Option<usize>> {
    let matcher = TitleMatcher::new(brand, policy)?;
    Ok(matcher.check(&Title::parse(title)))
}
