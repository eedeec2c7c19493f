use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::pipeline::processing::grouping::GroupIndex;
use crate::pipeline::processing::matcher::TitleMatcher;
use crate::pipeline::processing::policy::MatchPolicy;
use crate::pipeline::processing::text::Title;

/// A valid occurrence of one brand in the title being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCandidate<'a> {
    pub brand: &'a str,
    pub match_index: usize,
    pub is_beginning: bool,
}

impl<'a> MatchCandidate<'a> {
    fn new(brand: &'a str, match_index: usize) -> Self {
        Self {
            brand,
            match_index,
            is_beginning: match_index == 0,
        }
    }

    /// Title-leading matches first, then earlier words, then brand name so
    /// the pick never depends on the order brands were evaluated in.
    fn priority(&self, other: &Self) -> Ordering {
        other
            .is_beginning
            .cmp(&self.is_beginning)
            .then_with(|| self.match_index.cmp(&other.match_index))
            .then_with(|| self.brand.cmp(other.brand))
    }
}

/// The brand chosen for a title, resolved to its group's canonical label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandMatch {
    pub matched_brand: String,
    pub canonical_brand: String,
    pub match_index: usize,
}

/// Runs every known brand against a title and picks the single best match.
///
/// Immutable once built; share it behind an `Arc` across workers.
pub struct MatchSelector {
    index: Arc<GroupIndex>,
    matchers: Vec<TitleMatcher>,
}

impl MatchSelector {
    pub fn new(index: Arc<GroupIndex>, policy: &MatchPolicy) -> Result<Self> {
        let matchers = index
            .brands()
            .map(|brand| TitleMatcher::new(brand, policy))
            .collect::<Result<Vec<_>>>()?;

        let ignored = matchers.iter().filter(|m| m.is_ignored()).count();
        debug!(
            "Prepared {} brand matchers ({} ignored)",
            matchers.len(),
            ignored
        );

        Ok(Self { index, matchers })
    }

    pub fn group_index(&self) -> &GroupIndex {
        &self.index
    }

    pub fn brand_count(&self) -> usize {
        self.matchers.len()
    }

    /// Every brand with a valid occurrence in the title, best first.
    pub fn candidates(&self, title: &str) -> Vec<MatchCandidate<'_>> {
        let title = Title::parse(title);
        let mut candidates: Vec<MatchCandidate<'_>> = self
            .matchers
            .iter()
            .filter_map(|matcher| {
                matcher
                    .check(&title)
                    .map(|index| MatchCandidate::new(matcher.brand(), index))
            })
            .collect();

        candidates.sort_by(|a, b| a.priority(b));
        candidates
    }

    /// Resolve a title to a canonical brand. `None` means no known brand
    /// occurs in it.
    pub fn select(&self, title: &str) -> Option<BrandMatch> {
        let best = self.candidates(title).into_iter().next()?;

        let canonical_brand = match self.index.canonical_for(best.brand) {
            Some(canonical) => canonical.to_string(),
            None => {
                warn!(
                    "Matched brand '{}' has no group, keeping it as its own canonical label",
                    best.brand
                );
                best.brand.to_string()
            }
        };

        Some(BrandMatch {
            matched_brand: best.brand.to_string(),
            canonical_brand,
            match_index: best.match_index,
        })
    }
}
