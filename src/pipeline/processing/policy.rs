use std::collections::BTreeSet;

use crate::constants::{
    CASE_SENSITIVE_BRAND, CASE_SENSITIVE_FORMS, FRONT_ONLY_BRANDS, FRONT_OR_SECOND_BRANDS,
    IGNORED_BRANDS,
};
use crate::domain::normalize_brand_key;
use crate::pipeline::processing::text::Title;

/// Where in a title an occurrence of a brand is allowed to sit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Any word index.
    Anywhere,
    /// Only among the first `n` words.
    Leading(usize),
    /// Any index, but the word there must be one of these exact spellings.
    ExactWord(Vec<String>),
}

impl Placement {
    pub fn allows(&self, title: &Title<'_>, index: usize) -> bool {
        match self {
            Placement::Anywhere => true,
            Placement::Leading(n) => index < *n,
            Placement::ExactWord(forms) => title
                .word(index)
                .is_some_and(|word| forms.iter().any(|form| form == word)),
        }
    }
}

/// One row of the positional rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionRule {
    pub name: &'static str,
    pub brands: BTreeSet<String>,
    pub placement: Placement,
}

impl PositionRule {
    pub fn new<I, S>(name: &'static str, brands: I, placement: Placement) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name,
            brands: brands
                .into_iter()
                .map(|b| normalize_brand_key(b.as_ref()))
                .collect(),
            placement,
        }
    }

    pub fn applies_to(&self, brand_key: &str) -> bool {
        self.brands.contains(brand_key)
    }
}

/// Ignore list plus ordered positional rules. The first rule naming a brand
/// decides its placement; brands no rule names may appear anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPolicy {
    ignored: BTreeSet<String>,
    rules: Vec<PositionRule>,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self::with_brand_lists(IGNORED_BRANDS, FRONT_ONLY_BRANDS, FRONT_OR_SECOND_BRANDS)
    }
}

impl MatchPolicy {
    /// Build the standard rule table from the three configurable lists.
    /// The case-sensitive rule always comes first.
    pub fn with_brand_lists<S: AsRef<str>>(
        ignored: &[S],
        front_only: &[S],
        front_or_second: &[S],
    ) -> Self {
        let rules = vec![
            PositionRule::new(
                "case_sensitive_word",
                [CASE_SENSITIVE_BRAND],
                Placement::ExactWord(CASE_SENSITIVE_FORMS.iter().map(|s| s.to_string()).collect()),
            ),
            PositionRule::new("front_only", front_only, Placement::Leading(1)),
            PositionRule::new("front_or_second", front_or_second, Placement::Leading(2)),
        ];
        Self {
            ignored: ignored
                .iter()
                .map(|b| normalize_brand_key(b.as_ref()))
                .collect(),
            rules,
        }
    }

    pub fn from_rules(ignored: BTreeSet<String>, rules: Vec<PositionRule>) -> Self {
        Self { ignored, rules }
    }

    pub fn is_ignored(&self, brand: &str) -> bool {
        self.ignored.contains(&normalize_brand_key(brand))
    }

    pub fn rule_for(&self, brand: &str) -> Option<&PositionRule> {
        let key = normalize_brand_key(brand);
        self.rules.iter().find(|rule| rule.applies_to(&key))
    }

    pub fn placement_for(&self, brand: &str) -> Placement {
        self.rule_for(brand)
            .map(|rule| rule.placement.clone())
            .unwrap_or(Placement::Anywhere)
    }

    pub fn rules(&self) -> &[PositionRule] {
        &self.rules
    }
}
