//! Metrics for brand grouping and product enrichment.
//!
//! Recording goes through the `metrics` facade; nothing is exported unless
//! the embedding process installs a recorder.

use std::fmt;

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Grouping metrics
    GroupingGroupsBuilt,
    GroupingBrandsIndexed,

    // Enrichment metrics
    EnrichProductsProcessed,
    EnrichProductsSkipped,
    EnrichProductsMatched,
    EnrichProductsUnmatched,
    EnrichProductsFailed,
    EnrichMatchIndex,
    EnrichRunDuration,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::GroupingGroupsBuilt => "brand_grouping_groups",
            MetricName::GroupingBrandsIndexed => "brand_grouping_brands_indexed",

            MetricName::EnrichProductsProcessed => "brand_enrich_products_processed_total",
            MetricName::EnrichProductsSkipped => "brand_enrich_products_skipped_total",
            MetricName::EnrichProductsMatched => "brand_enrich_products_matched_total",
            MetricName::EnrichProductsUnmatched => "brand_enrich_products_unmatched_total",
            MetricName::EnrichProductsFailed => "brand_enrich_products_failed_total",
            MetricName::EnrichMatchIndex => "brand_enrich_match_index",
            MetricName::EnrichRunDuration => "brand_enrich_run_duration_seconds",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Grouping Metrics
// ============================================================================

pub mod grouping {
    use super::MetricName;

    /// Record the size of a freshly built group index
    pub fn groups_built(groups: usize, brands: usize) {
        ::metrics::gauge!(MetricName::GroupingGroupsBuilt.as_str()).set(groups as f64);
        ::metrics::gauge!(MetricName::GroupingBrandsIndexed.as_str()).set(brands as f64);
    }
}

// ============================================================================
// Enrichment Metrics
// ============================================================================

pub mod enrich {
    use super::MetricName;

    pub fn product_processed() {
        ::metrics::counter!(MetricName::EnrichProductsProcessed.as_str()).increment(1);
    }

    pub fn product_skipped() {
        ::metrics::counter!(MetricName::EnrichProductsSkipped.as_str()).increment(1);
    }

    /// Record a matched product and where in the title the brand sat
    pub fn product_matched(match_index: usize) {
        ::metrics::counter!(MetricName::EnrichProductsMatched.as_str()).increment(1);
        ::metrics::histogram!(MetricName::EnrichMatchIndex.as_str()).record(match_index as f64);
    }

    pub fn product_unmatched() {
        ::metrics::counter!(MetricName::EnrichProductsUnmatched.as_str()).increment(1);
    }

    pub fn product_failed() {
        ::metrics::counter!(MetricName::EnrichProductsFailed.as_str()).increment(1);
    }

    pub fn run_duration(secs: f64) {
        ::metrics::histogram!(MetricName::EnrichRunDuration.as_str()).record(secs);
    }
}
