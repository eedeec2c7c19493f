use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::app::ports::{BrandAssignmentOutputPort, ProductFeedPort};
use crate::domain::{BrandAssignment, ProductRecord, ScopeSelector};
use crate::observability::metrics::enrich as enrich_metrics;
use crate::pipeline::processing::selector::MatchSelector;

/// What happened to a single product during a run
#[derive(Debug, Clone, PartialEq)]
pub enum ProductOutcome {
    /// Product already carried a classification
    Skipped,
    /// A brand was found and handed to the output port
    Matched(BrandAssignment),
    /// No known brand occurs in the title
    Unmatched,
}

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichmentSummary {
    pub processed: usize,
    pub skipped: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

/// Use case for assigning canonical brands to unclassified products
pub struct BrandEnrichmentUseCase {
    selector: Arc<MatchSelector>,
    output: Arc<dyn BrandAssignmentOutputPort>,
    scope: ScopeSelector,
}

impl BrandEnrichmentUseCase {
    pub fn new(
        selector: Arc<MatchSelector>,
        output: Arc<dyn BrandAssignmentOutputPort>,
        scope: ScopeSelector,
    ) -> Self {
        Self {
            selector,
            output,
            scope,
        }
    }

    pub fn scope(&self) -> &ScopeSelector {
        &self.scope
    }

    /// Resolve one product and write its assignment when a brand matched
    pub async fn enrich_product(&self, product: &ProductRecord) -> Result<ProductOutcome> {
        if product.is_classified() {
            return Ok(ProductOutcome::Skipped);
        }

        let Some(brand_match) = self.selector.select(&product.title) else {
            debug!("{} -> no match", product.title);
            return Ok(ProductOutcome::Unmatched);
        };

        debug!(
            "{} -> {} (matched '{}' at word {})",
            product.title,
            brand_match.canonical_brand,
            brand_match.matched_brand,
            brand_match.match_index
        );

        let assignment = BrandAssignment {
            identity_key: self.scope.identity_key(&product.source_id),
            source_id: product.source_id.clone(),
            title: product.title.clone(),
            matched_brand: brand_match.matched_brand,
            canonical_brand: brand_match.canonical_brand,
            match_index: brand_match.match_index,
            assigned_at: Utc::now(),
        };

        self.output.write_assignment(&assignment).await?;
        Ok(ProductOutcome::Matched(assignment))
    }

    /// Process a whole feed. A failure on one product is logged and counted,
    /// and the run moves on to the next one.
    pub async fn run(&self, products: &[ProductRecord]) -> EnrichmentSummary {
        let start_time = Instant::now();
        let mut summary = EnrichmentSummary::default();

        info!(
            "Starting brand enrichment for {} products (source={}, country={})",
            products.len(),
            self.scope.source,
            self.scope.country_code
        );

        for (index, product) in products.iter().enumerate() {
            summary.processed += 1;
            enrich_metrics::product_processed();

            match self.enrich_product(product).await {
                Ok(ProductOutcome::Skipped) => {
                    summary.skipped += 1;
                    enrich_metrics::product_skipped();
                }
                Ok(ProductOutcome::Matched(assignment)) => {
                    summary.matched += 1;
                    enrich_metrics::product_matched(assignment.match_index);
                }
                Ok(ProductOutcome::Unmatched) => {
                    summary.unmatched += 1;
                    enrich_metrics::product_unmatched();
                }
                Err(e) => {
                    error!(
                        "Failed to enrich product {} ({}): {}",
                        index + 1,
                        product.source_id,
                        e
                    );
                    summary.failed += 1;
                    enrich_metrics::product_failed();
                }
            }
        }

        summary.elapsed = start_time.elapsed();
        enrich_metrics::run_duration(summary.elapsed.as_secs_f64());

        info!(
            "Execution time: {} ms. Processed {} products, matched {}, unmatched {}, skipped {}",
            summary.elapsed.as_millis(),
            summary.processed,
            summary.matched,
            summary.unmatched,
            summary.skipped
        );
        if summary.failed > 0 {
            warn!(
                "Brand enrichment had {} failures out of {} products",
                summary.failed, summary.processed
            );
        }

        summary
    }

    /// Load this use case's scope from a feed and process it
    pub async fn run_from_feed(&self, feed: &dyn ProductFeedPort) -> Result<EnrichmentSummary> {
        let products = feed.load_products(&self.scope).await?;
        Ok(self.run(&products).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RelationRecord;
    use crate::infra::assignment_output_adapter::InMemoryAssignmentOutput;
    use crate::pipeline::processing::grouping::build_group_index;
    use crate::pipeline::processing::policy::MatchPolicy;

    fn use_case(output: Arc<InMemoryAssignmentOutput>) -> BrandEnrichmentUseCase {
        let relations = vec![RelationRecord::new("abc", "xyz;def")];
        let index = Arc::new(build_group_index(&relations));
        let selector = Arc::new(MatchSelector::new(index, &MatchPolicy::default()).unwrap());
        BrandEnrichmentUseCase::new(selector, output, ScopeSelector::new("pharmacy", "ee"))
    }

    #[tokio::test]
    async fn test_enrich_product_writes_assignment() {
        let output = Arc::new(InMemoryAssignmentOutput::new());
        let use_case = use_case(output.clone());

        let product = ProductRecord::new("XYZ Pain Relief 500mg", "123");
        let outcome = use_case.enrich_product(&product).await.unwrap();

        let assignment = match outcome {
            ProductOutcome::Matched(assignment) => assignment,
            other => panic!("expected a match, got {:?}", other),
        };
        assert_eq!(assignment.canonical_brand, "abc");
        assert_eq!(assignment.matched_brand, "xyz");
        assert_eq!(
            assignment.identity_key,
            ScopeSelector::new("pharmacy", "ee").identity_key("123")
        );
        assert_eq!(output.assignments().await, vec![assignment]);
    }

    #[tokio::test]
    async fn test_classified_and_unmatched_products_write_nothing() {
        let output = Arc::new(InMemoryAssignmentOutput::new());
        let use_case = use_case(output.clone());

        let mut classified = ProductRecord::new("XYZ Pain Relief", "1");
        classified.already_classified = true;
        let unmatched = ProductRecord::new("Plain Pain Relief", "2");

        assert_eq!(
            use_case.enrich_product(&classified).await.unwrap(),
            ProductOutcome::Skipped
        );
        assert_eq!(
            use_case.enrich_product(&unmatched).await.unwrap(),
            ProductOutcome::Unmatched
        );
        assert!(output.assignments().await.is_empty());
    }

    #[tokio::test]
    async fn test_run_counts_outcomes() {
        let output = Arc::new(InMemoryAssignmentOutput::new());
        let use_case = use_case(output.clone());

        let mut classified = ProductRecord::new("DEF gel", "3");
        classified.already_classified = true;
        let products = vec![
            ProductRecord::new("XYZ Pain Relief", "1"),
            ProductRecord::new("Gel by def", "2"),
            classified,
            ProductRecord::new("Unknown brand gel", "4"),
        ];

        let summary = use_case.run(&products).await;

        assert_eq!(summary.processed, 4);
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.unmatched, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(output.assignments().await.len(), 2);
    }
}
