// Observability: metrics emitted by the grouping and enrichment phases

pub mod metrics;
