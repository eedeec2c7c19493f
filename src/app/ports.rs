use async_trait::async_trait;

use crate::domain::{BrandAssignment, ProductRecord, RelationRecord, ScopeSelector};

/// Supplies the full relation dataset a run's groups are built from.
#[async_trait]
pub trait RelationSourcePort: Send + Sync {
    async fn load_relations(&self) -> anyhow::Result<Vec<RelationRecord>>;
}

/// Supplies the products of one source/country scope.
#[async_trait]
pub trait ProductFeedPort: Send + Sync {
    async fn load_products(&self, scope: &ScopeSelector) -> anyhow::Result<Vec<ProductRecord>>;
}

/// Receives the brand chosen for each matched product.
#[async_trait]
pub trait BrandAssignmentOutputPort: Send + Sync {
    async fn write_assignment(&self, assignment: &BrandAssignment) -> anyhow::Result<()>;
}
