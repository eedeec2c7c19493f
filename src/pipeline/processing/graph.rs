use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::domain::{normalize_brand_key, BrandRelation, RelationRecord};

/// Symmetric adjacency of normalized brand names.
///
/// Every edge is stored in both directions and blank names never become
/// nodes. Ordered collections keep iteration stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandGraph {
    adjacency: BTreeMap<String, BTreeSet<String>>,
}

impl BrandGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from a full relation dataset.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a RelationRecord>,
    {
        let mut graph = Self::new();
        let mut record_count = 0usize;
        for record in records {
            graph.add_record(record);
            record_count += 1;
        }
        debug!(
            "Built brand graph from {} records: {} brands, {} edges",
            record_count,
            graph.len(),
            graph.edge_count()
        );
        graph
    }

    /// Register one record: the primary brand plus an edge to every
    /// non-empty secondary part.
    pub fn add_record(&mut self, record: &RelationRecord) {
        if let Some(primary) = record.primary_brand() {
            self.adjacency.entry(primary).or_default();
        }
        for relation in record.relations() {
            self.add_relation(relation);
        }
    }

    /// Add one relation in both directions. Blank operands are dropped.
    pub fn add_relation(&mut self, relation: BrandRelation) {
        let left = normalize_brand_key(&relation.left);
        let right = normalize_brand_key(&relation.right);
        if left.is_empty() || right.is_empty() {
            return;
        }
        if left == right {
            self.adjacency.entry(left).or_default();
            return;
        }
        self.adjacency
            .entry(left.clone())
            .or_default()
            .insert(right.clone());
        self.adjacency.entry(right).or_default().insert(left);
    }

    pub fn neighbors(&self, brand: &str) -> Option<&BTreeSet<String>> {
        self.adjacency.get(brand)
    }

    pub fn contains(&self, brand: &str) -> bool {
        self.adjacency.contains_key(brand)
    }

    pub fn brands(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// Number of brand nodes.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }
}
