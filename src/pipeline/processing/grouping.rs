use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::RelationRecord;
use crate::pipeline::processing::graph::BrandGraph;

/// One connected component of the brand graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandGroup {
    /// Member with the smallest (length, name) key
    pub canonical_brand: String,
    /// Every brand name in the component
    pub brands: BTreeSet<String>,
}

impl BrandGroup {
    fn from_members(brands: BTreeSet<String>) -> Option<Self> {
        let canonical_brand = brands.iter().min_by(|a, b| canonical_order(a, b))?.clone();
        Some(Self {
            canonical_brand,
            brands,
        })
    }

    pub fn contains(&self, brand: &str) -> bool {
        self.brands.contains(brand)
    }

    pub fn len(&self) -> usize {
        self.brands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }
}

/// Ordering used to pick a canonical label: shorter names first, then
/// plain lexicographic order.
pub fn canonical_order(a: &str, b: &str) -> Ordering {
    a.chars()
        .count()
        .cmp(&b.chars().count())
        .then_with(|| a.cmp(b))
}

/// Read-only lookup from every known brand to its group.
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    groups: Vec<Arc<BrandGroup>>,
    by_brand: BTreeMap<String, Arc<BrandGroup>>,
}

impl GroupIndex {
    pub fn get(&self, brand: &str) -> Option<&BrandGroup> {
        self.by_brand.get(brand).map(Arc::as_ref)
    }

    pub fn canonical_for(&self, brand: &str) -> Option<&str> {
        self.get(brand).map(|group| group.canonical_brand.as_str())
    }

    /// Every brand key, in sorted order.
    pub fn brands(&self) -> impl Iterator<Item = &str> {
        self.by_brand.keys().map(String::as_str)
    }

    /// Groups in order of their canonical label.
    pub fn groups(&self) -> impl Iterator<Item = &BrandGroup> {
        self.groups.iter().map(Arc::as_ref)
    }

    /// Number of brands covered by the index.
    pub fn len(&self) -> usize {
        self.by_brand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_brand.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// Connected-components clustering over a [`BrandGraph`].
pub struct GroupClusterer;

impl GroupClusterer {
    /// Partition the graph into groups using an explicit work stack, so
    /// large components never hit recursion limits.
    pub fn cluster(graph: &BrandGraph) -> GroupIndex {
        let mut visited: HashSet<&str> = HashSet::with_capacity(graph.len());
        let mut groups: Vec<Arc<BrandGroup>> = Vec::new();

        for start in graph.brands() {
            if visited.contains(start) {
                continue;
            }

            let mut members = BTreeSet::new();
            let mut stack = vec![start];

            while let Some(current) = stack.pop() {
                if !visited.insert(current) {
                    continue;
                }
                members.insert(current.to_string());

                if let Some(neighbors) = graph.neighbors(current) {
                    stack.extend(
                        neighbors
                            .iter()
                            .map(String::as_str)
                            .filter(|n| !visited.contains(n)),
                    );
                }
            }

            if let Some(group) = BrandGroup::from_members(members) {
                groups.push(Arc::new(group));
            }
        }

        groups.sort_by(|a, b| canonical_order(&a.canonical_brand, &b.canonical_brand));

        let mut by_brand = BTreeMap::new();
        for group in &groups {
            for brand in &group.brands {
                by_brand.insert(brand.clone(), Arc::clone(group));
            }
        }

        crate::observability::metrics::grouping::groups_built(groups.len(), by_brand.len());
        info!(
            "Built {} brand groups covering {} brands",
            groups.len(),
            by_brand.len()
        );

        GroupIndex { groups, by_brand }
    }
}

/// Build the group index straight from relation records.
pub fn build_group_index<'a, I>(records: I) -> GroupIndex
where
    I: IntoIterator<Item = &'a RelationRecord>,
{
    GroupClusterer::cluster(&BrandGraph::from_records(records))
}
