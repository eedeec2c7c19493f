use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::RELATION_SEPARATOR;

/// A raw "these manufacturers are the same" record as it arrives from the
/// relation dataset. `secondary` may list several brands joined by `;`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationRecord {
    #[serde(alias = "manufacturer_p1")]
    pub primary: String,
    #[serde(alias = "manufacturers_p2")]
    pub secondary: String,
}

impl RelationRecord {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    /// Normalized primary brand, or `None` when it is blank.
    pub fn primary_brand(&self) -> Option<String> {
        let key = normalize_brand_key(&self.primary);
        (!key.is_empty()).then_some(key)
    }

    /// Every non-empty `(primary, secondary part)` pair of this record.
    pub fn relations(&self) -> impl Iterator<Item = BrandRelation> + '_ {
        let primary = self.primary_brand();
        self.secondary
            .split(RELATION_SEPARATOR)
            .map(normalize_brand_key)
            .filter(|part| !part.is_empty())
            .filter_map(move |part| primary.clone().map(|p| BrandRelation::new(p, part)))
    }
}

/// Unordered pair of normalized brand names asserted to be the same manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BrandRelation {
    pub left: String,
    pub right: String,
}

impl BrandRelation {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn is_reflexive(&self) -> bool {
        self.left == self.right
    }
}

/// Lowercased, trimmed form used as the key for every brand in the graph.
pub fn normalize_brand_key(brand: &str) -> String {
    brand.trim().to_lowercase()
}

/// A product from the feed that may need a brand assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub title: String,
    pub source_id: String,
    #[serde(default)]
    pub already_classified: bool,
    /// Manufacturer mapping id carried by feeds that were partially classified upstream.
    #[serde(default, alias = "m_id", skip_serializing_if = "Option::is_none")]
    pub manufacturer_id: Option<serde_json::Value>,
}

impl ProductRecord {
    pub fn new(title: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source_id: source_id.into(),
            already_classified: false,
            manufacturer_id: None,
        }
    }

    pub fn is_classified(&self) -> bool {
        self.already_classified
            || matches!(&self.manufacturer_id, Some(id) if !id.is_null())
    }
}

/// Opaque source/country pair that selects which feed is processed and
/// namespaces product identity keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScopeSelector {
    pub source: String,
    pub country_code: String,
}

impl ScopeSelector {
    pub fn new(source: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            country_code: country_code.into(),
        }
    }

    pub fn identity_string(&self, source_id: &str) -> String {
        format!("{}_{}_{}", self.source, self.country_code, source_id)
    }

    /// Deterministic key for a product within this scope.
    pub fn identity_key(&self, source_id: &str) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, self.identity_string(source_id).as_bytes())
    }
}

/// The record handed to the assignment sink for every matched product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrandAssignment {
    pub identity_key: Uuid,
    pub source_id: String,
    pub title: String,
    pub matched_brand: String,
    pub canonical_brand: String,
    pub match_index: usize,
    pub assigned_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_relations_split_and_normalize() {
        let record = RelationRecord::new("  ABC ", "Xyz ; def;;  ");
        let relations: Vec<BrandRelation> = record.relations().collect();

        assert_eq!(
            relations,
            vec![BrandRelation::new("abc", "xyz"), BrandRelation::new("abc", "def")]
        );
    }

    #[test]
    fn test_blank_primary_yields_no_relations() {
        let record = RelationRecord::new("   ", "xyz;def");
        assert_eq!(record.primary_brand(), None);
        assert_eq!(record.relations().count(), 0);
    }

    #[test]
    fn test_relation_record_accepts_dataset_field_names() {
        let record: RelationRecord = serde_json::from_value(json!({
            "manufacturer_p1": "Abc",
            "manufacturers_p2": "xyz;def"
        }))
        .unwrap();

        assert_eq!(record, RelationRecord::new("Abc", "xyz;def"));
    }

    #[test]
    fn test_product_classification_flags() {
        let plain: ProductRecord = serde_json::from_value(json!({
            "title": "XYZ Pain Relief",
            "source_id": "p-1"
        }))
        .unwrap();
        assert!(!plain.is_classified());

        let mapped: ProductRecord = serde_json::from_value(json!({
            "title": "XYZ Pain Relief",
            "source_id": "p-2",
            "m_id": 42
        }))
        .unwrap();
        assert!(mapped.is_classified());

        let null_mapped: ProductRecord = serde_json::from_value(json!({
            "title": "XYZ Pain Relief",
            "source_id": "p-3",
            "m_id": null
        }))
        .unwrap();
        assert!(!null_mapped.is_classified());
    }

    #[test]
    fn test_identity_key_is_deterministic() {
        let scope = ScopeSelector::new("pharmacy", "ee");

        assert_eq!(scope.identity_string("123"), "pharmacy_ee_123");
        assert_eq!(scope.identity_key("123"), scope.identity_key("123"));
        assert_ne!(scope.identity_key("123"), scope.identity_key("124"));
        assert_ne!(
            scope.identity_key("123"),
            ScopeSelector::new("pharmacy", "lv").identity_key("123")
        );
    }
}
