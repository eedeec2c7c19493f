use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::app::ports::{ProductFeedPort, RelationSourcePort};
use crate::domain::{ProductRecord, RelationRecord, ScopeSelector};
use crate::error::Result;

fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = fs::read_to_string(path)?;
    let records: Vec<T> = serde_json::from_str(&content)?;
    Ok(records)
}

/// Reads the relation dataset from a JSON array file
pub struct JsonRelationSource {
    path: PathBuf,
}

impl JsonRelationSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RelationSourcePort for JsonRelationSource {
    async fn load_relations(&self) -> anyhow::Result<Vec<RelationRecord>> {
        let records: Vec<RelationRecord> = read_json_array(&self.path)?;
        info!(
            "Loaded {} relation records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

/// Reads products from a JSON array file. `{source}` and `{country}` in the
/// path are replaced with the requested scope.
pub struct JsonProductFeed {
    path_template: String,
}

impl JsonProductFeed {
    pub fn new(path_template: impl Into<String>) -> Self {
        Self {
            path_template: path_template.into(),
        }
    }

    pub fn path_for(&self, scope: &ScopeSelector) -> PathBuf {
        PathBuf::from(
            self.path_template
                .replace("{source}", &scope.source)
                .replace("{country}", &scope.country_code),
        )
    }
}

#[async_trait]
impl ProductFeedPort for JsonProductFeed {
    async fn load_products(&self, scope: &ScopeSelector) -> anyhow::Result<Vec<ProductRecord>> {
        let path = self.path_for(scope);
        let products: Vec<ProductRecord> = read_json_array(&path)?;
        info!("Loaded {} products from {}", products.len(), path.display());
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_relations_with_dataset_field_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("relations.json");
        fs::write(
            &path,
            r#"[{"manufacturer_p1": "ABC", "manufacturers_p2": "xyz;def"},
                {"primary": "ghi", "secondary": "jkl"}]"#,
        )
        .unwrap();

        let records = JsonRelationSource::new(&path).load_relations().await.unwrap();

        assert_eq!(
            records,
            vec![
                RelationRecord::new("ABC", "xyz;def"),
                RelationRecord::new("ghi", "jkl"),
            ]
        );
    }

    #[tokio::test]
    async fn test_product_feed_resolves_scope_path() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("pharmacy_ee.json"),
            r#"[{"title": "XYZ Pain Relief", "source_id": "1"},
                {"title": "DEF gel", "source_id": "2", "m_id": 7}]"#,
        )
        .unwrap();

        let template = format!("{}/{{source}}_{{country}}.json", dir.path().display());
        let feed = JsonProductFeed::new(template);
        let products = feed
            .load_products(&ScopeSelector::new("pharmacy", "ee"))
            .await
            .unwrap();

        assert_eq!(products.len(), 2);
        assert!(!products[0].is_classified());
        assert!(products[1].is_classified());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let feed = JsonProductFeed::new("/nonexistent/products.json");
        let result = feed.load_products(&ScopeSelector::new("a", "b")).await;
        assert!(result.is_err());
    }
}
