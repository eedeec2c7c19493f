use std::fs;
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tempfile::tempdir;
use tokio::sync::Mutex;

use brand_resolver::app::enrich_use_case::BrandEnrichmentUseCase;
use brand_resolver::app::ports::{BrandAssignmentOutputPort, RelationSourcePort};
use brand_resolver::domain::{BrandAssignment, ProductRecord, RelationRecord, ScopeSelector};
use brand_resolver::infra::assignment_output_adapter::FileAssignmentOutputAdapter;
use brand_resolver::infra::json_source_adapter::{JsonProductFeed, JsonRelationSource};
use brand_resolver::pipeline::processing::policy::MatchPolicy;
use brand_resolver::pipeline::{build_group_index, MatchSelector};

/// Sink that rejects one specific product and records the rest
struct FlakyOutput {
    reject_source_id: String,
    written: Mutex<Vec<BrandAssignment>>,
}

#[async_trait]
impl BrandAssignmentOutputPort for FlakyOutput {
    async fn write_assignment(&self, assignment: &BrandAssignment) -> Result<()> {
        if assignment.source_id == self.reject_source_id {
            bail!("write rejected for {}", assignment.source_id);
        }
        self.written.lock().await.push(assignment.clone());
        Ok(())
    }
}

fn selector() -> Arc<MatchSelector> {
    let relations = vec![
        RelationRecord::new("abc", "xyz;def"),
        RelationRecord::new("ultra", "ultra labs"),
    ];
    let index = Arc::new(build_group_index(&relations));
    Arc::new(MatchSelector::new(index, &MatchPolicy::default()).unwrap())
}

#[tokio::test]
async fn test_failed_write_does_not_abort_the_batch() -> Result<()> {
    let output = Arc::new(FlakyOutput {
        reject_source_id: "2".to_string(),
        written: Mutex::new(Vec::new()),
    });
    let use_case =
        BrandEnrichmentUseCase::new(selector(), output.clone(), ScopeSelector::new("shop", "lv"));

    let products = vec![
        ProductRecord::new("XYZ Pain Relief", "1"),
        ProductRecord::new("DEF Cream", "2"),
        ProductRecord::new("Ultra Gel", "3"),
        ProductRecord::new("Gel Ultra", "4"),
    ];

    let summary = use_case.run(&products).await;

    assert_eq!(summary.processed, 4);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.matched, 2);
    assert_eq!(summary.unmatched, 1);

    let written = output.written.lock().await;
    let ids: Vec<&str> = written.iter().map(|a| a.source_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert_eq!(written[1].canonical_brand, "ultra");
    Ok(())
}

#[tokio::test]
async fn test_file_based_run_end_to_end() -> Result<()> {
    let dir = tempdir()?;
    let relations_path = dir.path().join("relations.json");
    let products_path = dir.path().join("pharmacy_ee.json");
    let output_path = dir.path().join("out").join("assignments.ndjson");

    fs::write(
        &relations_path,
        r#"[{"manufacturer_p1": "abc", "manufacturers_p2": "xyz;def"}]"#,
    )?;
    fs::write(
        &products_path,
        r#"[
            {"title": "XYZ Pain Relief 500mg", "source_id": "100"},
            {"title": "DEF Pain Relief", "source_id": "101", "m_id": 9},
            {"title": "Generic Pain Relief", "source_id": "102"}
        ]"#,
    )?;

    let relations = JsonRelationSource::new(&relations_path)
        .load_relations()
        .await?;
    let index = Arc::new(build_group_index(&relations));
    let selector = Arc::new(MatchSelector::new(index, &MatchPolicy::default())?);
    let sink = Arc::new(FileAssignmentOutputAdapter::new(output_path.to_str().unwrap())?);
    let scope = ScopeSelector::new("pharmacy", "ee");
    let use_case = BrandEnrichmentUseCase::new(selector, sink, scope.clone());

    let template = format!("{}/{{source}}_{{country}}.json", dir.path().display());
    let summary = use_case
        .run_from_feed(&JsonProductFeed::new(template))
        .await?;

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.matched, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.unmatched, 1);

    let content = fs::read_to_string(&output_path)?;
    let lines: Vec<BrandAssignment> = content
        .lines()
        .map(|line| serde_json::from_str::<BrandAssignment>(line))
        .collect::<std::result::Result<_, _>>()?;
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].canonical_brand, "abc");
    assert_eq!(lines[0].identity_key, scope.identity_key("100"));
    Ok(())
}
