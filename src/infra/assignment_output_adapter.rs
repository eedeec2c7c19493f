use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use tokio::sync::Mutex;
use tracing::info;

use crate::app::ports::BrandAssignmentOutputPort;
use crate::domain::BrandAssignment;
use crate::error::Result;

/// File-based implementation of BrandAssignmentOutputPort
/// Writes brand assignments to an NDJSON file
pub struct FileAssignmentOutputAdapter {
    file_writer: Mutex<BufWriter<std::fs::File>>,
    file_path: String,
}

impl FileAssignmentOutputAdapter {
    pub fn new(file_path: &str) -> Result<Self> {
        let path = Path::new(file_path);
        let dir = path.parent().unwrap_or(Path::new("."));
        std::fs::create_dir_all(dir)?;

        info!("Creating brand assignment output file: {}", file_path);

        let file_writer = BufWriter::new(
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(file_path)?,
        );

        Ok(Self {
            file_writer: Mutex::new(file_writer),
            file_path: file_path.to_string(),
        })
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }
}

#[async_trait::async_trait]
impl BrandAssignmentOutputPort for FileAssignmentOutputAdapter {
    async fn write_assignment(&self, assignment: &BrandAssignment) -> anyhow::Result<()> {
        let json_line = serde_json::to_string(assignment)?;

        let mut writer = self.file_writer.lock().await;
        writeln!(writer, "{}", json_line)?;
        writer.flush()?;

        Ok(())
    }
}

/// Keeps assignments in memory; used for dry runs and tests
#[derive(Default)]
pub struct InMemoryAssignmentOutput {
    assignments: Mutex<Vec<BrandAssignment>>,
}

impl InMemoryAssignmentOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn assignments(&self) -> Vec<BrandAssignment> {
        self.assignments.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl BrandAssignmentOutputPort for InMemoryAssignmentOutput {
    async fn write_assignment(&self, assignment: &BrandAssignment) -> anyhow::Result<()> {
        self.assignments.lock().await.push(assignment.clone());
        Ok(())
    }
}
