// Repository trait for raw sample records
use crate::domain::error::VisualizerError;
use serde_json::Value;
use std::path::Path;

/// Point-in-time snapshot of every record found under a source directory.
#[derive(Debug, Clone, Default)]
pub struct RecordBatch {
    pub records: Vec<Value>,
    /// Candidate files discovered, parseable or not.
    pub files_found: usize,
    /// Files that could not be read or parsed.
    pub skipped_files: usize,
}

pub trait SampleRepository: Send + Sync {
    /// Load and flatten every record under `root`, in path order.
    /// A missing directory is an error; an empty one is an empty batch.
    fn load_records(&self, root: &Path) -> Result<RecordBatch, VisualizerError>;
}
