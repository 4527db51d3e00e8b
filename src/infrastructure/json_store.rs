// JSON directory repository implementation
use crate::application::sample_repository::{RecordBatch, SampleRepository};
use crate::domain::error::VisualizerError;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reads every `*.json` file below a directory. Each file holds either one
/// object or an array of objects.
#[derive(Debug, Clone, Default)]
pub struct JsonDirectoryStore;

impl JsonDirectoryStore {
    pub fn new() -> Self {
        Self
    }

    /// All JSON files under `root`, sorted by full path as a string, so
    /// `a-c.json` comes before `a/b.json`.
    pub fn discover_files(root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            .map(|e| e.into_path())
            .collect();
        files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        files
    }

    fn read_file(path: &Path) -> Result<Vec<Value>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        match value {
            Value::Array(items) => Ok(items),
            object @ Value::Object(_) => Ok(vec![object]),
            other => anyhow::bail!(
                "{} holds a JSON {} instead of an object or array",
                path.display(),
                json_kind(&other)
            ),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl SampleRepository for JsonDirectoryStore {
    fn load_records(&self, root: &Path) -> Result<RecordBatch, VisualizerError> {
        if !root.is_dir() {
            return Err(VisualizerError::DirectoryNotFound(root.to_path_buf()));
        }

        let files = Self::discover_files(root);
        let mut batch = RecordBatch {
            files_found: files.len(),
            ..RecordBatch::default()
        };

        for path in &files {
            match Self::read_file(path) {
                Ok(mut records) => batch.records.append(&mut records),
                Err(e) => {
                    tracing::debug!("Skipping {}: {:#}", path.display(), e);
                    batch.skipped_files += 1;
                }
            }
        }

        tracing::debug!(
            "Loaded {} records from {} files under {} ({} skipped)",
            batch.records.len(),
            batch.files_found,
            root.display(),
            batch.skipped_files
        );

        Ok(batch)
    }
}
