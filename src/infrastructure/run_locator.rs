// Resolves the FILE-TARGET data directory of a running configuration
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE: &str = "config.json";
const FILE_TARGET: &str = "FILE-TARGET";
const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Error)]
pub enum RunLocatorError {
    #[error("❌ No active SFC configuration is running")]
    NoActiveConfig,

    #[error("❌ Invalid configuration name '{0}'")]
    InvalidConfigName(String),

    #[error("❌ Configuration directory {} not found", .0.display())]
    RunDirMissing(PathBuf),

    #[error("❌ Configuration file {} not found", .0.display())]
    ConfigMissing(PathBuf),

    #[error("❌ Failed to read configuration file: {0}")]
    ConfigUnreadable(String),

    #[error("❌ No active FILE-TARGET found in the configuration")]
    NoFileTarget,

    #[error("❌ Data directory {} not found", .0.display())]
    DataDirMissing(PathBuf),
}

#[derive(Debug, Deserialize)]
struct RunConfig {
    #[serde(rename = "Targets", default)]
    targets: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct TargetConfig {
    #[serde(rename = "TargetType")]
    target_type: Option<String>,
    #[serde(rename = "Active", default)]
    active: bool,
    #[serde(rename = "Directory")]
    directory: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RunLocator {
    base_dir: PathBuf,
}

impl RunLocator {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Data directory of the first active FILE-TARGET in
    /// `<base_dir>/<config_name>/config.json`. Relative target directories
    /// resolve against the run directory.
    pub fn locate(&self, config_name: Option<&str>) -> Result<PathBuf, RunLocatorError> {
        let config_name = config_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(RunLocatorError::NoActiveConfig)?;

        // A name must stay a single directory below the base
        let mut components = Path::new(config_name).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) || config_name.contains(['/', '\\'])
        {
            return Err(RunLocatorError::InvalidConfigName(config_name.to_string()));
        }

        let run_dir = self.base_dir.join(config_name);
        if !run_dir.exists() {
            return Err(RunLocatorError::RunDirMissing(run_dir));
        }

        let config_file = run_dir.join(CONFIG_FILE);
        if !config_file.exists() {
            return Err(RunLocatorError::ConfigMissing(config_file));
        }

        let content = fs::read_to_string(&config_file)
            .map_err(|e| RunLocatorError::ConfigUnreadable(e.to_string()))?;
        let config: RunConfig = serde_json::from_str(&content)
            .map_err(|e| RunLocatorError::ConfigUnreadable(e.to_string()))?;

        let (name, target) = config
            .targets
            .iter()
            .filter_map(|(name, raw)| {
                let target = TargetConfig::deserialize(raw).ok()?;
                Some((name, target))
            })
            .find(|(_, t)| t.active && t.target_type.as_deref() == Some(FILE_TARGET))
            .ok_or(RunLocatorError::NoFileTarget)?;

        let directory = target.directory.as_deref().unwrap_or(DEFAULT_DATA_DIR);
        let data_dir = if Path::new(directory).is_absolute() {
            PathBuf::from(directory)
        } else {
            normalize(&run_dir.join(directory))
        };

        tracing::debug!("Run {} writes {} to {}", config_name, name, data_dir.display());

        if !data_dir.exists() {
            return Err(RunLocatorError::DataDirMissing(data_dir));
        }
        Ok(data_dir)
    }
}

/// Lexically drop `.` and fold `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
