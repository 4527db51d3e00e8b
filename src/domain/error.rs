// Failure taxonomy surfaced by the visualizer
use std::path::PathBuf;
use thiserror::Error;

use super::timeframe::Timeframe;

/// Every variant renders to the status line handed back to the caller.
#[derive(Debug, Error)]
pub enum VisualizerError {
    #[error("❌ Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("❌ No JSON files found in {} (including subdirectories)", .0.display())]
    NoFiles(PathBuf),

    #[error("❌ No data points found in {} using expression '{expression}'{}", .dir.display(), window_suffix(.window))]
    NoData {
        dir: PathBuf,
        expression: String,
        window: Timeframe,
    },

    #[error("❌ Invalid query expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    #[error("❌ Error during visualization: {0}")]
    Render(String),
}

fn window_suffix(window: &Timeframe) -> String {
    match window {
        Timeframe::Seconds(s) => format!(" for the last {} seconds", s),
        Timeframe::All => String::new(),
    }
}
