use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a file from producing a report. Problems in the
/// analysed program itself are diagnostics, never errors.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis cancelled before {stage}")]
    Cancelled { stage: &'static str },
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid syntax tree in {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl AnalysisError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AnalysisError::Cancelled { .. })
    }
}
