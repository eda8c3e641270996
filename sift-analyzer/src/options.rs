use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerOptions {
    pub report_unused_imports: bool,
    pub report_unreachable_code: bool,
    pub report_missing_type_parameters: bool,
    /// Keeps only the first N diagnostics of a file after ordering.
    pub max_diagnostics_per_file: Option<usize>,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            report_unused_imports: false,
            report_unreachable_code: true,
            report_missing_type_parameters: true,
            max_diagnostics_per_file: None,
        }
    }
}

impl AnalyzerOptions {
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source).context("invalid analyzer configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        Self::from_yaml_str(&contents)
            .with_context(|| format!("failed to parse configuration {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let options =
            AnalyzerOptions::from_yaml_str("report_unused_imports: true\n").expect("parse");
        assert!(options.report_unused_imports);
        assert!(options.report_unreachable_code);
        assert_eq!(options.max_diagnostics_per_file, None);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(
            AnalyzerOptions::from_yaml_str("").expect("parse"),
            AnalyzerOptions::default()
        );
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(AnalyzerOptions::from_yaml_str("report_unreachable_code: sometimes\n").is_err());
    }
}
