//! Configuration for the parsing pipelines and batch orchestration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DocketError, Result};

/// Main configuration for docket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocketConfig {
    /// Document text source configuration.
    pub source: SourceConfig,

    /// Batch orchestration configuration.
    pub batch: BatchConfig,

    /// QC reporting configuration.
    pub qc: QcConfig,
}

impl Default for DocketConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            batch: BatchConfig::default(),
            qc: QcConfig::default(),
        }
    }
}

/// Document text source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Accept pre-extracted `.txt` documents alongside PDFs.
    pub text_files: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self { text_files: true }
    }
}

/// Batch orchestration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Parallel per-document workers.
    pub jobs: usize,

    /// Keep processing the batch when one document fails.
    pub continue_on_error: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            jobs: 4,
            continue_on_error: true,
        }
    }
}

/// QC reporting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QcConfig {
    /// File name for the Markdown QC report.
    pub report_name: String,
}

impl Default for QcConfig {
    fn default() -> Self {
        Self {
            report_name: "qc_report.md".to_string(),
        }
    }
}

impl DocketConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| DocketError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| DocketError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = DocketConfig::default();
        assert_eq!(config.batch.jobs, 4);
        assert!(config.batch.continue_on_error);
        assert!(config.source.text_files);
        assert_eq!(config.qc.report_name, "qc_report.md");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DocketConfig = serde_json::from_str(r#"{"batch": {"jobs": 8}}"#).unwrap();
        assert_eq!(config.batch.jobs, 8);
        assert!(config.batch.continue_on_error);
        assert_eq!(config.qc.report_name, "qc_report.md");
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docket.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = DocketConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, DocketError::Config(_)));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docket.json");

        let mut config = DocketConfig::default();
        config.batch.jobs = 2;
        config.save(&path).unwrap();

        let loaded = DocketConfig::from_file(&path).unwrap();
        assert_eq!(loaded.batch.jobs, 2);
    }
}
