//! Dashboard Configuration
//! Optional JSON settings file; every field falls back to a sensible default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV_VAR: &str = "DATA_DASH_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "data_dash.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Name the loaded dataset is registered under for SQL queries.
    pub table_name: String,
    pub default_query: String,
    pub sample_rows: usize,
    pub infer_schema_length: usize,
    pub default_bins: usize,
    pub min_bins: usize,
    pub max_bins: usize,
    pub export_width: u32,
    pub export_height: u32,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            table_name: "data".to_string(),
            default_query: "SELECT * FROM data LIMIT 5".to_string(),
            sample_rows: 5,
            infer_schema_length: 10000,
            default_bins: 30,
            min_bins: 5,
            max_bins: 100,
            export_width: 1200,
            export_height: 800,
            window_width: 1400.0,
            window_height: 900.0,
        }
    }
}

impl DashboardConfig {
    /// Load config from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config path from the environment and load it,
    /// falling back to defaults when the file is unusable.
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        match Self::load(&path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "config loaded");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "using default config");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::Invalid("table_name must not be empty".into()));
        }
        if self.min_bins == 0 {
            return Err(ConfigError::Invalid("min_bins must be at least 1".into()));
        }
        if self.min_bins > self.max_bins {
            return Err(ConfigError::Invalid(format!(
                "min_bins ({}) is greater than max_bins ({})",
                self.min_bins, self.max_bins
            )));
        }
        if !(self.min_bins..=self.max_bins).contains(&self.default_bins) {
            return Err(ConfigError::Invalid(format!(
                "default_bins ({}) must be within {}..={}",
                self.default_bins, self.min_bins, self.max_bins
            )));
        }
        if self.export_width == 0 || self.export_height == 0 {
            return Err(ConfigError::Invalid(
                "export dimensions must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_query, "SELECT * FROM data LIMIT 5");
        assert_eq!(config.sample_rows, 5);
        assert_eq!((config.min_bins, config.default_bins, config.max_bins), (5, 30, 100));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"sample_rows": 10, "default_bins": 50}}"#).unwrap();

        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.sample_rows, 10);
        assert_eq!(config.default_bins, 50);
        assert_eq!(config.table_name, "data");
    }

    #[test]
    fn malformed_json_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            DashboardConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn bin_range_is_checked() {
        let config = DashboardConfig {
            min_bins: 20,
            max_bins: 10,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = DashboardConfig {
            default_bins: 200,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = DashboardConfig {
            table_name: "  ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
