//! Dashboard configuration.
//!
//! Settings come from an optional YAML file; any field left out takes its
//! default, and command-line flags override both.
//!
//! ```yaml
//! title: MDRP California State Drug Utilization Dashboard
//! input: data/drug_utilization_data.csv
//! as_of: 2024-10-21
//! top_n: 10
//! scale: 1000
//! preview_rows: 20
//! ```

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result, ensure};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_INPUT: &str = "data/drug_utilization_data.csv";
pub const DEFAULT_TITLE: &str = "MDRP California State Drug Utilization Dashboard";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub title: String,
    pub input: PathBuf,
    /// Snapshot date shown in the data overview heading.
    pub as_of: Option<NaiveDate>,
    pub top_n: usize,
    /// Divisor applied to trend and comparison totals (1000 reports thousands).
    pub scale: f64,
    /// Rows shown in the data overview; 0 shows every row.
    pub preview_rows: usize,
    pub delimiter: Option<String>,
    pub encoding: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            input: PathBuf::from(DEFAULT_INPUT),
            as_of: None,
            top_n: 10,
            scale: 1_000.0,
            preview_rows: 20,
            delimiter: None,
            encoding: None,
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Opening config file {path:?}"))?;
        let config: DashboardConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("Parsing config file {path:?}"))?;
        config
            .validate()
            .with_context(|| format!("Validating config file {path:?}"))?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.top_n > 0, "top_n must be greater than zero");
        ensure!(
            self.scale.is_finite() && self.scale > 0.0,
            "scale must be a positive number"
        );
        Ok(())
    }

    /// Suffix for scaled measures, e.g. "(thousands)".
    pub fn scale_label(&self) -> Option<String> {
        match self.scale {
            s if s == 1.0 => None,
            s if s == 1_000.0 => Some("(thousands)".to_string()),
            s if s == 1_000_000.0 => Some("(millions)".to_string()),
            s => Some(format!("(÷{})", crate::data::format_number(s))),
        }
    }

    pub fn overview_title(&self) -> String {
        match self.as_of {
            Some(date) => format!("Data Overview as of {}", date.format("%m/%d/%Y")),
            None => "Data Overview".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "top_n: 5\nas_of: 2024-10-21").unwrap();
        let config = DashboardConfig::load(file.path()).expect("load config");
        assert_eq!(config.top_n, 5);
        assert_eq!(config.scale, 1_000.0);
        assert_eq!(config.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(config.overview_title(), "Data Overview as of 10/21/2024");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "scale: 0").unwrap();
        let err = DashboardConfig::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("scale must be a positive number"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "topn: 5").unwrap();
        assert!(DashboardConfig::load(file.path()).is_err());
    }

    #[test]
    fn scale_label_names_common_divisors() {
        let mut config = DashboardConfig::default();
        assert_eq!(config.scale_label().as_deref(), Some("(thousands)"));
        config.scale = 1.0;
        assert_eq!(config.scale_label(), None);
    }
}
