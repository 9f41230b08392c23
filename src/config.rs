//! Configuration management
//!
//! Handles loading and parsing of JSON configuration files. Every section
//! falls back to defaults, and a couple of environment variables can
//! override the data source.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::sweep::DEFAULT_THRESHOLDS;
use crate::{BreakoutParams, Symbol};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub analysis: BreakoutParams,
    pub sweep: SweepConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).context("Failed to read config file")?;
        let mut config: Config =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise defaults plus environment overrides
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let mut config = Config::default();
                config.apply_env();
                Ok(config)
            }
        }
    }

    /// `BREAKOUT_SYMBOL` and `BREAKOUT_DATA_DIR` take precedence over the file
    pub fn apply_env(&mut self) {
        if let Ok(symbol) = std::env::var("BREAKOUT_SYMBOL") {
            self.data.symbol = symbol;
        }
        if let Ok(dir) = std::env::var("BREAKOUT_DATA_DIR") {
            self.data.data_dir = dir;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.analysis
            .validate()
            .context("Invalid analysis parameters")?;
        if let Some(t) = self.sweep.thresholds.iter().find(|t| !t.is_finite()) {
            anyhow::bail!("Sweep thresholds must be finite, got {}", t);
        }
        self.data.start()?;
        self.data.end()?;
        Ok(())
    }
}

/// Where the price series comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Csv,
    Yahoo,
}

impl std::str::FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(DataSource::Csv),
            "yahoo" => Ok(DataSource::Yahoo),
            _ => Err(format!("Unknown data source: {}. Use 'csv' or 'yahoo'", s)),
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Csv => write!(f, "csv"),
            DataSource::Yahoo => write!(f, "yahoo"),
        }
    }
}

/// Data source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub symbol: String,
    /// Tried in order when the primary symbol has no data
    pub alternate_symbols: Vec<String>,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub source: DataSource,
    pub data_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            symbol: "SI=F".to_string(),
            alternate_symbols: vec!["SLV".to_string(), "XAGUSD=X".to_string()],
            start_date: "2000-01-01".to_string(),
            end_date: None,
            source: DataSource::Csv,
            data_dir: "data".to_string(),
        }
    }
}

impl DataConfig {
    pub fn symbol(&self) -> Symbol {
        Symbol::new(self.symbol.clone())
    }

    pub fn alternates(&self) -> Vec<Symbol> {
        self.alternate_symbols.iter().map(Symbol::new).collect()
    }

    pub fn start(&self) -> Result<NaiveDate> {
        crate::data::parse_date(&self.start_date)
    }

    pub fn end(&self) -> Result<Option<NaiveDate>> {
        self.end_date
            .as_deref()
            .map(crate::data::parse_date)
            .transpose()
    }
}

/// Parameter sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub thresholds: Vec<f64>,
    pub sequential: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
            sequential: false,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub results_dir: String,
    /// Number of most recent breakouts listed in the console report
    pub recent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            results_dir: "results".to_string(),
            recent: 10,
        }
    }
}
