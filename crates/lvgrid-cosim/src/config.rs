//! Service configuration, read from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! the stock configuration:
//!
//! ```toml
//! lv_cable_marker = "lv"
//! period_seconds = 900
//! base_frequency_hz = 50.0
//! line_code_file = "LineCode.dss"
//! transformer_code_file = "XFMRCode.dss"
//! radial_reduction = true
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lvgrid_io::ScriptOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Source bus of the radial reduction. Falls back to the bus fed by the
    /// first import asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_bus: Option<String>,
    /// Cables whose name contains this marker (case-insensitive) are
    /// low-voltage branches and stay out of the impedance graph.
    #[serde(default = "default_lv_marker")]
    pub lv_cable_marker: String,
    #[serde(default = "default_period")]
    pub period_seconds: u64,
    #[serde(default = "default_frequency")]
    pub base_frequency_hz: f64,
    #[serde(default = "default_line_code_file")]
    pub line_code_file: String,
    #[serde(default = "default_transformer_code_file")]
    pub transformer_code_file: String,
    #[serde(default = "default_radial_reduction")]
    pub radial_reduction: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            source_bus: None,
            lv_cable_marker: default_lv_marker(),
            period_seconds: default_period(),
            base_frequency_hz: default_frequency(),
            line_code_file: default_line_code_file(),
            transformer_code_file: default_transformer_code_file(),
            radial_reduction: default_radial_reduction(),
        }
    }
}

fn default_lv_marker() -> String {
    "lv".to_string()
}

fn default_period() -> u64 {
    900 // 15 minutes
}

fn default_frequency() -> f64 {
    50.0
}

fn default_line_code_file() -> String {
    "LineCode.dss".to_string()
}

fn default_transformer_code_file() -> String {
    "XFMRCode.dss".to_string()
}

fn default_radial_reduction() -> bool {
    true
}

impl ServiceConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config '{}'", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing config '{}'", path.display()))
    }

    /// Load `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serializing config")
    }

    pub fn script_options(&self) -> ScriptOptions {
        ScriptOptions {
            base_frequency_hz: self.base_frequency_hz,
            line_code_file: self.line_code_file.clone(),
            transformer_code_file: self.transformer_code_file.clone(),
        }
    }
}
