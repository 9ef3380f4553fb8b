use crate::anomaly::{AnomalyCorrector, DEFAULT_SHARE_EPSILON};
use crate::types::sources::TrackedSources;
use crate::types::weather::MISSING_SENTINEL;
use bon::Builder;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config file '{0}'")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("Share epsilon must be a positive finite number, got {0}")]
    InvalidEpsilon(f64),
}

/// Locations of the raw inputs and the persisted intermediate artifacts.
#[derive(Debug, Clone, PartialEq, Deserialize, Builder)]
#[serde(default)]
pub struct DataPaths {
    #[builder(default = PathBuf::from("data/raw/india_weather_2024_2025.csv"), into)]
    pub raw_weather: PathBuf,
    #[builder(default = PathBuf::from("data/raw/india_monthly_full_release_long_format.csv"), into)]
    pub raw_energy: PathBuf,
    #[builder(default = PathBuf::from("data/processed/india_monthly_weather.csv"), into)]
    pub monthly_weather: PathBuf,
    #[builder(default = PathBuf::from("data/processed/india_energy_wide.csv"), into)]
    pub energy_wide: PathBuf,
    #[builder(default = PathBuf::from("data/processed/india_master_data.csv"), into)]
    pub master: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DataPaths {
    /// The default layout placed under `root`.
    pub fn under(root: &Path) -> Self {
        let defaults = Self::default();
        Self {
            raw_weather: root.join(defaults.raw_weather),
            raw_energy: root.join(defaults.raw_energy),
            monthly_weather: root.join(defaults.monthly_weather),
            energy_wide: root.join(defaults.energy_wide),
            master: root.join(defaults.master),
        }
    }
}

/// Settings shared by every pipeline stage.
///
/// Every field is optional in a JSON config file:
///
/// ```json
/// { "track_hydro": true, "paths": { "master": "out/master.csv" } }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Builder)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw weather value meaning "no reading".
    #[builder(default = MISSING_SENTINEL)]
    pub sentinel: f64,
    #[builder(default = DEFAULT_SHARE_EPSILON)]
    pub share_epsilon: f64,
    #[builder(default)]
    pub track_hydro: bool,
    #[builder(default)]
    pub paths: DataPaths,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PipelineConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let config: Self =
            serde_json::from_str(&raw).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        AnomalyCorrector::new(self.share_epsilon).map(|_| ())
    }

    pub fn tracked_sources(&self) -> TrackedSources {
        TrackedSources::with_hydro(self.track_hydro)
    }
}
