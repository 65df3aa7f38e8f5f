//! Sweep configuration
//!
//! Loaded from an optional JSON file; every field has a default, so `{}` is a
//! valid configuration.
//!
//! ```json
//! {
//!   "counters": [1, 2, 4],
//!   "max_entities": 198,
//!   "seed": 42,
//!   "service": { "kind": "uniform", "min_secs": 300, "max_secs": 600 },
//!   "makespan": "latest_service_start",
//!   "output_dir": "Outputs",
//!   "charts": true,
//!   "export_json": false
//! }
//! ```

use std::path::{Path, PathBuf};

use regsim_core::dists::ServiceTimeModel;
use regsim_core::MakespanPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::DatasetOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Counter counts to simulate, one scenario each, in this order.
    pub counters: Vec<usize>,
    pub max_entities: usize,
    /// Seed of the service time sampler.
    pub seed: u64,
    pub service: ServiceTimeModel,
    pub makespan: MakespanPolicy,
    pub output_dir: PathBuf,
    pub charts: bool,
    /// Also write `results.json` with every timing record.
    pub export_json: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            counters: vec![1, 2, 4],
            max_entities: 198,
            seed: 42,
            service: ServiceTimeModel::default(),
            makespan: MakespanPolicy::default(),
            output_dir: PathBuf::from("Outputs"),
            charts: true,
            export_json: false,
        }
    }
}

impl SweepConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no scenario could run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.counters.is_empty() {
            return Err(ConfigError::Invalid("at least one counter count is required".to_string()));
        }
        if self.counters.contains(&0) {
            return Err(ConfigError::Invalid("counter counts must be positive".to_string()));
        }
        if self.max_entities == 0 {
            return Err(ConfigError::Invalid("max_entities must be positive".to_string()));
        }
        Ok(())
    }

    pub fn dataset_options(&self) -> DatasetOptions {
        DatasetOptions {
            max_entities: self.max_entities,
            service: self.service.clone(),
            seed: self.seed,
        }
    }
}
