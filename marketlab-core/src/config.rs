//! Generator configuration, loaded from TOML.
//!
//! ```toml
//! seed = 42
//! invalid_spec_policy = "skip"
//!
//! [universe]
//! currencies = ["USD", "EUR"]
//!
//! [[universe.instruments]]
//! symbol = "XYZ"
//! name = "Test Co"
//! market = "BMV"
//! base_price = 100.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::universe::Universe;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// What a build does with an instrument spec whose base price is not positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidSpecPolicy {
    /// Fail the whole build; nothing is published.
    #[default]
    Abort,
    /// Drop the spec, log a warning, and record it in `MarketDataset::skipped`.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Master seed. `None` draws one from OS entropy at build time.
    pub seed: Option<u64>,
    pub invalid_spec_policy: InvalidSpecPolicy,
    pub universe: Universe,
}

impl GeneratorConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
