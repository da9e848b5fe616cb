//! Engine configuration with TOML file support.
//!
//! Every section uses `#[serde(default)]`, so a partial file (for example one
//! that only sets `[remote] enabled = false`) is valid.

use mutscope_core::catalogue::DEFAULT_MIN_SIMILARITY;
use mutscope_core::sequence::DEFAULT_MAX_MUTATIONS;
use mutscope_core::RefinementParams;
use mutscope_io::remote::{DEFAULT_API_BASE, DEFAULT_TIMEOUT};
use mutscope_io::{AlphaFoldDbClient, OfflineSource, StructureSource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub enabled: bool,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            enabled: true,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Where structure files are written.
    pub models_directory: PathBuf,
    /// Catalogue source; the embedded catalogue is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalogue_path: Option<PathBuf>,
    pub max_mutations: usize,
    pub similarity_threshold: f64,
    pub remote: RemoteConfig,
    pub refinement: RefinementParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            models_directory: PathBuf::from("models"),
            catalogue_path: None,
            max_mutations: DEFAULT_MAX_MUTATIONS,
            similarity_threshold: DEFAULT_MIN_SIMILARITY,
            remote: RemoteConfig::default(),
            refinement: RefinementParams::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The structure source described by `[remote]`.
    pub fn structure_source(&self) -> Arc<dyn StructureSource> {
        if self.remote.enabled {
            Arc::new(AlphaFoldDbClient::new(
                &self.remote.api_base,
                Duration::from_secs(self.remote.timeout_secs),
            ))
        } else {
            Arc::new(OfflineSource)
        }
    }
}
