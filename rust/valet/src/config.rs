//! On-disk configuration.
//!
//! Configuration is a JSON file, `~/.valet/config.json` unless another path
//! is given. Every field has a default, so a file only needs the values it
//! overrides:
//!
//! ```json
//! {
//!   "delegation": { "default_duration_hours": 0.5 },
//!   "activity": { "enabled": false }
//! }
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use valet_delegation::{
    DEFAULT_DURATION_HOURS, DelegationError, TimeDelta, duration_from_hours,
};
use valet_storage::DEFAULT_POINTER_NAME;

/// Name of the directory under the home directory that holds VALET state.
pub const VALET_DIR: &str = ".valet";

/// Name of the configuration file inside [`VALET_DIR`].
pub const CONFIG_FILE: &str = "config.json";

/// The directory VALET keeps its state in, `~/.valet`. Falls back to a
/// relative `.valet` when no home directory is known.
pub fn valet_home() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(VALET_DIR))
        .unwrap_or_else(|| PathBuf::from(VALET_DIR))
}

/// Errors loading or persisting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("config I/O failed for {}: {source}", path.display())]
    Io {
        /// The config file path.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The file exists but is not valid configuration.
    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        /// The config file path.
        path: PathBuf,
        /// The JSON error.
        source: serde_json::Error,
    },

    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// All VALET settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValetConfig {
    /// Where blocks are stored and served from.
    pub storage: StorageConfig,
    /// How delegations are issued and published.
    pub delegation: DelegationConfig,
    /// The local agent identity.
    pub agent: AgentConfig,
    /// Activity logging.
    pub activity: ActivityConfig,
}

/// Block storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory of the file-system block store.
    pub root: PathBuf,
    /// Gateway base URL that serves stored blocks; record URLs are built on
    /// it.
    pub gateway: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: valet_home().join("blocks"),
            gateway: "http://localhost:8080".into(),
        }
    }
}

impl StorageConfig {
    /// The URL a stored block is served at through the gateway.
    pub fn record_url(&self, content_id: impl std::fmt::Display) -> String {
        format!("{}/ipfs/{content_id}", self.gateway.trim_end_matches('/'))
    }
}

/// Delegation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegationConfig {
    /// The name the latest delegation is published under.
    pub pointer_name: String,
    /// Seconds between delegation renewals.
    pub renewal_interval_secs: u64,
    /// Whether delegations are renewed automatically.
    pub auto_renew: bool,
    /// Violations tolerated before a delegation is no longer renewed.
    pub max_violations: u32,
    /// Lifetime of newly issued delegations, in possibly fractional hours.
    pub default_duration_hours: f64,
}

impl Default for DelegationConfig {
    fn default() -> Self {
        Self {
            pointer_name: DEFAULT_POINTER_NAME.into(),
            renewal_interval_secs: 24 * 60 * 60,
            auto_renew: true,
            max_violations: 5,
            default_duration_hours: DEFAULT_DURATION_HOURS,
        }
    }
}

impl DelegationConfig {
    /// [`DelegationConfig::default_duration_hours`] as a duration.
    ///
    /// # Errors
    ///
    /// Fails when the configured value is not a representable duration.
    pub fn default_duration(&self) -> Result<TimeDelta, DelegationError> {
        duration_from_hours(self.default_duration_hours)
    }
}

/// Local agent settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// File holding the agent's hex-encoded private key.
    pub private_key_path: PathBuf,
    /// The agent identifier, once a key exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            private_key_path: valet_home().join("agent.key"),
            agent_id: None,
        }
    }
}

/// Activity logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    /// Whether requests are logged.
    pub enabled: bool,
    /// Seconds between flushes of the activity buffer.
    pub flush_interval_secs: u64,
    /// The name activity logs are published under.
    pub storage_key: String,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            flush_interval_secs: 5 * 60,
            storage_key: "valet-activity".into(),
        }
    }
}

/// A [`ValetConfig`] bound to the file it is persisted in.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    config: ValetConfig,
}

impl ConfigStore {
    /// Open `~/.valet/config.json`.
    ///
    /// # Errors
    ///
    /// See [`ConfigStore::open`].
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::open(valet_home().join(CONFIG_FILE))
    }

    /// Load the configuration at `path`. If no file exists, the defaults are
    /// written there first.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or written, or is not valid
    /// configuration. A malformed file is never silently replaced.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| {
                ConfigError::Parse {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "writing default config");
                let config = ValetConfig::default();
                write_config(&path, &config)?;
                config
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        Ok(Self { path, config })
    }

    /// The file this configuration is persisted in.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current configuration.
    pub fn get(&self) -> &ValetConfig {
        &self.config
    }

    /// Replace the configuration and persist it.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be written; the in-memory configuration is
    /// left unchanged in that case.
    pub fn save(&mut self, config: ValetConfig) -> Result<(), ConfigError> {
        write_config(&self.path, &config)?;
        self.config = config;
        Ok(())
    }

    /// Modify the configuration in place and persist the result.
    ///
    /// # Errors
    ///
    /// See [`ConfigStore::save`].
    pub fn update(&mut self, apply: impl FnOnce(&mut ValetConfig)) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        apply(&mut config);
        self.save(config)
    }
}

fn write_config(path: &Path, config: &ValetConfig) -> Result<(), ConfigError> {
    let io_error = |source| ConfigError::Io {
        path: path.to_owned(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json).map_err(io_error)
}
