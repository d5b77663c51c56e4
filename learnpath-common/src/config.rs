//! Bootstrap configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables (`LEARNPATH_PORT`, `LEARNPATH_LATENCY_MS`)
//! 3. TOML config file (`--config`, `LEARNPATH_CONFIG`, or the platform
//!    config directory)
//! 4. Compiled defaults (fallback)
//!
//! A missing config file is not an error; a malformed one is. Resolution
//! does not log: the caller reports [`ConfigSource`] once tracing is up.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5780;

pub const ENV_CONFIG_PATH: &str = "LEARNPATH_CONFIG";
pub const ENV_PORT: &str = "LEARNPATH_PORT";
pub const ENV_LATENCY_MS: &str = "LEARNPATH_LATENCY_MS";

/// Bootstrap configuration loaded from TOML file
///
/// Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TomlConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Artificial delay applied to every record store call
    #[serde(default)]
    pub latency_ms: u64,

    /// JSON seed data replacing the bundled mock catalog
    #[serde(default)]
    pub seed_file: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            latency_ms: 0,
            seed_file: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Socket address string for the HTTP listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Platform config file location (`<config_dir>/learnpath/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("learnpath").join("config.toml"))
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub latency_ms: Option<u64>,
}

/// Where the TOML layer came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// A location was known but held no file
    Missing(PathBuf),
    /// No location could be determined
    Defaults,
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded config from {}", path.display()),
            ConfigSource::Missing(path) => {
                warn!("Config file {} not found, using defaults", path.display())
            }
            ConfigSource::Defaults => info!("No config file location, using defaults"),
        }
    }
}

/// Effective configuration plus the file it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub config: TomlConfig,
    pub source: ConfigSource,
}

/// Resolves the effective configuration from all sources
pub struct ConfigResolver {
    overrides: ConfigOverrides,
}

impl ConfigResolver {
    pub fn new(overrides: ConfigOverrides) -> Self {
        Self { overrides }
    }

    fn config_path(&self) -> Option<PathBuf> {
        self.overrides
            .config_path
            .clone()
            .or_else(|| std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from))
            .or_else(default_config_path)
    }

    pub fn resolve(&self) -> Result<ResolvedConfig> {
        // Priority 3: TOML config file
        let (mut config, source) = match self.config_path() {
            Some(path) if path.exists() => (load_toml_config(&path)?, ConfigSource::File(path)),
            Some(path) => (TomlConfig::default(), ConfigSource::Missing(path)),
            None => (TomlConfig::default(), ConfigSource::Defaults),
        };

        // Priority 2: Environment variables
        if let Some(port) = env_number::<u16>(ENV_PORT)? {
            config.port = port;
        }
        if let Some(latency) = env_number::<u64>(ENV_LATENCY_MS)? {
            config.latency_ms = latency;
        }

        // Priority 1: Command-line arguments
        if let Some(address) = &self.overrides.bind_address {
            config.bind_address = address.clone();
        }
        if let Some(port) = self.overrides.port {
            config.port = port;
        }
        if let Some(latency) = self.overrides.latency_ms {
            config.latency_ms = latency;
        }

        Ok(ResolvedConfig { config, source })
    }
}

fn env_number<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} is not a valid number: {}", name, value))),
        Err(_) => Ok(None),
    }
}
