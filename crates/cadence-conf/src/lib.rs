//! Minimal configuration loading for Cadence.
//!
//! Binaries driving a score share one small config: how often to tick, how
//! long to run, which trigger mode new syncs get, and how loud to log.
//!
//! # Usage
//!
//! ```rust,no_run
//! use cadence_conf::CadenceConfig;
//!
//! let config = CadenceConfig::load().expect("Failed to load config");
//! println!("tick every {} ms", config.engine.tick_interval_ms);
//! ```
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/cadence/config.toml` (system)
//! 2. `~/.config/cadence/config.toml` (user)
//! 3. `./cadence.toml` (local override, or the `--config` path)
//! 4. Environment variables (`CADENCE_*`, `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [engine]
//! tick_interval_ms = 10
//! run_for_secs = 4.0
//! default_trigger_mode = "observed"
//!
//! [telemetry]
//! log_level = "info"
//! ```

pub mod engine;
pub mod loader;

pub use engine::{EngineConfig, TelemetryConfig, TriggerModeSetting};
pub use loader::{discover_config_files_with_override, ConfigSources};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Complete Cadence configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CadenceConfig {
    pub engine: EngineConfig,
    pub telemetry: TelemetryConfig,
}

impl CadenceConfig {
    /// Load configuration from all sources.
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration with `config_path` replacing `./cadence.toml`.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration from optional path and return information about sources.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let files = loader::discover_config_files_with_override(config_path);
        let (mut config, mut sources) = Self::load_files(&files)?;

        loader::apply_env_overrides(&mut config, &mut sources);

        Ok((config, sources))
    }

    /// Merge the given files in order, without environment overrides.
    pub fn load_files(files: &[PathBuf]) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut merged = toml::Table::new();

        for path in files {
            let table = loader::load_table(path)?;
            loader::merge_tables(&mut merged, table);
            sources.files.push(path.clone());
        }

        Ok((loader::from_table(merged)?, sources))
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# Cadence Configuration\n\n");

        output.push_str("[engine]\n");
        output.push_str(&format!(
            "tick_interval_ms = {}\n",
            self.engine.tick_interval_ms
        ));
        output.push_str(&format!("run_for_secs = {:?}\n", self.engine.run_for_secs));
        output.push_str(&format!(
            "default_trigger_mode = \"{}\"\n",
            self.engine.default_trigger_mode
        ));

        output.push_str("\n[telemetry]\n");
        output.push_str(&format!("log_level = \"{}\"\n", self.telemetry.log_level));

        output
    }
}
