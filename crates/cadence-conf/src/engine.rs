//! Engine and telemetry sections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How newly created syncs decide to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerModeSetting {
    /// Fire as soon as an event is pending and its guard holds
    #[default]
    Observed,
    /// Fire only on explicit trigger (or at max duration)
    Manual,
}

impl FromStr for TriggerModeSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "observed" => Ok(Self::Observed),
            "manual" => Ok(Self::Manual),
            other => Err(format!("unknown trigger mode '{}'", other)),
        }
    }
}

impl fmt::Display for TriggerModeSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Observed => f.write_str("observed"),
            Self::Manual => f.write_str("manual"),
        }
    }
}

/// Driver loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Wall time between ticks
    pub tick_interval_ms: u64,

    /// How long to drive the score; 0 runs until the end sync executes
    pub run_for_secs: f64,

    /// Trigger mode for syncs created without an explicit one
    pub default_trigger_mode: TriggerModeSetting,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 10,
            run_for_secs: 4.0,
            default_trigger_mode: TriggerModeSetting::Observed,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive, e.g. `info` or `cadence=debug`
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
