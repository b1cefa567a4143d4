//! Adapter configuration.
//!
//! Everything is read from the environment; there is no config file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Log filter override (e.g. "debug", "otio_rv_converter=trace,warn").
pub const ENV_LOG: &str = "OTIO_RV_LOG";

/// Set to `1` or `true` for JSON log lines.
pub const ENV_LOG_JSON: &str = "OTIO_RV_LOG_JSON";

/// Directory that held the Python `rvSession` package.
pub const ENV_RV_PYTHON_LIB: &str = "OTIO_RV_PYTHON_LIB";

/// Directory of RV's `py-interp`.
pub const ENV_RV_PYTHON_BIN: &str = "OTIO_RV_PYTHON_BIN";

/// Global adapter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Legacy `rvSession` library location. Informational only: the
    /// session writer is linked in.
    #[serde(default)]
    pub rv_python_lib: Option<PathBuf>,

    /// Legacy `py-interp` location. Informational only.
    #[serde(default)]
    pub rv_python_bin: Option<PathBuf>,

    /// Settings that were ignored while reading the environment.
    #[serde(skip)]
    pub warnings: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "warn", "debug", "otio_rv_converter=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl AdapterConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Unusable values fall back to the default and are recorded in
    /// [`AdapterConfig::warnings`]; they never stop a conversion.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(level) = lookup(ENV_LOG) {
            let level = level.trim();
            if level.is_empty() {
                config
                    .warnings
                    .push(format!("{ENV_LOG} is set but empty, using \"{}\"", config.logging.level));
            } else {
                config.logging.level = level.to_string();
            }
        }

        if let Some(json) = lookup(ENV_LOG_JSON) {
            match parse_flag(&json) {
                Some(flag) => config.logging.json = flag,
                None => config.warnings.push(format!(
                    "{ENV_LOG_JSON} must be a boolean, got {json:?}; using plain text logs"
                )),
            }
        }

        config.rv_python_lib = lookup(ENV_RV_PYTHON_LIB)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        config.rv_python_bin = lookup(ENV_RV_PYTHON_BIN)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        config
    }

    /// Emit the recorded configuration warnings. Call once logging is up.
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!("{warning}");
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
