//! # Configuration
//!
//! Application settings, resolved in priority order:
//!
//! 1. Command-line flag
//! 2. Environment variable (`ASTRAMECH_BIND`, `ASTRAMECH_BENCHMARKS`, `ASTRAMECH_LOG`)
//! 3. TOML file (`--config`, else `./astramech.toml`)
//! 4. Compiled defaults
//!
//! A missing default config file is fine. A config file named explicitly
//! must exist, and any config file that exists must parse.

use astramech_core::AstraError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "astramech.toml";
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const ENV_BIND: &str = "ASTRAMECH_BIND";
pub const ENV_BENCHMARKS: &str = "ASTRAMECH_BENCHMARKS";
pub const ENV_LOG: &str = "ASTRAMECH_LOG";

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind: String,
    /// Benchmark table (`.toml` or `.json`). `None` uses the embedded table.
    pub benchmarks_path: Option<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            benchmarks_path: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Values given on the command line. They beat everything else.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub bind: Option<String>,
    pub benchmarks_path: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve from the process environment.
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self, AstraError> {
        Self::resolve_with(overrides, |name| std::env::var(name).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve_with(
        overrides: &ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AstraError> {
        let mut config = match &overrides.config_path {
            Some(path) => Self::load_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(bind) = env(ENV_BIND) {
            config.bind = bind;
        }
        if let Some(path) = env(ENV_BENCHMARKS) {
            config.benchmarks_path = Some(PathBuf::from(path));
        }
        if let Some(level) = env(ENV_LOG) {
            config.log_level = level;
        }

        if let Some(bind) = &overrides.bind {
            config.bind.clone_from(bind);
        }
        if let Some(path) = &overrides.benchmarks_path {
            config.benchmarks_path = Some(path.clone());
        }

        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn load_file(path: &Path) -> Result<Self, AstraError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AstraError::Config(format!("cannot read config {}: {e}", path.display()))
        })?;
        Ok(toml::from_str(&content)?)
    }
}
