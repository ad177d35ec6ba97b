//! Layered configuration for the scanner.
//!
//! Sources, lowest priority first:
//! - Default values
//! - `.callscan/settings.toml` (found by walking up from the current
//!   directory) or an explicit file
//! - Environment variable overrides
//! - CLI argument overrides (applied by the binary)
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `CALLSCAN_` and use double
//! underscores to separate nested levels:
//! - `CALLSCAN_FILTER__ONLY_STD=true` sets `filter.only_std`
//! - `CALLSCAN_OUTPUT__SNIPPET_MAX_CHARS=120` sets `output.snippet_max_chars`
//! - `CALLSCAN_LOG_LEVEL=debug` sets `log_level`
//!
//! `CALLSCAN_LOG` (tracing filter) and `CALLSCAN_CONFIG` (settings file
//! path) are read elsewhere and are not settings.

use crate::frontend::FrontendConfig;
use crate::scan::{FilterConfig, RecordOptions, SNIPPET_MAX_CHARS};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the workspace settings file.
pub const CONFIG_DIR: &str = ".callscan";

/// Settings file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "settings.toml";

const ENV_PREFIX: &str = "CALLSCAN_";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Default tracing filter when `CALLSCAN_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inclusion filters
    #[serde(default)]
    pub filter: FilterConfig,

    /// CSV output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// C++ front end settings
    #[serde(default)]
    pub frontend: FrontendConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Print the column header row before any data
    #[serde(default)]
    pub csv_header: bool,

    /// Snippet length limit in characters
    #[serde(default = "default_snippet_max_chars")]
    pub snippet_max_chars: usize,

    /// Rewrite control characters in snippets as visible escapes
    #[serde(default)]
    pub escape_control_chars: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_snippet_max_chars() -> usize {
    SNIPPET_MAX_CHARS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            filter: FilterConfig::default(),
            output: OutputConfig::default(),
            frontend: FrontendConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_header: false,
            snippet_max_chars: default_snippet_max_chars(),
            escape_control_chars: false,
        }
    }
}

impl OutputConfig {
    pub fn record_options(&self) -> RecordOptions {
        RecordOptions {
            snippet_max_chars: self.snippet_max_chars,
            escape_control_chars: self.escape_control_chars,
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));
        Self::load_from(config_path)
    }

    /// Load configuration from a specific file. A missing file contributes
    /// nothing.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            // Double underscore separates nested levels, single underscores
            // stay part of the key
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .ignore(&["LOG", "CONFIG"])
                    .map(|key| key.as_str().to_lowercase().replace("__", ".").into()),
            )
            .extract()
            .map_err(Box::new)
    }

    /// Find `.callscan/settings.toml` searching from the current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .map(|ancestor| ancestor.join(CONFIG_DIR))
            .find(|dir| dir.is_dir())
            .map(|dir| dir.join(CONFIG_FILE))
    }
}
