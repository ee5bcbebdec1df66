//! Configuration for the reply parsing pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tunables for wait-directive handling.
///
/// The parse itself is not configurable — the tag grammar is a wire
/// contract — but the two wait constants the original hard-coded are
/// surfaced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delay in milliseconds for a bare `[WAIT]` with no seconds payload.
    pub default_wait_ms: u64,
    /// How far past a fragment's closing point (in bytes) a `[WAIT]` tag
    /// may start and still attach to that fragment.
    pub wait_lookahead_bytes: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            default_wait_ms: 500,
            wait_lookahead_bytes: 50,
        }
    }
}

impl ParserConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::ParseError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot
    /// be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ParseError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/cadenza/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("cadenza").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("cadenza")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/cadenza-config/config.toml")
        }
    }
}
