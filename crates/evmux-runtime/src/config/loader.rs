//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Global config (`~/.evmux/config.toml`)
//! 3. Explicit config file (`--config <path>`)
//! 4. Environment variables (`EVMUX_*`)
//!
//! Each layer overrides the previous.

use super::{default_config_path, ConfigError, EvmuxConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Helper macro for parsing boolean environment variables.
macro_rules! parse_env_bool {
    ($field:expr, $var:literal) => {
        if let Ok(val) = std::env::var($var) {
            $field = parse_bool(&val)
                .ok_or_else(|| ConfigError::invalid_env_var($var, "expected bool"))?;
        }
    };
}

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```
/// use evmux_runtime::config::{ConfigLoader, EvmuxConfig};
///
/// let config = ConfigLoader::new()
///     .skip_global_config()
///     .skip_env_vars()
///     .load()
///     .unwrap();
/// assert_eq!(config, EvmuxConfig::default());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Global config file path (defaults to ~/.evmux/config.toml).
    global_config_path: Option<PathBuf>,

    /// Explicit config file, layered over the global one.
    file: Option<PathBuf>,

    /// Skip environment variable loading.
    skip_env: bool,

    /// Skip global config loading.
    skip_global: bool,
}

impl ConfigLoader {
    /// Creates a new loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Layers `path` over the global config.
    ///
    /// Unlike the global config, this file must exist.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Skips environment variable loading.
    ///
    /// Useful for testing with deterministic config.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Skips global config loading.
    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file can not be read or
    /// parsed, or an environment variable holds an invalid value. A
    /// missing global config is silently ignored.
    pub fn load(&self) -> Result<EvmuxConfig, ConfigError> {
        let mut config = EvmuxConfig::default();

        // Layer 1: Global config
        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if global_path.exists() {
                let global = load_file(&global_path)?;
                debug!(path = %global_path.display(), "Loaded global config");
                config.merge(&global);
            }
        }

        // Layer 2: Explicit file
        if let Some(ref path) = self.file {
            let file_config = load_file(path)?;
            debug!(path = %path.display(), "Loaded config file");
            config.merge(&file_config);
        }

        // Layer 3: Environment variables
        if !self.skip_env {
            apply_env_vars(&mut config)?;
        }

        Ok(config)
    }
}

fn load_file(path: &Path) -> Result<EvmuxConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    EvmuxConfig::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))
}

/// Applies environment variable overrides to the shared channel
/// defaults. Log paths set here are qualified per channel by
/// [`EvmuxConfig::channel_config`].
fn apply_env_vars(config: &mut EvmuxConfig) -> Result<(), ConfigError> {
    parse_env_bool!(config.debug, "EVMUX_DEBUG");
    parse_env_bool!(
        config.channel.delete_recordings_on_abort,
        "EVMUX_DELETE_RECORDINGS_ON_ABORT"
    );

    if let Ok(val) = std::env::var("EVMUX_RECORD_INPUT_FILE") {
        config.channel.record_input_file = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("EVMUX_RECORD_OUTPUT_FILE") {
        config.channel.record_output_file = PathBuf::from(val);
    }

    Ok(())
}

/// Parses a boolean from string.
///
/// Accepts: "true", "false", "1", "0", "yes", "no", "on", "off"
/// (case-insensitive).
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
