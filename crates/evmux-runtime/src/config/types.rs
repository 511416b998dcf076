//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use crate::channel::ChannelConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers.
///
/// # Example
///
/// ```
/// use evmux_runtime::config::EvmuxConfig;
///
/// let config = EvmuxConfig::from_toml(
///     r#"
///     [channel]
///     record-output-file = "out.log"
///
///     [channels.audit]
///     record-input-file = "audit-in.log"
///     "#,
/// )
/// .unwrap();
///
/// let audit = config.channel_config("audit");
/// assert!(audit.input_recording().is_some());
/// assert!(audit.output_recording().is_some());
/// assert!(config.channel_config("other").input_recording().is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EvmuxConfig {
    /// Enable debug logging.
    pub debug: bool,

    /// Settings every channel starts from.
    pub channel: ChannelConfig,

    /// Per-channel overrides, keyed by channel name.
    pub channels: BTreeMap<String, ChannelConfig>,
}

impl EvmuxConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Effective settings for the channel called `name`.
    ///
    /// Log paths inherited from the base `[channel]` table get the
    /// channel name inserted before the extension (`out.log` becomes
    /// `out.alpha.log`), so channels sharing the base never write the
    /// same file. Paths from `[channels.<name>]` are used as given.
    #[must_use]
    pub fn channel_config(&self, name: &str) -> ChannelConfig {
        let mut config = self.channel.clone();
        let input = self.channel.input_recording().map(|p| per_channel_path(p, name));
        let output = self.channel.output_recording().map(|p| per_channel_path(p, name));
        if let Some(path) = input {
            config.record_input_file = path;
        }
        if let Some(path) = output {
            config.record_output_file = path;
        }
        if let Some(overrides) = self.channels.get(name) {
            config.merge(overrides);
        }
        config
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only if they
    /// differ from the default. Per-channel tables merge by name.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        self.channel.merge(&other.channel);
        for (name, overrides) in &other.channels {
            self.channels
                .entry(name.clone())
                .or_default()
                .merge(overrides);
        }
    }
}

fn per_channel_path(path: &Path, name: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = match path.extension() {
        Some(ext) => format!("{stem}.{name}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{name}"),
    };
    path.with_file_name(file)
}
