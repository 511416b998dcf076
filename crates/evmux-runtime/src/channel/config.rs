//! Per-channel configuration.
//!
//! # TOML
//!
//! ```toml
//! record-input-file = "/var/log/evmux/in.log"
//! record-output-file = ""            # empty disables output recording
//! delete-recordings-on-abort = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Options a channel reads at `init`.
///
/// Recording is disabled unless a file is named. An empty path is the
/// same as no path.
///
/// # Example
///
/// ```
/// use evmux_runtime::ChannelConfig;
///
/// let config = ChannelConfig::default().with_output_recording("out.log");
/// assert!(config.input_recording().is_none());
/// assert_eq!(config.output_recording().unwrap().to_str(), Some("out.log"));
/// assert!(config.delete_recordings_on_abort);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ChannelConfig {
    /// Log of every event the channel delivers to its consumer.
    pub record_input_file: PathBuf,

    /// Log of every event posted through the channel.
    pub record_output_file: PathBuf,

    /// Write logs to `<name>.tmp` and unlink them on abort.
    pub delete_recordings_on_abort: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            record_input_file: PathBuf::new(),
            record_output_file: PathBuf::new(),
            delete_recordings_on_abort: true,
        }
    }
}

impl ChannelConfig {
    /// Sets the input recording file.
    #[must_use]
    pub fn with_input_recording(mut self, path: impl Into<PathBuf>) -> Self {
        self.record_input_file = path.into();
        self
    }

    /// Sets the output recording file.
    #[must_use]
    pub fn with_output_recording(mut self, path: impl Into<PathBuf>) -> Self {
        self.record_output_file = path.into();
        self
    }

    /// Sets whether logs are discarded on abort.
    #[must_use]
    pub fn with_delete_on_abort(mut self, delete: bool) -> Self {
        self.delete_recordings_on_abort = delete;
        self
    }

    /// The input log path, if input recording is enabled.
    #[must_use]
    pub fn input_recording(&self) -> Option<&Path> {
        non_empty(&self.record_input_file)
    }

    /// The output log path, if output recording is enabled.
    #[must_use]
    pub fn output_recording(&self) -> Option<&Path> {
        non_empty(&self.record_output_file)
    }

    /// Overrides fields of `self` that `other` sets away from the default.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.record_input_file != default.record_input_file {
            self.record_input_file = other.record_input_file.clone();
        }
        if other.record_output_file != default.record_output_file {
            self.record_output_file = other.record_output_file.clone();
        }
        if other.delete_recordings_on_abort != default.delete_recordings_on_abort {
            self.delete_recordings_on_abort = other.delete_recordings_on_abort;
        }
    }
}

fn non_empty(path: &Path) -> Option<&Path> {
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_disables_recording() {
        let config = ChannelConfig::default();
        assert!(config.input_recording().is_none());
        assert!(config.output_recording().is_none());
        assert!(config.delete_recordings_on_abort);
    }

    #[test]
    fn kebab_case_keys() {
        let config: ChannelConfig = toml::from_str(
            r#"
            record-input-file = "in.log"
            delete-recordings-on-abort = false
            "#,
        )
        .unwrap();
        assert_eq!(config.input_recording(), Some(Path::new("in.log")));
        assert!(config.output_recording().is_none());
        assert!(!config.delete_recordings_on_abort);
    }

    #[test]
    fn explicit_empty_path_is_disabled() {
        let config: ChannelConfig = toml::from_str(r#"record-output-file = """#).unwrap();
        assert!(config.output_recording().is_none());
    }

    #[test]
    fn merge_keeps_base_when_other_is_default() {
        let mut base = ChannelConfig::default()
            .with_input_recording("in.log")
            .with_delete_on_abort(false);
        base.merge(&ChannelConfig::default());
        assert_eq!(base.input_recording(), Some(Path::new("in.log")));
        assert!(!base.delete_recordings_on_abort);

        base.merge(&ChannelConfig::default().with_output_recording("out.log"));
        assert_eq!(base.output_recording(), Some(Path::new("out.log")));
    }
}
