//! Configuration management with hierarchical layering.
//!
//! # Architecture
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌──────────────────────────────────────────┐
//! │  1. Environment Variables (EVMUX_*)      │  Runtime override
//! ├──────────────────────────────────────────┤
//! │  2. Explicit file (--config <path>)      │  Per-run
//! ├──────────────────────────────────────────┤
//! │  3. Global Config (~/.evmux/config.toml) │  User defaults
//! ├──────────────────────────────────────────┤
//! │  4. Default Values (compile-time)        │  Fallback
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `EVMUX_DEBUG` | `debug` | bool |
//! | `EVMUX_RECORD_INPUT_FILE` | `channel.record-input-file` | path |
//! | `EVMUX_RECORD_OUTPUT_FILE` | `channel.record-output-file` | path |
//! | `EVMUX_DELETE_RECORDINGS_ON_ABORT` | `channel.delete-recordings-on-abort` | bool |
//!
//! # Example Configuration
//!
//! ```toml
//! # ~/.evmux/config.toml
//! debug = false
//!
//! # Applies to every channel
//! [channel]
//! delete-recordings-on-abort = true
//!
//! # Applies to the channel named "audit" only
//! [channels.audit]
//! record-input-file = "/var/log/evmux/audit-in.log"
//! record-output-file = "/var/log/evmux/audit-out.log"
//! ```

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::EvmuxConfig;

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".evmux")
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}
