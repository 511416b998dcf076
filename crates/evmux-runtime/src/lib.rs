//! evmux runtime: the machinery that moves events.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Type Layer                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  evmux-types : ChannelId, EventPath, EventMask, ErrorCode   │
//! │  evmux-event : Event, Payload, EventStatus, WaitMode, Fetch │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Runtime Layer (THIS CRATE)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  flag/      : EventFlag, SourceBit                          │
//! │  channel/   : Channel, ChannelCore, BaseChannel             │
//! │  mux/       : Multiplexer, Sink, MuxChannel                 │
//! │  recording/ : Recorder, RecordStream, read_records          │
//! │  config/    : EvmuxConfig, ConfigLoader                     │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Frontend Layer                             │
//! │  (evmux-cli)                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! ## [`flag`] - Wake-up Flags
//!
//! - [`EventFlag`](flag::EventFlag): multi-bit condition shared by
//!   channels and hubs
//!
//! ## [`channel`] - Endpoints
//!
//! - [`Channel`](channel::Channel): lifecycle, queries, posting
//! - [`BaseChannel`](channel::BaseChannel): no queue, wait policy only
//!
//! ## [`mux`] - Multiplexing
//!
//! - [`Multiplexer`](mux::Multiplexer): FIFO queue with ordered sinks
//! - [`MuxChannel`](mux::MuxChannel): a channel reading one sink
//!
//! ## [`recording`] - Event Logs
//!
//! - [`Recorder`](recording::Recorder): per-channel input/output logs
//! - [`read_records`](recording::read_records): read a log back
//!
//! ## [`config`] - Configuration Management
//!
//! - [`ConfigLoader`](config::ConfigLoader): defaults, files, `EVMUX_*`

pub mod channel;
pub mod config;
pub mod flag;
pub mod mux;
pub mod recording;

// Re-exports for convenience
pub use channel::{
    BaseChannel, Channel, ChannelConfig, ChannelCore, ChannelError, ChannelState, EventOutlet,
    FlagBinding,
};
pub use config::{default_config_dir, default_config_path, ConfigError, ConfigLoader, EvmuxConfig};
pub use flag::{EventFlag, FlagError, SourceBit, SourceKind};
pub use mux::{MaskSink, Multiplexer, MuxChannel, MuxStats, Sink, SinkIndex};
pub use recording::{read_records, Record, RecordStream, Recorder, RecordingError};
