//! Core types for evmux.
//!
//! evmux lets many independent consumers share one physical event
//! source, each pulling only the events that match a pattern it cares
//! about. This crate holds the vocabulary every other layer shares.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  evmux-types    : EventPath, EventMask, ChannelId,          │
//! │                   ErrorCode                    ◄── HERE     │
//! │  evmux-event    : Event, EventStatus, WaitMode, Payload     │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  evmux-runtime  : EventFlag, Channel, Multiplexer,          │
//! │                   recording, config                         │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  evmux-cli      : `evmux dump`, `evmux demo`, `evmux config` │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use evmux_types::{ChannelId, EventMask, EventPath};
//!
//! let id = EventPath::parse("a.1").unwrap();
//! let mask = EventMask::parse("a.*").unwrap();
//! assert!(mask.matches(&id));
//!
//! let channel = ChannelId::new();
//! assert!(channel.to_string().starts_with("ch:"));
//! ```

mod error;
mod id;
mod path;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::ChannelId;
pub use path::{EventMask, EventPath, PathError};
