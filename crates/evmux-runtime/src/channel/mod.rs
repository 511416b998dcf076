//! Channels: masked event endpoints.
//!
//! A channel is where a consumer asks for "the next event matching this
//! mask" and where a producer posts events. Every channel shares the
//! same lifecycle, flag binding and recording through a composed
//! [`ChannelCore`]; implementations differ only in where events come
//! from.
//!
//! # Channel Lifecycle
//!
//! ```text
//! ┌────────┐  init()   ┌──────┐  close()   ┌────────┐
//! │ Closed │ ────────▶ │ Open │ ─────────▶ │ Closed │  logs renamed
//! └────────┘           └──┬───┘            └────────┘
//!                         │      abort()   ┌────────┐
//!                         └──────────────▶ │ Closed │  logs unlinked
//!                                          └────────┘
//! ```
//!
//! # Wait Modes
//!
//! | Mode | Nothing pending | Something else pending |
//! |------|-----------------|------------------------|
//! | `NoWait` | `WAIT` | `OUTOFSEQ` |
//! | `Wait` | sleep on the shared flag, then `OUTOFSEQ` | `OUTOFSEQ` |
//! | `Block` | sleep until a matching event | sleep until a matching event |
//!
//! A `Block` call that finds the head already assigned elsewhere by an
//! earlier scan returns `OUTOFSEQ` instead of sleeping.
//!
//! Channels without a queue reject `Block`, and reject `Wait` when no
//! flag could ever wake them, with [`ChannelError::IllegalWait`].

mod base;
mod config;
mod error;
mod shared;
mod traits;

pub use base::BaseChannel;
pub use config::ChannelConfig;
pub use error::ChannelError;
pub use shared::{ChannelCore, ChannelState, FlagBinding};
pub use traits::{Channel, EventOutlet};
