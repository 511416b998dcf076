//! Event multiplexing.
//!
//! A [`Multiplexer`] owns one FIFO queue and an ordered list of
//! [`Sink`]s. Producers [`publish`](Multiplexer::publish); each consumer
//! polls or waits for the head of the queue through its own
//! [`SinkIndex`], usually wrapped in a [`MuxChannel`].
//!
//! ```text
//!  producers                      consumers
//!  ─────────                      ─────────
//!  publish ──▶ ┌─────────────┐ ──▶ MuxChannel (sink:0, "a.*")
//!  publish ──▶ │ Multiplexer │ ──▶ MuxChannel (sink:1, "b.*")
//!              └──────┬──────┘
//!                     │ raise
//!                     ▼
//!                 EventFlag (shared with other hubs and channels)
//! ```

mod channel;
mod multiplexer;
mod sink;

pub use channel::MuxChannel;
pub use multiplexer::{Multiplexer, MuxStats};
pub use sink::{MaskSink, Sink, SinkIndex};
