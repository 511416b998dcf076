//! Channel trait definitions.
//!
//! [`Channel`] is the contract consumers and producers program against.
//! Implementations only provide access to their [`ChannelCore`]; every
//! method has a default body built on it, and queue-backed channels
//! override the query methods.

use super::{ChannelConfig, ChannelCore, ChannelError, ChannelState};
use crate::flag::{EventFlag, SourceBit, SourceKind};
use evmux_event::{Event, EventCategory, EventMask, EventPath, EventStatus, Fetch, WaitMode};
use evmux_types::ChannelId;
use std::sync::Arc;
use tracing::trace;

/// Where posted events go.
///
/// Returns `true` if the event was accepted.
pub trait EventOutlet: Send + Sync {
    fn send(&self, event: Event) -> bool;
}

impl<F> EventOutlet for F
where
    F: Fn(Event) -> bool + Send + Sync,
{
    fn send(&self, event: Event) -> bool {
        self(event)
    }
}

/// A masked event endpoint.
///
/// # Implementors
///
/// - [`BaseChannel`](super::BaseChannel): no queue; only evaluates wait
///   policy
/// - [`MuxChannel`](crate::mux::MuxChannel): one sink of a shared
///   [`Multiplexer`](crate::mux::Multiplexer)
///
/// # Example
///
/// ```
/// use evmux_runtime::{BaseChannel, Channel, ChannelConfig};
/// use evmux_event::{EventMask, EventStatus, Fetch, WaitMode};
///
/// let mut channel = BaseChannel::new("ch0");
/// channel.init(&ChannelConfig::default()).unwrap();
///
/// let mask = EventMask::any();
/// let fetched = channel.get_event(&mask, WaitMode::NoWait).unwrap();
/// assert_eq!(fetched, Fetch::Pending(EventStatus::Wait));
///
/// channel.close("done").unwrap();
/// assert_eq!(channel.has_event(&mask), EventStatus::Closed);
/// ```
pub trait Channel: Send {
    /// Shared state.
    fn core(&self) -> &ChannelCore;

    /// Shared state, mutably.
    fn core_mut(&mut self) -> &mut ChannelCore;

    // === Identity ===

    fn id(&self) -> ChannelId {
        self.core().id()
    }

    fn name(&self) -> &str {
        self.core().name()
    }

    fn state(&self) -> ChannelState {
        self.core().state()
    }

    fn is_open(&self) -> bool {
        self.core().is_open()
    }

    // === Lifecycle ===

    /// Opens requested recordings and moves to `Open`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Recording`] when a log can not be created.
    fn init(&mut self, config: &ChannelConfig) -> Result<(), ChannelError> {
        self.core_mut().open(config)
    }

    /// Finishes recordings and moves to `Closed`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Recording`] when a log can not be renamed.
    fn close(&mut self, reason: &str) -> Result<(), ChannelError> {
        self.core_mut().close(reason)
    }

    /// Discards recordings and moves to `Closed`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Recording`] when a log can not be removed.
    fn abort(&mut self, reason: &str) -> Result<(), ChannelError> {
        self.core_mut().abort(reason)
    }

    /// Associates the channel with a shared flag.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::FlagConflict`] if already attached
    /// elsewhere.
    fn attach(&mut self, flag: &Arc<EventFlag>, kind: SourceKind) -> Result<SourceBit, ChannelError> {
        self.core_mut().attach(flag, kind)
    }

    // === Queries ===

    /// Fetches the next event matching `mask`.
    ///
    /// The default has no queue, so it never delivers; it only applies
    /// `mode` through [`wait_on_flag`](Self::wait_on_flag).
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::IllegalWait`] for waits that could never
    /// end.
    fn get_event(&mut self, mask: &EventMask, mode: WaitMode) -> Result<Fetch, ChannelError> {
        trace!(channel = %self.id(), mask = %mask, %mode, "get_event");
        if !self.is_open() {
            return Ok(Fetch::Pending(EventStatus::Closed));
        }
        self.wait_on_flag(mode).map(Fetch::Pending)
    }

    /// Non-blocking probe.
    ///
    /// The default answers [`EventStatus::OutOfSeq`] if anyone has raised
    /// the shared flag, else [`EventStatus::Wait`].
    fn has_event(&self, _mask: &EventMask) -> EventStatus {
        if !self.is_open() {
            EventStatus::Closed
        } else if self.core().is_flag_raised() {
            EventStatus::OutOfSeq
        } else {
            EventStatus::Wait
        }
    }

    /// Records `event` to the output log and hands it on.
    ///
    /// The default only records.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Closed`] when not open, or
    /// [`ChannelError::Recording`] when the log write fails.
    fn post_event(&mut self, event: Event) -> Result<(), ChannelError> {
        self.core().ensure_open()?;
        self.core_mut().recorder_mut().record_output(&event)?;
        trace!(channel = %self.id(), event = %event.id, "event posted");
        Ok(())
    }

    /// Cheap check so producers can skip building unwanted payloads.
    fn is_event_bound(&self, _id: &EventPath, _category: &EventCategory) -> bool {
        false
    }

    /// Pushes buffered recordings to disk.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Recording`] on write failure.
    fn flush(&mut self) -> Result<(), ChannelError> {
        self.core_mut().recorder_mut().flush()?;
        Ok(())
    }

    // === Flag ===

    fn raise_event_flag(&self) {
        self.core().raise_flag();
    }

    fn clear_event_flag(&self) {
        self.core().clear_flag();
    }

    /// Applies `mode` against the attached flag.
    ///
    /// # Errors
    ///
    /// See [`ChannelCore::wait_on_flag`].
    fn wait_on_flag(&self, mode: WaitMode) -> Result<EventStatus, ChannelError> {
        self.core().wait_on_flag(mode)
    }
}
