//! Channel backed by one sink of a shared multiplexer.

use super::{Multiplexer, SinkIndex};
use crate::channel::{Channel, ChannelCore, ChannelError, EventOutlet};
use crate::flag::SourceKind;
use evmux_event::{Event, EventCategory, EventMask, EventPath, EventStatus, Fetch, WaitMode};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A [`Channel`] reading from a [`Multiplexer`] as one sink.
///
/// Queries go to the hub for this channel's sink; delivered events are
/// written to the input log. Posted events are written to the output
/// log and handed to the outlet, which defaults to publishing back into
/// the same hub.
pub struct MuxChannel {
    core: ChannelCore,
    hub: Arc<Multiplexer>,
    sink: SinkIndex,
    outlet: Arc<dyn EventOutlet>,
}

impl MuxChannel {
    /// Binds a new channel to `sink` of `hub` and attaches it to the
    /// hub's flag.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::FlagConflict`] only if attaching fails,
    /// which a fresh channel never does.
    pub fn new(
        name: impl Into<String>,
        hub: Arc<Multiplexer>,
        sink: SinkIndex,
    ) -> Result<Self, ChannelError> {
        let mut core = ChannelCore::new(name);
        core.attach(hub.flag(), SourceKind::Synchronous)?;
        let outlet: Arc<dyn EventOutlet> = Arc::clone(&hub) as Arc<dyn EventOutlet>;
        Ok(Self {
            core,
            hub,
            sink,
            outlet,
        })
    }

    /// Sends posted events to `outlet` instead of the hub.
    #[must_use]
    pub fn with_outlet(mut self, outlet: Arc<dyn EventOutlet>) -> Self {
        self.outlet = outlet;
        self
    }

    #[must_use]
    pub fn sink(&self) -> SinkIndex {
        self.sink
    }

    #[must_use]
    pub fn hub(&self) -> &Arc<Multiplexer> {
        &self.hub
    }
}

impl fmt::Debug for MuxChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MuxChannel")
            .field("core", &self.core)
            .field("hub", &self.hub.name())
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

impl Channel for MuxChannel {
    fn core(&self) -> &ChannelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ChannelCore {
        &mut self.core
    }

    fn get_event(&mut self, mask: &EventMask, mode: WaitMode) -> Result<Fetch, ChannelError> {
        if !self.core.is_open() {
            return Ok(Fetch::Pending(EventStatus::Closed));
        }
        let fetched = self.hub.get_event(mask, mode, self.sink);
        if let Fetch::Delivered(event) = &fetched {
            trace!(channel = %self.core.id(), sink = %self.sink, event = %event.id, "event received");
            self.core.recorder_mut().record_input(event)?;
        }
        Ok(fetched)
    }

    fn has_event(&self, mask: &EventMask) -> EventStatus {
        if !self.core.is_open() {
            return EventStatus::Closed;
        }
        self.hub.has_event(mask, self.sink)
    }

    fn post_event(&mut self, event: Event) -> Result<(), ChannelError> {
        self.core.ensure_open()?;
        self.core.recorder_mut().record_output(&event)?;
        let id = event.id.clone();
        if !self.outlet.send(event) {
            debug!(channel = %self.core.id(), event = %id, "outlet refused posted event");
        }
        Ok(())
    }

    fn is_event_bound(&self, id: &EventPath, _category: &EventCategory) -> bool {
        self.hub.is_bound(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelConfig;
    use crate::mux::MaskSink;

    fn mask(s: &str) -> EventMask {
        EventMask::parse(s).unwrap()
    }

    fn event(id: &str) -> Event {
        Event::parse(id, EventCategory::Data).unwrap()
    }

    fn open_pair() -> (Arc<Multiplexer>, MuxChannel, MuxChannel) {
        let hub = Arc::new(Multiplexer::standalone("test"));
        let a = hub.add_sink(MaskSink::new(mask("a.*")));
        let b = hub.add_sink(MaskSink::new(mask("b.*")));
        let mut ca = MuxChannel::new("a", Arc::clone(&hub), a).unwrap();
        let mut cb = MuxChannel::new("b", Arc::clone(&hub), b).unwrap();
        ca.init(&ChannelConfig::default()).unwrap();
        cb.init(&ChannelConfig::default()).unwrap();
        (hub, ca, cb)
    }

    #[test]
    fn attaches_to_hub_flag() {
        let (hub, _a, _b) = open_pair();
        // hub bit plus one per channel
        assert_eq!(hub.flag().source_count(), 3);
        assert_eq!(hub.flag().async_source_count(), 1);
    }

    #[test]
    fn post_publishes_into_hub() {
        let (_hub, mut a, mut b) = open_pair();
        b.post_event(event("a.1")).unwrap();

        assert_eq!(b.has_event(&mask("**")), EventStatus::OutOfSeq);
        let got = a.get_event(&mask("a.*"), WaitMode::NoWait).unwrap();
        assert_eq!(got.event().map(|e| e.id.as_str()), Some("a.1"));
    }

    #[test]
    fn is_event_bound_asks_hub() {
        let (_hub, a, _b) = open_pair();
        assert!(a.is_event_bound(&"b.3".parse().unwrap(), &EventCategory::Data));
        assert!(!a.is_event_bound(&"z".parse().unwrap(), &EventCategory::Data));
    }

    #[test]
    fn closed_channel_does_not_touch_hub() {
        let (hub, mut a, _b) = open_pair();
        hub.publish(event("a.1"));
        a.close("done").unwrap();

        assert_eq!(a.has_event(&mask("a.*")), EventStatus::Closed);
        assert_eq!(
            a.get_event(&mask("a.*"), WaitMode::NoWait).unwrap(),
            Fetch::Pending(EventStatus::Closed)
        );
        assert_eq!(hub.stats().queued, 1);
    }

    #[test]
    fn stopped_hub_reports_closed() {
        let (hub, mut a, _b) = open_pair();
        hub.stop();
        assert_eq!(
            a.get_event(&mask("a.*"), WaitMode::Block).unwrap(),
            Fetch::Pending(EventStatus::Closed)
        );
    }
}
