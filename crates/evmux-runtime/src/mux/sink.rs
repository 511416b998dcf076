//! Multiplexer sinks.

use evmux_event::{EventMask, EventPath};
use std::fmt;

/// A consumer's routing predicate.
///
/// Returns the canonical id the consumer will see when it accepts `id`,
/// or `None` to pass.
pub trait Sink: Send + Sync {
    fn accept(&self, id: &EventPath) -> Option<EventPath>;
}

impl<F> Sink for F
where
    F: Fn(&EventPath) -> Option<EventPath> + Send + Sync,
{
    fn accept(&self, id: &EventPath) -> Option<EventPath> {
        self(id)
    }
}

/// Stable position of a sink in its multiplexer.
///
/// Lower indices were registered earlier and win ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SinkIndex(pub(crate) usize);

impl SinkIndex {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SinkIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sink:{}", self.0)
    }
}

/// Accepts ids matching a mask.
///
/// With a strip prefix, the canonical id loses that prefix, so a sink
/// on `"net.eth0.**"` stripping `"net.eth0"` hands `"rx.1"` to its
/// consumer for `"net.eth0.rx.1"`.
///
/// # Example
///
/// ```
/// use evmux_runtime::mux::{MaskSink, Sink};
/// use evmux_event::{EventMask, EventPath};
///
/// let sink = MaskSink::new(EventMask::parse("net.eth0.**").unwrap())
///     .with_strip_prefix(EventPath::parse("net.eth0").unwrap());
///
/// let id = EventPath::parse("net.eth0.rx.1").unwrap();
/// assert_eq!(sink.accept(&id).unwrap().as_str(), "rx.1");
/// assert!(sink.accept(&EventPath::parse("net.lo.rx").unwrap()).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct MaskSink {
    mask: EventMask,
    strip: Option<EventPath>,
}

impl MaskSink {
    #[must_use]
    pub fn new(mask: EventMask) -> Self {
        Self { mask, strip: None }
    }

    /// Removes `prefix` from accepted ids that extend it.
    #[must_use]
    pub fn with_strip_prefix(mut self, prefix: EventPath) -> Self {
        self.strip = Some(prefix);
        self
    }

    #[must_use]
    pub fn mask(&self) -> &EventMask {
        &self.mask
    }
}

impl Sink for MaskSink {
    fn accept(&self, id: &EventPath) -> Option<EventPath> {
        if !self.mask.matches(id) {
            return None;
        }
        let canonical = self
            .strip
            .as_ref()
            .and_then(|prefix| id.strip_prefix(prefix))
            .unwrap_or_else(|| id.clone());
        Some(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> EventPath {
        EventPath::parse(s).unwrap()
    }

    #[test]
    fn mask_sink_keeps_id() {
        let sink = MaskSink::new(EventMask::parse("a.*").unwrap());
        assert_eq!(sink.accept(&path("a.1")), Some(path("a.1")));
        assert_eq!(sink.accept(&path("b.1")), None);
        assert_eq!(sink.accept(&path("a.1.x")), None);
    }

    #[test]
    fn strip_leaves_exact_prefix_alone() {
        let sink = MaskSink::new(EventMask::parse("dev.**").unwrap())
            .with_strip_prefix(path("dev"));
        assert_eq!(sink.accept(&path("dev.tty.0")), Some(path("tty.0")));
        assert_eq!(sink.accept(&path("dev")), Some(path("dev")));
    }

    #[test]
    fn closures_are_sinks() {
        let upper = |id: &EventPath| (id.depth() == 1).then(|| id.clone());
        let sinks: Vec<Box<dyn Sink>> = vec![Box::new(upper)];
        assert!(sinks[0].accept(&path("top")).is_some());
        assert!(sinks[0].accept(&path("top.sub")).is_none());
    }

    #[test]
    fn index_display() {
        assert_eq!(SinkIndex(3).to_string(), "sink:3");
        assert!(SinkIndex(0) < SinkIndex(1));
    }
}
