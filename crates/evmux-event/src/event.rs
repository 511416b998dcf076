//! Events and their payload handles.

use crate::EventCategory;
use evmux_types::{EventPath, PathError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Opaque, reference-counted payload handle.
///
/// Cloning a `Payload` bumps a reference count; the body is never
/// copied while an event moves from producer to queue to consumer.
/// Nothing in the multiplexing core inspects the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Arc<Value>);

impl Payload {
    /// Wraps a JSON value.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    /// Borrows the body.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Returns `true` if both handles share one allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// A single event.
///
/// `address` is the source when the event is delivered to a consumer
/// and the destination when a consumer posts it. Either side may leave
/// it empty.
///
/// # Example
///
/// ```
/// use evmux_event::{Event, EventCategory};
/// use serde_json::json;
///
/// let event = Event::parse("obs.frame", EventCategory::Data)
///     .unwrap()
///     .with_payload(json!({"exposure": 30}))
///     .with_address("ccd.0".parse().unwrap());
///
/// assert_eq!(event.id.as_str(), "obs.frame");
/// assert!(event.has_address());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Hierarchical name.
    pub id: EventPath,
    /// Optional body.
    pub payload: Option<Payload>,
    /// Coarse tag.
    pub category: EventCategory,
    /// Source on delivery, destination on post.
    pub address: Option<EventPath>,
}

impl Event {
    /// Creates an event with no payload and no address.
    #[must_use]
    pub fn new(id: EventPath, category: EventCategory) -> Self {
        Self {
            id,
            payload: None,
            category,
            address: None,
        }
    }

    /// Parses `id` and creates an event.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] if `id` is not a valid path.
    pub fn parse(id: &str, category: EventCategory) -> Result<Self, PathError> {
        Ok(Self::new(EventPath::parse(id)?, category))
    }

    /// Attaches a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Attaches an address.
    #[must_use]
    pub fn with_address(mut self, address: EventPath) -> Self {
        self.address = Some(address);
        self
    }

    /// Returns `true` if a source/destination address is set.
    #[must_use]
    pub fn has_address(&self) -> bool {
        self.address.is_some()
    }
}
