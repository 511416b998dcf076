//! Query result codes and wait policies.
//!
//! Query operations (`get_event`, `has_event`) never raise for flow
//! control: every ordinary outcome is an [`EventStatus`]. Only waits that
//! can be proven unsatisfiable are reported as errors, by the runtime.
//!
//! ```text
//!             nothing pending     pending, not yours     yours
//! NoWait  ─►       Wait              OutOfSeq           Success
//! Wait    ─►  (sleep on flag)        OutOfSeq           Success
//! Block   ─►  (sleep on queue)    (sleep on queue)      Success
//! ```

use crate::Event;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of an event query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventStatus {
    /// A matching event was found.
    Success,
    /// Nothing is pending anywhere.
    Wait,
    /// Something is pending, but not for this caller and mask.
    OutOfSeq,
    /// The channel or hub is shut.
    Closed,
    /// The query could not be evaluated.
    Error,
}

impl EventStatus {
    /// Returns the upper-case wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Wait => "WAIT",
            Self::OutOfSeq => "OUTOFSEQ",
            Self::Closed => "CLOSED",
            Self::Error => "ERROR",
        }
    }

    /// Returns `true` for [`EventStatus::Success`].
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long a query may suspend the caller.
///
/// `Wait` and `Block` are not interchangeable. `Wait` wakes on *any*
/// channel's activity and reports [`EventStatus::OutOfSeq`] when the
/// activity was not for the caller. `Block` keeps retrying until the
/// caller's own event arrives or the hub stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitMode {
    /// Never suspend.
    #[default]
    NoWait,
    /// Suspend until anything happens on the shared flag.
    Wait,
    /// Suspend until a matching event is available.
    Block,
}

impl WaitMode {
    /// Returns the lower-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoWait => "nowait",
            Self::Wait => "wait",
            Self::Block => "block",
        }
    }
}

impl fmt::Display for WaitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nowait" | "no-wait" => Ok(Self::NoWait),
            "wait" => Ok(Self::Wait),
            "block" => Ok(Self::Block),
            other => Err(format!("unknown wait mode '{other}'")),
        }
    }
}

/// Result of a consuming query.
///
/// `Delivered` always corresponds to [`EventStatus::Success`]; every
/// other status travels as `Pending`.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch {
    /// The event handed to the caller.
    Delivered(Event),
    /// No event; the status says why.
    Pending(EventStatus),
}

impl Fetch {
    /// Returns the status code of this result.
    #[must_use]
    pub fn status(&self) -> EventStatus {
        match self {
            Self::Delivered(_) => EventStatus::Success,
            Self::Pending(status) => *status,
        }
    }

    /// Borrows the delivered event, if any.
    #[must_use]
    pub fn event(&self) -> Option<&Event> {
        match self {
            Self::Delivered(event) => Some(event),
            Self::Pending(_) => None,
        }
    }

    /// Takes the delivered event, if any.
    #[must_use]
    pub fn into_event(self) -> Option<Event> {
        match self {
            Self::Delivered(event) => Some(event),
            Self::Pending(_) => None,
        }
    }
}

impl From<EventStatus> for Fetch {
    fn from(status: EventStatus) -> Self {
        Self::Pending(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventCategory;

    #[test]
    fn status_names() {
        assert_eq!(EventStatus::OutOfSeq.to_string(), "OUTOFSEQ");
        assert_eq!(EventStatus::Success.as_str(), "SUCCESS");
        assert!(EventStatus::Success.is_success());
        assert!(!EventStatus::Wait.is_success());
    }

    #[test]
    fn wait_mode_parse() {
        assert_eq!("NOWAIT".parse::<WaitMode>(), Ok(WaitMode::NoWait));
        assert_eq!("no-wait".parse::<WaitMode>(), Ok(WaitMode::NoWait));
        assert_eq!("block".parse::<WaitMode>(), Ok(WaitMode::Block));
        assert_eq!("Wait".parse::<WaitMode>(), Ok(WaitMode::Wait));
        assert!("forever".parse::<WaitMode>().is_err());
        assert_eq!(WaitMode::default(), WaitMode::NoWait);
    }

    #[test]
    fn fetch_accessors() {
        let event = Event::parse("a.1", EventCategory::Data).unwrap();
        let delivered = Fetch::Delivered(event.clone());
        assert_eq!(delivered.status(), EventStatus::Success);
        assert_eq!(delivered.event(), Some(&event));
        assert_eq!(delivered.into_event(), Some(event));

        let pending = Fetch::from(EventStatus::Closed);
        assert_eq!(pending.status(), EventStatus::Closed);
        assert!(pending.into_event().is_none());
    }
}
