//! Event types for evmux.
//!
//! Producers publish [`Event`]s into a shared queue; consumers pull the
//! ones that match their mask. This crate defines what travels and what
//! a query answers, without any of the machinery that moves it.
//!
//! # Event Flow
//!
//! ```text
//! producer ──publish──► ┌──────────────────┐
//!                       │   Multiplexer    │ ──► sink 0 (mask "a.*")
//!                       │  FIFO + dispatch │ ──► sink 1 (mask "b.*")
//!                       └──────────────────┘
//!                                │
//!                                ▼
//!                  Fetch::Delivered(Event) │ Fetch::Pending(EventStatus)
//! ```
//!
//! # Usage
//!
//! ```
//! use evmux_event::{Event, EventCategory, EventStatus, Fetch, WaitMode};
//!
//! let event = Event::parse("a.1", EventCategory::Data).unwrap();
//! let fetched = Fetch::Delivered(event);
//! assert_eq!(fetched.status(), EventStatus::Success);
//! assert_eq!(WaitMode::default(), WaitMode::NoWait);
//! ```

mod category;
mod event;
mod status;

pub use category::EventCategory;
pub use event::{Event, Payload};
pub use status::{EventStatus, Fetch, WaitMode};

pub use evmux_types::{EventMask, EventPath};
