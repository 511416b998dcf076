//! Shared multi-bit wake flag.
//!
//! An [`EventFlag`] is a condition variable with one bit per
//! participant. Participants register once and keep their
//! [`SourceBit`] for the life of the flag; bits are never reused or
//! unregistered.
//!
//! ```text
//!  bit:    0      1      2      3
//!        ┌────┬──────┬──────┬──────┐
//!        │ hub│ ch:a │ ch:b │ ch:c │   raised = any bit set
//!        └────┴──────┴──────┴──────┘
//!         async  sync   sync   sync
//! ```
//!
//! A wait only makes sense if somebody could raise a bit from another
//! thread while the waiter sleeps. Sources register as either
//! [`SourceKind::Asynchronous`] (a producer thread, a hub) or
//! [`SourceKind::Synchronous`] (raised only by the waiting thread
//! itself). With no asynchronous source, [`EventFlag::wait`] refuses to
//! sleep and returns [`FlagError::WouldBlockForever`].
//!
//! # Example
//!
//! ```
//! use evmux_runtime::flag::{EventFlag, SourceKind};
//! use std::sync::Arc;
//!
//! let flag = Arc::new(EventFlag::new());
//! let producer = flag.add_source(SourceKind::Asynchronous);
//!
//! let waiter = {
//!     let flag = Arc::clone(&flag);
//!     std::thread::spawn(move || flag.wait())
//! };
//!
//! flag.raise(producer);
//! assert!(waiter.join().unwrap().is_ok());
//! assert!(flag.is_raised());
//! ```

use evmux_types::ErrorCode;
use parking_lot::{Condvar, Mutex};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Whether a source can raise its bit from another thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Only ever raised by the thread that also waits.
    Synchronous,
    /// May be raised concurrently with a waiter.
    Asynchronous,
}

impl SourceKind {
    /// Returns `true` for [`SourceKind::Asynchronous`].
    #[must_use]
    pub fn is_async(self) -> bool {
        matches!(self, Self::Asynchronous)
    }
}

/// Stable bit index handed out by [`EventFlag::add_source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceBit(usize);

impl SourceBit {
    /// Returns the raw index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for SourceBit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bit:{}", self.0)
    }
}

/// Flag failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// No asynchronous source is registered, so nothing could ever wake
    /// a waiter.
    #[error("wait would block forever: no asynchronous source is registered")]
    WouldBlockForever,
}

impl ErrorCode for FlagError {
    fn code(&self) -> &'static str {
        match self {
            Self::WouldBlockForever => "FLAG_WOULD_BLOCK_FOREVER",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[derive(Debug)]
struct Source {
    kind: SourceKind,
    raised: bool,
}

#[derive(Debug, Default)]
struct FlagState {
    sources: Vec<Source>,
    raised_count: usize,
    async_count: usize,
}

/// Thread-safe multi-bit condition flag.
///
/// Shared by `Arc` between every channel and hub attached to it; the
/// flag lives as long as its longest holder.
#[derive(Debug, Default)]
pub struct EventFlag {
    state: Mutex<FlagState>,
    raised: Condvar,
}

impl EventFlag {
    /// Creates a flag with no sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a participant and returns its permanent bit.
    pub fn add_source(&self, kind: SourceKind) -> SourceBit {
        let mut state = self.state.lock();
        let bit = SourceBit(state.sources.len());
        state.sources.push(Source {
            kind,
            raised: false,
        });
        if kind.is_async() {
            state.async_count += 1;
        }
        debug!(%bit, ?kind, "event flag source registered");
        bit
    }

    /// Sets `bit` and wakes every waiter.
    pub fn raise(&self, bit: SourceBit) {
        let mut state = self.state.lock();
        let Some(source) = state.sources.get_mut(bit.0) else {
            warn!(%bit, "raise on a bit this flag never issued");
            return;
        };
        if !source.raised {
            source.raised = true;
            state.raised_count += 1;
        }
        trace!(%bit, raised = state.raised_count, "event flag raised");
        self.raised.notify_all();
    }

    /// Clears `bit`.
    pub fn clear(&self, bit: SourceBit) {
        let mut state = self.state.lock();
        let Some(source) = state.sources.get_mut(bit.0) else {
            warn!(%bit, "clear on a bit this flag never issued");
            return;
        };
        if source.raised {
            source.raised = false;
            state.raised_count -= 1;
        }
        trace!(%bit, raised = state.raised_count, "event flag cleared");
    }

    /// Returns `true` if any bit is set.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.state.lock().raised_count > 0
    }

    /// Returns `true` if `bit` is set.
    #[must_use]
    pub fn is_source_raised(&self, bit: SourceBit) -> bool {
        self.state
            .lock()
            .sources
            .get(bit.0)
            .is_some_and(|s| s.raised)
    }

    /// Number of registered sources.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.state.lock().sources.len()
    }

    /// Number of registered asynchronous sources.
    #[must_use]
    pub fn async_source_count(&self) -> usize {
        self.state.lock().async_count
    }

    /// Blocks until any bit is set.
    ///
    /// Returns immediately if a bit is already set.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::WouldBlockForever`] without sleeping when the
    /// flag is clear and no asynchronous source exists. Callers must treat
    /// this as fatal; retrying can not change the outcome.
    pub fn wait(&self) -> Result<(), FlagError> {
        let mut state = self.state.lock();
        if state.raised_count == 0 && state.async_count == 0 {
            return Err(FlagError::WouldBlockForever);
        }
        while state.raised_count == 0 {
            self.raised.wait(&mut state);
        }
        Ok(())
    }
}
