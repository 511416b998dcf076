//! State shared by every channel implementation.

use super::{ChannelConfig, ChannelError};
use crate::flag::{EventFlag, SourceBit, SourceKind};
use crate::recording::Recorder;
use evmux_event::{EventStatus, WaitMode};
use evmux_types::ChannelId;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lifecycle state of a channel.
///
/// ```text
/// Closed ──init──► Open ──close/abort──► Closed
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ChannelState {
    /// Not initialized, or shut down.
    #[default]
    Closed,
    /// Accepting queries and posts.
    Open,
}

/// A channel's claim on an [`EventFlag`]: the shared flag plus the bit
/// it was handed.
#[derive(Debug, Clone)]
pub struct FlagBinding {
    flag: Arc<EventFlag>,
    bit: SourceBit,
}

impl FlagBinding {
    /// The shared flag.
    #[must_use]
    pub fn flag(&self) -> &Arc<EventFlag> {
        &self.flag
    }

    /// This channel's bit in the flag.
    #[must_use]
    pub fn bit(&self) -> SourceBit {
        self.bit
    }
}

/// Identity, lifecycle, flag binding and recording of one channel.
///
/// Concrete channels embed a `ChannelCore` and expose it through
/// [`Channel::core`](super::Channel::core); the trait's default methods
/// do the rest.
#[derive(Debug)]
pub struct ChannelCore {
    id: ChannelId,
    name: String,
    state: ChannelState,
    binding: Option<FlagBinding>,
    recorder: Recorder,
}

impl ChannelCore {
    /// Creates a closed, unattached core.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ChannelId::new(),
            name: name.into(),
            state: ChannelState::Closed,
            binding: None,
            recorder: Recorder::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ChannelId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn state(&self) -> ChannelState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == ChannelState::Open
    }

    /// The flag binding, if attached.
    #[must_use]
    pub fn binding(&self) -> Option<&FlagBinding> {
        self.binding.as_ref()
    }

    pub fn recorder_mut(&mut self) -> &mut Recorder {
        &mut self.recorder
    }

    /// Fails with [`ChannelError::Closed`] unless open.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn ensure_open(&self) -> Result<(), ChannelError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(ChannelError::Closed(self.id))
        }
    }

    /// Opens the recordings `config` asks for and moves to `Open`.
    ///
    /// Re-initializing an open channel closes it first.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Recording`] if a log can not be created;
    /// the channel stays closed.
    pub fn open(&mut self, config: &ChannelConfig) -> Result<(), ChannelError> {
        if self.is_open() {
            debug!(channel = %self.id, name = %self.name, "re-init closes the channel first");
            self.close("re-init")?;
        }
        self.recorder.open(config)?;
        self.state = ChannelState::Open;
        info!(
            channel = %self.id,
            name = %self.name,
            recording = self.recorder.is_recording(),
            "channel opened"
        );
        Ok(())
    }

    /// Finishes recordings and moves to `Closed`.
    ///
    /// The channel is closed even when finishing a log fails.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Recording`] if a log could not be renamed.
    pub fn close(&mut self, reason: &str) -> Result<(), ChannelError> {
        if !self.is_open() {
            return Ok(());
        }
        self.state = ChannelState::Closed;
        let finished = self.recorder.finish();
        info!(channel = %self.id, name = %self.name, reason, "channel closed");
        finished.map(|_| ()).map_err(ChannelError::from)
    }

    /// Discards recordings, then closes.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Recording`] if a temp log could not be
    /// removed.
    pub fn abort(&mut self, reason: &str) -> Result<(), ChannelError> {
        if !self.is_open() {
            return Ok(());
        }
        warn!(channel = %self.id, name = %self.name, reason, "channel aborted");
        let discarded = self.recorder.discard();
        self.close(reason)?;
        discarded.map_err(ChannelError::from)
    }

    /// Registers this channel on `flag`.
    ///
    /// Attaching to the flag already held is a no-op returning the
    /// existing bit.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::FlagConflict`] when already attached to a
    /// different flag.
    pub fn attach(
        &mut self,
        flag: &Arc<EventFlag>,
        kind: SourceKind,
    ) -> Result<SourceBit, ChannelError> {
        if let Some(binding) = &self.binding {
            if Arc::ptr_eq(&binding.flag, flag) {
                return Ok(binding.bit);
            }
            return Err(ChannelError::FlagConflict(self.id));
        }
        let bit = flag.add_source(kind);
        debug!(channel = %self.id, %bit, ?kind, "channel attached to event flag");
        self.binding = Some(FlagBinding {
            flag: Arc::clone(flag),
            bit,
        });
        Ok(bit)
    }

    /// Sets this channel's bit. No-op when unattached.
    pub fn raise_flag(&self) {
        if let Some(binding) = &self.binding {
            binding.flag.raise(binding.bit);
        }
    }

    /// Clears this channel's bit. No-op when unattached.
    pub fn clear_flag(&self) {
        if let Some(binding) = &self.binding {
            binding.flag.clear(binding.bit);
        }
    }

    /// Returns `true` if the attached flag has any bit set.
    #[must_use]
    pub fn is_flag_raised(&self) -> bool {
        self.binding.as_ref().is_some_and(|b| b.flag.is_raised())
    }

    /// Applies `mode` for a channel with no queue of its own.
    ///
    /// - `NoWait` answers [`EventStatus::Wait`] at once.
    /// - `Wait` sleeps on the attached flag and answers
    ///   [`EventStatus::OutOfSeq`]: something happened somewhere, look
    ///   again.
    /// - `Block` can never be satisfied without a queue.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::IllegalWait`] instead of hanging when the
    /// wait could never end.
    pub fn wait_on_flag(&self, mode: WaitMode) -> Result<EventStatus, ChannelError> {
        match mode {
            WaitMode::NoWait => Ok(EventStatus::Wait),
            WaitMode::Wait => {
                let binding = self
                    .binding
                    .as_ref()
                    .ok_or_else(|| self.illegal_wait(mode, "no event flag attached"))?;
                binding
                    .flag
                    .wait()
                    .map_err(|_| self.illegal_wait(mode, "event flag has no asynchronous source"))?;
                Ok(EventStatus::OutOfSeq)
            }
            WaitMode::Block => Err(self.illegal_wait(mode, "channel has no event queue")),
        }
    }

    fn illegal_wait(&self, mode: WaitMode, reason: &'static str) -> ChannelError {
        warn!(channel = %self.id, %mode, reason, "illegal wait");
        ChannelError::IllegalWait {
            channel: self.id,
            mode,
            reason,
        }
    }
}
