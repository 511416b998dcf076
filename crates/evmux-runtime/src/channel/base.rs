//! Channel with no queue of its own.

use super::{Channel, ChannelCore, ChannelError, EventOutlet};
use evmux_event::Event;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The plain [`Channel`].
///
/// It never delivers an event: queries only apply the wait policy
/// against the attached flag. Posted events are recorded and, if an
/// outlet is set, handed to it.
pub struct BaseChannel {
    core: ChannelCore,
    outlet: Option<Arc<dyn EventOutlet>>,
}

impl BaseChannel {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            core: ChannelCore::new(name),
            outlet: None,
        }
    }

    /// Sends posted events to `outlet`.
    #[must_use]
    pub fn with_outlet(mut self, outlet: Arc<dyn EventOutlet>) -> Self {
        self.outlet = Some(outlet);
        self
    }
}

impl fmt::Debug for BaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseChannel")
            .field("core", &self.core)
            .field("has_outlet", &self.outlet.is_some())
            .finish()
    }
}

impl Channel for BaseChannel {
    fn core(&self) -> &ChannelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ChannelCore {
        &mut self.core
    }

    fn post_event(&mut self, event: Event) -> Result<(), ChannelError> {
        self.core.ensure_open()?;
        self.core.recorder_mut().record_output(&event)?;
        if let Some(outlet) = &self.outlet {
            if !outlet.send(event) {
                debug!(channel = %self.core.id(), "outlet refused posted event");
            }
        }
        Ok(())
    }
}
