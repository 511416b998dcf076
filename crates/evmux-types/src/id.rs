//! Channel identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a channel endpoint.
///
/// Channels are named for humans, but names are not required to be
/// unique: two consumers may both call themselves `"science"`. The
/// UUID is what log lines and recordings use to tell them apart.
///
/// # Example
///
/// ```
/// use evmux_types::ChannelId;
///
/// let a = ChannelId::new();
/// let b = ChannelId::new();
/// assert_ne!(a, b);
/// assert!(a.to_string().starts_with("ch:"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub Uuid);

#[allow(clippy::new_without_default)] // a fresh id per call; Default would hide that
impl ChannelId {
    /// Creates a new [`ChannelId`] with a random UUID v4.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ch:{}", self.0)
    }
}
