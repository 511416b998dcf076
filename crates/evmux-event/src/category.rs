//! Event categories.
//!
//! A category is a coarse tag carried alongside the hierarchical id.
//! The multiplexer never routes on it; it exists so producers can ask
//! whether anyone is bound to an event cheaply, and so recordings keep
//! the producer's intent.
//!
//! | Category | Purpose |
//! |----------|---------|
//! | `Lifecycle` | open, close, shutdown notices |
//! | `Control` | commands directed at a consumer |
//! | `Data` | bulk payload-carrying events |
//! | `Extension` | anything namespaced by a plugin |

use serde::{Deserialize, Serialize};

/// Coarse event tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Lifecycle notices (open, close, shutdown).
    Lifecycle,

    /// Commands directed at a consumer.
    Control,

    /// Payload-carrying data events.
    #[default]
    Data,

    /// Plugin-defined category.
    Extension {
        /// Owning namespace (e.g. `"fits"`).
        namespace: String,
        /// Kind within the namespace (e.g. `"header"`).
        kind: String,
    },
}

impl EventCategory {
    /// Creates an Extension category.
    ///
    /// ```
    /// use evmux_event::EventCategory;
    ///
    /// let cat = EventCategory::extension("fits", "header");
    /// assert_eq!(cat.name(), "fits:header");
    /// ```
    #[must_use]
    pub fn extension(namespace: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::Extension {
            namespace: namespace.into(),
            kind: kind.into(),
        }
    }

    /// Returns `true` if this is an Extension category.
    #[must_use]
    pub fn is_extension(&self) -> bool {
        matches!(self, Self::Extension { .. })
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Lifecycle => "Lifecycle".to_string(),
            Self::Control => "Control".to_string(),
            Self::Data => "Data".to_string(),
            Self::Extension { namespace, kind } => format!("{namespace}:{kind}"),
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}
