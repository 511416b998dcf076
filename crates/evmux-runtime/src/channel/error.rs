//! Channel layer errors.
//!
//! Query outcomes (`WAIT`, `OUTOFSEQ`, `CLOSED`) are ordinary
//! [`EventStatus`](evmux_event::EventStatus) values. Only faults the
//! caller can not retry away become a [`ChannelError`].
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`ChannelError::IllegalWait`] | `CHANNEL_ILLEGAL_WAIT` | No |
//! | [`ChannelError::FlagConflict`] | `CHANNEL_FLAG_CONFLICT` | No |
//! | [`ChannelError::Closed`] | `CHANNEL_CLOSED` | No |
//! | [`ChannelError::Recording`] | `CHANNEL_RECORDING` | Depends |
//!
//! # Example
//!
//! ```
//! use evmux_runtime::ChannelError;
//! use evmux_types::{ChannelId, ErrorCode};
//!
//! let err = ChannelError::Closed(ChannelId::new());
//! assert_eq!(err.code(), "CHANNEL_CLOSED");
//! assert!(!err.is_recoverable());
//! ```

use crate::recording::RecordingError;
use evmux_event::WaitMode;
use evmux_types::{ChannelId, ErrorCode};
use thiserror::Error;

/// Channel layer error.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The requested wait can never be satisfied.
    ///
    /// Raised instead of hanging when:
    /// - `WAIT` is requested with no flag attached
    /// - the attached flag has no asynchronous source
    /// - `BLOCK` is requested from a channel with no queue
    #[error("illegal {mode} wait on {channel}: {reason}")]
    IllegalWait {
        channel: ChannelId,
        mode: WaitMode,
        reason: &'static str,
    },

    /// The channel is already attached to a different flag.
    #[error("channel {0} is already attached to another event flag")]
    FlagConflict(ChannelId),

    /// The operation needs an open channel.
    #[error("channel {0} is closed")]
    Closed(ChannelId),

    /// A recording log failed.
    #[error(transparent)]
    Recording(#[from] RecordingError),
}

impl ErrorCode for ChannelError {
    fn code(&self) -> &'static str {
        match self {
            Self::IllegalWait { .. } => "CHANNEL_ILLEGAL_WAIT",
            Self::FlagConflict(_) => "CHANNEL_FLAG_CONFLICT",
            Self::Closed(_) => "CHANNEL_CLOSED",
            Self::Recording(_) => "CHANNEL_RECORDING",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Recording(e) => e.is_recoverable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evmux_types::assert_error_codes;

    #[test]
    fn all_error_codes_valid() {
        let id = ChannelId::new();
        let errors = vec![
            ChannelError::IllegalWait {
                channel: id,
                mode: WaitMode::Block,
                reason: "no queue",
            },
            ChannelError::FlagConflict(id),
            ChannelError::Closed(id),
            ChannelError::Recording(RecordingError::Remove {
                path: "x".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
            }),
        ];
        assert_error_codes(&errors, "CHANNEL_");
    }

    #[test]
    fn recording_recoverability_passes_through() {
        let write = ChannelError::from(RecordingError::Write {
            path: "x".into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        });
        assert!(write.is_recoverable());
        assert!(write.to_string().contains("disk full"));
    }

    #[test]
    fn illegal_wait_message_names_mode() {
        let err = ChannelError::IllegalWait {
            channel: ChannelId::new(),
            mode: WaitMode::Wait,
            reason: "no event flag attached",
        };
        let msg = err.to_string();
        assert!(msg.contains("wait"));
        assert!(msg.contains("no event flag attached"));
    }
}
