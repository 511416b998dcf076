//! Recording errors.

use evmux_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Recording log failure.
///
/// Setup failures (open, rename, remove) are fatal to the channel that
/// requested the recording and surface from `init`, `close` or `abort`.
#[derive(Debug, Error)]
pub enum RecordingError {
    /// The log could not be created for writing.
    #[error("failed to open recording '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Appending or flushing a record failed.
    #[error("failed to write recording '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be serialized.
    #[error("failed to encode record for '{path}': {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The temp file could not be moved to its final name.
    #[error("failed to rename recording '{from}' to '{to}': {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The temp file could not be unlinked.
    #[error("failed to remove recording '{path}': {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A log could not be read back.
    #[error("failed to read recording '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of a log is not a valid record.
    #[error("invalid record at '{path}' line {line}: {source}")]
    Decode {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl ErrorCode for RecordingError {
    fn code(&self) -> &'static str {
        match self {
            Self::Open { .. } => "RECORDING_OPEN_FAILED",
            Self::Write { .. } => "RECORDING_WRITE_FAILED",
            Self::Encode { .. } => "RECORDING_ENCODE_FAILED",
            Self::Rename { .. } => "RECORDING_RENAME_FAILED",
            Self::Remove { .. } => "RECORDING_REMOVE_FAILED",
            Self::Read { .. } => "RECORDING_READ_FAILED",
            Self::Decode { .. } => "RECORDING_DECODE_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Write { .. } | Self::Read { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evmux_types::assert_error_codes;

    fn io() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::Other, "boom")
    }

    fn json() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").unwrap_err()
    }

    #[test]
    fn all_error_codes_valid() {
        let errors = vec![
            RecordingError::Open { path: "a".into(), source: io() },
            RecordingError::Write { path: "a".into(), source: io() },
            RecordingError::Encode { path: "a".into(), source: json() },
            RecordingError::Rename { from: "a".into(), to: "b".into(), source: io() },
            RecordingError::Remove { path: "a".into(), source: io() },
            RecordingError::Read { path: "a".into(), source: io() },
            RecordingError::Decode { path: "a".into(), line: 3, source: json() },
        ];
        assert_error_codes(&errors, "RECORDING_");
    }

    #[test]
    fn setup_failures_are_fatal() {
        assert!(!RecordingError::Open { path: "a".into(), source: io() }.is_recoverable());
        assert!(RecordingError::Write { path: "a".into(), source: io() }.is_recoverable());
    }

    #[test]
    fn decode_message_names_line() {
        let err = RecordingError::Decode { path: "log".into(), line: 7, source: json() };
        assert!(err.to_string().contains("line 7"));
    }
}
