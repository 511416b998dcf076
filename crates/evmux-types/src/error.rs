//! Unified error interface for evmux.
//!
//! Every layer of the workspace (paths, flags, channels, recording,
//! configuration) defines its own error enum. All of them implement
//! [`ErrorCode`] so callers can branch on a stable, machine-readable
//! code instead of matching on display strings.
//!
//! # Example
//!
//! ```
//! use evmux_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum QueueError {
//!     Full,
//!     Stopped,
//! }
//!
//! impl ErrorCode for QueueError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Full => "QUEUE_FULL",
//!             Self::Stopped => "QUEUE_STOPPED",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Full)
//!     }
//! }
//!
//! assert_eq!(QueueError::Full.code(), "QUEUE_FULL");
//! assert!(!QueueError::Stopped.is_recoverable());
//! ```

/// Machine-readable error classification.
///
/// # Code Format
///
/// - `UPPER_SNAKE_CASE`
/// - Prefixed with the owning layer: `PATH_`, `FLAG_`, `CHANNEL_`,
///   `RECORDING_`, `CONFIG_`
/// - Stable once published
///
/// # Recoverability
///
/// An error is recoverable when retrying the same call can succeed
/// without changing code or configuration. An illegal wait, for
/// instance, is never recoverable: the channel configuration proves
/// the wait can not be satisfied.
pub trait ErrorCode {
    /// Returns the stable error code.
    fn code(&self) -> &'static str;

    /// Returns whether a retry may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code is non-empty, `UPPER_SNAKE_CASE` and
/// carries the expected layer prefix.
///
/// # Panics
///
/// Panics with a descriptive message when any check fails.
///
/// # Example
///
/// ```
/// use evmux_types::{assert_error_code, ErrorCode};
///
/// struct Busy;
///
/// impl ErrorCode for Busy {
///     fn code(&self) -> &'static str { "HUB_BUSY" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&Busy, "HUB_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{code}' must start with prefix '{expected_prefix}'"
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{code}' must be UPPER_SNAKE_CASE"
    );
}

/// Runs [`assert_error_code`] over every error in `errors`.
///
/// Intended for exhaustive variant lists in unit tests.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
