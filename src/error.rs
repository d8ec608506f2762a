//! Error type shared by every fallible [`TimeLog`](crate::TimeLog) operation.

use std::io;

use thiserror::Error;

/// Errors produced while computing estimates or writing status lines.
#[derive(Debug, Error)]
pub enum TimeLogError {
    /// The remaining time was requested but no total item count is known.
    #[error("remaining time is undefined: total item count is unknown")]
    UnknownTotal,

    /// Writing a message to the output sink failed (e.g. a broken pipe).
    #[error("failed to write progress output: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias for results returned by this crate.
pub type Result<T, E = TimeLogError> = std::result::Result<T, E>;
