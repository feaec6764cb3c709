//! # Interop Error Types

use thiserror::Error;

/// Errors raised at the native engine boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NativeError {
    /// The engine could not allocate a session (out of memory or device lost).
    #[error("native engine failed to allocate a session")]
    AllocationFailed,

    /// The engine handed back an id that is already live.
    #[error("native engine returned duplicate session id {0}")]
    DuplicateSession(i32),

    /// The call needs a live session.
    #[error("no native session")]
    NoSession,
}

/// Result type for native boundary operations.
pub type NativeResult<T> = Result<T, NativeError>;
