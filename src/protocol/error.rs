use std::io;
use thiserror::Error;
use tokio::time::error::Elapsed as TimeElapsed;

pub type SessionResult<T> = Result<T, SessionError>;

/// Failures reported by an [`SmbSession`](super::SmbSession)
#[derive(Debug, Error)]
pub enum SessionError {
    /// The server rejected or failed the operation
    #[error("{0}")]
    OperationFailure(String),
    /// Time limit for the operation exceeded
    #[error("Timeout")]
    Timeout,
    /// The local stream handed to the library failed
    #[error("I/O: {0}")]
    Io(#[from] io::Error),
}

impl SessionError {
    pub fn operation_failure<M: Into<String>>(message: M) -> Self {
        Self::OperationFailure(message.into())
    }
}

impl From<TimeElapsed> for SessionError {
    fn from(_: TimeElapsed) -> Self {
        Self::Timeout
    }
}
