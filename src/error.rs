use std::io;
use thiserror::Error;

use crate::protocol::SessionError;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the operations of a [`Connection`](crate::Connection).
///
/// Every remote variant carries a message naming the fully-qualified
/// remote object (`\\host\share\path`) and, when there is one, the
/// library failure that caused it.
#[derive(Debug, Error)]
pub enum Error {
    /// Session could not be established
    #[error("{message}")]
    Connection {
        message: String,
        #[source]
        source: Option<SessionError>,
    },
    /// Remote read failed
    #[error("{message}")]
    Retrieval {
        message: String,
        #[source]
        source: SessionError,
    },
    /// Remote write of a delivery failed
    #[error("{message}")]
    Write {
        message: String,
        #[source]
        source: SessionError,
    },
    /// Remote rename failed, either while publishing a delivery or on request
    #[error("{message}")]
    Rename {
        message: String,
        #[source]
        source: SessionError,
    },
    /// Rename was requested on a path that does not exist
    #[error("{0}")]
    NotFound(String),
    /// Local filesystem failure, left as is
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn connection(
        machine_name: &str,
        ip: &str,
        port: u16,
        domain: &str,
        user_name: &str,
        source: Option<SessionError>,
    ) -> Self {
        Self::Connection {
            message: format!(
                "Impossible to connect to {machine_name} ({ip}:{port}), \
                 check connectivity or {domain}\\{user_name} rights."
            ),
            source,
        }
    }

    /// Returns `true` for [`Error::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `true` when the failure happened on the local filesystem.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
