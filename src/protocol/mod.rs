//! Boundary with the SMB client library.
//!
//! Framing, NTLMv2 authentication and directory enumeration are the
//! library's job. This module only describes the primitives the rest of the
//! crate sequences, so that any SMB client can be plugged in by
//! implementing [`SmbConnector`] and [`SmbSession`].

mod attrs;
mod error;
mod shared_file;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};

pub use self::{
    attrs::SearchAttributes,
    error::{SessionError, SessionResult},
    shared_file::SharedFile,
};
use crate::client::ConnectOptions;

/// Builds unconnected sessions, one per call to [`connect`](crate::connect).
pub trait SmbConnector {
    type Session: SmbSession;

    /// Prepares a session for the given host and credentials.
    /// No network traffic is expected before [`SmbSession::connect`].
    fn session(&self, options: &ConnectOptions) -> Self::Session;
}

/// Primitives of an SMB client session. This is `async_trait`
///
/// Paths are relative to the share and may use `/` or `\` as separator.
#[async_trait]
pub trait SmbSession: Send + 'static {
    /// Display name of the remote host.
    fn remote_name(&self) -> &str;

    /// Opens the session. `Ok(false)` means the handshake was refused.
    async fn connect(&mut self, ip: &str, port: u16) -> SessionResult<bool>;

    /// Writes everything readable from `source` to `path`, returning the byte count.
    async fn store_file(
        &mut self,
        share: &str,
        path: &str,
        source: &mut (dyn AsyncRead + Unpin + Send),
    ) -> SessionResult<u64>;

    /// Copies the content of `path` into `sink`, returning the byte count.
    async fn retrieve_file(
        &mut self,
        share: &str,
        path: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> SessionResult<u64>;

    async fn rename(&mut self, share: &str, old_path: &str, new_path: &str) -> SessionResult<()>;

    async fn create_directory(&mut self, share: &str, path: &str) -> SessionResult<()>;

    /// Lists the entries of `path` whose names match the `*`/`?` `pattern`.
    async fn list_path(
        &mut self,
        share: &str,
        path: &str,
        pattern: &str,
        search: SearchAttributes,
    ) -> SessionResult<Vec<SharedFile>>;

    /// Protocol level round-trip, returns the echoed payload.
    async fn echo(&mut self, data: Bytes) -> SessionResult<Bytes>;

    /// Releases the session. Must be safe to call on a failed session.
    async fn close(&mut self);
}
