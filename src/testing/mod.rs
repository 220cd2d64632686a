//! In-memory share server for tests.
//!
//! [`FakeSmbServer`] implements [`SmbConnector`](crate::protocol::SmbConnector)
//! on top of a tree of folders and files per share. Each test builds its own
//! server, arranges content and faults through it, and inspects the result
//! afterwards.
//!
//! ```
//! # async fn example() -> winshare::Result<()> {
//! use winshare::{connect, testing::FakeSmbServer, ConnectOptions};
//!
//! let server = FakeSmbServer::new();
//! server.path("Share", "/folder/file").write_text("content");
//!
//! let options = ConnectOptions::new("Host", "127.0.0.1").with_credentials("user", "pass");
//! let connection = connect(&server, &options).await?;
//! assert_eq!(connection.list_folder("Share", "/folder", true, "*").await.len(), 1);
//! connection.close().await;
//! # Ok(())
//! # }
//! ```

mod session;
mod tree;
mod wildcard;

use bytes::Bytes;
use parking_lot::Mutex;
use std::{
    collections::{BTreeMap, HashMap},
    fmt, io,
    sync::Arc,
    time::Duration,
};
use thiserror::Error;
use tokio::time::{self, Instant};

pub use self::{session::FakeSession, wildcard::Wildcard};
use self::tree::{key, Tree};
use crate::{client::ConnectOptions, path, protocol::SessionError, protocol::SmbConnector};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Library primitives, as recorded in the journal and targeted by faults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Connect,
    StoreFile,
    RetrieveFile,
    Rename,
    CreateDirectory,
    ListPath,
    Echo,
}

/// Failure injected with [`FakeSmbServer::fail`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    OperationFailure(String),
    Timeout,
    /// The local stream handed to the library failed with this kind
    LocalIo(io::ErrorKind),
}

impl Fault {
    pub fn operation_failure<M: Into<String>>(message: M) -> Self {
        Self::OperationFailure(message.into())
    }
}

impl From<&Fault> for SessionError {
    fn from(fault: &Fault) -> Self {
        match fault {
            Fault::OperationFailure(message) => Self::OperationFailure(message.clone()),
            Fault::Timeout => Self::Timeout,
            Fault::LocalIo(kind) => Self::Io(io::Error::from(*kind)),
        }
    }
}

/// One library call received by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub operation: Operation,
    pub share: String,
    pub path: String,
    /// Destination of a rename
    pub destination: Option<String>,
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}:{}", self.operation, self.share, self.path)?;
        if let Some(destination) = &self.destination {
            write!(f, " -> {destination}")?;
        }
        Ok(())
    }
}

/// Raised by [`FakeSmbServer::reset`] when arranged content was never used
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Expected files were not retrieved: {}", .0.join(", "))]
pub struct UnmetExpectations(pub Vec<String>);

/// Raised by [`FakePath::wait_for`]
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{name} could not be found within {} seconds.", .timeout.as_secs())]
pub struct WaitTimeout {
    pub name: String,
    pub timeout: Duration,
}

#[derive(Default)]
pub(crate) struct State {
    shares: HashMap<String, Tree>,
    faults: HashMap<Operation, Fault>,
    refuse_connections: bool,
    expected_retrievals: BTreeMap<(String, String), Bytes>,
    journal: Vec<Call>,
    store_delay: Duration,
}

impl State {
    fn share(&mut self, share: &str) -> &mut Tree {
        self.shares.entry(share.to_owned()).or_default()
    }

    fn record(&mut self, operation: Operation, share: &str, path: &str, destination: Option<&str>) {
        self.journal.push(Call {
            operation,
            share: share.to_owned(),
            path: path.to_owned(),
            destination: destination.map(ToOwned::to_owned),
        });
    }

    fn fault(&self, operation: Operation) -> Option<SessionError> {
        self.faults.get(&operation).map(SessionError::from)
    }
}

/// Shared handle to an in-memory share server.
///
/// Clones observe the same content, so a test can keep one while
/// connections use others.
#[derive(Clone, Default)]
pub struct FakeSmbServer {
    state: Arc<Mutex<State>>,
}

impl FakeSmbServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle on `file_path` within `share`, for arranging and inspecting content.
    pub fn path(&self, share: &str, file_path: &str) -> FakePath {
        FakePath {
            server: self.clone(),
            share: share.to_owned(),
            key: key(file_path),
        }
    }

    /// Makes every later call of `operation` fail with `fault`, until reset.
    pub fn fail(&self, operation: Operation, fault: Fault) {
        let _ = self.state.lock().faults.insert(operation, fault);
    }

    /// Makes later connection attempts report a refused handshake.
    pub fn refuse_connections(&self) {
        self.state.lock().refuse_connections = true;
    }

    /// Delays the publication of every stored file.
    pub fn set_store_delay(&self, delay: Duration) {
        self.state.lock().store_delay = delay;
    }

    /// Serves `content` the next time `file_path` is retrieved, whatever the
    /// share holds. [`FakeSmbServer::reset`] reports it if it is never read.
    pub fn expect_retrieval<T: Into<Bytes>>(&self, share: &str, file_path: &str, content: T) {
        let _ = self
            .state
            .lock()
            .expected_retrievals
            .insert((share.to_owned(), key(file_path)), content.into());
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().journal.clone()
    }

    /// Calls of `operation` received so far.
    pub fn calls_of(&self, operation: Operation) -> Vec<Call> {
        self.state
            .lock()
            .journal
            .iter()
            .filter(|call| call.operation == operation)
            .cloned()
            .collect()
    }

    /// Forgets content, faults and journal.
    ///
    /// Fails if content arranged with [`FakeSmbServer::expect_retrieval`]
    /// was never retrieved.
    pub fn reset(&self) -> Result<(), UnmetExpectations> {
        let mut state = self.state.lock();
        let remaining: Vec<String> = state
            .expected_retrievals
            .keys()
            .map(|(share, file)| format!("{share}/{file}"))
            .collect();
        *state = State::default();

        if remaining.is_empty() {
            Ok(())
        } else {
            Err(UnmetExpectations(remaining))
        }
    }

    pub(crate) fn lock(&self) -> parking_lot::MutexGuard<'_, State> {
        self.state.lock()
    }
}

impl SmbConnector for FakeSmbServer {
    type Session = FakeSession;

    fn session(&self, options: &ConnectOptions) -> FakeSession {
        FakeSession::new(self.clone(), &options.machine_name)
    }
}

/// A file or folder of a [`FakeSmbServer`] share.
pub struct FakePath {
    server: FakeSmbServer,
    share: String,
    key: String,
}

impl FakePath {
    /// Stores `content`, creating missing folders.
    pub fn write_bytes<T: Into<Bytes>>(&self, content: T) {
        let mut state = self.server.lock();
        let tree = state.share(&self.share);
        tree.create_dir_all(tree_parent(&self.key));
        if let Err(error) = tree.write(&self.key, content.into()) {
            debug!("fake write of {} ignored: {error}", self.key);
        }
    }

    pub fn write_text(&self, content: &str) {
        self.write_bytes(content.to_owned());
    }

    pub fn read_bytes(&self) -> Option<Bytes> {
        self.server
            .lock()
            .shares
            .get(&self.share)
            .and_then(|tree| tree.read(&self.key))
    }

    pub fn read_text(&self) -> Option<String> {
        self.read_bytes()
            .map(|content| String::from_utf8_lossy(&content).into_owned())
    }

    /// Creates the folder and its missing ancestors.
    pub fn mkdir(&self) {
        self.server.lock().share(&self.share).create_dir_all(&self.key);
    }

    pub fn exists(&self) -> bool {
        self.server
            .lock()
            .shares
            .get(&self.share)
            .is_some_and(|tree| tree.exists(&self.key))
    }

    pub fn is_dir(&self) -> bool {
        self.server
            .lock()
            .shares
            .get(&self.share)
            .map_or(self.key.is_empty(), |tree| tree.is_dir(&self.key))
    }

    /// Names of the direct children of this folder, in order.
    pub fn children(&self) -> Vec<String> {
        self.server
            .lock()
            .shares
            .get(&self.share)
            .and_then(|tree| tree.children(&self.key))
            .map(|children| {
                children
                    .into_iter()
                    .map(|(name, _)| name.to_owned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Waits until the file holds content and returns it.
    pub async fn wait_for(&self, timeout: Duration) -> Result<Bytes, WaitTimeout> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(content) = self.read_bytes() {
                return Ok(content);
            }
            if Instant::now() >= deadline {
                return Err(WaitTimeout {
                    name: path::file_name(&self.key).to_owned(),
                    timeout,
                });
            }
            time::sleep(POLL_INTERVAL).await;
        }
    }
}

fn tree_parent(key: &str) -> &str {
    key.rfind('/').map_or("", |index| &key[..index])
}
