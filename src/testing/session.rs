use bytes::Bytes;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    time,
};

use super::{
    tree::{key, Node},
    FakeSmbServer, Operation, Wildcard,
};
use crate::protocol::{SearchAttributes, SessionError, SessionResult, SharedFile, SmbSession};

/// Session opened on a [`FakeSmbServer`]
pub struct FakeSession {
    server: FakeSmbServer,
    remote_name: String,
    connected: bool,
}

impl FakeSession {
    pub(super) fn new(server: FakeSmbServer, remote_name: &str) -> Self {
        Self {
            server,
            remote_name: remote_name.to_owned(),
            connected: false,
        }
    }

    /// Records the call and returns the injected fault, if any.
    fn enter(
        &self,
        operation: Operation,
        share: &str,
        path: &str,
        destination: Option<&str>,
    ) -> SessionResult<()> {
        let mut state = self.server.lock();
        state.record(operation, share, path, destination);

        if !self.connected && operation != Operation::Connect {
            return Err(SessionError::operation_failure("Session is not connected"));
        }

        match state.fault(operation) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn failure<M: Into<String>>(message: M) -> SessionError {
    SessionError::operation_failure(message)
}

#[async_trait]
impl SmbSession for FakeSession {
    fn remote_name(&self) -> &str {
        &self.remote_name
    }

    async fn connect(&mut self, ip: &str, port: u16) -> SessionResult<bool> {
        self.enter(Operation::Connect, "", &format!("{ip}:{port}"), None)?;

        if self.server.lock().refuse_connections {
            return Ok(false);
        }

        self.connected = true;
        Ok(true)
    }

    async fn store_file(
        &mut self,
        share: &str,
        path: &str,
        source: &mut (dyn AsyncRead + Unpin + Send),
    ) -> SessionResult<u64> {
        self.enter(Operation::StoreFile, share, path, None)?;

        let mut content = Vec::new();
        let _ = source.read_to_end(&mut content).await?;

        let delay = self.server.lock().store_delay;
        if !delay.is_zero() {
            time::sleep(delay).await;
        }

        let size = content.len() as u64;
        self.server
            .lock()
            .share(share)
            .write(&key(path), Bytes::from(content))
            .map_err(|reason| failure(format!("Unable to open file: {reason}")))?;

        debug!("fake server stored {size} bytes in {share}:{path}");
        Ok(size)
    }

    async fn retrieve_file(
        &mut self,
        share: &str,
        path: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> SessionResult<u64> {
        self.enter(Operation::RetrieveFile, share, path, None)?;

        let content = {
            let mut state = self.server.lock();
            let id = (share.to_owned(), key(path));
            match state.expected_retrievals.remove(&id) {
                Some(content) => Some(content),
                None => state.shares.get(share).and_then(|tree| tree.read(&id.1)),
            }
        };

        let content =
            content.ok_or_else(|| failure(format!("Unable to open file {path}")))?;
        sink.write_all(&content).await?;

        Ok(content.len() as u64)
    }

    async fn rename(&mut self, share: &str, old_path: &str, new_path: &str) -> SessionResult<()> {
        self.enter(Operation::Rename, share, old_path, Some(new_path))?;

        self.server
            .lock()
            .share(share)
            .rename(&key(old_path), &key(new_path))
            .map_err(|reason| failure(format!("Unable to rename: {reason}")))
    }

    async fn create_directory(&mut self, share: &str, path: &str) -> SessionResult<()> {
        self.enter(Operation::CreateDirectory, share, path, None)?;

        self.server
            .lock()
            .share(share)
            .create_dir(&key(path))
            .map_err(|reason| failure(format!("Unable to create directory: {reason}")))
    }

    async fn list_path(
        &mut self,
        share: &str,
        path: &str,
        pattern: &str,
        search: SearchAttributes,
    ) -> SessionResult<Vec<SharedFile>> {
        self.enter(Operation::ListPath, share, path, None)?;

        let wildcard = Wildcard::new(pattern)
            .map_err(|error| failure(format!("Invalid pattern {pattern}: {error}")))?;

        let state = self.server.lock();
        let children = state
            .shares
            .get(share)
            .map_or_else(
                || key(path).is_empty().then(Vec::new),
                |tree| tree.children(&key(path)),
            )
            .ok_or_else(|| failure(format!("Unable to open directory {path}")))?;

        let mut files = vec![
            SharedFile::directory("."),
            SharedFile::directory(".."),
        ];
        files.extend(children.into_iter().map(|(name, node)| match node {
            Node::Directory => SharedFile::directory(name),
            Node::File(content) => SharedFile::file(name, content.len() as u64),
        }));

        let files: Vec<SharedFile> = files
            .into_iter()
            .filter(|file| search.includes_folders() || !file.is_directory)
            .filter(|file| wildcard.matches(&file.filename))
            .collect();

        if files.is_empty() {
            return Err(failure(format!("No file matching {pattern} in {path}")));
        }

        Ok(files)
    }

    async fn echo(&mut self, data: Bytes) -> SessionResult<Bytes> {
        self.enter(Operation::Echo, "", "", None)?;
        Ok(data)
    }

    async fn close(&mut self) {
        self.connected = false;
    }
}
