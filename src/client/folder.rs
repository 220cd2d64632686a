use std::{future::Future, pin::Pin};
use uuid::Uuid;

use super::Connection;
use crate::{
    path,
    protocol::{SessionResult, SmbSession},
};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outcome of [`Connection::ensure_folder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderStatus {
    /// The folder was there before the call
    AlreadyExisted,
    /// The folder, and possibly some of its ancestors, were created
    Created,
    /// Creation failed. The next operation using the folder reports the real error
    Failed,
}

/// How a missing folder is brought into existence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FolderStrategy {
    /// Creates a uniquely named sibling and renames it onto the wanted name.
    ///
    /// Folder watchers on some servers only consider a folder ready once
    /// it shows up through a rename.
    #[default]
    RenameIntoPlace,
    /// Plain directory creation
    Direct,
}

impl FolderStrategy {
    async fn create<S: SmbSession>(
        self,
        session: &mut S,
        share: &str,
        folder: &str,
    ) -> SessionResult<()> {
        match self {
            Self::Direct => session.create_directory(share, folder).await,
            Self::RenameIntoPlace => {
                let staging = format!("{folder}_{}", Uuid::new_v4().simple());
                session.create_directory(share, &staging).await?;
                session.rename(share, &staging, folder).await
            }
        }
    }
}

impl<S: SmbSession> Connection<S> {
    /// Makes sure `folder` exists on `share`, creating missing ancestors.
    ///
    /// Never fails: probe and creation errors are logged and reported as
    /// [`FolderStatus::Failed`].
    pub async fn ensure_folder(&self, share: &str, folder: &str) -> FolderStatus {
        self.ensure_folder_with(share, folder, self.delivery.folder_strategy)
            .await
    }

    pub(super) fn ensure_folder_with<'a>(
        &'a self,
        share: &'a str,
        folder: &'a str,
        strategy: FolderStrategy,
    ) -> BoxFuture<'a, FolderStatus> {
        Box::pin(async move {
            let folder = path::trim(folder);
            if path::is_root(folder) || self.describe(share, folder).await.is_some() {
                return FolderStatus::AlreadyExisted;
            }

            let unc = self.unc(share, folder);
            info!("Creating folder {unc}...");

            match self.create_folder(share, folder, strategy).await {
                Ok(()) => return FolderStatus::Created,
                Err(error) => debug!("unable to create {unc} at once: {error}"),
            }

            let _ = self
                .ensure_folder_with(share, path::parent(folder), strategy)
                .await;

            match self.create_folder(share, folder, strategy).await {
                Ok(()) => {
                    info!("Folder {unc} created.");
                    FolderStatus::Created
                }
                Err(error) => {
                    warn!("Unable to create folder {unc}: {error}");
                    FolderStatus::Failed
                }
            }
        })
    }

    async fn create_folder(
        &self,
        share: &str,
        folder: &str,
        strategy: FolderStrategy,
    ) -> SessionResult<()> {
        let mut session = self.session.lock().await;
        strategy.create(&mut *session, share, folder).await
    }
}
