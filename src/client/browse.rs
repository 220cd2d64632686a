use super::Connection;
use crate::{
    path,
    protocol::{SearchAttributes, SharedFile, SmbSession},
};

impl<S: SmbSession> Connection<S> {
    /// Returns the description of the file or folder at `file_path`,
    /// `None` when nothing is there or when the lookup fails.
    pub async fn describe(&self, share: &str, file_path: &str) -> Option<SharedFile> {
        info!("Returning {} description...", self.unc(share, file_path));

        let listing = self
            .session
            .lock()
            .await
            .list_path(
                share,
                path::parent(file_path),
                path::file_name(file_path),
                SearchAttributes::ANY,
            )
            .await;

        match listing {
            Ok(files) => files.into_iter().find(|file| !file.is_dot_entry()),
            Err(error) => {
                debug!("no description for {file_path}: {error}");
                None
            }
        }
    }

    /// `true` when [`Connection::describe`] finds something at `file_path`.
    pub async fn exists(&self, share: &str, file_path: &str) -> bool {
        self.describe(share, file_path).await.is_some()
    }

    /// Lists the entries of `folder_path` (non-recursively) whose names match
    /// `pattern`, where `*` matches any run of characters and `?` a single one.
    ///
    /// `.` and `..` are never returned. A missing folder and an empty one both
    /// give an empty list.
    pub async fn list_folder(
        &self,
        share: &str,
        folder_path: &str,
        include_folders: bool,
        pattern: &str,
    ) -> Vec<SharedFile> {
        info!("Listing the content of {} ...", self.unc(share, folder_path));

        let listing = self
            .session
            .lock()
            .await
            .list_path(
                share,
                folder_path,
                pattern,
                SearchAttributes::listing(include_folders),
            )
            .await;

        match listing {
            Ok(files) => files
                .into_iter()
                .filter(|file| !file.is_dot_entry())
                .filter(|file| include_folders || !file.is_directory)
                .collect(),
            Err(error) => {
                debug!("listing of {folder_path} failed: {error}");
                Vec::new()
            }
        }
    }
}
