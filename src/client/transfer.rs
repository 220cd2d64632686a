use std::path::Path;
use tokio::{
    fs::{self, File, OpenOptions},
    io::AsyncWriteExt,
    time,
};

use super::{folder::FolderStatus, options::DeliveryOptions, Connection};
use crate::{
    error::{Error, Result},
    path,
    protocol::{SessionError, SmbSession},
};

impl<S: SmbSession> Connection<S> {
    /// Copies the remote `file_path` into the local `output_path`,
    /// creating or truncating it.
    pub async fn get<P: AsRef<Path>>(
        &self,
        share: &str,
        file_path: &str,
        output_path: P,
    ) -> Result<()> {
        let output_path = output_path.as_ref();
        let unc = self.unc(share, file_path);
        info!("Retrieving file {unc}...");

        let mut output = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(output_path)
            .await?;

        let retrieved = self
            .session
            .lock()
            .await
            .retrieve_file(share, file_path, &mut output)
            .await;

        match retrieved {
            Ok(_) => {}
            Err(SessionError::Io(error)) => return Err(error.into()),
            Err(source) => {
                return Err(Error::Retrieval {
                    message: format!("Unable to retrieve {unc} file"),
                    source,
                })
            }
        }

        output.flush().await?;

        info!("File {unc} stored within {}.", output_path.display());
        Ok(())
    }

    /// Delivers the local `input_path` to `file_path` with the connection's
    /// [`DeliveryOptions`], then removes the local file.
    pub async fn move_file<P: AsRef<Path>>(
        &self,
        share: &str,
        file_path: &str,
        input_path: P,
    ) -> Result<()> {
        self.move_file_with(share, file_path, input_path, &self.delivery)
            .await
    }

    /// Delivers the local `input_path` to `file_path`, then removes the local file.
    ///
    /// The content is written under `file_path` + [`DeliveryOptions::temp_suffix`]
    /// and renamed once complete, so the target name never shows a partial
    /// file. Missing parent folders are created first. The local file is only
    /// removed once the remote file is published: on any error it is left
    /// untouched, while a temporary remote file that failed to be renamed is
    /// left in place.
    pub async fn move_file_with<P: AsRef<Path>>(
        &self,
        share: &str,
        file_path: &str,
        input_path: P,
        options: &DeliveryOptions,
    ) -> Result<()> {
        let input_path = input_path.as_ref();
        let unc = self.unc(share, file_path);
        info!("Moving {} file to {unc}...", input_path.display());

        let folder = path::parent(file_path);
        let status = self
            .ensure_folder_with(share, folder, options.folder_strategy)
            .await;
        if status == FolderStatus::Created && !options.settle_delay.is_zero() {
            debug!("waiting {:?} for new folders to settle", options.settle_delay);
            time::sleep(options.settle_delay).await;
        }

        let temp_path = format!("{file_path}{}", options.temp_suffix);
        self.store(share, &temp_path, input_path, options).await?;

        if !options.temp_suffix.is_empty() {
            let renamed = self
                .session
                .lock()
                .await
                .rename(share, &temp_path, file_path)
                .await;

            if let Err(source) = renamed {
                return Err(Error::Rename {
                    message: format!("Unable to rename temp file into {unc}"),
                    source,
                });
            }
        }

        info!("File copied. Removing {} file...", input_path.display());
        fs::remove_file(input_path).await?;

        info!("{} file moved within {unc}.", input_path.display());
        Ok(())
    }

    async fn store(
        &self,
        share: &str,
        file_path: &str,
        input_path: &Path,
        options: &DeliveryOptions,
    ) -> Result<()> {
        let mut input = File::open(input_path).await?;

        let stored = time::timeout(options.write_timeout, async {
            self.session
                .lock()
                .await
                .store_file(share, file_path, &mut input)
                .await
        })
        .await
        .map_err(SessionError::from)
        .and_then(|stored| stored);

        match stored {
            Ok(size) => {
                debug!("{size} bytes written to {file_path}");
                Ok(())
            }
            Err(SessionError::Io(error)) => Err(error.into()),
            Err(source) => Err(Error::Write {
                message: format!("Unable to write {}", self.unc(share, file_path)),
                source,
            }),
        }
    }

    /// Renames `old_file_path` into `new_file_path` on the same share.
    ///
    /// Fails with [`Error::NotFound`] without touching the server when
    /// nothing exists at `old_file_path`.
    pub async fn rename(
        &self,
        share: &str,
        old_file_path: &str,
        new_file_path: &str,
    ) -> Result<()> {
        let old_unc = self.unc(share, old_file_path);
        if !self.exists(share, old_file_path).await {
            return Err(Error::NotFound(format!("{old_unc} doesn't exist")));
        }

        let new_unc = self.unc(share, new_file_path);
        info!("Renaming {old_unc} into {new_unc}...");

        let renamed = self
            .session
            .lock()
            .await
            .rename(share, old_file_path, new_file_path)
            .await;

        match renamed {
            Ok(()) => {
                info!("File renamed...");
                Ok(())
            }
            Err(source) => Err(Error::Rename {
                message: format!("Unable to rename {old_unc} into {new_unc}"),
                source,
            }),
        }
    }
}
