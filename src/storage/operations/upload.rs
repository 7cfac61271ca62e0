use crate::error::{
    AlreadyExistsSnafu, LocalPathNotFileSnafu, LocalPathNotFoundSnafu, PathIsDirectorySnafu,
    Result,
};
use crate::storage::backend::{PathState, StorageBackend};
use crate::storage::operations::stat::{BackendStater, Stater};
use crate::storage::stream::TransferWriter;
use crate::wrap_err;
use snafu::ensure;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tokio::io::BufReader;

/// Trait for uploading local files to storage.
pub trait Uploader {
    /// Upload a single local file to a remote path.
    ///
    /// # Arguments
    /// * `local_path` - Source file on the local filesystem
    /// * `remote_path` - Destination path in storage
    /// * `overwrite` - Whether an existing remote file may be replaced
    ///
    /// # Returns
    /// * `Result<u64>` - Bytes transferred, or the conflict/transfer error
    async fn upload(&self, local_path: &Path, remote_path: &str, overwrite: bool) -> Result<u64>;
}

pub struct BackendUploader<'a, B> {
    backend: &'a B,
}

impl<'a, B: StorageBackend> BackendUploader<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Check that `remote_path` may receive a new file.
    ///
    /// A directory is a hard conflict whatever `overwrite` says; an existing
    /// file only conflicts when `overwrite` is false.
    async fn check_destination(&self, remote_path: &str, overwrite: bool) -> Result<()> {
        let stater = BackendStater::new(self.backend);
        stater.ensure_traversable(remote_path).await?;

        match stater.path_state(remote_path).await? {
            PathState::Directory => PathIsDirectorySnafu { path: remote_path }.fail(),
            PathState::File if !overwrite => AlreadyExistsSnafu { path: remote_path }.fail(),
            PathState::File | PathState::Absent => Ok(()),
        }
    }

    /// Stream a local file into storage, aborting the remote write on any failure.
    async fn upload_file_streaming(&self, local_path: &Path, remote_path: &str) -> Result<u64> {
        let file = fs::File::open(local_path).await?;
        let writer = wrap_err!(
            self.backend.open_write(remote_path, false).await,
            TransferFailed {
                path: remote_path.to_string()
            }
        )?;
        let mut writer = TransferWriter::new(remote_path.to_string(), writer);

        match writer.write_from(BufReader::new(file)).await {
            Ok(_) => writer.close().await,
            Err(e) => Err(writer.abort_after(e).await),
        }
    }
}

impl<B: StorageBackend> Uploader for BackendUploader<'_, B> {
    async fn upload(&self, local_path: &Path, remote_path: &str, overwrite: bool) -> Result<u64> {
        let meta = match fs::metadata(local_path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return LocalPathNotFoundSnafu { path: local_path }.fail();
            }
            Err(e) => return Err(e.into()),
        };
        ensure!(meta.is_file(), LocalPathNotFileSnafu { path: local_path });

        self.check_destination(remote_path, overwrite).await?;
        self.upload_file_streaming(local_path, remote_path).await
    }
}
