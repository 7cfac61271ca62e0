use crate::error::{NotFoundSnafu, PathIsDirectorySnafu, Result};
use crate::storage::backend::{PathState, StorageBackend};
use crate::storage::operations::stat::{BackendStater, Stater};
use crate::storage::stream::TransferReader;
use crate::wrap_err;

/// Trait for opening remote files for reading.
pub trait Downloader {
    /// Open a read stream over the file at `remote_path`.
    ///
    /// The caller owns the returned stream; the transfer advances only as it is polled.
    async fn download(&self, remote_path: &str) -> Result<TransferReader>;
}

pub struct BackendDownloader<'a, B> {
    backend: &'a B,
}

impl<'a, B: StorageBackend> BackendDownloader<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }
}

impl<B: StorageBackend> Downloader for BackendDownloader<'_, B> {
    async fn download(&self, remote_path: &str) -> Result<TransferReader> {
        match BackendStater::new(self.backend).path_state(remote_path).await? {
            PathState::Absent => return NotFoundSnafu { path: remote_path }.fail(),
            PathState::Directory => return PathIsDirectorySnafu { path: remote_path }.fail(),
            PathState::File => {}
        }

        let stream = wrap_err!(
            self.backend.open_read(remote_path).await,
            TransferFailed {
                path: remote_path.to_string()
            }
        )?;
        Ok(TransferReader::new(remote_path.to_string(), stream))
    }
}
