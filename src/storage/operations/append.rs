use crate::error::{NotFoundSnafu, Result};
use crate::storage::backend::{BackendWriter, PathState, StorageBackend};
use crate::storage::operations::stat::{BackendStater, Stater};
use crate::storage::stream::TransferWriter;
use crate::wrap_err;

/// Trait for appending to existing remote files.
pub trait Appender<W: BackendWriter> {
    /// Open a write stream positioned at the end of the file at `remote_path`.
    ///
    /// Only existing files qualify: absent paths and directories are `NotFound`.
    async fn append(&self, remote_path: &str) -> Result<TransferWriter<W>>;
}

pub struct BackendAppender<'a, B> {
    backend: &'a B,
}

impl<'a, B: StorageBackend> BackendAppender<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }
}

impl<B: StorageBackend> Appender<B::Writer> for BackendAppender<'_, B> {
    async fn append(&self, remote_path: &str) -> Result<TransferWriter<B::Writer>> {
        let state = BackendStater::new(self.backend)
            .path_state(remote_path)
            .await?;
        if state != PathState::File {
            return NotFoundSnafu { path: remote_path }.fail();
        }

        let writer = wrap_err!(
            self.backend.open_write(remote_path, true).await,
            TransferFailed {
                path: remote_path.to_string()
            }
        )?;
        Ok(TransferWriter::new(remote_path.to_string(), writer))
    }
}
