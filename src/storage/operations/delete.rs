// Delete operation trait and implementation
use crate::error::{PathIsDirectorySnafu, PathIsFileSnafu, Result};
use crate::storage::backend::{PathState, StorageBackend};
use crate::storage::operations::stat::{BackendStater, Stater};

/// Trait for deleting files and directories from storage.
/// Deleting something that is already gone is not an error.
pub trait Deleter {
    /// Delete a single file; directories are rejected with `PathIsDirectory`.
    async fn delete_file(&self, path: &str) -> Result<()>;

    /// Delete a directory and everything below it; files are rejected with `PathIsFile`.
    async fn delete_folder(&self, path: &str) -> Result<()>;
}

pub struct BackendDeleter<'a, B> {
    backend: &'a B,
}

impl<'a, B: StorageBackend> BackendDeleter<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }
}

impl<B: StorageBackend> Deleter for BackendDeleter<'_, B> {
    async fn delete_file(&self, path: &str) -> Result<()> {
        match BackendStater::new(self.backend).path_state(path).await? {
            PathState::Absent => {
                log::debug!("delete_file path={path} already absent");
                Ok(())
            }
            PathState::Directory => PathIsDirectorySnafu { path }.fail(),
            PathState::File => Ok(self.backend.delete(path).await?),
        }
    }

    async fn delete_folder(&self, path: &str) -> Result<()> {
        match BackendStater::new(self.backend).path_state(path).await? {
            PathState::Absent => {
                log::debug!("delete_folder path={path} already absent");
                Ok(())
            }
            PathState::File => PathIsFileSnafu { path }.fail(),
            PathState::Directory => Ok(self.backend.rmdir(path).await?),
        }
    }
}
