// Directory creation operation trait and implementation
use crate::error::{AlreadyExistsSnafu, Result};
use crate::storage::backend::{PathState, StorageBackend};
use crate::storage::operations::stat::{BackendStater, Stater};

/// Trait for creating directories in storage.
pub trait Mkdirer {
    /// Create a directory and any missing parents.
    ///
    /// Succeeds without change when the directory already exists; fails with
    /// `AlreadyExists` when a file sits at `path`.
    async fn mkdir(&self, path: &str) -> Result<()>;
}

pub struct BackendMkdirer<'a, B> {
    backend: &'a B,
}

impl<'a, B: StorageBackend> BackendMkdirer<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }
}

impl<B: StorageBackend> Mkdirer for BackendMkdirer<'_, B> {
    async fn mkdir(&self, path: &str) -> Result<()> {
        let stater = BackendStater::new(self.backend);
        stater.ensure_traversable(path).await?;

        match stater.path_state(path).await? {
            PathState::File => AlreadyExistsSnafu { path }.fail(),
            PathState::Directory => {
                log::debug!("mkdir path={path} already exists");
                Ok(())
            }
            PathState::Absent => Ok(self.backend.mkdir(path).await?),
        }
    }
}
