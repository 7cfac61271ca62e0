use crate::error::{PathTraversalConflictSnafu, Result};
use crate::storage::backend::{PathState, StorageBackend};
use crate::storage::utils::path::ancestors;

/// Trait for resolving the state of remote paths.
pub trait Stater {
    /// Classify `path` as absent, file or directory. Always a fresh query.
    async fn path_state(&self, path: &str) -> Result<PathState>;

    /// Whether `path` is a file or a directory.
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Fail with `PathTraversalConflict` when an ancestor of `path` is a file.
    async fn ensure_traversable(&self, path: &str) -> Result<()>;
}

pub struct BackendStater<'a, B> {
    backend: &'a B,
}

impl<'a, B: StorageBackend> BackendStater<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }
}

impl<B: StorageBackend> Stater for BackendStater<'_, B> {
    async fn path_state(&self, path: &str) -> Result<PathState> {
        let state = self.backend.path_state(path).await?;
        log::trace!("path_state path={path} state={state:?}");
        Ok(state)
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.path_state(path).await?.exists())
    }

    async fn ensure_traversable(&self, path: &str) -> Result<()> {
        for ancestor in ancestors(path) {
            match self.path_state(&ancestor).await? {
                PathState::Directory => continue,
                // nothing below an absent ancestor can exist either
                PathState::Absent => break,
                PathState::File => {
                    return PathTraversalConflictSnafu {
                        path: path.to_string(),
                        ancestor,
                    }
                    .fail();
                }
            }
        }
        Ok(())
    }
}
