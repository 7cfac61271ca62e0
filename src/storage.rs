use crate::config::ConnectorConfig;
use crate::error::Result;
use std::path::Path;

pub mod backend;
pub mod constants;
mod operations;
pub mod stream;
pub(crate) mod utils;

use self::operations::append::BackendAppender;
use self::operations::delete::BackendDeleter;
use self::operations::download::BackendDownloader;
use self::operations::mkdir::BackendMkdirer;
use self::operations::stat::BackendStater;
use self::operations::upload::BackendUploader;
use self::operations::{Appender, Deleter, Downloader, Mkdirer, Stater, Uploader};
use self::utils::path::normalize_remote_path;

pub use self::backend::{
    BackendWriter, MemoryBackend, OpenDalBackend, PathState, StorageBackend,
};
pub use self::stream::{TransferReader, TransferWriter};

/// File and directory operations over a storage cluster.
///
/// Every call re-queries the remote state of its target before acting, and
/// keeps nothing between calls beyond the backend handle, so a connector can
/// be cloned and shared freely across tasks.
#[derive(Clone)]
pub struct StorageConnector<B> {
    backend: B,
}

impl StorageConnector<OpenDalBackend> {
    /// Open a connector against the cluster named by `config.endpoint`.
    pub fn connect(config: &ConnectorConfig) -> Result<Self> {
        log::debug!(
            "connect endpoint={} root={} user={:?}",
            config.endpoint,
            config.root,
            config.user
        );
        Ok(Self::new(OpenDalBackend::new(config)?))
    }
}

impl<B: StorageBackend> StorageConnector<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Upload `local_path` to `dest_path`.
    ///
    /// Fails with `PathIsDirectory` when the destination is a directory,
    /// regardless of `overwrite`, and with `AlreadyExists` when it is a file
    /// and `overwrite` is false. An interrupted transfer is aborted and never
    /// replaces the previous content.
    pub async fn upload(
        &self,
        local_path: impl AsRef<Path>,
        dest_path: &str,
        overwrite: bool,
    ) -> Result<()> {
        let local_path = local_path.as_ref();
        let dest_path = normalize_remote_path(dest_path)?;
        log::debug!(
            "upload local_path={} dest_path={dest_path} overwrite={overwrite}",
            local_path.display()
        );
        let bytes = BackendUploader::new(&self.backend)
            .upload(local_path, &dest_path, overwrite)
            .await?;
        log::debug!("upload dest_path={dest_path} bytes={bytes}");
        Ok(())
    }

    /// Same as [`upload`](Self::upload).
    pub async fn copy_file(
        &self,
        local_path: impl AsRef<Path>,
        dest_path: &str,
        overwrite: bool,
    ) -> Result<()> {
        self.upload(local_path, dest_path, overwrite).await
    }

    /// Open the file at `path` for streaming reads.
    pub async fn download(&self, path: &str) -> Result<TransferReader> {
        let path = normalize_remote_path(path)?;
        log::debug!("download path={path}");
        BackendDownloader::new(&self.backend).download(&path).await
    }

    /// Open the existing file at `path` for appending.
    ///
    /// The returned writer must be closed for the appended bytes to be committed.
    pub async fn append_to_file(&self, path: &str) -> Result<TransferWriter<B::Writer>> {
        let path = normalize_remote_path(path)?;
        log::debug!("append_to_file path={path}");
        BackendAppender::new(&self.backend).append(&path).await
    }

    pub async fn delete_file(&self, path: &str) -> Result<()> {
        let path = normalize_remote_path(path)?;
        log::debug!("delete_file path={path}");
        BackendDeleter::new(&self.backend).delete_file(&path).await
    }

    /// Create a directory, including missing parents. Idempotent.
    pub async fn create_folder(&self, path: &str) -> Result<()> {
        let path = normalize_remote_path(path)?;
        log::debug!("create_folder path={path}");
        BackendMkdirer::new(&self.backend).mkdir(&path).await
    }

    /// Remove a directory and its contents. Absent directories are ignored.
    pub async fn delete_folder(&self, path: &str) -> Result<()> {
        let path = normalize_remote_path(path)?;
        log::debug!("delete_folder path={path}");
        BackendDeleter::new(&self.backend).delete_folder(&path).await
    }

    pub async fn exists(&self, path: &str) -> Result<bool> {
        let path = normalize_remote_path(path)?;
        log::debug!("exists path={path}");
        BackendStater::new(&self.backend).exists(&path).await
    }
}
