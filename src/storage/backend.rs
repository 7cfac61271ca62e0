// Narrow storage-client interface the connector is written against
use bytes::Bytes;
use futures::stream::BoxStream;

pub mod memory;
pub mod operator;

pub use memory::MemoryBackend;
pub use operator::OpenDalBackend;

/// Chunked byte stream produced by a backend read.
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Classification of a remote path at query time.
///
/// Never cached: other clients can change the remote state between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    Absent,
    File,
    Directory,
}

impl PathState {
    pub fn exists(self) -> bool {
        !matches!(self, PathState::Absent)
    }
}

/// Operations the connector needs from the storage cluster's native client.
///
/// Paths handed to a backend are already normalized (`/a/b`, see
/// [`normalize_remote_path`](crate::storage::utils::path::normalize_remote_path)).
/// Backends report failures in the client's own vocabulary; the connector maps
/// them onto its error taxonomy.
pub trait StorageBackend: Clone + Send + Sync + 'static {
    type Writer: BackendWriter;

    /// Resolve whether `path` is absent, a file or a directory.
    async fn path_state(&self, path: &str) -> opendal::Result<PathState>;

    /// Open a read stream over the full content of the file at `path`.
    async fn open_read(&self, path: &str) -> opendal::Result<ByteStream>;

    /// Open a write stream to `path`.
    ///
    /// With `append` the bytes land after the existing content, otherwise the
    /// file is replaced once the writer is closed.
    async fn open_write(&self, path: &str, append: bool) -> opendal::Result<Self::Writer>;

    /// Remove the file at `path`.
    async fn delete(&self, path: &str) -> opendal::Result<()>;

    /// Create the directory at `path` along with any missing parents.
    async fn mkdir(&self, path: &str) -> opendal::Result<()>;

    /// Remove the directory at `path` and everything below it.
    async fn rmdir(&self, path: &str) -> opendal::Result<()>;
}

/// Write side of a backend transfer.
pub trait BackendWriter: Send + 'static {
    async fn write(&mut self, chunk: Bytes) -> opendal::Result<()>;

    /// Commit everything written so far.
    async fn close(&mut self) -> opendal::Result<()>;

    /// Discard the transfer; the destination keeps its previous content.
    async fn abort(&mut self) -> opendal::Result<()>;
}
