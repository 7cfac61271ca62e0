use super::{BackendWriter, ByteStream, PathState, StorageBackend};
use crate::config::{ConnectorConfig, EndpointScheme};
use crate::error::Result;
#[cfg(not(all(feature = "hdfs", feature = "webhdfs", feature = "fs")))]
use crate::error::Error;
use crate::storage::utils::path::{ancestors, ensure_trailing_slash, is_root};
use bytes::Bytes;
use futures::StreamExt;
use opendal::{EntryMode, ErrorKind, Operator, Writer};

/// Storage backend speaking to the cluster through an OpenDAL operator.
#[derive(Clone)]
pub struct OpenDalBackend {
    operator: Operator,
    scheme: EndpointScheme,
}

impl OpenDalBackend {
    pub fn new(config: &ConnectorConfig) -> Result<Self> {
        let scheme = config.endpoint.scheme()?;
        let operator = Self::build_operator(config, scheme)?;
        Ok(Self { operator, scheme })
    }

    pub fn scheme(&self) -> EndpointScheme {
        self.scheme
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    /// First ancestor of `path` that is a plain file, if any.
    async fn file_ancestor(&self, path: &str) -> Option<String> {
        for ancestor in ancestors(path) {
            match self.operator.stat(&ancestor).await {
                Ok(meta) if meta.mode().is_file() => return Some(ancestor),
                Ok(_) => {}
                Err(_) => return None,
            }
        }
        None
    }

    fn build_operator(config: &ConnectorConfig, scheme: EndpointScheme) -> Result<Operator> {
        match scheme {
            EndpointScheme::Hdfs => {
                #[cfg(feature = "hdfs")]
                {
                    let mut builder = opendal::services::Hdfs::default()
                        .name_node(config.endpoint.as_str())
                        .root(&config.root)
                        .enable_append(true)
                        .atomic_write_dir(&config.staging_dir());
                    if let Some(user) = &config.user {
                        builder = builder.user(user);
                    }
                    Ok(Operator::new(builder)?.finish())
                }

                #[cfg(not(feature = "hdfs"))]
                {
                    Err(Error::UnsupportedScheme {
                        scheme: "hdfs (feature disabled)".to_string(),
                    })
                }
            }
            EndpointScheme::WebHdfs => {
                #[cfg(feature = "webhdfs")]
                {
                    let mut builder = opendal::services::Webhdfs::default()
                        .endpoint(&config.endpoint.http_url())
                        .root(&config.root)
                        .atomic_write_dir(&config.staging_dir());
                    if let Some(user) = &config.user {
                        builder = builder.user_name(user);
                    }
                    Ok(Operator::new(builder)?.finish())
                }

                #[cfg(not(feature = "webhdfs"))]
                {
                    Err(Error::UnsupportedScheme {
                        scheme: "webhdfs (feature disabled)".to_string(),
                    })
                }
            }
            EndpointScheme::Fs => {
                #[cfg(feature = "fs")]
                {
                    // Root and staging dir both live under the endpoint directory.
                    let base = config.endpoint.location().trim_end_matches('/');
                    let root = format!("{base}/{}", config.root.trim_start_matches('/'));
                    let staging =
                        format!("{base}/{}", config.staging_dir().trim_start_matches('/'));
                    std::fs::create_dir_all(&root)?;
                    std::fs::create_dir_all(&staging)?;

                    let builder = opendal::services::Fs::default()
                        .root(&root)
                        .atomic_write_dir(&staging);
                    Ok(Operator::new(builder)?.finish())
                }

                #[cfg(not(feature = "fs"))]
                {
                    Err(Error::UnsupportedScheme {
                        scheme: "file (feature disabled)".to_string(),
                    })
                }
            }
        }
    }
}

fn state_of(mode: EntryMode) -> PathState {
    if mode.is_dir() {
        PathState::Directory
    } else {
        PathState::File
    }
}

impl StorageBackend for OpenDalBackend {
    type Writer = OpenDalWriter;

    async fn path_state(&self, path: &str) -> opendal::Result<PathState> {
        if is_root(path) {
            return Ok(PathState::Directory);
        }

        match self.operator.stat(path).await {
            Ok(meta) => Ok(state_of(meta.mode())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // Services without native directories only answer for the slash-terminated key.
                match self.operator.stat(&ensure_trailing_slash(path)).await {
                    Ok(meta) if meta.mode().is_dir() => Ok(PathState::Directory),
                    Ok(_) => Ok(PathState::Absent),
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(PathState::Absent),
                    Err(e) => Err(e),
                }
            }
            // Clients reject paths below a plain file ("not a directory").
            Err(e) => match self.file_ancestor(path).await {
                Some(ancestor) => {
                    log::debug!("path_state path={path} below file {ancestor}: {e}");
                    Ok(PathState::Absent)
                }
                None => Err(e),
            },
        }
    }

    async fn open_read(&self, path: &str) -> opendal::Result<ByteStream> {
        let reader = self.operator.reader(path).await?;
        let stream = reader.into_bytes_stream(..).await?;
        Ok(stream.boxed())
    }

    async fn open_write(&self, path: &str, append: bool) -> opendal::Result<Self::Writer> {
        let writer = self.operator.writer_with(path).append(append).await?;
        Ok(OpenDalWriter { inner: writer })
    }

    async fn delete(&self, path: &str) -> opendal::Result<()> {
        self.operator.delete(path).await
    }

    async fn mkdir(&self, path: &str) -> opendal::Result<()> {
        self.operator.create_dir(&ensure_trailing_slash(path)).await
    }

    async fn rmdir(&self, path: &str) -> opendal::Result<()> {
        self.operator.remove_all(&ensure_trailing_slash(path)).await
    }
}

pub struct OpenDalWriter {
    inner: Writer,
}

impl BackendWriter for OpenDalWriter {
    async fn write(&mut self, chunk: Bytes) -> opendal::Result<()> {
        self.inner.write(chunk).await
    }

    async fn close(&mut self) -> opendal::Result<()> {
        self.inner.close().await.map(|_| ())
    }

    async fn abort(&mut self) -> opendal::Result<()> {
        self.inner.abort().await
    }
}
