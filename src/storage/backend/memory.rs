use super::{BackendWriter, ByteStream, PathState, StorageBackend};
use crate::storage::constants::DEFAULT_CHUNK_SIZE;
use crate::storage::utils::path::{ancestors, is_root};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use futures::stream;
use opendal::{Error, ErrorKind};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
enum Node {
    File(Bytes),
    Directory,
}

#[derive(Debug, Default)]
struct Namespace {
    nodes: BTreeMap<String, Node>,
    failing_writes: HashSet<String>,
}

impl Namespace {
    fn state(&self, path: &str) -> PathState {
        if is_root(path) {
            return PathState::Directory;
        }
        match self.nodes.get(path) {
            None => PathState::Absent,
            Some(Node::File(_)) => PathState::File,
            Some(Node::Directory) => PathState::Directory,
        }
    }

    fn create_parents(&mut self, path: &str) -> opendal::Result<()> {
        for ancestor in ancestors(path) {
            match self.nodes.get(&ancestor) {
                Some(Node::File(_)) => {
                    return Err(Error::new(
                        ErrorKind::Unexpected,
                        format!("parent {ancestor} of {path} is a file"),
                    ));
                }
                Some(Node::Directory) => {}
                None => {
                    self.nodes.insert(ancestor, Node::Directory);
                }
            }
        }
        Ok(())
    }
}

/// In-memory storage cluster.
///
/// Clones share the same namespace. Writes are staged in the writer and only
/// become visible on close, so an aborted or failed transfer never replaces a file.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    namespace: Arc<Mutex<Namespace>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write chunk sent to `path` fail.
    pub fn fail_writes_to(&self, path: &str) {
        self.lock().failing_writes.insert(path.to_string());
    }

    fn lock(&self) -> MutexGuard<'_, Namespace> {
        self.namespace
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StorageBackend for MemoryBackend {
    type Writer = MemoryWriter;

    async fn path_state(&self, path: &str) -> opendal::Result<PathState> {
        Ok(self.lock().state(path))
    }

    async fn open_read(&self, path: &str) -> opendal::Result<ByteStream> {
        let content = match self.lock().nodes.get(path) {
            Some(Node::File(content)) => content.clone(),
            Some(Node::Directory) => {
                return Err(Error::new(
                    ErrorKind::Unexpected,
                    format!("{path} is a directory"),
                ));
            }
            None => return Err(Error::new(ErrorKind::NotFound, path.to_string())),
        };

        let chunks: Vec<std::io::Result<Bytes>> = (0..content.len())
            .step_by(DEFAULT_CHUNK_SIZE)
            .map(|start| {
                let end = (start + DEFAULT_CHUNK_SIZE).min(content.len());
                Ok(content.slice(start..end))
            })
            .collect();
        Ok(stream::iter(chunks).boxed())
    }

    async fn open_write(&self, path: &str, append: bool) -> opendal::Result<Self::Writer> {
        let namespace = self.lock();
        match namespace.state(path) {
            PathState::Directory => {
                return Err(Error::new(
                    ErrorKind::Unexpected,
                    format!("{path} is a directory"),
                ));
            }
            PathState::Absent if append => {
                return Err(Error::new(ErrorKind::NotFound, path.to_string()));
            }
            _ => {}
        }

        Ok(MemoryWriter {
            namespace: self.namespace.clone(),
            path: path.to_string(),
            append,
            staged: BytesMut::new(),
            finished: false,
        })
    }

    async fn delete(&self, path: &str) -> opendal::Result<()> {
        let mut namespace = self.lock();
        if let Some(Node::File(_)) = namespace.nodes.get(path) {
            namespace.nodes.remove(path);
        }
        Ok(())
    }

    async fn mkdir(&self, path: &str) -> opendal::Result<()> {
        if is_root(path) {
            return Ok(());
        }
        let mut namespace = self.lock();
        namespace.create_parents(path)?;
        match namespace.nodes.get(path) {
            Some(Node::File(_)) => Err(Error::new(
                ErrorKind::AlreadyExists,
                format!("{path} is a file"),
            )),
            Some(Node::Directory) => Ok(()),
            None => {
                namespace.nodes.insert(path.to_string(), Node::Directory);
                Ok(())
            }
        }
    }

    async fn rmdir(&self, path: &str) -> opendal::Result<()> {
        let mut namespace = self.lock();
        let prefix = if is_root(path) {
            "/".to_string()
        } else {
            format!("{path}/")
        };
        namespace
            .nodes
            .retain(|key, _| key != path && !key.starts_with(&prefix));
        Ok(())
    }
}

#[derive(Debug)]
pub struct MemoryWriter {
    namespace: Arc<Mutex<Namespace>>,
    path: String,
    append: bool,
    staged: BytesMut,
    finished: bool,
}

impl MemoryWriter {
    fn lock(&self) -> MutexGuard<'_, Namespace> {
        self.namespace
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BackendWriter for MemoryWriter {
    async fn write(&mut self, chunk: Bytes) -> opendal::Result<()> {
        if self.finished {
            return Err(Error::new(ErrorKind::Unexpected, "writer already finished"));
        }
        if self.lock().failing_writes.contains(&self.path) {
            return Err(Error::new(
                ErrorKind::Unexpected,
                format!("injected write failure for {}", self.path),
            ));
        }
        self.staged.extend_from_slice(&chunk);
        Ok(())
    }

    async fn close(&mut self) -> opendal::Result<()> {
        if self.finished {
            return Ok(());
        }
        let staged = std::mem::take(&mut self.staged).freeze();
        let path = self.path.clone();
        let append = self.append;

        let mut namespace = self.lock();
        namespace.create_parents(&path)?;
        let content = match (namespace.nodes.get(&path), append) {
            (Some(Node::Directory), _) => {
                return Err(Error::new(
                    ErrorKind::Unexpected,
                    format!("{path} is a directory"),
                ));
            }
            (Some(Node::File(existing)), true) => {
                let mut merged = BytesMut::from(existing.as_ref());
                merged.extend_from_slice(&staged);
                merged.freeze()
            }
            (None, true) => return Err(Error::new(ErrorKind::NotFound, path)),
            _ => staged,
        };
        namespace.nodes.insert(path, Node::File(content));
        drop(namespace);

        self.finished = true;
        Ok(())
    }

    async fn abort(&mut self) -> opendal::Result<()> {
        self.staged.clear();
        self.finished = true;
        Ok(())
    }
}
