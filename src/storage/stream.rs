// Caller-owned transfer streams handed out by download and append
use crate::error::{Error, Result};
use crate::storage::backend::{BackendWriter, ByteStream};
use crate::storage::constants::DEFAULT_BUFFER_SIZE;
use crate::wrap_err;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Read side of a download, backed by a live connection to the cluster.
///
/// Yields the file content chunk by chunk; nothing is buffered beyond the
/// chunk currently in flight.
pub struct TransferReader {
    path: String,
    inner: ByteStream,
}

impl TransferReader {
    pub(crate) fn new(path: String, inner: ByteStream) -> Self {
        Self { path, inner }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Drain the stream into memory.
    pub async fn read_to_end(mut self) -> Result<Vec<u8>> {
        let mut content = Vec::new();
        while let Some(chunk) = self.next().await {
            content.extend_from_slice(&chunk?);
        }
        Ok(content)
    }

    /// Copy the stream into `dest`, calling `on_progress` with the running byte count.
    pub async fn copy_to<W, F>(mut self, dest: &mut W, mut on_progress: F) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
        F: FnMut(u64),
    {
        let mut total_bytes = 0u64;
        while let Some(chunk) = self.next().await {
            let chunk = chunk?;
            dest.write_all(&chunk).await?;
            total_bytes += chunk.len() as u64;
            on_progress(total_bytes);
        }
        dest.flush().await?;
        Ok(total_bytes)
    }
}

impl Stream for TransferReader {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let item = self.inner.poll_next_unpin(cx);
        item.map(|item| {
            item.map(|chunk| {
                wrap_err!(
                    chunk,
                    TransferFailed {
                        path: self.path.clone()
                    }
                )
            })
        })
    }
}

/// Write side of an append (or any other streamed write).
///
/// Bytes become durable only after [`close`](Self::close). Dropping the
/// writer without closing or aborting it leaves the outcome to the storage
/// client and logs a warning.
#[derive(Debug)]
pub struct TransferWriter<W: BackendWriter> {
    path: String,
    inner: W,
    written: u64,
    finished: bool,
}

impl<W: BackendWriter> TransferWriter<W> {
    pub(crate) fn new(path: String, inner: W) -> Self {
        Self {
            path,
            inner,
            written: 0,
            finished: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Bytes accepted so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub async fn write(&mut self, data: impl Into<Bytes>) -> Result<()> {
        let chunk = data.into();
        let len = chunk.len() as u64;
        wrap_err!(
            self.inner.write(chunk).await,
            TransferFailed {
                path: self.path.clone()
            }
        )?;
        self.written += len;
        Ok(())
    }

    /// Pump `reader` to its end into this stream, returning the bytes moved.
    ///
    /// Read failures on the local side are reported as `TransferFailed` too.
    pub async fn write_from<R: AsyncRead + Unpin>(&mut self, mut reader: R) -> Result<u64> {
        let mut buffer = vec![0u8; DEFAULT_BUFFER_SIZE];
        let mut total_bytes = 0u64;
        loop {
            let bytes_read = wrap_err!(
                reader.read(&mut buffer).await,
                TransferFailed {
                    path: self.path.clone()
                }
            )?;
            if bytes_read == 0 {
                return Ok(total_bytes);
            }
            self.write(Bytes::copy_from_slice(&buffer[..bytes_read]))
                .await?;
            total_bytes += bytes_read as u64;
        }
    }

    /// Commit the transfer and release the connection.
    pub async fn close(mut self) -> Result<u64> {
        self.finished = true;
        wrap_err!(
            self.inner.close().await,
            TransferFailed {
                path: self.path.clone()
            }
        )?;
        Ok(self.written)
    }

    /// Drop everything written through this stream.
    pub async fn abort(mut self) -> Result<()> {
        self.finished = true;
        self.inner.abort().await.map_err(Error::from)
    }

    /// Abort after a failed transfer, keeping the original error.
    pub(crate) async fn abort_after(self, error: Error) -> Error {
        let path = self.path.clone();
        if let Err(abort_error) = self.abort().await {
            log::warn!("failed to abort transfer to {path}: {abort_error}");
        }
        error
    }
}

impl<W: BackendWriter> Drop for TransferWriter<W> {
    fn drop(&mut self) {
        if !self.finished {
            log::warn!(
                "transfer stream for {} dropped without close ({} bytes written)",
                self.path,
                self.written
            );
        }
    }
}
