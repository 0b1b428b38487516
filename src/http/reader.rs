use std::time::Duration;

use anyhow::{Context, ensure};
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;
use tracing::debug;

/// Collects one request's bytes from a stream.
///
/// The request is taken to be complete once a read returns fewer bytes than
/// the buffer holds. This is a heuristic: a request whose length is an exact
/// multiple of the capacity leaves the reader waiting for a read that never
/// comes. `read_timeout` bounds that wait.
pub struct ConnectionReader {
    buffer: Box<[u8]>,
    read_timeout: Option<Duration>,
}

impl ConnectionReader {
    pub fn new(capacity: usize, read_timeout: Option<Duration>) -> anyhow::Result<Self> {
        ensure!(capacity > 0, "read buffer capacity must be non-zero");
        Ok(Self {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            read_timeout,
        })
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Reads until the framing heuristic fires or the peer closes, and
    /// returns everything received as text.
    ///
    /// Bytes are decoded once at the end, so a character split across two
    /// reads survives. Invalid UTF-8 is replaced, not rejected.
    pub async fn read_request<R>(&mut self, stream: &mut R) -> anyhow::Result<String>
    where
        R: AsyncRead + Unpin,
    {
        let capacity = self.capacity();
        let mut accumulated = BytesMut::with_capacity(capacity);

        loop {
            let n = self.read_chunk(stream).await?;
            debug!(bytes = n, total = accumulated.len() + n, "Read chunk");

            // Only the first n bytes are live; the rest of the window is stale.
            accumulated.extend_from_slice(&self.buffer[..n]);

            if n < capacity {
                break;
            }
        }

        Ok(String::from_utf8_lossy(&accumulated).into_owned())
    }

    async fn read_chunk<R>(&mut self, stream: &mut R) -> anyhow::Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        match self.read_timeout {
            Some(limit) => timeout(limit, stream.read(&mut self.buffer))
                .await
                .with_context(|| format!("no data within {:?}", limit))?
                .context("read failed"),
            None => stream.read(&mut self.buffer).await.context("read failed"),
        }
    }
}
