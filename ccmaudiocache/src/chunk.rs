//! Chunked reads of encoded streams.
//!
//! The game client streams audio by polling byte ranges: it asks for
//! `(offset, size)` and plays what it gets, so the server never pushes.
//! Offsets are byte offsets into the encoded DFPWM stream; the client
//! does its own byte/sample-rate arithmetic.

use crate::cache::{CacheStatus, DfpwmCache};
use crate::channel::Channel;
use crate::error::AudioCacheError;
use std::io::SeekFrom;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::warn;

/// One byte-range slice of an encoded stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    pub data: Vec<u8>,
    /// True when this chunk reaches (or lies past) the end of the
    /// stream, or when no stream is available yet.
    pub done: bool,
}

impl AudioChunk {
    /// The "nothing to play yet" chunk: empty and final, telling the
    /// client to poll again later.
    pub fn empty_done() -> Self {
        Self {
            data: Vec::new(),
            done: true,
        }
    }
}

/// Serves one chunk of the encoded stream for `(id, channel)`.
///
/// A cold cache triggers the full decode/encode pipeline synchronously
/// within this request. "Source still downloading" and decode failures
/// both surface as an empty final chunk rather than an HTTP error; the
/// failure is logged and the cache stays clean for a retry.
pub async fn get_chunk(
    cache: &DfpwmCache,
    id: &str,
    channel: Channel,
    offset: u64,
    size: usize,
) -> Result<AudioChunk, AudioCacheError> {
    if size == 0 {
        return Err(AudioCacheError::InvalidChunkSize(0));
    }

    let path = match cache.get_or_create(id, channel).await {
        Ok(CacheStatus::Ready(path)) => path,
        Ok(CacheStatus::NotReady) => return Ok(AudioChunk::empty_done()),
        Err(err @ AudioCacheError::InvalidId(_)) => return Err(err),
        Err(err) => {
            // Lossy by design: the client hears silence and may retry,
            // it must never crash mid-playlist.
            warn!(id, %channel, %err, "Serving empty chunk after pipeline failure");
            return Ok(AudioChunk::empty_done());
        }
    };

    read_chunk(&path, offset, size).await
}

/// Reads `[offset, offset + size)` clamped to the file length.
pub async fn read_chunk(
    path: &Path,
    offset: u64,
    size: usize,
) -> Result<AudioChunk, AudioCacheError> {
    let mut file = tokio::fs::File::open(path).await?;
    let len = file.metadata().await?.len();

    if offset >= len {
        return Ok(AudioChunk::empty_done());
    }

    let available = usize::try_from(len - offset).unwrap_or(usize::MAX);
    let to_read = size.min(available);

    file.seek(SeekFrom::Start(offset)).await?;
    let mut data = vec![0u8; to_read];
    file.read_exact(&mut data).await?;

    let done = offset + data.len() as u64 >= len;
    Ok(AudioChunk { data, done })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn stream_file(len: usize) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stream.dfpwm");
        let bytes: Vec<u8> = (0..len).map(|i| i as u8).collect();
        tokio::fs::write(&path, &bytes).await.unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn last_byte_is_final() {
        let (_dir, path) = stream_file(100).await;
        let chunk = read_chunk(&path, 99, 10).await.unwrap();
        assert_eq!(chunk.data, vec![99]);
        assert!(chunk.done);
    }

    #[tokio::test]
    async fn offset_at_end_is_empty_final() {
        let (_dir, path) = stream_file(100).await;
        let chunk = read_chunk(&path, 100, 10).await.unwrap();
        assert!(chunk.data.is_empty());
        assert!(chunk.done);
    }

    #[tokio::test]
    async fn oversized_request_returns_whole_stream() {
        let (_dir, path) = stream_file(100).await;
        let chunk = read_chunk(&path, 0, 200).await.unwrap();
        assert_eq!(chunk.data.len(), 100);
        assert!(chunk.done);
    }

    #[tokio::test]
    async fn interior_chunk_is_not_final() {
        let (_dir, path) = stream_file(100).await;
        let chunk = read_chunk(&path, 10, 20).await.unwrap();
        assert_eq!(chunk.data.len(), 20);
        assert_eq!(chunk.data[0], 10);
        assert!(!chunk.done);
    }

    #[tokio::test]
    async fn exact_boundary_is_final() {
        let (_dir, path) = stream_file(100).await;
        let chunk = read_chunk(&path, 90, 10).await.unwrap();
        assert_eq!(chunk.data.len(), 10);
        assert!(chunk.done);
    }
}
