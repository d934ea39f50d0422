use std::io;

/// Errors of the audio delivery pipeline.
///
/// `Decode` covers the external decode tool (missing binary, corrupt
/// source, unsupported codec); it is terminal for the request but leaves
/// no cache entry, so a later request retries from scratch. The encoder
/// itself has no failure modes.
#[derive(Debug, thiserror::Error)]
pub enum AudioCacheError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("invalid media identifier: {0:?}")]
    InvalidId(String),
    #[error("invalid chunk size: {0}")]
    InvalidChunkSize(i64),
    #[error("invalid chunk offset: {0}")]
    InvalidChunkOffset(i64),
    #[error("unknown channel: {0:?}")]
    UnknownChannel(String),
}
