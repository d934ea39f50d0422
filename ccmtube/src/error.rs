use std::io;

/// Errors of the metadata/download provider.
///
/// Upstream failures (bot detection, removed videos, network trouble)
/// all surface as `Tool`; the HTTP layer degrades them to empty results
/// or an error payload so the game client never crashes mid-playlist.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("yt-dlp failed: {0}")]
    Tool(String),
    #[error("invalid response from yt-dlp: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid video identifier or URL: {0:?}")]
    InvalidId(String),
    #[error("playlist not found: {0:?}")]
    PlaylistNotFound(String),
}
