//! The metadata/download provider seam.

use crate::error::ProviderError;
use crate::models::{Playlist, TrackInfo};
use async_trait::async_trait;

/// Outcome of a download request.
///
/// Downloads are tracked tasks, not fire-and-forget threads: the caller
/// learns whether one was started, is already running, or is not needed,
/// and the audio pipeline observes completion through its source
/// locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    /// The source audio is already in the cache directory.
    Cached,
    /// A download task was started by this call.
    Started,
    /// Another request already has a download in flight for this id.
    InProgress,
}

/// Resolves search, metadata and playlist queries against YouTube and
/// downloads source audio into the cache directory.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Searches for tracks matching `query`. A query that is itself a
    /// video id or URL resolves to that single track.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<TrackInfo>, ProviderError>;

    /// Full metadata for one track.
    async fn track_info(&self, id: &str) -> Result<TrackInfo, ProviderError>;

    /// Lists the tracks of a playlist.
    async fn playlist(&self, playlist_id: &str) -> Result<Playlist, ProviderError>;

    /// Makes sure the source audio for `id` ends up in the audio cache
    /// directory, starting a background download if needed. Returns
    /// without waiting for the download to finish.
    async fn ensure_download(&self, id: &str) -> Result<DownloadStatus, ProviderError>;
}
