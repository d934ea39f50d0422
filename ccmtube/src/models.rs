//! Data model shared between the provider and the HTTP layer.

use serde::{Deserialize, Serialize};

/// One track as the Lua client displays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ccmserver", derive(utoipa::ToSchema))]
pub struct TrackInfo {
    /// YouTube video identifier (the media identifier of the audio
    /// pipeline).
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Display duration, rendered verbatim in search listings
    /// (`"3:57"`, `"?"` when unknown).
    pub duration: String,
    /// Duration in whole seconds, when the source reported one. The
    /// process endpoint serves this as its numeric `duration` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
}

/// One entry of a playlist listing; the client fetches full metadata
/// per track when it plays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ccmserver", derive(utoipa::ToSchema))]
pub struct PlaylistEntry {
    pub id: String,
    pub title: String,
}

/// A resolved playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ccmserver", derive(utoipa::ToSchema))]
pub struct Playlist {
    pub title: String,
    pub tracks: Vec<PlaylistEntry>,
}
