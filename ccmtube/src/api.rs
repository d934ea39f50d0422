//! REST handlers for search, process and playlist requests.
//!
//! Thin orchestration over [`MediaProvider`]: upstream failures degrade
//! to empty results or a JSON `{"error": …}` payload with status 200,
//! matching what the Lua client expects. Only malformed requests become
//! HTTP errors (handled by axum's extractors).

use crate::models::{Playlist, TrackInfo};
use crate::provider::MediaProvider;
use crate::video_id::extract_video_id;
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;

/// Error payload returned with status 200; the client renders the
/// message instead of a track list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    10
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub results: Vec<TrackInfo>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessRequest {
    /// Video id or any YouTube URL form.
    pub url: String,
}

/// Track metadata as the process endpoint returns it.
///
/// Unlike search results, `duration` here is numeric whole seconds
/// (0 when unknown); the playback client does its own byte/second
/// arithmetic with it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProcessResponse {
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Duration in whole seconds; 0 when unknown.
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
}

impl From<TrackInfo> for ProcessResponse {
    fn from(track: TrackInfo) -> Self {
        Self {
            id: track.id,
            title: track.title,
            artist: track.artist,
            duration: track.duration_seconds.unwrap_or(0),
            album: track.album,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRequest {
    pub playlist_id: String,
}

/// Searches YouTube Music
///
/// A query that is itself a video id or URL returns that single track.
/// Upstream failures return an empty result list.
#[utoipa::path(
    post,
    path = "/api/search",
    tag = "tube",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching tracks", body = SearchResponse),
    )
)]
pub async fn search(
    State(provider): State<Arc<dyn MediaProvider>>,
    Json(request): Json<SearchRequest>,
) -> impl IntoResponse {
    match provider.search(&request.query, request.max_results).await {
        Ok(results) => Json(SearchResponse { results }),
        Err(err) => {
            warn!(query = %request.query, %err, "Search failed");
            Json(SearchResponse {
                results: Vec::new(),
            })
        }
    }
}

/// Resolves a video id or URL to track metadata
///
/// Also kicks off the background audio download so the track is ready
/// (or nearly ready) when the client starts polling for chunks.
#[utoipa::path(
    post,
    path = "/api/process",
    tag = "tube",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "Track metadata, or an error payload", body = ProcessResponse),
    )
)]
pub async fn process(
    State(provider): State<Arc<dyn MediaProvider>>,
    Json(request): Json<ProcessRequest>,
) -> impl IntoResponse {
    let Some(id) = extract_video_id(&request.url) else {
        return Json(ErrorBody {
            error: "Invalid video ID or URL".to_string(),
        })
        .into_response();
    };

    match provider.track_info(&id).await {
        Ok(track) => {
            if let Err(err) = provider.ensure_download(&id).await {
                warn!(id, %err, "Failed to start audio download");
            }
            Json(ProcessResponse::from(track)).into_response()
        }
        Err(err) => {
            warn!(id, %err, "Track lookup failed");
            Json(ErrorBody {
                error: err.to_string(),
            })
            .into_response()
        }
    }
}

/// Lists the tracks of a playlist
#[utoipa::path(
    post,
    path = "/api/playlist",
    tag = "tube",
    request_body = PlaylistRequest,
    responses(
        (status = 200, description = "Playlist title and tracks, or an error payload", body = Playlist),
    )
)]
pub async fn playlist(
    State(provider): State<Arc<dyn MediaProvider>>,
    Json(request): Json<PlaylistRequest>,
) -> impl IntoResponse {
    match provider.playlist(&request.playlist_id).await {
        Ok(playlist) => Json(playlist).into_response(),
        Err(err) => {
            warn!(playlist_id = %request.playlist_id, %err, "Playlist lookup failed");
            Json(ErrorBody {
                error: err.to_string(),
            })
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_response_uses_numeric_seconds() {
        let track = TrackInfo {
            id: "dQw4w9WgXcQ".to_string(),
            title: "Song".to_string(),
            artist: "Artist".to_string(),
            duration: "3:33".to_string(),
            duration_seconds: Some(213),
            album: Some("Album".to_string()),
        };
        let response = ProcessResponse::from(track);
        assert_eq!(response.duration, 213);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["duration"], 213);
        assert_eq!(json["album"], "Album");
    }

    #[test]
    fn unknown_duration_becomes_zero() {
        let track = TrackInfo {
            id: "dQw4w9WgXcQ".to_string(),
            title: "Song".to_string(),
            artist: "Artist".to_string(),
            duration: "?".to_string(),
            duration_seconds: None,
            album: None,
        };
        let response = ProcessResponse::from(track);
        assert_eq!(response.duration, 0);

        // Absent album is omitted entirely, as the client expects.
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("album").is_none());
    }
}
