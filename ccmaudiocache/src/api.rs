//! REST handlers for the audio chunk API.

use crate::cache::{validate_media_id, DfpwmCache};
use crate::channel::Channel;
use crate::chunk::{self, AudioChunk};
use crate::error::AudioCacheError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

/// Standard error payload of the audio API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code
    #[schema(example = "INVALID_ARGUMENT")]
    pub error: String,
    /// Human-readable detail
    pub message: String,
}

/// Query parameters of the chunk endpoint
#[derive(Debug, Deserialize, IntoParams)]
pub struct ChunkQuery {
    /// Byte offset into the encoded stream (default 0)
    pub offset: Option<i64>,
    /// Requested chunk size in bytes (default from configuration)
    pub size: Option<i64>,
    /// `mono`, `left` or `right`; omitted means mono downmix
    pub channel: Option<String>,
}

/// One chunk of DFPWM audio
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChunkResponse {
    /// Hex-encoded DFPWM bytes
    #[schema(example = "aa0155ff")]
    pub data: String,
    /// True when the end of the stream has been reached, or when no
    /// audio is available yet
    pub done: bool,
}

impl From<AudioChunk> for ChunkResponse {
    fn from(chunk: AudioChunk) -> Self {
        Self {
            data: hex::encode(chunk.data),
            done: chunk.done,
        }
    }
}

fn bad_request(message: String) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "INVALID_ARGUMENT".to_string(),
            message,
        }),
    )
        .into_response()
}

/// Serves one chunk of the DFPWM stream for a media identifier
///
/// On a cold cache this runs the decode/encode pipeline synchronously
/// before answering. While the source audio is still downloading (or if
/// decoding failed) the response is an empty chunk with `done = true`,
/// telling the client to poll again later.
#[utoipa::path(
    get,
    path = "/api/audio/{id}/chunk",
    tag = "audio",
    params(
        ("id" = String, Path, description = "Media identifier"),
        ChunkQuery,
    ),
    responses(
        (status = 200, description = "Chunk of the encoded stream", body = ChunkResponse),
        (status = 400, description = "Malformed id, offset, size or channel", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse),
    )
)]
pub async fn get_audio_chunk(
    State(cache): State<Arc<DfpwmCache>>,
    Path(id): Path<String>,
    Query(params): Query<ChunkQuery>,
) -> impl IntoResponse {
    if let Err(err) = validate_media_id(&id) {
        return bad_request(err.to_string());
    }

    let channel = match params.channel.as_deref() {
        None | Some("") => Channel::Mono,
        Some(s) => match s.parse::<Channel>() {
            Ok(c) => c,
            Err(err) => return bad_request(err.to_string()),
        },
    };

    let offset = params.offset.unwrap_or(0);
    if offset < 0 {
        return bad_request(AudioCacheError::InvalidChunkOffset(offset).to_string());
    }

    let size = params.size.unwrap_or(cache.default_chunk_size() as i64);
    if size <= 0 {
        return bad_request(AudioCacheError::InvalidChunkSize(size).to_string());
    }

    match chunk::get_chunk(&cache, &id, channel, offset as u64, size as usize).await {
        Ok(chunk) => (StatusCode::OK, Json(ChunkResponse::from(chunk))).into_response(),
        Err(err) => {
            error!(id, %channel, %err, "Chunk request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "INTERNAL".to_string(),
                    message: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Builds the audio API router, to be mounted under `/api/audio`.
pub fn create_router(cache: Arc<DfpwmCache>) -> Router {
    Router::new()
        .route("/{id}/chunk", get(get_audio_chunk))
        .with_state(cache)
}
