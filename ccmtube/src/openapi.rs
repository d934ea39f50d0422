//! OpenAPI documentation of the search/process/playlist API.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::api::search, crate::api::process, crate::api::playlist),
    components(schemas(
        crate::api::SearchRequest,
        crate::api::SearchResponse,
        crate::api::ProcessRequest,
        crate::api::ProcessResponse,
        crate::api::PlaylistRequest,
        crate::api::ErrorBody,
        crate::models::TrackInfo,
        crate::models::PlaylistEntry,
        crate::models::Playlist,
    )),
    tags(
        (name = "tube", description = "YouTube search, metadata and playlists")
    )
)]
pub struct ApiDoc;
