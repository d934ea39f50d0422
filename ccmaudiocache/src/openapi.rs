//! OpenAPI documentation of the audio API.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::api::get_audio_chunk),
    components(schemas(crate::api::ChunkResponse, crate::api::ErrorResponse)),
    tags(
        (name = "audio", description = "DFPWM audio chunk delivery")
    )
)]
pub struct ApiDoc;
