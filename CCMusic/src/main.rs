use ccmaudiocache::AudioCacheExt;
use ccmserver::{LoggingOptions, ServerBuilder};
use ccmtube::TubeExt;
use tracing::info;
use utoipa::OpenApi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ========== Phase 1: infrastructure ==========

    let mut server = ServerBuilder::new_configured().build();
    server.init_logging(LoggingOptions::from_config()).await;

    info!("Starting CCMusic backend...");

    server
        .add_route("/", || async {
            serde_json::json!({
                "status": "CC:Tweaked YouTube Music Backend",
                "version": env!("CARGO_PKG_VERSION"),
            })
        })
        .await;

    // ========== Phase 2: services ==========

    info!("Initializing DFPWM audio cache...");
    let cache = server.init_audio_cache().await?;
    info!(
        dfpwm_dir = %cache.dfpwm_dir().display(),
        "Audio chunk API ready at /api/audio/{{id}}/chunk"
    );

    info!("Initializing YouTube provider...");
    server.init_tube().await?;

    // Merged OpenAPI document of all registered APIs.
    let mut doc = ccmaudiocache::openapi::ApiDoc::openapi();
    doc.merge(ccmtube::openapi::ApiDoc::openapi());
    server
        .add_route("/api-docs/openapi.json", move || {
            let doc = doc.clone();
            async move { doc }
        })
        .await;

    // ========== Phase 3: start ==========

    server.start().await;
    info!("CCMusic is ready, press Ctrl+C to stop...");
    server.wait().await;

    Ok(())
}
