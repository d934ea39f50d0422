//! ccmserver extension wiring the audio cache into a server.

use crate::api;
use crate::cache::DfpwmCache;
use crate::config_ext::AudioCacheConfigExt;
use anyhow::Result;
use ccmconfig::get_config;
use ccmserver::Server;
use std::sync::Arc;
use tracing::info;

/// Extension trait registering the audio chunk API on a server.
pub trait AudioCacheExt {
    /// Builds the configured [`DfpwmCache`] and mounts the audio API
    /// under `/api/audio`.
    ///
    /// # Routes
    ///
    /// - `GET /api/audio/{id}/chunk?offset&size&channel`
    async fn init_audio_cache(&mut self) -> Result<Arc<DfpwmCache>>;
}

impl AudioCacheExt for Server {
    async fn init_audio_cache(&mut self) -> Result<Arc<DfpwmCache>> {
        let config = get_config();
        let cache = config.create_dfpwm_cache()?;

        info!(
            audio_dir = %cache.audio_dir().display(),
            dfpwm_dir = %cache.dfpwm_dir().display(),
            "Audio cache initialized"
        );

        let router = api::create_router(cache.clone());
        self.add_router("/api/audio", router).await;

        Ok(cache)
    }
}
