//! ccmserver extension wiring the YouTube provider into a server.

use crate::api;
use crate::config_ext::TubeConfigExt;
use crate::provider::MediaProvider;
use crate::ytdlp::YtDlpProvider;
use anyhow::Result;
use ccmconfig::get_config;
use ccmserver::Server;
use std::sync::Arc;
use tracing::info;

/// Extension trait registering the search/process/playlist API.
pub trait TubeExt {
    /// Builds the configured [`YtDlpProvider`] and registers its routes.
    ///
    /// # Routes
    ///
    /// - `POST /api/search`
    /// - `POST /api/process`
    /// - `POST /api/playlist`
    async fn init_tube(&mut self) -> Result<Arc<YtDlpProvider>>;
}

impl TubeExt for Server {
    async fn init_tube(&mut self) -> Result<Arc<YtDlpProvider>> {
        let config = get_config();
        let provider = config.create_ytdlp_provider()?;

        info!(
            ytdlp = %config.get_ytdlp_path(),
            audio_dir = %provider.audio_dir().display(),
            "YouTube provider initialized"
        );

        let state: Arc<dyn MediaProvider> = provider.clone();
        self.add_post_handler_with_state("/api/search", api::search, state.clone())
            .await;
        self.add_post_handler_with_state("/api/process", api::process, state.clone())
            .await;
        self.add_post_handler_with_state("/api/playlist", api::playlist, state)
            .await;

        Ok(provider)
    }
}
