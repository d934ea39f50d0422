//! Configuration extension for the YouTube provider.

use crate::ytdlp::YtDlpProvider;
use anyhow::Result;
use ccmaudiocache::config_ext::AudioCacheConfigExt;
use ccmconfig::Config;
use std::sync::Arc;

const DEFAULT_METADATA_DIR: &str = "cache/metadata";

/// Extension trait with the provider configuration accessors.
pub trait TubeConfigExt {
    /// Path of the yt-dlp binary.
    fn get_ytdlp_path(&self) -> String;

    /// Directory holding the per-track metadata JSON cache.
    fn get_metadata_cache_dir(&self) -> Result<String>;

    /// Builds a [`YtDlpProvider`] from the configured tool path and
    /// cache directories. The audio directory is the same one the DFPWM
    /// pipeline's source locator reads.
    fn create_ytdlp_provider(&self) -> Result<Arc<YtDlpProvider>>;
}

impl TubeConfigExt for Config {
    fn get_ytdlp_path(&self) -> String {
        self.get_tool_path("ytdlp", "yt-dlp")
    }

    fn get_metadata_cache_dir(&self) -> Result<String> {
        self.get_managed_dir(&["host", "metadata_cache", "directory"], DEFAULT_METADATA_DIR)
    }

    fn create_ytdlp_provider(&self) -> Result<Arc<YtDlpProvider>> {
        let provider = YtDlpProvider::new(
            self.get_ytdlp_path(),
            self.get_audio_cache_dir()?,
            self.get_metadata_cache_dir()?,
        )?;
        Ok(Arc::new(provider))
    }
}
