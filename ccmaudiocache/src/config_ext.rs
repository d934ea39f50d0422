//! Configuration extension for the audio cache.
//!
//! Extends `ccmconfig::Config` with the audio-cache keys instead of
//! teaching the config crate about this crate's concerns.

use crate::cache::DfpwmCache;
use crate::normalize::FfmpegNormalizer;
use anyhow::Result;
use ccmconfig::Config;
use serde_yaml::Value;
use std::sync::Arc;

const DEFAULT_AUDIO_DIR: &str = "cache/audio";
const DEFAULT_DFPWM_DIR: &str = "cache/dfpwm";
const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Extension trait with the audio-cache configuration accessors.
pub trait AudioCacheConfigExt {
    /// Directory where the download collaborator stores source audio.
    fn get_audio_cache_dir(&self) -> Result<String>;

    /// Directory owned by the DFPWM cache.
    fn get_dfpwm_cache_dir(&self) -> Result<String>;

    /// Path of the ffmpeg binary.
    fn get_ffmpeg_path(&self) -> String;

    /// Chunk size served when the client does not specify one.
    fn get_default_chunk_size(&self) -> Result<usize>;

    /// Builds a [`DfpwmCache`] from the configured directories, ffmpeg
    /// path, and chunk size.
    fn create_dfpwm_cache(&self) -> Result<Arc<DfpwmCache>>;
}

impl AudioCacheConfigExt for Config {
    fn get_audio_cache_dir(&self) -> Result<String> {
        self.get_managed_dir(&["host", "audio_cache", "directory"], DEFAULT_AUDIO_DIR)
    }

    fn get_dfpwm_cache_dir(&self) -> Result<String> {
        self.get_managed_dir(&["host", "dfpwm_cache", "directory"], DEFAULT_DFPWM_DIR)
    }

    fn get_ffmpeg_path(&self) -> String {
        self.get_tool_path("ffmpeg", "ffmpeg")
    }

    fn get_default_chunk_size(&self) -> Result<usize> {
        match self.get_value(&["host", "audio", "chunk_size"])? {
            Value::Number(n) if n.is_u64() => Ok(n.as_u64().unwrap() as usize),
            Value::Number(n) if n.is_i64() && n.as_i64().unwrap() > 0 => {
                Ok(n.as_i64().unwrap() as usize)
            }
            _ => Ok(DEFAULT_CHUNK_SIZE),
        }
    }

    fn create_dfpwm_cache(&self) -> Result<Arc<DfpwmCache>> {
        let audio_dir = self.get_audio_cache_dir()?;
        let dfpwm_dir = self.get_dfpwm_cache_dir()?;
        let normalizer = Arc::new(FfmpegNormalizer::with_binary(self.get_ffmpeg_path()));
        let chunk_size = self.get_default_chunk_size()?;
        Ok(Arc::new(DfpwmCache::new(
            audio_dir,
            dfpwm_dir,
            normalizer,
            chunk_size,
        )?))
    }
}
