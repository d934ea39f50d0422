//! PCM normalization through an external decode tool.
//!
//! Whatever container/codec/sample-rate the downloader produced, the
//! normalizer emits raw signed 16-bit little-endian mono PCM at a fixed
//! 48 kHz, with the channel mixdown applied. The encoder downstream
//! never sees anything else.

use crate::channel::Channel;
use crate::error::AudioCacheError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fixed output sample rate of the normalizer, matching the speaker
/// peripheral's playback rate.
pub const SAMPLE_RATE: u32 = 48_000;

/// Decode/resample seam of the pipeline.
///
/// A trait rather than a free function so the cache can be exercised in
/// tests with a stub that counts invocations instead of spawning ffmpeg.
#[async_trait]
pub trait PcmNormalizer: Send + Sync {
    /// Decodes `source` into raw s16le mono PCM at [`SAMPLE_RATE`],
    /// applying the `channel` mixdown, and writes the result to `dest`.
    ///
    /// Fails with [`AudioCacheError::Decode`] if the tool exits
    /// non-zero or produces no output.
    async fn normalize(
        &self,
        source: &Path,
        channel: Channel,
        dest: &Path,
    ) -> Result<(), AudioCacheError>;
}

/// ffmpeg-based normalizer.
pub struct FfmpegNormalizer {
    binary: PathBuf,
}

impl FfmpegNormalizer {
    /// Uses `ffmpeg` from `PATH`.
    pub fn new() -> Self {
        Self::with_binary("ffmpeg")
    }

    /// Uses an explicit ffmpeg binary path.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfmpegNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PcmNormalizer for FfmpegNormalizer {
    async fn normalize(
        &self,
        source: &Path,
        channel: Channel,
        dest: &Path,
    ) -> Result<(), AudioCacheError> {
        debug!(source = %source.display(), %channel, "Normalizing to PCM");

        let output = tokio::process::Command::new(&self.binary)
            .arg("-i")
            .arg(source)
            .args(["-f", "s16le"])
            .args(["-ar", "48000"])
            .args(["-af", channel.pan_filter()])
            .arg("-y")
            .arg(dest)
            .output()
            .await
            .map_err(|e| {
                AudioCacheError::Decode(format!("failed to spawn {}: {}", self.binary.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: String = stderr
                .lines()
                .rev()
                .take(3)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join(" | ");
            return Err(AudioCacheError::Decode(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                tail
            )));
        }

        let produced = tokio::fs::metadata(dest)
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        if produced == 0 {
            return Err(AudioCacheError::Decode(format!(
                "{} produced no output for {}",
                self.binary.display(),
                source.display()
            )));
        }

        Ok(())
    }
}
