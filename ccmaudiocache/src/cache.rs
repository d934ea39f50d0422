//! Encoded-stream cache.
//!
//! Persists DFPWM byte streams keyed by `(media id, channel)` so repeat
//! requests skip re-encoding. Entries are created lazily on first
//! request, written to a temporary path, and published with an atomic
//! rename; once published they are immutable and may be read by any
//! number of concurrent chunk requests. This crate never evicts.

use crate::channel::Channel;
use crate::error::AudioCacheError;
use crate::locator;
use crate::normalize::PcmNormalizer;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Result of a cache lookup.
#[derive(Debug)]
pub enum CacheStatus {
    /// The encoded stream is fully published at this path.
    Ready(PathBuf),
    /// The source audio has not been downloaded yet; poll again later.
    NotReady,
}

/// DFPWM stream cache over a directory tree.
///
/// Designed to be shared behind an `Arc`; the per-key claim map is the
/// only internal synchronization, the published files themselves are
/// immutable.
pub struct DfpwmCache {
    /// Directory where the download collaborator drops source audio.
    audio_dir: PathBuf,
    /// Directory owned by this cache for `.dfpwm` artifacts.
    dfpwm_dir: PathBuf,
    /// Decode/resample tool behind its trait seam.
    normalizer: Arc<dyn PcmNormalizer>,
    /// Default chunk size served when the client does not ask for one.
    default_chunk_size: usize,
    /// In-flight encodes (cache file name -> claim), so concurrent
    /// requests for one key run the pipeline exactly once.
    claims: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DfpwmCache {
    pub fn new(
        audio_dir: impl Into<PathBuf>,
        dfpwm_dir: impl Into<PathBuf>,
        normalizer: Arc<dyn PcmNormalizer>,
        default_chunk_size: usize,
    ) -> Result<Self, AudioCacheError> {
        let audio_dir = audio_dir.into();
        let dfpwm_dir = dfpwm_dir.into();
        std::fs::create_dir_all(&audio_dir)?;
        std::fs::create_dir_all(&dfpwm_dir)?;
        Ok(Self {
            audio_dir,
            dfpwm_dir,
            normalizer,
            default_chunk_size,
            claims: Mutex::new(HashMap::new()),
        })
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    pub fn dfpwm_dir(&self) -> &Path {
        &self.dfpwm_dir
    }

    pub fn default_chunk_size(&self) -> usize {
        self.default_chunk_size
    }

    /// Path of the published artifact for a key.
    pub fn dfpwm_path(&self, id: &str, channel: Channel) -> PathBuf {
        self.dfpwm_dir.join(channel.dfpwm_file_name(id))
    }

    /// Returns the encoded stream for `(id, channel)`, producing it on a
    /// cache miss.
    ///
    /// * `Ready(path)` - stream fully published
    /// * `NotReady` - source audio not downloaded yet; no entry created
    /// * `Err(Decode | Io)` - pipeline failed; no entry is left behind,
    ///   so a later request retries from scratch
    pub async fn get_or_create(
        &self,
        id: &str,
        channel: Channel,
    ) -> Result<CacheStatus, AudioCacheError> {
        validate_media_id(id)?;

        let target = self.dfpwm_path(id, channel);
        if tokio::fs::try_exists(&target).await? {
            debug!(id, %channel, "DFPWM cache hit");
            return Ok(CacheStatus::Ready(target));
        }

        let claim = self.claim(&target).await;
        let _guard = claim.lock().await;

        // A racing request may have published while we waited.
        if tokio::fs::try_exists(&target).await? {
            debug!(id, %channel, "DFPWM published by concurrent request");
            return Ok(CacheStatus::Ready(target));
        }

        let result = self.run_pipeline(id, channel, &target).await;
        if matches!(result, Ok(CacheStatus::Ready(_))) {
            // Only drop the claim once the artifact is visible: from now
            // on every request short-circuits on the existence check, so
            // nobody can race a fresh mutex against a holder of this one.
            self.release_claim(&target).await;
        }
        result
    }

    /// Decode -> encode -> atomic publish for one key. Runs under the
    /// key's claim.
    async fn run_pipeline(
        &self,
        id: &str,
        channel: Channel,
        target: &Path,
    ) -> Result<CacheStatus, AudioCacheError> {
        let Some(source) = locator::locate(&self.audio_dir, id) else {
            debug!(id, "Source audio not downloaded yet");
            return Ok(CacheStatus::NotReady);
        };

        // Hidden temp names keep half-written artifacts invisible to the
        // locator and to concurrent readers.
        let file_name = channel.dfpwm_file_name(id);
        let pcm_tmp = self.dfpwm_dir.join(format!(".{file_name}.pcm"));
        let dfpwm_tmp = self.dfpwm_dir.join(format!(".{file_name}.tmp"));

        let outcome = self
            .encode_to_temp(&source, channel, &pcm_tmp, &dfpwm_tmp)
            .await;

        let _ = tokio::fs::remove_file(&pcm_tmp).await;
        if let Err(err) = outcome {
            let _ = tokio::fs::remove_file(&dfpwm_tmp).await;
            warn!(id, %channel, %err, "DFPWM pipeline failed");
            return Err(err);
        }

        // Publish: readers either see nothing or the complete stream.
        if let Err(err) = tokio::fs::rename(&dfpwm_tmp, target).await {
            let _ = tokio::fs::remove_file(&dfpwm_tmp).await;
            warn!(id, %channel, %err, "Failed to publish DFPWM stream");
            return Err(err.into());
        }
        info!(id, %channel, path = %target.display(), "DFPWM stream published");
        Ok(CacheStatus::Ready(target.to_path_buf()))
    }

    async fn encode_to_temp(
        &self,
        source: &Path,
        channel: Channel,
        pcm_tmp: &Path,
        dfpwm_tmp: &Path,
    ) -> Result<(), AudioCacheError> {
        self.normalizer.normalize(source, channel, pcm_tmp).await?;

        let mut pcm = tokio::fs::File::open(pcm_tmp).await?;
        let mut out = tokio::fs::File::create(dfpwm_tmp).await?;

        let mut encoder = ccmdfpwm::Encoder::new();
        let mut read_buf = vec![0u8; 64 * 1024];
        let mut encoded = Vec::with_capacity(read_buf.len() / 16 + 1);

        loop {
            let n = pcm.read(&mut read_buf).await?;
            if n == 0 {
                break;
            }
            encoded.clear();
            encoder.encode_s16le(&read_buf[..n], &mut encoded);
            out.write_all(&encoded).await?;
        }

        encoded.clear();
        encoder.finish(&mut encoded);
        out.write_all(&encoded).await?;
        out.flush().await?;

        Ok(())
    }

    async fn claim(&self, target: &Path) -> Arc<Mutex<()>> {
        let key = target.to_string_lossy().to_string();
        let mut claims = self.claims.lock().await;
        claims.entry(key).or_default().clone()
    }

    async fn release_claim(&self, target: &Path) {
        let key = target.to_string_lossy().to_string();
        self.claims.lock().await.remove(&key);
    }
}

/// Rejects identifiers that could escape the cache directory.
///
/// YouTube identifiers are URL-safe base64; anything else never reaches
/// the filesystem.
pub fn validate_media_id(id: &str) -> Result<(), AudioCacheError> {
    if id.is_empty()
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AudioCacheError::InvalidId(id.to_string()));
    }
    Ok(())
}
