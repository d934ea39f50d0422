//! yt-dlp backed [`MediaProvider`].
//!
//! Every operation is one yt-dlp subprocess invocation with
//! `--dump-json` output, parsed line by line. Audio downloads run as
//! background tokio tasks writing `{id}.{ext}` into the audio cache
//! directory; yt-dlp downloads through a `.part` file and renames on
//! completion, so the pipeline's source locator never sees a partial
//! download.

use crate::error::ProviderError;
use crate::models::{Playlist, PlaylistEntry, TrackInfo};
use crate::provider::{DownloadStatus, MediaProvider};
use crate::video_id::{extract_video_id, watch_url};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Metadata/download provider spawning the `yt-dlp` binary.
pub struct YtDlpProvider {
    binary: PathBuf,
    /// Where downloaded source audio lands (shared with the DFPWM
    /// pipeline's source locator).
    audio_dir: PathBuf,
    /// Per-track metadata JSON cache.
    metadata_dir: PathBuf,
    /// Ids with a download task in flight.
    downloads: Arc<Mutex<HashSet<String>>>,
}

impl YtDlpProvider {
    pub fn new(
        binary: impl Into<PathBuf>,
        audio_dir: impl Into<PathBuf>,
        metadata_dir: impl Into<PathBuf>,
    ) -> Result<Self, ProviderError> {
        let audio_dir = audio_dir.into();
        let metadata_dir = metadata_dir.into();
        std::fs::create_dir_all(&audio_dir)?;
        std::fs::create_dir_all(&metadata_dir)?;
        Ok(Self {
            binary: binary.into(),
            audio_dir,
            metadata_dir,
            downloads: Arc::new(Mutex::new(HashSet::new())),
        })
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    /// Runs yt-dlp with `--dump-json` style output and parses one JSON
    /// value per stdout line.
    async fn dump_json(&self, args: &[&str], target: &str) -> Result<Vec<Value>, ProviderError> {
        debug!(target, "Invoking yt-dlp");
        let output = Command::new(&self.binary)
            .args(args)
            .arg(target)
            .output()
            .await
            .map_err(|e| {
                ProviderError::Tool(format!("failed to spawn {}: {}", self.binary.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::Tool(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.lines().last().unwrap_or("")
            )));
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(ProviderError::from))
            .collect()
    }
}

#[async_trait]
impl MediaProvider for YtDlpProvider {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<TrackInfo>, ProviderError> {
        // Direct ids and URLs bypass the search entirely; the client
        // resolves the real title through /api/process.
        if let Some(id) = extract_video_id(query) {
            return Ok(vec![TrackInfo {
                id,
                title: query.to_string(),
                artist: "Unknown".to_string(),
                duration: "?".to_string(),
                duration_seconds: None,
                album: None,
            }]);
        }

        let target = format!("ytsearch{max_results}:{query}");
        let entries = self
            .dump_json(&["--dump-json", "--flat-playlist", "--skip-download"], &target)
            .await?;
        Ok(entries.iter().filter_map(track_from_entry).collect())
    }

    async fn track_info(&self, id: &str) -> Result<TrackInfo, ProviderError> {
        let id = extract_video_id(id).ok_or_else(|| ProviderError::InvalidId(id.to_string()))?;

        let cache_file = self.metadata_dir.join(format!("{id}.json"));
        if let Ok(bytes) = tokio::fs::read(&cache_file).await {
            if let Ok(track) = serde_json::from_slice::<TrackInfo>(&bytes) {
                debug!(id, "Metadata cache hit");
                return Ok(track);
            }
        }

        let entries = self
            .dump_json(&["--dump-json", "--skip-download", "--no-playlist"], &watch_url(&id))
            .await?;
        let track = entries
            .first()
            .and_then(track_from_entry)
            .ok_or_else(|| ProviderError::Tool(format!("no metadata returned for {id}")))?;

        match serde_json::to_vec(&track) {
            Ok(json) => {
                if let Err(err) = tokio::fs::write(&cache_file, json).await {
                    warn!(id, %err, "Failed to cache metadata");
                }
            }
            Err(err) => warn!(id, %err, "Failed to serialize metadata"),
        }

        Ok(track)
    }

    async fn playlist(&self, playlist_id: &str) -> Result<Playlist, ProviderError> {
        let url = if playlist_id.starts_with("http") {
            playlist_id.to_string()
        } else {
            format!("https://www.youtube.com/playlist?list={playlist_id}")
        };

        let entries = self
            .dump_json(&["--dump-json", "--flat-playlist", "--skip-download"], &url)
            .await?;
        if entries.is_empty() {
            return Err(ProviderError::PlaylistNotFound(playlist_id.to_string()));
        }

        Ok(playlist_from_entries(&entries))
    }

    async fn ensure_download(&self, id: &str) -> Result<DownloadStatus, ProviderError> {
        let id = extract_video_id(id).ok_or_else(|| ProviderError::InvalidId(id.to_string()))?;

        if ccmaudiocache::locator::locate(&self.audio_dir, &id).is_some() {
            return Ok(DownloadStatus::Cached);
        }

        {
            let mut downloads = self.downloads.lock().await;
            if !downloads.insert(id.clone()) {
                return Ok(DownloadStatus::InProgress);
            }
        }

        let binary = self.binary.clone();
        let template = self.audio_dir.join(format!("{id}.%(ext)s"));
        let downloads = self.downloads.clone();
        tokio::spawn(async move {
            info!(id, "Starting audio download");
            let result = Command::new(&binary)
                .args(["-f", "bestaudio/best", "--no-playlist", "-q"])
                .arg("-o")
                .arg(&template)
                .arg(watch_url(&id))
                .output()
                .await;

            match result {
                Ok(output) if output.status.success() => {
                    info!(id, "Audio download complete");
                }
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!(
                        id,
                        status = %output.status,
                        detail = stderr.lines().last().unwrap_or(""),
                        "Audio download failed"
                    );
                }
                Err(err) => warn!(id, %err, "Failed to spawn yt-dlp for download"),
            }

            downloads.lock().await.remove(&id);
        });

        Ok(DownloadStatus::Started)
    }
}

/// Maps one yt-dlp JSON entry (flat or full) to a [`TrackInfo`].
fn track_from_entry(entry: &Value) -> Option<TrackInfo> {
    let id = entry.get("id")?.as_str()?.to_string();
    Some(TrackInfo {
        id,
        title: str_field(entry, "title").unwrap_or_else(|| "Unknown".to_string()),
        artist: str_field(entry, "artist")
            .or_else(|| str_field(entry, "uploader"))
            .unwrap_or_else(|| "Unknown Artist".to_string()),
        duration: str_field(entry, "duration_string").unwrap_or_else(|| "?".to_string()),
        duration_seconds: entry
            .get("duration")
            .and_then(Value::as_f64)
            .map(|s| s.round() as u64),
        album: str_field(entry, "album"),
    })
}

/// Builds a playlist from flat-playlist entries; the playlist title is
/// repeated on every entry by yt-dlp.
fn playlist_from_entries(entries: &[Value]) -> Playlist {
    let title = entries
        .iter()
        .find_map(|e| str_field(e, "playlist_title"))
        .unwrap_or_else(|| "Playlist".to_string());

    let tracks = entries
        .iter()
        .filter_map(|e| {
            Some(PlaylistEntry {
                id: e.get("id")?.as_str()?.to_string(),
                title: str_field(e, "title").unwrap_or_else(|| "Unknown".to_string()),
            })
        })
        .collect();

    Playlist { title, tracks }
}

fn str_field(entry: &Value, field: &str) -> Option<String> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_entry_maps_all_fields() {
        let entry = json!({
            "id": "dQw4w9WgXcQ",
            "title": "Never Gonna Give You Up",
            "uploader": "Rick Astley",
            "duration_string": "3:33",
            "duration": 212.8,
        });
        let track = track_from_entry(&entry).unwrap();
        assert_eq!(track.id, "dQw4w9WgXcQ");
        assert_eq!(track.title, "Never Gonna Give You Up");
        assert_eq!(track.artist, "Rick Astley");
        assert_eq!(track.duration, "3:33");
        // yt-dlp reports fractional seconds; they round to whole ones.
        assert_eq!(track.duration_seconds, Some(213));
        assert_eq!(track.album, None);
    }

    #[test]
    fn artist_field_beats_uploader() {
        let entry = json!({
            "id": "dQw4w9WgXcQ",
            "title": "Song",
            "artist": "The Artist",
            "uploader": "SomeChannel",
            "album": "The Album",
        });
        let track = track_from_entry(&entry).unwrap();
        assert_eq!(track.artist, "The Artist");
        assert_eq!(track.album.as_deref(), Some("The Album"));
    }

    #[test]
    fn missing_fields_use_placeholders() {
        let entry = json!({"id": "abcdefghijk"});
        let track = track_from_entry(&entry).unwrap();
        assert_eq!(track.title, "Unknown");
        assert_eq!(track.artist, "Unknown Artist");
        assert_eq!(track.duration, "?");
        assert_eq!(track.duration_seconds, None);
    }

    #[test]
    fn entry_without_id_is_skipped() {
        assert!(track_from_entry(&json!({"title": "no id"})).is_none());
    }

    #[test]
    fn playlist_title_comes_from_entries() {
        let entries = vec![
            json!({"id": "aaaaaaaaaaa", "title": "One", "playlist_title": "Mix"}),
            json!({"id": "bbbbbbbbbbb", "title": "Two", "playlist_title": "Mix"}),
            json!({"title": "dropped, no id"}),
        ];
        let playlist = playlist_from_entries(&entries);
        assert_eq!(playlist.title, "Mix");
        assert_eq!(playlist.tracks.len(), 2);
        assert_eq!(playlist.tracks[1].id, "bbbbbbbbbbb");
    }

    #[test]
    fn playlist_title_falls_back() {
        let entries = vec![json!({"id": "aaaaaaaaaaa", "title": "One"})];
        assert_eq!(playlist_from_entries(&entries).title, "Playlist");
    }
}
