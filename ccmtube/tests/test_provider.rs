//! End-to-end provider tests against a fake yt-dlp binary.

#![cfg(unix)]

use ccmtube::provider::{DownloadStatus, MediaProvider};
use ccmtube::YtDlpProvider;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

/// Installs a shell script standing in for yt-dlp.
///
/// The script appends one line to a counter file per invocation, then
/// answers search/playlist/metadata queries with canned JSON, or (for
/// download invocations, recognized by `-o`) sleeps briefly and creates
/// the output file.
fn install_fake_ytdlp(dir: &Path) -> std::path::PathBuf {
    let counter = dir.join("calls.log");
    let script = dir.join("yt-dlp");
    let body = format!(
        r#"#!/bin/sh
echo run >> "{counter}"
out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-o" ]; then out="$a"; fi
  prev="$a"
done
if [ -n "$out" ]; then
  sleep 1
  target=$(printf '%s' "$out" | sed 's/\.%(ext)s$/.m4a/')
  echo audio > "$target"
  exit 0
fi
case "$a" in
  ytsearch*)
    printf '%s\n' '{{"id":"aaaaaaaaaaa","title":"First","uploader":"Artist A","duration_string":"1:00"}}'
    printf '%s\n' '{{"id":"bbbbbbbbbbb","title":"Second","uploader":"Artist B","duration_string":"2:00"}}'
    ;;
  *playlist?list=*)
    printf '%s\n' '{{"id":"aaaaaaaaaaa","title":"First","playlist_title":"Mix"}}'
    printf '%s\n' '{{"id":"bbbbbbbbbbb","title":"Second","playlist_title":"Mix"}}'
    ;;
  *)
    printf '%s\n' '{{"id":"dQw4w9WgXcQ","title":"Full Song","artist":"Rick","duration_string":"3:33","duration":213,"album":"Whenever"}}'
    ;;
esac
"#,
        counter = counter.display()
    );
    std::fs::write(&script, body).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

fn call_count(dir: &Path) -> usize {
    std::fs::read_to_string(dir.join("calls.log"))
        .map(|s| s.lines().count())
        .unwrap_or(0)
}

fn create_provider(dir: &TempDir) -> YtDlpProvider {
    let script = install_fake_ytdlp(dir.path());
    YtDlpProvider::new(
        script,
        dir.path().join("audio"),
        dir.path().join("metadata"),
    )
    .unwrap()
}

#[tokio::test]
async fn search_maps_results() {
    let dir = tempfile::tempdir().unwrap();
    let provider = create_provider(&dir);

    let results = provider.search("some song", 5).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, "aaaaaaaaaaa");
    assert_eq!(results[0].artist, "Artist A");
    assert_eq!(results[1].duration, "2:00");
}

#[tokio::test]
async fn direct_id_skips_the_search() {
    let dir = tempfile::tempdir().unwrap();
    let provider = create_provider(&dir);

    let results = provider
        .search("https://youtu.be/dQw4w9WgXcQ", 5)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "dQw4w9WgXcQ");
    // No subprocess was needed.
    assert_eq!(call_count(dir.path()), 0);
}

#[tokio::test]
async fn track_info_is_cached() {
    let dir = tempfile::tempdir().unwrap();
    let provider = create_provider(&dir);

    let first = provider.track_info("dQw4w9WgXcQ").await.unwrap();
    assert_eq!(first.title, "Full Song");
    assert_eq!(first.duration_seconds, Some(213));
    assert_eq!(first.album.as_deref(), Some("Whenever"));
    assert_eq!(call_count(dir.path()), 1);

    // Second lookup is served from the metadata cache.
    let second = provider.track_info("dQw4w9WgXcQ").await.unwrap();
    assert_eq!(second, first);
    assert_eq!(call_count(dir.path()), 1);
}

#[tokio::test]
async fn playlist_lists_tracks() {
    let dir = tempfile::tempdir().unwrap();
    let provider = create_provider(&dir);

    let playlist = provider.playlist("PLxyz").await.unwrap();
    assert_eq!(playlist.title, "Mix");
    assert_eq!(playlist.tracks.len(), 2);
    assert_eq!(playlist.tracks[0].title, "First");
}

#[tokio::test]
async fn downloads_are_tracked_and_deduplicated() {
    let dir = tempfile::tempdir().unwrap();
    let provider = create_provider(&dir);

    let first = provider.ensure_download("dQw4w9WgXcQ").await.unwrap();
    assert_eq!(first, DownloadStatus::Started);

    // The fake download sleeps, so a racing request sees it in flight.
    let racing = provider.ensure_download("dQw4w9WgXcQ").await.unwrap();
    assert_eq!(racing, DownloadStatus::InProgress);

    let audio_file = dir.path().join("audio").join("dQw4w9WgXcQ.m4a");
    for _ in 0..50 {
        if audio_file.exists() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(audio_file.exists(), "download never completed");

    // Give the task a moment to clear its claim, then the file wins.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let cached = provider.ensure_download("dQw4w9WgXcQ").await.unwrap();
    assert_eq!(cached, DownloadStatus::Cached);
}

#[tokio::test]
async fn invalid_id_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let provider = create_provider(&dir);

    assert!(provider.ensure_download("not a video").await.is_err());
    assert!(provider.track_info("../escape").await.is_err());
}
