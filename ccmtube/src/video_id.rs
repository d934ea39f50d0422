//! YouTube video identifier extraction.
//!
//! The Lua client sends whatever the player typed: a raw 11-character
//! video id, a `watch?v=` URL, a `youtu.be` short link or an embed URL.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RAW_ID: Regex = Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap();
    static ref URL_PATTERNS: [Regex; 2] = [
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([A-Za-z0-9_-]{11})").unwrap(),
        Regex::new(r"youtube\.com/embed/([A-Za-z0-9_-]{11})").unwrap(),
    ];
}

/// Extracts the 11-character video id from a raw id or a YouTube URL.
pub fn extract_video_id(input: &str) -> Option<String> {
    if RAW_ID.is_match(input) {
        return Some(input.to_string());
    }
    URL_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(input).map(|c| c[1].to_string()))
}

/// Canonical watch URL for a video id.
pub fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={id}")
}
