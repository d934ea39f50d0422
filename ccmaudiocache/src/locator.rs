//! Source audio locator.
//!
//! The download collaborator drops compressed audio files into the audio
//! cache directory as `{id}.{ext}`. The locator probes a fixed, ordered
//! set of container extensions and reports the first hit. Absence means
//! "still downloading", never an error.

use std::path::{Path, PathBuf};

/// Container extensions the downloader is known to produce, probed in
/// order of likelihood.
pub const SOURCE_EXTENSIONS: [&str; 4] = ["m4a", "mp3", "webm", "opus"];

/// Returns the path of the downloaded source file for `id`, or `None`
/// if no container has been published yet.
pub fn locate(audio_dir: &Path, id: &str) -> Option<PathBuf> {
    SOURCE_EXTENSIONS.iter().find_map(|ext| {
        let candidate = audio_dir.join(format!("{id}.{ext}"));
        candidate.is_file().then_some(candidate)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_source_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(locate(dir.path(), "dQw4w9WgXcQ"), None);
    }

    #[test]
    fn first_matching_extension_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("abc.webm"), b"x").unwrap();
        std::fs::write(dir.path().join("abc.m4a"), b"x").unwrap();

        let found = locate(dir.path(), "abc").unwrap();
        assert_eq!(found.extension().unwrap(), "m4a");
    }

    #[test]
    fn ignores_other_ids() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("other.mp3"), b"x").unwrap();
        assert_eq!(locate(dir.path(), "abc"), None);
    }
}
