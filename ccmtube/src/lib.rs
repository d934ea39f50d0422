//! # ccmtube
//!
//! YouTube metadata and download provider for the CCMusic backend,
//! backed by the `yt-dlp` command-line tool.
//!
//! The crate exposes the [`MediaProvider`] trait (search, track
//! metadata, playlist listing, audio download) and its yt-dlp
//! implementation [`YtDlpProvider`]. Downloads run as tracked background
//! tasks that drop finished files into the audio cache directory, where
//! the DFPWM pipeline's source locator picks them up; the pipeline only
//! ever observes "downloaded" or "not yet".
//!
//! With the `ccmserver` feature, the crate also provides the thin HTTP
//! orchestration layer consumed by the in-game Lua client:
//! `POST /api/search`, `POST /api/process` and `POST /api/playlist`.

pub mod error;
pub mod models;
pub mod provider;
pub mod video_id;
pub mod ytdlp;

#[cfg(feature = "ccmconfig")]
pub mod config_ext;

#[cfg(feature = "ccmserver")]
pub mod api;
#[cfg(feature = "ccmserver")]
pub mod ccmserver_ext;
#[cfg(feature = "ccmserver")]
pub mod openapi;

pub use error::ProviderError;
pub use models::{Playlist, PlaylistEntry, TrackInfo};
pub use provider::{DownloadStatus, MediaProvider};
pub use video_id::extract_video_id;
pub use ytdlp::YtDlpProvider;

#[cfg(feature = "ccmconfig")]
pub use config_ext::TubeConfigExt;
#[cfg(feature = "ccmserver")]
pub use ccmserver_ext::TubeExt;
