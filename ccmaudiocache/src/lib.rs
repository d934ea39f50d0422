//! # ccmaudiocache
//!
//! The DFPWM audio delivery pipeline of the CCMusic backend.
//!
//! Given a media identifier whose compressed audio has been downloaded
//! into the audio cache directory, this crate:
//!
//! 1. locates the source file ([`locator`]),
//! 2. normalizes it to 48 kHz mono s16le PCM through an external decode
//!    tool, applying the requested channel mixdown ([`normalize`]),
//! 3. encodes the PCM to a DFPWM1a byte stream ([`ccmdfpwm`]),
//! 4. publishes the result atomically into the DFPWM cache ([`cache`]),
//! 5. serves seekable byte-range chunks of the encoded stream
//!    ([`chunk`], and the HTTP API in [`api`]).
//!
//! A missing source file is not an error: the background download may
//! still be running, and the chunk API reports an empty-but-final chunk
//! so the game client polls again later.
//!
//! ## Concurrency
//!
//! Encodes for the same `(id, channel)` key are claimed through a
//! per-key async mutex, so racing requests run the decode tool exactly
//! once. Cache entries are written to a temporary path and published by
//! atomic rename; readers only ever open fully-published files.

pub mod cache;
pub mod channel;
pub mod chunk;
pub mod error;
pub mod locator;
pub mod normalize;

#[cfg(feature = "ccmconfig")]
pub mod config_ext;

#[cfg(feature = "ccmserver")]
pub mod api;
#[cfg(feature = "ccmserver")]
pub mod ccmserver_ext;
#[cfg(feature = "ccmserver")]
pub mod openapi;

pub use cache::{CacheStatus, DfpwmCache};
pub use channel::Channel;
pub use chunk::{get_chunk, AudioChunk};
pub use error::AudioCacheError;
pub use normalize::{FfmpegNormalizer, PcmNormalizer, SAMPLE_RATE};

#[cfg(feature = "ccmconfig")]
pub use config_ext::AudioCacheConfigExt;
#[cfg(feature = "ccmserver")]
pub use ccmserver_ext::AudioCacheExt;
