//! # ccmdfpwm
//!
//! DFPWM1a encoder for the CC:Tweaked speaker peripheral.
//!
//! DFPWM (Dynamic Filter Pulse Width Modulation) is a 1-bit-per-sample
//! adaptive delta codec: every encoded bit says "step up" or "step down",
//! and an adaptive step size (the *strength*) tracks the local slope of
//! the signal. Eight bits are packed into one output byte, so one second
//! of 48 kHz audio encodes to exactly 6000 bytes.
//!
//! The encoder is a pure, synchronous, single-pass transform. It cannot
//! fail on well-formed PCM input; a truncated trailing sample is dropped
//! at end of stream rather than reported as an error.
//!
//! ## Example
//!
//! ```
//! use ccmdfpwm::Encoder;
//!
//! let samples: Vec<i16> = vec![0; 48_000];
//! let mut encoder = Encoder::new();
//! let mut out = Vec::new();
//! encoder.encode(&samples, &mut out);
//! encoder.finish(&mut out);
//! assert_eq!(out.len(), 6000);
//! ```

mod encoder;

pub use encoder::{encode_s16le, encoded_len, Encoder};
