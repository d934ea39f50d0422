//! Stateful DFPWM1a encoder.
//!
//! Bit order is LSB-first: the first encoded sample lands in bit 0 of the
//! output byte. This matches the decoder running on the in-game speaker
//! and must not change independently of it.

/// Maximum value of the adaptive step size.
const STRENGTH_MAX: i32 = 127;

/// Encoder state carried across one encode pass.
///
/// `charge` approximates the reconstructed signal level in the 8-bit
/// signed range, `strength` is the adaptive step-size estimate bounded to
/// `0..=127`. State is never shared between passes: encoding the same
/// samples with a fresh encoder always produces byte-identical output.
#[derive(Debug)]
pub struct Encoder {
    charge: i32,
    strength: i32,
    bit_buffer: u8,
    bit_count: u8,
    /// Dangling byte of a split 16-bit sample, carried between
    /// `encode_s16le` calls.
    pending: Option<u8>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            charge: 0,
            strength: 0,
            bit_buffer: 0,
            bit_count: 0,
            pending: None,
        }
    }

    /// Encodes one 16-bit signed sample, returning a completed output
    /// byte once eight samples have been accumulated.
    ///
    /// The sample is rescaled to the 8-bit signed range with an
    /// arithmetic right shift. The rescale is lossy by construction; the
    /// in-game speaker only resolves 8-bit levels.
    pub fn encode_sample(&mut self, sample: i16) -> Option<u8> {
        let target = i32::from(sample >> 8);
        let diff = target - self.charge;

        let bit = diff > 0;
        if bit {
            self.charge += diff.min(self.strength + 1);
        } else {
            self.charge += diff.max(-(self.strength + 1));
        }

        // Simplified DFPWM1a adaptation: grow while chasing the target,
        // decay once locked on.
        if diff != 0 {
            self.strength = (self.strength + 1).min(STRENGTH_MAX);
        } else {
            self.strength = (self.strength - 1).max(0);
        }

        if bit {
            self.bit_buffer |= 1 << self.bit_count;
        }
        self.bit_count += 1;

        if self.bit_count == 8 {
            let byte = self.bit_buffer;
            self.bit_buffer = 0;
            self.bit_count = 0;
            Some(byte)
        } else {
            None
        }
    }

    /// Encodes a slice of samples, appending completed bytes to `out`.
    pub fn encode(&mut self, samples: &[i16], out: &mut Vec<u8>) {
        out.reserve(samples.len() / 8 + 1);
        for &sample in samples {
            if let Some(byte) = self.encode_sample(sample) {
                out.push(byte);
            }
        }
    }

    /// Encodes raw signed 16-bit little-endian PCM bytes.
    ///
    /// A sample split across two calls is buffered and completed on the
    /// next call, so callers may feed arbitrarily sized reads.
    pub fn encode_s16le(&mut self, mut bytes: &[u8], out: &mut Vec<u8>) {
        if let Some(lo) = self.pending.take() {
            if let Some((&hi, rest)) = bytes.split_first() {
                let sample = i16::from_le_bytes([lo, hi]);
                if let Some(byte) = self.encode_sample(sample) {
                    out.push(byte);
                }
                bytes = rest;
            } else {
                self.pending = Some(lo);
                return;
            }
        }

        let mut chunks = bytes.chunks_exact(2);
        for pair in &mut chunks {
            let sample = i16::from_le_bytes([pair[0], pair[1]]);
            if let Some(byte) = self.encode_sample(sample) {
                out.push(byte);
            }
        }
        if let [lo] = chunks.remainder() {
            self.pending = Some(*lo);
        }
    }

    /// Flushes the final, possibly partial output byte.
    ///
    /// Remaining bit positions are padded with zeros; a dangling half
    /// sample left over from `encode_s16le` is discarded (truncated
    /// input is not an error). The encoder is reset afterwards.
    pub fn finish(&mut self, out: &mut Vec<u8>) {
        if self.bit_count > 0 {
            out.push(self.bit_buffer);
        }
        *self = Self::new();
    }
}

/// One-shot helper: encodes a whole s16le PCM buffer to DFPWM.
pub fn encode_s16le(pcm: &[u8]) -> Vec<u8> {
    let mut encoder = Encoder::new();
    let mut out = Vec::with_capacity(encoded_len(pcm.len() / 2));
    encoder.encode_s16le(pcm, &mut out);
    encoder.finish(&mut out);
    out
}

/// Encoded size in bytes for a given number of input samples.
pub const fn encoded_len(sample_count: usize) -> usize {
    sample_count.div_ceil(8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcm_from_samples(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    #[test]
    fn silence_encodes_to_zero_bytes() {
        // diff == 0 throughout: charge and strength stay pinned at zero
        // and every emitted bit is 0.
        let out = encode_s16le(&pcm_from_samples(&[0i16; 64]));
        assert_eq!(out, vec![0u8; 8]);
    }

    #[test]
    fn golden_small_step() {
        // target = 1 for every sample. First sample: diff = 1, bit 1,
        // charge steps to 1. From then on diff = 0, bit 0. LSB-first
        // packing puts the single 1 bit in bit 0 of the first byte.
        let out = encode_s16le(&pcm_from_samples(&[256i16; 16]));
        assert_eq!(out, vec![0x01, 0x00]);
    }

    #[test]
    fn golden_full_scale() {
        // Full-scale positive input: the charge never catches the
        // target within 8 samples, so every bit is 1.
        let out = encode_s16le(&pcm_from_samples(&[i16::MAX; 8]));
        assert_eq!(out, vec![0xFF]);
    }

    #[test]
    fn negative_rescale_preserves_sign() {
        let mut encoder = Encoder::new();
        // -1 >> 8 == -1 arithmetically: diff < 0, bit 0.
        assert_eq!(encoder.encode_sample(-1), None);
        let mut out = Vec::new();
        encoder.finish(&mut out);
        assert_eq!(out, vec![0x00]);
    }

    #[test]
    fn length_law() {
        for n in [0usize, 1, 7, 8, 9, 4800, 48_000] {
            let samples = vec![123i16; n];
            let out = encode_s16le(&pcm_from_samples(&samples));
            assert_eq!(out.len(), encoded_len(n), "sample count {}", n);
        }
    }

    #[test]
    fn deterministic() {
        let samples: Vec<i16> = (0..4096).map(|i| ((i * 37) % 65536) as u16 as i16).collect();
        let pcm = pcm_from_samples(&samples);
        assert_eq!(encode_s16le(&pcm), encode_s16le(&pcm));
    }

    #[test]
    fn trailing_odd_byte_is_discarded() {
        let mut pcm = pcm_from_samples(&[256i16; 16]);
        let reference = encode_s16le(&pcm);
        pcm.push(0xAB);
        assert_eq!(encode_s16le(&pcm), reference);
    }

    #[test]
    fn split_feed_matches_one_shot() {
        let samples: Vec<i16> = (0..999).map(|i| (i * 131 - 8000) as i16).collect();
        let pcm = pcm_from_samples(&samples);
        let reference = encode_s16le(&pcm);

        // Feed in awkward chunk sizes, including splits inside a sample.
        let mut encoder = Encoder::new();
        let mut out = Vec::new();
        for chunk in pcm.chunks(17) {
            encoder.encode_s16le(chunk, &mut out);
        }
        encoder.finish(&mut out);
        assert_eq!(out, reference);
    }

    #[test]
    fn finish_resets_state() {
        let mut encoder = Encoder::new();
        let mut out = Vec::new();
        encoder.encode(&[i16::MAX; 12], &mut out);
        encoder.finish(&mut out);

        let mut second = Vec::new();
        encoder.encode(&[i16::MAX; 8], &mut second);
        assert_eq!(second, vec![0xFF]);
    }
}
