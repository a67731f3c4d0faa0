//! # Sample Transcoder
//!
//! Converts PCM samples between the engine's native signed 16-bit width and
//! the canonical normalized `f32` representation.
//!
//! Normalization follows symphonia's sample conversion traits: `i16` values
//! are divided by 32768 on the way to float, and floats are scaled by 32768
//! and saturated on the way back. A round trip through both directions is
//! exact to within one 16-bit quantization step.

use symphonia::core::conv::IntoSample;
use symphonia::core::sample::Sample;
use tracing::warn;

/// Width of one engine-native sample in bytes.
pub const NATIVE_SAMPLE_BYTES: usize = std::mem::size_of::<i16>();

/// Width of one canonical sample in bytes.
pub const CANONICAL_SAMPLE_BYTES: usize = std::mem::size_of::<f32>();

/// Stateless sample format converter.
///
/// Every conversion allocates a fresh output buffer with the same element
/// count as its input. Allocation failure aborts through the global
/// allocator's error handler.
pub struct SampleTranscoder;

impl SampleTranscoder {
    /// Convert every sample of `input` from `S` to `D`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let float: Vec<f32> = SampleTranscoder::transcode(&[0i16, 16384, -32768]);
    /// assert_eq!(float, vec![0.0, 0.5, -1.0]);
    /// ```
    pub fn transcode<S, D>(input: &[S]) -> Vec<D>
    where
        S: Sample + IntoSample<D>,
        D: Sample,
    {
        let mut output = Vec::with_capacity(input.len());
        output.extend(input.iter().map(|&sample| sample.into_sample()));
        output
    }

    /// Native engine samples to canonical floats.
    pub fn i16_to_f32(input: &[i16]) -> Vec<f32> {
        Self::transcode(input)
    }

    /// Canonical floats to native engine samples, saturating out-of-range values.
    pub fn f32_to_i16(input: &[f32]) -> Vec<i16> {
        Self::transcode(input)
    }

    /// Reinterpret a little-endian engine byte buffer as samples.
    ///
    /// A trailing odd byte is ignored.
    pub fn i16_from_le_bytes(bytes: &[u8]) -> Vec<i16> {
        bytes
            .chunks_exact(NATIVE_SAMPLE_BYTES)
            .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]))
            .collect()
    }

    /// Serialize samples into the engine's little-endian byte layout.
    pub fn i16_to_le_bytes(samples: &[i16]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(samples.len() * NATIVE_SAMPLE_BYTES);
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        bytes
    }

    /// Count samples outside `[-1.0, 1.0]`.
    ///
    /// Emits a warning when any are found; they will saturate when narrowed
    /// to 16 bits.
    pub fn count_clipped(samples: &[f32]) -> usize {
        let clipped = samples
            .iter()
            .filter(|&&s| s < -1.0 || s > 1.0)
            .count();

        if clipped > 0 {
            warn!(
                "Detected {} clipped samples ({:.2}% of total)",
                clipped,
                (clipped as f64 / samples.len() as f64) * 100.0
            );
        }

        clipped
    }
}
