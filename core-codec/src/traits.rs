//! # Runtime Codec Traits
//!
//! Shared audio data types and the [`RuntimeCodec`] contract implemented by
//! every codec adapter in the import pipeline.
//!
//! ## Architecture
//!
//! An external dispatcher holds a set of adapters, asks each one whether it
//! recognizes a buffer (`check_format`) and then routes `decode`, `encode` or
//! `get_header_info` to the one that does. All adapters agree on a single
//! canonical decoded representation, [`DecodedAudio`]: interleaved `f32`
//! samples normalized to `[-1.0, 1.0]`.
//!
//! ## Threading Model
//!
//! All operations are synchronous and blocking. Adapters are `Send + Sync` on
//! native targets and may be shared across worker threads; callers that need
//! to stay responsive off-load calls themselves (for example with
//! `tokio::task::spawn_blocking`).
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use core_codec::{DecodedAudio, QualityIndex, RuntimeCodec};
//!
//! fn reencode(codec: &dyn RuntimeCodec, pcm: &DecodedAudio) -> core_codec::Result<()> {
//!     let encoded = codec.encode(pcm, QualityIndex::new(30))?;
//!     assert!(codec.check_format(&encoded));
//!
//!     let header = codec.get_header_info(&encoded)?;
//!     println!("{}", header);
//!
//!     let decoded = codec.decode(&encoded)?;
//!     println!("{}", decoded);
//!     Ok(())
//! }
//! ```

use crate::error::Result;
use bridge_traits::PlatformSendSync;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ============================================================================
// Audio Format Types
// ============================================================================

/// Format tags understood by the import pipeline.
///
/// Each adapter reports exactly one of these through
/// [`RuntimeCodec::audio_format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// MPEG-1 Audio Layer 3
    Mp3,
    /// Waveform Audio File Format
    Wav,
    /// Free Lossless Audio Codec
    Flac,
    /// Vorbis in an Ogg container
    OggVorbis,
    /// Opus in an Ogg container
    OggOpus,
    /// Bink audio
    Bink,
    /// Headerless PCM
    Raw,
    /// Format not recognized
    Unknown,
}

impl AudioFormat {
    /// Conventional file extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Flac => "flac",
            AudioFormat::OggVorbis => "ogg",
            AudioFormat::OggOpus => "opus",
            AudioFormat::Bink => "binka",
            AudioFormat::Raw => "pcm",
            AudioFormat::Unknown => "",
        }
    }

    /// MIME type reported to hosts.
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Flac => "audio/flac",
            AudioFormat::OggVorbis => "audio/ogg",
            AudioFormat::OggOpus => "audio/opus",
            AudioFormat::Bink => "audio/x-bink",
            AudioFormat::Raw | AudioFormat::Unknown => "application/octet-stream",
        }
    }

    /// Returns `true` if the format stores samples without loss.
    pub fn is_lossless(&self) -> bool {
        matches!(self, AudioFormat::Wav | AudioFormat::Flac | AudioFormat::Raw)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AudioFormat::Mp3 => "MP3",
            AudioFormat::Wav => "WAV",
            AudioFormat::Flac => "FLAC",
            AudioFormat::OggVorbis => "OGG VORBIS",
            AudioFormat::OggOpus => "OGG OPUS",
            AudioFormat::Bink => "BINK",
            AudioFormat::Raw => "RAW",
            AudioFormat::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Abstract quality selector, `1` (lowest) to `40` (highest).
///
/// Construction clamps into range, so every value is valid. Adapters translate
/// it into their engine's own parameter through a
/// [`QualityMapper`](crate::quality::QualityMapper).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "u8")]
pub struct QualityIndex(u8);

impl QualityIndex {
    /// Lowest quality.
    pub const MIN: QualityIndex = QualityIndex(1);
    /// Highest quality.
    pub const MAX: QualityIndex = QualityIndex(40);

    /// Create a quality index, clamping `value` into `[1, 40]`.
    pub fn new(value: i32) -> Self {
        let clamped = value.clamp(Self::MIN.0 as i32, Self::MAX.0 as i32);
        Self(clamped as u8)
    }

    /// The clamped value.
    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl From<i32> for QualityIndex {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl From<QualityIndex> for u8 {
    fn from(quality: QualityIndex) -> Self {
        quality.0
    }
}

impl fmt::Display for QualityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Audio Buffers
// ============================================================================

/// A compressed bitstream tagged with its format.
///
/// The payload is immutable once constructed; decoding and header parsing only
/// borrow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudio {
    /// Compressed bytes
    pub data: Bytes,
    /// Format of `data`
    pub format: AudioFormat,
}

impl EncodedAudio {
    /// Wrap a compressed payload.
    pub fn new(data: impl Into<Bytes>, format: AudioFormat) -> Self {
        Self {
            data: data.into(),
            format,
        }
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Display for EncodedAudio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Format: {}, Size: {} bytes", self.format, self.data.len())
    }
}

/// Decoded PCM in the canonical representation.
///
/// Samples are interleaved (stereo is `LRLRLR...`) and normalized to
/// `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Interleaved PCM samples
    pub samples: Vec<f32>,
    /// Number of frames (one sample per channel)
    pub frames: usize,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of interleaved channels
    pub channels: u16,
    /// Playback duration
    pub duration: Duration,
}

impl DecodedAudio {
    /// Build from interleaved samples, deriving frame count and duration.
    ///
    /// A trailing partial frame is not counted in `frames`.
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        let frames = if channels == 0 {
            0
        } else {
            samples.len() / channels as usize
        };
        let duration = if sample_rate == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(frames as f64 / sample_rate as f64)
        };

        Self {
            samples,
            frames,
            sample_rate,
            channels,
            duration,
        }
    }

    /// Returns `true` if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl fmt::Display for DecodedAudio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sample Rate: {} Hz, Channels: {}, Frames: {}, Duration: {:.3} s, PCM Size: {} bytes",
            self.sample_rate,
            self.channels,
            self.frames,
            self.duration.as_secs_f64(),
            self.samples.len() * std::mem::size_of::<f32>()
        )
    }
}

/// Stream metadata that can be read without decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderInfo {
    /// Playback duration
    pub duration: Duration,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of interleaved channels
    pub channels: u16,
    /// Size of the decoded payload in bytes of canonical `f32` samples
    pub pcm_data_size: usize,
    /// Format of the inspected stream
    pub format: AudioFormat,
}

impl fmt::Display for HeaderInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Format: {}, Sample Rate: {} Hz, Channels: {}, Duration: {:.3} s, PCM Size: {} bytes",
            self.format,
            self.sample_rate,
            self.channels,
            self.duration.as_secs_f64(),
            self.pcm_data_size
        )
    }
}

// ============================================================================
// Core Traits
// ============================================================================

/// Contract of a codec adapter.
///
/// ## Implementation Notes
///
/// - `check_format` must never panic and never fail; any problem means `false`
/// - `get_header_info` returns complete metadata or an error, never a partial
///   record
/// - `encode` and `decode` return freshly owned buffers; nothing is cached
///   between calls
pub trait RuntimeCodec: PlatformSendSync {
    /// Short adapter name used in diagnostics (e.g. `"BINK"`).
    fn name(&self) -> &'static str;

    /// Format produced by `encode` and accepted by `decode`.
    fn audio_format(&self) -> AudioFormat;

    /// Returns `true` if `audio` is a stream this adapter can decode.
    fn check_format(&self, audio: &EncodedAudio) -> bool;

    /// Read stream metadata without decoding.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The codec is unavailable on this platform
    /// - The header cannot be parsed
    fn get_header_info(&self, audio: &EncodedAudio) -> Result<HeaderInfo>;

    /// Compress canonical PCM at the requested quality.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The codec is unavailable on this platform
    /// - `audio` contains no samples
    /// - The engine fails or produces no output
    fn encode(&self, audio: &DecodedAudio, quality: QualityIndex) -> Result<EncodedAudio>;

    /// Decompress a stream into canonical PCM.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The codec is unavailable on this platform
    /// - The header cannot be parsed
    /// - The engine fails to expand the full payload
    fn decode(&self, audio: &EncodedAudio) -> Result<DecodedAudio>;
}

// ============================================================================
// Tests
// ============================================================================
