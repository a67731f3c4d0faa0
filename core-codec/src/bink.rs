//! # Bink Audio Codec Adapter
//!
//! [`RuntimeCodec`] implementation for Bink audio.
//!
//! ## Overview
//!
//! `BinkCodec` is stateless: it holds an [`EngineBinding`] and a
//! [`QualityMapper`] and nothing else, so a single instance can serve any
//! number of threads. Each operation runs the same pipeline:
//!
//! ```text
//! encode: DecodedAudio (f32) → SampleTranscoder → i16 → EngineBinding::compress → EncodedAudio
//! decode: EncodedAudio → EngineBinding::parse_header → decompress → i16 → SampleTranscoder → DecodedAudio (f32)
//! ```
//!
//! The capability check always comes first. When the engine is unavailable
//! every operation logs the platform and fails with
//! [`CodecError::UnsupportedOnPlatform`]; `check_format` returns `false`.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use core_codec::{BinkCodec, CodecConfig, DecodedAudio, QualityIndex, RuntimeCodec};
//!
//! let codec = BinkCodec::new(&CodecConfig::builder().build()?);
//! let pcm = DecodedAudio::new(vec![0.0; 96_000], 48_000, 2);
//!
//! let encoded = codec.encode(&pcm, QualityIndex::new(30))?;
//! let decoded = codec.decode(&encoded)?;
//! assert_eq!(decoded.frames, 48_000);
//! ```

use crate::config::CodecConfig;
use crate::engine::EngineBinding;
use crate::error::{CodecError, CodecOperation, Result};
use crate::quality::QualityMapper;
use crate::traits::{AudioFormat, DecodedAudio, EncodedAudio, HeaderInfo, QualityIndex, RuntimeCodec};
use crate::transcode::{SampleTranscoder, CANONICAL_SAMPLE_BYTES, NATIVE_SAMPLE_BYTES};
use bridge_traits::EngineMetadata;
use tracing::{debug, error, info, instrument, warn};

/// Bink audio codec adapter.
#[derive(Debug)]
pub struct BinkCodec {
    binding: EngineBinding,
    mapper: QualityMapper,
    warn_on_partial_frames: bool,
}

impl BinkCodec {
    /// Adapter name reported to the pipeline.
    pub const NAME: &'static str = "BINK";

    /// Create an adapter from codec configuration.
    pub fn new(config: &CodecConfig) -> Self {
        Self {
            binding: EngineBinding::from_config(config),
            mapper: QualityMapper::BINK,
            warn_on_partial_frames: config.warn_on_partial_frames,
        }
    }

    /// Create an adapter around an existing binding.
    pub fn with_binding(binding: EngineBinding) -> Self {
        Self {
            binding,
            mapper: QualityMapper::BINK,
            warn_on_partial_frames: true,
        }
    }

    /// The engine binding used by this adapter.
    pub fn binding(&self) -> &EngineBinding {
        &self.binding
    }

    /// Parse the header, turning a rejected stream into `HeaderParseFailed`.
    fn read_metadata(&self, audio: &EncodedAudio) -> Result<EngineMetadata> {
        self.binding.parse_header(&audio.data)?.ok_or_else(|| {
            error!("Failed to parse BINK header of {}", audio);
            CodecError::HeaderParseFailed(format!(
                "not a BINK stream ({} bytes)",
                audio.data.len()
            ))
        })
    }
}

impl RuntimeCodec for BinkCodec {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn audio_format(&self) -> AudioFormat {
        AudioFormat::Bink
    }

    #[instrument(
        skip_all,
        fields(
            codec = "BINK",
            operation = %CodecOperation::CheckFormat,
            platform = %self.binding.platform(),
            size = audio.data.len()
        )
    )]
    fn check_format(&self, audio: &EncodedAudio) -> bool {
        if self.binding.ensure_supported(CodecOperation::CheckFormat).is_err() {
            return false;
        }

        match self.binding.parse_header(&audio.data) {
            Ok(Some(_)) => {
                debug!("Recognized BINK stream");
                true
            }
            Ok(None) => false,
            Err(e) => {
                debug!(error = %e, "Format check failed");
                false
            }
        }
    }

    #[instrument(
        skip_all,
        fields(
            codec = "BINK",
            operation = %CodecOperation::HeaderInfo,
            platform = %self.binding.platform()
        )
    )]
    fn get_header_info(&self, audio: &EncodedAudio) -> Result<HeaderInfo> {
        info!("Getting header info for {}", audio);

        self.binding.ensure_supported(CodecOperation::HeaderInfo)?;
        let metadata = self.read_metadata(audio)?;

        let header = HeaderInfo {
            duration: metadata.duration,
            sample_rate: metadata.sample_rate,
            channels: metadata.channels,
            pcm_data_size: metadata.sample_data_size / NATIVE_SAMPLE_BYTES * CANONICAL_SAMPLE_BYTES,
            format: AudioFormat::Bink,
        };

        info!("Retrieved header info: {}", header);
        Ok(header)
    }

    #[instrument(
        skip_all,
        fields(
            codec = "BINK",
            operation = %CodecOperation::Encode,
            platform = %self.binding.platform(),
            quality = %quality
        )
    )]
    fn encode(&self, audio: &DecodedAudio, quality: QualityIndex) -> Result<EncodedAudio> {
        info!("Encoding {}", audio);

        self.binding.ensure_supported(CodecOperation::Encode)?;

        if audio.samples.is_empty() {
            error!("No PCM data to encode");
            return Err(CodecError::EmptyInput);
        }

        if self.warn_on_partial_frames
            && audio.channels > 0
            && audio.samples.len() % audio.channels as usize != 0
        {
            warn!(
                samples = audio.samples.len(),
                channels = audio.channels,
                "PCM ends with a partial frame; trailing samples are dropped"
            );
        }

        let level = self.mapper.compression_level(quality);
        debug!(level, "Mapped quality to compression level");

        SampleTranscoder::count_clipped(&audio.samples);
        let pcm = SampleTranscoder::f32_to_i16(&audio.samples);

        let data = self
            .binding
            .compress(&pcm, audio.sample_rate, audio.channels, level)
            .map_err(|e| {
                error!("Failed to encode BINK audio: {}", e);
                e
            })?;

        let encoded = EncodedAudio::new(data, AudioFormat::Bink);
        info!("Encoded {}", encoded);
        Ok(encoded)
    }

    #[instrument(
        skip_all,
        fields(
            codec = "BINK",
            operation = %CodecOperation::Decode,
            platform = %self.binding.platform()
        )
    )]
    fn decode(&self, audio: &EncodedAudio) -> Result<DecodedAudio> {
        info!("Decoding {}", audio);

        self.binding.ensure_supported(CodecOperation::Decode)?;
        let metadata = self.read_metadata(audio)?;

        let native = self
            .binding
            .decompress(&audio.data, &metadata)
            .map_err(|e| {
                error!("Failed to decode BINK audio: {}", e);
                e
            })?;

        let frame_bytes = metadata.channels as usize * NATIVE_SAMPLE_BYTES;
        let frames = native.len() / frame_bytes;
        let remainder = native.len() % frame_bytes;
        if remainder != 0 && self.warn_on_partial_frames {
            warn!(
                remainder,
                frame_bytes, "Decoded payload ends with a partial frame"
            );
        }

        let samples = SampleTranscoder::i16_to_f32(&SampleTranscoder::i16_from_le_bytes(&native));

        let decoded = DecodedAudio {
            samples,
            frames,
            sample_rate: metadata.sample_rate,
            channels: metadata.channels,
            duration: metadata.duration,
        };

        info!("Decoded {}", decoded);
        Ok(decoded)
    }
}
