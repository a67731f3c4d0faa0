//! # Runtime Codec Module
//!
//! Codec adapters that convert between compressed audio bitstreams and the
//! canonical interleaved `f32` PCM used by the audio import pipeline.
//!
//! ## Overview
//!
//! This module handles:
//! - Format detection and header extraction without decoding
//! - Quality index mapping onto engine compression parameters
//! - Sample transcoding between native `i16` and canonical `f32`
//! - Capability-gated access to the opaque compression engine
//!
//! The Bink adapter is [`BinkCodec`]; all adapters implement [`RuntimeCodec`].

pub mod bink;
pub mod config;
pub mod engine;
pub mod error;
pub mod quality;
pub mod traits;
pub mod transcode;

pub use bink::BinkCodec;
pub use config::{CodecConfig, CodecConfigBuilder, CodecSettings, EngineCapability};
pub use engine::EngineBinding;
pub use error::{CodecError, CodecOperation, Result};
pub use quality::QualityMapper;
pub use traits::{AudioFormat, DecodedAudio, EncodedAudio, HeaderInfo, QualityIndex, RuntimeCodec};
pub use transcode::SampleTranscoder;
