//! # Codec Error Types
//!
//! Error taxonomy shared by the codec adapter and its engine binding.

use std::fmt;
use thiserror::Error;

/// Operation named in capability diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecOperation {
    /// Format detection (`check_format`).
    CheckFormat,
    /// Header extraction (`get_header_info`).
    HeaderInfo,
    /// PCM to bitstream.
    Encode,
    /// Bitstream to PCM.
    Decode,
}

impl fmt::Display for CodecOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CodecOperation::CheckFormat => "format checking",
            CodecOperation::HeaderInfo => "header parsing",
            CodecOperation::Encode => "encoding",
            CodecOperation::Decode => "decoding",
        };
        f.write_str(label)
    }
}

/// Errors that can occur during codec operations.
#[derive(Error, Debug)]
pub enum CodecError {
    // ========================================================================
    // Capability Errors
    // ========================================================================
    /// The compression engine is not available on this platform.
    #[error("Your platform ({platform}) does not support BINK {operation}")]
    UnsupportedOnPlatform {
        platform: String,
        operation: CodecOperation,
    },

    // ========================================================================
    // Format Errors
    // ========================================================================
    /// Input is not a stream the engine understands.
    #[error("Failed to parse stream header: {0}")]
    HeaderParseFailed(String),

    // ========================================================================
    // Input Errors
    // ========================================================================
    /// Encode was called with no PCM samples.
    #[error("No PCM data to encode")]
    EmptyInput,

    // ========================================================================
    // Engine Errors
    // ========================================================================
    /// The engine failed or produced unusable output.
    #[error("Compression engine failure: {0}")]
    EngineFailure(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Codec configuration was rejected.
    #[error("Invalid codec configuration: {0}")]
    InvalidConfig(String),
}

impl CodecError {
    /// Returns `true` if the input was not a recognizable stream.
    pub fn is_format_error(&self) -> bool {
        matches!(self, CodecError::HeaderParseFailed(_))
    }

    /// Returns `true` if the operation is unavailable on this platform.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, CodecError::UnsupportedOnPlatform { .. })
    }
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
