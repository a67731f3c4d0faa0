//! Compression engine bridge.
//!
//! The engine is the opaque component that owns a compressed bitstream
//! format: it parses stream headers, expands compressed data into native
//! 16-bit PCM and compresses native PCM into a new bitstream. The codec layer
//! never looks inside the bitstream itself; everything it knows about the
//! stream comes through this trait.
//!
//! Implementations wrap a native library or provide a pure-Rust stand-in.
//! Calls for independent buffers are assumed to be re-entrant; engines that
//! are not must be wrapped by the caller (see `core_codec::EngineBinding`).

use std::time::Duration;

use crate::{
    alloc::{EngineAllocator, EngineBuffer},
    error::Result,
    platform::PlatformSendSync,
};

/// Stream metadata reported by an engine's header parser.
///
/// `sample_data_size` is expressed in bytes of the engine's native sample
/// width (signed 16-bit), i.e. the exact size of the buffer `expand` fills.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineMetadata {
    /// Sample rate in hertz.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Playback duration of the stream.
    pub duration: Duration,
    /// Size of the fully decoded native PCM payload in bytes.
    pub sample_data_size: usize,
}

impl EngineMetadata {
    /// Create a metadata record.
    pub fn new(sample_rate: u32, channels: u16, duration: Duration, sample_data_size: usize) -> Self {
        Self {
            sample_rate,
            channels,
            duration,
            sample_data_size,
        }
    }
}

/// Contract of an opaque audio compression engine.
pub trait CompressionEngine: PlatformSendSync {
    /// Short engine identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// Parse just enough of `data` to recover stream metadata.
    ///
    /// Returns `None` for malformed, truncated or foreign input. Must never
    /// panic; callers probe arbitrary data with it.
    fn read_compressed_info(&self, data: &[u8]) -> Option<EngineMetadata>;

    /// Expand `data` into `output`, which is sized to
    /// `info.sample_data_size` bytes. Returns the number of bytes written.
    fn expand(&self, data: &[u8], info: &EngineMetadata, output: &mut [u8]) -> Result<usize>;

    /// Compress interleaved native PCM into a new bitstream allocated
    /// through `allocator`.
    fn compress(
        &self,
        pcm: &[i16],
        sample_rate: u32,
        channels: u16,
        compression_level: u8,
        allocator: &EngineAllocator,
    ) -> Result<EngineBuffer>;
}
