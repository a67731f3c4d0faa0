//! Reference engine bitstream.
//!
//! Layout (little endian):
//!
//! ```text
//! offset  size  field
//!      0     4  magic "RFBK"
//!      4     1  version (1)
//!      5     1  compression level (0..=9, bits dropped per sample)
//!      6     2  channel count
//!      8     4  sample rate
//!     12     4  frame count
//!     16     n  frames * channels quantized i16 samples
//! ```

use bridge_traits::error::{BridgeError, Result};
use bridge_traits::{CompressionEngine, EngineAllocator, EngineBuffer, EngineMetadata};
use bytes::{Buf, BufMut};
use std::time::Duration;
use tracing::trace;

/// Stream signature.
pub const MAGIC: [u8; 4] = *b"RFBK";
/// Bitstream version written by this engine.
pub const VERSION: u8 = 1;
/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 16;
/// Highest accepted compression level.
pub const MAX_COMPRESSION_LEVEL: u8 = 9;

const NATIVE_SAMPLE_BYTES: usize = std::mem::size_of::<i16>();

#[derive(Debug, Clone, Copy)]
struct Header {
    level: u8,
    channels: u16,
    sample_rate: u32,
    frames: u32,
}

impl Header {
    fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < HEADER_LEN {
            return None;
        }

        let mut buf = data;
        let mut magic = [0u8; 4];
        buf.copy_to_slice(&mut magic);
        if magic != MAGIC {
            return None;
        }

        let version = buf.get_u8();
        let level = buf.get_u8();
        let channels = buf.get_u16_le();
        let sample_rate = buf.get_u32_le();
        let frames = buf.get_u32_le();

        if version != VERSION || level > MAX_COMPRESSION_LEVEL || channels == 0 || sample_rate == 0 {
            return None;
        }

        let header = Self {
            level,
            channels,
            sample_rate,
            frames,
        };

        // The payload must be exactly as long as the header claims.
        match header.payload_len() {
            Some(len) if data.len() - HEADER_LEN == len => Some(header),
            _ => None,
        }
    }

    fn payload_len(&self) -> Option<usize> {
        (self.frames as usize)
            .checked_mul(self.channels as usize)?
            .checked_mul(NATIVE_SAMPLE_BYTES)
    }

    fn write(&self, out: &mut &mut [u8]) {
        out.put_slice(&MAGIC);
        out.put_u8(VERSION);
        out.put_u8(self.level);
        out.put_u16_le(self.channels);
        out.put_u32_le(self.sample_rate);
        out.put_u32_le(self.frames);
    }
}

/// Quantizing reference implementation of [`CompressionEngine`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceEngine;

impl ReferenceEngine {
    pub fn new() -> Self {
        Self
    }
}

impl CompressionEngine for ReferenceEngine {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn read_compressed_info(&self, data: &[u8]) -> Option<EngineMetadata> {
        let header = Header::parse(data)?;
        let sample_data_size = header.payload_len()?;
        let duration = Duration::from_secs_f64(header.frames as f64 / header.sample_rate as f64);

        trace!(
            frames = header.frames,
            channels = header.channels,
            sample_rate = header.sample_rate,
            "Parsed reference stream header"
        );

        Some(EngineMetadata::new(
            header.sample_rate,
            header.channels,
            duration,
            sample_data_size,
        ))
    }

    fn expand(&self, data: &[u8], info: &EngineMetadata, output: &mut [u8]) -> Result<usize> {
        let header = Header::parse(data)
            .ok_or_else(|| BridgeError::Malformed("invalid reference stream header".to_string()))?;
        let payload_len = header
            .payload_len()
            .ok_or_else(|| BridgeError::Malformed("payload size overflow".to_string()))?;

        if payload_len != info.sample_data_size {
            return Err(BridgeError::Malformed(format!(
                "header reports {} bytes but caller expects {}",
                payload_len, info.sample_data_size
            )));
        }
        if output.len() < payload_len {
            return Err(BridgeError::OperationFailed(format!(
                "output buffer too small: {} < {}",
                output.len(),
                payload_len
            )));
        }

        let mut payload = &data[HEADER_LEN..];
        let mut out = &mut output[..payload_len];
        while payload.has_remaining() {
            let quantized = payload.get_i16_le() as i32;
            let restored = (quantized << header.level).clamp(i16::MIN as i32, i16::MAX as i32);
            out.put_i16_le(restored as i16);
        }

        Ok(payload_len)
    }

    fn compress(
        &self,
        pcm: &[i16],
        sample_rate: u32,
        channels: u16,
        compression_level: u8,
        allocator: &EngineAllocator,
    ) -> Result<EngineBuffer> {
        if channels == 0 || sample_rate == 0 {
            return Err(BridgeError::OperationFailed(format!(
                "invalid stream layout: {} channels at {} Hz",
                channels, sample_rate
            )));
        }

        let frames = pcm.len() / channels as usize;
        if frames == 0 {
            return Ok(allocator.allocate(0));
        }
        let frames = u32::try_from(frames)
            .map_err(|_| BridgeError::OperationFailed(format!("too many frames: {}", frames)))?;

        let header = Header {
            level: compression_level.min(MAX_COMPRESSION_LEVEL),
            channels,
            sample_rate,
            frames,
        };
        let payload_len = header
            .payload_len()
            .ok_or_else(|| BridgeError::OperationFailed("payload size overflow".to_string()))?;

        let mut buffer = allocator.allocate(HEADER_LEN + payload_len);
        {
            let mut out: &mut [u8] = &mut buffer;
            header.write(&mut out);
            let sample_count = frames as usize * channels as usize;
            for &sample in &pcm[..sample_count] {
                out.put_i16_le(sample >> header.level);
            }
        }

        trace!(
            bytes = buffer.len(),
            level = header.level,
            "Compressed reference stream"
        );

        Ok(buffer)
    }
}
