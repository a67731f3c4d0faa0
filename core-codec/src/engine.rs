//! # Compression Engine Binding
//!
//! Capability-gated boundary between the codec adapter and the opaque
//! [`CompressionEngine`].
//!
//! ## Overview
//!
//! The binding owns the only references to the engine. Every call first
//! checks the runtime capability; when it is absent the call fails with
//! [`CodecError::UnsupportedOnPlatform`] and the engine is never touched.
//!
//! Buffer ownership crosses the boundary in two directions:
//!
//! - **Decompress**: the binding allocates a zeroed buffer of exactly the
//!   size the header reports and lends it to the engine. A short fill is an
//!   engine failure.
//! - **Compress**: the engine allocates its output through the binding's
//!   [`EngineAllocator`]. The binding copies the result into [`Bytes`] and the
//!   engine buffer is released through the same allocator when it drops, on
//!   success and error paths alike.
//!
//! ## Threading Model
//!
//! Engines are assumed re-entrant for independent buffers. Engines that are
//! not can be wrapped with [`EngineBinding::serialized`], which holds a
//! `parking_lot::Mutex` for the duration of every engine call.

use crate::config::{CodecConfig, EngineCapability};
use crate::error::{CodecError, CodecOperation, Result};
use bridge_traits::{platform_name, CompressionEngine, EngineAllocator, EngineMetadata};
use bytes::Bytes;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// Capability-gated wrapper around a compression engine.
pub struct EngineBinding {
    engine: Option<Arc<dyn CompressionEngine>>,
    lock: Option<Mutex<()>>,
    capability: EngineCapability,
    platform: String,
    allocator: EngineAllocator,
}

impl EngineBinding {
    /// Bind a re-entrant engine.
    pub fn new(engine: Arc<dyn CompressionEngine>) -> Self {
        Self {
            engine: Some(engine),
            lock: None,
            capability: EngineCapability::Enabled,
            platform: platform_name().to_string(),
            allocator: EngineAllocator::aligned(),
        }
    }

    /// Bind an engine that must not be entered concurrently.
    pub fn serialized(engine: Arc<dyn CompressionEngine>) -> Self {
        Self {
            lock: Some(Mutex::new(())),
            ..Self::new(engine)
        }
    }

    /// A binding with no engine; every operation is unsupported.
    pub fn unsupported() -> Self {
        Self {
            engine: None,
            lock: None,
            capability: EngineCapability::Disabled,
            platform: platform_name().to_string(),
            allocator: EngineAllocator::aligned(),
        }
    }

    /// Build a binding from codec configuration.
    pub fn from_config(config: &CodecConfig) -> Self {
        Self {
            engine: config.engine.clone(),
            lock: config.serialize_engine_access.then(|| Mutex::new(())),
            capability: config.capability,
            platform: config.platform.clone(),
            allocator: config.allocator,
        }
    }

    /// Override the runtime capability flag.
    pub fn with_capability(mut self, capability: EngineCapability) -> Self {
        self.capability = capability;
        self
    }

    /// Override the platform name used in diagnostics.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Override the allocator handed to the engine.
    pub fn with_allocator(mut self, allocator: EngineAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Returns `true` if the capability is enabled and an engine is bound.
    pub fn is_supported(&self) -> bool {
        self.capability.is_enabled() && self.engine.is_some()
    }

    /// Returns `true` if engine calls are serialized.
    pub fn is_serialized(&self) -> bool {
        self.lock.is_some()
    }

    /// Platform name reported in diagnostics.
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Fail with `UnsupportedOnPlatform` unless the engine may be used.
    ///
    /// Logs an error naming the platform and the operation.
    pub fn ensure_supported(&self, operation: CodecOperation) -> Result<()> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(self.unsupported_error(operation))
        }
    }

    fn unsupported_error(&self, operation: CodecOperation) -> CodecError {
        error!(
            codec = "BINK",
            platform = %self.platform,
            operation = %operation,
            "Your platform ({}) does not support BINK {}",
            self.platform,
            operation
        );

        CodecError::UnsupportedOnPlatform {
            platform: self.platform.clone(),
            operation,
        }
    }

    fn with_engine<R>(
        &self,
        operation: CodecOperation,
        call: impl FnOnce(&dyn CompressionEngine) -> Result<R>,
    ) -> Result<R> {
        let engine = match self.engine.as_deref() {
            Some(engine) if self.capability.is_enabled() => engine,
            _ => return Err(self.unsupported_error(operation)),
        };

        let _guard = self.lock.as_ref().map(|lock| lock.lock());
        call(engine)
    }

    /// Parse stream metadata.
    ///
    /// Returns `Ok(None)` for malformed, truncated or foreign input, and for
    /// streams that report no channels or no decoded data.
    pub fn parse_header(&self, data: &[u8]) -> Result<Option<EngineMetadata>> {
        self.with_engine(CodecOperation::HeaderInfo, |engine| {
            let metadata = engine
                .read_compressed_info(data)
                .filter(|info| info.channels > 0 && info.sample_data_size > 0);

            if metadata.is_none() {
                debug!(size = data.len(), "Engine did not recognize stream header");
            }

            Ok(metadata)
        })
    }

    /// Expand `data` into a native PCM byte buffer of exactly
    /// `info.sample_data_size` bytes.
    pub fn decompress(&self, data: &[u8], info: &EngineMetadata) -> Result<Vec<u8>> {
        self.with_engine(CodecOperation::Decode, |engine| {
            let mut output = vec![0u8; info.sample_data_size];

            let written = engine
                .expand(data, info, &mut output)
                .map_err(|e| CodecError::EngineFailure(e.to_string()))?;

            if written != output.len() {
                return Err(CodecError::EngineFailure(format!(
                    "engine expanded {} of {} bytes",
                    written,
                    output.len()
                )));
            }

            debug!(bytes = written, engine = engine.name(), "Expanded stream");
            Ok(output)
        })
    }

    /// Compress interleaved native PCM.
    ///
    /// The engine's buffer is released through the binding's allocator once
    /// its contents have been copied out.
    pub fn compress(
        &self,
        pcm: &[i16],
        sample_rate: u32,
        channels: u16,
        compression_level: u8,
    ) -> Result<Bytes> {
        self.with_engine(CodecOperation::Encode, |engine| {
            let buffer = engine
                .compress(pcm, sample_rate, channels, compression_level, &self.allocator)
                .map_err(|e| CodecError::EngineFailure(e.to_string()))?;

            if buffer.is_empty() {
                return Err(CodecError::EngineFailure(
                    "engine produced no output".to_string(),
                ));
            }

            debug!(
                bytes = buffer.len(),
                level = compression_level,
                engine = engine.name(),
                "Compressed stream"
            );
            Ok(Bytes::copy_from_slice(&buffer))
        })
    }
}

impl fmt::Debug for EngineBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineBinding")
            .field(
                "engine",
                &self.engine.as_ref().map(|_| "CompressionEngine { ... }"),
            )
            .field("serialized", &self.lock.is_some())
            .field("capability", &self.capability)
            .field("platform", &self.platform)
            .field("allocator", &self.allocator)
            .finish()
    }
}
