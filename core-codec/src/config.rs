//! # Codec Configuration
//!
//! Builder-based configuration for codec adapters.
//!
//! ## Overview
//!
//! [`CodecConfig`] holds the compression engine, the runtime capability flag
//! and the diagnostic settings an adapter needs. Use [`CodecConfig::builder`]
//! to construct one. When the `reference-engine` feature is enabled and no
//! engine is supplied, the pure-Rust reference engine is injected
//! automatically.
//!
//! ## Usage
//!
//! ### Default Configuration
//!
//! ```ignore
//! use core_codec::config::CodecConfig;
//!
//! let config = CodecConfig::builder().build()?;
//! ```
//!
//! ### Custom Engine
//!
//! ```ignore
//! use core_codec::config::{CodecConfig, EngineCapability};
//! use std::sync::Arc;
//!
//! let config = CodecConfig::builder()
//!     .engine(Arc::new(MyNativeEngine::load()?))
//!     .serialize_engine_access(true)
//!     .platform("Android")
//!     .build()?;
//! ```
//!
//! ### Disabled Capability
//!
//! ```ignore
//! let config = CodecConfig::builder()
//!     .capability(EngineCapability::Disabled)
//!     .build()?;
//! // Every operation now fails with `CodecError::UnsupportedOnPlatform`.
//! ```

use crate::error::{CodecError, Result};
use bridge_traits::{platform_name, CompressionEngine, EngineAllocator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Whether the compression engine may be used on this platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineCapability {
    /// Engine calls are allowed.
    #[default]
    Enabled,
    /// Every operation reports `UnsupportedOnPlatform` without touching the engine.
    Disabled,
}

impl EngineCapability {
    /// Returns `true` if engine calls are allowed.
    pub fn is_enabled(&self) -> bool {
        matches!(self, EngineCapability::Enabled)
    }
}

/// Serializable subset of [`CodecConfig`].
///
/// Hosts persist or ship these alongside their own settings; the engine
/// itself is always injected in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecSettings {
    /// Runtime capability flag.
    ///
    /// Default: enabled.
    #[serde(default)]
    pub capability: EngineCapability,

    /// Platform name reported in diagnostics.
    ///
    /// Default: the name of the build target.
    #[serde(default)]
    pub platform: Option<String>,

    /// Serialize calls into the engine behind a lock.
    ///
    /// Default: false (engines are assumed re-entrant).
    #[serde(default)]
    pub serialize_engine_access: bool,

    /// Warn when a decoded payload ends with a partial frame.
    ///
    /// Default: true.
    #[serde(default = "default_warn_on_partial_frames")]
    pub warn_on_partial_frames: bool,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            capability: EngineCapability::default(),
            platform: None,
            serialize_engine_access: false,
            warn_on_partial_frames: default_warn_on_partial_frames(),
        }
    }
}

fn default_warn_on_partial_frames() -> bool {
    true
}

/// Configuration for a codec adapter.
///
/// Use [`CodecConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CodecConfig {
    /// Compression engine (absent when no engine is linked for this platform)
    pub engine: Option<Arc<dyn CompressionEngine>>,

    /// Runtime capability flag
    pub capability: EngineCapability,

    /// Platform name reported in diagnostics
    pub platform: String,

    /// Whether engine calls are serialized behind a lock
    pub serialize_engine_access: bool,

    /// Whether partial trailing frames produce a warning
    pub warn_on_partial_frames: bool,

    /// Allocator handed to the engine for output buffers
    pub allocator: EngineAllocator,
}

impl std::fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecConfig")
            .field(
                "engine",
                &self.engine.as_ref().map(|_| "CompressionEngine { ... }"),
            )
            .field("capability", &self.capability)
            .field("platform", &self.platform)
            .field("serialize_engine_access", &self.serialize_engine_access)
            .field("warn_on_partial_frames", &self.warn_on_partial_frames)
            .field("allocator", &self.allocator)
            .finish()
    }
}

impl CodecConfig {
    /// Creates a new builder for constructing a `CodecConfig`.
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder::default()
    }

    /// Returns `true` if the capability is enabled and an engine is present.
    pub fn is_supported(&self) -> bool {
        self.capability.is_enabled() && self.engine.is_some()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.platform.trim().is_empty() {
            return Err(CodecError::InvalidConfig(
                "Platform name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(feature = "reference-engine")]
fn provide_default_engine() -> Option<Arc<dyn CompressionEngine>> {
    use bridge_reference::ReferenceEngine;

    let engine: Arc<dyn CompressionEngine> = Arc::new(ReferenceEngine::new());
    Some(engine)
}

#[cfg(not(feature = "reference-engine"))]
fn provide_default_engine() -> Option<Arc<dyn CompressionEngine>> {
    None
}

/// Builder for constructing [`CodecConfig`] instances.
#[derive(Default)]
pub struct CodecConfigBuilder {
    engine: Option<Arc<dyn CompressionEngine>>,
    capability: Option<EngineCapability>,
    platform: Option<String>,
    serialize_engine_access: Option<bool>,
    warn_on_partial_frames: Option<bool>,
    allocator: Option<EngineAllocator>,
}

impl CodecConfigBuilder {
    /// Sets the compression engine.
    ///
    /// If not provided, the reference engine is used when the
    /// `reference-engine` feature is enabled; otherwise the codec reports
    /// every operation as unsupported.
    pub fn engine(mut self, engine: Arc<dyn CompressionEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Sets the runtime capability flag.
    ///
    /// Default: [`EngineCapability::Enabled`]
    pub fn capability(mut self, capability: EngineCapability) -> Self {
        self.capability = Some(capability);
        self
    }

    /// Overrides the platform name used in diagnostics.
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Serialize engine calls for engines that are not re-entrant.
    pub fn serialize_engine_access(mut self, enabled: bool) -> Self {
        self.serialize_engine_access = Some(enabled);
        self
    }

    /// Enable or disable the partial-frame warning on decode.
    pub fn warn_on_partial_frames(mut self, enabled: bool) -> Self {
        self.warn_on_partial_frames = Some(enabled);
        self
    }

    /// Sets the allocator handed to the engine.
    ///
    /// Default: [`EngineAllocator::aligned`]
    pub fn allocator(mut self, allocator: EngineAllocator) -> Self {
        self.allocator = Some(allocator);
        self
    }

    /// Applies serialized settings. Values set explicitly on the builder win.
    pub fn settings(mut self, settings: CodecSettings) -> Self {
        self.capability = self.capability.or(Some(settings.capability));
        self.platform = self.platform.or(settings.platform);
        self.serialize_engine_access = self
            .serialize_engine_access
            .or(Some(settings.serialize_engine_access));
        self.warn_on_partial_frames = self
            .warn_on_partial_frames
            .or(Some(settings.warn_on_partial_frames));
        self
    }

    /// Builds the final configuration.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidConfig` if validation fails.
    pub fn build(self) -> Result<CodecConfig> {
        let engine = match self.engine {
            Some(engine) => Some(engine),
            None => provide_default_engine(),
        };

        let config = CodecConfig {
            engine,
            capability: self.capability.unwrap_or_default(),
            platform: self
                .platform
                .unwrap_or_else(|| platform_name().to_string()),
            serialize_engine_access: self.serialize_engine_access.unwrap_or(false),
            warn_on_partial_frames: self
                .warn_on_partial_frames
                .unwrap_or_else(default_warn_on_partial_frames),
            allocator: self.allocator.unwrap_or_default(),
        };

        config.validate()?;

        debug!(
            platform = %config.platform,
            supported = config.is_supported(),
            "Codec configuration built"
        );

        Ok(config)
    }
}
