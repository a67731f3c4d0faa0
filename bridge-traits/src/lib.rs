//! # Host Bridge Traits
//!
//! Boundary abstractions between the codec core and the components it treats
//! as external collaborators.
//!
//! ## Overview
//!
//! This crate defines the contract between the codec layer and implementations
//! that live outside of it. Each trait represents a capability the core
//! requires but does not own.
//!
//! ### Compression
//! - [`CompressionEngine`](engine::CompressionEngine) - Opaque engine that parses,
//!   expands and produces compressed bitstreams
//! - [`EngineAllocator`](alloc::EngineAllocator) - C-style `alloc`/`free` pair
//!   handed to engines, 16-byte aligned
//!
//! ### Diagnostics
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured diagnostics to host logging
//!
//! ### Platform
//! - [`platform_name`](platform::platform_name) - Name reported in capability diagnostics
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. The codec
//! layer maps these into its own error taxonomy at the binding boundary.
//!
//! ## Thread Safety
//!
//! Bridge traits require `Send + Sync` on native targets (via
//! [`PlatformSendSync`](platform::PlatformSendSync)) so bindings can be shared
//! across worker threads.

pub mod alloc;
pub mod engine;
pub mod error;
pub mod logging;
pub mod platform;

pub use error::BridgeError;

// Re-export commonly used types
pub use alloc::{EngineAllocator, EngineBuffer, ENGINE_ALIGNMENT};
pub use engine::{CompressionEngine, EngineMetadata};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use platform::{platform_name, PlatformSendSync};
