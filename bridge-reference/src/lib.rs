//! # Reference Compression Engine
//!
//! Pure-Rust [`CompressionEngine`](bridge_traits::CompressionEngine)
//! implementation used where the licensed native engine is not linked.
//!
//! ## Overview
//!
//! The reference engine stores native 16-bit PCM behind a small fixed header
//! and discards low-order bits according to the compression level, so it is
//! lossy in the same direction as the real engine (level 0 is best). It does
//! not produce or understand the proprietary bitstream; streams written by it
//! are only readable by it.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_reference::ReferenceEngine;
//! use core_codec::{BinkCodec, CodecConfig};
//! use std::sync::Arc;
//!
//! let config = CodecConfig::builder()
//!     .engine(Arc::new(ReferenceEngine::new()))
//!     .build()?;
//! let codec = BinkCodec::new(&config);
//! ```

mod engine;

pub use engine::{ReferenceEngine, HEADER_LEN, MAGIC, MAX_COMPRESSION_LEVEL, VERSION};
