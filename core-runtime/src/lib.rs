//! # Core Runtime Module
//!
//! Provides the ambient runtime infrastructure shared by the codec crates:
//! - Logging and tracing initialisation
//! - Forwarding of diagnostics to a host [`LoggerSink`](bridge_traits::LoggerSink)
//!
//! ## Overview
//!
//! Codec crates only emit `tracing` events. Whether those events end up on
//! stdout, as JSON, or inside a host logging pipeline is decided once, here,
//! by the application that embeds them.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
