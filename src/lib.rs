//! Workspace facade crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (`core-codec`, `core-runtime`, `bridge-reference`).
//! Host applications can depend on `audio-import-workspace` and enable the
//! documented features without needing to wire each crate individually.

#[cfg(feature = "codec")]
pub use core_codec as codec;

#[cfg(feature = "runtime")]
pub use core_runtime as runtime;

#[cfg(feature = "reference-engine")]
pub use bridge_reference as reference;
