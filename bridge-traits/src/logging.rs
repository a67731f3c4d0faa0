//! Diagnostic Sink Abstractions
//!
//! Codec diagnostics are mirrored into the host logging pipeline through a
//! [`LoggerSink`]. Each [`LogEntry`] carries the codec context it was emitted
//! under (codec name, operation, platform) in dedicated slots, so a host can
//! route "BINK decoding failed on Web" without parsing the message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::{error::Result, platform::PlatformSendSync};

/// Field names lifted out of `fields` into the entry's context slots.
pub const CONTEXT_FIELDS: [&str; 3] = ["codec", "operation", "platform"];

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.pad(label)
    }
}

/// A single codec diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    /// Emitting crate, e.g. `core_codec`.
    pub target: String,
    pub message: String,
    /// Codec name, e.g. `BINK`.
    pub codec: Option<String>,
    /// Operation wording, e.g. `decoding`.
    pub operation: Option<String>,
    /// Platform the capability check ran on.
    pub platform: Option<String>,
    /// Remaining structured fields (sizes, levels, counts).
    pub fields: BTreeMap<String, String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            target: target.into(),
            message: message.into(),
            codec: None,
            operation: None,
            platform: None,
            fields: BTreeMap::new(),
        }
    }

    /// Record a named value, routing [`CONTEXT_FIELDS`] to their slots.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match key {
            "codec" => self.codec = Some(value),
            "operation" => self.operation = Some(value),
            "platform" => self.platform = Some(value),
            _ => {
                self.fields.insert(key.to_string(), value);
            }
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// `BINK decoding @ Web`, or whatever subset of the context is known.
    pub fn context_label(&self) -> Option<String> {
        let mut label = [self.codec.as_deref(), self.operation.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        if let Some(platform) = &self.platform {
            if !label.is_empty() {
                label.push(' ');
            }
            label.push_str("@ ");
            label.push_str(platform);
        }

        (!label.is_empty()).then_some(label)
    }
}

/// Logger sink trait
///
/// Receives codec diagnostics and forwards them to the host's logging
/// pipeline (engine log categories, OSLog, Logcat, a file, ...).
///
/// A failing sink must never change the outcome of the codec call that
/// produced the entry.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::logging::{LoggerSink, LogEntry, LogLevel};
///
/// fn report(logger: &dyn LoggerSink, platform: &str) {
///     let entry = LogEntry::new(LogLevel::Error, "core_codec", "engine unavailable")
///         .with_field("codec", "BINK")
///         .with_field("platform", platform);
///     logger.log(entry).ok();
/// }
/// ```
pub trait LoggerSink: PlatformSendSync {
    /// Forward a log entry to the host logging system
    fn log(&self, entry: LogEntry) -> Result<()>;

    /// Entries below this level are dropped before they are built.
    fn min_level(&self) -> LogLevel {
        LogLevel::Info
    }
}

/// Sink that writes one line per entry to stderr.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    pub min_level: LogLevel,
}

impl ConsoleLogger {
    pub const fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    fn render(entry: &LogEntry) -> String {
        let mut line = format!(
            "{} {:5} {}",
            entry.timestamp.format("%H:%M:%S%.3f"),
            entry.level,
            entry.target
        );
        if let Some(label) = entry.context_label() {
            line.push_str(&format!(" [{}]", label));
        }
        line.push_str(": ");
        line.push_str(&entry.message);
        for (key, value) in &entry.fields {
            line.push_str(&format!(" {}={}", key, value));
        }
        line
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl LoggerSink for ConsoleLogger {
    fn log(&self, entry: LogEntry) -> Result<()> {
        if entry.level >= self.min_level {
            eprintln!("{}", Self::render(&entry));
        }
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }
}
