//! Integration tests for logging system

use bridge_traits::error::Result as SinkResult;
use bridge_traits::logging::{LogEntry, LogLevel, LoggerSink};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CollectingSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl LoggerSink for CollectingSink {
    fn log(&self, entry: LogEntry) -> SinkResult<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}

#[test]
fn test_logging_initialization() {
    // Only one global subscriber per process, so this is the only test that installs one.
    let sink = Arc::new(CollectingSink::default());
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_logger_sink(sink.clone());

    init_logging(config.clone()).expect("first initialization succeeds");
    assert!(init_logging(config).is_err());

    tracing::warn!(target: "core_codec", platform = "Linux", "engine unavailable");
    // Third-party crates stay at warn under the default directives.
    tracing::info!(target: "symphonia", "format scan");

    let entries = sink.entries.lock().unwrap();
    let entry = entries
        .iter()
        .find(|e| e.message == "engine unavailable")
        .expect("event forwarded to sink");
    assert_eq!(entry.level, LogLevel::Warn);
    assert_eq!(entry.target, "core_codec");
    assert_eq!(entry.platform.as_deref(), Some("Linux"));
    assert!(entries.iter().all(|e| e.target != "symphonia"));

}

#[test]
fn test_format_selection() {
    // Debug builds should default to Pretty
    #[cfg(debug_assertions)]
    {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Pretty);
    }

    // Release builds should default to JSON
    #[cfg(not(debug_assertions))]
    {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Json);
    }
}

#[test]
fn test_filter_configuration() {
    let config = LoggingConfig::default().with_filter("core_codec=debug,bridge_reference=trace");

    assert_eq!(
        config.filter,
        Some("core_codec=debug,bridge_reference=trace".to_string())
    );
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_operation_timing(true);

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(config.logger_sink.is_none());
    assert!(config.operation_timing);
    assert!(!LoggingConfig::default().operation_timing);
}

#[test]
fn test_config_debug_hides_sink() {
    let config = LoggingConfig::default().with_logger_sink(Arc::new(CollectingSink::default()));
    let rendered = format!("{:?}", config);
    assert!(rendered.contains("LoggerSink { ... }"));
}
