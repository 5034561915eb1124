//! Custom logging module.
//!
//! This module provides a `log` backend that formats records and forwards
//! them to a sink callback. In the browser the sink writes to the developer
//! console; natively any callback can be plugged in.

use crate::error::AppError;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Arc, Mutex};

/// Callback receiving the level and formatted line of each record.
pub type LogSink = Box<dyn Fn(Level, String) + Send + Sync>;

/// Format a log record into a string for display
///
pub fn format_log(record: &Record) -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let level_str = match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    format!("{} {} [{}] {}", timestamp, level_str, record.target(), record.args())
}

/// Logger forwarding formatted records to a sink
///
pub struct SidebarLogger {
    level: LevelFilter,
    sink: Arc<Mutex<Option<LogSink>>>,
}

impl SidebarLogger {
    pub fn new(level: LevelFilter) -> Self {
        SidebarLogger {
            level,
            sink: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_sink(&self, sink: LogSink) {
        if let Ok(mut guard) = self.sink.lock() {
            *guard = Some(sink);
        }
        // A poisoned lock leaves the logger silent, which is non-critical
    }
}

impl Log for SidebarLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(sink) = self.sink.lock() {
                if let Some(ref cb) = *sink {
                    cb(record.level(), format_log(record));
                }
            }
        }
    }

    fn flush(&self) {
        // No-op
    }
}

/// Install the logger globally with the given level and sink.
///
pub fn init(level: LevelFilter, sink: LogSink) -> Result<(), AppError> {
    let logger = SidebarLogger::new(level);
    logger.set_sink(sink);
    log::set_boxed_logger(Box::new(logger)).map_err(|e| AppError::Logger(e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}

/// Sink writing to the browser console at the matching severity.
///
#[cfg(target_arch = "wasm32")]
pub fn console_sink() -> LogSink {
    use wasm_bindgen::JsValue;
    use web_sys::console;

    Box::new(|level, line| {
        let line = JsValue::from_str(&line);
        match level {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(level: LevelFilter) -> (SidebarLogger, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(vec![]));
        let logger = SidebarLogger::new(level);
        let target = Arc::clone(&lines);
        logger.set_sink(Box::new(move |_, line| {
            target.lock().unwrap().push(line);
        }));
        (logger, lines)
    }

    #[test]
    fn formats_level_target_and_message() {
        let (logger, lines) = capture(LevelFilter::Debug);
        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .target("sidebar_nav::controller")
                .args(format_args!("host went away"))
                .build(),
        );
        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" WARN [sidebar_nav::controller] host went away"));
    }

    #[test]
    fn filters_below_level() {
        let (logger, lines) = capture(LevelFilter::Info);
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("noise"))
                .build(),
        );
        assert!(lines.lock().unwrap().is_empty());
    }

    #[test]
    fn no_sink_is_silent() {
        let logger = SidebarLogger::new(LevelFilter::Trace);
        logger.log(
            &Record::builder()
                .level(Level::Error)
                .args(format_args!("dropped"))
                .build(),
        );
        logger.flush();
    }
}
