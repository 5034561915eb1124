//! Configuration-specific error types.

/// Errors that can occur while loading the sidebar configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to parse configuration text
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Log level is not one of off/error/warn/info/debug/trace
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// Breakpoint must be a positive width
    #[error("Invalid breakpoint: {0}px")]
    InvalidBreakpoint(u32),

    /// Class names must be non-empty and free of whitespace
    #[error("Invalid class name for {field}: {value:?}")]
    InvalidClassName { field: &'static str, value: String },

    /// Hotkey could not be parsed
    #[error("Invalid hotkey: {0:?}")]
    InvalidHotkey(String),
}
