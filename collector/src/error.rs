//! Error types for collecting lag from the consumer groups tool.

use thiserror::Error;

use consumer_lag_core::ParseError;

/// Errors that can occur while running the tool or loading configuration.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The tool could not be started.
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool did not exit within the configured timeout and was killed.
    #[error("'{command}' timed out after {timeout_ms}ms")]
    Timeout { command: String, timeout_ms: u64 },

    /// The tool exited unsuccessfully without printing anything to stdout.
    #[error("'{command}' exited with {status}: {stderr}")]
    ToolFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The describe worker pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Tool output could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Convenience alias for results with [`CollectorError`].
pub type Result<T> = std::result::Result<T, CollectorError>;
