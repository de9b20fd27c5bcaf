use std::path::PathBuf;

/// Errors that can occur across cochange.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary reports it through `miette`.
///
/// # Examples
///
/// ```
/// use cochange_core::CochangeError;
///
/// let err = CochangeError::Config("window list is empty".into());
/// assert!(err.to_string().contains("window list is empty"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum CochangeError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    #[diagnostic(code(cochange::io))]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    #[diagnostic(code(cochange::config))]
    Config(String),

    /// Git operation failure.
    #[error("git error: {0}")]
    #[diagnostic(code(cochange::git))]
    Git(String),

    /// Commit records are not sorted ascending by timestamp.
    #[error(
        "commit records out of order: record {index} has timestamp {current}, \
         earlier than the preceding {previous}"
    )]
    #[diagnostic(
        code(cochange::invalid_input_order),
        help("sort records by timestamp first, or use the full-scan order policy")
    )]
    InvalidInputOrder {
        /// Position of the first record that breaks the ordering.
        index: usize,
        /// Timestamp of the record before it.
        previous: i64,
        /// Timestamp of the offending record.
        current: i64,
    },

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    #[diagnostic(code(cochange::serialization))]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(cochange::toml))]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    #[diagnostic(code(cochange::file_not_found))]
    FileNotFound(PathBuf),
}
