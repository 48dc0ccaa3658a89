//! Error types for the nucmer-rs library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for alignment-orchestration operations.
pub type Result<T> = std::result::Result<T, AlignError>;

/// Errors that can occur while orchestrating an alignment run.
///
/// These are process-level failures (a tool could not be found or spawned,
/// a file could not be written). A tool that runs and exits nonzero is not
/// an `AlignError` — exit codes feed into the terminal [`AlignStatus`]
/// instead.
///
/// [`AlignStatus`]: crate::status::AlignStatus
#[derive(Error, Debug)]
pub enum AlignError {
    /// Input file not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A MUMmer tool binary could not be located
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// A MUMmer tool process could not be spawned
    #[error("Failed to run {tool}: {reason}")]
    ToolSpawnFailed { tool: String, reason: String },

    /// Invalid configuration parameter
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to parse a coordinate-table row
    #[error("Failed to parse coords row: {0}")]
    CoordsParseError(String),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

impl From<tempfile::PersistError> for AlignError {
    fn from(e: tempfile::PersistError) -> Self {
        AlignError::IoError(e.error)
    }
}
