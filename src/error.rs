//! Error types for mddocx library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mddocx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a conversion run.
///
/// Resource anomalies (missing theme or image files, unmatched width patterns,
/// malformed markdown) never surface here; they are absorbed as warnings.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document configuration file does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The document configuration could not be parsed.
    #[error("Invalid configuration {}: {message}", path.display())]
    ConfigParse {
        /// Path of the offending file (empty for in-memory configs)
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// The markdown source named by the configuration does not exist.
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// A configured regular expression failed to compile.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern text
        pattern: String,
        /// Compiler message
        message: String,
    },

    /// No builder is registered under the requested template name.
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// A builder failed to serialize the document.
    #[error("Rendering error: {0}")]
    Render(String),
}
