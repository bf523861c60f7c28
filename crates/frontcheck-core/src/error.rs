//! Error types for frontcheck.
//!
//! All errors in the system are represented by the [`Error`] enum.
//! Per-document errors (see [`Error::is_document_error`]) mark a single
//! document as errored; everything else aborts the run.

use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// The core error type for all frontcheck operations.
#[derive(ThisError, Debug)]
pub enum Error {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input path not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// File too large for processing
    #[error("File too large ({size} bytes, max {max} bytes): {path}")]
    FileTooLarge { path: PathBuf, size: u64, max: u64 },

    /// No delimited metadata block at the start of the document
    #[error("Missing frontmatter: {reason}")]
    MissingFrontmatter { reason: String },

    /// Malformed metadata syntax
    #[error("YAML syntax error on line {line}: {reason} (`{content}`)")]
    YamlSyntax {
        line: usize,
        content: String,
        reason: String,
    },

    /// Valid YAML the restricted decoder declines to interpret
    #[error("Unsupported YAML feature on line {line}: {feature}")]
    UnsupportedYamlFeature { line: usize, feature: String },

    /// Invalid configuration
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// Schema name not registered
    #[error("Unknown schema '{name}' (available: {available})")]
    UnknownSchema { name: String, available: String },

    /// Serialization of a report failed
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// Generic unclassified error
    #[error("Error: {0}")]
    Other(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Error::FileNotFound { path: path.into() }
    }

    /// Create a file too large error
    pub fn file_too_large(path: impl Into<PathBuf>, size: u64, max: u64) -> Self {
        Error::FileTooLarge {
            path: path.into(),
            size,
            max,
        }
    }

    /// Create a missing frontmatter error
    pub fn missing_frontmatter(reason: impl Into<String>) -> Self {
        Error::MissingFrontmatter {
            reason: reason.into(),
        }
    }

    /// Create a YAML syntax error for a 1-based line of the frontmatter block
    pub fn yaml_syntax(line: usize, content: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::YamlSyntax {
            line,
            content: content.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported YAML feature error
    pub fn unsupported_feature(line: usize, feature: impl Into<String>) -> Self {
        Error::UnsupportedYamlFeature {
            line,
            feature: feature.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(reason: impl Into<String>) -> Self {
        Error::ConfigError {
            reason: reason.into(),
        }
    }

    /// Create an unknown schema error
    pub fn unknown_schema(name: impl Into<String>, available: &[&str]) -> Self {
        Error::UnknownSchema {
            name: name.into(),
            available: available.join(", "),
        }
    }

    /// Create a serialization error
    pub fn serialization(reason: impl Into<String>) -> Self {
        Error::Serialization {
            reason: reason.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Whether this error concerns a single document and should not abort a batch
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::FileTooLarge { .. }
                | Error::MissingFrontmatter { .. }
                | Error::YamlSyntax { .. }
                | Error::UnsupportedYamlFeature { .. }
        )
    }
}
