//! Error types
//!
//! Every failure in the reference pipeline is fatal: generated documentation
//! must never be silently incomplete. The only lenient paths (unhandled JSDoc
//! tags, private api members) are logged and never surface as errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for type-etch operations
pub type EtchResult<T> = Result<T, EtchError>;

/// Main error type for type-etch
#[derive(Debug, Error)]
pub enum EtchError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TypeScript parse error
    #[error("TypeScript parse error: {0}")]
    TypeScriptParse(String),

    /// A placeholder names a module or type absent from the collection
    #[error("Reference not found in generated types: {0}")]
    ReferenceNotFound(String),

    /// The generator step failed or produced an unreadable listing
    #[error("Generator `{command}` failed: {message}")]
    Subprocess { command: String, message: String },

    /// The brace scan could not locate a declaration body
    #[error("Could not locate the member body of `{name}` for collapsing")]
    CollapseBoundary { name: String },

    /// Symbol not found
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Invalid path
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EtchError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        EtchError::Config(message.into())
    }

    /// Create a subprocess error
    pub fn subprocess(command: impl Into<String>, message: impl Into<String>) -> Self {
        EtchError::Subprocess {
            command: command.into(),
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for EtchError {
    fn from(err: toml::de::Error) -> Self {
        EtchError::Config(err.to_string())
    }
}
