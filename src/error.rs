//! Domain-specific error types for the conversion engine.
//!
//! Library modules return the typed errors defined here (and in
//! [`crate::resources::error`]); command handlers at the CLI boundary
//! convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! PuppetizeError
//! ├── Config(ConfigError)     : tool config, mapping table, channel export
//! ├── Record(RecordError)     : invalid artifact construction config
//! ├── Export(ExportError)     : directory creation, file writes
//! └── Manifest(ManifestError) : manifest missing, unreadable, malformed
//! ```

use std::path::PathBuf;

use thiserror::Error;

pub use crate::resources::error::{ExportError, RecordError};

/// Top-level error type for the conversion engine.
#[derive(Error, Debug)]
pub enum PuppetizeError {
    /// Configuration-related error (tool config, mapping, channel export).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An artifact could not be constructed from its config.
    #[error("Invalid artifact: {0}")]
    Record(#[from] RecordError),

    /// Writing the module to disk failed.
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    /// The target manifest could not be patched.
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
}

/// Errors that arise from loading configuration inputs.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading an input file.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The tool configuration file is not valid TOML for the expected schema.
    #[error("Invalid TOML in {}: {message}", path.display())]
    InvalidToml {
        /// Path to the offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A JSON input (mapping table or channel export) could not be parsed.
    #[error("Invalid JSON in {}: {message}", path.display())]
    InvalidJson {
        /// Path to the offending file (empty when parsed from a string).
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A module or class name could not be derived from the channel metadata.
    #[error("Cannot derive module name: {0}")]
    InvalidModuleName(String),
}

/// Errors that arise while patching the module manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest does not exist; it must be scaffolded before export.
    #[error("manifest not found: {}", path.display())]
    NotFound {
        /// Expected manifest location.
        path: PathBuf,
    },

    /// The manifest could not be read or written.
    #[error("manifest I/O error on {}: {source}", path.display())]
    Io {
        /// Manifest location.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The manifest text has no usable class declaration.
    #[error("{}: {source}", path.display())]
    Structure {
        /// Manifest location.
        path: PathBuf,
        /// What is wrong with the manifest text.
        source: StructureError,
    },
}

/// Structural problems found when parsing manifest text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// No line starts with a named class declaration.
    #[error("no class declaration found")]
    MissingClass,

    /// The class header never reaches its opening brace.
    #[error("class '{0}' has no opening brace")]
    UnterminatedHeader(String),
}
