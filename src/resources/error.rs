//! Typed error variants for artifact construction and export.
//!
//! [`RecordError`] is returned when a construction config fails
//! validation; [`ExportError`] when writing the module to disk fails.
//! Callers convert to [`anyhow::Error`] via `?`.

use std::path::PathBuf;

use thiserror::Error;

use crate::error::ManifestError;

/// Errors that arise when validating an artifact's construction config.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The artifact has no name.
    #[error("artifact for '{path}' has an empty name")]
    EmptyName {
        /// Target path of the nameless artifact.
        path: String,
    },

    /// The target path is not absolute.
    #[error("artifact '{name}': path '{path}' is not absolute")]
    RelativePath {
        /// Artifact name.
        name: String,
        /// Offending path.
        path: String,
    },

    /// A required field is missing or empty.
    #[error("artifact '{name}': missing {field}")]
    MissingField {
        /// Artifact name.
        name: String,
        /// Name of the missing field.
        field: &'static str,
    },

    /// The permission mode is not an octal number.
    #[error("artifact '{name}': invalid permission mode '{mode}'")]
    InvalidMode {
        /// Artifact name.
        name: String,
        /// Offending mode string.
        mode: String,
    },

    /// Base64-encoded contents could not be decoded.
    #[error("artifact '{name}': contents are not valid base64: {source}")]
    InvalidBase64 {
        /// Artifact name.
        name: String,
        /// Decoder error.
        source: base64::DecodeError,
    },
}

/// Errors that arise while exporting artifacts into a module directory.
#[derive(Error, Debug)]
pub enum ExportError {
    /// An output directory could not be created (e.g. a file is in the way).
    #[error("cannot create directory {}: {source}", path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An artifact could not be written.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Patching the manifest failed.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}
