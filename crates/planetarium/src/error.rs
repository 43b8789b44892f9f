//! Error types for planetarium.
//!
//! This module defines all error types used throughout the planetarium crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The kind of catalog record an identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A planet record.
    Planet,
    /// A satellite record.
    Satellite,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Planet => write!(f, "planet"),
            Self::Satellite => write!(f, "satellite"),
        }
    }
}

/// The main error type for planetarium operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Lookup Errors ===
    /// No record exists for the requested identifier.
    #[error("no {kind} found with id {id}")]
    NotFound {
        /// Which collection was searched.
        kind: RecordKind,
        /// The identifier that was requested.
        id: i64,
    },

    // === Request Errors ===
    /// A required parameter was not supplied.
    #[error("parameter '{name}' is required")]
    MissingParameter {
        /// Name of the missing parameter.
        name: &'static str,
    },

    /// A parameter was supplied but could not be interpreted.
    #[error("parameter '{name}' must be an integer, got '{value}'")]
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// The raw value that was supplied.
        value: String,
    },

    /// The uploaded file's extension is not an accepted image type.
    #[error("extension '{extension}' is not allowed, expected one of jpg, jpeg, png, gif")]
    InvalidExtension {
        /// The rejected extension.
        extension: String,
    },

    /// A submitted form could not be read.
    #[error("invalid form: {message}")]
    InvalidForm {
        /// Description of what went wrong.
        message: String,
    },

    /// A query string could not be decoded.
    #[error("invalid query string: {message}")]
    InvalidQuery {
        /// Description of what went wrong.
        message: String,
    },

    // === Catalog Data Errors ===
    /// A static data file could not be read.
    #[error("failed to read catalog data at {path}: {source}")]
    DataRead {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A static data source could not be decoded.
    #[error("failed to parse {origin}: {source}")]
    DataParse {
        /// Where the data came from (file path or embedded dataset name).
        origin: String,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for planetarium operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a planet not-found error.
    #[must_use]
    pub fn planet_not_found(id: i64) -> Self {
        Self::NotFound {
            kind: RecordKind::Planet,
            id,
        }
    }

    /// Create a satellite not-found error.
    #[must_use]
    pub fn satellite_not_found(id: i64) -> Self {
        Self::NotFound {
            kind: RecordKind::Satellite,
            id,
        }
    }

    /// Create an invalid form error.
    #[must_use]
    pub fn invalid_form(message: impl Into<String>) -> Self {
        Self::InvalidForm {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error means the requested record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error was caused by the caller's input rather than the system.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::MissingParameter { .. }
                | Self::InvalidParameter { .. }
                | Self::InvalidExtension { .. }
                | Self::InvalidForm { .. }
                | Self::InvalidQuery { .. }
        )
    }

    /// A stable, machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::MissingParameter { .. } => "missing_parameter",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::InvalidExtension { .. } => "invalid_extension",
            Self::InvalidForm { .. } => "invalid_form",
            Self::InvalidQuery { .. } => "invalid_query",
            Self::DataRead { .. } | Self::Io(_) | Self::DirectoryCreate { .. } => "io_failure",
            Self::DataParse { .. } | Self::Json(_) => "data_error",
            Self::ConfigLoad(_) | Self::ConfigValidation { .. } => "config_error",
            Self::Internal(_) => "internal",
        }
    }
}
