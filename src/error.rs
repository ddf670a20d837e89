//! Error types for quickmaps
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::coordinate::CoordinateField;

/// Result type alias using QuickmapsError
pub type Result<T> = std::result::Result<T, QuickmapsError>;

/// Unified error type for quickmaps operations
#[derive(Debug, Error)]
pub enum QuickmapsError {
    // -------------------------------------------------------------------------
    // Validation Errors
    // -------------------------------------------------------------------------
    /// A coordinate failed cleaning, compression or the stored-value invariant.
    ///
    /// `field` names the offending sub-field when the failure is local to one
    /// of them; structural failures leave it empty.
    #[error("{message}")]
    InvalidCoordinate {
        field: Option<CoordinateField>,
        message: String,
    },

    #[error("{0}")]
    Required(String),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Stored value corrupted: {0}")]
    Corruption(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuickmapsError {
    /// Invalid value for a single sub-field
    pub fn invalid_field(field: CoordinateField, message: impl Into<String>) -> Self {
        QuickmapsError::InvalidCoordinate {
            field: Some(field),
            message: message.into(),
        }
    }

    /// Invalid structure (not attributable to one sub-field)
    pub fn invalid(message: impl Into<String>) -> Self {
        QuickmapsError::InvalidCoordinate {
            field: None,
            message: message.into(),
        }
    }

    /// The sub-field this error is about, if any
    pub fn field(&self) -> Option<CoordinateField> {
        match self {
            QuickmapsError::InvalidCoordinate { field, .. } => *field,
            _ => None,
        }
    }
}

impl From<bincode::Error> for QuickmapsError {
    fn from(e: bincode::Error) -> Self {
        QuickmapsError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for QuickmapsError {
    fn from(e: serde_json::Error) -> Self {
        QuickmapsError::Serialization(e.to_string())
    }
}
