//! # Error Types
//!
//! Structured error types for culvert_core. Expected domain conditions
//! (an incomplete section, a degenerate haunch, a column with no clear
//! height) are *not* errors: they surface as `Option`/placeholder values.
//! `CulvertError` is reserved for things the caller has to react to, such as
//! an unreadable project file or a rejected import.
//!
//! ## Example
//!
//! ```rust
//! use culvert_core::errors::{CulvertError, CulvertResult};
//!
//! fn parse_cell_width(raw: &str) -> CulvertResult<f64> {
//!     raw.trim().parse::<f64>().map_err(|_| {
//!         CulvertError::invalid_input("B", raw, "Cell width must be a number")
//!     })
//! }
//!
//! assert!(parse_cell_width("4000").is_ok());
//! assert!(parse_cell_width("wide").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for culvert_core operations
pub type CulvertResult<T> = Result<T, CulvertError>;

/// Structured error type for engine operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CulvertError {
    /// An input value is invalid (not a number, wrong shape, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The section cannot be resolved into geometry
    #[error("Invalid section geometry: {}", .issues.join("; "))]
    InvalidGeometry { issues: Vec<String> },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// A project import was rejected; the in-memory state is untouched
    #[error("Import failed for '{source_name}': {reason}")]
    ImportFailed { source_name: String, reason: String },
}

impl CulvertError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CulvertError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CulvertError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CulvertError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create an ImportFailed error
    pub fn import_failed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        CulvertError::ImportFailed {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CulvertError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CulvertError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CulvertError::InvalidInput { .. } => "INVALID_INPUT",
            CulvertError::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            CulvertError::FileError { .. } => "FILE_ERROR",
            CulvertError::FileLocked { .. } => "FILE_LOCKED",
            CulvertError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CulvertError::ImportFailed { .. } => "IMPORT_FAILED",
        }
    }
}

impl From<serde_json::Error> for CulvertError {
    fn from(e: serde_json::Error) -> Self {
        CulvertError::serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CulvertError::invalid_input("H", "-4200", "Clear height must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CulvertError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CulvertError::import_failed("a.json", "bad").error_code(), "IMPORT_FAILED");
        assert_eq!(
            CulvertError::InvalidGeometry { issues: vec!["H".into()] }.error_code(),
            "INVALID_GEOMETRY"
        );
    }

    #[test]
    fn test_invalid_geometry_message_lists_issues() {
        let error = CulvertError::InvalidGeometry {
            issues: vec!["H must be positive".into(), "UT must be positive".into()],
        };
        assert_eq!(
            error.to_string(),
            "Invalid section geometry: H must be positive; UT must be positive"
        );
    }

    #[test]
    fn test_only_lock_is_recoverable() {
        assert!(CulvertError::file_locked("p.json", "me", "now").is_recoverable());
        assert!(!CulvertError::serialization("eof").is_recoverable());
    }
}
