//! Unified error hierarchy for LoadWise
//!
//! The analytics core never fails; these errors cover the edges of the crate:
//! reading histories, writing reports, and loading configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all LoadWise operations
#[derive(Debug, Error)]
pub enum LoadWiseError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// History import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Report export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// History import errors
#[derive(Debug, Error)]
pub enum ImportError {
    /// No importer handles this file
    #[error("Unsupported format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Format-specific parsing error
    #[error("Parse error in {format} at line {line}: {reason}")]
    Parse {
        format: String,
        line: u64,
        reason: String,
    },

    /// Required column or field missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Date that matches none of the accepted formats
    #[error("Invalid date: {value}")]
    InvalidDate { value: String },

    /// File contained no records
    #[error("No records found in {path}")]
    Empty { path: PathBuf },
}

/// Report export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for LoadWise operations
pub type Result<T> = std::result::Result<T, LoadWiseError>;

impl LoadWiseError {
    /// Get error severity level
    ///
    /// A `Warning` lets a batch skip the offending input and carry on.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LoadWiseError::Import(ImportError::Empty { .. }) => ErrorSeverity::Warning,
            LoadWiseError::Import(ImportError::InvalidDate { .. }) => ErrorSeverity::Warning,
            LoadWiseError::Validation(_) => ErrorSeverity::Warning,
            LoadWiseError::Configuration(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            LoadWiseError::Import(ImportError::UnsupportedFormat { path }) => {
                format!(
                    "Cannot read {}: use a .csv or .json history file",
                    path.display()
                )
            }
            LoadWiseError::Import(ImportError::MissingField { field }) => {
                format!("Your history file is missing the '{}' column", field)
            }
            LoadWiseError::Import(ImportError::Empty { path }) => {
                format!(
                    "{} has no sessions yet. Log a few runs to get an assessment.",
                    path.display()
                )
            }
            LoadWiseError::Configuration(reason) => {
                format!("Configuration is invalid: {}", reason)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Unusable configuration, nothing can be assessed
    Critical,
    /// Operation failed
    Error,
    /// Operation degraded but usable
    Warning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = LoadWiseError::Import(ImportError::Empty {
            path: PathBuf::from("history.csv"),
        });
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = LoadWiseError::Import(ImportError::Parse {
            format: "JSON".to_string(),
            line: 1,
            reason: "expected value".to_string(),
        });
        assert_eq!(err.severity(), ErrorSeverity::Error);

        let err = LoadWiseError::Configuration("acute_window".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_messages() {
        let err = LoadWiseError::Import(ImportError::UnsupportedFormat {
            path: PathBuf::from("history.fit"),
        });
        assert!(err.user_message().contains(".csv or .json"));

        let err = LoadWiseError::Import(ImportError::MissingField {
            field: "resting_heart_rate".to_string(),
        });
        assert!(err.user_message().contains("resting_heart_rate"));
    }

    #[test]
    fn test_from_conversions() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: LoadWiseError = io.into();
        assert!(matches!(err, LoadWiseError::Io(_)));

        let err: LoadWiseError = ExportError::UnsupportedFormat("pdf".to_string()).into();
        assert!(err.to_string().contains("pdf"));
    }
}
