//! Global error handling for dupsync
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use thiserror::Error;

/// Global error type for dupsync operations
#[derive(Error, Debug)]
pub enum DupSyncError {
    /// A directory entry that is not part of a duplicity backup chain
    #[error("Unrecognized backup file: {0}")]
    UnrecognizedBackupFile(String),

    /// A timestamp token that does not describe a valid UTC instant
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A generation bucket holding both full and incremental files
    #[error("Inconsistent generation: {0}")]
    InconsistentGeneration(String),

    /// Source or destination is not a directory
    #[error("Directory \"{0}\" not found")]
    MissingDirectory(String),

    /// File system errors, with the failing operation attached
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Specialized Result type for dupsync operations
pub type Result<T> = std::result::Result<T, DupSyncError>;

/// Creates a DupSyncError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::DupSyncError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for attaching the failing operation to IO errors
pub trait ResultExt<T> {
    /// Add additional context to an error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T> ResultExt<T> for std::result::Result<T, io::Error> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|source| DupSyncError::Io {
            context: f().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked(value: u32) -> Result<u32> {
        ensure!(value < 10, InvalidArgument, "value {} is too large", value);
        Ok(value)
    }

    #[test]
    fn test_ensure_macro() {
        assert_eq!(checked(3).unwrap(), 3);
        let err = checked(12).unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: value 12 is too large");
    }

    #[test]
    fn test_io_context() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result.with_context(|| "Failed to copy a to b").unwrap_err();
        assert_eq!(err.to_string(), "Failed to copy a to b: gone");
        assert!(matches!(err, DupSyncError::Io { .. }));
    }

    #[test]
    fn test_missing_directory_message() {
        let err = error!(MissingDirectory, "{}", "/backups/dst");
        assert_eq!(err.to_string(), "Directory \"/backups/dst\" not found");
    }
}
