//! Custom error types for the common library
//!
//! This module defines application-specific error types that can be used
//! throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for artifact storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error occurred while creating a storage directory
    #[error("Failed to create storage directory {0}: {1}")]
    CreateDir(PathBuf, #[source] std::io::Error),

    /// Error occurred while writing an artifact to disk
    #[error("Failed to write artifact {0}: {1}")]
    Write(PathBuf, #[source] std::io::Error),
}

/// Type alias for Result with StorageError
pub type StorageResult<T> = Result<T, StorageError>;
