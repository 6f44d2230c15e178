//! Error handling for rollcall-store
//!
//! Wraps rollcall-core ExError with store-specific helpers

use std::path::Path;

use rollcall_core::errors::{ExError, ExErrorKind, RollcallError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error for a file operation
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    let kind = if err.kind() == std::io::ErrorKind::NotFound {
        ExErrorKind::NotFound
    } else {
        ExErrorKind::Io
    };
    ExError::new(kind)
        .with_op(operation)
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

/// Attach the file a domain error came from
///
/// Parse errors already carry their line; the path completes the location.
pub fn in_file(operation: &str, path: &Path, err: RollcallError) -> ExError {
    ExError::from(err)
        .with_op(operation)
        .with_path(path.display().to_string())
}

/// Attach the operation to a domain error raised outside any file
pub fn domain_error(operation: &str, err: RollcallError) -> ExError {
    ExError::from(err).with_op(operation)
}

/// Another writer holds the store lock
pub fn locked(dir: &Path) -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op("acquire_writer_lock")
        .with_path(dir.display().to_string())
        .with_message("Another writer holds the store lock")
}

/// The metadata index changed on disk since the store was opened
pub fn stale_store(dir: &Path, expected: &str, found: &str) -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op("append_segment")
        .with_path(dir.display().to_string())
        .with_message(format!(
            "Store changed since it was opened: expected newest label '{}', found '{}'",
            expected, found
        ))
}

/// A store already exists where a new one was requested
pub fn store_exists(dir: &Path) -> ExError {
    ExError::new(ExErrorKind::AlreadyExists)
        .with_op("init")
        .with_path(dir.display().to_string())
        .with_message("A store already exists in this directory")
}

/// The metadata index holds no labels
pub fn empty_metadata(path: &Path) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("open")
        .with_path(path.display().to_string())
        .with_message("Metadata index lists no labels")
}

/// Configuration file could not be parsed
pub fn config_error(path: &Path, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("load_config")
        .with_path(path.display().to_string())
        .with_message(reason)
}
