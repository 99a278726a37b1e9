use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to open, read or write a document file.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{} not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("permission denied: {}", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Capacity ceilings that no document could satisfy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LimitsError {
    #[error("a document needs room for at least one line")]
    NoLines,

    #[error("line storage of {got} bytes is below the minimum of {min}")]
    LineTooShort { got: usize, min: usize },

    #[error("the viewport needs at least one row")]
    NoRows,
}

impl StorageError {
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound { path },
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied { path },
            _ => StorageError::Io { path, source: err },
        }
    }
}
