use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DurError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Cannot access target {path}: {source}")]
    TargetInaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Cannot access {path}: {source}")]
    EntryAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DurError {
    /// Classify an I/O failure on a single traversal entry
    pub fn entry_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::PermissionDenied {
            DurError::PermissionDenied(path)
        } else {
            DurError::EntryAccess { path, source }
        }
    }

    /// Whether this error rejects the scan target itself (the only fatal class)
    pub fn is_invalid_target(&self) -> bool {
        matches!(
            self,
            DurError::PathNotFound(_)
                | DurError::NotADirectory(_)
                | DurError::TargetInaccessible { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DurError>;
