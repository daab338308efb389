use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Cannot read scan root {path}: {message}")]
    RootUnreadable { path: PathBuf, message: String },

    #[error("Scan already ran on this coordinator (state: {0})")]
    AlreadyRun(crate::scanner::ScanState),

    #[error("Invalid size threshold: {0}")]
    InvalidThreshold(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// True for errors that mean the root path itself is unusable
    pub fn is_root_invalid(&self) -> bool {
        matches!(
            self,
            ScanError::PathNotFound(_)
                | ScanError::NotADirectory(_)
                | ScanError::RootUnreadable { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
