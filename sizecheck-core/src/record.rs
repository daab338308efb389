use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

/// What to scan and where the "large" cutoff sits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    root: PathBuf,
    threshold: u64,
}

impl ScanRequest {
    pub fn new(root: impl Into<PathBuf>, threshold: u64) -> Self {
        Self {
            root: root.into(),
            threshold,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Size in bytes an entry must strictly exceed to be reported
    pub fn threshold(&self) -> u64 {
        self.threshold
    }
}

/// A file whose size exceeded the threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
}

/// A folder whose immediate size exceeded the threshold.
///
/// `size` only counts files directly inside `path`; subfolders are
/// reported on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderRecord {
    pub path: PathBuf,
    pub size: u64,
}

/// A path whose metadata or listing could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub path: PathBuf,
    pub message: String,
}

impl ErrorRecord {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// How a scan that produced a result ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScanStatus {
    Completed,
    Cancelled,
}

/// Everything a finished (or cancelled) scan found
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResult {
    pub status: ScanStatus,
    pub root: PathBuf,
    pub threshold: u64,
    /// Sum of every readable file's size
    pub total_size: u64,
    pub folder_count: u64,
    pub file_count: u64,
    /// Descending by size, ties in discovery order
    pub large_folders: Vec<FolderRecord>,
    /// Descending by size, ties in discovery order
    pub large_files: Vec<FileRecord>,
    pub errors: Vec<ErrorRecord>,
    /// Wall-clock time of the measure pass
    pub elapsed: Duration,
}

impl ScanResult {
    pub fn is_cancelled(&self) -> bool {
        self.status == ScanStatus::Cancelled
    }
}
