use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use super::filter::ThresholdFilter;
use crate::record::{ErrorRecord, FileRecord, FolderRecord, ScanResult, ScanStatus};

/// Running totals of a measure pass
#[derive(Debug)]
pub struct Aggregator {
    filter: ThresholdFilter,
    total_size: u64,
    folder_count: u64,
    file_count: u64,
    large_folders: Vec<FolderRecord>,
    large_files: Vec<FileRecord>,
    errors: Vec<ErrorRecord>,
}

impl Aggregator {
    pub fn new(threshold: u64) -> Self {
        Self {
            filter: ThresholdFilter::new(threshold),
            total_size: 0,
            folder_count: 0,
            file_count: 0,
            large_folders: Vec::new(),
            large_files: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Stat one file and account for it.
    ///
    /// Every non-directory entry is a file here, links included: a link is
    /// measured by its own length, and a link to a directory counts toward
    /// `file_count` without being entered.
    ///
    /// Returns the bytes it adds to its folder: 0 when the metadata could
    /// not be read, in which case an error is recorded instead.
    pub fn add_file(&mut self, path: PathBuf) -> u64 {
        self.file_count += 1;

        // Links are measured themselves, never their target
        let size = match fs::symlink_metadata(&path) {
            Ok(meta) => meta.len(),
            Err(err) => {
                self.record_error(ErrorRecord::new(path, err.to_string()));
                return 0;
            }
        };

        self.total_size += size;
        if self.filter.is_large(size) {
            self.large_files.push(FileRecord { path, size });
        }
        size
    }

    /// Account for a folder once all of its files went through `add_file`
    pub fn add_folder(&mut self, path: PathBuf, immediate_size: u64) {
        self.folder_count += 1;
        if self.filter.is_large(immediate_size) {
            self.large_folders.push(FolderRecord {
                path,
                size: immediate_size,
            });
        }
    }

    pub fn record_error(&mut self, error: ErrorRecord) {
        warn!(path = %error.path.display(), message = %error.message, "unreadable path");
        self.errors.push(error);
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn file_count(&self) -> u64 {
        self.file_count
    }

    pub fn folder_count(&self) -> u64 {
        self.folder_count
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    /// Assemble the final result. Cancelled scans carry their counters and
    /// errors but no large entries.
    pub fn finish(self, root: PathBuf, status: ScanStatus, elapsed: Duration) -> ScanResult {
        let (large_folders, large_files) = match status {
            ScanStatus::Completed => (
                self.filter.rank(self.large_folders),
                self.filter.rank(self.large_files),
            ),
            ScanStatus::Cancelled => (Vec::new(), Vec::new()),
        };

        ScanResult {
            status,
            root,
            threshold: self.filter.threshold(),
            total_size: self.total_size,
            folder_count: self.folder_count,
            file_count: self.file_count,
            large_folders,
            large_files,
            errors: self.errors,
            elapsed,
        }
    }
}
