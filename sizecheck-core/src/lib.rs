pub mod error;
pub mod record;
pub mod scanner;
pub mod size;

#[cfg(all(test, unix))]
mod testing;

pub use error::{Result, ScanError};
pub use record::{ErrorRecord, FileRecord, FolderRecord, ScanRequest, ScanResult, ScanStatus};
pub use scanner::{
    Aggregator, CancellationToken, DirListing, ScanConfig, ScanCoordinator, ScanMessage,
    ScanPhase, ScanProgress, ScanState, SizedEntry, ThresholdFilter, WalkEvent, Walker,
};
pub use size::{SizeUnit, format_count, format_size, size_percentage, threshold_bytes};
