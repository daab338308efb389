mod aggregate;
mod coordinator;
mod filter;
mod progress;
mod walker;

pub use aggregate::Aggregator;
pub use coordinator::{CancellationToken, ScanConfig, ScanCoordinator, ScanState};
pub use filter::{SizedEntry, ThresholdFilter};
pub use progress::{ScanMessage, ScanPhase, ScanProgress};
pub use walker::{DirListing, WalkEvent, Walker};
