use super::coordinator::ScanState;

/// Message sent from the scan thread to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanMessage {
    /// Coordinator entered a new state
    Phase(ScanState),
    /// Batch boundary reached
    Progress(ScanProgress),
    /// Scan completed
    Completed,
    /// Scan was cancelled
    Cancelled,
    /// Scan could not run
    Failed(String),
}

impl ScanMessage {
    /// No message follows a terminal one
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ScanMessage::Completed | ScanMessage::Cancelled | ScanMessage::Failed(_)
        )
    }
}

/// Which traversal a progress update belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Counting,
    Measuring,
}

/// Scanning progress counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanProgress {
    pub phase: ScanPhase,
    /// Files plus directories handled so far in this phase
    pub items_done: u64,
    /// Denominator from the count pass; `None` while counting or when the
    /// count pass was skipped
    pub items_total: Option<u64>,
}

impl ScanProgress {
    /// Whole percent complete, 0 when the total is unknown
    pub fn percent(&self) -> u8 {
        match self.items_total {
            Some(total) if total > 0 => (self.items_done.min(total) * 100 / total) as u8,
            _ => 0,
        }
    }
}
