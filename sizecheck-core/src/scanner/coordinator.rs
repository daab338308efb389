use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, info, warn};

use super::aggregate::Aggregator;
use super::progress::{ScanMessage, ScanPhase, ScanProgress};
use super::walker::{WalkEvent, Walker};
use crate::record::{ErrorRecord, ScanRequest, ScanResult, ScanStatus};
use crate::{Result, ScanError};

/// Scanner configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Items (files or directories) between progress updates and
    /// cancellation checks
    pub batch_size: usize,
    /// Run a count pass first so progress has a denominator
    pub count_first: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            count_first: true,
        }
    }
}

/// Cancellation token for stopping scans
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of one coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Counting,
    Measuring,
    Completed,
    Cancelled,
    Failed,
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanState::Idle => "idle",
            ScanState::Counting => "counting",
            ScanState::Measuring => "measuring",
            ScanState::Completed => "completed",
            ScanState::Cancelled => "cancelled",
            ScanState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Counts processed items and tells when a batch boundary is crossed
struct BatchClock {
    batch_size: u64,
    done: u64,
}

impl BatchClock {
    fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1) as u64,
            done: 0,
        }
    }

    fn advance(&mut self, items: u64) -> bool {
        let before = self.done / self.batch_size;
        self.done += items;
        self.done / self.batch_size > before
    }
}

/// Runs one count-then-measure scan
pub struct ScanCoordinator {
    request: ScanRequest,
    config: ScanConfig,
    cancel_token: CancellationToken,
    state: ScanState,
}

impl ScanCoordinator {
    pub fn new(request: ScanRequest, config: ScanConfig) -> Self {
        Self {
            request,
            config,
            cancel_token: CancellationToken::new(),
            state: ScanState::Idle,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Make a finished coordinator runnable again. The cancellation token is
    /// replaced so an earlier cancel does not stop the next scan.
    pub fn reset(&mut self) {
        self.state = ScanState::Idle;
        self.cancel_token = CancellationToken::new();
    }

    /// Scan on a dedicated thread.
    /// Returns a receiver for progress messages and the handle yielding the
    /// result.
    pub fn spawn(mut self) -> Result<(Receiver<ScanMessage>, JoinHandle<Result<ScanResult>>)> {
        let (tx, rx) = crossbeam_channel::unbounded();

        let handle = std::thread::Builder::new()
            .name("sizecheck-scanner".into())
            .spawn(move || self.run(&tx))?;

        Ok((rx, handle))
    }

    /// Synchronous scan. Every state change and batch boundary is reported
    /// on `tx`; a dropped receiver does not stop the scan.
    pub fn run(&mut self, tx: &Sender<ScanMessage>) -> Result<ScanResult> {
        if self.state != ScanState::Idle {
            return Err(ScanError::AlreadyRun(self.state));
        }

        let root = match validate_root(self.request.root()) {
            Ok(root) => root,
            Err(err) => return Err(self.fail(tx, err)),
        };
        info!(
            root = %root.display(),
            threshold = self.request.threshold(),
            "starting scan"
        );

        let items_total = if self.config.count_first {
            self.transition(ScanState::Counting, tx);
            match self.count(&root, tx) {
                Some(total) => Some(total),
                None => {
                    let aggregator = Aggregator::new(self.request.threshold());
                    return Ok(self.cancel(tx, aggregator, root, Duration::ZERO));
                }
            }
        } else {
            None
        };

        self.transition(ScanState::Measuring, tx);
        self.measure(root, items_total, tx)
    }

    /// First pass: directories plus files, best effort.
    /// `None` when cancelled.
    fn count(&self, root: &Path, tx: &Sender<ScanMessage>) -> Option<u64> {
        let mut clock = BatchClock::new(self.config.batch_size);

        for event in Walker::new(root) {
            match event {
                WalkEvent::Directory(listing) => {
                    let items = 1 + listing.files.len() as u64;
                    if clock.advance(items)
                        && !self.checkpoint(ScanPhase::Counting, &clock, None, tx)
                    {
                        return None;
                    }
                }
                WalkEvent::Unreadable { path, message, .. } => {
                    debug!(path = %path.display(), %message, "skipped while counting");
                }
            }
        }

        info!(items = clock.done, "count pass finished");
        Some(clock.done)
    }

    /// Second pass: walk, measure, rank
    fn measure(
        &mut self,
        root: PathBuf,
        items_total: Option<u64>,
        tx: &Sender<ScanMessage>,
    ) -> Result<ScanResult> {
        let started = Instant::now();
        let mut aggregator = Aggregator::new(self.request.threshold());
        let mut clock = BatchClock::new(self.config.batch_size);

        for event in Walker::new(&root) {
            match event {
                WalkEvent::Directory(listing) => {
                    let mut folder_size = 0u64;
                    for name in &listing.files {
                        folder_size += aggregator.add_file(listing.path.join(name));
                        if clock.advance(1)
                            && !self.checkpoint(ScanPhase::Measuring, &clock, items_total, tx)
                        {
                            return Ok(self.cancel(tx, aggregator, root, started.elapsed()));
                        }
                    }

                    aggregator.add_folder(listing.path, folder_size);
                    if clock.advance(1)
                        && !self.checkpoint(ScanPhase::Measuring, &clock, items_total, tx)
                    {
                        return Ok(self.cancel(tx, aggregator, root, started.elapsed()));
                    }
                }
                WalkEvent::Unreadable {
                    path,
                    message,
                    is_root: true,
                } => {
                    return Err(self.fail(tx, ScanError::RootUnreadable { path, message }));
                }
                WalkEvent::Unreadable { path, message, .. } => {
                    aggregator.record_error(ErrorRecord::new(path, message));
                }
            }
        }

        let elapsed = started.elapsed();
        self.state = ScanState::Completed;
        info!(
            total_size = aggregator.total_size(),
            files = aggregator.file_count(),
            folders = aggregator.folder_count(),
            errors = aggregator.errors().len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "scan completed"
        );
        let result = aggregator.finish(root, ScanStatus::Completed, elapsed);
        let _ = tx.send(ScanMessage::Completed);
        Ok(result)
    }

    /// Batch boundary: stop if cancelled, otherwise report progress.
    /// Returns whether to keep going.
    fn checkpoint(
        &self,
        phase: ScanPhase,
        clock: &BatchClock,
        items_total: Option<u64>,
        tx: &Sender<ScanMessage>,
    ) -> bool {
        if self.cancel_token.is_cancelled() {
            return false;
        }

        // The tree may have grown since counting; never report done > total
        let progress = ScanProgress {
            phase,
            items_done: clock.done,
            items_total: items_total.map(|total| total.max(clock.done)),
        };
        debug!(?phase, done = progress.items_done, total = ?progress.items_total, "batch");
        let _ = tx.send(ScanMessage::Progress(progress));
        true
    }

    fn transition(&mut self, state: ScanState, tx: &Sender<ScanMessage>) {
        debug!(from = %self.state, to = %state, "state change");
        self.state = state;
        let _ = tx.send(ScanMessage::Phase(state));
    }

    fn cancel(
        &mut self,
        tx: &Sender<ScanMessage>,
        aggregator: Aggregator,
        root: PathBuf,
        elapsed: Duration,
    ) -> ScanResult {
        info!(during = %self.state, "scan cancelled");
        self.state = ScanState::Cancelled;
        let _ = tx.send(ScanMessage::Cancelled);
        aggregator.finish(root, ScanStatus::Cancelled, elapsed)
    }

    fn fail(&mut self, tx: &Sender<ScanMessage>, err: ScanError) -> ScanError {
        warn!(error = %err, "scan failed");
        self.state = ScanState::Failed;
        let _ = tx.send(ScanMessage::Failed(err.to_string()));
        err
    }
}

/// The root must exist, be a directory and be listable before any traversal
/// starts
fn validate_root(root: &Path) -> Result<PathBuf> {
    let metadata = match fs::metadata(root) {
        Ok(m) => m,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(ScanError::PathNotFound(root.to_path_buf()));
        }
        Err(err) => {
            return Err(ScanError::RootUnreadable {
                path: root.to_path_buf(),
                message: err.to_string(),
            });
        }
    };

    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    // Only the open matters; the handle is dropped right away
    if let Err(err) = fs::read_dir(root) {
        return Err(ScanError::RootUnreadable {
            path: root.to_path_buf(),
            message: err.to_string(),
        });
    }

    Ok(root.canonicalize().unwrap_or_else(|_| root.to_path_buf()))
}
