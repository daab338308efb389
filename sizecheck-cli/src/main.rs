mod cli;
mod export;
mod progress_line;
mod report;
mod stop_keys;

use std::io::{self, Write};
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use sizecheck_core::{
    CancellationToken, ScanConfig, ScanCoordinator, ScanMessage, ScanRequest, threshold_bytes,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Args;
use export::{ExportContext, export};
use progress_line::ProgressLine;
use report::print_report;
use stop_keys::StopKeys;

/// Environment variable holding the log filter (e.g. `sizecheck_core=debug`)
const LOG_ENV: &str = "SIZECHECK_LOG";

/// How long to wait for a key or a message before checking the other
const TICK: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging();

    let args = Args::parse();
    let threshold = threshold_bytes(args.threshold, args.unit)?;

    let config = ScanConfig {
        batch_size: args.batch_size,
        count_first: !args.no_count,
    };
    let coordinator = ScanCoordinator::new(ScanRequest::new(&args.path, threshold), config);
    let cancel_token = coordinator.cancellation_token();
    let (progress_rx, scan_handle) = coordinator.spawn()?;

    let mut progress = ProgressLine::new(!args.quiet);
    let stop_keys = StopKeys::listen()?;
    wait_for_scan(&progress_rx, &mut progress, &stop_keys, &cancel_token)?;
    // Leave raw mode before anything is printed
    drop(stop_keys);
    progress.finish()?;

    let result = scan_handle
        .join()
        .map_err(|_| eyre!("scanner thread panicked"))?
        .wrap_err_with(|| format!("Cannot scan {}", args.path.display()))?;

    let mut stdout = io::stdout().lock();
    print_report(&mut stdout, &result, args.max_errors)?;

    if let Some(path) = &args.export {
        let ctx = ExportContext::now(args.threshold_label());
        let format = export(path, &result, &ctx)?;
        writeln!(
            stdout,
            "\nResults exported to {} ({:?})",
            path.display(),
            format
        )?;
    }

    Ok(())
}

/// Feed scan messages to the progress line until the scan ends, cancelling
/// it when a stop key is pressed
fn wait_for_scan(
    rx: &Receiver<ScanMessage>,
    progress: &mut ProgressLine,
    stop_keys: &StopKeys,
    cancel_token: &CancellationToken,
) -> Result<()> {
    loop {
        if stop_keys.poll(TICK)? && !cancel_token.is_cancelled() {
            info!("stop key pressed, cancelling scan");
            cancel_token.cancel();
        }

        // poll() already waited when keys are being read
        let mut wait = if stop_keys.is_active() {
            Duration::ZERO
        } else {
            TICK
        };
        loop {
            match rx.recv_timeout(wait) {
                Ok(msg) => {
                    progress.update(&msg)?;
                    if msg.is_terminal() {
                        return Ok(());
                    }
                    wait = Duration::ZERO;
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            }
        }
    }
}

/// Logs go to stderr so they never mix with the report
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn populate(root: &std::path::Path) {
        for d in 0..4 {
            let dir = root.join(format!("d{d}"));
            fs::create_dir(&dir).unwrap();
            for f in 0..4 {
                fs::write(dir.join(format!("f{f}")), [0u8; 16]).unwrap();
            }
        }
    }

    fn config() -> ScanConfig {
        ScanConfig {
            batch_size: 1,
            count_first: true,
        }
    }

    #[test]
    fn test_cancelled_scan_is_reported() {
        let temp = TempDir::new().unwrap();
        populate(temp.path());

        let coordinator = ScanCoordinator::new(ScanRequest::new(temp.path(), 0), config());
        let cancel = coordinator.cancellation_token();
        cancel.cancel();
        let (rx, handle) = coordinator.spawn().unwrap();

        let mut progress = ProgressLine::new(false);
        let keys = StopKeys::disabled();
        wait_for_scan(&rx, &mut progress, &keys, &cancel).unwrap();
        let result = handle.join().unwrap().unwrap();
        assert!(result.is_cancelled());

        let mut out = Vec::new();
        print_report(&mut out, &result, 20).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Scan was cancelled, totals are partial"));
        assert!(text.contains("Files over 0 B (0):\n - none"));
    }

    #[test]
    fn test_wait_returns_after_completed_scan() {
        let temp = TempDir::new().unwrap();
        populate(temp.path());

        let coordinator = ScanCoordinator::new(ScanRequest::new(temp.path(), 0), config());
        let cancel = coordinator.cancellation_token();
        let (rx, handle) = coordinator.spawn().unwrap();

        let mut progress = ProgressLine::new(false);
        let keys = StopKeys::disabled();
        wait_for_scan(&rx, &mut progress, &keys, &cancel).unwrap();
        let result = handle.join().unwrap().unwrap();

        assert!(!cancel.is_cancelled());
        assert!(!result.is_cancelled());
        assert_eq!(result.file_count, 16);
    }
}
