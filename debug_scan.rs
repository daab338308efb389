// Run with: cargo run --example debug_scan -- /path/to/scan [threshold-bytes]
// Registered as an [[example]] of sizecheck-core

use sizecheck_core::{ScanConfig, ScanCoordinator, ScanMessage, ScanRequest};
use std::path::PathBuf;
use std::time::Instant;

fn main() {
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let threshold = args.next().and_then(|t| t.parse().ok()).unwrap_or(0);

    println!("Scanning: {:?} (threshold {} bytes)", path, threshold);

    let coordinator =
        ScanCoordinator::new(ScanRequest::new(path, threshold), ScanConfig::default());
    let (rx, handle) = coordinator.spawn().expect("failed to spawn scanner thread");

    let start = Instant::now();
    for msg in rx {
        let t = start.elapsed().as_secs_f64();
        match msg {
            ScanMessage::Phase(state) => println!("[{:>6.2}s] PHASE {}", t, state),
            ScanMessage::Progress(p) => println!(
                "[{:>6.2}s] {:?} done={:<8} total={:<8} ({}%)",
                t,
                p.phase,
                p.items_done,
                p.items_total
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "?".into()),
                p.percent()
            ),
            ScanMessage::Completed => println!("[{:>6.2}s] COMPLETED", t),
            ScanMessage::Cancelled => println!("[{:>6.2}s] CANCELLED", t),
            ScanMessage::Failed(e) => println!("[{:>6.2}s] FAILED: {}", t, e),
        }
    }

    match handle.join().unwrap() {
        Ok(result) => {
            println!(
                "\nFinal: {} folders, {} files, {} total, {} large, {} errors",
                result.folder_count,
                result.file_count,
                sizecheck_core::format_size(result.total_size),
                result.large_folders.len() + result.large_files.len(),
                result.errors.len()
            );
            for error in result.errors.iter().take(10) {
                println!("  ! {}: {}", error.path.display(), error.message);
            }
        }
        Err(e) => println!("\nScan failed: {}", e),
    }
}
