use std::io::{self, Write};
use std::path::Path;

use sizecheck_core::{ScanResult, format_count, format_size, size_percentage};

/// Print the console summary of a scan
pub fn print_report(
    out: &mut impl Write,
    result: &ScanResult,
    max_errors: usize,
) -> io::Result<()> {
    writeln!(out, "Scanned: {}", result.root.display())?;
    if result.is_cancelled() {
        writeln!(out, "Scan was cancelled, totals are partial")?;
    }
    writeln!(out, "Total size: {}", format_size(result.total_size))?;
    writeln!(out, "Total folders: {}", format_count(result.folder_count))?;
    writeln!(out, "Total files: {}", format_count(result.file_count))?;
    writeln!(out, "Scan time: {:.2}s", result.elapsed.as_secs_f64())?;

    let threshold = format_size(result.threshold);

    writeln!(out)?;
    writeln!(
        out,
        "Folders over {} ({}):",
        threshold,
        result.large_folders.len()
    )?;
    if result.large_folders.is_empty() {
        writeln!(out, " - none")?;
    }
    for folder in &result.large_folders {
        print_entry(out, &folder.path, folder.size, result.total_size)?;
    }

    writeln!(out)?;
    writeln!(out, "Files over {} ({}):", threshold, result.large_files.len())?;
    if result.large_files.is_empty() {
        writeln!(out, " - none")?;
    }
    for file in &result.large_files {
        print_entry(out, &file.path, file.size, result.total_size)?;
    }

    if !result.errors.is_empty() {
        writeln!(out)?;
        writeln!(out, "Errors ({}):", format_count(result.errors.len() as u64))?;
        for error in result.errors.iter().take(max_errors) {
            writeln!(out, " - {}: {}", error.path.display(), error.message)?;
        }
        let hidden = result.errors.len().saturating_sub(max_errors);
        if hidden > 0 {
            writeln!(out, " ... and {} more", format_count(hidden as u64))?;
        }
    }

    Ok(())
}

fn print_entry(out: &mut impl Write, path: &Path, size: u64, total: u64) -> io::Result<()> {
    writeln!(
        out,
        " - {}: {} ({:.1}%)",
        path.display(),
        format_size(size),
        size_percentage(size, total)
    )
}
