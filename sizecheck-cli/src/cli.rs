use std::path::PathBuf;

use clap::Parser;
use sizecheck_core::SizeUnit;

const STOP_HELP: &str =
    "Press q, Esc or Ctrl-C during a scan to stop it and report what was found so far.";

/// sizecheck - find what is eating your disk
#[derive(Parser, Debug)]
#[command(name = "sizecheck")]
#[command(about = "Report folders and files larger than a size threshold")]
#[command(version)]
#[command(after_help = STOP_HELP)]
pub struct Args {
    /// Directory to scan (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Size an entry must exceed to be reported, in --unit
    #[arg(short, long, default_value_t = 1.0)]
    pub threshold: f64,

    /// Unit of the threshold: B, KB, MB, GB or TB
    #[arg(short, long, default_value = "GB")]
    pub unit: SizeUnit,

    /// Items between progress updates
    #[arg(long, default_value_t = 50)]
    pub batch_size: usize,

    /// Skip the counting pass (progress shows no total)
    #[arg(long)]
    pub no_count: bool,

    /// Write results to FILE (.csv, .html, .json, anything else is text)
    #[arg(short, long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Errors listed in the report before the rest are summarized
    #[arg(long, default_value_t = 20)]
    pub max_errors: usize,

    /// No progress line
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Threshold as the user typed it, e.g. "1.5 GB"
    pub fn threshold_label(&self) -> String {
        format!("{} {}", self.threshold, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["sizecheck"]).unwrap();
        assert_eq!(args.path, PathBuf::from("."));
        assert_eq!(args.threshold, 1.0);
        assert_eq!(args.unit, SizeUnit::GB);
        assert_eq!(args.batch_size, 50);
        assert!(!args.no_count);
        assert_eq!(args.max_errors, 20);
        assert_eq!(args.threshold_label(), "1 GB");
    }

    #[test]
    fn test_threshold_and_unit() {
        let args = Args::try_parse_from([
            "sizecheck",
            "/data",
            "-t",
            "2.5",
            "--unit",
            "mb",
            "--no-count",
        ])
        .unwrap();
        assert_eq!(args.path, PathBuf::from("/data"));
        assert_eq!(args.threshold, 2.5);
        assert_eq!(args.unit, SizeUnit::MB);
        assert!(args.no_count);
        assert_eq!(args.threshold_label(), "2.5 MB");
    }

    #[test]
    fn test_rejects_unknown_unit() {
        let parsed = Args::try_parse_from(["sizecheck", "--unit", "PB"]);
        assert!(parsed.is_err());
    }
}
