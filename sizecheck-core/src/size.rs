use std::fmt;
use std::str::FromStr;

use crate::{Result, ScanError};

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;
const TB: u64 = GB * 1024;

/// Format bytes into human-readable string
pub fn format_size(bytes: u64) -> String {
    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Calculate percentage of size relative to total
pub fn size_percentage(size: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (size as f64 / total as f64) * 100.0
    }
}

/// Format a number with thousand separators (e.g., 1,234,567)
pub fn format_count(n: u64) -> String {
    if n < 1000 {
        return n.to_string();
    }

    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Unit a threshold is entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeUnit {
    B,
    KB,
    MB,
    #[default]
    GB,
    TB,
}

impl SizeUnit {
    pub fn multiplier(self) -> u64 {
        match self {
            SizeUnit::B => 1,
            SizeUnit::KB => KB,
            SizeUnit::MB => MB,
            SizeUnit::GB => GB,
            SizeUnit::TB => TB,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeUnit::B => "B",
            SizeUnit::KB => "KB",
            SizeUnit::MB => "MB",
            SizeUnit::GB => "GB",
            SizeUnit::TB => "TB",
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeUnit {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "B" => Ok(SizeUnit::B),
            "K" | "KB" => Ok(SizeUnit::KB),
            "M" | "MB" => Ok(SizeUnit::MB),
            "G" | "GB" => Ok(SizeUnit::GB),
            "T" | "TB" => Ok(SizeUnit::TB),
            other => {
                let message = format!("unknown unit '{other}'");
                Err(ScanError::InvalidThreshold(message))
            }
        }
    }
}

/// Convert a threshold given in `unit` to a byte count, truncating any
/// fractional byte. Saturates at `u64::MAX`.
pub fn threshold_bytes(value: f64, unit: SizeUnit) -> Result<u64> {
    if !value.is_finite() || value < 0.0 {
        return Err(ScanError::InvalidThreshold(format!(
            "{value} {unit} is not a non-negative size"
        )));
    }
    // `as` saturates for floats above u64::MAX
    Ok((value * unit.multiplier() as f64) as u64)
}
