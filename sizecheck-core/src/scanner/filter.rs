use crate::record::{FileRecord, FolderRecord};

/// Anything ranked by byte size
pub trait SizedEntry {
    fn size(&self) -> u64;
}

impl SizedEntry for FileRecord {
    fn size(&self) -> u64 {
        self.size
    }
}

impl SizedEntry for FolderRecord {
    fn size(&self) -> u64 {
        self.size
    }
}

/// Decides what counts as large and ranks it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdFilter {
    threshold: u64,
}

impl ThresholdFilter {
    pub fn new(threshold: u64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Strictly greater: an entry exactly at the threshold is not large
    pub fn is_large(&self, size: u64) -> bool {
        size > self.threshold
    }

    /// Keep the large entries, largest first. Equal sizes stay in the order
    /// they were discovered.
    pub fn rank<T: SizedEntry>(&self, candidates: impl IntoIterator<Item = T>) -> Vec<T> {
        let mut large: Vec<T> = candidates
            .into_iter()
            .filter(|entry| self.is_large(entry.size()))
            .collect();
        // `sort_by` is stable
        large.sort_by(|a, b| b.size().cmp(&a.size()));
        large
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(name: &str, size: u64) -> FileRecord {
        FileRecord {
            path: PathBuf::from(name),
            size,
        }
    }

    #[test]
    fn test_is_large_is_strict() {
        let filter = ThresholdFilter::new(1000);
        assert!(!filter.is_large(999));
        assert!(!filter.is_large(1000));
        assert!(filter.is_large(1001));
    }

    #[test]
    fn test_zero_threshold_excludes_empty_entries() {
        let filter = ThresholdFilter::new(0);
        assert!(!filter.is_large(0));
        assert!(filter.is_large(1));
    }

    #[test]
    fn test_rank_sorts_descending_and_drops_small() {
        let filter = ThresholdFilter::new(10);
        let ranked = filter.rank(vec![
            file("a", 11),
            file("b", 10),
            file("c", 500),
            file("d", 40),
        ]);
        let names: Vec<_> = ranked.iter().map(|f| f.path.to_str().unwrap()).collect();
        assert_eq!(names, vec!["c", "d", "a"]);
    }

    #[test]
    fn test_rank_keeps_discovery_order_for_ties() {
        let filter = ThresholdFilter::new(0);
        let ranked = filter.rank(vec![
            file("first", 7),
            file("big", 9),
            file("second", 7),
            file("third", 7),
        ]);
        let names: Vec<_> = ranked.iter().map(|f| f.path.to_str().unwrap()).collect();
        assert_eq!(names, vec!["big", "first", "second", "third"]);
    }

    #[test]
    fn test_rank_folders() {
        let filter = ThresholdFilter::new(1);
        let ranked = filter.rank(vec![
            FolderRecord {
                path: PathBuf::from("small"),
                size: 2,
            },
            FolderRecord {
                path: PathBuf::from("large"),
                size: 20,
            },
        ]);
        assert_eq!(ranked[0].path, PathBuf::from("large"));
        assert_eq!(ranked.len(), 2);
    }
}
