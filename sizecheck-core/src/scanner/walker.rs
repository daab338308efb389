use std::cmp::Ordering;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use jwalk::{DirEntry, DirEntryIter, Parallelism, WalkDir};

/// Immediate file entries of one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListing {
    pub path: PathBuf,
    /// Names of every non-directory child, symlinks included
    pub files: Vec<OsString>,
}

/// One unit of traversal output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEvent {
    /// A directory was listed
    Directory(DirListing),
    /// A directory or entry could not be read and was skipped
    Unreadable {
        path: PathBuf,
        message: String,
        /// The failure is on the scan root itself
        is_root: bool,
    },
}

/// Serial, deterministic directory walker.
///
/// Yields every reachable directory exactly once, in pre-order. Symbolic
/// links are reported as files and never followed, so self-referential
/// links cannot loop.
pub struct Walker {
    entries: DirEntryIter<((), ())>,
    current: Option<DirListing>,
    pending: Option<WalkEvent>,
}

impl Walker {
    pub fn new(root: &Path) -> Self {
        let entries = WalkDir::new(root)
            .skip_hidden(false)
            .follow_links(false)
            .parallelism(Parallelism::Serial)
            .process_read_dir(|_depth, _path, _read_dir_state, children| {
                // Files of a directory must come out contiguously, right
                // after the directory itself
                children.sort_by(order_children);
            })
            .into_iter();

        Self {
            entries,
            current: None,
            pending: None,
        }
    }

    /// Start a listing for `entry`, or report it when it could not be read
    fn open(&mut self, entry: DirEntry<((), ())>) -> Option<WalkEvent> {
        let path = entry.path();
        match entry.read_children_error {
            Some(err) => Some(WalkEvent::Unreadable {
                path,
                message: err.to_string(),
                is_root: entry.depth == 0,
            }),
            None => {
                self.current = Some(DirListing {
                    path,
                    files: Vec::new(),
                });
                None
            }
        }
    }
}

impl Iterator for Walker {
    type Item = WalkEvent;

    fn next(&mut self) -> Option<WalkEvent> {
        if let Some(event) = self.pending.take() {
            return Some(event);
        }

        loop {
            let entry = match self.entries.next() {
                Some(Ok(entry)) => entry,
                Some(Err(err)) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .or_else(|| self.current.as_ref().map(|l| l.path.clone()))
                        .unwrap_or_default();
                    return Some(WalkEvent::Unreadable {
                        path,
                        message: err.to_string(),
                        is_root: err.depth() == 0,
                    });
                }
                None => return self.current.take().map(WalkEvent::Directory),
            };

            if entry.file_type.is_dir() {
                let finished = self.current.take().map(WalkEvent::Directory);
                let unreadable = self.open(entry);
                match finished {
                    Some(listing) => {
                        self.pending = unreadable;
                        return Some(listing);
                    }
                    None if unreadable.is_some() => return unreadable,
                    None => continue,
                }
            }

            match self.current.as_mut() {
                Some(listing) if entry.parent_path() == listing.path => {
                    listing.files.push(entry.file_name);
                }
                _ => tracing::debug!(
                    path = %entry.path().display(),
                    "file outside the current listing, skipped"
                ),
            }
        }
    }
}

/// Errors first, then non-directories, then directories, each by name
fn order_children(
    a: &Result<DirEntry<((), ())>, jwalk::Error>,
    b: &Result<DirEntry<((), ())>, jwalk::Error>,
) -> Ordering {
    match (a, b) {
        (Ok(a), Ok(b)) => a
            .file_type
            .is_dir()
            .cmp(&b.file_type.is_dir())
            .then_with(|| a.file_name.cmp(&b.file_name)),
        (Err(_), Ok(_)) => Ordering::Less,
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Err(_)) => Ordering::Equal,
    }
}
