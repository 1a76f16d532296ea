//! Corpus discovery

use crate::error::{FeatureError, Result};
use crate::parsers::has_extension;
use ignore::DirEntry;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Source files under `root` with one of `extensions`, sorted by path.
///
/// Sorting keeps row order reproducible regardless of directory listing order.
pub fn discover_files(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(FeatureError::Io {
            path: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let walker = ignore::WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .build();

    let mut files: Vec<PathBuf> = walker
        .filter_map(readable_entry)
        .filter(|e| e.path().is_file())
        .filter(|e| has_extension(e.path(), extensions))
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    Ok(files)
}

/// Keep readable walk entries; log and drop the rest.
fn readable_entry(entry: std::result::Result<DirEntry, ignore::Error>) -> Option<DirEntry> {
    match entry {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!("Skipping unreadable corpus entry: {}", e);
            None
        }
    }
}
