use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::ingest::sequence::{group_sequences, FileSequence};

/// Directories left behind by file servers and desktops; never scanned.
pub const CHAFF_DIRS: [&str; 5] = [
    ".AppleDB",
    ".AppleDesktop",
    "Network Trash Folder",
    "Temporary Items",
    ".apdisk",
];

/// Walks `root` and groups every directory's files into sequences, ordered
/// by directory and then by sequence name.
pub fn scan_sequences(root: &Path) -> Result<Vec<FileSequence>> {
    if !root.is_dir() {
        return Err(anyhow!("{:?} is not a directory", root));
    }

    let mut files_by_dir: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    let walker = WalkDir::new(root).sort_by_file_name().into_iter();

    for entry in walker.filter_entry(|e| e.depth() == 0 || !is_chaff(e)) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() {
            let dir = entry.path().parent().map(Path::to_path_buf).unwrap_or_default();
            files_by_dir.entry(dir).or_default().push(entry.into_path());
        }
    }

    let sequences: Vec<FileSequence> = files_by_dir.into_values().flat_map(group_sequences).collect();
    debug!("Found {} sequences under {:?}", sequences.len(), root);
    Ok(sequences)
}

/// First frame of every sequence whose extension matches.
pub fn select_first_frames(sequences: &[FileSequence], extension: &str) -> Vec<PathBuf> {
    sequences
        .iter()
        .filter(|seq| seq.has_extension(extension))
        .map(|seq| {
            debug!("{:?} ({} frames)", seq.first_frame(), seq.frame_count());
            seq.first_frame().to_path_buf()
        })
        .collect()
}

fn is_chaff(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.') || CHAFF_DIRS.contains(&s))
        .unwrap_or(false)
}
