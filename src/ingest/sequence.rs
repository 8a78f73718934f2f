use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Numbered frames sharing a directory, head and tail, e.g.
/// `shot.0001.exr` .. `shot.0240.exr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSequence {
    pub head: String,
    pub tail: String,
    frames: Vec<(u64, PathBuf)>,
}

impl FileSequence {
    pub fn first_frame(&self) -> &Path {
        &self.frames[0].1
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn has_extension(&self, extension: &str) -> bool {
        self.first_frame()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(extension))
            .unwrap_or(false)
    }
}

/// Splits a file name into (head, frame, tail) when its stem ends in digits.
fn split_frame(file_name: &str) -> Option<(&str, u64, &str)> {
    let (stem, tail) = match file_name.rfind('.') {
        Some(dot) if dot > 0 => file_name.split_at(dot),
        _ => (file_name, ""),
    };
    let head_len = stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if head_len == stem.len() {
        return None;
    }
    let frame = stem[head_len..].parse().ok()?;
    Some((&stem[..head_len], frame, tail))
}

/// Groups the files of one directory into sequences. Files without a frame
/// number are sequences of one and never join a numbered sequence. Results
/// are ordered by head then tail.
pub fn group_sequences(files: Vec<PathBuf>) -> Vec<FileSequence> {
    // (head, tail, numbered)
    let mut groups: BTreeMap<(String, String, bool), Vec<(u64, PathBuf)>> = BTreeMap::new();

    for path in files {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()).map(str::to_owned) else {
            continue;
        };
        let numbered = split_frame(&file_name)
            .map(|(head, frame, tail)| ((head.to_string(), tail.to_string(), true), frame));
        let (key, frame) = numbered.unwrap_or_else(|| ((file_name, String::new(), false), 0));
        groups.entry(key).or_default().push((frame, path));
    }

    groups
        .into_iter()
        .map(|((head, tail, _), mut frames)| {
            frames.sort();
            FileSequence { head, tail, frames }
        })
        .collect()
}
