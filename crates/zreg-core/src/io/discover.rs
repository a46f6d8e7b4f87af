use std::fs;
use std::path::{Path, PathBuf};

use crate::consts::OUTPUT_EXTENSION;
use crate::error::{Result, ZregError};

/// File name of the written volume for one channel.
pub fn output_file_name(prefix: &str, stem: &str, channel: usize) -> String {
    format!("{prefix}{stem}_ch{channel}.{OUTPUT_EXTENSION}")
}

/// Regular files in `dir` whose name contains `stem`, sorted by file name.
///
/// The sort order is the depth order. Names listed in `exclude` (previous
/// outputs) are skipped.
pub fn discover_inputs(dir: &Path, stem: &str, exclude: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.contains(stem) && !exclude.iter().any(|e| e.as_str() == name) {
            files.push(entry.path());
        }
    }

    if files.is_empty() {
        return Err(ZregError::EmptyInputSet {
            dir: dir.to_path_buf(),
            stem: stem.to_string(),
        });
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
