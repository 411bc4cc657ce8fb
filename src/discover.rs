//! Locate recalibration reports on disk and derive sample names

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::debug;

/// Report suffixes stripped from a file stem to get the sample name
const SAMPLE_SUFFIXES: [&str; 6] = [
    ".recal_data",
    "_recal_data",
    ".recal",
    "_recal",
    ".qcal",
    "_qcal",
];

/// Collect report files from the given inputs.
///
/// Explicit files are taken as-is; directories are searched recursively for
/// files with one of the accepted extensions (case-insensitive). The result
/// is sorted by path and deduplicated.
pub fn discover_reports(inputs: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            walk_dir(input, extensions, &mut files)?;
        } else {
            bail!("input path does not exist: {}", input.display());
        }
    }
    files.sort();
    files.dedup();
    debug!(count = files.len(), "discovered report files");
    Ok(files)
}

fn walk_dir(dir: &Path, extensions: &[String], files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read directory {}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, extensions, files)?;
        } else if has_extension(&path, extensions) {
            files.push(path);
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Derive a sample name from a report path.
///
/// The file stem is used with at most one known report suffix stripped, so
/// `NA12878.recal_data.table` and `NA12878_recal.txt` both map to `NA12878`.
pub fn sample_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    for suffix in SAMPLE_SUFFIXES {
        if let Some(name) = stem.strip_suffix(suffix) {
            if !name.is_empty() {
                return name.to_string();
            }
        }
    }
    stem.to_string()
}
