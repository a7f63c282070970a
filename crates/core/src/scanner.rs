//! Directory discovery for bulk imports.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime};
use rayon::prelude::*;
use walkdir::{DirEntry, WalkDir};

use crate::domain::{FileFormat, ImageInput};
use crate::error::{Error, Result};

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn supported_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_string_lossy().into_owned();
    FileFormat::is_supported_extension(&ext).then_some(ext)
}

fn mtime_as_capture_time(path: &Path) -> Option<NaiveDateTime> {
    let modified: SystemTime = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Local>::from(modified).naive_local())
}

/// Find importable files under `dir`, sorted by path.
///
/// Hidden files and directories are skipped, as are extensions the catalog
/// does not import. The capture time is the file's modification time; no file
/// content is read.
pub fn scan_directory(dir: &Path, recursive: bool) -> Result<Vec<ImageInput>> {
    if !dir.exists() {
        return Err(Error::DirectoryNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }
    let root = std::path::absolute(dir)?;

    let mut walker = WalkDir::new(&root).follow_links(true);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let candidates: Vec<(PathBuf, String)> = walker
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let ext = supported_extension(entry.path())?;
            Some((entry.into_path(), ext))
        })
        .collect();

    let mut inputs: Vec<ImageInput> = candidates
        .into_par_iter()
        .filter_map(|(path, ext)| {
            let Some(capture_time) = mtime_as_capture_time(&path) else {
                tracing::warn!(path = %path.display(), "skipping file without readable mtime");
                return None;
            };
            let mut input = ImageInput::new(path, capture_time);
            input.file_format = Some(FileFormat::from_extension(&ext));
            Some(input)
        })
        .collect();

    inputs.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(dir = %root.display(), files = inputs.len(), recursive, "scanned directory");
    Ok(inputs)
}
