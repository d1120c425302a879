//! File selection: what the user staged for upload, before it is copied into
//! the managed directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::SelectionError;
use crate::storage::ImportItem;

/// A user-picked file: name, declared media type, and where to read it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub media_type: String,
    pub path: PathBuf,
}

impl FileHandle {
    /// Build a handle for `path`. Returns `None` when the path has no usable
    /// file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        Some(Self {
            media_type: media_type_for(path).to_string(),
            name,
            path: path.to_path_buf(),
        })
    }

    /// Read the whole file into memory.
    pub fn read(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }
}

/// Declared media type by extension, case-insensitive.
pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());

    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("m4a") => "audio/mp4",
        _ => "application/octet-stream",
    }
}

/// Turn typed paths into handles. Files map to one handle each, directories
/// to their regular files (one level, sorted by name). Missing paths are
/// skipped.
pub fn expand(paths: &[PathBuf]) -> Vec<FileHandle> {
    let mut handles = Vec::new();

    for raw in paths {
        let path = expand_home(raw);
        if path.is_file() {
            handles.extend(FileHandle::from_path(&path));
        } else if path.is_dir() {
            let Ok(entries) = fs::read_dir(&path) else {
                continue;
            };
            let mut files: Vec<PathBuf> = entries
                .filter_map(Result::ok)
                .map(|e| e.path())
                .filter(|p| p.is_file())
                .collect();
            files.sort();
            handles.extend(files.iter().filter_map(|p| FileHandle::from_path(p)));
        }
    }

    handles
}

/// Read every handle in parallel. The first failure fails the whole batch.
pub fn read_all(handles: &[FileHandle]) -> Result<Vec<ImportItem>, SelectionError> {
    handles
        .par_iter()
        .map(|h| {
            h.read()
                .map(|content| ImportItem {
                    name: h.name.clone(),
                    content,
                })
                .map_err(|source| SelectionError::ReadFailure {
                    name: h.name.clone(),
                    source,
                })
        })
        .collect()
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
