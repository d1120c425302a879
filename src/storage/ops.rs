//! Filesystem operations executed by the storage thread.
//!
//! These are plain functions so they can be exercised without spinning up
//! the thread.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::StorageError;

use super::types::ImportItem;

pub const IMPORT_OK: &str = "Upload successful";
pub const DELETE_OK: &str = "File deleted successfully";

/// Copy `items` into `managed_dir`, creating it first when missing.
///
/// Existing files with the same name are overwritten. The batch is not
/// atomic: on the first failure the remaining items are skipped and the files
/// already written stay on disk.
pub fn import_files(managed_dir: &Path, items: &[ImportItem]) -> Result<String, StorageError> {
    if items.is_empty() {
        return Err(StorageError::InvalidInput(
            "No file data provided.".to_string(),
        ));
    }

    if !managed_dir.exists() {
        fs::create_dir_all(managed_dir).map_err(|source| StorageError::WriteFailure {
            name: managed_dir.display().to_string(),
            source,
        })?;
    }

    for item in items {
        let dest = managed_dir.join(&item.name);
        if let Err(source) = fs::write(&dest, &item.content) {
            warn!(file = %dest.display(), error = %source, "import aborted mid-batch");
            return Err(StorageError::WriteFailure {
                name: item.name.clone(),
                source,
            });
        }
    }

    info!(count = items.len(), dir = %managed_dir.display(), "imported files");
    Ok(IMPORT_OK.to_string())
}

/// Remove the file at `path`. The path is trusted; no check is made that it
/// lies inside the managed directory.
pub fn delete_file(path: &Path) -> Result<String, StorageError> {
    if path.as_os_str().is_empty() {
        return Err(StorageError::InvalidInput("Invalid file path".to_string()));
    }

    fs::remove_file(path).map_err(|source| {
        warn!(file = %path.display(), error = %source, "delete failed");
        StorageError::DeleteFailure {
            path: path.to_path_buf(),
            source,
        }
    })?;

    info!(file = %path.display(), "deleted file");
    Ok(DELETE_OK.to_string())
}
