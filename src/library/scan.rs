use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::LibraryError;

use super::model::Track;

/// Path of the managed directory under `root`.
pub fn managed_dir(root: &Path, subdir: &str) -> PathBuf {
    root.join(subdir)
}

/// List the regular files directly inside `dir` whose names end with
/// `extension`.
///
/// The match is a plain, case-sensitive suffix test. Subdirectories are not
/// entered and the result keeps directory enumeration order. Any read error,
/// including a missing directory, fails the whole listing.
pub fn scan(dir: &Path, extension: &str) -> Result<Vec<Track>, LibraryError> {
    let mut tracks: Vec<Track> = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if name.ends_with(extension) {
            tracks.push(Track {
                name: name.to_string(),
                path: entry.path().to_path_buf(),
            });
        }
    }

    Ok(tracks)
}
