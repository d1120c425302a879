//! Request and reply types exchanged with the storage thread.

use std::path::PathBuf;

use crate::error::StorageError;

/// One file to copy into the managed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportItem {
    pub name: String,
    pub content: Vec<u8>,
}

#[derive(Debug)]
pub enum StorageRequest {
    /// Write every item into the managed directory.
    Import(Vec<ImportItem>),
    /// Remove the file at the given path.
    Delete(PathBuf),
    /// Report the data root (parent of the managed directory).
    ManagedRoot,
    /// Stop the storage thread.
    Quit,
}

/// Exactly one reply is published per non-`Quit` request.
#[derive(Debug)]
pub enum StorageReply {
    Imported(Result<String, StorageError>),
    Deleted {
        path: PathBuf,
        result: Result<String, StorageError>,
    },
    ManagedRoot(PathBuf),
}
