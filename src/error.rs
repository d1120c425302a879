//! Error types shared across the storage, library, selection and audio layers.
//!
//! None of these escape to the user as-is: the controller turns each one into
//! a status line, keeping the underlying cause text verbatim.

use std::io;
use std::path::PathBuf;

/// Failures reported by the storage bridge.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Malformed request (empty batch, empty path).
    #[error("{0}")]
    InvalidInput(String),

    /// Creating the managed directory or writing a file failed. Files written
    /// before the failure stay on disk.
    #[error("Failed to upload files: {name}: {source}")]
    WriteFailure {
        name: String,
        #[source]
        source: io::Error,
    },

    /// Removing a file failed (not found, permissions, ...).
    #[error("Failed to delete file: {}: {source}", path.display())]
    DeleteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A staged file could not be read, so nothing was imported.
    #[error(transparent)]
    Read(#[from] SelectionError),
}

/// Failures while listing the managed directory.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("library location not resolved yet")]
    RootUnresolved,

    /// The walkdir error already names the offending path.
    #[error(transparent)]
    ReadFailure(#[from] walkdir::Error),
}

/// Failures while reading a staged file into memory.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("Failed to read {name}: {source}")]
    ReadFailure {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Failures inside the audio thread.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    Device(String),

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
}
