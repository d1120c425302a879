use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::error::StorageError;
use crate::selection::{self, FileHandle};

use super::ops;
use super::types::{StorageReply, StorageRequest};

/// Handle to the storage thread, the only writer of the managed directory.
///
/// Every call returns immediately; the outcome arrives later as a
/// [`StorageReply`] on the channel given to [`StorageBridge::new`].
pub struct StorageBridge {
    tx: Sender<StorageRequest>,
    /// Lets off-thread work answer without going through the storage thread.
    replies: Sender<StorageReply>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl StorageBridge {
    /// Spawn the storage thread for `<root>/<subdir>`.
    pub fn new(root: PathBuf, subdir: String, replies: Sender<StorageReply>) -> Self {
        let (tx, rx) = mpsc::channel::<StorageRequest>();
        let join = spawn_storage_thread(root, subdir, rx, replies.clone());
        Self {
            tx,
            replies,
            join: Mutex::new(Some(join)),
        }
    }

    /// Read `handles` on the rayon pool, then queue the import. A failed
    /// read is answered with `Imported(Err(..))` and nothing is written.
    pub fn import_staged(&self, handles: Vec<FileHandle>) {
        let tx = self.tx.clone();
        let replies = self.replies.clone();
        rayon::spawn(move || match selection::read_all(&handles) {
            Ok(items) => {
                debug!(count = items.len(), "staged files read");
                if tx.send(StorageRequest::Import(items)).is_err() {
                    warn!("storage thread is gone; upload dropped");
                }
            }
            Err(e) => {
                warn!(error = %e, "upload aborted while reading");
                let _ = replies.send(StorageReply::Imported(Err(StorageError::from(e))));
            }
        });
    }

    pub fn delete_file(&self, path: PathBuf) {
        self.send(StorageRequest::Delete(path));
    }

    pub fn request_managed_root(&self) {
        self.send(StorageRequest::ManagedRoot);
    }

    /// Stop the thread once queued requests are done and wait for it.
    pub fn shutdown(&self) {
        self.send(StorageRequest::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }

    pub(super) fn send(&self, req: StorageRequest) {
        if self.tx.send(req).is_err() {
            warn!("storage thread is gone; request dropped");
        }
    }
}

fn spawn_storage_thread(
    root: PathBuf,
    subdir: String,
    rx: Receiver<StorageRequest>,
    replies: Sender<StorageReply>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let managed_dir = root.join(&subdir);
        debug!(dir = %managed_dir.display(), "storage thread started");

        while let Ok(req) = rx.recv() {
            let reply = match req {
                StorageRequest::Import(items) => {
                    StorageReply::Imported(ops::import_files(&managed_dir, &items))
                }
                StorageRequest::Delete(path) => {
                    let result = ops::delete_file(&path);
                    StorageReply::Deleted { path, result }
                }
                StorageRequest::ManagedRoot => StorageReply::ManagedRoot(root.clone()),
                StorageRequest::Quit => break,
            };

            // The UI side hung up; nobody is left to answer.
            if replies.send(reply).is_err() {
                break;
            }
        }

        debug!("storage thread stopped");
    })
}
