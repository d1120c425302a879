//! Player controller: every user action and every notification from the
//! storage bridge or the media element goes through here.

use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::audio::{MediaElement, MediaEvent};
use crate::config::Settings;
use crate::error::LibraryError;
use crate::library::{self, Track};
use crate::selection::FileHandle;
use crate::storage::{StorageBridge, StorageReply};

use super::model::{PlaybackState, Session};

pub const STATUS_NOTHING_STAGED: &str = "No files selected for upload.";
pub const STATUS_UPLOADING: &str = "Uploading...";
pub const STATUS_UPLOADED: &str = "Upload complete.";
pub const STATUS_LOADED: &str = "Files loaded successfully.";
pub const STATUS_EMPTY: &str = "No MP3 files found.";
pub const STATUS_ROOT_PENDING: &str = "Library location not resolved yet.";
pub const STATUS_NO_TRACK: &str = "Select a track first.";
pub const STATUS_STALE_CURRENT: &str = "Current track is gone; starting from the top.";

/// Startup configuration handed to the controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Managed directory name under the data root.
    pub subdir: String,
    /// File name suffix a track must have to be listed.
    pub extension: String,
    /// Declared media type a staged file must have to be kept.
    pub accepted_media_type: String,
    pub volume: f32,
    pub shuffle: bool,
    pub repeat: bool,
}

impl ControllerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            subdir: settings.storage.subdir.clone(),
            extension: settings.storage.extension.clone(),
            accepted_media_type: settings.storage.accepted_media_type.clone(),
            volume: settings.audio.default_volume,
            shuffle: settings.playback.shuffle,
            repeat: settings.playback.repeat,
        }
    }
}

/// What `upload` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Nothing staged; no request sent.
    NothingSelected,
    /// Staged files are being read; the storage bridge answers with
    /// `Imported` either way.
    Submitted,
}

/// Result of `toggle_play_pause`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Playing,
    Paused,
    /// There is no current track to start.
    NoTrack,
}

pub struct Controller<M: MediaElement> {
    pub session: Session,
    config: ControllerConfig,
    /// Data root reported by the storage bridge; cached for the session.
    managed_root: Option<PathBuf>,
    storage: StorageBridge,
    media: M,
}

impl<M: MediaElement> Controller<M> {
    pub fn new(config: ControllerConfig, storage: StorageBridge, media: M) -> Self {
        let session = Session::new(config.volume, config.shuffle, config.repeat);
        Self {
            session,
            config,
            managed_root: None,
            storage,
            media,
        }
    }

    /// Push the starting volume to the media element and ask the storage
    /// bridge where the library lives. The first refresh happens when that
    /// answer arrives.
    pub fn start(&mut self) {
        self.media.set_volume(self.session.volume);
        self.storage.request_managed_root();
    }

    #[cfg(test)]
    pub(crate) fn managed_root(&self) -> Option<&std::path::Path> {
        self.managed_root.as_deref()
    }

    pub fn storage(&self) -> &StorageBridge {
        &self.storage
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    fn managed_dir(&self) -> Option<PathBuf> {
        self.managed_root
            .as_deref()
            .map(|root| library::managed_dir(root, &self.config.subdir))
    }

    // ----- selection & upload -----

    /// Stage `handles` for upload, keeping only the accepted media type.
    /// Replaces any earlier staging. Returns how many were kept.
    pub fn select_files(&mut self, handles: Vec<FileHandle>) -> usize {
        let offered = handles.len();
        self.session.pending_upload = handles
            .into_iter()
            .filter(|h| h.media_type == self.config.accepted_media_type)
            .collect();

        let kept = self.session.pending_upload.len();
        debug!(offered, kept, "staged files");
        kept
    }

    /// Hand the staged files to the storage bridge. Reading happens off the
    /// UI thread; a read failure comes back as `Imported(Err(..))` and
    /// leaves the staging in place.
    pub fn upload(&mut self) -> UploadOutcome {
        if self.session.pending_upload.is_empty() {
            self.session.status = STATUS_NOTHING_STAGED.to_string();
            return UploadOutcome::NothingSelected;
        }

        self.session.status = STATUS_UPLOADING.to_string();
        info!(count = self.session.pending_upload.len(), "submitting upload");
        self.storage.import_staged(self.session.pending_upload.clone());
        UploadOutcome::Submitted
    }

    // ----- library -----

    /// Re-read the managed directory and replace the library wholesale.
    ///
    /// The status line ends up with the outcome; on failure the library keeps
    /// its previous contents.
    pub fn refresh_library(&mut self) -> Result<usize, LibraryError> {
        let Some(dir) = self.managed_dir() else {
            self.session.status = STATUS_ROOT_PENDING.to_string();
            return Err(LibraryError::RootUnresolved);
        };

        match library::scan(&dir, &self.config.extension) {
            Ok(tracks) => {
                let count = tracks.len();
                self.session.library = tracks;
                self.session.clamp_selection();
                self.session.status = if count > 0 {
                    STATUS_LOADED.to_string()
                } else {
                    STATUS_EMPTY.to_string()
                };
                debug!(count, "library refreshed");
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "library refresh failed");
                self.session.status = format!("Error loading files: {e}");
                Err(e)
            }
        }
    }

    /// Ask the storage bridge to delete `name`. The library is refreshed when
    /// the reply arrives, whatever the outcome.
    pub fn remove_track(&mut self, name: &str) {
        let Some(dir) = self.managed_dir() else {
            self.session.status = STATUS_ROOT_PENDING.to_string();
            return;
        };
        self.storage.delete_file(dir.join(name));
    }

    // ----- transport -----

    pub fn toggle_play_pause(&mut self) -> Transport {
        if self.session.is_playing() {
            self.media.pause();
            self.session.playback = PlaybackState::Paused;
            return Transport::Paused;
        }

        if self.session.current_track.is_none() {
            self.session.status = STATUS_NO_TRACK.to_string();
            return Transport::NoTrack;
        }

        self.media.play();
        self.session.playback = PlaybackState::Playing;
        Transport::Playing
    }

    /// Jump to `time`. The media element is responsible for any bounds.
    pub fn seek(&mut self, time: Duration) {
        self.media.seek(time);
        self.session.current_time = time;
    }

    /// Seek relative to the current position, stopping at zero.
    pub fn seek_by(&mut self, secs: i64) {
        let delta = Duration::from_secs(secs.unsigned_abs());
        let target = if secs >= 0 {
            self.session.current_time + delta
        } else {
            self.session.current_time.saturating_sub(delta)
        };
        self.seek(target);
    }

    /// Set the output volume as given; callers keep it in `[0, 1]`.
    pub fn set_volume(&mut self, volume: f32) {
        self.media.set_volume(volume);
        self.session.volume = volume;
    }

    /// Move the volume by `delta`, staying inside `[0, 1]`.
    pub fn nudge_volume(&mut self, delta: f32) {
        let v = (self.session.volume + delta).clamp(0.0, 1.0);
        self.set_volume(v);
    }

    pub fn toggle_shuffle(&mut self) {
        self.session.shuffle = !self.session.shuffle;
    }

    pub fn toggle_repeat(&mut self) {
        self.session.repeat = !self.session.repeat;
    }

    /// Make `name` the current track and start it.
    pub fn select_track(&mut self, name: &str) {
        let path = match self.session.library.iter().find(|t| t.name == name) {
            Some(Track { path, .. }) => path.clone(),
            None => match self.managed_dir() {
                Some(dir) => dir.join(name),
                None => {
                    self.session.status = STATUS_ROOT_PENDING.to_string();
                    return;
                }
            },
        };

        debug!(track = name, "starting track");
        self.session.current_track = Some(name.to_string());
        self.session.current_time = Duration::ZERO;
        self.session.duration = None;
        if let Some(i) = self.session.index_of(name) {
            self.session.selected = i;
        }

        self.media.load(&path);
        self.media.play();
        self.session.playback = PlaybackState::Playing;
    }

    /// Advance to the following track, or a random one with shuffle on.
    ///
    /// A current track that is no longer in the library restarts from the
    /// first entry.
    pub fn next_track(&mut self) {
        let len = self.session.library.len();
        if len == 0 {
            return;
        }

        let next = if self.session.shuffle {
            rand::thread_rng().gen_range(0..len)
        } else {
            let current = self.session.current_track.as_deref();
            match current.and_then(|name| self.session.index_of(name)) {
                Some(i) => (i + 1) % len,
                None => {
                    if current.is_some() {
                        self.session.status = STATUS_STALE_CURRENT.to_string();
                    }
                    0
                }
            }
        };

        let name = self.session.library[next].name.clone();
        self.select_track(&name);
    }

    // ----- notifications -----

    pub fn on_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate(t) => self.session.current_time = t,
            MediaEvent::LoadedMetadata(d) => self.session.duration = d,
            MediaEvent::Ended => {
                // The current track advances even when playback is about to
                // stop, so the next entry is shown paused.
                self.next_track();
                if !self.session.repeat && !self.session.shuffle {
                    self.media.pause();
                    self.session.playback = PlaybackState::Paused;
                }
            }
            MediaEvent::Failed(msg) => {
                self.session.status = format!("Playback error: {msg}");
                if self.session.is_playing() {
                    self.session.playback = PlaybackState::Paused;
                }
            }
        }
    }

    pub fn on_storage_reply(&mut self, reply: StorageReply) {
        match reply {
            StorageReply::ManagedRoot(root) => {
                info!(root = %root.display(), "library root resolved");
                self.managed_root = Some(root);
                let _ = self.refresh_library();
            }
            // The follow-up refresh replaces the status with the library count.
            StorageReply::Imported(Ok(_)) => {
                self.session.pending_upload.clear();
                self.session.status = STATUS_UPLOADED.to_string();
                let _ = self.refresh_library();
            }
            StorageReply::Imported(Err(e)) => {
                warn!(error = %e, "upload failed");
                self.session.status = format!("Error: {e}");
            }
            StorageReply::Deleted { path, result } => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                self.session.status = match result {
                    Ok(_) => format!("{name} removed."),
                    Err(e) => {
                        warn!(error = %e, "remove failed");
                        format!("Error removing file: {e}")
                    }
                };
                let _ = self.refresh_library();
            }
        }
    }
}
