//! Session model types: `Session` and `PlaybackState`.
//!
//! The `Session` struct holds the in-memory library cache, the current track
//! and every playback/UI flag. It is rebuilt from disk, never persisted.

use std::time::Duration;

use crate::library::Track;
use crate::selection::FileHandle;

/// The playback state of the application.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Playback session state.
#[derive(Debug)]
pub struct Session {
    /// Tracks in directory enumeration order.
    pub library: Vec<Track>,
    /// Name of the loaded track. May go stale after a delete.
    pub current_track: Option<String>,
    pub playback: PlaybackState,
    pub current_time: Duration,
    pub duration: Option<Duration>,
    pub volume: f32,
    pub shuffle: bool,
    pub repeat: bool,
    /// Staged files not yet copied into the managed directory.
    pub pending_upload: Vec<FileHandle>,
    /// The one line of user-facing feedback.
    pub status: String,

    /// Cursor position in `library`.
    pub selected: usize,
    /// Path prompt contents while staging files.
    pub path_input: Option<String>,
}

impl Session {
    /// Create an empty session with the given starting volume and flags.
    pub fn new(volume: f32, shuffle: bool, repeat: bool) -> Self {
        Self {
            library: Vec::new(),
            current_track: None,
            playback: PlaybackState::Stopped,
            current_time: Duration::ZERO,
            duration: None,
            volume,
            shuffle,
            repeat,
            pending_upload: Vec::new(),
            status: String::new(),
            selected: 0,
            path_input: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback == PlaybackState::Playing
    }

    /// Position of `name` in the library.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.library.iter().position(|t| t.name == name)
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.library.get(self.selected)
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self) {
        if !self.library.is_empty() {
            self.selected = (self.selected + 1) % self.library.len();
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self) {
        if !self.library.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.library.len() - 1);
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.library.len().saturating_sub(1);
    }

    /// Keep the cursor inside the library after it was replaced.
    pub(super) fn clamp_selection(&mut self) {
        if self.selected >= self.library.len() {
            self.selected = self.library.len().saturating_sub(1);
        }
    }

    pub fn enter_path_input(&mut self) {
        self.path_input = Some(String::new());
    }

    /// Leave the path prompt, returning what was typed.
    pub fn take_path_input(&mut self) -> Option<String> {
        self.path_input.take()
    }

    pub fn push_path_char(&mut self, c: char) {
        if let Some(buf) = self.path_input.as_mut() {
            buf.push(c);
        }
    }

    pub fn pop_path_char(&mut self) {
        if let Some(buf) = self.path_input.as_mut() {
            buf.pop();
        }
    }
}
