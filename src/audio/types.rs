//! Media element contract, the notifications it emits, and the command set
//! understood by the audio thread.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Transport surface of a playable media element.
///
/// Calls never block on playback; outcomes come back as [`MediaEvent`]s.
pub trait MediaElement {
    /// Replace the current source. The new source starts paused at zero.
    fn load(&mut self, path: &Path);
    fn play(&mut self);
    fn pause(&mut self);
    /// Jump to `position` within the current source.
    fn seek(&mut self, position: Duration);
    /// Set output volume; `1.0` is unity gain.
    fn set_volume(&mut self, volume: f32);
}

/// Notifications published by a media element.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Playback position moved.
    TimeUpdate(Duration),
    /// A source was loaded; its total length, when known.
    LoadedMetadata(Option<Duration>),
    /// The current source played to its end.
    Ended,
    /// Loading or playing failed.
    Failed(String),
}

#[derive(Debug)]
pub(super) enum AudioCmd {
    Load(PathBuf),
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
    /// Quit the audio thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}
