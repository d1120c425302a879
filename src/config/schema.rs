use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/playdeck/config.toml` or `~/.config/playdeck/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `PLAYDECK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub audio: AudioSettings,
    pub controls: ControlsSettings,
    pub playback: PlaybackSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Override for the platform user-data root. The managed directory lives
    /// in `<data_root>/<subdir>`.
    pub data_root: Option<PathBuf>,
    /// Name of the managed directory under the data root.
    pub subdir: String,
    /// Suffix a file name must end with to be listed (case-sensitive).
    pub extension: String,
    /// Declared media type a staged file must have to be kept.
    pub accepted_media_type: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_root: None,
            subdir: "audioFiles".to_string(),
            extension: ".mp3".to_string(),
            accepted_media_type: "audio/mpeg".to_string(),
        }
    }
}

impl StorageSettings {
    /// Resolve the data root: explicit setting, then the platform data dir,
    /// then a directory next to the working directory.
    pub fn resolve_data_root(&self) -> PathBuf {
        if let Some(root) = &self.data_root {
            return root.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("playdeck"))
            .unwrap_or_else(|| PathBuf::from("./playdeck-data"))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume applied at startup, in `[0, 1]`.
    pub default_volume: f32,
    /// How often the audio thread publishes the playback position (milliseconds).
    pub tick_ms: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            default_volume: 0.5,
            tick_ms: 250,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to seek when pressing `H` / `L`.
    pub seek_seconds: u64,
    /// Volume change per `-` / `+` press.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            seek_seconds: 5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Whether repeat starts enabled.
    pub repeat: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ Media Player ~ ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `PLAYDECK_LOG` is not set.
    pub level: String,
    /// Log file path. Defaults to `<data root>/playdeck.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
