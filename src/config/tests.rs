use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_playdeck_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("PLAYDECK_CONFIG_PATH", "/tmp/playdeck-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/playdeck-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/xdg-config-home")
            .join("playdeck")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("playdeck")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_the_stock_player() {
    let s = Settings::default();
    assert_eq!(s.storage.subdir, "audioFiles");
    assert_eq!(s.storage.extension, ".mp3");
    assert_eq!(s.storage.accepted_media_type, "audio/mpeg");
    assert_eq!(s.audio.default_volume, 0.5);
    assert!(!s.playback.shuffle);
    assert!(!s.playback.repeat);
    assert!(s.validate().is_ok());
}

#[test]
fn explicit_data_root_wins_over_platform_dir() {
    let storage = StorageSettings {
        data_root: Some(PathBuf::from("/srv/music-data")),
        ..StorageSettings::default()
    };
    assert_eq!(storage.resolve_data_root(), PathBuf::from("/srv/music-data"));
}

#[test]
fn partial_toml_keeps_defaults_for_missing_keys() {
    let s: Settings = toml::from_str(
        r#"
[controls]
seek_seconds = 10
"#,
    )
    .unwrap();
    assert_eq!(s.controls.seek_seconds, 10);
    assert_eq!(s.controls.volume_step, 0.05);
    assert_eq!(s.storage.subdir, "audioFiles");
}

#[test]
fn validate_rejects_out_of_range_volume_and_empty_subdir() {
    let mut s = Settings::default();
    s.audio.default_volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.storage.subdir = "  ".into();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.tick_ms = 0;
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[storage]
data_root = "/tmp/playdeck-root"
subdir = "tracks"

[playback]
shuffle = true
repeat = true

[audio]
default_volume = 0.8
tick_ms = 100
quit_fade_out_ms = 0

[controls]
seek_seconds = 9

[ui]
header_text = "hello"

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("PLAYDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("PLAYDECK__AUDIO__TICK_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.storage.data_root, Some(PathBuf::from("/tmp/playdeck-root")));
    assert_eq!(s.storage.subdir, "tracks");
    assert_eq!(s.storage.extension, ".mp3");
    assert!(s.playback.shuffle);
    assert!(s.playback.repeat);
    assert_eq!(s.audio.default_volume, 0.8);
    assert_eq!(s.audio.tick_ms, 100);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.controls.seek_seconds, 9);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.logging.level, "debug");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
tick_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("PLAYDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("PLAYDECK__AUDIO__TICK_MS", "40");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.tick_ms, 40);
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("nowhere.toml");
    let _g1 = EnvGuard::set("PLAYDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("PLAYDECK__AUDIO__TICK_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.storage.subdir, "audioFiles");
    assert_eq!(s.audio.tick_ms, 250);
}
