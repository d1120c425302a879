use std::{env, path::PathBuf};

use super::schema::Settings;

/// Precedence, lowest first: struct defaults, the TOML file, then
/// `PLAYDECK__SECTION__KEY` variables (e.g. `PLAYDECK__AUDIO__TICK_MS=100`).
impl Settings {
    /// Build settings from every layer. A missing file is not an error; a
    /// file that exists but does not parse is.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("PLAYDECK")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.audio.default_volume) {
            return Err("audio.default_volume must be within [0, 1]".to_string());
        }
        if self.audio.tick_ms == 0 {
            return Err("audio.tick_ms must be >= 1".to_string());
        }
        if self.storage.subdir.trim().is_empty() {
            return Err("storage.subdir must not be empty".to_string());
        }
        if self.storage.extension.is_empty() {
            return Err("storage.extension must not be empty".to_string());
        }
        Ok(())
    }
}

/// Pick the config file to read.
///
/// `PLAYDECK_CONFIG_PATH` is taken as-is when set, even if nothing exists
/// there; the file layer is optional, so that only means defaults plus env.
/// Without it the XDG location from [`default_config_path`] is used.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("PLAYDECK_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// `$XDG_CONFIG_HOME/playdeck/config.toml`, else
/// `$HOME/.config/playdeck/config.toml`. `None` when neither variable is set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("playdeck").join("config.toml"))
}
