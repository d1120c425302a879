use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

const LOG_ENV: &str = "PLAYDECK_LOG";
const LOG_FILE: &str = "playdeck.log";

/// Where log lines go when no file is configured.
pub fn log_path(settings: &LoggingSettings, data_root: &Path) -> PathBuf {
    settings
        .file
        .clone()
        .unwrap_or_else(|| data_root.join(LOG_FILE))
}

/// Install the global subscriber. The terminal owns stdout, so everything
/// is written to a file. `PLAYDECK_LOG` wins over the configured level.
pub fn init(
    settings: &LoggingSettings,
    data_root: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = log_path(settings, data_root);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| e as Box<dyn std::error::Error>)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_prefers_configured_file() {
        let root = Path::new("/data/playdeck");
        let mut settings = LoggingSettings::default();
        assert_eq!(log_path(&settings, root), root.join("playdeck.log"));

        settings.file = Some(PathBuf::from("/tmp/custom.log"));
        assert_eq!(log_path(&settings, root), PathBuf::from("/tmp/custom.log"));
    }
}
