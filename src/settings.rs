//! Player preferences
//!
//! Persisted separately from campaign progress. Anything unreadable loads
//! as defaults with a `warn!`.

use std::fs;
use std::io;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub music_enabled: bool,
    pub sfx_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_enabled: true,
            sfx_enabled: true,
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|err| {
                warn!("corrupt settings file {path:?}: {err}");
                Self::default()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                warn!("failed to read settings file {path:?}: {err}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_defaults() {
        let settings = Settings::load("/nonexistent/settings.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_round_trip() {
        let dir = std::env::temp_dir().join("bubblebyte-test-settings");
        let path = dir.join("settings.json");
        let settings = Settings {
            music_enabled: false,
            sfx_enabled: true,
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_corrupt_file_is_defaults() {
        let dir = std::env::temp_dir().join("bubblebyte-test-settings-corrupt");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        fs::write(&path, "][").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
        fs::remove_dir_all(&dir).ok();
    }
}
