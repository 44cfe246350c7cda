use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Flat persisted settings store. One JSON document, one key per setting:
/// server coordinates, the global skip markers, and the resume state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip)]
    path: PathBuf,

    #[serde(default)]
    pub webdav_url: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Seconds of intro to skip on every video; 0 = unset.
    #[serde(default)]
    pub skip_intro: u64,

    /// Seconds of outro to skip on every video; 0 = unset.
    #[serde(default)]
    pub skip_outro: u64,

    /// Stored for the embedding player UI; the core does not interpret it.
    #[serde(default = "default_volume")]
    pub volume: u32,

    #[serde(default)]
    pub last_played_path: Option<String>,

    /// Last playback position in milliseconds.
    #[serde(default)]
    pub last_played_time: u64,
}

impl Config {
    /// Load from the per-user config directory, falling back to defaults
    /// when no file exists yet.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path()?)
    }

    /// Load from an explicit location. Used by embedders and tests.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            debug!("Loading config from {:?}", path);
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            let mut config: Config = serde_json::from_str(&contents)
                .with_context(|| format!("failed to parse config file {}", path.display()))?;
            config.path = path;
            Ok(config)
        } else {
            info!("No config file at {:?}, using defaults", path);
            let mut config = Config::default();
            config.path = path;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write config file {}", self.path.display()))?;

        debug!("Config saved to {:?}", self.path);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("failed to locate the config directory")?;
        Ok(config_dir.join("davplay").join("config.json"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            webdav_url: String::new(),
            username: String::new(),
            password: String::new(),
            skip_intro: 0,
            skip_outro: 0,
            volume: default_volume(),
            last_played_path: None,
            last_played_time: 0,
        }
    }
}

fn default_volume() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(dir.path().join("config.json")).unwrap();
        assert_eq!(config.webdav_url, "");
        assert_eq!(config.skip_intro, 0);
        assert_eq!(config.volume, 100);
        assert!(config.last_played_path.is_none());
    }

    #[test]
    fn save_round_trips_and_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::load_from(&path).unwrap();
        config.webdav_url = "http://media.local:5678/dav".to_string();
        config.username = "guest".to_string();
        config.skip_intro = 90;
        config.last_played_path = Some("/Shows/e1.mp4".to_string());
        config.last_played_time = 123_456;
        config.save().unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.webdav_url, "http://media.local:5678/dav");
        assert_eq!(reloaded.username, "guest");
        assert_eq!(reloaded.skip_intro, 90);
        assert_eq!(reloaded.last_played_path.as_deref(), Some("/Shows/e1.mp4"));
        assert_eq!(reloaded.last_played_time, 123_456);
    }

    #[test]
    fn unknown_keys_are_tolerated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"webdav_url":"http://h/dav","theme":"dark"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.webdav_url, "http://h/dav");
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
