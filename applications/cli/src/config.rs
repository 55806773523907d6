/// CLI configuration
use crate::error::{CliError, Result};
use aria_playback::PlayerConfig;
use aria_storage::StorageConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file, read from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "aria.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Directory holding the persisted records
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Duration the simulated transport reports for every file, in seconds
    #[serde(default = "default_track_duration")]
    pub track_duration: f64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            storage: StorageConfig::default(),
            data_dir: default_data_dir(),
            track_duration: default_track_duration(),
        }
    }
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// `path` overrides the default `aria.toml`; an explicit path must
    /// exist. Variables prefixed `ARIA_` override file values, with `__`
    /// between nested keys (`ARIA_PLAYER__INITIAL_VOLUME=0.5`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("ARIA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.track_duration.is_finite() || self.track_duration <= 0.0 {
            return Err(CliError::Config(format!(
                "track_duration must be positive, got {}",
                self.track_duration
            )));
        }

        if !(0.0..=1.0).contains(&self.player.initial_volume) {
            return Err(CliError::Config(format!(
                "player.initial_volume must be within 0..=1, got {}",
                self.player.initial_volume
            )));
        }

        if self.storage.playlist_key == self.storage.playback_key {
            return Err(CliError::Config(
                "storage keys for playlist and playback state must differ".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_data_dir() -> PathBuf {
    PathBuf::from("./data/aria")
}

fn default_track_duration() -> f64 {
    180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        let config = CliConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.track_duration, 180.0);
        assert_eq!(config.storage.playback_key, "playback-state");
    }

    #[test]
    fn loads_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(
            &path,
            "data_dir = \"/tmp/aria-test\"\ntrack_duration = 42.5\n\n[player]\nshuffle_seed = 9\n",
        )
        .unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/aria-test"));
        assert_eq!(config.track_duration, 42.5);
        assert_eq!(config.player.shuffle_seed, Some(9));
        assert_eq!(config.player.default_artist, "Unknown Artist");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = CliConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = CliConfig {
            track_duration: 0.0,
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());

        config.track_duration = 10.0;
        config.storage.playback_key = config.storage.playlist_key.clone();
        assert!(config.validate().is_err());
    }
}
