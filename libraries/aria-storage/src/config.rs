use serde::{Deserialize, Serialize};

/// Record keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key of the playlist record
    pub playlist_key: String,

    /// Key of the playback state record
    pub playback_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            playlist_key: "playlist-metadata".to_string(),
            playback_key: "playback-state".to_string(),
        }
    }
}
