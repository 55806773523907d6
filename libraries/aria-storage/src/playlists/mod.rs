//! Playlist record (Playlist-v1)
//!
//! Stored as `{"version": 1, "tracks": [...]}`. A bare array of tracks is
//! the legacy unversioned form and is still accepted on read.
//!
//! # Example
//!
//! ```rust
//! use aria_playback::Track;
//! use aria_storage::{playlists, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! let tracks = vec![Track::new("Song", "Artist", "music/song.mp3")];
//!
//! playlists::save(&mut store, "playlist-metadata", &tracks)?;
//! let loaded = playlists::get(&store, "playlist-metadata")?;
//! assert_eq!(loaded, Some(tracks));
//! # Ok::<(), aria_storage::StorageError>(())
//! ```

use crate::backend::KeyValueStore;
use crate::error::{Result, StorageError};
use aria_playback::{Track, DEFAULT_COVER};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current schema version
pub const VERSION: u64 = 1;

/// One track as written to storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTrack {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub lyrics: String,
}

impl From<&Track> for StoredTrack {
    fn from(track: &Track) -> Self {
        // Object URLs die with the page; store them as "needs re-attachment"
        let src = if track.is_transient() {
            String::new()
        } else {
            track.src.clone()
        };

        Self {
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            src,
            cover: track.cover.clone(),
            lyrics: track.lyrics.clone(),
        }
    }
}

impl From<StoredTrack> for Track {
    fn from(stored: StoredTrack) -> Self {
        let cover = if stored.cover.is_empty() {
            DEFAULT_COVER.to_string()
        } else {
            stored.cover
        };

        Self {
            title: stored.title,
            artist: stored.artist,
            album: stored.album,
            src: stored.src,
            cover,
            lyrics: stored.lyrics,
            ephemeral: false,
        }
    }
}

#[derive(Serialize)]
struct PlaylistRecordRef<'a> {
    version: u64,
    tracks: &'a [StoredTrack],
}

/// Serialize tracks into a Playlist-v1 record
pub fn encode(tracks: &[Track]) -> Result<String> {
    let stored: Vec<StoredTrack> = tracks.iter().map(StoredTrack::from).collect();
    let record = PlaylistRecordRef {
        version: VERSION,
        tracks: &stored,
    };
    Ok(serde_json::to_string(&record)?)
}

/// Parse a playlist record
///
/// Accepts Playlist-v1 and the legacy bare array. Anything else, including
/// a track entry that is not an object, is corrupt.
pub fn decode(key: &str, json: &str) -> Result<Vec<Track>> {
    let value: Value = serde_json::from_str(json)?;

    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut record) => {
            let version = record
                .get("version")
                .and_then(Value::as_u64)
                .ok_or_else(|| StorageError::corrupt(key, "missing version"))?;
            if version != VERSION {
                return Err(StorageError::UnsupportedVersion {
                    key: key.to_string(),
                    version,
                });
            }
            match record.remove("tracks") {
                Some(Value::Array(entries)) => entries,
                _ => return Err(StorageError::corrupt(key, "tracks is not an array")),
            }
        }
        _ => return Err(StorageError::corrupt(key, "expected an object or array")),
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            if !entry.is_object() {
                return Err(StorageError::corrupt(key, format!("track {i} is not an object")));
            }
            let stored: StoredTrack = serde_json::from_value(entry)
                .map_err(|e| StorageError::corrupt(key, format!("track {i}: {e}")))?;
            Ok(Track::from(stored))
        })
        .collect()
}

/// Load the playlist under `key`, `None` if nothing is stored
pub fn get<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Result<Option<Vec<Track>>> {
    store.read(key)?.map(|json| decode(key, &json)).transpose()
}

/// Replace the playlist under `key`
pub fn save<S: KeyValueStore + ?Sized>(store: &mut S, key: &str, tracks: &[Track]) -> Result<()> {
    let json = encode(tracks)?;
    store.write(key, &json)
}

/// Remove the playlist under `key`
pub fn delete<S: KeyValueStore + ?Sized>(store: &mut S, key: &str) -> Result<()> {
    store.delete(key)
}
