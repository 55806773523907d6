//! Playback state record (PlaybackState-v1)
//!
//! Stored as a flat object: `{"version": 1, "index", "time", "volume",
//! "muted", "shuffle", "repeat", "playbackRate"}`. Records without a
//! version are read as the legacy form of the same shape.
//!
//! Every field is validated on its own; a bad field falls back to its
//! default without invalidating the rest of the record.

use crate::backend::KeyValueStore;
use crate::error::{Result, StorageError};
use aria_playback::{PlaybackSnapshot, RepeatMode, MAX_PLAYBACK_RATE, MIN_PLAYBACK_RATE};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Current schema version
pub const VERSION: u64 = 1;

#[derive(Serialize)]
struct PlaybackStateRecord<'a> {
    version: u64,
    #[serde(flatten)]
    state: &'a PlaybackSnapshot,
}

/// Serialize a snapshot into a PlaybackState-v1 record
pub fn encode(state: &PlaybackSnapshot) -> Result<String> {
    Ok(serde_json::to_string(&PlaybackStateRecord {
        version: VERSION,
        state,
    })?)
}

/// Parse and validate a playback state record
///
/// Only a non-object record or an unknown version is an error.
pub fn decode(key: &str, json: &str) -> Result<PlaybackSnapshot> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(record) = value else {
        return Err(StorageError::corrupt(key, "expected an object"));
    };

    if let Some(version) = record.get("version") {
        match version.as_u64() {
            Some(VERSION) => {}
            Some(version) => {
                return Err(StorageError::UnsupportedVersion {
                    key: key.to_string(),
                    version,
                })
            }
            None => return Err(StorageError::corrupt(key, "version is not a number")),
        }
    }

    Ok(validate(&record))
}

fn validate(record: &Map<String, Value>) -> PlaybackSnapshot {
    let defaults = PlaybackSnapshot::default();

    let index = field(record, "index", Value::as_u64)
        .and_then(|i| usize::try_from(i).ok())
        .unwrap_or(defaults.index);

    let time = field(record, "time", Value::as_f64)
        .filter(|t| t.is_finite() && *t >= 0.0)
        .unwrap_or(defaults.time);

    let volume = field(record, "volume", Value::as_f64)
        .filter(|v| (0.0..=1.0).contains(v))
        .unwrap_or(defaults.volume);

    let muted = field(record, "muted", Value::as_bool).unwrap_or(defaults.muted);
    let shuffle = field(record, "shuffle", Value::as_bool).unwrap_or(defaults.shuffle);

    let repeat = field(record, "repeat", Value::as_str)
        .and_then(RepeatMode::from_str)
        .unwrap_or(defaults.repeat);

    let playback_rate = field(record, "playbackRate", Value::as_f64)
        .filter(|r| (MIN_PLAYBACK_RATE..=MAX_PLAYBACK_RATE).contains(r))
        .unwrap_or(defaults.playback_rate);

    PlaybackSnapshot {
        index,
        time,
        volume,
        muted,
        shuffle,
        repeat,
        playback_rate,
    }
}

fn field<'a, T>(
    record: &'a Map<String, Value>,
    name: &str,
    read: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
    let value = record.get(name)?;
    let parsed = read(value);
    if parsed.is_none() {
        debug!(field = name, %value, "invalid playback state field, using default");
    }
    parsed
}

/// Fit a restored snapshot to the playlist it will be applied to
///
/// An index past the end resets to 0.
pub fn reconcile(mut state: PlaybackSnapshot, playlist_len: usize) -> PlaybackSnapshot {
    if state.index >= playlist_len {
        debug!(index = state.index, playlist_len, "saved index out of range, using 0");
        state.index = 0;
    }
    state
}

/// Load the playback state under `key`, `None` if nothing is stored
pub fn get<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Result<Option<PlaybackSnapshot>> {
    store.read(key)?.map(|json| decode(key, &json)).transpose()
}

/// Replace the playback state under `key`
pub fn save<S: KeyValueStore + ?Sized>(
    store: &mut S,
    key: &str,
    state: &PlaybackSnapshot,
) -> Result<()> {
    let json = encode(state)?;
    store.write(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_flat_and_versioned() {
        let state = PlaybackSnapshot {
            index: 2,
            time: 12.5,
            repeat: RepeatMode::One,
            playback_rate: 1.5,
            ..PlaybackSnapshot::default()
        };
        let value: Value = serde_json::from_str(&encode(&state).unwrap()).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["index"], 2);
        assert_eq!(value["repeat"], "one");
        assert_eq!(value["playbackRate"], 1.5);
    }

    #[test]
    fn out_of_bounds_fields_fall_back() {
        let json = r#"{"index":-1,"time":-3,"volume":1.7,"muted":"yes","shuffle":true,"repeat":"bogus","playbackRate":4}"#;
        let state = decode("k", json).unwrap();

        assert_eq!(state.index, 0);
        assert_eq!(state.time, 0.0);
        assert_eq!(state.volume, 1.0);
        assert!(!state.muted);
        assert!(state.shuffle);
        assert_eq!(state.repeat, RepeatMode::Off);
        assert_eq!(state.playback_rate, 1.0);
    }

    #[test]
    fn legacy_record_without_version() {
        let json = r#"{"index":3,"time":42,"volume":0.5,"muted":true,"shuffle":false,"repeat":"all","playbackRate":0.75}"#;
        let state = decode("k", json).unwrap();

        assert_eq!(state.index, 3);
        assert_eq!(state.time, 42.0);
        assert!(state.muted);
        assert_eq!(state.repeat, RepeatMode::All);
        assert_eq!(state.playback_rate, 0.75);
    }

    #[test]
    fn empty_object_is_defaults() {
        assert_eq!(decode("k", "{}").unwrap(), PlaybackSnapshot::default());
    }

    #[test]
    fn non_object_and_future_version_fail() {
        assert!(decode("k", "[]").unwrap_err().is_corrupt());
        assert!(decode("k", "{").unwrap_err().is_corrupt());
        assert!(matches!(
            decode("k", r#"{"version":9}"#),
            Err(StorageError::UnsupportedVersion { version: 9, .. })
        ));
    }

    #[test]
    fn reconcile_resets_index_past_end() {
        let state = PlaybackSnapshot {
            index: 5,
            time: 30.0,
            ..PlaybackSnapshot::default()
        };
        assert_eq!(reconcile(state.clone(), 5).index, 0);
        assert_eq!(reconcile(state, 6).index, 5);
    }
}
