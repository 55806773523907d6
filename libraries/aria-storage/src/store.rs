//! Fault-tolerant persistence
//!
//! Wraps a backend so that saving never interrupts playback: write
//! failures are logged and swallowed, corrupt records are discarded.
//! The one exception is [`PersistenceStore::save_playlist_now`], an
//! explicit user action whose outcome is reported back.

use crate::backend::KeyValueStore;
use crate::config::StorageConfig;
use crate::error::Result;
use crate::{playback_state, playlists};
use aria_playback::{PlaybackSnapshot, Track};
use tracing::{debug, error, warn};

/// Persistence for the playlist and playback state records
pub struct PersistenceStore {
    backend: Box<dyn KeyValueStore>,
    config: StorageConfig,
}

impl PersistenceStore {
    /// Create a store over `backend`
    pub fn new(backend: Box<dyn KeyValueStore>, config: StorageConfig) -> Self {
        Self { backend, config }
    }

    /// Record keys in use
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// The underlying backend
    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }

    /// Mutable access to the underlying backend
    pub fn backend_mut(&mut self) -> &mut dyn KeyValueStore {
        self.backend.as_mut()
    }

    // ===== Playback State =====

    /// Write the playback state; failures are logged
    ///
    /// Returns whether the write succeeded.
    pub fn save_playback_state(&mut self, state: &PlaybackSnapshot) -> bool {
        match playback_state::save(self.backend.as_mut(), &self.config.playback_key, state) {
            Ok(()) => {
                debug!(index = state.index, time = state.time, "saved playback state");
                true
            }
            Err(e) => {
                error!(error = %e, "failed to save playback state");
                false
            }
        }
    }

    /// Read the playback state
    ///
    /// A missing, unreadable or corrupt record yields `None`. A corrupt
    /// record is deleted.
    pub fn load_playback_state(&mut self) -> Option<PlaybackSnapshot> {
        let key = self.config.playback_key.clone();
        match playback_state::get(self.backend.as_ref(), &key) {
            Ok(state) => state,
            Err(e) if e.is_corrupt() => {
                warn!(error = %e, "discarding corrupt playback state record");
                if let Err(e) = self.backend.delete(&key) {
                    error!(error = %e, "failed to delete corrupt playback state record");
                }
                None
            }
            Err(e) => {
                warn!(error = %e, "ignoring stored playback state");
                None
            }
        }
    }

    // ===== Playlist =====

    /// Write the playlist; failures are logged
    ///
    /// Returns whether the write succeeded.
    pub fn save_playlist(&mut self, tracks: &[Track]) -> bool {
        match self.save_playlist_now(tracks) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, tracks = tracks.len(), "failed to save playlist");
                false
            }
        }
    }

    /// Write the playlist and report the outcome
    pub fn save_playlist_now(&mut self, tracks: &[Track]) -> Result<()> {
        playlists::save(self.backend.as_mut(), &self.config.playlist_key, tracks)?;
        debug!(tracks = tracks.len(), "saved playlist");
        Ok(())
    }

    /// Read the playlist
    ///
    /// A corrupt record is deleted so the next start begins clean.
    pub fn load_playlist(&mut self) -> Option<Vec<Track>> {
        let key = self.config.playlist_key.clone();
        match playlists::get(self.backend.as_ref(), &key) {
            Ok(tracks) => tracks,
            Err(e) if e.is_corrupt() => {
                warn!(error = %e, "discarding corrupt playlist record");
                if let Err(e) = playlists::delete(self.backend.as_mut(), &key) {
                    error!(error = %e, "failed to delete corrupt playlist record");
                }
                None
            }
            Err(e) => {
                warn!(error = %e, "could not read stored playlist");
                None
            }
        }
    }
}
