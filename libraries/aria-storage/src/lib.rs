//! Aria Storage
//!
//! Persistence for the Aria player: the playlist and the playback state,
//! each a versioned JSON record under a fixed key.
//!
//! # Architecture
//!
//! - **Backends**: [`KeyValueStore`] over memory, a directory of JSON files,
//!   or (feature `wasm`) the browser's `localStorage`
//! - **Schemas**: one module per record (`playlists`, `playback_state`)
//!   with encode/decode and field validation
//! - **Fault tolerance**: [`PersistenceStore`] logs and swallows failures
//!   so storage problems never stop playback
//!
//! # Example
//!
//! ```rust
//! use aria_playback::PlaybackSnapshot;
//! use aria_storage::{MemoryStore, PersistenceStore, StorageConfig};
//!
//! let mut store = PersistenceStore::new(Box::new(MemoryStore::new()), StorageConfig::default());
//!
//! let state = PlaybackSnapshot { index: 2, time: 31.5, ..PlaybackSnapshot::default() };
//! assert!(store.save_playback_state(&state));
//! assert_eq!(store.load_playback_state(), Some(state));
//! ```

mod backend;
mod config;
mod error;
mod store;

// Record schemas
pub mod playback_state;
pub mod playlists;

#[cfg(feature = "wasm")]
mod local_storage;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use config::StorageConfig;
pub use error::{Result, StorageError};
pub use store::PersistenceStore;

#[cfg(feature = "wasm")]
pub use local_storage::LocalStorageStore;
