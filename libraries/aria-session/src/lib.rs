//! Aria - Player Session
//!
//! Ties the playback controller to persistence and a view.
//!
//! This crate provides:
//! - [`PlayerSession`]: the single owner of controller, store and renderer
//! - Restore sequencing on start and full reload
//! - Track creation from user-selected files
//! - The [`Renderer`] seam for views
//! - JavaScript bindings (feature `wasm`)
//!
//! # Example
//!
//! ```rust
//! use aria_playback::{MediaTransport, PlayerConfig, SimulatedTransport};
//! use aria_session::{CandidateFile, NullRenderer, PlayerSession, RestoreOutcome};
//! use aria_storage::{MemoryStore, PersistenceStore, StorageConfig};
//!
//! let store = PersistenceStore::new(Box::new(MemoryStore::new()), StorageConfig::default());
//! let transport = SimulatedTransport::new().with_default_duration(200.0);
//! let mut session =
//!     PlayerSession::start(transport, store, Box::new(NullRenderer), PlayerConfig::default());
//! assert_eq!(session.restore_outcome(), RestoreOutcome::Empty);
//!
//! let files = [CandidateFile::new("Artist - Song.mp3", "audio/mpeg", "blob:1")];
//! assert_eq!(session.add_files(&files)?, 1);
//! assert!(session.transport().has_source());
//! # Ok::<(), aria_session::SessionError>(())
//! ```

mod error;
pub mod intake;
mod renderer;
mod restore;
mod session;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Result, SessionError};
pub use intake::CandidateFile;
pub use renderer::{NullRenderer, Renderer};
pub use restore::{restore, RestoreOutcome};
pub use session::PlayerSession;

#[cfg(feature = "wasm")]
pub use wasm::WasmPlayerSession;
