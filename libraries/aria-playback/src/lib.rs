//! Aria - Playback Control
//!
//! Platform-agnostic playback state machine for Aria.
//!
//! This crate provides:
//! - Playlist model with a placeholder empty state
//! - Playback state machine (Stopped, Paused, Playing, Error, plus seeking)
//! - End-of-track policy (repeat none/all/one, shuffle)
//! - Volume, mute and playback rate
//! - Seek validation against the media's seekable range
//! - Load tokens that discard callbacks from superseded loads
//!
//! # Architecture
//!
//! `aria-playback` has no knowledge of the DOM or of storage:
//! - The media element is reached through the [`MediaTransport`] trait
//! - Everything the view or storage needs is emitted as a [`PlayerEvent`]
//! - Transport callbacks are fed back via [`PlaybackController::handle_event`]
//!
//! # Example
//!
//! ```rust
//! use aria_playback::{
//!     PlaybackController, PlaybackStatus, PlayerConfig, SimulatedTransport, Track,
//! };
//!
//! let transport = SimulatedTransport::new().with_track("music/song.mp3", 180.0);
//! let mut controller = PlaybackController::new(transport, PlayerConfig::default());
//!
//! controller.append_tracks(vec![Track::new("My Song", "Artist Name", "music/song.mp3")]);
//! controller.play().ok();
//!
//! // Deliver what the media element reported
//! while let Some(event) = controller.transport_mut().next_event() {
//!     controller.handle_event(event);
//! }
//!
//! assert_eq!(controller.status(), PlaybackStatus::Playing);
//! assert!(controller.has_pending_events());
//! ```

mod controller;
mod error;
pub mod events;
mod format;
mod playlist;
pub mod shuffle;
mod simulated;
pub mod transport;
pub mod types;
mod volume;

// Public exports
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result, SeekRejection};
pub use events::{IconState, PlayerEvent, ProgressUpdate, SeekRange};
pub use format::format_time;
pub use playlist::Playlist;
pub use simulated::SimulatedTransport;
pub use transport::{LoadToken, MediaTransport, SeekableRange, TransportEvent};
pub use types::{
    PlayRejection, PlaybackSnapshot, PlaybackStatus, PlayerConfig, RepeatMode, Track,
    DEFAULT_COVER, MAX_PLAYBACK_RATE, MIN_PLAYBACK_RATE,
};
pub use volume::{Volume, VolumeIcon};
