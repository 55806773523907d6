//! Error types for playback management

use crate::types::PlayRejection;
use thiserror::Error;

/// Playback errors
///
/// None of these are fatal: every failure leaves the controller in
/// `Stopped` or `Error`, from which normal controls recover.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Playlist holds no real tracks
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Index out of bounds
    #[error("Index out of bounds: {index} (playlist has {len} tracks)")]
    InvalidIndex { index: usize, len: usize },

    /// Track exists but its source was not persisted and must be re-added
    #[error("Track {0} has no playable source")]
    MissingSource(usize),

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Transport failed to resolve a source
    #[error("Failed to load track {index}: {reason}")]
    SourceLoad { index: usize, reason: String },

    /// Transport refused to start playback
    #[error("Playback rejected: {0}")]
    PlaybackRejected(PlayRejection),

    /// Seek request refused
    #[error("Seek rejected: {0}")]
    SeekRejected(SeekRejection),

    /// Playback rate is not a finite number
    #[error("Invalid playback rate: {0}")]
    InvalidPlaybackRate(f64),
}

/// Why a seek was refused
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeekRejection {
    /// Duration is unknown, zero or infinite
    #[error("duration unknown")]
    UnknownDuration,

    /// Media reports no seekable range
    #[error("media is not seekable")]
    NotSeekable,

    /// Requested time outside the seekable range
    #[error("{requested}s outside seekable range [{start}, {end}]")]
    OutOfRange { requested: f64, start: f64, end: f64 },
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
