//! Media transport boundary
//!
//! Abstracts the playable media element (an HTML audio element in the
//! browser, a simulated clock in tests and the CLI). The controller issues
//! commands through [`MediaTransport`]; the platform reports back with
//! [`TransportEvent`]s fed to `PlaybackController::handle_event`.

use crate::types::PlayRejection;
use serde::{Deserialize, Serialize};

/// Identifies one `load` request
///
/// Every track selection issues a fresh token. Events carry the token of
/// the load they belong to, so callbacks from a superseded load can be
/// recognized and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoadToken(pub u64);

impl std::fmt::Display for LoadToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "load#{}", self.0)
    }
}

/// Seekable time range reported by the media
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeekableRange {
    /// Range start in seconds
    pub start: f64,

    /// Range end in seconds
    pub end: f64,
}

impl SeekableRange {
    /// Create a range
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Whether `time` falls inside the range (inclusive)
    pub fn contains(&self, time: f64) -> bool {
        time.is_finite() && time >= self.start && time <= self.end
    }
}

/// Platform media element
///
/// All calls are commands; outcomes of asynchronous work (`load`, `play`)
/// come back as [`TransportEvent`]s. Implementations must not call back
/// into the controller from inside these methods.
pub trait MediaTransport {
    /// Replace the current source and begin loading it
    ///
    /// Loading a new source pauses the media and resets its position.
    fn load(&mut self, src: &str, token: LoadToken);

    /// Request playback
    ///
    /// The media reports not-paused as soon as the request is accepted; the
    /// outcome arrives later as `PlayStarted` or `PlayRejected`.
    fn play(&mut self, token: LoadToken);

    /// Pause playback
    fn pause(&mut self);

    /// Whether the media is paused
    fn is_paused(&self) -> bool;

    /// Whether a source has been set
    fn has_source(&self) -> bool;

    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Move the playback position
    fn set_current_time(&mut self, seconds: f64);

    /// Duration of the loaded media, `None` until metadata is known
    fn duration(&self) -> Option<f64>;

    /// Linear volume in `[0, 1]`
    fn volume(&self) -> f64;

    /// Set linear volume in `[0, 1]`
    fn set_volume(&mut self, volume: f64);

    /// Mute flag
    fn is_muted(&self) -> bool;

    /// Set mute flag
    fn set_muted(&mut self, muted: bool);

    /// Playback rate multiplier
    fn playback_rate(&self) -> f64;

    /// Set playback rate multiplier
    fn set_playback_rate(&mut self, rate: f64);

    /// Seekable range, `None` if the media cannot seek
    fn seekable(&self) -> Option<SeekableRange>;
}

/// Events fired by the media transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransportEvent {
    /// Metadata resolved; duration is known
    MetadataLoaded { token: LoadToken, duration: f64 },

    /// Enough data buffered to start playing
    CanPlay { token: LoadToken },

    /// Periodic position update
    TimeUpdate { token: LoadToken, current_time: f64 },

    /// Media played through to its end
    Ended { token: LoadToken },

    /// Source could not be loaded or decoded
    LoadFailed { token: LoadToken, reason: String },

    /// A play request succeeded
    PlayStarted { token: LoadToken },

    /// A play request was refused
    PlayRejected { token: LoadToken, rejection: PlayRejection },
}

impl TransportEvent {
    /// Token of the load this event belongs to
    pub fn token(&self) -> LoadToken {
        match self {
            Self::MetadataLoaded { token, .. }
            | Self::CanPlay { token }
            | Self::TimeUpdate { token, .. }
            | Self::Ended { token }
            | Self::LoadFailed { token, .. }
            | Self::PlayStarted { token }
            | Self::PlayRejected { token, .. } => *token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seekable_range_is_inclusive() {
        let range = SeekableRange::new(0.0, 180.0);
        assert!(range.contains(0.0));
        assert!(range.contains(180.0));
        assert!(!range.contains(180.5));
        assert!(!range.contains(-1.0));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn event_token() {
        let event = TransportEvent::Ended { token: LoadToken(4) };
        assert_eq!(event.token(), LoadToken(4));
        assert_eq!(LoadToken(4).to_string(), "load#4");
    }
}
