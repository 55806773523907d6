//! Player Events
//!
//! The controller never touches the UI or storage. Each transition pushes
//! events describing its result; the session drains them and hands view
//! updates to the renderer and persist requests to the store.

use crate::format::format_time;
use crate::types::{PlaybackSnapshot, PlaybackStatus, RepeatMode, Track};
use crate::volume::VolumeIcon;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerEvent {
    /// Playback status changed
    StatusChanged {
        /// The new status
        status: PlaybackStatus,
        /// Whether media is actually playing
        is_playing: bool,
    },

    /// A new track was selected; the display and highlight should follow
    TrackChanged {
        /// Index of the selected track
        index: usize,
        /// The selected track
        track: Track,
    },

    /// Track-specific error text for the now-playing display
    TrackError {
        /// Affected track, if any
        index: Option<usize>,
        /// Message to show
        message: String,
    },

    /// Playlist contents changed
    PlaylistChanged {
        /// Track to highlight
        highlight: Option<usize>,
    },

    /// Nothing real to play: show the placeholder state
    EmptyPlaylist,

    /// Seek bar range, position or enabled flag changed
    SeekRangeChanged(SeekRange),

    /// Progress display update
    Progress(ProgressUpdate),

    /// Volume, mute or icon changed
    VolumeChanged {
        /// Linear volume
        volume: f64,
        /// Mute flag
        muted: bool,
        /// Slider position (0-100; 0 while muted)
        slider: u8,
        /// Icon level
        icon: VolumeIcon,
    },

    /// Shuffle or repeat changed
    ModesChanged {
        /// Shuffle flag
        shuffle: bool,
        /// Repeat mode
        repeat: RepeatMode,
    },

    /// Playback rate changed
    RateChanged {
        /// New rate
        rate: f64,
    },

    /// Playback state should be written to storage
    PersistRequested(PlaybackSnapshot),
}

/// Seek bar configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeekRange {
    /// Lower bound (always 0)
    pub min: f64,
    /// Upper bound (track duration, 0 while unknown)
    pub max: f64,
    /// Thumb position
    pub value: f64,
    /// Whether the user may drag the thumb
    pub enabled: bool,
}

impl SeekRange {
    /// Disabled bar at zero, used while a track loads
    pub fn disabled() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            value: 0.0,
            enabled: false,
        }
    }
}

/// Progress display values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Position in seconds
    pub current: f64,
    /// Duration in seconds (0 while unknown)
    pub duration: f64,
}

impl ProgressUpdate {
    /// Create a progress update
    pub fn new(current: f64, duration: f64) -> Self {
        Self { current, duration }
    }

    /// Zero position, unknown duration
    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Fill percentage, clamped to `[0, 100]`
    pub fn percent(&self) -> f64 {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return 0.0;
        }
        (self.current / self.duration * 100.0).clamp(0.0, 100.0)
    }

    /// Position as `M:SS`
    pub fn current_label(&self) -> String {
        format_time(self.current)
    }

    /// Duration as `M:SS`
    pub fn duration_label(&self) -> String {
        format_time(self.duration)
    }
}

/// Button indicator state for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconState {
    /// Show the pause icon
    pub playing: bool,
    /// Volume icon level
    pub volume: VolumeIcon,
    /// Shuffle button active
    pub shuffle: bool,
    /// Repeat button mode
    pub repeat: RepeatMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_percent_is_clamped() {
        assert_eq!(ProgressUpdate::new(90.0, 180.0).percent(), 50.0);
        assert_eq!(ProgressUpdate::new(200.0, 180.0).percent(), 100.0);
        assert_eq!(ProgressUpdate::new(10.0, 0.0).percent(), 0.0);
        assert_eq!(ProgressUpdate::new(10.0, f64::NAN).percent(), 0.0);
    }

    #[test]
    fn progress_labels() {
        let progress = ProgressUpdate::new(65.4, 200.0);
        assert_eq!(progress.current_label(), "1:05");
        assert_eq!(progress.duration_label(), "3:20");
    }
}
