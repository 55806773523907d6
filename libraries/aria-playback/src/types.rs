//! Core types for playback management

use serde::{Deserialize, Serialize};

/// Cover shown when a track has none of its own
pub const DEFAULT_COVER: &str = "placeholder.png";

/// Lowest accepted playback rate
pub const MIN_PLAYBACK_RATE: f64 = 0.5;

/// Highest accepted playback rate
pub const MAX_PLAYBACK_RATE: f64 = 2.0;

/// One playable item with display metadata and a source reference
///
/// Identity is positional: a track is addressed by its index in the
/// playlist, there is no stable ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name (may be empty)
    pub album: String,

    /// Media URI. Empty for the placeholder or a track that needs its
    /// source re-attached.
    pub src: String,

    /// Cover art URI
    pub cover: String,

    /// Free-form lyrics text
    #[serde(default)]
    pub lyrics: String,

    /// Source is a transient handle (object URL for a local file) that
    /// does not survive a page reload
    #[serde(skip)]
    pub ephemeral: bool,
}

impl Track {
    /// Create a track with a durable source and default cover
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        src: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            album: String::new(),
            src: src.into(),
            cover: DEFAULT_COVER.to_string(),
            lyrics: String::new(),
            ephemeral: false,
        }
    }

    /// The sentinel track standing in for "no real content loaded"
    pub fn placeholder() -> Self {
        Self {
            title: "No Tracks Loaded".to_string(),
            artist: "Add files using the folder icon".to_string(),
            album: String::new(),
            src: String::new(),
            cover: DEFAULT_COVER.to_string(),
            lyrics: String::new(),
            ephemeral: false,
        }
    }

    /// Set the album name
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    /// Mark the source as a transient handle
    #[must_use]
    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    /// Whether the track has something the transport can load
    pub fn has_source(&self) -> bool {
        !self.src.trim().is_empty()
    }

    /// Whether the source must not be written to durable storage
    pub fn is_transient(&self) -> bool {
        self.ephemeral || self.src.starts_with("blob:")
    }

    /// Title for display, never empty
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Unknown Title"
        } else {
            &self.title
        }
    }

    /// Artist for display, never empty
    pub fn display_artist(&self) -> &str {
        if self.artist.is_empty() {
            "Unknown Artist"
        } else {
            &self.artist
        }
    }
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop after the last track
    #[default]
    #[serde(rename = "none")]
    Off,

    /// Loop the whole playlist
    All,

    /// Loop the current track
    One,
}

impl RepeatMode {
    /// Next mode in the `none → all → one → none` rotation
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }

    /// Persisted string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "none",
            Self::All => "all",
            Self::One => "one",
        }
    }

    /// Parse the persisted string form
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::Off),
            "all" => Some(Self::All),
            "one" => Some(Self::One),
            _ => None,
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Playback state
///
/// `Seeking` is not a separate variant: it is a flag layered over
/// `Paused` or `Playing` (see `PlaybackController::is_seeking`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// No track loaded, or the selected track has no source
    Stopped,

    /// Track loaded, not playing
    Paused,

    /// Track loaded and playing
    Playing,

    /// Load or play failure; recoverable by any user action
    Error,
}

/// Why the transport refused a play request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayRejection {
    /// The platform requires a user gesture before audio may start
    AutoplayBlocked,

    /// The source format cannot be played
    FormatUnsupported,

    /// A pause or a new load interrupted the request
    Aborted,

    /// Anything else
    Other(String),
}

impl PlayRejection {
    /// Classify a platform failure by its error name
    ///
    /// Follows the DOMException names a media element rejects with:
    /// `NotAllowedError` for autoplay policy, `NotSupportedError` for
    /// unplayable sources, `AbortError` when a pause or load interrupts.
    pub fn classify(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" => Self::AutoplayBlocked,
            "NotSupportedError" => Self::FormatUnsupported,
            "AbortError" => Self::Aborted,
            _ if message.is_empty() => Self::Other(name.to_string()),
            _ => Self::Other(message.to_string()),
        }
    }

    /// One-line status text for the now-playing display
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::AutoplayBlocked => "Playback blocked by the browser. Press play to start.",
            Self::FormatUnsupported => "This file format is not supported.",
            Self::Aborted => "Playback interrupted.",
            Self::Other(_) => "Playback failed. Try another track.",
        }
    }
}

impl std::fmt::Display for PlayRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AutoplayBlocked => write!(f, "autoplay blocked"),
            Self::FormatUnsupported => write!(f, "format unsupported"),
            Self::Aborted => write!(f, "aborted"),
            Self::Other(reason) => write!(f, "{reason}"),
        }
    }
}

/// Persisted playback state
///
/// Written on every consequential user action and on page-hide; read once
/// per restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    /// Current track index
    pub index: usize,

    /// Position in seconds
    pub time: f64,

    /// Volume in `[0, 1]`
    pub volume: f64,

    /// Mute flag (independent of `volume`)
    pub muted: bool,

    /// Shuffle flag
    pub shuffle: bool,

    /// Repeat mode
    pub repeat: RepeatMode,

    /// Playback rate in `[0.5, 2]`
    pub playback_rate: f64,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            index: 0,
            time: 0.0,
            volume: 1.0,
            muted: false,
            shuffle: false,
            repeat: RepeatMode::Off,
            playback_rate: 1.0,
        }
    }
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Initial volume in `[0, 1]` (default: 1.0)
    pub initial_volume: f64,

    /// Cover used for tracks added from local files
    pub default_cover: String,

    /// Artist for local files whose name carries none
    pub default_artist: String,

    /// Album label for tracks added from local files
    pub local_album: String,

    /// Seed for the shuffle picker; `None` draws from OS entropy
    pub shuffle_seed: Option<u64>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            default_cover: DEFAULT_COVER.to_string(),
            default_artist: "Unknown Artist".to_string(),
            local_album: "Local File".to_string(),
            shuffle_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.initial_volume, 1.0);
        assert_eq!(config.default_cover, "placeholder.png");
        assert_eq!(config.default_artist, "Unknown Artist");
        assert_eq!(config.local_album, "Local File");
        assert!(config.shuffle_seed.is_none());
    }

    #[test]
    fn repeat_cycles_through_three_modes() {
        let mut mode = RepeatMode::Off;
        let mut seen = Vec::new();
        for _ in 0..4 {
            mode = mode.cycle();
            seen.push(mode);
        }
        assert_eq!(
            seen,
            vec![RepeatMode::All, RepeatMode::One, RepeatMode::Off, RepeatMode::All]
        );
    }

    #[test]
    fn repeat_string_forms() {
        for mode in [RepeatMode::Off, RepeatMode::All, RepeatMode::One] {
            assert_eq!(RepeatMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(RepeatMode::from_str("bogus"), None);
        assert_eq!(RepeatMode::Off.to_string(), "none");
    }

    #[test]
    fn placeholder_has_no_source() {
        let track = Track::placeholder();
        assert!(!track.has_source());
        assert_eq!(track.title, "No Tracks Loaded");
    }

    #[test]
    fn blob_sources_are_transient() {
        let track = Track::new("A", "B", "blob:http://localhost/1234");
        assert!(track.is_transient());

        let track = Track::new("A", "B", "music/a.mp3");
        assert!(!track.is_transient());
        assert!(track.ephemeral().is_transient());
    }

    #[test]
    fn display_fallbacks() {
        let track = Track::new("", "", "a.mp3");
        assert_eq!(track.display_title(), "Unknown Title");
        assert_eq!(track.display_artist(), "Unknown Artist");
    }

    #[test]
    fn play_rejection_classification() {
        assert_eq!(
            PlayRejection::classify("NotAllowedError", "play() failed"),
            PlayRejection::AutoplayBlocked
        );
        assert_eq!(
            PlayRejection::classify("NotSupportedError", ""),
            PlayRejection::FormatUnsupported
        );
        assert_eq!(
            PlayRejection::classify("AbortError", "interrupted"),
            PlayRejection::Aborted
        );
    }
}
