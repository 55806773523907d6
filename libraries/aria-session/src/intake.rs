//! Tracks from user-selected files
//!
//! Metadata comes from the file name alone: `Artist - Title.ext`.

use aria_playback::{PlayerConfig, Track};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A file offered by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFile {
    /// File name including extension
    pub name: String,

    /// MIME type reported by the platform
    pub mime_type: String,

    /// Handle the transport can load (an object URL in the browser)
    pub src: String,
}

impl CandidateFile {
    /// Create a candidate
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        src: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            src: src.into(),
        }
    }

    /// Whether the platform reports an audio type
    pub fn is_audio(&self) -> bool {
        self.mime_type.starts_with("audio/")
    }
}

/// Split a file name into `(artist, title)`
///
/// The last extension is dropped. With a `" - "` separator the first part
/// is the artist and the rest, rejoined, is the title.
pub fn parse_file_name(name: &str) -> (Option<String>, String) {
    let stem = match name.rfind('.') {
        Some(dot) if !name[dot + 1..].is_empty() && !name[dot + 1..].contains('/') => {
            &name[..dot]
        }
        _ => name,
    };

    match stem.split_once(" - ") {
        Some((artist, title)) => (Some(artist.trim().to_string()), title.trim().to_string()),
        None => (None, stem.to_string()),
    }
}

/// Build a track for one file, `None` if it is not audio
pub fn track_from_file(file: &CandidateFile, config: &PlayerConfig) -> Option<Track> {
    if !file.is_audio() {
        debug!(name = %file.name, mime = %file.mime_type, "skipping non-audio file");
        return None;
    }

    let (artist, title) = parse_file_name(&file.name);
    let mut track = Track::new(
        title,
        artist.unwrap_or_else(|| config.default_artist.clone()),
        file.src.clone(),
    )
    .with_album(config.local_album.clone())
    .ephemeral();
    track.cover = config.default_cover.clone();

    Some(track)
}

/// Build tracks for every audio file, in order
pub fn tracks_from_files(files: &[CandidateFile], config: &PlayerConfig) -> Vec<Track> {
    files
        .iter()
        .filter_map(|file| track_from_file(file, config))
        .collect()
}
