//! Playlist model
//!
//! An ordered list of tracks. A list holding only the placeholder track is
//! the canonical empty state and counts as zero real tracks.

use crate::types::Track;
use tracing::debug;

/// Ordered sequence of tracks
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    /// Create the default playlist: the single placeholder track
    pub fn new() -> Self {
        Self {
            tracks: vec![Track::placeholder()],
        }
    }

    /// Build a playlist from stored tracks
    ///
    /// An empty list becomes the placeholder.
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        if tracks.is_empty() {
            Self::new()
        } else {
            Self { tracks }
        }
    }

    /// Whether this is the canonical placeholder
    pub fn is_placeholder(&self) -> bool {
        self.tracks.len() == 1 && !self.tracks[0].has_source()
    }

    /// True for zero tracks or the sole placeholder
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty() || self.is_placeholder()
    }

    /// Number of real tracks
    pub fn len(&self) -> usize {
        if self.is_placeholder() {
            0
        } else {
            self.tracks.len()
        }
    }

    /// Index of the last real track
    pub fn last_index(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }

    /// Bounds-checked lookup; the placeholder is never returned
    pub fn get(&self, index: usize) -> Option<&Track> {
        if self.is_placeholder() {
            return None;
        }
        self.tracks.get(index)
    }

    /// Real tracks in order (empty for the placeholder)
    pub fn tracks(&self) -> &[Track] {
        if self.is_placeholder() {
            &[]
        } else {
            &self.tracks
        }
    }

    /// Append tracks
    ///
    /// Drops the placeholder first. Tracks without a source are skipped.
    /// Returns the index of the first appended track, or `None` if nothing
    /// was appended.
    pub fn append(&mut self, tracks: Vec<Track>) -> Option<usize> {
        let incoming: Vec<Track> = tracks
            .into_iter()
            .filter(|track| {
                if !track.has_source() {
                    debug!(title = %track.title, "skipping track without source");
                }
                track.has_source()
            })
            .collect();

        if incoming.is_empty() {
            return None;
        }

        if self.is_placeholder() {
            self.tracks.clear();
        }

        let first = self.tracks.len();
        self.tracks.extend(incoming);
        Some(first)
    }
}

impl Default for Playlist {
    fn default() -> Self {
        Self::new()
    }
}
