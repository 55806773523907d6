//! View collaborator
//!
//! The session translates controller events into calls on a [`Renderer`].
//! Every method has a no-op default so a renderer only implements what
//! its view shows.

use aria_playback::{IconState, SeekRange, Track};

/// Receives view updates from a player session
pub trait Renderer {
    /// Redraw the playlist; `highlight` marks the current track
    ///
    /// An empty slice means the placeholder state.
    fn render_playlist(&mut self, _tracks: &[Track], _highlight: Option<usize>) {}

    /// Update the now-playing panel, with error text replacing the artist line
    fn set_now_playing(&mut self, _track: &Track, _error_text: Option<&str>) {}

    /// Update button indicators
    fn set_icon_state(&mut self, _icons: IconState) {}

    /// Update the volume slider (0-100)
    fn set_volume_slider(&mut self, _position: u8) {}

    /// Update the playback rate selector
    fn set_playback_rate(&mut self, _rate: f64) {}

    /// Update seek bar bounds, thumb and enabled state
    fn set_seek_range(&mut self, _range: SeekRange) {}

    /// Update the elapsed/total labels and progress fill
    fn set_time_display(&mut self, _current: f64, _total: f64) {}

    /// Show a one-line transient notice
    fn show_notice(&mut self, _text: &str) {}
}

/// Renderer that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {}
