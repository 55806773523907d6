//! Line-oriented renderer
//!
//! Prints the view updates a person would notice: track changes, playlist
//! redraws, errors and notices. Progress ticks and icon refreshes are
//! left to the `status` command.

use aria_playback::{format_time, Track};
use aria_session::Renderer;
use std::io::Write;

pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::debug!(error = %e, "failed to write view update");
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render_playlist(&mut self, tracks: &[Track], highlight: Option<usize>) {
        if tracks.is_empty() {
            self.line("playlist: empty");
            return;
        }
        self.line(&format!("playlist: {} tracks", tracks.len()));
        for (index, track) in tracks.iter().enumerate() {
            let marker = if highlight == Some(index) { '>' } else { ' ' };
            self.line(&format!(
                "{marker} {index:>3}  {} - {}",
                track.display_artist(),
                track.display_title()
            ));
        }
    }

    fn set_now_playing(&mut self, track: &Track, error_text: Option<&str>) {
        match error_text {
            Some(error) => self.line(&format!("error: {} ({error})", track.display_title())),
            None => self.line(&format!(
                "now playing: {} - {}",
                track.display_artist(),
                track.display_title()
            )),
        }
    }

    fn set_volume_slider(&mut self, position: u8) {
        self.line(&format!("volume: {position}%"));
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.line(&format!("rate: {rate}x"));
    }

    fn show_notice(&mut self, text: &str) {
        self.line(text);
    }
}

/// One-line summary used by `status`
pub fn status_line(
    title: &str,
    status: &str,
    current: f64,
    duration: Option<f64>,
) -> String {
    let total = duration.map_or_else(|| "--:--".to_string(), format_time);
    format!("[{status}] {title} {}/{total}", format_time(current))
}
