//! Renderer forwarding view updates to a JavaScript callback

use crate::renderer::Renderer;
use aria_playback::{format_time, IconState, ProgressUpdate, SeekRange, Track};
use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::JsValue;

/// One view update, serialized for the page
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum ViewUpdate<'a> {
    Playlist {
        tracks: &'a [Track],
        highlight: Option<usize>,
    },
    #[serde(rename_all = "camelCase")]
    NowPlaying {
        track: &'a Track,
        error_text: Option<&'a str>,
    },
    Icons {
        icons: IconState,
    },
    VolumeSlider {
        position: u8,
    },
    PlaybackRate {
        rate: f64,
    },
    SeekRange {
        range: SeekRange,
    },
    #[serde(rename_all = "camelCase")]
    Time {
        current: f64,
        total: f64,
        current_label: String,
        total_label: String,
        percent: f64,
    },
    Notice {
        text: &'a str,
    },
}

/// Calls `callback(update)` for every view update
pub struct JsRenderer {
    callback: Function,
}

impl JsRenderer {
    pub fn new(callback: Function) -> Self {
        Self { callback }
    }

    fn send(&self, update: &ViewUpdate<'_>) {
        match serde_wasm_bindgen::to_value(update) {
            Ok(value) => {
                self.callback.call1(&JsValue::NULL, &value).ok();
            }
            Err(e) => tracing::error!(error = %e, "failed to serialize view update"),
        }
    }
}

impl Renderer for JsRenderer {
    fn render_playlist(&mut self, tracks: &[Track], highlight: Option<usize>) {
        self.send(&ViewUpdate::Playlist { tracks, highlight });
    }

    fn set_now_playing(&mut self, track: &Track, error_text: Option<&str>) {
        self.send(&ViewUpdate::NowPlaying { track, error_text });
    }

    fn set_icon_state(&mut self, icons: IconState) {
        self.send(&ViewUpdate::Icons { icons });
    }

    fn set_volume_slider(&mut self, position: u8) {
        self.send(&ViewUpdate::VolumeSlider { position });
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.send(&ViewUpdate::PlaybackRate { rate });
    }

    fn set_seek_range(&mut self, range: SeekRange) {
        self.send(&ViewUpdate::SeekRange { range });
    }

    fn set_time_display(&mut self, current: f64, total: f64) {
        self.send(&ViewUpdate::Time {
            current,
            total,
            current_label: format_time(current),
            total_label: format_time(total),
            percent: ProgressUpdate::new(current, total).percent(),
        });
    }

    fn show_notice(&mut self, text: &str) {
        self.send(&ViewUpdate::Notice { text });
    }
}
