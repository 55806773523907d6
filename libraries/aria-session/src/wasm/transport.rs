//! Media transport backed by a JavaScript object
//!
//! Any object with these members works (duck typed):
//!
//! ```js
//! {
//!   load(src, token), play(token), pause(),
//!   paused, hasSource, currentTime, duration, volume, muted, playbackRate,
//!   seekableStart(), seekableEnd(),   // NaN when not seekable
//! }
//! ```
//!
//! `duration` is NaN until metadata is known. Tokens travel as numbers.
//! Outcomes of `load` and `play` are reported back through the session's
//! `on*` methods with the same token.

use aria_playback::{LoadToken, MediaTransport, SeekableRange};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// JavaScript media transport object
    pub type JsMediaTransport;

    #[wasm_bindgen(method)]
    fn load(this: &JsMediaTransport, src: &str, token: f64);

    #[wasm_bindgen(method)]
    fn play(this: &JsMediaTransport, token: f64);

    #[wasm_bindgen(method)]
    fn pause(this: &JsMediaTransport);

    #[wasm_bindgen(method, getter)]
    fn paused(this: &JsMediaTransport) -> bool;

    #[wasm_bindgen(method, getter, js_name = hasSource)]
    fn has_source(this: &JsMediaTransport) -> bool;

    #[wasm_bindgen(method, getter, js_name = currentTime)]
    fn current_time(this: &JsMediaTransport) -> f64;

    #[wasm_bindgen(method, setter, js_name = currentTime)]
    fn set_current_time(this: &JsMediaTransport, value: f64);

    #[wasm_bindgen(method, getter)]
    fn duration(this: &JsMediaTransport) -> f64;

    #[wasm_bindgen(method, getter)]
    fn volume(this: &JsMediaTransport) -> f64;

    #[wasm_bindgen(method, setter)]
    fn set_volume(this: &JsMediaTransport, value: f64);

    #[wasm_bindgen(method, getter)]
    fn muted(this: &JsMediaTransport) -> bool;

    #[wasm_bindgen(method, setter)]
    fn set_muted(this: &JsMediaTransport, value: bool);

    #[wasm_bindgen(method, getter, js_name = playbackRate)]
    fn playback_rate(this: &JsMediaTransport) -> f64;

    #[wasm_bindgen(method, setter, js_name = playbackRate)]
    fn set_playback_rate(this: &JsMediaTransport, value: f64);

    #[wasm_bindgen(method, js_name = seekableStart)]
    fn seekable_start(this: &JsMediaTransport) -> f64;

    #[wasm_bindgen(method, js_name = seekableEnd)]
    fn seekable_end(this: &JsMediaTransport) -> f64;
}

/// Adapter from [`JsMediaTransport`] to [`MediaTransport`]
pub struct JsTransport {
    inner: JsMediaTransport,
}

impl JsTransport {
    pub fn new(inner: JsMediaTransport) -> Self {
        Self { inner }
    }
}

// Token counts stay far below 2^53
pub(crate) fn token_to_js(token: LoadToken) -> f64 {
    token.0 as f64
}

pub(crate) fn token_from_js(token: f64) -> LoadToken {
    LoadToken(token as u64)
}

impl MediaTransport for JsTransport {
    fn load(&mut self, src: &str, token: LoadToken) {
        self.inner.load(src, token_to_js(token));
    }

    fn play(&mut self, token: LoadToken) {
        self.inner.play(token_to_js(token));
    }

    fn pause(&mut self) {
        self.inner.pause();
    }

    fn is_paused(&self) -> bool {
        self.inner.paused()
    }

    fn has_source(&self) -> bool {
        self.inner.has_source()
    }

    fn current_time(&self) -> f64 {
        self.inner.current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.inner.set_current_time(seconds);
    }

    fn duration(&self) -> Option<f64> {
        let duration = self.inner.duration();
        (!duration.is_nan()).then_some(duration)
    }

    fn volume(&self) -> f64 {
        self.inner.volume()
    }

    fn set_volume(&mut self, volume: f64) {
        self.inner.set_volume(volume);
    }

    fn is_muted(&self) -> bool {
        self.inner.muted()
    }

    fn set_muted(&mut self, muted: bool) {
        self.inner.set_muted(muted);
    }

    fn playback_rate(&self) -> f64 {
        self.inner.playback_rate()
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.inner.set_playback_rate(rate);
    }

    fn seekable(&self) -> Option<SeekableRange> {
        let start = self.inner.seekable_start();
        let end = self.inner.seekable_end();
        (start.is_finite() && end.is_finite()).then(|| SeekableRange::new(start, end))
    }
}
