//! WASM-compatible PlayerSession wrapper

use super::renderer::JsRenderer;
use super::transport::{token_from_js, JsMediaTransport, JsTransport};
use crate::intake::CandidateFile;
use crate::session::PlayerSession;
use aria_playback::{PlayRejection, PlaybackStatus, PlayerConfig, TransportEvent};
use aria_storage::{KeyValueStore, LocalStorageStore, MemoryStore, PersistenceStore, StorageConfig};
use js_sys::Function;
use wasm_bindgen::prelude::*;

/// WASM-compatible player session
///
/// Wraps [`PlayerSession`] with a JavaScript-friendly API. Persists to
/// `localStorage`, falling back to memory when storage is disabled.
#[wasm_bindgen]
pub struct WasmPlayerSession {
    inner: PlayerSession<JsTransport>,
}

#[wasm_bindgen]
impl WasmPlayerSession {
    /// Create the session and restore saved state
    ///
    /// `on_update` receives every view update as a tagged object.
    #[wasm_bindgen(constructor)]
    pub fn new(transport: JsMediaTransport, on_update: Function) -> Self {
        console_error_panic_hook::set_once();

        let backend: Box<dyn KeyValueStore> = match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                tracing::warn!(error = %e, "localStorage unavailable, state will not persist");
                Box::new(MemoryStore::new())
            }
        };

        let inner = PlayerSession::start(
            JsTransport::new(transport),
            PersistenceStore::new(backend, StorageConfig::default()),
            Box::new(JsRenderer::new(on_update)),
            PlayerConfig::default(),
        );
        Self { inner }
    }

    /// Full reload from storage; returns the restore outcome
    pub fn reload(&mut self) -> JsValue {
        let outcome = self.inner.reload();
        serde_wasm_bindgen::to_value(&outcome).unwrap_or(JsValue::NULL)
    }

    // ===== Playback Control =====

    pub fn play(&mut self) -> Result<(), JsValue> {
        self.inner.play().map_err(to_js)
    }

    pub fn pause(&mut self) {
        self.inner.pause();
    }

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&mut self) -> Result<(), JsValue> {
        self.inner.toggle_play().map_err(to_js)
    }

    pub fn next(&mut self) -> Result<(), JsValue> {
        self.inner.next().map_err(to_js)
    }

    pub fn previous(&mut self) -> Result<(), JsValue> {
        self.inner.previous().map_err(to_js)
    }

    #[wasm_bindgen(js_name = selectTrack)]
    pub fn select_track(&mut self, index: usize) -> Result<(), JsValue> {
        self.inner.select_track(index).map_err(to_js)
    }

    /// Playlist item click
    #[wasm_bindgen(js_name = playTrack)]
    pub fn play_track(&mut self, index: usize) -> Result<(), JsValue> {
        self.inner.play_track(index).map_err(to_js)
    }

    // ===== Seeking =====

    #[wasm_bindgen(js_name = seekStart)]
    pub fn seek_start(&mut self) {
        self.inner.seek_start();
    }

    #[wasm_bindgen(js_name = seekPreview)]
    pub fn seek_preview(&mut self, time: f64) {
        self.inner.seek_preview(time);
    }

    #[wasm_bindgen(js_name = seekEnd)]
    pub fn seek_end(&mut self, time: f64) -> Result<(), JsValue> {
        self.inner.seek_end(time).map_err(to_js)
    }

    // ===== Volume & Modes =====

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, level: u8) {
        self.inner.set_volume(level);
    }

    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&mut self) {
        self.inner.toggle_mute();
    }

    #[wasm_bindgen(js_name = toggleShuffle)]
    pub fn toggle_shuffle(&mut self) {
        self.inner.toggle_shuffle();
    }

    #[wasm_bindgen(js_name = toggleRepeat)]
    pub fn toggle_repeat(&mut self) {
        self.inner.toggle_repeat();
    }

    #[wasm_bindgen(js_name = setPlaybackRate)]
    pub fn set_playback_rate(&mut self, rate: f64) -> Result<(), JsValue> {
        self.inner.set_playback_rate(rate).map_err(to_js)
    }

    // ===== Playlist =====

    /// Add files: an array of `{ name, mimeType, src }`
    ///
    /// Returns the number of tracks added.
    #[wasm_bindgen(js_name = addFiles)]
    pub fn add_files(&mut self, files: JsValue) -> Result<usize, JsValue> {
        let files: Vec<CandidateFile> = serde_wasm_bindgen::from_value(files)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse files: {}", e)))?;
        self.inner.add_files(&files).map_err(to_js)
    }

    #[wasm_bindgen(js_name = savePlaylist)]
    pub fn save_playlist(&mut self) -> Result<(), JsValue> {
        self.inner.save_playlist().map_err(to_js)
    }

    #[wasm_bindgen(js_name = pageHidden)]
    pub fn page_hidden(&mut self) {
        self.inner.page_hidden();
    }

    // ===== State Queries =====

    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&self) -> String {
        match self.inner.controller().status() {
            PlaybackStatus::Stopped => "stopped".to_string(),
            PlaybackStatus::Paused => "paused".to_string(),
            PlaybackStatus::Playing => "playing".to_string(),
            PlaybackStatus::Error => "error".to_string(),
        }
    }

    #[wasm_bindgen(js_name = currentIndex)]
    pub fn current_index(&self) -> usize {
        self.inner.controller().current_index()
    }

    /// Playback state as it would be persisted
    pub fn snapshot(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.inner.controller().snapshot()).unwrap_or(JsValue::NULL)
    }

    /// Current playlist
    pub fn tracks(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.inner.controller().playlist().tracks())
            .unwrap_or(JsValue::NULL)
    }

    // ===== Transport Callbacks =====

    #[wasm_bindgen(js_name = onLoadedMetadata)]
    pub fn on_loaded_metadata(&mut self, token: f64, duration: f64) {
        self.deliver(TransportEvent::MetadataLoaded {
            token: token_from_js(token),
            duration,
        });
    }

    #[wasm_bindgen(js_name = onCanPlay)]
    pub fn on_can_play(&mut self, token: f64) {
        self.deliver(TransportEvent::CanPlay {
            token: token_from_js(token),
        });
    }

    #[wasm_bindgen(js_name = onTimeUpdate)]
    pub fn on_time_update(&mut self, token: f64, current_time: f64) {
        self.deliver(TransportEvent::TimeUpdate {
            token: token_from_js(token),
            current_time,
        });
    }

    #[wasm_bindgen(js_name = onEnded)]
    pub fn on_ended(&mut self, token: f64) {
        self.deliver(TransportEvent::Ended {
            token: token_from_js(token),
        });
    }

    #[wasm_bindgen(js_name = onLoadError)]
    pub fn on_load_error(&mut self, token: f64, reason: String) {
        self.deliver(TransportEvent::LoadFailed {
            token: token_from_js(token),
            reason,
        });
    }

    #[wasm_bindgen(js_name = onPlayStarted)]
    pub fn on_play_started(&mut self, token: f64) {
        self.deliver(TransportEvent::PlayStarted {
            token: token_from_js(token),
        });
    }

    /// A `play()` promise rejected; `name` is the DOMException name
    #[wasm_bindgen(js_name = onPlayRejected)]
    pub fn on_play_rejected(&mut self, token: f64, name: &str, message: &str) {
        self.deliver(TransportEvent::PlayRejected {
            token: token_from_js(token),
            rejection: PlayRejection::classify(name, message),
        });
    }

    fn deliver(&mut self, event: TransportEvent) {
        self.inner.handle_transport_event(event);
    }
}

fn to_js(error: crate::SessionError) -> JsValue {
    JsValue::from_str(&error.to_string())
}
