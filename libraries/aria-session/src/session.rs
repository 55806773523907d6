//! Player session
//!
//! One explicit owner for everything a page instance needs: the
//! controller (and its transport), persistence and the renderer. Every
//! action forwards to the controller and then flushes the events it
//! emitted, persist requests first-come-first-served with view updates.

use crate::error::{Result, SessionError};
use crate::intake::{self, CandidateFile};
use crate::renderer::Renderer;
use crate::restore::{self, RestoreOutcome};
use aria_playback::{
    MediaTransport, PlaybackController, PlayerConfig, PlayerEvent, Track, TransportEvent,
};
use aria_storage::PersistenceStore;
use tracing::{debug, info};

/// A running player
pub struct PlayerSession<T: MediaTransport> {
    controller: PlaybackController<T>,
    store: PersistenceStore,
    renderer: Box<dyn Renderer>,
    config: PlayerConfig,
    restore_outcome: RestoreOutcome,
}

impl<T: MediaTransport> PlayerSession<T> {
    /// Build the session and restore persisted state
    ///
    /// Never starts playback.
    pub fn start(
        transport: T,
        store: PersistenceStore,
        renderer: Box<dyn Renderer>,
        config: PlayerConfig,
    ) -> Self {
        let controller = PlaybackController::new(transport, config.clone());
        let mut session = Self {
            controller,
            store,
            renderer,
            config,
            restore_outcome: RestoreOutcome::Empty,
        };

        session.restore_outcome = restore::restore(&mut session.controller, &mut session.store);
        session.flush();
        info!(outcome = ?session.restore_outcome, "player session started");
        session
    }

    /// Full reload: re-read storage and restore from it
    pub fn reload(&mut self) -> RestoreOutcome {
        self.restore_outcome = restore::restore(&mut self.controller, &mut self.store);
        self.flush();
        self.restore_outcome
    }

    // ===== Accessors =====

    /// The playback controller
    pub fn controller(&self) -> &PlaybackController<T> {
        &self.controller
    }

    /// The media transport
    pub fn transport(&self) -> &T {
        self.controller.transport()
    }

    /// Mutable access to the media transport
    ///
    /// Events the transport raises must come back through
    /// [`PlayerSession::handle_transport_event`].
    pub fn transport_mut(&mut self) -> &mut T {
        self.controller.transport_mut()
    }

    /// Configuration the session was started with
    pub fn player_config(&self) -> &PlayerConfig {
        &self.config
    }

    /// The persistence store
    pub fn store(&self) -> &PersistenceStore {
        &self.store
    }

    /// What the last restore did
    pub fn restore_outcome(&self) -> RestoreOutcome {
        self.restore_outcome
    }

    // ===== Playback Control =====

    /// Play or resume
    pub fn play(&mut self) -> Result<()> {
        self.run(PlaybackController::play).map_err(SessionError::from)
    }

    /// Pause
    pub fn pause(&mut self) {
        self.run(PlaybackController::pause);
    }

    /// Play/pause button
    pub fn toggle_play(&mut self) -> Result<()> {
        self.run(PlaybackController::toggle_play).map_err(SessionError::from)
    }

    /// Next button
    pub fn next(&mut self) -> Result<()> {
        self.run(PlaybackController::play_next).map_err(SessionError::from)
    }

    /// Previous button
    pub fn previous(&mut self) -> Result<()> {
        self.run(PlaybackController::play_prev).map_err(SessionError::from)
    }

    /// Select a track without playing it
    pub fn select_track(&mut self, index: usize) -> Result<()> {
        self.run(|c| c.select_track(index).map(|_| ())).map_err(SessionError::from)
    }

    /// Playlist click: select a track and play it
    pub fn play_track(&mut self, index: usize) -> Result<()> {
        self.run(|c| {
            c.select_track(index)?;
            c.play()
        })
        .map_err(SessionError::from)
    }

    // ===== Seeking =====

    /// Seek bar grabbed
    pub fn seek_start(&mut self) {
        self.run(PlaybackController::seek_start);
    }

    /// Seek bar dragged to `time`
    pub fn seek_preview(&mut self, time: f64) {
        self.run(|c| c.seek_preview(time));
    }

    /// Seek bar released at `time`
    pub fn seek_end(&mut self, time: f64) -> Result<()> {
        self.run(|c| c.seek_end(time)).map_err(SessionError::from)
    }

    /// Seek in one step (keyboard or CLI)
    pub fn seek_to(&mut self, time: f64) -> Result<()> {
        self.run(|c| {
            c.seek_start();
            c.seek_end(time)
        })
        .map_err(SessionError::from)
    }

    // ===== Volume & Modes =====

    /// Volume slider (0-100)
    pub fn set_volume(&mut self, level: u8) {
        self.run(|c| c.set_volume(level));
    }

    /// Volume icon click
    pub fn toggle_mute(&mut self) {
        self.run(PlaybackController::toggle_mute);
    }

    /// Shuffle button
    pub fn toggle_shuffle(&mut self) {
        self.run(PlaybackController::toggle_shuffle);
    }

    /// Repeat button
    pub fn toggle_repeat(&mut self) {
        self.run(PlaybackController::toggle_repeat);
    }

    /// Speed selector
    pub fn set_playback_rate(&mut self, rate: f64) -> Result<()> {
        self.run(|c| c.set_playback_rate(rate)).map_err(SessionError::from)
    }

    // ===== Playlist =====

    /// Add user-selected files
    ///
    /// Non-audio files are skipped. Returns the number of tracks added.
    pub fn add_files(&mut self, files: &[CandidateFile]) -> Result<usize> {
        let tracks = intake::tracks_from_files(files, &self.config);
        if tracks.is_empty() {
            self.renderer.show_notice("No audio files selected");
            return Err(SessionError::NoAudioFiles(files.len()));
        }
        self.add_tracks(tracks)
    }

    /// Append tracks and pick one to load
    ///
    /// The first new track is selected when nothing is playing; otherwise
    /// the first track is selected only if nothing is loaded at all.
    /// Never starts playback.
    pub fn add_tracks(&mut self, tracks: Vec<Track>) -> Result<usize> {
        let before = self.controller.playlist().len();
        let first = self.controller.append_tracks(tracks);
        let added = self.controller.playlist().len() - before;
        info!(added, "tracks added");

        let selection = match first {
            Some(index) if !self.controller.is_playing() => Some(index),
            _ if !self.controller.transport().has_source()
                && !self.controller.playlist().is_empty() =>
            {
                Some(0)
            }
            _ => None,
        };
        let result = match selection {
            Some(index) => self.controller.select_track(index).map(|_| ()),
            None => Ok(()),
        };

        self.flush();
        self.store.save_playlist(self.controller.playlist().tracks());
        result?;
        Ok(added)
    }

    /// Explicit save action; the outcome is shown as a notice
    pub fn save_playlist(&mut self) -> Result<()> {
        let result = self.store.save_playlist_now(self.controller.playlist().tracks());
        match &result {
            Ok(()) => self.renderer.show_notice("Playlist saved"),
            Err(e) => self
                .renderer
                .show_notice(&format!("Could not save playlist: {e}")),
        }
        result.map_err(SessionError::from)
    }

    // ===== Transport & Lifecycle =====

    /// Deliver an event raised by the media transport
    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        self.run(|c| c.handle_event(event));
    }

    /// Page is being hidden: persist both records
    pub fn page_hidden(&mut self) {
        debug!("page hidden, persisting");
        self.flush();
        let snapshot = self.controller.snapshot();
        self.store.save_playback_state(&snapshot);
        self.store.save_playlist(self.controller.playlist().tracks());
    }

    /// Persist and tear down, returning the transport
    pub fn shutdown(mut self) -> T {
        self.page_hidden();
        info!("player session shut down");
        let Self { controller, .. } = self;
        controller.into_transport()
    }

    // ===== Event Flush =====

    fn run<R>(&mut self, action: impl FnOnce(&mut PlaybackController<T>) -> R) -> R {
        let result = action(&mut self.controller);
        self.flush();
        result
    }

    /// Route pending controller events, oldest first
    fn flush(&mut self) {
        for event in self.controller.drain_events() {
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: PlayerEvent) {
        let renderer = self.renderer.as_mut();
        match event {
            PlayerEvent::PersistRequested(snapshot) => {
                self.store.save_playback_state(&snapshot);
            }
            PlayerEvent::StatusChanged { .. } | PlayerEvent::ModesChanged { .. } => {
                renderer.set_icon_state(self.controller.icon_state());
            }
            PlayerEvent::VolumeChanged { slider, .. } => {
                renderer.set_volume_slider(slider);
                renderer.set_icon_state(self.controller.icon_state());
            }
            PlayerEvent::RateChanged { rate } => renderer.set_playback_rate(rate),
            PlayerEvent::TrackChanged { index, track } => {
                renderer.set_now_playing(&track, None);
                renderer.render_playlist(self.controller.playlist().tracks(), Some(index));
            }
            PlayerEvent::TrackError { index, message } => {
                let track = index
                    .and_then(|i| self.controller.playlist().get(i))
                    .cloned()
                    .unwrap_or_else(Track::placeholder);
                renderer.set_now_playing(&track, Some(&message));
            }
            PlayerEvent::PlaylistChanged { highlight } => {
                renderer.render_playlist(self.controller.playlist().tracks(), highlight);
            }
            PlayerEvent::EmptyPlaylist => {
                renderer.render_playlist(&[], None);
                renderer.set_now_playing(&Track::placeholder(), None);
            }
            PlayerEvent::SeekRangeChanged(range) => renderer.set_seek_range(range),
            PlayerEvent::Progress(progress) => {
                renderer.set_time_display(progress.current, progress.duration);
            }
        }
    }
}
