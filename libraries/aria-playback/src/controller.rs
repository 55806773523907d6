//! Playback controller - core state machine
//!
//! Owns the playlist and the media transport, and decides what happens on
//! every user action and every transport event. It never renders and never
//! writes to storage: results are pushed as [`PlayerEvent`]s and taken
//! with [`PlaybackController::drain_events`].

use crate::{
    error::{PlaybackError, Result, SeekRejection},
    events::{IconState, PlayerEvent, ProgressUpdate, SeekRange},
    playlist::Playlist,
    shuffle,
    transport::{LoadToken, MediaTransport, TransportEvent},
    types::{
        PlayRejection, PlaybackSnapshot, PlaybackStatus, PlayerConfig, RepeatMode, Track,
        MAX_PLAYBACK_RATE, MIN_PLAYBACK_RATE,
    },
    volume::Volume,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// Central playback state machine
///
/// States: `Stopped`, `Paused` (loaded), `Playing` (loaded), `Error`, with
/// seeking as a flag over either loaded state.
///
/// Each track load gets a fresh [`LoadToken`]. Transport events for any
/// other token are dropped, which cancels deferred work (resume position,
/// play-once-ready) left behind by a superseded selection.
pub struct PlaybackController<T: MediaTransport> {
    transport: T,
    playlist: Playlist,

    // State
    status: PlaybackStatus,
    current_index: usize,
    is_playing: bool,
    is_seeking: bool,
    duration: Option<f64>,
    last_error: Option<PlaybackError>,

    // Settings
    volume: Volume,
    shuffle: bool,
    repeat: RepeatMode,
    playback_rate: f64,

    // Load tracking
    last_token: u64,
    active_load: Option<LoadToken>,
    pending_play: Option<LoadToken>,
    pending_resume: Option<(LoadToken, f64)>,
    // Set by pause(); a play outcome arriving afterwards is not an error
    paused_by_user: bool,

    rng: StdRng,

    // Event queue for UI and storage
    pending_events: Vec<PlayerEvent>,
}

impl<T: MediaTransport> PlaybackController<T> {
    /// Create a controller over `transport` with the placeholder playlist
    pub fn new(transport: T, config: PlayerConfig) -> Self {
        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut controller = Self {
            transport,
            playlist: Playlist::new(),
            status: PlaybackStatus::Stopped,
            current_index: 0,
            is_playing: false,
            is_seeking: false,
            duration: None,
            last_error: None,
            volume: Volume::new(config.initial_volume),
            shuffle: false,
            repeat: RepeatMode::Off,
            playback_rate: 1.0,
            last_token: 0,
            active_load: None,
            pending_play: None,
            pending_resume: None,
            paused_by_user: false,
            rng,
            pending_events: Vec::new(),
        };

        controller.transport.set_volume(controller.volume.gain());
        controller.transport.set_muted(false);
        controller.transport.set_playback_rate(1.0);
        controller
    }

    // ===== Accessors =====

    /// The media transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the media transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the controller, returning the transport
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// The playlist
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// Current playback status
    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Index of the current track
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The current track, if the playlist has one at the current index
    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.get(self.current_index)
    }

    /// Whether media is actually playing
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether the user is dragging the seek bar
    pub fn is_seeking(&self) -> bool {
        self.is_seeking
    }

    /// Duration of the loaded track once metadata arrived
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Error that put the controller in `Error`
    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    /// Volume state
    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// Shuffle flag
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Repeat mode
    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Playback rate
    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    /// Token of the most recent load
    pub fn active_load(&self) -> Option<LoadToken> {
        self.active_load
    }

    /// Button indicator state
    pub fn icon_state(&self) -> IconState {
        IconState {
            playing: self.is_playing,
            volume: self.volume.icon(),
            shuffle: self.shuffle,
            repeat: self.repeat,
        }
    }

    /// Playback state as it should be persisted
    ///
    /// While a resume position is waiting for metadata, that position is
    /// reported instead of the transport's.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let time = match self.pending_resume {
            Some((_, time)) => time,
            None => sanitize_time(self.transport.current_time()),
        };

        PlaybackSnapshot {
            index: self.current_index,
            time,
            volume: self.volume.gain(),
            muted: self.volume.is_muted(),
            shuffle: self.shuffle,
            repeat: self.repeat,
            playback_rate: self.playback_rate,
        }
    }

    /// Take all events emitted since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Playlist =====

    /// Append tracks to the playlist
    ///
    /// Returns the index of the first appended track.
    pub fn append_tracks(&mut self, tracks: Vec<Track>) -> Option<usize> {
        let was_empty = self.playlist.is_empty();
        let first = self.playlist.append(tracks);

        if first.is_some() && was_empty {
            self.current_index = 0;
        }

        let highlight = (!self.playlist.is_empty()).then_some(self.current_index);
        self.emit(PlayerEvent::PlaylistChanged { highlight });
        first
    }

    /// Swap in a whole new playlist (full reload)
    ///
    /// Unloads the current track; the caller selects a track afterwards.
    pub fn replace_playlist(&mut self, playlist: Playlist) {
        self.transport.pause();
        self.playlist = playlist;
        self.current_index = 0;
        self.is_playing = false;
        self.is_seeking = false;
        self.duration = None;
        self.last_error = None;
        self.active_load = None;
        self.pending_play = None;
        self.pending_resume = None;
        self.status = PlaybackStatus::Stopped;

        if self.playlist.is_empty() {
            self.emit(PlayerEvent::PlaylistChanged { highlight: None });
            self.show_empty_state();
        } else {
            self.emit(PlayerEvent::PlaylistChanged { highlight: Some(0) });
            self.emit_status();
        }
    }

    // ===== Track Selection =====

    /// Select a track and start loading it (does not play)
    ///
    /// The index is persisted before the load is requested, so a failing
    /// load cannot roll it back.
    pub fn select_track(&mut self, index: usize) -> Result<LoadToken> {
        self.load_index(index, None)
    }

    /// Select a track and resume at `time` once its metadata is known
    ///
    /// A position at or past the track's duration resumes from zero. The
    /// resume is dropped if another selection supersedes this one first.
    pub fn restore_track(&mut self, index: usize, time: f64) -> Result<LoadToken> {
        self.load_index(index, Some(time))
    }

    fn load_index(&mut self, index: usize, resume: Option<f64>) -> Result<LoadToken> {
        if self.playlist.is_empty() {
            self.show_empty_state();
            return Err(PlaybackError::EmptyPlaylist);
        }

        let len = self.playlist.len();
        let Some(track) = self.playlist.get(index).cloned() else {
            warn!(index, len, "invalid track index");
            return Err(PlaybackError::InvalidIndex { index, len });
        };

        if !track.has_source() {
            warn!(index, title = %track.title, "track has no source, file must be added again");
            self.transport.pause();
            self.is_playing = false;
            self.pending_play = None;
            self.status = PlaybackStatus::Stopped;
            self.emit(PlayerEvent::TrackError {
                index: Some(index),
                message: format!("{} needs to be added again", track.display_title()),
            });
            self.emit_status();
            return Err(PlaybackError::MissingSource(index));
        }

        self.current_index = index;
        let token = self.issue_token();
        self.pending_play = None;
        self.pending_resume = resume
            .filter(|time| time.is_finite() && *time > 0.0)
            .map(|time| (token, time));

        // Persist before the load side effect
        let time = self.pending_resume.map_or(0.0, |(_, time)| time);
        let snapshot = PlaybackSnapshot {
            time,
            ..self.snapshot()
        };
        self.emit(PlayerEvent::PersistRequested(snapshot));

        self.is_playing = false;
        self.is_seeking = false;
        self.duration = None;
        self.last_error = None;
        self.status = PlaybackStatus::Paused;

        info!(index, title = %track.title, %token, "loading track");
        self.emit(PlayerEvent::TrackChanged {
            index,
            track: track.clone(),
        });
        self.emit(PlayerEvent::Progress(ProgressUpdate::zero()));
        self.emit(PlayerEvent::SeekRangeChanged(SeekRange::disabled()));

        self.transport.load(&track.src, token);
        self.emit_status();
        Ok(token)
    }

    fn issue_token(&mut self) -> LoadToken {
        self.last_token += 1;
        let token = LoadToken(self.last_token);
        self.active_load = Some(token);
        token
    }

    // ===== Playback Control =====

    /// Start or resume playback
    ///
    /// No-op while the transport is already playing (this also absorbs
    /// repeated clicks while a play request is in flight). With nothing
    /// loaded, loads the first track and plays once it can.
    pub fn play(&mut self) -> Result<()> {
        if !self.transport.is_paused() {
            debug!("play ignored, transport already playing");
            return Ok(());
        }

        let token = match self.active_load {
            Some(token) if self.transport.has_source() => token,
            _ => {
                let token = self.load_index(0, None)?;
                debug!(%token, "nothing loaded, will play once the first track can play");
                self.pending_play = Some(token);
                self.paused_by_user = false;
                return Ok(());
            }
        };

        if self.pending_play == Some(token) {
            debug!(%token, "play already waiting for can-play");
            return Ok(());
        }

        self.paused_by_user = false;
        self.transport.play(token);
        self.persist();
        Ok(())
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.transport.pause();
        self.is_playing = false;
        self.pending_play = None;
        self.paused_by_user = true;
        if self.status == PlaybackStatus::Playing {
            self.status = PlaybackStatus::Paused;
        }
        self.emit_status();
        self.persist();
    }

    /// Play/pause button
    ///
    /// Follows the transport rather than `is_playing`, so a click while a
    /// play request is still in flight pauses.
    pub fn toggle_play(&mut self) -> Result<()> {
        if !self.transport.is_paused() || self.pending_play.is_some() {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Skip to next track and play it
    ///
    /// Does nothing with a single track unless repeating it.
    pub fn play_next(&mut self) -> Result<()> {
        let len = self.playlist.len();
        if len == 0 {
            self.show_empty_state();
            return Err(PlaybackError::EmptyPlaylist);
        }

        if len <= 1 && self.repeat != RepeatMode::One {
            debug!("next ignored, single track without repeat-one");
            return Ok(());
        }

        let next = shuffle::next_index(self.current_index, len, self.shuffle, &mut self.rng);
        self.select_track(next)?;
        self.play()
    }

    /// Go to previous track and play it
    ///
    /// Under shuffle this is another random pick, not history.
    pub fn play_prev(&mut self) -> Result<()> {
        let len = self.playlist.len();
        if len == 0 {
            self.show_empty_state();
            return Err(PlaybackError::EmptyPlaylist);
        }

        let prev = shuffle::previous_index(self.current_index, len, self.shuffle, &mut self.rng);
        self.select_track(prev)?;
        self.play()
    }

    // ===== Seeking =====

    /// User started dragging the seek bar
    ///
    /// Time updates stop moving the progress display until `seek_end`.
    pub fn seek_start(&mut self) {
        self.is_seeking = true;
    }

    /// User is dragging: show the scrub position without seeking
    pub fn seek_preview(&mut self, time: f64) {
        if !self.is_seeking {
            return;
        }
        let Some(duration) = self.valid_duration() else {
            return;
        };

        let current = sanitize_time(time).min(duration);
        self.emit(PlayerEvent::Progress(ProgressUpdate::new(current, duration)));
    }

    /// Move the transport to `time`
    ///
    /// Refused when the duration is unknown, the media cannot seek, or
    /// `time` is outside the seekable range.
    pub fn seek_apply(&mut self, time: f64) -> Result<()> {
        let rejection = match (self.valid_duration(), self.transport.seekable()) {
            (None, _) => Some(SeekRejection::UnknownDuration),
            (Some(_), None) => Some(SeekRejection::NotSeekable),
            (Some(_), Some(range)) if !range.contains(time) => Some(SeekRejection::OutOfRange {
                requested: time,
                start: range.start,
                end: range.end,
            }),
            _ => None,
        };

        if let Some(rejection) = rejection {
            warn!(time, %rejection, "seek rejected");
            return Err(PlaybackError::SeekRejected(rejection));
        }

        self.transport.set_current_time(time);
        Ok(())
    }

    /// User released the seek bar at `time`
    ///
    /// Resumes playback if seeking left the media paused while it should
    /// be playing. Persists only when the seek was applied.
    pub fn seek_end(&mut self, time: f64) -> Result<()> {
        self.is_seeking = false;
        let result = self.seek_apply(time);

        if result.is_ok() {
            if self.is_playing && self.transport.is_paused() {
                if let Some(token) = self.active_load {
                    debug!(%token, "resuming after seek");
                    self.transport.play(token);
                }
            }
            self.persist();
        }

        if let Some(duration) = self.valid_duration() {
            let current = sanitize_time(self.transport.current_time());
            self.emit(PlayerEvent::Progress(ProgressUpdate::new(current, duration)));
        }

        result
    }

    // ===== Volume & Modes =====

    /// Set volume from the slider (0-100) and unmute
    pub fn set_volume(&mut self, level: u8) {
        self.volume.set_level(level);
        self.volume.set_muted(false);
        self.transport.set_volume(self.volume.gain());
        self.transport.set_muted(false);
        self.emit_volume();
        self.persist();
    }

    /// Flip mute; the volume level is kept
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.transport.set_muted(self.volume.is_muted());
        self.emit_volume();
        self.persist();
    }

    /// Flip shuffle
    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
        debug!(shuffle = self.shuffle, "shuffle toggled");
        self.emit_modes();
        self.persist();
    }

    /// Advance repeat mode: none → all → one → none
    pub fn toggle_repeat(&mut self) {
        self.repeat = self.repeat.cycle();
        debug!(repeat = %self.repeat, "repeat toggled");
        self.emit_modes();
        self.persist();
    }

    /// Set playback rate, clamped to `[0.5, 2]`
    pub fn set_playback_rate(&mut self, rate: f64) -> Result<()> {
        if !rate.is_finite() {
            return Err(PlaybackError::InvalidPlaybackRate(rate));
        }

        self.playback_rate = rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE);
        self.transport.set_playback_rate(self.playback_rate);
        self.emit(PlayerEvent::RateChanged {
            rate: self.playback_rate,
        });
        self.persist();
        Ok(())
    }

    /// Apply restored settings without persisting
    ///
    /// Volume, mute, shuffle, repeat and rate are taken from `snapshot`;
    /// index and time are handled by `restore_track`.
    pub fn apply_settings(&mut self, snapshot: &PlaybackSnapshot) {
        self.volume.set_gain(snapshot.volume);
        self.volume.set_muted(snapshot.muted);
        self.shuffle = snapshot.shuffle;
        self.repeat = snapshot.repeat;
        self.playback_rate = if snapshot.playback_rate.is_finite() {
            snapshot
                .playback_rate
                .clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE)
        } else {
            1.0
        };

        self.transport.set_volume(self.volume.gain());
        self.transport.set_muted(self.volume.is_muted());
        self.transport.set_playback_rate(self.playback_rate);
    }

    /// Re-emit everything the controls display
    ///
    /// Volume slider and icon, shuffle/repeat indicators, rate and status.
    pub fn refresh_controls(&mut self) {
        self.emit_volume();
        self.emit_modes();
        self.emit(PlayerEvent::RateChanged {
            rate: self.playback_rate,
        });
        self.emit_status();
    }

    /// Request a persist of the current state
    pub fn persist(&mut self) {
        let snapshot = self.snapshot();
        self.emit(PlayerEvent::PersistRequested(snapshot));
    }

    // ===== Transport Events =====

    /// Handle an event from the media transport
    ///
    /// Events tagged with a token other than the latest load are dropped.
    pub fn handle_event(&mut self, event: TransportEvent) {
        let token = event.token();
        if self.active_load != Some(token) {
            debug!(%token, active = ?self.active_load, "dropping stale transport event");
            return;
        }

        match event {
            TransportEvent::MetadataLoaded { duration, .. } => self.on_metadata(token, duration),
            TransportEvent::CanPlay { .. } => {
                if self.pending_play == Some(token) {
                    self.pending_play = None;
                    debug!(%token, "can play, issuing deferred play");
                    self.transport.play(token);
                    self.persist();
                }
            }
            TransportEvent::TimeUpdate { current_time, .. } => self.on_time_update(current_time),
            TransportEvent::Ended { .. } => self.on_track_end(),
            TransportEvent::LoadFailed { reason, .. } => self.on_load_failed(reason),
            TransportEvent::PlayStarted { .. } if self.transport.is_paused() => {
                debug!(%token, "play started after a pause, media stays paused");
                self.is_playing = false;
                self.emit_status();
            }
            TransportEvent::PlayStarted { .. } => {
                self.is_playing = true;
                self.status = PlaybackStatus::Playing;
                self.last_error = None;
                self.emit_status();
            }
            TransportEvent::PlayRejected { rejection, .. } => self.on_play_rejected(rejection),
        }
    }

    fn on_metadata(&mut self, token: LoadToken, duration: f64) {
        if !duration.is_finite() || duration <= 0.0 {
            debug!(duration, "no usable duration, seeking stays disabled");
            self.duration = None;
            self.pending_resume = None;
            return;
        }

        self.duration = Some(duration);

        if let Some((resume_token, time)) = self.pending_resume.take() {
            if resume_token == token {
                let time = if time < duration { time } else { 0.0 };
                debug!(time, duration, "resuming saved position");
                self.transport.set_current_time(time);
            }
        }

        let current = sanitize_time(self.transport.current_time());
        self.emit(PlayerEvent::SeekRangeChanged(SeekRange {
            min: 0.0,
            max: duration,
            value: current,
            enabled: true,
        }));
        self.emit(PlayerEvent::Progress(ProgressUpdate::new(current, duration)));
    }

    fn on_time_update(&mut self, current_time: f64) {
        if self.is_seeking {
            return;
        }
        let Some(duration) = self.valid_duration() else {
            return;
        };

        self.emit(PlayerEvent::Progress(ProgressUpdate::new(
            sanitize_time(current_time),
            duration,
        )));
    }

    /// End-of-track policy
    fn on_track_end(&mut self) {
        let last = self.playlist.last_index().unwrap_or(0);
        info!(
            index = self.current_index,
            repeat = %self.repeat,
            shuffle = self.shuffle,
            "track ended"
        );

        if self.repeat == RepeatMode::One {
            self.restart_current();
            return;
        }

        let advance =
            self.shuffle || self.repeat == RepeatMode::All || self.current_index < last;

        if advance && self.playlist.len() > 1 {
            if let Err(e) = self.play_next() {
                warn!(error = %e, "could not advance to next track");
            }
        } else if advance && self.repeat == RepeatMode::All {
            // A single track looping the whole playlist
            self.restart_current();
        } else {
            self.finish_playthrough();
        }
    }

    fn restart_current(&mut self) {
        self.transport.set_current_time(0.0);
        let duration = self.duration.unwrap_or(0.0);
        self.emit(PlayerEvent::Progress(ProgressUpdate::new(0.0, duration)));

        if let Err(e) = self.play() {
            warn!(error = %e, "could not restart track");
        }
    }

    /// Last track ended with nothing to advance to
    fn finish_playthrough(&mut self) {
        self.transport.pause();
        self.transport.set_current_time(0.0);
        self.is_playing = false;
        self.status = PlaybackStatus::Paused;

        let duration = self.duration.unwrap_or(0.0);
        self.emit(PlayerEvent::SeekRangeChanged(SeekRange {
            min: 0.0,
            max: duration,
            value: 0.0,
            enabled: self.duration.is_some(),
        }));
        self.emit(PlayerEvent::Progress(ProgressUpdate::new(0.0, duration)));
        self.emit_status();
        self.persist();
    }

    fn on_load_failed(&mut self, reason: String) {
        let index = self.current_index;
        warn!(index, %reason, "failed to load track");

        self.is_playing = false;
        self.pending_play = None;
        self.pending_resume = None;
        self.duration = None;
        self.status = PlaybackStatus::Error;

        let title = self
            .playlist
            .get(index)
            .map(|t| t.display_title().to_string())
            .unwrap_or_default();
        self.emit(PlayerEvent::TrackError {
            index: Some(index),
            message: format!("Error loading track: {title}"),
        });
        self.emit(PlayerEvent::SeekRangeChanged(SeekRange::disabled()));
        self.emit(PlayerEvent::Progress(ProgressUpdate::zero()));
        self.last_error = Some(PlaybackError::SourceLoad { index, reason });
        self.emit_status();
    }

    fn on_play_rejected(&mut self, rejection: PlayRejection) {
        if self.paused_by_user || rejection == PlayRejection::Aborted {
            debug!(%rejection, "play request interrupted by a pause");
            self.is_playing = false;
            self.pending_play = None;
            if self.status == PlaybackStatus::Playing {
                self.status = PlaybackStatus::Paused;
            }
            self.emit_status();
            return;
        }

        warn!(%rejection, "play request rejected");

        self.transport.pause();
        self.is_playing = false;
        self.pending_play = None;
        self.status = PlaybackStatus::Error;

        self.emit(PlayerEvent::TrackError {
            index: Some(self.current_index),
            message: rejection.status_text().to_string(),
        });
        self.last_error = Some(PlaybackError::PlaybackRejected(rejection));
        self.emit_status();
    }

    // ===== Helpers =====

    fn show_empty_state(&mut self) {
        self.is_playing = false;
        self.pending_play = None;
        self.status = PlaybackStatus::Stopped;
        self.emit(PlayerEvent::EmptyPlaylist);
        self.emit(PlayerEvent::SeekRangeChanged(SeekRange::disabled()));
        self.emit(PlayerEvent::Progress(ProgressUpdate::zero()));
        self.emit_status();
    }

    fn valid_duration(&self) -> Option<f64> {
        self.transport
            .duration()
            .filter(|duration| duration.is_finite() && *duration > 0.0)
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }

    fn emit_status(&mut self) {
        self.emit(PlayerEvent::StatusChanged {
            status: self.status,
            is_playing: self.is_playing,
        });
    }

    fn emit_volume(&mut self) {
        self.emit(PlayerEvent::VolumeChanged {
            volume: self.volume.gain(),
            muted: self.volume.is_muted(),
            slider: self.volume.slider_position(),
            icon: self.volume.icon(),
        });
    }

    fn emit_modes(&mut self) {
        self.emit(PlayerEvent::ModesChanged {
            shuffle: self.shuffle,
            repeat: self.repeat,
        });
    }
}

fn sanitize_time(time: f64) -> f64 {
    if time.is_finite() && time > 0.0 {
        time
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::SimulatedTransport;

    fn controller_with(tracks: &[(&str, f64)]) -> PlaybackController<SimulatedTransport> {
        let mut transport = SimulatedTransport::new();
        let mut playlist = Vec::new();
        for (name, duration) in tracks {
            let src = format!("music/{name}.mp3");
            transport.add_track(src.clone(), *duration);
            playlist.push(Track::new(*name, "Artist", src));
        }

        let config = PlayerConfig {
            shuffle_seed: Some(11),
            ..PlayerConfig::default()
        };
        let mut controller = PlaybackController::new(transport, config);
        controller.append_tracks(playlist);
        controller.drain_events();
        controller
    }

    fn pump(controller: &mut PlaybackController<SimulatedTransport>) {
        while let Some(event) = controller.transport_mut().next_event() {
            controller.handle_event(event);
        }
    }

    fn persisted(events: &[PlayerEvent]) -> Vec<PlaybackSnapshot> {
        events
            .iter()
            .filter_map(|e| match e {
                PlayerEvent::PersistRequested(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn new_controller_is_stopped() {
        let controller = PlaybackController::new(SimulatedTransport::new(), PlayerConfig::default());
        assert_eq!(controller.status(), PlaybackStatus::Stopped);
        assert!(!controller.is_playing());
        assert!(controller.playlist().is_empty());
        assert_eq!(controller.transport().volume(), 1.0);
    }

    #[test]
    fn select_track_persists_before_load() {
        let mut controller = controller_with(&[("a", 180.0), ("b", 200.0)]);
        controller.select_track(1).unwrap();

        let events = controller.drain_events();
        assert!(matches!(events.first(), Some(PlayerEvent::PersistRequested(s)) if s.index == 1));
        assert_eq!(controller.transport().loads(), &["music/b.mp3".to_string()]);
        assert_eq!(controller.status(), PlaybackStatus::Paused);
    }

    #[test]
    fn select_invalid_index_changes_nothing() {
        let mut controller = controller_with(&[("a", 180.0)]);
        let result = controller.select_track(5);

        assert!(matches!(
            result,
            Err(PlaybackError::InvalidIndex { index: 5, len: 1 })
        ));
        assert!(persisted(&controller.drain_events()).is_empty());
        assert!(controller.transport().loads().is_empty());
    }

    #[test]
    fn metadata_enables_seek_range() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.select_track(0).unwrap();
        controller.drain_events();
        pump(&mut controller);

        let events = controller.drain_events();
        assert!(events.contains(&PlayerEvent::SeekRangeChanged(SeekRange {
            min: 0.0,
            max: 180.0,
            value: 0.0,
            enabled: true,
        })));
        assert_eq!(controller.duration(), Some(180.0));
    }

    #[test]
    fn play_without_source_loads_first_track_then_plays() {
        let mut controller = controller_with(&[("a", 180.0), ("b", 200.0)]);
        controller.play().unwrap();

        assert_eq!(controller.transport().loads(), &["music/a.mp3".to_string()]);
        assert_eq!(controller.transport().play_requests(), 0);

        pump(&mut controller);
        assert_eq!(controller.transport().play_requests(), 1);
        assert!(controller.is_playing());
        assert_eq!(controller.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn play_is_noop_while_playing() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.select_track(0).unwrap();
        controller.play().unwrap();
        controller.play().unwrap();

        assert_eq!(controller.transport().play_requests(), 1);
    }

    #[test]
    fn pause_stops_and_persists() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.select_track(0).unwrap();
        controller.play().unwrap();
        pump(&mut controller);
        controller.drain_events();

        controller.pause();
        assert!(!controller.is_playing());
        assert!(controller.transport().is_paused());
        assert_eq!(controller.status(), PlaybackStatus::Paused);
        assert_eq!(persisted(&controller.drain_events()).len(), 1);
    }

    #[test]
    fn rejected_play_enters_error() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.select_track(0).unwrap();
        pump(&mut controller);
        controller.drain_events();

        controller
            .transport_mut()
            .reject_next_play(PlayRejection::AutoplayBlocked);
        controller.play().unwrap();
        pump(&mut controller);

        assert_eq!(controller.status(), PlaybackStatus::Error);
        assert!(!controller.is_playing());
        assert!(controller.transport().is_paused());
        assert!(matches!(
            controller.last_error(),
            Some(PlaybackError::PlaybackRejected(PlayRejection::AutoplayBlocked))
        ));

        // Recoverable by the user
        controller.play().unwrap();
        pump(&mut controller);
        assert_eq!(controller.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn load_failure_enters_error_with_message() {
        let mut controller = controller_with(&[("a", 180.0), ("b", 200.0)]);
        controller.transport_mut().fail_source("music/b.mp3");
        controller.select_track(1).unwrap();
        controller.drain_events();
        pump(&mut controller);

        assert_eq!(controller.status(), PlaybackStatus::Error);
        assert_eq!(controller.current_index(), 1);
        let events = controller.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            PlayerEvent::TrackError { index: Some(1), message } if message.contains('b')
        )));
        assert!(events.contains(&PlayerEvent::SeekRangeChanged(SeekRange::disabled())));
    }

    #[test]
    fn volume_maps_to_transport_and_unmutes() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.toggle_mute();
        assert!(controller.transport().is_muted());

        controller.set_volume(40);
        assert_eq!(controller.transport().volume(), 0.4);
        assert!(!controller.transport().is_muted());

        let events = controller.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            PlayerEvent::VolumeChanged { slider: 40, icon: crate::volume::VolumeIcon::Low, .. }
        )));
    }

    #[test]
    fn mute_keeps_volume() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.set_volume(70);
        controller.toggle_mute();

        let snapshot = controller.snapshot();
        assert!(snapshot.muted);
        assert_eq!(snapshot.volume, 0.7);
    }

    #[test]
    fn playback_rate_is_clamped() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.set_playback_rate(3.0).unwrap();
        assert_eq!(controller.playback_rate(), 2.0);
        assert_eq!(controller.transport().playback_rate(), 2.0);

        controller.set_playback_rate(0.1).unwrap();
        assert_eq!(controller.playback_rate(), 0.5);

        assert!(controller.set_playback_rate(f64::NAN).is_err());
        assert_eq!(controller.playback_rate(), 0.5);
    }

    #[test]
    fn seek_requires_known_duration() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.select_track(0).unwrap();

        assert!(matches!(
            controller.seek_apply(10.0),
            Err(PlaybackError::SeekRejected(SeekRejection::UnknownDuration))
        ));

        pump(&mut controller);
        controller.seek_apply(10.0).unwrap();
        assert_eq!(controller.transport().current_time(), 10.0);
    }

    #[test]
    fn seek_rejected_when_not_seekable() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.select_track(0).unwrap();
        pump(&mut controller);
        controller.transport_mut().set_seekable(false);

        assert!(matches!(
            controller.seek_apply(10.0),
            Err(PlaybackError::SeekRejected(SeekRejection::NotSeekable))
        ));
    }

    #[test]
    fn seeking_suspends_progress_updates() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.select_track(0).unwrap();
        controller.play().unwrap();
        pump(&mut controller);
        controller.drain_events();

        controller.seek_start();
        controller.transport_mut().advance(5.0);
        pump(&mut controller);
        assert!(!controller
            .drain_events()
            .iter()
            .any(|e| matches!(e, PlayerEvent::Progress(_))));

        controller.seek_preview(42.0);
        assert_eq!(
            controller.drain_events(),
            vec![PlayerEvent::Progress(ProgressUpdate::new(42.0, 180.0))]
        );
    }

    #[test]
    fn seek_end_resumes_paused_transport() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.select_track(0).unwrap();
        controller.play().unwrap();
        pump(&mut controller);

        // Some platforms pause the media while scrubbing
        controller.seek_start();
        controller.transport_mut().pause();
        controller.seek_end(30.0).unwrap();

        assert!(!controller.is_seeking());
        assert!(!controller.transport().is_paused());
        assert_eq!(controller.transport().current_time(), 30.0);
    }

    #[test]
    fn toggles_persist_every_time() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.toggle_shuffle();
        controller.toggle_repeat();
        controller.toggle_repeat();

        let snapshots = persisted(&controller.drain_events());
        assert_eq!(snapshots.len(), 3);
        assert!(snapshots[0].shuffle);
        assert_eq!(snapshots[1].repeat, RepeatMode::All);
        assert_eq!(snapshots[2].repeat, RepeatMode::One);
    }

    #[test]
    fn next_on_single_track_is_noop_unless_repeat_one() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.select_track(0).unwrap();
        let loads = controller.transport().loads().len();

        controller.play_next().unwrap();
        assert_eq!(controller.transport().loads().len(), loads);

        controller.toggle_repeat();
        controller.toggle_repeat();
        assert_eq!(controller.repeat(), RepeatMode::One);
        controller.play_next().unwrap();
        assert_eq!(controller.transport().loads().len(), loads + 1);
    }

    #[test]
    fn prev_wraps_to_last() {
        let mut controller = controller_with(&[("a", 1.0), ("b", 1.0), ("c", 1.0)]);
        controller.select_track(0).unwrap();
        controller.play_prev().unwrap();
        assert_eq!(controller.current_index(), 2);
    }

    #[test]
    fn empty_playlist_actions_show_placeholder() {
        let mut controller =
            PlaybackController::new(SimulatedTransport::new(), PlayerConfig::default());

        assert!(matches!(controller.play(), Err(PlaybackError::EmptyPlaylist)));
        assert!(controller.drain_events().contains(&PlayerEvent::EmptyPlaylist));
        assert!(matches!(
            controller.play_next(),
            Err(PlaybackError::EmptyPlaylist)
        ));
    }

    #[test]
    fn track_without_source_stops() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.replace_playlist(Playlist::from_tracks(vec![
            Track::new("a", "x", "music/a.mp3"),
            Track::new("gone", "x", ""),
        ]));
        controller.drain_events();

        assert!(matches!(
            controller.select_track(1),
            Err(PlaybackError::MissingSource(1))
        ));
        assert_eq!(controller.status(), PlaybackStatus::Stopped);
        assert_eq!(controller.current_index(), 0);
        assert!(persisted(&controller.drain_events()).is_empty());
    }

    #[test]
    fn restore_track_applies_time_after_metadata() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.restore_track(0, 42.5).unwrap();

        // Reported while metadata is outstanding
        assert_eq!(controller.snapshot().time, 42.5);
        pump(&mut controller);
        assert_eq!(controller.transport().current_time(), 42.5);
        assert!(!controller.is_playing());
    }

    #[test]
    fn restore_time_past_duration_resets_to_zero() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.restore_track(0, 180.0).unwrap();
        pump(&mut controller);
        assert_eq!(controller.transport().current_time(), 0.0);
    }

    #[test]
    fn apply_settings_does_not_persist() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.apply_settings(&PlaybackSnapshot {
            volume: 0.3,
            muted: true,
            shuffle: true,
            repeat: RepeatMode::All,
            playback_rate: 1.25,
            ..PlaybackSnapshot::default()
        });

        assert!(persisted(&controller.drain_events()).is_empty());
        assert_eq!(controller.transport().volume(), 0.3);
        assert!(controller.transport().is_muted());
        assert_eq!(controller.transport().playback_rate(), 1.25);
        assert!(controller.shuffle());
        assert_eq!(controller.repeat(), RepeatMode::All);
    }

    #[test]
    fn pause_before_play_started_stays_paused() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.select_track(0).unwrap();
        pump(&mut controller);

        controller.play().unwrap();
        controller.pause();
        pump(&mut controller);

        assert!(!controller.is_playing());
        assert!(controller.transport().is_paused());
        assert_eq!(controller.status(), PlaybackStatus::Paused);
    }

    #[test]
    fn rejection_after_pause_is_not_an_error() {
        let mut controller = controller_with(&[("a", 180.0)]);
        let token = controller.select_track(0).unwrap();
        pump(&mut controller);

        controller.play().unwrap();
        controller.pause();
        controller.drain_events();
        controller.handle_event(TransportEvent::PlayRejected {
            token,
            rejection: PlayRejection::classify("AbortError", "play() interrupted by pause()"),
        });

        assert_eq!(controller.status(), PlaybackStatus::Paused);
        assert!(controller.last_error().is_none());
        assert!(!controller
            .drain_events()
            .iter()
            .any(|e| matches!(e, PlayerEvent::TrackError { .. })));
    }

    #[test]
    fn aborted_play_is_not_an_error() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.select_track(0).unwrap();
        pump(&mut controller);

        controller
            .transport_mut()
            .reject_next_play(PlayRejection::Aborted);
        controller.play().unwrap();
        pump(&mut controller);

        assert_ne!(controller.status(), PlaybackStatus::Error);
        assert!(controller.last_error().is_none());
        assert!(!controller.is_playing());
    }

    #[test]
    fn toggle_while_play_in_flight_pauses() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.select_track(0).unwrap();
        pump(&mut controller);

        controller.toggle_play().unwrap();
        controller.toggle_play().unwrap();
        pump(&mut controller);

        assert_eq!(controller.transport().play_requests(), 1);
        assert!(controller.transport().is_paused());
        assert!(!controller.is_playing());
    }

    #[test]
    fn toggle_cancels_deferred_play() {
        let mut controller = controller_with(&[("a", 180.0)]);
        controller.play().unwrap();
        controller.toggle_play().unwrap();
        pump(&mut controller);

        assert_eq!(controller.transport().play_requests(), 0);
        assert!(controller.transport().is_paused());
        assert!(!controller.is_playing());
    }
}
