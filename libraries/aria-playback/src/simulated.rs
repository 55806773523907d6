//! Headless media transport
//!
//! Behaves like a media element driven by a virtual clock: loads resolve
//! from a catalog of known durations, play requests succeed unless the
//! source failed to load or a rejection was scripted, and `advance` moves
//! time forward, firing `TimeUpdate` and `Ended`. Events queue up until
//! taken with [`SimulatedTransport::next_event`]. Used by the CLI and by
//! tests.

use crate::transport::{LoadToken, MediaTransport, SeekableRange, TransportEvent};
use crate::types::PlayRejection;
use std::collections::{HashMap, HashSet, VecDeque};

/// Media transport with a virtual clock
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    // Known sources and their durations
    catalog: HashMap<String, f64>,
    default_duration: Option<f64>,
    failing: HashSet<String>,

    // Media element state
    src: Option<String>,
    token: Option<LoadToken>,
    paused: bool,
    current_time: f64,
    duration: Option<f64>,
    volume: f64,
    muted: bool,
    playback_rate: f64,
    seekable: bool,

    // Scripted outcomes
    reject_play: Option<PlayRejection>,

    events: VecDeque<TransportEvent>,
    loads: Vec<String>,
    play_requests: usize,
}

impl SimulatedTransport {
    /// Create a transport with an empty catalog
    ///
    /// Unknown sources fail to load unless a default duration is set.
    pub fn new() -> Self {
        Self {
            catalog: HashMap::new(),
            default_duration: None,
            failing: HashSet::new(),
            src: None,
            token: None,
            paused: true,
            current_time: 0.0,
            duration: None,
            volume: 1.0,
            muted: false,
            playback_rate: 1.0,
            seekable: true,
            reject_play: None,
            events: VecDeque::new(),
            loads: Vec::new(),
            play_requests: 0,
        }
    }

    /// Register a source with its duration
    #[must_use]
    pub fn with_track(mut self, src: impl Into<String>, duration: f64) -> Self {
        self.catalog.insert(src.into(), duration);
        self
    }

    /// Duration for sources not in the catalog
    #[must_use]
    pub fn with_default_duration(mut self, duration: f64) -> Self {
        self.default_duration = Some(duration);
        self
    }

    /// Register a source at runtime
    pub fn add_track(&mut self, src: impl Into<String>, duration: f64) {
        self.catalog.insert(src.into(), duration);
    }

    /// Make loads of `src` fail
    pub fn fail_source(&mut self, src: impl Into<String>) {
        self.failing.insert(src.into());
    }

    /// Reject the next play request
    pub fn reject_next_play(&mut self, rejection: PlayRejection) {
        self.reject_play = Some(rejection);
    }

    /// Toggle whether loaded media reports a seekable range
    pub fn set_seekable(&mut self, seekable: bool) {
        self.seekable = seekable;
    }

    /// Take the oldest pending event
    ///
    /// Firing `MetadataLoaded` is what makes the duration visible, as with
    /// a real media element.
    pub fn next_event(&mut self) -> Option<TransportEvent> {
        let event = self.events.pop_front()?;
        if let TransportEvent::MetadataLoaded { token, duration } = &event {
            if self.token == Some(*token) {
                self.duration = Some(*duration);
            }
        }
        Some(event)
    }

    /// Number of pending events
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Move the clock forward while playing
    ///
    /// Queues a `TimeUpdate`, and `Ended` when the position reaches the
    /// duration (the media pauses itself at the end).
    pub fn advance(&mut self, seconds: f64) {
        let Some(token) = self.token else {
            return;
        };
        if self.paused || self.src.is_none() {
            return;
        }

        self.current_time += seconds * self.playback_rate;

        match self.duration {
            Some(duration) if self.current_time >= duration => {
                self.current_time = duration;
                self.paused = true;
                self.events.push_back(TransportEvent::TimeUpdate {
                    token,
                    current_time: self.current_time,
                });
                self.events.push_back(TransportEvent::Ended { token });
            }
            _ => {
                self.events.push_back(TransportEvent::TimeUpdate {
                    token,
                    current_time: self.current_time,
                });
            }
        }
    }

    /// Every source passed to `load`, in order
    pub fn loads(&self) -> &[String] {
        &self.loads
    }

    /// Currently set source
    pub fn source(&self) -> Option<&str> {
        self.src.as_deref()
    }

    /// Number of play requests received
    pub fn play_requests(&self) -> usize {
        self.play_requests
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaTransport for SimulatedTransport {
    fn load(&mut self, src: &str, token: LoadToken) {
        self.src = Some(src.to_string());
        self.token = Some(token);
        self.paused = true;
        self.current_time = 0.0;
        self.duration = None;
        self.loads.push(src.to_string());

        let duration = self.catalog.get(src).copied().or(self.default_duration);
        match duration {
            Some(duration) if !self.failing.contains(src) => {
                self.events
                    .push_back(TransportEvent::MetadataLoaded { token, duration });
                self.events.push_back(TransportEvent::CanPlay { token });
            }
            _ => {
                self.events.push_back(TransportEvent::LoadFailed {
                    token,
                    reason: format!("cannot decode {src}"),
                });
            }
        }
    }

    fn play(&mut self, token: LoadToken) {
        self.play_requests += 1;

        let unplayable = self.src.as_ref().map_or(true, |src| self.failing.contains(src));
        if unplayable {
            self.paused = true;
            self.events.push_back(TransportEvent::PlayRejected {
                token,
                rejection: PlayRejection::FormatUnsupported,
            });
            return;
        }

        if let Some(rejection) = self.reject_play.take() {
            self.paused = true;
            self.events
                .push_back(TransportEvent::PlayRejected { token, rejection });
            return;
        }

        // Restarting from the end rewinds, as a media element does
        if let Some(duration) = self.duration {
            if self.current_time >= duration {
                self.current_time = 0.0;
            }
        }

        self.paused = false;
        self.events.push_back(TransportEvent::PlayStarted { token });
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn has_source(&self) -> bool {
        self.src.is_some()
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        let upper = self.duration.unwrap_or(0.0);
        self.current_time = seconds.clamp(0.0, upper.max(0.0));
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.playback_rate = rate;
    }

    fn seekable(&self) -> Option<SeekableRange> {
        match self.duration {
            Some(duration) if self.seekable => Some(SeekableRange::new(0.0, duration)),
            _ => None,
        }
    }
}
