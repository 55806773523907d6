//! Headless player
//!
//! A [`PlayerSession`] over the simulated transport and a file store,
//! driven one [`Command`] at a time.

use crate::command::{Command, HELP};
use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::renderer::status_line;
use aria_playback::{MediaTransport, PlaybackStatus, SimulatedTransport};
use aria_session::{intake, CandidateFile, PlayerSession, Renderer, RestoreOutcome, SessionError};
use aria_storage::{FileStore, PersistenceStore};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Whether the loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    session: PlayerSession<SimulatedTransport>,
}

impl App {
    /// Open the store under `config.data_dir` and restore the last session
    pub fn open(config: &CliConfig, renderer: Box<dyn Renderer>) -> Result<Self> {
        let backend = FileStore::open(&config.data_dir)?;
        let store = PersistenceStore::new(Box::new(backend), config.storage.clone());
        let transport = SimulatedTransport::new().with_default_duration(config.track_duration);

        let mut app = Self {
            session: PlayerSession::start(transport, store, renderer, config.player.clone()),
        };
        app.pump();
        info!(data_dir = %config.data_dir.display(), "player ready");
        Ok(app)
    }

    pub fn session(&self) -> &PlayerSession<SimulatedTransport> {
        &self.session
    }

    pub fn restore_outcome(&self) -> RestoreOutcome {
        self.session.restore_outcome()
    }

    /// Run one command, writing command output to `out`
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<Flow> {
        debug!(?command, "executing");
        let result = self.apply(command, out);
        // Load and play outcomes arrive as transport events
        self.pump();
        result
    }

    fn apply(&mut self, command: Command, out: &mut impl Write) -> Result<Flow> {
        match command {
            Command::Play => self.session.play()?,
            Command::Pause => self.session.pause(),
            Command::Toggle => self.session.toggle_play()?,
            Command::Next => self.session.next()?,
            Command::Prev => self.session.previous()?,
            Command::Seek(time) => self.session.seek_to(time)?,
            Command::Volume(level) => self.session.set_volume(level),
            Command::Mute => self.session.toggle_mute(),
            Command::Shuffle => {
                self.session.toggle_shuffle();
                writeln!(out, "shuffle: {}", on_off(self.session.controller().shuffle()))?;
            }
            Command::Repeat => {
                self.session.toggle_repeat();
                writeln!(out, "repeat: {}", self.session.controller().repeat())?;
            }
            Command::Rate(rate) => self.session.set_playback_rate(rate)?,
            Command::Add(paths) => {
                let added = self.add_paths(&paths)?;
                writeln!(out, "added {added} track(s)")?;
            }
            Command::Select(index) => self.session.select_track(index)?,
            Command::Tick(seconds) => self.tick(seconds),
            Command::Status => self.write_status(out)?,
            Command::List => self.write_playlist(out)?,
            Command::Save => self.session.save_playlist()?,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Add files from disk
    ///
    /// Paths survive a restart, so unlike browser object URLs they are
    /// kept as durable sources.
    fn add_paths(&mut self, paths: &[impl AsRef<Path>]) -> Result<usize> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            if !path.is_file() {
                return Err(CliError::FileNotFound(path.display().to_string()));
            }
            let path = path.canonicalize()?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            files.push(CandidateFile::new(
                name,
                mime.essence_str(),
                path.to_string_lossy(),
            ));
        }

        let tracks: Vec<_> = intake::tracks_from_files(&files, self.session.player_config())
            .into_iter()
            .map(|mut track| {
                track.ephemeral = false;
                track
            })
            .collect();

        if tracks.is_empty() {
            warn!(offered = files.len(), "no audio files among arguments");
            return Err(SessionError::NoAudioFiles(files.len()).into());
        }
        Ok(self.session.add_tracks(tracks)?)
    }

    /// Advance the virtual clock in one-second steps
    ///
    /// Stepping lets track ends and the loads they trigger play out in
    /// order within one long tick.
    fn tick(&mut self, seconds: f64) {
        let mut remaining = seconds;
        while remaining > 0.0 {
            let step = remaining.min(1.0);
            self.session.transport_mut().advance(step);
            self.pump();
            remaining -= step;
        }
    }

    /// Deliver queued transport events to the session
    pub fn pump(&mut self) {
        while let Some(event) = self.session.transport_mut().next_event() {
            self.session.handle_transport_event(event);
        }
    }

    /// Persist and exit
    pub fn shutdown(self) {
        let transport = self.session.shutdown();
        debug!(loads = transport.loads().len(), "transport released");
    }

    fn write_status(&self, out: &mut impl Write) -> Result<()> {
        let controller = self.session.controller();
        let transport = self.session.transport();
        let title = controller
            .current_track()
            .map_or("No Tracks Loaded", |track| track.display_title());

        writeln!(
            out,
            "{}",
            status_line(
                title,
                status_label(controller.status()),
                transport.current_time(),
                controller.duration(),
            )
        )?;
        writeln!(
            out,
            "track {}/{}  volume {}%{}  shuffle {}  repeat {}  rate {}x",
            (controller.current_index() + 1).min(controller.playlist().len()),
            controller.playlist().len(),
            controller.volume().level(),
            if controller.volume().is_muted() { " (muted)" } else { "" },
            on_off(controller.shuffle()),
            controller.repeat(),
            controller.playback_rate(),
        )?;
        Ok(())
    }

    fn write_playlist(&self, out: &mut impl Write) -> Result<()> {
        let controller = self.session.controller();
        let tracks = controller.playlist().tracks();
        if tracks.is_empty() {
            writeln!(out, "playlist is empty, add files with `add <file>`")?;
            return Ok(());
        }
        for (index, track) in tracks.iter().enumerate() {
            let marker = if index == controller.current_index() { '>' } else { ' ' };
            writeln!(
                out,
                "{marker} {index:>3}  {} - {}",
                track.display_artist(),
                track.display_title()
            )?;
        }
        Ok(())
    }
}

/// Read commands until `quit` or end of input, then persist
///
/// Command errors are reported and the loop continues.
pub fn run(mut app: App, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "error: {e}")?;
                continue;
            }
        };

        match app.execute(command, out) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => writeln!(out, "error: {e}")?,
        }
        out.flush()?;
    }

    app.shutdown();
    Ok(())
}

fn status_label(status: PlaybackStatus) -> &'static str {
    match status {
        PlaybackStatus::Stopped => "stopped",
        PlaybackStatus::Paused => "paused",
        PlaybackStatus::Playing => "playing",
        PlaybackStatus::Error => "error",
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
