//! Direct access to the stored records, without starting a session

use crate::config::CliConfig;
use crate::error::Result;
use aria_playback::format_time;
use aria_storage::{playback_state, playlists, FileStore, KeyValueStore};
use std::io::Write;

/// Print both records
pub fn show(config: &CliConfig, out: &mut impl Write) -> Result<()> {
    let store = FileStore::open(&config.data_dir)?;

    match playlists::get(&store, &config.storage.playlist_key) {
        Ok(Some(tracks)) => {
            writeln!(out, "playlist ({} tracks):", tracks.len())?;
            for (index, track) in tracks.iter().enumerate() {
                let src = if track.has_source() { track.src.as_str() } else { "(needs re-adding)" };
                writeln!(
                    out,
                    "  {index:>3}  {} - {}  {src}",
                    track.display_artist(),
                    track.display_title()
                )?;
            }
        }
        Ok(None) => writeln!(out, "playlist: none saved")?,
        Err(e) => writeln!(out, "playlist: unreadable ({e})")?,
    }

    match playback_state::get(&store, &config.storage.playback_key) {
        Ok(Some(state)) => writeln!(
            out,
            "state: track {} at {}, volume {:.0}%{}, shuffle {}, repeat {}, rate {}x",
            state.index,
            format_time(state.time),
            state.volume * 100.0,
            if state.muted { " (muted)" } else { "" },
            state.shuffle,
            state.repeat,
            state.playback_rate,
        )?,
        Ok(None) => writeln!(out, "state: none saved")?,
        Err(e) => writeln!(out, "state: unreadable ({e})")?,
    }

    Ok(())
}

/// Delete both records
pub fn clear(config: &CliConfig) -> Result<()> {
    let mut store = FileStore::open(&config.data_dir)?;
    store.delete(&config.storage.playlist_key)?;
    store.delete(&config.storage.playback_key)?;
    tracing::info!(data_dir = %config.data_dir.display(), "stored records cleared");
    Ok(())
}
