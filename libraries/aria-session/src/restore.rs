//! Restore sequencer
//!
//! Brings a fresh controller to the persisted configuration without
//! starting playback.

use aria_playback::{MediaTransport, PlaybackController, Playlist};
use aria_storage::{playback_state, PersistenceStore};
use serde::Serialize;
use tracing::{info, warn};

/// Which restore path ran
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RestoreOutcome {
    /// No stored playlist; the placeholder is shown
    Empty,

    /// Playlist restored without playback state; first track selected
    PlaylistOnly { tracks: usize },

    /// Playlist and playback state restored
    Resumed { tracks: usize, index: usize, time: f64 },
}

/// Run the restore sequence
///
/// 1. Load the playlist (a corrupt record is dropped by the store).
/// 2. With real tracks, load and validate the playback state.
/// 3. Apply settings, select the saved track and defer the saved time
///    until that load's metadata arrives.
/// 4. Reapply the controls from the resolved controller state.
pub fn restore<T: MediaTransport>(
    controller: &mut PlaybackController<T>,
    store: &mut PersistenceStore,
) -> RestoreOutcome {
    let playlist = store
        .load_playlist()
        .map_or_else(Playlist::new, Playlist::from_tracks);
    controller.replace_playlist(playlist);

    let tracks = controller.playlist().len();
    if tracks == 0 {
        controller.refresh_controls();
        info!("no stored playlist, showing empty state");
        return RestoreOutcome::Empty;
    }

    let outcome = match store.load_playback_state() {
        Some(state) => {
            let state = playback_state::reconcile(state, tracks);
            controller.apply_settings(&state);
            controller.refresh_controls();

            if let Err(e) = controller.restore_track(state.index, state.time) {
                warn!(index = state.index, error = %e, "could not restore saved track");
            }
            RestoreOutcome::Resumed {
                tracks,
                index: state.index,
                time: state.time,
            }
        }
        None => {
            controller.refresh_controls();
            if let Err(e) = controller.select_track(0) {
                warn!(error = %e, "could not select first track");
            }
            RestoreOutcome::PlaylistOnly { tracks }
        }
    };

    info!(?outcome, "restored player");
    outcome
}
