//! Integration tests for the playback controller
//!
//! Drives the controller through SimulatedTransport the way a page would:
//! user actions in, transport events pumped back, events drained out.

use aria_playback::{
    MediaTransport, PlaybackController, PlaybackError, PlaybackSnapshot, PlaybackStatus,
    PlayerConfig, PlayerEvent, RepeatMode, SimulatedTransport, Track, TransportEvent,
};

// ===== Test Helpers =====

fn controller(tracks: &[(&str, f64)]) -> PlaybackController<SimulatedTransport> {
    let mut transport = SimulatedTransport::new();
    let mut playlist = Vec::new();
    for (name, duration) in tracks {
        let src = format!("music/{name}.mp3");
        transport.add_track(src.clone(), *duration);
        playlist.push(Track::new(name.to_uppercase(), "Test Artist", src));
    }

    let config = PlayerConfig {
        shuffle_seed: Some(7),
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

/// Play through the current track until it ends
fn play_to_end(controller: &mut PlaybackController<SimulatedTransport>) {
    pump(controller);
    let duration = controller.transport().duration().unwrap_or(0.0);
    controller.transport_mut().advance(duration + 1.0);
    pump(controller);
}

fn last_persisted(events: &[PlayerEvent]) -> Option<PlaybackSnapshot> {
    events.iter().rev().find_map(|e| match e {
        PlayerEvent::PersistRequested(s) => Some(s.clone()),
        _ => None,
    })
}

// ===== End of Track =====

#[test]
fn sequential_playthrough_stops_after_last_track() {
    let mut c = controller(&[("a", 180.0), ("b", 200.0)]);
    c.select_track(0).unwrap();
    c.play().unwrap();

    play_to_end(&mut c);
    assert_eq!(c.current_index(), 1);
    assert!(c.is_playing());
    assert_eq!(c.status(), PlaybackStatus::Playing);
    assert_eq!(c.transport().source(), Some("music/b.mp3"));

    play_to_end(&mut c);
    assert_eq!(c.current_index(), 1);
    assert!(!c.is_playing());
    assert!(c.transport().is_paused());
    assert_eq!(c.status(), PlaybackStatus::Paused);
    assert_eq!(c.transport().current_time(), 0.0);

    let snapshot = last_persisted(&c.drain_events()).unwrap();
    assert_eq!(snapshot.index, 1);
    assert_eq!(snapshot.time, 0.0);
}

#[test]
fn repeat_all_wraps_to_first_track() {
    let mut c = controller(&[("a", 10.0), ("b", 10.0)]);
    c.toggle_repeat();
    assert_eq!(c.repeat(), RepeatMode::All);

    c.select_track(1).unwrap();
    c.play().unwrap();
    play_to_end(&mut c);

    assert_eq!(c.current_index(), 0);
    assert!(c.is_playing());
}

#[test]
fn repeat_one_replays_same_track() {
    let mut c = controller(&[("a", 10.0), ("b", 10.0), ("c", 10.0)]);
    c.toggle_repeat();
    c.toggle_repeat();
    c.toggle_shuffle();

    c.select_track(1).unwrap();
    c.play().unwrap();
    let loads = c.transport().loads().len();
    play_to_end(&mut c);

    assert_eq!(c.current_index(), 1);
    assert_eq!(c.transport().loads().len(), loads);
    assert!(c.is_playing());
    assert_eq!(c.transport().current_time(), 0.0);
}

#[test]
fn repeat_all_single_track_restarts() {
    let mut c = controller(&[("solo", 10.0)]);
    c.toggle_repeat();

    c.select_track(0).unwrap();
    c.play().unwrap();
    play_to_end(&mut c);

    assert_eq!(c.current_index(), 0);
    assert!(c.is_playing());
    assert!(!c.transport().is_paused());
}

#[test]
fn shuffle_end_never_repeats_current() {
    let mut c = controller(&[("a", 5.0), ("b", 5.0), ("c", 5.0), ("d", 5.0)]);
    c.toggle_shuffle();
    c.select_track(2).unwrap();
    c.play().unwrap();

    for _ in 0..20 {
        let before = c.current_index();
        play_to_end(&mut c);
        assert_ne!(c.current_index(), before);
        assert!(c.is_playing());
    }
}

// ===== Stale Loads =====

#[test]
fn superseded_selection_drops_its_callbacks() {
    let mut c = controller(&[("a", 180.0), ("b", 200.0)]);
    c.restore_track(0, 90.0).unwrap();
    c.select_track(1).unwrap();

    let events = c.drain_events();
    assert_eq!(last_persisted(&events).map(|s| s.index), Some(1));

    pump(&mut c);
    assert_eq!(c.current_index(), 1);
    assert_eq!(c.duration(), Some(200.0));
    assert_eq!(c.transport().current_time(), 0.0);
}

#[test]
fn late_event_from_old_load_is_ignored() {
    let mut c = controller(&[("a", 180.0), ("b", 200.0)]);
    let first = c.select_track(0).unwrap();
    pump(&mut c);
    c.select_track(1).unwrap();
    pump(&mut c);
    c.drain_events();

    c.handle_event(TransportEvent::Ended { token: first });
    c.handle_event(TransportEvent::LoadFailed {
        token: first,
        reason: "late".to_string(),
    });

    assert!(c.drain_events().is_empty());
    assert_eq!(c.current_index(), 1);
    assert_eq!(c.status(), PlaybackStatus::Paused);
}

#[test]
fn quick_play_pause_keeps_state_in_sync_with_media() {
    let mut c = controller(&[("a", 180.0), ("b", 200.0)]);
    c.select_track(0).unwrap();
    pump(&mut c);

    c.play().unwrap();
    c.pause();
    pump(&mut c);

    assert_eq!(c.is_playing(), !c.transport().is_paused());
    assert!(!c.is_playing());

    // Next click plays again
    c.toggle_play().unwrap();
    pump(&mut c);
    assert!(c.is_playing());
    assert_eq!(c.is_playing(), !c.transport().is_paused());
    assert_eq!(c.status(), PlaybackStatus::Playing);
}

// ===== Seeking =====

#[test]
fn out_of_range_seek_changes_nothing() {
    let mut c = controller(&[("a", 180.0)]);
    c.select_track(0).unwrap();
    c.play().unwrap();
    pump(&mut c);
    c.transport_mut().advance(12.0);
    pump(&mut c);
    c.drain_events();

    c.seek_start();
    let result = c.seek_end(500.0);

    assert!(matches!(result, Err(PlaybackError::SeekRejected(_))));
    assert_eq!(c.transport().current_time(), 12.0);
    assert!(last_persisted(&c.drain_events()).is_none());
    assert!(!c.is_seeking());
}

#[test]
fn seek_end_persists_new_time() {
    let mut c = controller(&[("a", 180.0)]);
    c.select_track(0).unwrap();
    pump(&mut c);
    c.drain_events();

    c.seek_start();
    c.seek_end(95.0).unwrap();

    assert_eq!(last_persisted(&c.drain_events()).map(|s| s.time), Some(95.0));
}

// ===== Playlist =====

#[test]
fn adding_to_placeholder_replaces_it() {
    let mut c = PlaybackController::new(
        SimulatedTransport::new().with_default_duration(60.0),
        PlayerConfig::default(),
    );
    assert!(c.playlist().is_placeholder());

    let first = c.append_tracks(vec![Track::new("X", "Someone", "blob:x").ephemeral()]);

    assert_eq!(first, Some(0));
    assert_eq!(c.playlist().len(), 1);
    assert_eq!(c.playlist().get(0).map(|t| t.title.as_str()), Some("X"));
    assert_eq!(c.current_index(), 0);
    assert!(c
        .drain_events()
        .contains(&PlayerEvent::PlaylistChanged { highlight: Some(0) }));
}

#[test]
fn autoplay_block_is_recoverable() {
    let mut c = controller(&[("a", 180.0)]);
    c.transport_mut()
        .reject_next_play(aria_playback::PlayRejection::AutoplayBlocked);
    c.play().unwrap();
    pump(&mut c);

    assert_eq!(c.status(), PlaybackStatus::Error);
    let events = c.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        PlayerEvent::TrackError { message, .. } if message.contains("blocked")
    )));

    c.toggle_play().unwrap();
    pump(&mut c);
    assert_eq!(c.status(), PlaybackStatus::Playing);
    assert!(c.is_playing());
}
