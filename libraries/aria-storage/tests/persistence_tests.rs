
use aria_playback::{PlaybackSnapshot, RepeatMode, Track};
use aria_storage::{playback_state, KeyValueStore};
use proptest::prelude::*;
use test_helpers::{sample_tracks, TestStore};

#[test]
fn test_playlist_survives_reopen() {
    let mut test = TestStore::new();
    assert!(test.store.save_playlist(&sample_tracks()));

    let mut reopened = test.reopen();
    let tracks = reopened.load_playlist().unwrap();

    assert_eq!(tracks, sample_tracks());
    assert_eq!(tracks[0].album, "Dawn");
}

#[test]
fn test_local_files_need_reattachment() {
    let mut test = TestStore::new();
    let mut tracks = sample_tracks();
    tracks.push(Track::new("Demo", "Me", "blob:http://localhost/42").ephemeral());
    test.store.save_playlist(&tracks);

    let loaded = test.reopen().load_playlist().unwrap();
    assert_eq!(loaded.len(), 4);
    assert_eq!(loaded[3].title, "Demo");
    assert!(!loaded[3].has_source());
}

#[test]
fn test_playback_state_survives_reopen() {
    let mut test = TestStore::new();
    let state = PlaybackSnapshot {
        index: 1,
        time: 75.25,
        volume: 0.6,
        muted: true,
        shuffle: true,
        repeat: RepeatMode::All,
        playback_rate: 1.25,
    };
    assert!(test.store.save_playback_state(&state));

    assert_eq!(test.reopen().load_playback_state(), Some(state));
}

#[test]
fn test_missing_records() {
    let mut test = TestStore::new();
    assert!(test.store.load_playlist().is_none());
    assert!(test.store.load_playback_state().is_none());
}

#[test]
fn test_corrupt_playlist_file_is_removed() {
    let mut test = TestStore::new();
    test.write_raw("playlist-metadata", "{\"version\":1,\"tracks\":");

    assert!(test.store.load_playlist().is_none());
    assert!(!test.temp_dir.path().join("playlist-metadata.json").exists());
}

#[test]
fn test_corrupt_state_file_is_removed() {
    let mut test = TestStore::new();
    test.write_raw("playback-state", "{broken");

    assert!(test.store.load_playback_state().is_none());
    assert!(!test.temp_dir.path().join("playback-state.json").exists());
    assert!(test.reopen().load_playback_state().is_none());
}

#[test]
fn test_legacy_playlist_file() {
    let mut test = TestStore::new();
    test.write_raw(
        "playlist-metadata",
        r#"[{"title":"Legacy","artist":"A","album":"B","src":"music/l.mp3","cover":"l.png","lyrics":"la la"}]"#,
    );

    let tracks = test.store.load_playlist().unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].lyrics, "la la");
}

#[test]
fn test_complete_replace_writes() {
    let mut test = TestStore::new();
    test.store.save_playlist(&sample_tracks());
    test.store.save_playlist(&sample_tracks()[..1]);

    assert_eq!(test.store.load_playlist().map(|t| t.len()), Some(1));
    assert!(test
        .store
        .backend()
        .read("playlist-metadata")
        .unwrap()
        .is_some_and(|raw| raw.contains("\"version\":1")));
}

fn valid_snapshot() -> impl Strategy<Value = PlaybackSnapshot> {
    (
        0usize..500,
        0u32..40_000,
        0u8..=100,
        any::<bool>(),
        any::<bool>(),
        prop_oneof![Just(RepeatMode::Off), Just(RepeatMode::All), Just(RepeatMode::One)],
        2u8..=8,
    )
        .prop_map(
            |(index, quarter_secs, percent, muted, shuffle, repeat, quarter_rate)| {
                // Values a slider or the clock actually produce
                PlaybackSnapshot {
                    index,
                    time: f64::from(quarter_secs) * 0.25,
                    volume: f64::from(percent) / 100.0,
                    muted,
                    shuffle,
                    repeat,
                    playback_rate: f64::from(quarter_rate) * 0.25,
                }
            },
        )
}

proptest! {
    /// Property: valid playback states round-trip exactly
    #[test]
    fn playback_state_round_trips(state in valid_snapshot()) {
        let json = playback_state::encode(&state).unwrap();
        prop_assert_eq!(playback_state::decode("k", &json).unwrap(), state);
    }

    /// Property: a bad field falls back to its default and leaves the others intact
    #[test]
    fn invalid_fields_fall_back_individually(
        state in valid_snapshot(),
        bad_index in -1000i64..0,
        bad_volume in 1.01f64..100.0,
        bad_rate in 2.01f64..16.0,
    ) {
        let mut value: serde_json::Value =
            serde_json::from_str(&playback_state::encode(&state).unwrap()).unwrap();
        value["index"] = bad_index.into();
        value["volume"] = bad_volume.into();
        value["playbackRate"] = bad_rate.into();
        value["repeat"] = "bogus".into();

        let decoded = playback_state::decode("k", &value.to_string()).unwrap();
        prop_assert_eq!(decoded.index, 0);
        prop_assert_eq!(decoded.volume, 1.0);
        prop_assert_eq!(decoded.playback_rate, 1.0);
        prop_assert_eq!(decoded.repeat, RepeatMode::Off);
        prop_assert_eq!(decoded.time, state.time);
        prop_assert_eq!(decoded.muted, state.muted);
        prop_assert_eq!(decoded.shuffle, state.shuffle);
    }
}
