//! End-to-end playback flows through the composed shell

use anyhow::Result;
use clipset_player::input::{FocusTarget, Key};
use clipset_player::media::{MediaErrorKind, MediaSurface};
use clipset_player::player::PlayerCallbacks;
use clipset_player::utils::prefs::JsonFileStore;
use clipset_player_integration_tests::{FixtureOptions, TestFixture};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn seek_clamping_scenario() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.make_ready(120.0);
    let handle = fixture.shell.handle();

    handle.seek_to(500.0);
    assert_eq!(handle.current_time(), 120.0);

    handle.seek_to(-50.0);
    assert_eq!(handle.current_time(), 0.0);

    fixture.shell.handle_key(Key::Digit(2), FocusTarget::Player);
    fixture
        .shell
        .handle_key(Key::ArrowRight, FocusTarget::Player);
    assert_eq!(handle.current_time(), 29.0);

    Ok(())
}

#[test]
fn seek_percent_quarter_of_duration() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.make_ready(120.0);

    fixture.shell.begin_scrub(0.25, std::time::Instant::now());
    fixture.shell.end_drag();
    assert_eq!(fixture.shell.handle().current_time(), 30.0);

    Ok(())
}

#[test]
fn relative_seeks_follow_external_time_changes() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.make_ready(300.0);

    fixture.shell.handle().seek_to(50.0);
    fixture.pump();

    // An OS media-session scrubber moves the element between key presses
    fixture.surface.script_set_time_externally(200.0);
    fixture.shell.handle_key(Key::L, FocusTarget::Body);

    assert_eq!(fixture.surface.current_time(), 210.0);

    Ok(())
}

#[test]
fn lifecycle_callbacks_fire_in_order() -> Result<()> {
    let ready = Arc::new(AtomicBool::new(false));
    let played = Arc::new(AtomicBool::new(false));
    let ended = Arc::new(AtomicBool::new(false));
    let updates = Arc::new(AtomicUsize::new(0));

    let callbacks = PlayerCallbacks {
        on_ready: Some(Box::new({
            let ready = Arc::clone(&ready);
            move || ready.store(true, Ordering::SeqCst)
        })),
        on_play: Some(Box::new({
            let played = Arc::clone(&played);
            move || played.store(true, Ordering::SeqCst)
        })),
        on_ended: Some(Box::new({
            let ended = Arc::clone(&ended);
            move || ended.store(true, Ordering::SeqCst)
        })),
        on_time_update: Some(Box::new({
            let updates = Arc::clone(&updates);
            move |_| {
                updates.fetch_add(1, Ordering::SeqCst);
            }
        })),
        ..Default::default()
    };

    let fixture = TestFixture::with_options(FixtureOptions {
        callbacks,
        ..Default::default()
    })?;
    fixture.make_ready(10.0);
    assert!(ready.load(Ordering::SeqCst));

    fixture.shell.handle().play();
    fixture.pump();
    assert!(played.load(Ordering::SeqCst));
    assert!(fixture.shell.state().is_playing);

    fixture.surface.script_advance(20.0);
    fixture.pump();
    assert!(ended.load(Ordering::SeqCst));
    assert!(updates.load(Ordering::SeqCst) > 0);
    assert!(!fixture.shell.state().is_playing);
    assert_eq!(fixture.shell.state().current_time, 10.0);

    Ok(())
}

#[test]
fn autoplay_rejection_shows_paused_not_error() -> Result<()> {
    let fixture = TestFixture::with_options(FixtureOptions {
        autoplay: true,
        ..Default::default()
    })?;
    fixture.surface.script_reject_play(true);
    fixture.make_ready(60.0);

    let state = fixture.shell.state();
    assert!(state.is_ready);
    assert!(!state.is_playing);
    assert!(!state.has_error);

    Ok(())
}

#[test]
fn native_media_error_reaches_the_page() -> Result<()> {
    let seen = Arc::new(AtomicBool::new(false));
    let callbacks = PlayerCallbacks {
        on_error: Some(Box::new({
            let seen = Arc::clone(&seen);
            move |error| {
                assert_eq!(error.kind, MediaErrorKind::Decode);
                seen.store(true, Ordering::SeqCst);
            }
        })),
        ..Default::default()
    };

    let fixture = TestFixture::with_options(FixtureOptions {
        callbacks,
        ..Default::default()
    })?;
    fixture.make_ready(60.0);

    fixture
        .surface
        .script_error(MediaErrorKind::Decode, "moov atom not found");
    fixture.pump();

    assert!(seen.load(Ordering::SeqCst));
    assert!(fixture.shell.state().has_error);

    Ok(())
}

#[test]
fn preferences_survive_unmount_and_remount() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("preferences.json");

    {
        let fixture = TestFixture::with_options(FixtureOptions {
            prefs: Arc::new(JsonFileStore::open(path.clone())),
            ..Default::default()
        })?;
        fixture.make_ready(100.0);

        // Mute, then set a volume through the slider (which un-mutes), and
        // bump the rate twice
        fixture.shell.handle_key(Key::M, FocusTarget::Body);
        fixture
            .shell
            .begin_volume_drag(0.4, std::time::Instant::now());
        fixture.shell.end_drag();
        fixture.shell.handle_key(Key::Period, FocusTarget::Body);
        fixture.shell.handle_key(Key::Period, FocusTarget::Body);

        assert_eq!(fixture.surface.volume(), 0.6);
        assert!(!fixture.surface.is_muted());
        assert_eq!(fixture.surface.playback_rate(), 1.5);

        fixture.shell.unmount();
    }

    // A fresh mount reads the persisted values as its startup defaults
    let fixture = TestFixture::with_options(FixtureOptions {
        prefs: Arc::new(JsonFileStore::open(path)),
        ..Default::default()
    })?;
    fixture.make_ready(100.0);

    assert_eq!(fixture.surface.volume(), 0.6);
    assert!(!fixture.surface.is_muted());
    assert_eq!(fixture.surface.playback_rate(), 1.5);

    Ok(())
}

#[test]
fn initial_time_applied_on_mount() -> Result<()> {
    let fixture = TestFixture::with_options(FixtureOptions {
        initial_time: 30.0,
        ..Default::default()
    })?;
    fixture.make_ready(100.0);

    assert_eq!(fixture.surface.current_time(), 30.0);

    Ok(())
}

#[test]
fn off_list_rate_becomes_normal_speed() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.make_ready(100.0);

    fixture.shell.handle().play();
    fixture.pump();

    // The only rate mutations available go through the engine, which
    // coerces; poke the surface as a misbehaving host would and confirm
    // the snapshot coerces the reported value too
    fixture.surface.set_playback_rate(3.0);
    fixture.pump();
    assert_eq!(fixture.shell.state().playback_rate, 1.0);

    Ok(())
}

#[test]
fn full_lifecycle_mount_play_end_unmount() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.make_ready(30.0);
    assert!(fixture.shell.state().is_ready);

    let handle = fixture.shell.handle();
    handle.play();
    fixture.pump();
    assert!(fixture.shell.state().is_playing);

    fixture.surface.script_advance(60.0);
    fixture.pump();
    let state = fixture.shell.state();
    assert!(!state.is_playing);
    assert_eq!(state.current_time, 30.0);

    fixture.shell.unmount();
    assert_eq!(fixture.shell.live_listener_count(), 0);

    Ok(())
}
