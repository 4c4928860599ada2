//! Keyboard and gesture handling through the shell

use anyhow::Result;
use clipset_player::input::{FocusTarget, Key};
use clipset_player::media::MediaSurface;
use clipset_player::player::ClickOrigin;
use clipset_player_integration_tests::{FixtureOptions, TestFixture};
use std::time::{Duration, Instant};

#[test]
fn digit_five_seeks_to_half_of_duration() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.make_ready(200.0);

    fixture.shell.handle_key(Key::Digit(5), FocusTarget::Player);
    assert_eq!(fixture.surface.current_time(), 100.0);

    Ok(())
}

#[test]
fn twenty_arrow_ups_from_zero_reach_exactly_full_volume() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.make_ready(100.0);
    fixture.shell.begin_volume_drag(1.0, Instant::now());
    fixture.shell.end_drag();
    assert_eq!(fixture.surface.volume(), 0.0);

    for _ in 0..20 {
        fixture.shell.handle_key(Key::ArrowUp, FocusTarget::Body);
    }
    assert_eq!(fixture.surface.volume(), 1.0);

    Ok(())
}

#[test]
fn arrow_dispatch_prevent_default_flags() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.make_ready(100.0);

    let up = fixture
        .shell
        .handle_key(Key::ArrowUp, FocusTarget::Body)
        .unwrap();
    assert!(up.prevent_default);

    let right = fixture
        .shell
        .handle_key(Key::ArrowRight, FocusTarget::Body)
        .unwrap();
    assert!(!right.prevent_default);

    Ok(())
}

#[test]
fn typing_in_a_comment_box_never_controls_playback() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.make_ready(100.0);

    assert!(fixture
        .shell
        .handle_key(Key::Space, FocusTarget::TextEntry)
        .is_none());
    assert!(fixture.surface.is_paused());

    Ok(())
}

#[test]
fn double_tap_left_is_one_skip_not_two_toggles() -> Result<()> {
    let fixture = TestFixture::with_options(FixtureOptions {
        mobile: true,
        ..Default::default()
    })?;
    fixture.make_ready(200.0);
    fixture.shell.handle().seek_to(50.0);

    let start = Instant::now();
    fixture.shell.handle_tap(0.1, start);
    fixture.shell.handle_tap(0.1, start + Duration::from_millis(150));
    fixture.pump();

    assert_eq!(fixture.surface.current_time(), 40.0);
    assert!(fixture.surface.is_paused());

    Ok(())
}

#[test]
fn unmount_mid_drag_leaves_zero_listeners() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.make_ready(100.0);

    fixture.shell.begin_scrub(0.3, Instant::now());
    assert!(fixture.shell.live_listener_count() > 0);

    fixture.shell.unmount();
    assert_eq!(fixture.shell.live_listener_count(), 0);

    Ok(())
}

#[test]
fn controls_hide_while_playing_and_persist_while_paused() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.make_ready(100.0);
    let start = Instant::now();

    // Paused: visible no matter how stale the last activity is
    assert!(fixture
        .shell
        .controls_model(start + Duration::from_secs(60))
        .visible);

    fixture.shell.handle().play();
    fixture.pump();
    fixture.shell.pointer_moved(start);

    assert!(fixture
        .shell
        .controls_model(start + Duration::from_secs(2))
        .visible);
    assert!(!fixture
        .shell
        .controls_model(start + Duration::from_secs(4))
        .visible);

    fixture.shell.dismiss_controls();
    assert!(!fixture
        .shell
        .controls_model(start + Duration::from_secs(1))
        .visible);

    Ok(())
}

#[test]
fn controls_hide_without_any_pointer_activity() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.make_ready(100.0);
    let mounted = Instant::now();

    // Autoplay-style session where the pointer never moves
    fixture.shell.handle().play();
    fixture.pump();

    assert!(fixture
        .shell
        .controls_model(mounted + Duration::from_secs(1))
        .visible);
    assert!(!fixture
        .shell
        .controls_model(mounted + Duration::from_secs(30))
        .visible);

    Ok(())
}

#[test]
fn surface_clicks_toggle_but_control_bar_clicks_do_not() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.make_ready(100.0);

    fixture.shell.handle_click(ClickOrigin::ControlBar);
    assert!(fixture.surface.is_paused());

    fixture.shell.handle_click(ClickOrigin::Surface);
    fixture.pump();
    assert!(!fixture.surface.is_paused());

    fixture.shell.handle_double_click(ClickOrigin::Surface);
    assert!(fixture.shell.state().is_fullscreen);

    Ok(())
}
