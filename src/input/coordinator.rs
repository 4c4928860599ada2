//! Input coordinator
//!
//! One component owns every document-level input registration and routes
//! each gesture or shortcut to a single engine call. Timeouts (double-tap
//! window, indicator display, controls auto-hide) are deadline-based
//! against caller-supplied `Instant`s; the host drives `tick` from its
//! frame loop.

use crate::input::gestures::{DoubleTapState, TapOutcome, TapTracker};
use crate::input::keyboard::{route_key, FocusTarget, Key, KeyCommand, KeyDispatch};
use crate::input::{ListenerGuard, ListenerKind, ListenerRegistry};
use crate::player::{step_rate, PlaybackEngine};
use crate::utils::config::Tuning;
use log::debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Pointer input style of the embedding host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputProfile {
    /// Hover-driven controls; single taps on the surface are ignored here
    /// and click handling is left to the shell
    Desktop,

    /// Tap-driven controls; single tap toggles playback, double-tap skips
    Mobile,
}

/// Deadline-based controls visibility
///
/// Controls show on pointer activity and hide after the configured delay
/// while playing; while paused they are always shown.
pub struct ControlsVisibility {
    hide_delay: Duration,
    shown: bool,
    hide_at: Option<Instant>,
}

impl ControlsVisibility {
    /// Starts shown with the auto-hide countdown already armed, so an
    /// autoplaying mount hides its controls even if the pointer never moves
    pub fn new(hide_delay: Duration, now: Instant) -> Self {
        Self {
            hide_delay,
            shown: true,
            hide_at: Some(now + hide_delay),
        }
    }

    /// Pointer activity; restarts the auto-hide countdown
    pub fn show(&mut self, now: Instant) {
        self.shown = true;
        self.hide_at = Some(now + self.hide_delay);
    }

    /// Explicit dismiss; hides regardless of any pending deadline
    pub fn dismiss(&mut self) {
        self.shown = false;
        self.hide_at = None;
    }

    pub fn is_visible(&self, now: Instant, playing: bool) -> bool {
        if !playing {
            return true;
        }
        match self.hide_at {
            Some(deadline) => self.shown && now < deadline,
            None => self.shown,
        }
    }
}

enum DragKind {
    Scrub,
    Volume,
}

/// A drag in progress; the guards are the document-level move/up
/// registrations, released when this is dropped
struct DragState {
    kind: DragKind,
    _move_guard: ListenerGuard,
    _up_guard: ListenerGuard,
}

/// Routes keyboard and pointer input into engine calls
pub struct InputCoordinator {
    engine: Arc<PlaybackEngine>,
    tuning: Tuning,
    profile: InputProfile,
    registry: ListenerRegistry,

    keyboard_guard: Option<ListenerGuard>,
    fullscreen_guard: Option<ListenerGuard>,
    drag: Option<DragState>,

    tap: TapTracker,
    indicator: Option<(DoubleTapState, Instant)>,
    controls: ControlsVisibility,
}

impl InputCoordinator {
    /// Create a coordinator and register its long-lived listeners
    pub fn new(
        engine: Arc<PlaybackEngine>,
        tuning: Tuning,
        profile: InputProfile,
        registry: ListenerRegistry,
    ) -> Self {
        let keyboard_guard = Some(registry.register(ListenerKind::Keyboard));
        let fullscreen_guard = Some(registry.register(ListenerKind::FullscreenChange));
        let tap = TapTracker::new(Duration::from_millis(tuning.double_tap_window_ms));
        let controls = ControlsVisibility::new(
            Duration::from_millis(tuning.controls_hide_delay_ms),
            Instant::now(),
        );

        Self {
            engine,
            tuning,
            profile,
            registry,
            keyboard_guard,
            fullscreen_guard,
            drag: None,
            tap,
            indicator: None,
            controls,
        }
    }

    /// Handle one key press; returns the dispatch so the host knows
    /// whether to suppress its default handling
    pub fn handle_key(&mut self, key: Key, target: FocusTarget) -> Option<KeyDispatch> {
        if self.keyboard_guard.is_none() {
            return None;
        }

        let dispatch = route_key(key, target)?;
        match dispatch.command {
            KeyCommand::TogglePlay => self.engine.toggle_play(),
            KeyCommand::SeekShort(direction) => self
                .engine
                .seek_relative(f64::from(direction) * self.tuning.seek_step_secs),
            KeyCommand::SeekLong(direction) => self
                .engine
                .seek_relative(f64::from(direction) * self.tuning.long_seek_step_secs),
            KeyCommand::VolumeStep(direction) => self.nudge_volume(direction),
            KeyCommand::ToggleMute => self.engine.toggle_mute(),
            KeyCommand::ToggleFullscreen => self.engine.toggle_fullscreen(),
            KeyCommand::RateStep(direction) => {
                let current = self.engine.state().playback_rate;
                self.engine.set_playback_rate(step_rate(current, direction));
            }
            KeyCommand::SeekTenth(digit) => self.engine.seek_percent(f64::from(digit) * 10.0),
        }
        Some(dispatch)
    }

    /// Volume keys step along a lattice of whole steps, so repeated
    /// presses land on exact values (20 ups from zero give exactly 1.0)
    /// instead of accumulating float error
    fn nudge_volume(&self, direction: i8) {
        let step = self.tuning.volume_step;
        let current = self.engine.state().volume;
        let steps = (current / step).round() + f64::from(direction);
        self.engine.set_volume((steps * step).clamp(0.0, 1.0));
    }

    /// Pointer movement anywhere over the player
    pub fn pointer_moved(&mut self, now: Instant) {
        self.controls.show(now);
    }

    /// A tap on the media surface at horizontal `x_fraction`
    pub fn handle_tap(&mut self, x_fraction: f64, now: Instant) {
        self.controls.show(now);

        if self.profile == InputProfile::Desktop {
            // Desktop clicks are the shell's business
            return;
        }

        match self.tap.record_tap(x_fraction, now) {
            TapOutcome::Pending => {}
            TapOutcome::Double(None) => {}
            TapOutcome::Double(Some(side)) => {
                let amount = self.tuning.double_tap_skip_secs;
                let delta = match side {
                    crate::input::TapSide::Left => -amount,
                    crate::input::TapSide::Right => amount,
                };
                debug!("double-tap skip {:+}s", delta);
                self.engine.seek_relative(delta);
                self.indicator = Some((
                    DoubleTapState {
                        visible: true,
                        side,
                        amount,
                    },
                    now + Duration::from_millis(self.tuning.indicator_display_ms),
                ));
            }
        }
    }

    /// Advance deadline-driven behavior; the host calls this each frame
    pub fn tick(&mut self, now: Instant) {
        if self.tap.take_expired_single(now).is_some() {
            // A lone tap that outlived the double-tap window
            self.engine.toggle_play();
        }

        if let Some((_, expires_at)) = self.indicator {
            if now >= expires_at {
                self.indicator = None;
            }
        }
    }

    /// The skip indicator, if still within its display window
    pub fn indicator(&self, now: Instant) -> Option<DoubleTapState> {
        match self.indicator {
            Some((state, expires_at)) if now < expires_at => Some(state),
            _ => None,
        }
    }

    /// Whether the control bar should be rendered
    pub fn controls_visible(&self, now: Instant) -> bool {
        self.controls.is_visible(now, self.engine.state().is_playing)
    }

    /// Immediate hide, regardless of the auto-hide timer
    pub fn dismiss_controls(&mut self) {
        self.controls.dismiss();
    }

    /// Preview time for a pointer hovering at scrubber `fraction`,
    /// independent of any seek
    pub fn hover_preview(&self, fraction: f64) -> Option<f64> {
        self.engine
            .state()
            .duration
            .map(|duration| duration * fraction.clamp(0.0, 1.0))
    }

    /// Pointer down on the scrubber; installs the global move/up
    /// listeners for the duration of the drag
    pub fn begin_scrub(&mut self, fraction: f64, now: Instant) {
        self.begin_drag(DragKind::Scrub, now);
        self.scrub_to(fraction);
    }

    /// Continuous seek while the scrubber drag is held
    pub fn scrub_to(&mut self, fraction: f64) {
        if matches!(self.drag, Some(DragState { kind: DragKind::Scrub, .. })) {
            self.engine.seek_percent(fraction.clamp(0.0, 1.0) * 100.0);
        }
    }

    /// Pointer down on the volume slider
    pub fn begin_volume_drag(&mut self, y_fraction: f64, now: Instant) {
        self.begin_drag(DragKind::Volume, now);
        self.volume_drag_to(y_fraction);
    }

    /// Pointer Y maps inversely to volume: top of the slider is full
    pub fn volume_drag_to(&mut self, y_fraction: f64) {
        if matches!(self.drag, Some(DragState { kind: DragKind::Volume, .. })) {
            self.engine.set_volume((1.0 - y_fraction).clamp(0.0, 1.0));
        }
    }

    /// Pointer released; removes the global drag listeners
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Whether a drag currently holds global listeners
    pub fn drag_active(&self) -> bool {
        self.drag.is_some()
    }

    fn begin_drag(&mut self, kind: DragKind, now: Instant) {
        self.controls.show(now);
        self.drag = Some(DragState {
            kind,
            _move_guard: self.registry.register(ListenerKind::DragMove),
            _up_guard: self.registry.register(ListenerKind::DragUp),
        });
    }

    /// Remove every registration this coordinator holds; idempotent, and
    /// safe to call mid-drag
    pub fn detach(&mut self) {
        self.keyboard_guard = None;
        self.fullscreen_guard = None;
        self.drag = None;
        self.tap.clear();
        self.indicator = None;
    }
}

impl Drop for InputCoordinator {
    fn drop(&mut self) {
        self.detach();
    }
}
