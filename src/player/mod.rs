//! Playback engine module
//!
//! This module owns the playback state machine: the continuously-rebuilt
//! `PlaybackState` snapshot, the `PlaybackEngine` that is the sole mutator
//! of the media surface, the frame ticker that keeps the progress display
//! smooth, the fullscreen driver with its CSS fallback, and the composed
//! `PlayerShell` with its imperative handle.

mod controls;
mod engine;
mod fullscreen;
mod shell;
mod ticker;

pub use controls::{ControlsModel, MarkerTick, TimestampMarker};
pub use engine::{EngineOptions, PlaybackEngine};
pub use fullscreen::{CssOnly, FullscreenDriver, FullscreenProvider, FullscreenUnavailable};
pub use shell::{ClickOrigin, PlayerHandle, PlayerShell, PlayerShellBuilder};
pub use ticker::FrameTicker;

use crate::media::{MediaErrorKind, TimeRange};

/// The fixed set of selectable playback rates
pub const RATE_STEPS: [f64; 8] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];

/// Coerce a requested rate onto the fixed rate set
///
/// Values not in the set (including non-finite values) become 1.0.
pub fn coerce_rate(rate: f64) -> f64 {
    if RATE_STEPS.iter().any(|r| (r - rate).abs() < 1e-9) {
        rate
    } else {
        1.0
    }
}

/// Step from `current` one position through the rate set
///
/// `direction` is +1 or -1; stepping past either end is a no-op. A
/// `current` outside the set steps relative to 1.0.
pub fn step_rate(current: f64, direction: i8) -> f64 {
    let current = coerce_rate(current);
    let index = RATE_STEPS
        .iter()
        .position(|r| (r - current).abs() < 1e-9)
        .unwrap_or(3);

    let stepped = if direction >= 0 {
        (index + 1).min(RATE_STEPS.len() - 1)
    } else {
        index.saturating_sub(1)
    };

    RATE_STEPS[stepped]
}

/// Continuously-updated snapshot of the media surface's observable state
///
/// Rebuilt on every native media event; a projection of the element, never
/// an independently authoritative value.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Playback is running
    pub is_playing: bool,

    /// Data is being fetched for the current position (buffering or an
    /// in-flight seek)
    pub is_loading: bool,

    /// Enough data has arrived to begin playback
    pub is_ready: bool,

    /// A native media error occurred on the active source
    pub has_error: bool,

    /// Current position in seconds
    pub current_time: f64,

    /// Duration in seconds, `None` until metadata is known
    pub duration: Option<f64>,

    /// Buffered ranges, non-overlapping, ascending
    pub buffered: Vec<TimeRange>,

    /// Volume in [0, 1]
    pub volume: f64,

    pub is_muted: bool,

    /// Always a member of `RATE_STEPS`
    pub playback_rate: f64,

    pub is_fullscreen: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            is_loading: false,
            is_ready: false,
            has_error: false,
            current_time: 0.0,
            duration: None,
            buffered: Vec::new(),
            volume: 1.0,
            is_muted: false,
            playback_rate: 1.0,
            is_fullscreen: false,
        }
    }
}

/// A native media error surfaced to the embedding page
#[derive(Debug, Clone)]
pub struct PlaybackError {
    pub kind: MediaErrorKind,
    pub message: String,
}

/// Lifecycle callbacks supplied by the embedding page
///
/// Only native media errors cross this boundary as failures; every other
/// failure category is absorbed inside the core.
#[derive(Default)]
pub struct PlayerCallbacks {
    pub on_ready: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_play: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_pause: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_ended: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_time_update: Option<Box<dyn Fn(f64) + Send + Sync>>,
    pub on_error: Option<Box<dyn Fn(&PlaybackError) + Send + Sync>>,
}

impl PlayerCallbacks {
    pub(crate) fn ready(&self) {
        if let Some(cb) = &self.on_ready {
            cb();
        }
    }

    pub(crate) fn play(&self) {
        if let Some(cb) = &self.on_play {
            cb();
        }
    }

    pub(crate) fn pause(&self) {
        if let Some(cb) = &self.on_pause {
            cb();
        }
    }

    pub(crate) fn ended(&self) {
        if let Some(cb) = &self.on_ended {
            cb();
        }
    }

    pub(crate) fn time_update(&self, seconds: f64) {
        if let Some(cb) = &self.on_time_update {
            cb(seconds);
        }
    }

    pub(crate) fn error(&self, error: &PlaybackError) {
        if let Some(cb) = &self.on_error {
            cb(error);
        }
    }
}
