//! Tap gesture recognition
//!
//! Double-tap detection is time-based, so every entry point takes the
//! current `Instant` from the caller instead of sampling the clock
//! internally; tests drive it with synthetic timestamps.

use std::time::{Duration, Instant};

/// Which third of the surface a double-tap landed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapSide {
    Left,
    Right,
}

/// Result of recording one tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// May still become a double-tap; the single-tap action is deferred
    /// until the window expires
    Pending,

    /// Second tap within the window; `None` side for the middle third,
    /// which has no skip gesture
    Double(Option<TapSide>),
}

/// Distinguishes single taps from double-taps within a fixed window
///
/// A tap is never acted on immediately: it is held until the window
/// passes, so a double-tap produces exactly one skip and zero toggles.
pub struct TapTracker {
    window: Duration,
    pending: Option<(Instant, f64)>,
}

impl TapTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Record a tap at `x_fraction` (0 = left edge, 1 = right edge)
    pub fn record_tap(&mut self, x_fraction: f64, now: Instant) -> TapOutcome {
        if let Some((first_at, _)) = self.pending {
            if now.duration_since(first_at) <= self.window {
                self.pending = None;
                return TapOutcome::Double(Self::side_of(x_fraction));
            }
        }
        self.pending = Some((now, x_fraction));
        TapOutcome::Pending
    }

    /// Take the deferred single-tap once its window has expired
    pub fn take_expired_single(&mut self, now: Instant) -> Option<f64> {
        match self.pending {
            Some((at, x)) if now.duration_since(at) > self.window => {
                self.pending = None;
                Some(x)
            }
            _ => None,
        }
    }

    /// Drop any deferred tap without firing it
    pub fn clear(&mut self) {
        self.pending = None;
    }

    fn side_of(x_fraction: f64) -> Option<TapSide> {
        if x_fraction < 1.0 / 3.0 {
            Some(TapSide::Left)
        } else if x_fraction > 2.0 / 3.0 {
            Some(TapSide::Right)
        } else {
            None
        }
    }
}

/// Ephemeral skip indicator shown after a double-tap; presentational
/// only, never authoritative playback state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleTapState {
    pub visible: bool,
    pub side: TapSide,

    /// Skip amount in seconds
    pub amount: f64,
}
