//! Control bar view-model
//!
//! `ControlsModel` is what a host renders: a pure projection of the playback
//! snapshot into scrubber/volume/rate display values. It owns no state and
//! never touches the surface; the shell rebuilds it on demand.

use crate::player::PlaybackState;
use crate::utils::format_timestamp;

/// A labelled point on the scrubber, produced by collaborators
/// (timestamped comments) and consumed read-only
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampMarker {
    pub seconds: f64,
    pub label: String,
}

/// A marker projected onto the scrubber as a fraction of the duration
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerTick {
    /// Horizontal position in [0, 1]
    pub fraction: f64,
    pub label: String,
}

/// Render-ready description of the control bar
#[derive(Debug, Clone, PartialEq)]
pub struct ControlsModel {
    /// Controls are currently shown
    pub visible: bool,

    pub is_playing: bool,
    pub is_loading: bool,
    pub is_muted: bool,
    pub is_fullscreen: bool,

    /// Scrubber fill in [0, 1]; 0 while duration is unknown
    pub played_fraction: f64,

    /// Furthest buffered point as a fraction of the duration
    pub buffered_fraction: f64,

    /// Volume slider position in [0, 1]
    pub volume: f64,

    /// "0:42" / "1:02:05" style position and duration labels
    pub position_label: String,
    pub duration_label: String,

    /// Rate badge text, "1x", "1.5x", "0.25x"
    pub rate_label: String,

    /// Marker ticks within [0, duration], in input order
    pub markers: Vec<MarkerTick>,
}

impl ControlsModel {
    /// Project a snapshot into display values
    pub fn project(state: &PlaybackState, visible: bool, markers: &[TimestampMarker]) -> Self {
        let duration = state.duration.filter(|d| *d > 0.0);

        let played_fraction = duration
            .map(|d| (state.current_time / d).clamp(0.0, 1.0))
            .unwrap_or(0.0);

        let buffered_fraction = duration
            .map(|d| {
                state
                    .buffered
                    .iter()
                    .map(|range| range.end)
                    .fold(0.0_f64, f64::max)
                    .min(d)
                    / d
            })
            .unwrap_or(0.0);

        let ticks = match duration {
            Some(d) => markers
                .iter()
                .filter(|m| m.seconds >= 0.0 && m.seconds <= d)
                .map(|m| MarkerTick {
                    fraction: m.seconds / d,
                    label: m.label.clone(),
                })
                .collect(),
            None => Vec::new(),
        };

        Self {
            visible,
            is_playing: state.is_playing,
            is_loading: state.is_loading,
            is_muted: state.is_muted,
            is_fullscreen: state.is_fullscreen,
            played_fraction,
            buffered_fraction,
            volume: state.volume,
            position_label: format_timestamp(state.current_time),
            duration_label: format_timestamp(duration.unwrap_or(0.0)),
            rate_label: format!("{}x", state.playback_rate),
            markers: ticks,
        }
    }
}
