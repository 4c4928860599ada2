//! Media surface abstraction
//!
//! The player core never touches pixels, samples, or the network itself:
//! everything flows through a `MediaSurface`, the crate's handle to the
//! host's media element. The surface is externally mutable (autoplay
//! policy, OS media keys, the adaptive engine feeding it segments), so the
//! engine treats it as the single source of truth and rebuilds its state
//! snapshot from the surface's event stream rather than trusting cached
//! values.

use crossbeam_channel::Receiver;
use thiserror::Error;

pub mod synthetic;

pub use synthetic::SyntheticSurface;

/// A buffered time range in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Category of a native media error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaErrorKind {
    /// Fetch aborted by the host
    Aborted,

    /// Network failure while fetching the active source
    Network,

    /// Decode failure
    Decode,

    /// The source format is not supported
    SrcNotSupported,
}

/// A playback request was rejected by the host, typically by autoplay policy
#[derive(Debug, Clone, Copy, Error)]
#[error("play request rejected by the host")]
pub struct PlayRejected;

/// Native media events, unified across delivery modes
///
/// These mirror the media element's event vocabulary one-to-one; the
/// engine's state machine is driven entirely by this stream.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Duration and dimensions are known
    LoadedMetadata { duration: f64 },

    /// Enough data is buffered to begin playback
    CanPlay,

    /// Playback was requested and accepted
    Play,

    /// Frames are actually advancing again
    Playing,

    /// Playback paused
    Pause,

    /// Playback stalled waiting for data
    Waiting,

    /// A seek started
    Seeking,

    /// A seek completed
    Seeked,

    /// Coarse-grained position report
    TimeUpdate { seconds: f64 },

    /// Buffered ranges changed
    Progress { buffered: Vec<TimeRange> },

    /// Volume or mute changed on the element
    VolumeChange { volume: f64, muted: bool },

    /// Playback rate changed on the element
    RateChange { rate: f64 },

    /// End of media reached
    Ended,

    /// A native media error occurred on the active source
    Error {
        kind: MediaErrorKind,
        message: String,
    },

    /// Fullscreen state changed, possibly outside the player's control
    /// (Esc key, OS gesture)
    FullscreenChange { fullscreen: bool },
}

/// The host's media element
///
/// Exactly one component, the `PlaybackEngine`, is permitted to mutate a
/// surface; every other component calls through the engine so the state
/// snapshot and the element never diverge.
pub trait MediaSurface: Send + Sync {
    /// Currently attached source URL, if any
    fn src(&self) -> Option<String>;

    /// Attach a source URL, tearing down whatever was attached before
    fn set_src(&self, url: &str);

    /// Detach the current source
    fn clear_src(&self);

    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// Write the playback position directly; completion is reported
    /// asynchronously via `MediaEvent::Seeked`
    fn set_current_time(&self, seconds: f64);

    /// Media duration in seconds, `None` until metadata is known
    fn duration(&self) -> Option<f64>;

    /// The element's own paused flag
    fn is_paused(&self) -> bool;

    /// Whether playback has reached the end of media
    fn is_ended(&self) -> bool;

    /// Request playback; the host may reject (autoplay policy)
    fn request_play(&self) -> std::result::Result<(), PlayRejected>;

    /// Request a pause; never fails
    fn request_pause(&self);

    /// Element volume in [0, 1]
    fn volume(&self) -> f64;

    fn set_volume(&self, volume: f64);

    fn is_muted(&self) -> bool;

    fn set_muted(&self, muted: bool);

    fn playback_rate(&self) -> f64;

    fn set_playback_rate(&self, rate: f64);

    /// Buffered ranges, non-overlapping and ascending
    fn buffered(&self) -> Vec<TimeRange>;

    /// Engage or release the CSS fullscreen fallback styling
    /// (fixed positioning plus scroll lock on the host page)
    fn set_css_fullscreen(&self, active: bool);

    /// Whether the CSS fullscreen fallback styling is engaged
    fn css_fullscreen_active(&self) -> bool;

    /// The surface's native event stream
    fn events(&self) -> Receiver<MediaEvent>;
}
