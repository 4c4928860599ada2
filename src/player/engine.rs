//! Playback engine
//!
//! `PlaybackEngine` is the single source of truth for one media surface and
//! the only component permitted to mutate it. Its state snapshot is a
//! projection rebuilt from the surface's native events; user-facing
//! operations write to the surface and let the resulting events flow back.
//! Volume, mute, and rate changes persist synchronously to the preference
//! store; autoplay rejection and fullscreen failures are absorbed here and
//! never reach the embedding page.

use crate::media::{MediaEvent, MediaSurface};
use crate::player::{
    coerce_rate, FrameTicker, FullscreenDriver, FullscreenProvider, PlaybackError, PlaybackState,
    PlayerCallbacks,
};
use crate::utils::prefs::{PreferenceStore, StoredPreferences};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Engine construction options
#[derive(Clone)]
pub struct EngineOptions {
    /// Position to seek to once metadata arrives, seconds
    pub initial_time: f64,

    /// Begin playback as soon as the surface reports ready
    pub autoplay: bool,

    /// Caller-supplied overrides for the persisted startup preferences
    pub initial_volume: Option<f64>,
    pub initial_muted: Option<bool>,
    pub initial_rate: Option<f64>,

    /// Time-sync cadence
    pub ticker_interval: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            initial_time: 0.0,
            autoplay: false,
            initial_volume: None,
            initial_muted: None,
            initial_rate: None,
            ticker_interval: Duration::from_millis(16),
        }
    }
}

/// Single owner of the media surface's playback state
pub struct PlaybackEngine {
    surface: Arc<dyn MediaSurface>,
    state: Arc<RwLock<PlaybackState>>,
    prefs: Arc<dyn PreferenceStore>,
    callbacks: Arc<PlayerCallbacks>,
    fullscreen: Mutex<FullscreenDriver>,
    ticker: Mutex<Option<FrameTicker>>,

    /// Preferences read once at construction, merged with caller overrides;
    /// applied to the surface when metadata arrives
    startup: StoredPreferences,

    options: EngineOptions,
    initial_seek_done: AtomicBool,
    autoplay_done: AtomicBool,
}

impl PlaybackEngine {
    /// Create an engine bound to a surface
    ///
    /// Preferences are read once here and become the startup defaults,
    /// unless the caller supplied explicit initial values.
    pub fn new(
        surface: Arc<dyn MediaSurface>,
        prefs: Arc<dyn PreferenceStore>,
        callbacks: PlayerCallbacks,
        fullscreen_providers: Vec<Box<dyn FullscreenProvider>>,
        options: EngineOptions,
    ) -> Self {
        let persisted = prefs.load();
        let startup = StoredPreferences {
            volume: options
                .initial_volume
                .map(|v| v.clamp(0.0, 1.0))
                .unwrap_or(persisted.volume),
            muted: options.initial_muted.unwrap_or(persisted.muted),
            rate: coerce_rate(options.initial_rate.unwrap_or(persisted.rate)),
        };

        let state = PlaybackState {
            volume: startup.volume,
            is_muted: startup.muted,
            playback_rate: startup.rate,
            ..Default::default()
        };

        Self {
            surface,
            state: Arc::new(RwLock::new(state)),
            prefs,
            callbacks: Arc::new(callbacks),
            fullscreen: Mutex::new(FullscreenDriver::new(fullscreen_providers)),
            ticker: Mutex::new(None),
            startup,
            options,
            initial_seek_done: AtomicBool::new(false),
            autoplay_done: AtomicBool::new(false),
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> PlaybackState {
        self.state.read().clone()
    }

    /// The surface this engine owns
    pub fn surface(&self) -> &Arc<dyn MediaSurface> {
        &self.surface
    }

    /// Process one native media event, rebuilding the snapshot
    pub fn handle_media_event(&self, event: MediaEvent) {
        match event {
            MediaEvent::LoadedMetadata { duration } => {
                self.state.write().duration = Some(duration);
                self.apply_startup_preferences();
                self.apply_initial_seek(duration);
            }

            MediaEvent::CanPlay => {
                self.state.write().is_ready = true;
                self.callbacks.ready();

                if self.options.autoplay && !self.autoplay_done.swap(true, Ordering::SeqCst) {
                    self.play();
                }
            }

            MediaEvent::Play => {
                self.state.write().is_playing = true;
                self.callbacks.play();
                self.start_ticker();
            }

            MediaEvent::Playing => {
                self.state.write().is_loading = false;
            }

            MediaEvent::Pause => {
                self.state.write().is_playing = false;
                self.stop_ticker();
                self.callbacks.pause();
            }

            MediaEvent::Ended => {
                {
                    let mut state = self.state.write();
                    state.is_playing = false;
                    if let Some(duration) = state.duration {
                        state.current_time = duration;
                    }
                }
                self.stop_ticker();
                self.callbacks.ended();
            }

            MediaEvent::Waiting | MediaEvent::Seeking => {
                self.state.write().is_loading = true;
            }

            MediaEvent::Seeked => {
                let mut state = self.state.write();
                state.is_loading = false;
                state.current_time = self.surface.current_time();
            }

            MediaEvent::TimeUpdate { seconds } => {
                self.state.write().current_time = seconds;
                self.callbacks.time_update(seconds);
            }

            MediaEvent::Progress { buffered } => {
                self.state.write().buffered = buffered;
            }

            MediaEvent::VolumeChange { volume, muted } => {
                let mut state = self.state.write();
                state.volume = volume;
                state.is_muted = muted;
            }

            MediaEvent::RateChange { rate } => {
                self.state.write().playback_rate = coerce_rate(rate);
            }

            MediaEvent::Error { kind, message } => {
                warn!("native media error: {:?}: {}", kind, message);
                {
                    let mut state = self.state.write();
                    state.has_error = true;
                    state.is_loading = false;
                }
                self.stop_ticker();
                self.callbacks.error(&PlaybackError { kind, message });
            }

            MediaEvent::FullscreenChange { fullscreen } => {
                self.fullscreen.lock().sync_external(fullscreen);
                self.state.write().is_fullscreen = fullscreen;
            }
        }
    }

    /// Request playback
    ///
    /// A host rejection (autoplay policy) is expected, not an error: it is
    /// swallowed, and the UI simply remains in the paused state the native
    /// events report.
    pub fn play(&self) {
        if let Err(rejected) = self.surface.request_play() {
            debug!("play request rejected: {}", rejected);
        }
    }

    /// Pause playback
    pub fn pause(&self) {
        self.surface.request_pause();
    }

    /// Toggle play/pause based on the element's own paused flag
    ///
    /// The native flag, not the cached snapshot, decides: autoplay policy
    /// can flip it asynchronously between our events.
    pub fn toggle_play(&self) {
        if self.surface.is_paused() {
            self.play();
        } else {
            self.pause();
        }
    }

    /// Seek to an absolute position, clamped to [0, duration]
    ///
    /// An unknown duration clamps to 0. The snapshot updates when the
    /// surface's `Seeked` event arrives.
    pub fn seek(&self, seconds: f64) {
        let duration = self.surface.duration().unwrap_or(0.0);
        let target = seconds.clamp(0.0, duration.max(0.0));
        self.surface.set_current_time(target);
    }

    /// Seek relative to the element's current time at call time
    ///
    /// Reading the native time here, rather than the last-rendered
    /// snapshot, prevents compounding drift across rapid repeated calls.
    pub fn seek_relative(&self, delta: f64) {
        self.seek(self.surface.current_time() + delta);
    }

    /// Seek to a percentage of the duration; no-op while duration is
    /// unknown
    pub fn seek_percent(&self, percent: f64) {
        if let Some(duration) = self.surface.duration() {
            let percent = percent.clamp(0.0, 100.0);
            self.seek(duration * percent / 100.0);
        }
    }

    /// Set the volume, clamped to [0, 1]
    ///
    /// A positive volume while muted un-mutes as a side effect, so the
    /// volume slider implicitly restores audio. Both values persist.
    pub fn set_volume(&self, volume: f64) {
        let volume = volume.clamp(0.0, 1.0);

        if volume > 0.0 && self.surface.is_muted() {
            self.surface.set_muted(false);
            self.prefs.save_muted(false);
            self.state.write().is_muted = false;
        }

        self.surface.set_volume(volume);
        self.prefs.save_volume(volume);
        self.state.write().volume = volume;
    }

    /// Flip the native muted flag and persist the result
    pub fn toggle_mute(&self) {
        let muted = !self.surface.is_muted();
        self.surface.set_muted(muted);
        self.prefs.save_muted(muted);
        self.state.write().is_muted = muted;
    }

    /// Set the playback rate, coercing anything outside the fixed rate set
    /// to 1.0, and persist it
    pub fn set_playback_rate(&self, rate: f64) {
        let rate = coerce_rate(rate);
        self.surface.set_playback_rate(rate);
        self.prefs.save_rate(rate);
        self.state.write().playback_rate = rate;
        info!("playback rate set to {:.2}x", rate);
    }

    /// Enter fullscreen, degrading to the CSS fallback when no native API
    /// works; never fails
    pub fn request_fullscreen(&self) {
        self.fullscreen.lock().enter(self.surface.as_ref());
        self.state.write().is_fullscreen = true;
    }

    /// Leave fullscreen, reversing whichever path entry took
    pub fn exit_fullscreen(&self) {
        self.fullscreen.lock().exit(self.surface.as_ref());
        self.state.write().is_fullscreen = false;
    }

    pub fn toggle_fullscreen(&self) {
        if self.state.read().is_fullscreen {
            self.exit_fullscreen();
        } else {
            self.request_fullscreen();
        }
    }

    /// Current native position, for the imperative handle
    pub fn current_time(&self) -> f64 {
        self.surface.current_time()
    }

    /// Tear down background work; the snapshot stops updating after this
    pub fn detach(&self) {
        self.stop_ticker();
    }

    fn apply_startup_preferences(&self) {
        self.surface.set_volume(self.startup.volume);
        self.surface.set_muted(self.startup.muted);
        self.surface.set_playback_rate(self.startup.rate);

        let mut state = self.state.write();
        state.volume = self.startup.volume;
        state.is_muted = self.startup.muted;
        state.playback_rate = self.startup.rate;
    }

    /// Seek to the caller's initial time exactly once per mount
    fn apply_initial_seek(&self, duration: f64) {
        if self.options.initial_time > 0.0
            && !self.initial_seek_done.swap(true, Ordering::SeqCst)
        {
            let target = self.options.initial_time.clamp(0.0, duration);
            debug!("applying initial seek to {:.2}s", target);
            self.surface.set_current_time(target);
        }
    }

    fn start_ticker(&self) {
        let mut ticker = self.ticker.lock();
        if ticker.is_some() {
            return;
        }
        *ticker = Some(FrameTicker::start(
            Arc::clone(&self.surface),
            Arc::clone(&self.state),
            Arc::clone(&self.callbacks),
            self.options.ticker_interval,
        ));
    }

    fn stop_ticker(&self) {
        // Dropping the ticker cancels and joins it; taking from the slot
        // makes repeated stops no-ops
        self.ticker.lock().take();
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}
