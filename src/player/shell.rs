//! Player shell
//!
//! Composition layer: binds the resolver's chosen source to the surface,
//! builds the engine against it, wires the input coordinator to the engine,
//! and pumps the media and adaptive event channels. The shell adds only
//! thin conveniences of its own (click-to-toggle, double-click fullscreen)
//! and exposes the imperative handle and view-model the embedding page
//! consumes.

use crate::input::{FocusTarget, InputCoordinator, InputProfile, Key, KeyDispatch, ListenerRegistry};
use crate::media::{MediaEvent, MediaSurface};
use crate::player::{
    ControlsModel, EngineOptions, FullscreenProvider, PlaybackEngine, PlaybackState,
    PlayerCallbacks, TimestampMarker,
};
use crate::source::{
    AdaptiveEngineFactory, CapabilityProbe, DeliveryMode, StreamSource, StreamSourceResolver,
};
use crate::utils::config::Tuning;
use crate::utils::error::{PlayerError, Result};
use crate::utils::prefs::{JsonFileStore, PreferenceStore};
use crossbeam_channel::Receiver;
use log::{debug, info};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

/// Where a click originated, so control-bar clicks never double as
/// surface gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOrigin {
    Surface,
    ControlBar,
}

/// Builder for a fully wired player
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use clipset_player::media::SyntheticSurface;
/// use clipset_player::player::PlayerShellBuilder;
/// use clipset_player::source::{StaticProbe, StreamSource, SyntheticAdaptiveFactory};
///
/// let shell = PlayerShellBuilder::new(Arc::new(SyntheticSurface::new()))
///     .with_source(StreamSource::progressive("https://media.example/v/1.mp4"))
///     .with_probe(Box::new(StaticProbe::none()))
///     .with_adaptive_factory(Box::new(SyntheticAdaptiveFactory::new()))
///     .build()
///     .unwrap();
/// ```
pub struct PlayerShellBuilder {
    surface: Arc<dyn MediaSurface>,
    source: Option<StreamSource>,
    probe: Option<Box<dyn CapabilityProbe>>,
    adaptive_factory: Option<Box<dyn AdaptiveEngineFactory>>,
    fullscreen_providers: Vec<Box<dyn FullscreenProvider>>,
    prefs: Option<Arc<dyn PreferenceStore>>,
    callbacks: PlayerCallbacks,
    tuning: Option<Tuning>,
    profile: InputProfile,
    markers: Vec<TimestampMarker>,
    poster_url: Option<String>,
    initial_time: f64,
    autoplay: bool,
}

impl PlayerShellBuilder {
    pub fn new(surface: Arc<dyn MediaSurface>) -> Self {
        Self {
            surface,
            source: None,
            probe: None,
            adaptive_factory: None,
            fullscreen_providers: Vec::new(),
            prefs: None,
            callbacks: PlayerCallbacks::default(),
            tuning: None,
            profile: InputProfile::Desktop,
            markers: Vec::new(),
            poster_url: None,
            initial_time: 0.0,
            autoplay: false,
        }
    }

    pub fn with_source(mut self, source: StreamSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_probe(mut self, probe: Box<dyn CapabilityProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn with_adaptive_factory(mut self, factory: Box<dyn AdaptiveEngineFactory>) -> Self {
        self.adaptive_factory = Some(factory);
        self
    }

    pub fn with_fullscreen_providers(
        mut self,
        providers: Vec<Box<dyn FullscreenProvider>>,
    ) -> Self {
        self.fullscreen_providers = providers;
        self
    }

    pub fn with_preference_store(mut self, prefs: Arc<dyn PreferenceStore>) -> Self {
        self.prefs = Some(prefs);
        self
    }

    pub fn with_callbacks(mut self, callbacks: PlayerCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = Some(tuning);
        self
    }

    pub fn with_input_profile(mut self, profile: InputProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_markers(mut self, markers: Vec<TimestampMarker>) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_poster_url(mut self, url: impl Into<String>) -> Self {
        self.poster_url = Some(url.into());
        self
    }

    /// Deep-link start position in seconds
    pub fn with_initial_time(mut self, seconds: f64) -> Self {
        self.initial_time = seconds.max(0.0);
        self
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// Wire everything up and resolve the source onto the surface
    pub fn build(self) -> Result<PlayerShell> {
        let source = self
            .source
            .ok_or_else(|| PlayerError::InvalidInput("No stream source provided".to_string()))?;
        if source.progressive_url.is_empty() {
            return Err(PlayerError::InvalidInput(
                "Progressive URL must not be empty".to_string(),
            ));
        }
        let probe = self
            .probe
            .ok_or_else(|| PlayerError::InvalidInput("No capability probe provided".to_string()))?;
        let factory = self.adaptive_factory.ok_or_else(|| {
            PlayerError::InvalidInput("No adaptive engine factory provided".to_string())
        })?;

        let tuning = match self.tuning {
            Some(tuning) => tuning,
            None => Tuning::load()?,
        };
        let prefs = match self.prefs {
            Some(prefs) => prefs,
            None => Arc::new(JsonFileStore::open_default()) as Arc<dyn PreferenceStore>,
        };

        let engine = Arc::new(PlaybackEngine::new(
            Arc::clone(&self.surface),
            prefs,
            self.callbacks,
            self.fullscreen_providers,
            EngineOptions {
                initial_time: self.initial_time,
                autoplay: self.autoplay,
                ticker_interval: Duration::from_millis(tuning.ticker_interval_ms),
                ..Default::default()
            },
        ));

        let registry = ListenerRegistry::new();
        let coordinator = InputCoordinator::new(
            Arc::clone(&engine),
            tuning,
            self.profile,
            registry.clone(),
        );

        let mut resolver = StreamSourceResolver::new(source, probe, factory);
        let mode = resolver.resolve(self.surface.as_ref(), self.initial_time);
        info!("player mounted, delivery mode {:?}", mode);

        Ok(PlayerShell {
            media_events: self.surface.events(),
            surface: self.surface,
            engine,
            resolver: Mutex::new(resolver),
            coordinator: Mutex::new(coordinator),
            registry,
            markers: Mutex::new(self.markers),
            poster_url: self.poster_url,
            detached: AtomicBool::new(false),
        })
    }
}

/// The composed player
pub struct PlayerShell {
    surface: Arc<dyn MediaSurface>,
    engine: Arc<PlaybackEngine>,
    resolver: Mutex<StreamSourceResolver>,
    coordinator: Mutex<InputCoordinator>,
    media_events: Receiver<MediaEvent>,
    registry: ListenerRegistry,
    markers: Mutex<Vec<TimestampMarker>>,
    poster_url: Option<String>,
    detached: AtomicBool,
}

impl PlayerShell {
    /// Drain pending media and adaptive events and advance deadlines;
    /// the host calls this from its frame loop
    pub fn pump(&self, now: Instant) {
        for event in self.media_events.try_iter() {
            self.engine.handle_media_event(event);
        }

        let mut resolver = self.resolver.lock();
        if let Some(adaptive_events) = resolver.adaptive_events() {
            for event in adaptive_events.try_iter() {
                resolver.handle_adaptive_event(self.surface.as_ref(), event);
            }
        }
        drop(resolver);

        self.coordinator.lock().tick(now);
    }

    /// Imperative handle for the embedding page
    pub fn handle(&self) -> PlayerHandle {
        PlayerHandle {
            engine: Arc::clone(&self.engine),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.engine.state()
    }

    pub fn delivery_mode(&self) -> Option<DeliveryMode> {
        self.resolver.lock().mode()
    }

    pub fn poster_url(&self) -> Option<&str> {
        self.poster_url.as_deref()
    }

    /// Replace the scrubber markers (the comments collaborator refreshes
    /// these)
    pub fn set_markers(&self, markers: Vec<TimestampMarker>) {
        *self.markers.lock() = markers;
    }

    /// Render-ready control bar description
    pub fn controls_model(&self, now: Instant) -> ControlsModel {
        let visible = self.coordinator.lock().controls_visible(now);
        ControlsModel::project(&self.engine.state(), visible, &self.markers.lock())
    }

    /// A click on the player; control-bar clicks never toggle playback
    pub fn handle_click(&self, origin: ClickOrigin) {
        if origin == ClickOrigin::Surface {
            self.engine.toggle_play();
        }
    }

    /// A double-click on the player; surface-only, toggles fullscreen
    pub fn handle_double_click(&self, origin: ClickOrigin) {
        if origin == ClickOrigin::Surface {
            self.engine.toggle_fullscreen();
        }
    }

    pub fn handle_key(&self, key: Key, target: FocusTarget) -> Option<KeyDispatch> {
        self.coordinator.lock().handle_key(key, target)
    }

    pub fn handle_tap(&self, x_fraction: f64, now: Instant) {
        self.coordinator.lock().handle_tap(x_fraction, now);
    }

    pub fn pointer_moved(&self, now: Instant) {
        self.coordinator.lock().pointer_moved(now);
    }

    pub fn begin_scrub(&self, fraction: f64, now: Instant) {
        self.coordinator.lock().begin_scrub(fraction, now);
    }

    pub fn scrub_to(&self, fraction: f64) {
        self.coordinator.lock().scrub_to(fraction);
    }

    pub fn begin_volume_drag(&self, y_fraction: f64, now: Instant) {
        self.coordinator.lock().begin_volume_drag(y_fraction, now);
    }

    pub fn volume_drag_to(&self, y_fraction: f64) {
        self.coordinator.lock().volume_drag_to(y_fraction);
    }

    pub fn end_drag(&self) {
        self.coordinator.lock().end_drag();
    }

    pub fn dismiss_controls(&self) {
        self.coordinator.lock().dismiss_controls();
    }

    /// Navigate to a different video; forces teardown and re-resolution
    /// when either URL changed
    pub fn update_source(&self, source: StreamSource) -> DeliveryMode {
        self.resolver
            .lock()
            .update_source(self.surface.as_ref(), source, 0.0)
    }

    /// Listener registrations currently held; zero after unmount
    pub fn live_listener_count(&self) -> usize {
        self.registry.total()
    }

    /// Unmount: synchronously cancel the ticker, remove every input
    /// registration, and detach any live adaptive engine; idempotent
    pub fn unmount(&self) {
        if self.detached.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!("unmounting player shell");
        self.engine.detach();
        self.coordinator.lock().detach();
        self.resolver.lock().detach(self.surface.as_ref());
    }
}

impl Drop for PlayerShell {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Cloneable imperative control handle
///
/// Used by page features like the comment timestamp jump; safe to retain
/// past the shell as calls degrade to surface no-ops once unmounted.
#[derive(Clone)]
pub struct PlayerHandle {
    engine: Arc<PlaybackEngine>,
}

impl PlayerHandle {
    pub fn seek_to(&self, seconds: f64) {
        self.engine.seek(seconds);
    }

    pub fn play(&self) {
        self.engine.play();
    }

    pub fn pause(&self) {
        self.engine.pause();
    }

    pub fn current_time(&self) -> f64 {
        self.engine.current_time()
    }
}
