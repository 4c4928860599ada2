//! Integration test utilities for clipset-player
//!
//! Provides a fixture that wires a scriptable media surface into a fully
//! built shell, plus helpers for driving the event pump the way an
//! embedding host's frame loop would.

use anyhow::{Context, Result};
use clipset_player::media::{MediaSurface, SyntheticSurface};
use clipset_player::player::{PlayerCallbacks, PlayerShell, PlayerShellBuilder};
use clipset_player::source::{
    AdaptiveEngineFactory, StaticProbe, StreamSource, SyntheticAdaptiveFactory,
};
use clipset_player::utils::config::Tuning;
use clipset_player::utils::prefs::{MemoryStore, PreferenceStore};
use std::sync::Arc;
use std::time::Instant;

pub const PROGRESSIVE_URL: &str = "https://media.example/videos/42.mp4";
pub const MANIFEST_URL: &str = "https://media.example/videos/42/index.m3u8";

/// Initialize test logging; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A fully wired player over a scriptable surface
pub struct TestFixture {
    pub surface: Arc<SyntheticSurface>,
    pub factory: Arc<SyntheticAdaptiveFactory>,
    pub shell: PlayerShell,
}

/// Knobs for fixture construction
pub struct FixtureOptions {
    pub source: StreamSource,
    pub prefs: Arc<dyn PreferenceStore>,
    pub callbacks: PlayerCallbacks,
    pub initial_time: f64,
    pub autoplay: bool,
    pub mobile: bool,
}

impl Default for FixtureOptions {
    fn default() -> Self {
        Self {
            source: StreamSource::progressive(PROGRESSIVE_URL),
            prefs: Arc::new(MemoryStore::new()),
            callbacks: PlayerCallbacks::default(),
            initial_time: 0.0,
            autoplay: false,
            mobile: false,
        }
    }
}

impl FixtureOptions {
    /// A source carrying an adaptive manifest and auth token
    pub fn adaptive() -> Self {
        Self {
            source: StreamSource::with_manifest(
                PROGRESSIVE_URL,
                MANIFEST_URL,
                Some("secret".to_string()),
            ),
            ..Default::default()
        }
    }
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        Self::with_options(FixtureOptions::default())
    }

    pub fn with_options(options: FixtureOptions) -> Result<Self> {
        init_logging();

        let surface = Arc::new(SyntheticSurface::new());
        let factory = Arc::new(SyntheticAdaptiveFactory::new());

        let profile = if options.mobile {
            clipset_player::input::InputProfile::Mobile
        } else {
            clipset_player::input::InputProfile::Desktop
        };

        let shell = PlayerShellBuilder::new(Arc::clone(&surface) as Arc<dyn MediaSurface>)
            .with_source(options.source)
            .with_probe(Box::new(StaticProbe::none()))
            .with_adaptive_factory(Box::new(FactoryHandle(Arc::clone(&factory))))
            .with_preference_store(options.prefs)
            .with_callbacks(options.callbacks)
            .with_tuning(Tuning::default())
            .with_input_profile(profile)
            .with_initial_time(options.initial_time)
            .with_autoplay(options.autoplay)
            .build()
            .context("Building player shell")?;

        Ok(Self {
            surface,
            factory,
            shell,
        })
    }

    /// Drain all pending events, as one host frame would
    pub fn pump(&self) {
        self.shell.pump(Instant::now());
    }

    /// Script the surface to a ready state with the given duration and
    /// drain the resulting events
    pub fn make_ready(&self, duration: f64) {
        self.surface.script_load_metadata(duration);
        self.surface.script_can_play();
        self.pump();
    }
}

/// Lets the fixture keep scripting handles to engines the resolver owns
struct FactoryHandle(Arc<SyntheticAdaptiveFactory>);

impl AdaptiveEngineFactory for FactoryHandle {
    fn create(
        &self,
        decorator: clipset_player::source::RequestDecorator,
    ) -> Box<dyn clipset_player::source::AdaptiveEngine> {
        self.0.create(decorator)
    }
}
