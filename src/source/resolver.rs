//! Delivery mode resolution and adaptive fallback

use crate::media::MediaSurface;
use crate::source::{
    AdaptiveEngine, AdaptiveEngineFactory, AdaptiveEvent, CapabilityProbe, DeliveryMode,
    NativeAdaptiveSupport, RequestDecorator, StreamSource,
};
use crossbeam_channel::Receiver;
use log::{debug, info, warn};

/// Chooses and attaches a delivery mechanism to the media surface
///
/// At most one of native-adaptive, client-adaptive, or progressive delivery
/// is active at a time; switching is a full teardown, never a patch. A fatal
/// adaptive error switches to progressive exactly once per mount, one-way;
/// adaptive delivery is reconsidered only on a fresh mount or a source
/// change.
pub struct StreamSourceResolver {
    source: StreamSource,
    probe: Box<dyn CapabilityProbe>,
    factory: Box<dyn AdaptiveEngineFactory>,
    engine: Option<Box<dyn AdaptiveEngine>>,
    mode: Option<DeliveryMode>,
    fell_back: bool,
}

impl StreamSourceResolver {
    pub fn new(
        source: StreamSource,
        probe: Box<dyn CapabilityProbe>,
        factory: Box<dyn AdaptiveEngineFactory>,
    ) -> Self {
        Self {
            source,
            probe,
            factory,
            engine: None,
            mode: None,
            fell_back: false,
        }
    }

    /// The currently attached delivery mode, if resolution has run
    pub fn mode(&self) -> Option<DeliveryMode> {
        self.mode
    }

    /// Whether the one-way progressive fallback has fired this mount
    pub fn fell_back(&self) -> bool {
        self.fell_back
    }

    pub fn source(&self) -> &StreamSource {
        &self.source
    }

    /// Outcome stream of the live adaptive engine, if one is attached
    pub fn adaptive_events(&self) -> Option<Receiver<AdaptiveEvent>> {
        self.engine.as_ref().map(|engine| engine.events())
    }

    /// Choose a delivery mode and attach it, starting at `initial_time`
    pub fn resolve(&mut self, surface: &dyn MediaSurface, initial_time: f64) -> DeliveryMode {
        self.teardown(surface);

        let decorator = RequestDecorator::new(self.source.auth_token.clone());

        let mode = match &self.source.adaptive_manifest_url {
            None => {
                surface.set_src(&self.source.progressive_url);
                DeliveryMode::Progressive
            }

            Some(_) if self.fell_back => {
                // Adaptive delivery already failed this mount; stay on
                // progressive until a fresh mount or source change
                surface.set_src(&self.source.progressive_url);
                DeliveryMode::Progressive
            }

            Some(manifest_url) if self.native_short_circuit() => {
                info!("native adaptive playback, manifest as direct src");
                surface.set_src(&decorator.decorate(manifest_url));
                DeliveryMode::NativeAdaptive
            }

            Some(manifest_url) => {
                debug!("attaching client adaptive engine");
                let engine = self.factory.create(decorator);
                engine.attach(surface, manifest_url, initial_time);
                self.engine = Some(engine);
                DeliveryMode::ClientAdaptive
            }
        };

        self.mode = Some(mode);
        mode
    }

    /// React to an engine outcome
    ///
    /// A fatal error tears the engine down and switches the surface to the
    /// progressive URL, preserving the position playback had reached.
    pub fn handle_adaptive_event(&mut self, surface: &dyn MediaSurface, event: AdaptiveEvent) {
        match event {
            AdaptiveEvent::Recovered => {
                debug!("adaptive engine recovered in place");
            }
            AdaptiveEvent::FatalError(message) => {
                if self.fell_back {
                    return;
                }
                warn!("fatal adaptive error, falling back to progressive: {}", message);

                let position = surface.current_time();
                self.teardown(surface);
                self.fell_back = true;

                surface.set_src(&self.source.progressive_url);
                if position > 0.0 {
                    surface.set_current_time(position);
                }
                self.mode = Some(DeliveryMode::Progressive);
            }
        }
    }

    /// Swap in a new source, forcing teardown and re-resolution when either
    /// URL changed
    pub fn update_source(
        &mut self,
        surface: &dyn MediaSurface,
        source: StreamSource,
        initial_time: f64,
    ) -> DeliveryMode {
        if source == self.source {
            if let Some(mode) = self.mode {
                return mode;
            }
        } else {
            debug!("source changed, re-resolving delivery mode");
            self.source = source;
            // A new video gets a fresh shot at adaptive delivery
            self.fell_back = false;
        }
        self.resolve(surface, initial_time)
    }

    /// Detach any live engine and clear the surface; called on unmount
    pub fn detach(&mut self, surface: &dyn MediaSurface) {
        self.teardown(surface);
        surface.clear_src();
        self.mode = None;
    }

    fn teardown(&mut self, surface: &dyn MediaSurface) {
        if let Some(engine) = self.engine.take() {
            debug!("detaching adaptive engine");
            engine.detach(surface);
        }
    }

    /// Only the Apple media stack answering affirmatively plays manifests
    /// natively; other engines answer "maybe" and then fail to play them
    fn native_short_circuit(&self) -> bool {
        self.probe.is_apple_media_stack()
            && self.probe.native_adaptive_support() == NativeAdaptiveSupport::Affirmative
    }
}
