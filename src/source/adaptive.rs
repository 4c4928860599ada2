//! Client-side adaptive engine seam
//!
//! The adaptive engine is a black box to the rest of the player: it attaches
//! to the surface, fetches manifest and segments itself, retries recoverable
//! errors internally, and reports only two observable outcomes. The token
//! decorator is handed to it at construction so every request it makes can
//! be signed.

use crate::media::MediaSurface;
use crossbeam_channel::Receiver;
use log::debug;
use url::Url;

/// The only externally observable adaptive outcomes; everything milder is
/// retried inside the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdaptiveEvent {
    /// A recoverable error was retried in place; informational only
    Recovered,

    /// The engine gave up; the caller must abandon adaptive delivery
    FatalError(String),
}

/// Appends the auth token to request URLs that do not already carry one
///
/// Backend-signed URLs arrive with credentials baked in, so an existing
/// `token` parameter is always left untouched.
#[derive(Debug, Clone, Default)]
pub struct RequestDecorator {
    token: Option<String>,
}

impl RequestDecorator {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    /// Decorate one manifest or segment URL
    pub fn decorate(&self, raw: &str) -> String {
        let Some(token) = &self.token else {
            return raw.to_string();
        };

        match Url::parse(raw) {
            Ok(mut parsed) => {
                if parsed.query_pairs().any(|(key, _)| key == "token") {
                    return raw.to_string();
                }
                parsed.query_pairs_mut().append_pair("token", token);
                parsed.to_string()
            }
            // Segment URLs inside a manifest are often relative
            Err(_) => {
                let already_signed = raw
                    .split_once('?')
                    .map(|(_, query)| {
                        query
                            .split('&')
                            .any(|pair| pair.split('=').next() == Some("token"))
                    })
                    .unwrap_or(false);
                if already_signed {
                    raw.to_string()
                } else {
                    let separator = if raw.contains('?') { '&' } else { '?' };
                    format!("{raw}{separator}token={token}")
                }
            }
        }
    }
}

/// A client-side segmented-playback engine
pub trait AdaptiveEngine: Send + Sync {
    /// Load the manifest and begin feeding the surface from
    /// `start_position` seconds
    fn attach(&self, surface: &dyn MediaSurface, manifest_url: &str, start_position: f64);

    /// Stop all network and surface activity; idempotent
    fn detach(&self, surface: &dyn MediaSurface);

    /// The engine's outcome stream
    fn events(&self) -> Receiver<AdaptiveEvent>;
}

/// Constructs one engine per resolution
pub trait AdaptiveEngineFactory: Send + Sync {
    fn create(&self, decorator: RequestDecorator) -> Box<dyn AdaptiveEngine>;
}

/// Scriptable in-crate engine used by tests and embedding smoke checks
///
/// Models attach/detach bookkeeping and decorated request URLs; scripts
/// inject the outcomes a real engine would report.
pub struct SyntheticAdaptiveEngine {
    decorator: RequestDecorator,
    inner: parking_lot::Mutex<EngineModel>,
    tx: crossbeam_channel::Sender<AdaptiveEvent>,
    rx: Receiver<AdaptiveEvent>,
}

#[derive(Default)]
struct EngineModel {
    attached: bool,
    manifest_url: Option<String>,
    start_position: f64,
}

impl SyntheticAdaptiveEngine {
    pub fn new(decorator: RequestDecorator) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            decorator,
            inner: parking_lot::Mutex::new(EngineModel::default()),
            tx,
            rx,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.inner.lock().attached
    }

    /// The decorated manifest URL from the last attach
    pub fn manifest_url(&self) -> Option<String> {
        self.inner.lock().manifest_url.clone()
    }

    pub fn start_position(&self) -> f64 {
        self.inner.lock().start_position
    }

    /// Script: a recoverable error was retried internally
    pub fn script_recovered(&self) {
        let _ = self.tx.send(AdaptiveEvent::Recovered);
    }

    /// Script: the engine gave up
    pub fn script_fatal_error(&self, message: &str) {
        let _ = self.tx.send(AdaptiveEvent::FatalError(message.to_string()));
    }
}

impl AdaptiveEngine for SyntheticAdaptiveEngine {
    fn attach(&self, _surface: &dyn MediaSurface, manifest_url: &str, start_position: f64) {
        let decorated = self.decorator.decorate(manifest_url);
        debug!("adaptive engine attaching to {}", decorated);
        let mut model = self.inner.lock();
        model.attached = true;
        model.manifest_url = Some(decorated);
        model.start_position = start_position;
    }

    fn detach(&self, _surface: &dyn MediaSurface) {
        let mut model = self.inner.lock();
        model.attached = false;
        model.manifest_url = None;
    }

    fn events(&self) -> Receiver<AdaptiveEvent> {
        self.rx.clone()
    }
}

/// Factory producing `SyntheticAdaptiveEngine`s, with handles kept for
/// scripting
#[derive(Default)]
pub struct SyntheticAdaptiveFactory {
    created: parking_lot::Mutex<Vec<std::sync::Arc<SyntheticAdaptiveEngine>>>,
}

impl SyntheticAdaptiveFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engines created so far, in creation order
    pub fn engines(&self) -> Vec<std::sync::Arc<SyntheticAdaptiveEngine>> {
        self.created.lock().clone()
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().len()
    }
}

impl AdaptiveEngineFactory for SyntheticAdaptiveFactory {
    fn create(&self, decorator: RequestDecorator) -> Box<dyn AdaptiveEngine> {
        let engine = std::sync::Arc::new(SyntheticAdaptiveEngine::new(decorator));
        self.created.lock().push(std::sync::Arc::clone(&engine));
        Box::new(SharedEngine(engine))
    }
}

/// Boxed view over a factory-retained engine
struct SharedEngine(std::sync::Arc<SyntheticAdaptiveEngine>);

impl AdaptiveEngine for SharedEngine {
    fn attach(&self, surface: &dyn MediaSurface, manifest_url: &str, start_position: f64) {
        self.0.attach(surface, manifest_url, start_position);
    }

    fn detach(&self, surface: &dyn MediaSurface) {
        self.0.detach(surface);
    }

    fn events(&self) -> Receiver<AdaptiveEvent> {
        self.0.events()
    }
}
