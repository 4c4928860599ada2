//! Fullscreen driver
//!
//! Browser engines disagree about fullscreen: there is the standards API
//! plus several legacy vendor-prefixed variants, and any of them may be
//! missing or throw. Rather than branching throughout the codebase, the
//! driver holds an ordered capability table of providers, probes it at call
//! time, and degrades to a CSS-only fullscreen (styling flag plus scroll
//! lock on the surface) when nothing native works. The CSS path is recorded
//! so that exit reverses it instead of calling a native exit that was never
//! entered. Failures never propagate past this module.

use crate::media::MediaSurface;
use log::{debug, warn};
use thiserror::Error;

/// A native fullscreen API variant offered by the host
pub trait FullscreenProvider: Send + Sync {
    /// API name, for logging ("fullscreen", "webkitFullscreen", ...)
    fn name(&self) -> &str;

    /// Probe availability at call time
    fn is_available(&self) -> bool;

    fn enter(&self) -> std::result::Result<(), FullscreenUnavailable>;

    fn exit(&self) -> std::result::Result<(), FullscreenUnavailable>;
}

/// A fullscreen request failed or the API is missing
#[derive(Debug, Clone, Error)]
#[error("fullscreen API unavailable: {0}")]
pub struct FullscreenUnavailable(pub String);

/// Marker provider set for hosts with no native fullscreen at all;
/// every request falls through to the CSS path
pub struct CssOnly;

impl FullscreenProvider for CssOnly {
    fn name(&self) -> &str {
        "css-only"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn enter(&self) -> std::result::Result<(), FullscreenUnavailable> {
        Err(FullscreenUnavailable("css-only host".to_string()))
    }

    fn exit(&self) -> std::result::Result<(), FullscreenUnavailable> {
        Err(FullscreenUnavailable("css-only host".to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Inactive,
    /// Entered through the provider at this index
    Native(usize),
    /// Entered through the CSS fallback
    Css,
}

/// Adapter over the host's fullscreen API variants
pub struct FullscreenDriver {
    providers: Vec<Box<dyn FullscreenProvider>>,
    mode: Mode,
}

impl FullscreenDriver {
    /// Create a driver over the host's providers, ordered standards-first
    pub fn new(providers: Vec<Box<dyn FullscreenProvider>>) -> Self {
        Self {
            providers,
            mode: Mode::Inactive,
        }
    }

    /// Request fullscreen, degrading to the CSS fallback when every native
    /// variant is missing or throws. Never fails.
    pub fn enter(&mut self, surface: &dyn MediaSurface) {
        if self.mode != Mode::Inactive {
            return;
        }

        for (index, provider) in self.providers.iter().enumerate() {
            if !provider.is_available() {
                continue;
            }
            match provider.enter() {
                Ok(()) => {
                    debug!("fullscreen entered via {}", provider.name());
                    self.mode = Mode::Native(index);
                    return;
                }
                Err(e) => {
                    warn!("fullscreen request via {} failed: {}", provider.name(), e);
                }
            }
        }

        debug!("no native fullscreen available, engaging CSS fallback");
        surface.set_css_fullscreen(true);
        self.mode = Mode::Css;
    }

    /// Leave fullscreen, reversing whichever path was taken on entry
    pub fn exit(&mut self, surface: &dyn MediaSurface) {
        match self.mode {
            Mode::Inactive => {}
            Mode::Native(index) => {
                if let Err(e) = self.providers[index].exit() {
                    warn!("fullscreen exit failed: {}", e);
                }
            }
            Mode::Css => {
                surface.set_css_fullscreen(false);
            }
        }
        self.mode = Mode::Inactive;
    }

    /// Whether the driver believes fullscreen is active
    pub fn is_active(&self) -> bool {
        self.mode != Mode::Inactive
    }

    /// Whether the CSS fallback is the active path
    pub fn css_fallback_active(&self) -> bool {
        self.mode == Mode::Css
    }

    /// Reconcile with a fullscreen change observed from the host
    /// (Esc key, OS gesture); the CSS path never changes underneath us,
    /// so only native state is reconciled
    pub fn sync_external(&mut self, fullscreen: bool) {
        if !fullscreen {
            if let Mode::Native(_) = self.mode {
                debug!("fullscreen exited externally");
                self.mode = Mode::Inactive;
            }
        }
    }
}
