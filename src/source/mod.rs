//! Stream source resolution
//!
//! A video arrives as a progressive URL, optionally accompanied by an
//! adaptive manifest URL and an auth token. This module decides which
//! delivery mode drives the media surface, hands adaptive playback to a
//! pluggable client engine when the host lacks genuine native support, and
//! falls back to progressive delivery when adaptive playback fails fatally.

mod adaptive;
mod resolver;

pub use adaptive::{
    AdaptiveEngine, AdaptiveEngineFactory, AdaptiveEvent, RequestDecorator, SyntheticAdaptiveEngine,
    SyntheticAdaptiveFactory,
};
pub use resolver::StreamSourceResolver;

/// Where a video's bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSource {
    /// Single-file HTTP delivery, always present
    pub progressive_url: String,

    /// Segmented manifest, present when the backend has transcoded the video
    pub adaptive_manifest_url: Option<String>,

    /// Token appended to manifest/segment requests that lack one
    pub auth_token: Option<String>,
}

impl StreamSource {
    pub fn progressive(url: impl Into<String>) -> Self {
        Self {
            progressive_url: url.into(),
            adaptive_manifest_url: None,
            auth_token: None,
        }
    }

    pub fn with_manifest(
        progressive_url: impl Into<String>,
        manifest_url: impl Into<String>,
        auth_token: Option<String>,
    ) -> Self {
        Self {
            progressive_url: progressive_url.into(),
            adaptive_manifest_url: Some(manifest_url.into()),
            auth_token,
        }
    }
}

/// The delivery mechanism attached to the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Progressive URL set as the surface src directly
    Progressive,

    /// Manifest URL set as the surface src, host plays it natively
    NativeAdaptive,

    /// A client-side engine feeds the surface from the manifest
    ClientAdaptive,
}

/// Host's answer when asked whether it can play a segmented manifest
/// natively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeAdaptiveSupport {
    /// Definite yes
    Affirmative,

    /// The non-committal answer many engines give while unable to actually
    /// play a manifest
    Maybe,

    No,
}

/// Probe of the host's media capabilities
pub trait CapabilityProbe: Send + Sync {
    /// Can the host play the segmented manifest format natively?
    fn native_adaptive_support(&self) -> NativeAdaptiveSupport;

    /// Is this the Apple media stack? Only its affirmative answers are
    /// trusted; other engines claim "maybe" support they cannot deliver.
    fn is_apple_media_stack(&self) -> bool;
}

/// Fixed-answer probe for hosts that know their capabilities up front,
/// and for tests
pub struct StaticProbe {
    pub support: NativeAdaptiveSupport,
    pub apple_media_stack: bool,
}

impl StaticProbe {
    /// A host with no native adaptive playback at all
    pub fn none() -> Self {
        Self {
            support: NativeAdaptiveSupport::No,
            apple_media_stack: false,
        }
    }
}

impl CapabilityProbe for StaticProbe {
    fn native_adaptive_support(&self) -> NativeAdaptiveSupport {
        self.support
    }

    fn is_apple_media_stack(&self) -> bool {
        self.apple_media_stack
    }
}
