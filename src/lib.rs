//! clipset-player - Playback core for the Clipset video platform
//!
//! The engine behind Clipset's watch page, reworked as a host-agnostic
//! library: the embedding host supplies a [`media::MediaSurface`]
//! implementation (its handle to the real media element) and the crate
//! supplies everything above that line.
//!
//! # Architecture
//!
//! - [`media`]: the surface abstraction and its unified native event stream
//! - [`player`]: the playback state machine, frame ticker, fullscreen
//!   driver, and the composed [`player::PlayerShell`]
//! - [`source`]: delivery-mode resolution with adaptive-to-progressive
//!   fallback and signed request decoration
//! - [`input`]: keyboard shortcuts, tap gestures, drags, and the listener
//!   registry that makes teardown observable
//! - [`utils`]: errors, tuning configuration, preference persistence

pub mod input;
pub mod media;
pub mod player;
pub mod source;
pub mod utils;

pub use player::{PlaybackState, PlayerCallbacks, PlayerHandle, PlayerShell, PlayerShellBuilder};
pub use source::StreamSource;
pub use utils::error::{PlayerError, Result};
