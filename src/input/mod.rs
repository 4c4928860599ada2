//! Input coordination
//!
//! Translates keyboard shortcuts and pointer/touch gestures into engine
//! calls. Nothing in this module writes to the media surface directly;
//! every mutation goes through `PlaybackEngine` so the state snapshot and
//! the surface cannot diverge. Document-level listener registrations are
//! tracked in a registry with RAII guards so teardown is centralized,
//! idempotent, and observable.

mod coordinator;
mod gestures;
mod keyboard;

pub use coordinator::{ControlsVisibility, InputCoordinator, InputProfile};
pub use gestures::{DoubleTapState, TapOutcome, TapSide, TapTracker};
pub use keyboard::{FocusTarget, Key, KeyCommand, KeyDispatch};

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Families of document-level listeners the coordinator installs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Keyboard,
    FullscreenChange,
    DragMove,
    DragUp,
}

/// Counts live document-level listener registrations
///
/// Hosts mirror these registrations onto their real event targets; the
/// counts exist so tests can assert that teardown leaves nothing behind.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    counts: Arc<Mutex<HashMap<ListenerKind, usize>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one listener; dropping the guard unregisters it
    pub fn register(&self, kind: ListenerKind) -> ListenerGuard {
        *self.counts.lock().entry(kind).or_insert(0) += 1;
        ListenerGuard {
            counts: Arc::clone(&self.counts),
            kind,
        }
    }

    /// Total live registrations across all families
    pub fn total(&self) -> usize {
        self.counts.lock().values().sum()
    }

    /// Live registrations of one family
    pub fn count(&self, kind: ListenerKind) -> usize {
        self.counts.lock().get(&kind).copied().unwrap_or(0)
    }
}

/// RAII handle to one registered listener
pub struct ListenerGuard {
    counts: Arc<Mutex<HashMap<ListenerKind, usize>>>,
    kind: ListenerKind,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(count) = self.counts.lock().get_mut(&self.kind) {
            *count = count.saturating_sub(1);
        }
    }
}
