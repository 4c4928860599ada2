//! Frame ticker for smooth progress updates
//!
//! Native `timeupdate` events fire too coarsely for a smooth progress bar,
//! so while playback is running a repeating task samples the surface's
//! current time at roughly frame granularity and pushes it into the state
//! snapshot. The task is tied one-to-one to the playing state: it
//! self-terminates when the surface reports paused or ended, and
//! cancellation is idempotent and guaranteed on both pause and drop.

use crate::media::MediaSurface;
use crate::player::{PlaybackState, PlayerCallbacks};
use log::trace;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Cancellable repeating time-sync task
pub struct FrameTicker {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FrameTicker {
    /// Start the ticker against a playing surface
    pub fn start(
        surface: Arc<dyn MediaSurface>,
        state: Arc<RwLock<PlaybackState>>,
        callbacks: Arc<PlayerCallbacks>,
        interval: Duration,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            loop {
                if stop_flag.load(Ordering::SeqCst) {
                    break;
                }

                // Self-terminate once the element stops advancing
                if surface.is_paused() || surface.is_ended() {
                    trace!("ticker: surface no longer playing, exiting");
                    break;
                }

                let seconds = surface.current_time();
                state.write().current_time = seconds;
                callbacks.time_update(seconds);

                thread::sleep(interval);
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Cancel the ticker and wait for it to exit
    ///
    /// Safe to call more than once; a second call is a no-op.
    pub fn cancel(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Whether the ticker has already been cancelled or finished
    pub fn is_cancelled(&self) -> bool {
        self.handle.is_none() || self.stop.load(Ordering::SeqCst)
    }
}

impl Drop for FrameTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}
