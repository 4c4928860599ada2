//! Scriptable media surface
//!
//! `SyntheticSurface` is the in-crate implementation of `MediaSurface`: a
//! deterministic model of a media element used by the test suites and by
//! embedding smoke checks. Scripts drive it through the `script_*` methods,
//! which mutate the model and emit the same events a real element would.

use crate::media::{MediaErrorKind, MediaEvent, MediaSurface, PlayRejected, TimeRange};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

#[derive(Debug)]
struct SurfaceModel {
    src: Option<String>,
    current_time: f64,
    duration: Option<f64>,
    paused: bool,
    ended: bool,
    volume: f64,
    muted: bool,
    playback_rate: f64,
    buffered: Vec<TimeRange>,
    css_fullscreen: bool,

    /// When set, `request_play` is rejected, modeling autoplay policy
    reject_play: bool,

    /// When set, `set_current_time` emits `Seeked` immediately after
    /// `Seeking`; cleared to model an element still fetching data
    auto_complete_seeks: bool,
}

impl Default for SurfaceModel {
    fn default() -> Self {
        Self {
            src: None,
            current_time: 0.0,
            duration: None,
            paused: true,
            ended: false,
            volume: 1.0,
            muted: false,
            playback_rate: 1.0,
            buffered: Vec::new(),
            css_fullscreen: false,
            reject_play: false,
            auto_complete_seeks: true,
        }
    }
}

/// Deterministic, scriptable media element model
pub struct SyntheticSurface {
    model: Mutex<SurfaceModel>,
    tx: Sender<MediaEvent>,
    rx: Receiver<MediaEvent>,
}

impl Default for SyntheticSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticSurface {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            model: Mutex::new(SurfaceModel::default()),
            tx,
            rx,
        }
    }

    fn emit(&self, event: MediaEvent) {
        // Receiver is held by the surface itself, so send cannot fail
        let _ = self.tx.send(event);
    }

    /// Script: make subsequent `request_play` calls fail, modeling a host
    /// autoplay policy rejection
    pub fn script_reject_play(&self, reject: bool) {
        self.model.lock().reject_play = reject;
    }

    /// Script: control whether seeks complete synchronously
    pub fn script_auto_complete_seeks(&self, auto: bool) {
        self.model.lock().auto_complete_seeks = auto;
    }

    /// Script: metadata arrived, duration is now known
    pub fn script_load_metadata(&self, duration: f64) {
        self.model.lock().duration = Some(duration);
        self.emit(MediaEvent::LoadedMetadata { duration });
    }

    /// Script: enough data buffered to begin playback
    pub fn script_can_play(&self) {
        self.emit(MediaEvent::CanPlay);
    }

    /// Script: playback stalled waiting for data
    pub fn script_waiting(&self) {
        self.emit(MediaEvent::Waiting);
    }

    /// Script: frames advancing again after a stall or seek
    pub fn script_playing(&self) {
        self.emit(MediaEvent::Playing);
    }

    /// Script: complete an in-flight seek
    pub fn script_complete_seek(&self) {
        self.emit(MediaEvent::Seeked);
    }

    /// Script: buffered ranges changed
    pub fn script_progress(&self, buffered: Vec<TimeRange>) {
        self.model.lock().buffered = buffered.clone();
        self.emit(MediaEvent::Progress { buffered });
    }

    /// Script: a native media error on the active source
    pub fn script_error(&self, kind: MediaErrorKind, message: &str) {
        self.emit(MediaEvent::Error {
            kind,
            message: message.to_string(),
        });
    }

    /// Script: the host changed fullscreen state outside the player
    /// (Esc key, OS gesture)
    pub fn script_fullscreen_change(&self, fullscreen: bool) {
        self.emit(MediaEvent::FullscreenChange { fullscreen });
    }

    /// Script: mutate the element's time directly, as an external actor
    /// (OS media session scrubber) would, without any seek events
    pub fn script_set_time_externally(&self, seconds: f64) {
        self.model.lock().current_time = seconds;
    }

    /// Script: advance playback by `dt` seconds of wall time
    ///
    /// Emits `TimeUpdate`, and `Ended` when the duration is reached.
    pub fn script_advance(&self, dt: f64) {
        let event = {
            let mut model = self.model.lock();
            if model.paused || model.ended {
                return;
            }
            let advanced = model.current_time + dt * model.playback_rate;
            match model.duration {
                Some(duration) if advanced >= duration => {
                    model.current_time = duration;
                    model.ended = true;
                    model.paused = true;
                    Some((
                        MediaEvent::TimeUpdate { seconds: duration },
                        Some(MediaEvent::Ended),
                    ))
                }
                _ => {
                    model.current_time = advanced;
                    Some((MediaEvent::TimeUpdate { seconds: advanced }, None))
                }
            }
        };

        if let Some((update, ended)) = event {
            self.emit(update);
            if let Some(ended) = ended {
                self.emit(ended);
            }
        }
    }
}

impl MediaSurface for SyntheticSurface {
    fn src(&self) -> Option<String> {
        self.model.lock().src.clone()
    }

    fn set_src(&self, url: &str) {
        let mut model = self.model.lock();
        model.src = Some(url.to_string());
        model.current_time = 0.0;
        model.duration = None;
        model.paused = true;
        model.ended = false;
        model.buffered.clear();
    }

    fn clear_src(&self) {
        let mut model = self.model.lock();
        model.src = None;
        model.current_time = 0.0;
        model.duration = None;
        model.paused = true;
        model.ended = false;
        model.buffered.clear();
    }

    fn current_time(&self) -> f64 {
        self.model.lock().current_time
    }

    fn set_current_time(&self, seconds: f64) {
        let auto = {
            let mut model = self.model.lock();
            let clamped = match model.duration {
                Some(duration) => seconds.clamp(0.0, duration),
                None => seconds.max(0.0),
            };
            model.current_time = clamped;
            if model.ended && clamped < model.duration.unwrap_or(f64::MAX) {
                model.ended = false;
            }
            model.auto_complete_seeks
        };

        self.emit(MediaEvent::Seeking);
        if auto {
            self.emit(MediaEvent::Seeked);
        }
    }

    fn duration(&self) -> Option<f64> {
        self.model.lock().duration
    }

    fn is_paused(&self) -> bool {
        self.model.lock().paused
    }

    fn is_ended(&self) -> bool {
        self.model.lock().ended
    }

    fn request_play(&self) -> std::result::Result<(), PlayRejected> {
        {
            let mut model = self.model.lock();
            if model.reject_play {
                return Err(PlayRejected);
            }
            if !model.paused {
                return Ok(());
            }
            model.paused = false;
            model.ended = false;
        }

        self.emit(MediaEvent::Play);
        self.emit(MediaEvent::Playing);
        Ok(())
    }

    fn request_pause(&self) {
        {
            let mut model = self.model.lock();
            if model.paused {
                return;
            }
            model.paused = true;
        }

        self.emit(MediaEvent::Pause);
    }

    fn volume(&self) -> f64 {
        self.model.lock().volume
    }

    fn set_volume(&self, volume: f64) {
        let (volume, muted) = {
            let mut model = self.model.lock();
            model.volume = volume.clamp(0.0, 1.0);
            (model.volume, model.muted)
        };
        self.emit(MediaEvent::VolumeChange { volume, muted });
    }

    fn is_muted(&self) -> bool {
        self.model.lock().muted
    }

    fn set_muted(&self, muted: bool) {
        let volume = {
            let mut model = self.model.lock();
            model.muted = muted;
            model.volume
        };
        self.emit(MediaEvent::VolumeChange { volume, muted });
    }

    fn playback_rate(&self) -> f64 {
        self.model.lock().playback_rate
    }

    fn set_playback_rate(&self, rate: f64) {
        self.model.lock().playback_rate = rate;
        self.emit(MediaEvent::RateChange { rate });
    }

    fn buffered(&self) -> Vec<TimeRange> {
        self.model.lock().buffered.clone()
    }

    fn set_css_fullscreen(&self, active: bool) {
        self.model.lock().css_fullscreen = active;
    }

    fn css_fullscreen_active(&self) -> bool {
        self.model.lock().css_fullscreen
    }

    fn events(&self) -> Receiver<MediaEvent> {
        self.rx.clone()
    }
}
