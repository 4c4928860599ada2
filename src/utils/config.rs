//! Input and UI tuning configuration
//!
//! This module handles the small set of timing and step constants that
//! shape how the player feels: seek steps, the double-tap skip amount,
//! the controls auto-hide delay, and the time-sync cadence. Values load
//! from a TOML file under the platform config directory with environment
//! variable overrides.

use crate::utils::error::{PlayerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Player tuning constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Arrow-key seek step in seconds
    pub seek_step_secs: f64,

    /// J/L seek step in seconds
    pub long_seek_step_secs: f64,

    /// Arrow-key volume step (0.0 to 1.0)
    pub volume_step: f64,

    /// Double-tap skip amount in seconds
    pub double_tap_skip_secs: f64,

    /// Window within which two taps count as a double tap, milliseconds
    pub double_tap_window_ms: u64,

    /// How long the double-tap skip indicator stays visible, milliseconds
    pub indicator_display_ms: u64,

    /// Controls auto-hide delay while playing, milliseconds
    pub controls_hide_delay_ms: u64,

    /// Time-sync tick interval, milliseconds
    pub ticker_interval_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seek_step_secs: 5.0,
            long_seek_step_secs: 10.0,
            volume_step: 0.05,
            double_tap_skip_secs: 10.0,
            double_tap_window_ms: 300,
            indicator_display_ms: 800,
            controls_hide_delay_ms: 3000,
            ticker_interval_ms: 16,
        }
    }
}

impl Tuning {
    /// Load tuning values
    ///
    /// Loaded in order (later sources override earlier):
    /// 1. Default values
    /// 2. User config file (~/.config/clipset/player.toml on Linux)
    /// 3. Environment variables (CLIPSET_PLAYER_* prefix)
    pub fn load() -> Result<Self> {
        let mut tuning = Self::default();

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                tuning = Self::from_file(&user_path)?;
            }
        }

        tuning.apply_env_overrides()?;
        tuning.validate()?;

        Ok(tuning)
    }

    /// Load tuning from an explicit TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PlayerError::Config(format!("Failed to read tuning file: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| PlayerError::Config(format!("Failed to parse tuning file: {}", e)))
    }

    /// Save tuning to the user config file
    pub fn save(&self) -> Result<()> {
        let path = Self::user_config_path()
            .ok_or_else(|| PlayerError::Config("Cannot determine user config path".to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| PlayerError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|e| PlayerError::Config(format!("Failed to serialize tuning: {}", e)))?;

        std::fs::write(&path, toml)
            .map_err(|e| PlayerError::Config(format!("Failed to write tuning file: {}", e)))?;

        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(step) = std::env::var("CLIPSET_PLAYER_SEEK_STEP") {
            self.seek_step_secs = step
                .parse()
                .map_err(|_| PlayerError::Config("Invalid CLIPSET_PLAYER_SEEK_STEP".to_string()))?;
        }

        if let Ok(step) = std::env::var("CLIPSET_PLAYER_VOLUME_STEP") {
            self.volume_step = step
                .parse()
                .map_err(|_| PlayerError::Config("Invalid CLIPSET_PLAYER_VOLUME_STEP".to_string()))?;
        }

        if let Ok(delay) = std::env::var("CLIPSET_PLAYER_HIDE_DELAY_MS") {
            self.controls_hide_delay_ms = delay
                .parse()
                .map_err(|_| PlayerError::Config("Invalid CLIPSET_PLAYER_HIDE_DELAY_MS".to_string()))?;
        }

        if let Ok(skip) = std::env::var("CLIPSET_PLAYER_DOUBLE_TAP_SKIP") {
            self.double_tap_skip_secs = skip.parse().map_err(|_| {
                PlayerError::Config("Invalid CLIPSET_PLAYER_DOUBLE_TAP_SKIP".to_string())
            })?;
        }

        Ok(())
    }

    /// Validate tuning values
    fn validate(&self) -> Result<()> {
        if self.seek_step_secs <= 0.0 || self.long_seek_step_secs <= 0.0 {
            return Err(PlayerError::Config(
                "Seek steps must be positive".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.volume_step) || self.volume_step == 0.0 {
            return Err(PlayerError::Config(
                "Volume step must be in (0.0, 1.0]".to_string(),
            ));
        }

        if self.double_tap_skip_secs <= 0.0 {
            return Err(PlayerError::Config(
                "Double-tap skip must be positive".to_string(),
            ));
        }

        if self.ticker_interval_ms == 0 {
            return Err(PlayerError::Config(
                "Ticker interval must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the user config file path
    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("clipset").join("player.toml"))
    }
}
