//! Utility module for the Clipset player core
//!
//! This module provides common utilities used throughout the crate:
//! - Error handling with custom error types
//! - Input/UI tuning configuration
//! - Persisted playback preferences

pub mod config;
pub mod error;
pub mod prefs;

// Re-export commonly used items
pub use config::Tuning;
pub use error::{PlayerError, Result};
pub use prefs::{JsonFileStore, MemoryStore, PreferenceStore, StoredPreferences};

/// Format a playback timestamp for display
///
/// # Arguments
///
/// * `seconds` - Position in seconds; negative or non-finite values render
///   as zero
///
/// # Returns
///
/// Formatted string in the format "H:MM:SS" or "M:SS" for positions under
/// an hour
pub fn format_timestamp(seconds: f64) -> String {
    let total_secs = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
