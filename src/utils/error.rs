//! Error types for the Clipset player core
//!
//! This module defines the custom error types used throughout the crate.
//! We use thiserror for convenient error type definitions. Most failure
//! categories in the player are absorbed internally (autoplay rejection,
//! fullscreen unavailability, storage failures); only genuine wiring
//! problems surface as `PlayerError`.

use thiserror::Error;

/// Main error type for the player core
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Media surface errors
    #[error("Surface error: {0}")]
    Surface(String),

    /// Stream source resolution errors
    #[error("Source error: {0}")]
    Source(String),

    /// Adaptive engine errors
    #[error("Adaptive error: {0}")]
    Adaptive(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File I/O errors
    #[error("File error: {0}")]
    FileIO(#[from] std::io::Error),

    /// Generic error for unexpected situations
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for Results in the player core
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Extension trait for converting other errors to PlayerError
pub trait IntoPlayerError<T> {
    /// Convert this error into a PlayerError with the given context
    fn surface_err(self, context: &str) -> Result<T>;
    fn source_err(self, context: &str) -> Result<T>;
    fn adaptive_err(self, context: &str) -> Result<T>;
    fn config_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> IntoPlayerError<T> for std::result::Result<T, E> {
    fn surface_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerError::Surface(format!("{}: {}", context, e)))
    }

    fn source_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerError::Source(format!("{}: {}", context, e)))
    }

    fn adaptive_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerError::Adaptive(format!("{}: {}", context, e)))
    }

    fn config_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerError::Config(format!("{}: {}", context, e)))
    }
}
