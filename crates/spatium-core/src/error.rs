//! Error types for spatium-core.

use thiserror::Error;

/// Error type for spatium-core operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown speaker layout: {0:?}")]
    UnknownLayout(String),

    #[error("Invalid azimuth {0}: must be -180.0..=180.0")]
    InvalidAzimuth(f32),

    #[error("Invalid elevation {0}: must be -90.0..=90.0")]
    InvalidElevation(f32),

    #[error("Invalid distance {0}: must be finite and greater than 0.0")]
    InvalidDistance(f32),

    #[error("Channel count mismatch: expected {expected}, got {got}")]
    ChannelMismatch { expected: usize, got: usize },

    #[error("Loudness measurement failed: {0}")]
    Loudness(String),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
