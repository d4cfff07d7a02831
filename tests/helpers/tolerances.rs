//! Tolerance constants for audio testing.
//!
//! Different operations require different precision levels.

/// Floating point rounding errors (for passthrough, exact gain).
/// Use for operations that should be mathematically exact.
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Accumulated error of matrix products and ramps.
pub const DSP_EPSILON: f32 = 1e-4;

/// Silence threshold (~-80dB).
/// Values below this are considered silent.
pub const SILENCE_THRESHOLD: f32 = 0.0001;
