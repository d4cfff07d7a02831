//! Test helpers and fixtures for spatium integration tests
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact operations (passthrough, unity gain)
//! - `DSP_EPSILON` (1e-4): Matrix products, ramps
//! - `SILENCE_THRESHOLD` (0.0001): Silence detection (-80dB)

#![allow(dead_code)]

pub mod tolerances;

use spatium::prelude::*;

/// Default test sample rate (matches common hardware)
pub const TEST_SAMPLE_RATE: u32 = 48_000;

/// Standard block size for deterministic testing
pub const TEST_BLOCK_SIZE: usize = 256;

/// Create a test engine rendering into `output`.
pub fn test_engine(output: SpeakerLayout) -> MixEngine {
    MixEngine::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .block_size(TEST_BLOCK_SIZE)
        .output_layout(output)
        .build()
        .expect("Failed to create test engine")
}

/// Routes `tracing` output to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Generate a test signal: sine wave at given frequency for specified samples.
pub fn generate_sine(frequency: f32, sample_rate: u32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            (2.0 * std::f64::consts::PI * frequency as f64 * t).sin() as f32
        })
        .collect()
}

/// Generate white noise (random samples in -1..1).
pub fn generate_noise(num_samples: usize, seed: u64) -> Vec<f32> {
    // Simple LCG for reproducible "random" noise
    let mut rng = seed;
    (0..num_samples)
        .map(|_| {
            rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((rng >> 33) as f32 / u32::MAX as f32) * 2.0 - 1.0
        })
        .collect()
}

/// Buffer with independent noise on every channel.
pub fn noise_buffer(channels: usize, frames: usize, seed: u64) -> AudioBuffer {
    let data: Vec<Vec<f32>> = (0..channels)
        .map(|ch| generate_noise(frames, seed.wrapping_add(ch as u64 * 7919)))
        .collect();
    AudioBuffer::from_channels(&data)
}

/// Buffer carrying `signal` on channel `ch` and silence elsewhere.
pub fn impulse_channel(channels: usize, ch: usize, signal: &[f32]) -> AudioBuffer {
    let mut buffer = AudioBuffer::new(channels, signal.len());
    buffer.channel_mut(ch).copy_from_slice(signal);
    buffer
}

/// Calculate RMS of a signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}

/// Largest sample-wise difference over every channel of two equally shaped buffers.
pub fn max_difference(a: &AudioBuffer, b: &AudioBuffer) -> f32 {
    assert_eq!(a.channels(), b.channels());
    assert_eq!(a.frames(), b.frames());
    (0..a.channels())
        .flat_map(|ch| a.channel(ch).iter().zip(b.channel(ch)).map(|(x, y)| (x - y).abs()))
        .fold(0.0_f32, f32::max)
}

/// Assert that a signal is approximately silent (all values near zero).
pub fn assert_silence(samples: &[f32], tolerance: f32) {
    let max = peak(samples);
    assert!(
        max <= tolerance,
        "Expected silence, but peak amplitude was {}",
        max
    );
}

/// Assert that a signal has content (not silent).
pub fn assert_has_audio(samples: &[f32], min_rms: f32) {
    let r = rms(samples);
    assert!(
        r >= min_rms,
        "Expected audio content with RMS >= {}, but RMS was {}",
        min_rms,
        r
    );
}
