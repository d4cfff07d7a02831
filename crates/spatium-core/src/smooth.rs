//! Linear gain ramps for zipper-free parameter changes.

/// Linearly ramped value. Call [`next_sample()`](SmoothedValue::next_sample) once
/// per sample in the audio callback.
#[derive(Debug, Clone)]
pub struct SmoothedValue {
    current: f32,
    target: f32,
    step: f32,
    samples_remaining: u32,
    smooth_samples: u32,
}

impl SmoothedValue {
    /// Ramps over `smooth_samples` samples whenever the target changes.
    pub fn new(initial: f32, smooth_samples: u32) -> Self {
        Self {
            current: initial,
            target: initial,
            step: 0.0,
            samples_remaining: 0,
            smooth_samples: smooth_samples.max(1),
        }
    }

    #[inline]
    pub fn set_target(&mut self, target: f32) {
        if (target - self.target).abs() < f32::EPSILON {
            return;
        }
        self.target = target;
        self.samples_remaining = self.smooth_samples;
        self.step = (self.target - self.current) / self.samples_remaining as f32;
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.samples_remaining > 0 {
            self.current += self.step;
            self.samples_remaining -= 1;
            // Snap to avoid drift.
            if self.samples_remaining == 0 {
                self.current = self.target;
            }
        }
        self.current
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn is_smoothing(&self) -> bool {
        self.samples_remaining > 0
    }

    /// Writes the next `buffer.len()` ramp values.
    #[inline]
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }
}
