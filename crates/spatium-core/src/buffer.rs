//! Audio buffers used at the render boundary.
//!
//! [`AudioBuffer`] is the host format: one contiguous run of samples per channel.
//! [`InterleavedBuffer`] is the frame-major layout the spatial libraries work in;
//! data crosses between the two with an element-wise transpose.
//!
//! Both buffers keep a frame *capacity* separate from the current frame count so a
//! buffer prepared for the host's maximum block size can serve any shorter block
//! without reallocating.

/// Channel-major block of samples (`channels × frames`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioBuffer {
    data: Vec<f32>,
    channels: usize,
    frames: usize,
    capacity: usize,
}

impl AudioBuffer {
    /// Silent buffer of the given shape.
    pub fn new(channels: usize, frames: usize) -> Self {
        Self {
            data: vec![0.0; channels * frames],
            channels,
            frames,
            capacity: frames,
        }
    }

    /// Builds a buffer from per-channel sample vectors of equal length.
    pub fn from_channels(channels: &[Vec<f32>]) -> Self {
        let frames = channels.first().map_or(0, Vec::len);
        let mut buffer = Self::new(channels.len(), frames);
        for (ch, samples) in channels.iter().enumerate() {
            assert_eq!(samples.len(), frames, "channel {ch} has a different length");
            buffer.channel_mut(ch).copy_from_slice(samples);
        }
        buffer
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Frames that fit without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn channel(&self, ch: usize) -> &[f32] {
        let start = ch * self.capacity;
        &self.data[start..start + self.frames]
    }

    #[inline]
    pub fn channel_mut(&mut self, ch: usize) -> &mut [f32] {
        let start = ch * self.capacity;
        &mut self.data[start..start + self.frames]
    }

    #[inline]
    pub fn sample(&self, ch: usize, frame: usize) -> f32 {
        self.channel(ch)[frame]
    }

    #[inline]
    pub fn set_sample(&mut self, ch: usize, frame: usize, value: f32) {
        self.channel_mut(ch)[frame] = value;
    }

    /// Reshapes the buffer, reallocating only when the new shape does not fit.
    ///
    /// Returns `true` if memory was allocated. A buffer sized up front for the
    /// largest block never allocates here. Contents are unspecified afterwards.
    pub fn ensure_size(&mut self, channels: usize, frames: usize) -> bool {
        if channels == self.channels && frames <= self.capacity {
            self.frames = frames;
            return false;
        }
        let capacity = frames.max(self.capacity);
        self.data.clear();
        self.data.resize(channels * capacity, 0.0);
        self.channels = channels;
        self.frames = frames;
        self.capacity = capacity;
        true
    }

    /// Silences every channel.
    pub fn clear(&mut self) {
        for ch in 0..self.channels {
            self.channel_mut(ch).fill(0.0);
        }
    }

    /// Copies `src` sample for sample. Shapes must match.
    pub fn copy_from(&mut self, src: &AudioBuffer) {
        debug_assert_eq!(self.channels, src.channels);
        debug_assert_eq!(self.frames, src.frames);
        for ch in 0..self.channels {
            self.channel_mut(ch).copy_from_slice(src.channel(ch));
        }
    }

    /// Adds `src * gain` into this buffer. Shapes must match.
    pub fn add_from(&mut self, src: &AudioBuffer, gain: f32) {
        debug_assert_eq!(self.channels, src.channels);
        debug_assert_eq!(self.frames, src.frames);
        for ch in 0..self.channels {
            for (out, &s) in self.channel_mut(ch).iter_mut().zip(src.channel(ch)) {
                *out += s * gain;
            }
        }
    }

    /// Multiplies every sample by `gain`.
    pub fn apply_gain(&mut self, gain: f32) {
        for ch in 0..self.channels {
            for s in self.channel_mut(ch) {
                *s *= gain;
            }
        }
    }

    /// Largest absolute sample value of one channel.
    pub fn peak(&self, ch: usize) -> f32 {
        self.channel(ch).iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    /// Writes `output = matrixᵀ · input` for every frame.
    ///
    /// `matrix` is input-major (`matrix[i * output.channels() + o]`). The output is
    /// overwritten. Cost is `inputs × outputs × frames` multiply-adds with no
    /// data-dependent branching; zero gains are skipped per channel pair.
    pub fn apply_matrix(input: &AudioBuffer, matrix: &[f32], output: &mut AudioBuffer) {
        let num_in = input.channels();
        let num_out = output.channels();
        debug_assert_eq!(matrix.len(), num_in * num_out);
        debug_assert_eq!(input.frames(), output.frames());

        output.clear();
        for i in 0..num_in {
            let src = input.channel(i);
            for o in 0..num_out {
                let gain = matrix[i * num_out + o];
                if gain == 0.0 {
                    continue;
                }
                for (out, &s) in output.channel_mut(o).iter_mut().zip(src) {
                    *out += s * gain;
                }
            }
        }
    }
}

/// Frame-major block (`frames × channels`), as consumed by the spatial libraries.
#[derive(Debug, Clone, Default)]
pub struct InterleavedBuffer {
    data: Vec<f32>,
    channels: usize,
    frames: usize,
}

impl InterleavedBuffer {
    pub fn new(channels: usize, frames: usize) -> Self {
        Self {
            data: vec![0.0; channels * frames],
            channels,
            frames,
        }
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Sets the active frame count; grows storage only past the current capacity.
    pub fn ensure_frames(&mut self, frames: usize) -> bool {
        self.frames = frames;
        let needed = self.channels * frames;
        if needed > self.data.len() {
            self.data.resize(needed, 0.0);
            return true;
        }
        false
    }

    #[inline]
    pub fn frame(&self, index: usize) -> &[f32] {
        &self.data[index * self.channels..(index + 1) * self.channels]
    }

    #[inline]
    pub fn frame_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.data[index * self.channels..(index + 1) * self.channels]
    }

    /// Active samples, frame after frame.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data[..self.channels * self.frames]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        let len = self.channels * self.frames;
        &mut self.data[..len]
    }

    pub fn clear(&mut self) {
        self.as_mut_slice().fill(0.0);
    }

    /// Transposes `src` into this buffer. Channel counts must match.
    pub fn copy_from_planar(&mut self, src: &AudioBuffer) {
        debug_assert_eq!(self.channels, src.channels());
        self.ensure_frames(src.frames());
        let channels = self.channels;
        for ch in 0..channels {
            for (f, &s) in src.channel(ch).iter().enumerate() {
                self.data[f * channels + ch] = s;
            }
        }
    }

    /// Transposes this buffer into `dst`. Channel counts must match.
    pub fn copy_to_planar(&self, dst: &mut AudioBuffer) {
        debug_assert_eq!(self.channels, dst.channels());
        debug_assert_eq!(self.frames, dst.frames());
        let channels = self.channels;
        for ch in 0..channels {
            for (f, out) in dst.channel_mut(ch).iter_mut().enumerate() {
                *out = self.data[f * channels + ch];
            }
        }
    }
}
