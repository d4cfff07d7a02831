//! Spherical-head binaural model (ITD + ILD) for a set of virtual sources.
//!
//! Each source is a voice with a private delay line. Interaural time difference
//! follows Woodworth's formula on the lateral angle; the far ear is delayed and
//! attenuated. No HRTF dataset is involved.

use spatium_core::InterleavedBuffer;

use super::distance_gain;

const HEAD_RADIUS: f32 = 0.0875;
const SPEED_OF_SOUND: f32 = 343.0;
/// Far-ear attenuation for a source fully to one side.
const MAX_ILD_DB: f32 = 10.0;

/// Longest interaural delay the model can produce, in seconds.
pub fn max_itd_seconds() -> f32 {
    HEAD_RADIUS / SPEED_OF_SOUND * (core::f32::consts::FRAC_PI_2 + 1.0)
}

/// Ear gains and delays for one source direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarParams {
    pub gains: [f32; 2],
    pub delays: [usize; 2],
}

impl EarParams {
    pub fn compute(azimuth: f32, elevation: f32, distance: f32, sample_rate: f32) -> Self {
        let (az, el) = (azimuth.to_radians(), elevation.to_radians());
        // Positive lateral angle: source on the left.
        let lateral = (az.sin() * el.cos()).clamp(-1.0, 1.0).asin();
        let lat = lateral.abs();

        let itd = HEAD_RADIUS / SPEED_OF_SOUND * (lat + lat.sin());
        let itd_samples = (itd * sample_rate).round() as usize;

        let far = 10.0f32.powf(-MAX_ILD_DB * lat.sin() / 20.0);
        let level = (1.0 - (elevation.abs() / 90.0) * 0.3) * distance_gain(distance);

        if lateral >= 0.0 {
            Self {
                gains: [level, level * far],
                delays: [0, itd_samples],
            }
        } else {
            Self {
                gains: [level * far, level],
                delays: [itd_samples, 0],
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Voice {
    line: Vec<f32>,
    write_pos: usize,
    current: EarParams,
    target: EarParams,
}

impl Voice {
    fn new(line_len: usize, params: EarParams) -> Self {
        Self {
            line: vec![0.0; line_len],
            write_pos: 0,
            current: params,
            target: params,
        }
    }

    #[inline]
    fn tap(&self, delay: usize) -> f32 {
        let len = self.line.len();
        self.line[(self.write_pos + len - delay) % len]
    }
}

/// A set of binaural voices rendered into one ear pair.
#[derive(Debug, Clone)]
pub struct HeadModel {
    sample_rate: f32,
    voices: Vec<Voice>,
}

impl HeadModel {
    /// `num_sources` voices, all initially straight ahead at 1 m.
    pub fn new(num_sources: usize, sample_rate: f32) -> Self {
        let line_len = (max_itd_seconds() * sample_rate).ceil() as usize + 2;
        let front = EarParams::compute(0.0, 0.0, 1.0, sample_rate);
        Self {
            sample_rate,
            voices: (0..num_sources).map(|_| Voice::new(line_len, front)).collect(),
        }
    }

    pub fn num_sources(&self) -> usize {
        self.voices.len()
    }

    /// Moves a source. Gains glide over the next block; delays switch at its start.
    pub fn set_source(&mut self, index: usize, azimuth: f32, elevation: f32, distance: f32) {
        let params = EarParams::compute(azimuth, elevation, distance, self.sample_rate);
        self.voices[index].target = params;
    }

    /// Places a source without a glide.
    pub fn place_source(&mut self, index: usize, azimuth: f32, elevation: f32, distance: f32) {
        let params = EarParams::compute(azimuth, elevation, distance, self.sample_rate);
        let voice = &mut self.voices[index];
        voice.current = params;
        voice.target = params;
    }

    /// Renders one input channel per source into a two-channel ear feed.
    ///
    /// The output is overwritten.
    pub fn process(&mut self, input: &InterleavedBuffer, output: &mut InterleavedBuffer) {
        debug_assert_eq!(input.channels(), self.voices.len());
        debug_assert_eq!(output.channels(), 2);
        let frames = input.frames();
        output.clear();

        for (v, voice) in self.voices.iter_mut().enumerate() {
            let from = voice.current.gains;
            let to = voice.target.gains;
            let delays = voice.target.delays;
            let len = voice.line.len();

            for f in 0..frames {
                voice.line[voice.write_pos] = input.frame(f)[v];
                let t = (f + 1) as f32 / frames as f32;
                let left = voice.tap(delays[0]) * (from[0] + (to[0] - from[0]) * t);
                let right = voice.tap(delays[1]) * (from[1] + (to[1] - from[1]) * t);
                voice.write_pos = (voice.write_pos + 1) % len;

                let out = output.frame_mut(f);
                out[0] += left;
                out[1] += right;
            }
            voice.current = voice.target;
        }
    }
}
