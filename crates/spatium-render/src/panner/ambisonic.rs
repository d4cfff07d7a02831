use spatium_core::{AudioBuffer, PannerPosition, PositionHandle, SpeakerLayout};

use super::{Pan, PannerCore};
use crate::spatial::{encoder, pan_block};
use crate::{Error, Result};

/// Encodes every input channel as a point source into an ambisonic scene.
#[derive(Debug)]
pub struct AmbisonicPanner {
    core: PannerCore,
    order: usize,
    current: Box<[f32]>,
    target: Box<[f32]>,
}

impl AmbisonicPanner {
    /// `_sample_rate` is unused: encoding gains do not depend on it.
    pub fn new(
        input: SpeakerLayout,
        panned: SpeakerLayout,
        block_size: usize,
        _sample_rate: u32,
    ) -> Result<Self> {
        if !panned.is_ambisonic() || !input.is_channel_based() {
            return Err(Error::UnsupportedTarget {
                input,
                output: panned,
            });
        }
        let channels = panned.channel_count();
        let order = (channels as f64).sqrt() as usize - 1;

        let core = PannerCore::new(input, panned, block_size, input.channel_count(), channels);
        let mut panner = Self {
            core,
            order,
            current: vec![0.0; channels].into_boxed_slice(),
            target: vec![0.0; channels].into_boxed_slice(),
        };
        panner.position_updated(panner.core.position());
        panner.current.copy_from_slice(&panner.target);
        Ok(panner)
    }

    pub fn order(&self) -> usize {
        self.order
    }

    fn position_updated(&mut self, position: PannerPosition) {
        encoder::point_source_coefficients(self.order, &position, &mut self.target);
    }
}

impl Pan for AmbisonicPanner {
    fn input_layout(&self) -> SpeakerLayout {
        self.core.input
    }

    fn panned_layout(&self) -> SpeakerLayout {
        self.core.panned
    }

    fn position_handle(&self) -> PositionHandle {
        self.core.handle()
    }

    fn process(&mut self, input: &AudioBuffer, output: &mut AudioBuffer) {
        if let Some(position) = self.core.poll() {
            self.position_updated(position);
        }
        self.core.stage_input(input);
        pan_block(
            &self.core.source,
            &self.current,
            &self.target,
            &mut self.core.rendered,
        );
        self.current.copy_from_slice(&self.target);
        self.core.rendered.copy_to_planar(output);
    }
}
