use spatium_core::{AudioBuffer, PannerPosition, PositionHandle, SpeakerLayout};

use super::{Pan, PannerCore};
use crate::spatial::head::HeadModel;
use crate::{Error, Result};

/// Places a single virtual object on headphones.
///
/// Multichannel input is summed to mono before rendering.
#[derive(Debug)]
pub struct BinauralPanner {
    core: PannerCore,
    head: HeadModel,
}

impl BinauralPanner {
    pub fn new(
        input: SpeakerLayout,
        panned: SpeakerLayout,
        block_size: usize,
        sample_rate: u32,
    ) -> Result<Self> {
        if !panned.is_binaural() || !input.is_channel_based() {
            return Err(Error::UnsupportedTarget {
                input,
                output: panned,
            });
        }
        let core = PannerCore::new(input, panned, block_size, 1, 2);
        let mut head = HeadModel::new(1, sample_rate as f32);
        let start = core.position();
        head.place_source(0, start.azimuth, start.elevation, start.distance);
        Ok(Self { core, head })
    }

    fn position_updated(&mut self, position: PannerPosition) {
        self.head
            .set_source(0, position.azimuth, position.elevation, position.distance);
    }
}

impl Pan for BinauralPanner {
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
        self.head.process(&self.core.source, &mut self.core.rendered);
        self.core.rendered.copy_to_planar(output);
    }
}
