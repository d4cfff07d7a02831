use spatium_core::{AudioBuffer, PannerPosition, PositionHandle, SpeakerLayout};

use super::{Pan, PannerCore};
use crate::spatial::object::{ObjectOutputConfig, ObjectRenderer};
use crate::spatial::pan_block;
use crate::{Error, Result};

/// Pans a point source across discrete loudspeakers.
///
/// Layouts the object renderer has no configuration for (9.1.6 and the expanded
/// subsets) are rendered into the widest configuration of their family; the
/// panned layout's channels are then gathered out of it.
#[derive(Debug)]
pub struct ObjectPanner {
    core: PannerCore,
    renderer: ObjectRenderer,
    /// Slot in the rendered configuration for each panned channel.
    gather: Box<[usize]>,
    current: Box<[f32]>,
    target: Box<[f32]>,
}

impl ObjectPanner {
    /// `_sample_rate` is unused: gains are recomputed per block, not per sample.
    pub fn new(
        input: SpeakerLayout,
        panned: SpeakerLayout,
        block_size: usize,
        _sample_rate: u32,
    ) -> Result<Self> {
        let unsupported = || Error::UnsupportedTarget {
            input,
            output: panned,
        };
        if !input.is_channel_based() {
            return Err(unsupported());
        }
        let config = render_config(panned).ok_or_else(unsupported)?;
        let renderer = ObjectRenderer::new(config)?;
        let rendered = config.layout();
        let gather = panned
            .channel_order()
            .iter()
            .map(|&ch| rendered.index_of(ch))
            .collect::<Option<Box<[usize]>>>()
            .ok_or_else(unsupported)?;

        let channels = config.channel_count();
        let core = PannerCore::new(input, panned, block_size, input.channel_count(), channels);
        let mut panner = Self {
            core,
            renderer,
            gather,
            current: vec![0.0; channels].into_boxed_slice(),
            target: vec![0.0; channels].into_boxed_slice(),
        };
        panner.position_updated(panner.core.position());
        panner.current.copy_from_slice(&panner.target);
        Ok(panner)
    }

    /// Configuration the object renderer actually renders into.
    pub fn config(&self) -> ObjectOutputConfig {
        self.renderer.config()
    }

    pub fn gather_map(&self) -> &[usize] {
        &self.gather
    }

    fn position_updated(&mut self, position: PannerPosition) {
        self.renderer.point_source_gains(&position, &mut self.target);
    }
}

impl Pan for ObjectPanner {
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
        debug_assert_eq!(output.channels(), self.gather.len());
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

        let rendered = &self.core.rendered;
        for (k, &slot) in self.gather.iter().enumerate() {
            for (f, out) in output.channel_mut(k).iter_mut().enumerate() {
                *out = rendered.frame(f)[slot];
            }
        }
    }
}

/// Widest object-renderer configuration covering `panned`.
fn render_config(panned: SpeakerLayout) -> Option<ObjectOutputConfig> {
    if !panned.is_channel_based() {
        return None;
    }
    match panned.resolved_base() {
        SpeakerLayout::Surround9_1_6 => Some(ObjectOutputConfig::Surround22_2),
        base => ObjectOutputConfig::from_layout(base),
    }
}
