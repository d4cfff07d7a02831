use spatium_core::{AudioBuffer, SpeakerLayout};

use crate::renderer::{debug_assert_shapes, Render};

/// Copies input to output unchanged. Used when input and output layouts match.
#[derive(Debug, Clone)]
pub struct PassthroughRenderer {
    layout: SpeakerLayout,
}

impl PassthroughRenderer {
    pub fn new(layout: SpeakerLayout) -> Self {
        Self { layout }
    }
}

impl Render for PassthroughRenderer {
    fn input_layout(&self) -> SpeakerLayout {
        self.layout
    }

    fn output_layout(&self) -> SpeakerLayout {
        self.layout
    }

    fn prepare(&mut self, _max_frames: usize) {}

    fn render(&mut self, input: &AudioBuffer, output: &mut AudioBuffer) {
        let n = self.layout.channel_count();
        debug_assert_shapes(input, output, n, n);
        output.copy_from(input);
    }
}
