//! The renderer contract and its closed set of implementations.
//!
//! A renderer is built once per layout change (outside the audio callback), sized
//! with [`Render::prepare`], then driven block by block with [`Render::render`].
//! Dispatch goes through the [`Renderer`] enum, not trait objects.

use spatium_core::{AudioBuffer, SpeakerLayout};

use crate::bed::BedToBedRenderer;
use crate::binaural::BinauralRenderer;
use crate::hoa::HoaToBedRenderer;
use crate::passthrough::PassthroughRenderer;

/// Shared block-rendering contract.
pub trait Render {
    fn input_layout(&self) -> SpeakerLayout;

    fn output_layout(&self) -> SpeakerLayout;

    /// Sizes internal buffers for blocks of up to `max_frames`.
    ///
    /// After this, `render` does not allocate for any block that fits.
    fn prepare(&mut self, max_frames: usize);

    /// Renders one block, overwriting `output`.
    ///
    /// `input` must carry `input_layout().channel_count()` channels and `output`
    /// `output_layout().channel_count()` channels, both with the same frame count.
    fn render(&mut self, input: &AudioBuffer, output: &mut AudioBuffer);
}

/// Every renderer the factory can hand out.
#[derive(Debug)]
pub enum Renderer {
    Passthrough(PassthroughRenderer),
    BedToBed(BedToBedRenderer),
    HoaToBed(HoaToBedRenderer),
    Binaural(BinauralRenderer),
}

impl Renderer {
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Renderer::Passthrough(_))
    }

    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Renderer::Passthrough(_) => "passthrough",
            Renderer::BedToBed(_) => "bed-to-bed",
            Renderer::HoaToBed(_) => "hoa-to-bed",
            Renderer::Binaural(_) => "binaural",
        }
    }
}

impl Render for Renderer {
    fn input_layout(&self) -> SpeakerLayout {
        match self {
            Renderer::Passthrough(r) => r.input_layout(),
            Renderer::BedToBed(r) => r.input_layout(),
            Renderer::HoaToBed(r) => r.input_layout(),
            Renderer::Binaural(r) => r.input_layout(),
        }
    }

    fn output_layout(&self) -> SpeakerLayout {
        match self {
            Renderer::Passthrough(r) => r.output_layout(),
            Renderer::BedToBed(r) => r.output_layout(),
            Renderer::HoaToBed(r) => r.output_layout(),
            Renderer::Binaural(r) => r.output_layout(),
        }
    }

    fn prepare(&mut self, max_frames: usize) {
        match self {
            Renderer::Passthrough(r) => r.prepare(max_frames),
            Renderer::BedToBed(r) => r.prepare(max_frames),
            Renderer::HoaToBed(r) => r.prepare(max_frames),
            Renderer::Binaural(r) => r.prepare(max_frames),
        }
    }

    #[inline]
    fn render(&mut self, input: &AudioBuffer, output: &mut AudioBuffer) {
        match self {
            Renderer::Passthrough(r) => r.render(input, output),
            Renderer::BedToBed(r) => r.render(input, output),
            Renderer::HoaToBed(r) => r.render(input, output),
            Renderer::Binaural(r) => r.render(input, output),
        }
    }
}

impl From<PassthroughRenderer> for Renderer {
    fn from(r: PassthroughRenderer) -> Self {
        Renderer::Passthrough(r)
    }
}

impl From<BedToBedRenderer> for Renderer {
    fn from(r: BedToBedRenderer) -> Self {
        Renderer::BedToBed(r)
    }
}

impl From<HoaToBedRenderer> for Renderer {
    fn from(r: HoaToBedRenderer) -> Self {
        Renderer::HoaToBed(r)
    }
}

impl From<BinauralRenderer> for Renderer {
    fn from(r: BinauralRenderer) -> Self {
        Renderer::Binaural(r)
    }
}

/// Debug-build shape check shared by every renderer.
#[inline]
pub(crate) fn debug_assert_shapes(
    input: &AudioBuffer,
    output: &AudioBuffer,
    num_in: usize,
    num_out: usize,
) {
    debug_assert_eq!(input.channels(), num_in, "input channel count");
    debug_assert_eq!(output.channels(), num_out, "output channel count");
    debug_assert_eq!(input.frames(), output.frames(), "frame count");
}
