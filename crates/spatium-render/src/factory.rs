//! Picks the renderer for an (input, output) layout pair.

use spatium_core::SpeakerLayout;

use crate::bed::BedToBedRenderer;
use crate::binaural::BinauralRenderer;
use crate::hoa::HoaToBedRenderer;
use crate::passthrough::PassthroughRenderer;
use crate::renderer::{Render, Renderer};
use crate::{Error, Result};

/// Builds and prepares the renderer taking `input` to `output`.
///
/// Identical layouts get a passthrough. A binaural output takes the binaural path;
/// otherwise channel-based inputs are transcoded through the gain table and scenes
/// are decoded. Errors mean the stream cannot be rendered to this target and should
/// be left out of the mix.
pub fn create_renderer(
    input: SpeakerLayout,
    output: SpeakerLayout,
    block_size: usize,
    sample_rate: u32,
) -> Result<Renderer> {
    spatium_core::init_gain_table();
    let mut renderer: Renderer = if input == output {
        PassthroughRenderer::new(input).into()
    } else if output.is_binaural() {
        BinauralRenderer::new(input, block_size, sample_rate)?.into()
    } else if !output.is_channel_based() {
        return Err(Error::UnsupportedTarget { input, output });
    } else if input.is_channel_based() {
        match BedToBedRenderer::new(input, output)? {
            Some(bed) => bed.into(),
            None => PassthroughRenderer::new(input).into(),
        }
    } else if input.is_ambisonic() {
        HoaToBedRenderer::new(input, output)?.into()
    } else {
        return Err(Error::UnsupportedTarget { input, output });
    };

    renderer.prepare(block_size);
    tracing::debug!(
        "Created {} renderer {} -> {} (block {}, {} Hz)",
        renderer.kind(),
        input,
        output,
        block_size,
        sample_rate
    );
    Ok(renderer)
}
