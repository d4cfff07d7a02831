//! Object panners: place a source at a movable position in a scene, on headphones,
//! or across loudspeakers.
//!
//! Positions are published from the control thread through a [`PositionHandle`].
//! Each `process` call polls the shared cell without blocking and, when a new
//! position arrived, runs the panner's `position_updated` hook before rendering.
//! Gain changes glide across the block that picks them up.

mod ambisonic;
mod binaural;
mod object;

pub use ambisonic::AmbisonicPanner;
pub use binaural::BinauralPanner;
pub use object::ObjectPanner;

use std::sync::Arc;

use spatium_core::{
    AudioBuffer, InterleavedBuffer, PannerPosition, PositionCell, PositionHandle, SpeakerLayout,
};

use crate::Result;

/// Shared panner contract.
pub trait Pan {
    fn input_layout(&self) -> SpeakerLayout;

    fn panned_layout(&self) -> SpeakerLayout;

    /// Control-thread handle for moving the source.
    fn position_handle(&self) -> PositionHandle;

    /// Pans one block of `input` into `output` (overwritten).
    fn process(&mut self, input: &AudioBuffer, output: &mut AudioBuffer);
}

/// Every panner [`create_panner`] can hand out.
#[derive(Debug)]
pub enum Panner {
    Ambisonic(AmbisonicPanner),
    Binaural(BinauralPanner),
    Object(ObjectPanner),
}

impl Pan for Panner {
    fn input_layout(&self) -> SpeakerLayout {
        match self {
            Panner::Ambisonic(p) => p.input_layout(),
            Panner::Binaural(p) => p.input_layout(),
            Panner::Object(p) => p.input_layout(),
        }
    }

    fn panned_layout(&self) -> SpeakerLayout {
        match self {
            Panner::Ambisonic(p) => p.panned_layout(),
            Panner::Binaural(p) => p.panned_layout(),
            Panner::Object(p) => p.panned_layout(),
        }
    }

    fn position_handle(&self) -> PositionHandle {
        match self {
            Panner::Ambisonic(p) => p.position_handle(),
            Panner::Binaural(p) => p.position_handle(),
            Panner::Object(p) => p.position_handle(),
        }
    }

    #[inline]
    fn process(&mut self, input: &AudioBuffer, output: &mut AudioBuffer) {
        match self {
            Panner::Ambisonic(p) => p.process(input, output),
            Panner::Binaural(p) => p.process(input, output),
            Panner::Object(p) => p.process(input, output),
        }
    }
}

/// Builds the panner for `panned`: ambisonic for scenes, binaural for headphones,
/// object panning for beds and expanded layouts.
pub fn create_panner(
    input: SpeakerLayout,
    panned: SpeakerLayout,
    block_size: usize,
    sample_rate: u32,
) -> Result<Panner> {
    let panner = if panned.is_ambisonic() {
        Panner::Ambisonic(AmbisonicPanner::new(input, panned, block_size, sample_rate)?)
    } else if panned.is_binaural() {
        Panner::Binaural(BinauralPanner::new(input, panned, block_size, sample_rate)?)
    } else {
        Panner::Object(ObjectPanner::new(input, panned, block_size, sample_rate)?)
    };
    tracing::debug!("Created panner {} -> {}", input, panned);
    Ok(panner)
}

/// State every panner carries: layouts, the position cell and the interleaved
/// staging buffers used to talk to the spatial routines.
#[derive(Debug)]
pub(crate) struct PannerCore {
    input: SpeakerLayout,
    panned: SpeakerLayout,
    cell: Arc<PositionCell>,
    position: PannerPosition,
    source: InterleavedBuffer,
    rendered: InterleavedBuffer,
}

impl PannerCore {
    /// `source_channels` and `rendered_channels` size the interleaved staging buffers.
    pub(crate) fn new(
        input: SpeakerLayout,
        panned: SpeakerLayout,
        block_size: usize,
        source_channels: usize,
        rendered_channels: usize,
    ) -> Self {
        let position = PannerPosition::default();
        Self {
            input,
            panned,
            cell: Arc::new(PositionCell::new(position)),
            position,
            source: InterleavedBuffer::new(source_channels, block_size),
            rendered: InterleavedBuffer::new(rendered_channels, block_size),
        }
    }

    pub(crate) fn handle(&self) -> PositionHandle {
        PositionHandle::new(Arc::clone(&self.cell))
    }

    /// Picks up a newly published position, if any.
    #[inline]
    pub(crate) fn poll(&mut self) -> Option<PannerPosition> {
        let position = self.cell.poll()?;
        self.position = position;
        Some(position)
    }

    pub(crate) fn position(&self) -> PannerPosition {
        self.position
    }

    /// Copies the caller's planar block into the interleaved source buffer.
    ///
    /// With a single-channel source every input channel is summed into it.
    pub(crate) fn stage_input(&mut self, input: &AudioBuffer) {
        debug_assert_eq!(input.channels(), self.input.channel_count());
        let frames = input.frames();
        self.source.ensure_frames(frames);
        self.rendered.ensure_frames(frames);
        if self.source.channels() == input.channels() {
            self.source.copy_from_planar(input);
            return;
        }
        debug_assert_eq!(self.source.channels(), 1);
        let mono = self.source.as_mut_slice();
        mono.fill(0.0);
        for ch in 0..input.channels() {
            for (m, &s) in mono.iter_mut().zip(input.channel(ch)) {
                *m += s;
            }
        }
    }
}
