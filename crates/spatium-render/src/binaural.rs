//! Headphone rendering of beds and scenes through virtual loudspeakers.

use spatium_core::{AudioBuffer, InterleavedBuffer, SpeakerLayout};

use crate::renderer::{debug_assert_shapes, Render};
use crate::spatial::head::HeadModel;
use crate::spatial::{decoder, sh};
use crate::{Error, Result};

/// LFE feeds both ears at -6 dB.
const LFE_GAIN: f32 = 0.5;

/// How the input reaches the virtual loudspeaker feed.
#[derive(Debug, Clone)]
enum Feed {
    /// Input is already a bed; its channels are the speaker feeds.
    Direct,
    /// Expanded input scattered into its base bed.
    Scatter(Box<[(usize, usize)]>),
    /// Scene decoded with a cached matrix.
    Decode(Box<[f32]>),
}

/// Renders a channel-based or ambisonic input to a binaural pair.
#[derive(Debug, Clone)]
pub struct BinauralRenderer {
    input: SpeakerLayout,
    virtual_layout: SpeakerLayout,
    feed: Feed,
    /// Virtual speaker slot of each head-model source.
    sources: Box<[usize]>,
    lfe_slots: Box<[usize]>,
    head: HeadModel,
    speakers: AudioBuffer,
    source_frames: InterleavedBuffer,
    ear_frames: InterleavedBuffer,
}

impl BinauralRenderer {
    pub fn new(input: SpeakerLayout, block_size: usize, sample_rate: u32) -> Result<Self> {
        let (virtual_layout, feed) = if let Some(order) = input.ambisonic_order() {
            let rig = if order <= 2 {
                SpeakerLayout::Surround7_1_4
            } else {
                SpeakerLayout::Surround22_2
            };
            let (orders, degrees): (Vec<usize>, Vec<i32>) =
                (0..input.channel_count()).map(sh::acn_order_degree).unzip();
            let matrix = decoder::decode_matrix_for(&orders, &degrees, rig);
            (rig, Feed::Decode(matrix.into_boxed_slice()))
        } else if input.is_expanded() {
            (
                input.base_layout(),
                Feed::Scatter(input.channel_map().collect()),
            )
        } else if input.is_bed() {
            (input, Feed::Direct)
        } else {
            return Err(Error::UnsupportedTarget {
                input,
                output: SpeakerLayout::Binaural,
            });
        };

        let order = virtual_layout.channel_order();
        let sources: Box<[usize]> = order
            .iter()
            .enumerate()
            .filter(|(_, ch)| ch.direction().is_some())
            .map(|(slot, _)| slot)
            .collect();
        let lfe_slots: Box<[usize]> = order
            .iter()
            .enumerate()
            .filter(|(_, ch)| ch.is_lfe())
            .map(|(slot, _)| slot)
            .collect();

        let mut head = HeadModel::new(sources.len(), sample_rate as f32);
        for (index, &slot) in sources.iter().enumerate() {
            if let Some((az, el)) = order[slot].direction() {
                head.place_source(index, az, el, 1.0);
            }
        }

        tracing::debug!(
            "Binaural renderer {} via {} ({} virtual speakers)",
            input,
            virtual_layout,
            sources.len()
        );

        let mut renderer = Self {
            input,
            virtual_layout,
            feed,
            sources,
            lfe_slots,
            head,
            speakers: AudioBuffer::default(),
            source_frames: InterleavedBuffer::default(),
            ear_frames: InterleavedBuffer::default(),
        };
        renderer.prepare(block_size);
        Ok(renderer)
    }

    /// Loudspeaker layout simulated over headphones.
    pub fn virtual_layout(&self) -> SpeakerLayout {
        self.virtual_layout
    }
}

impl Render for BinauralRenderer {
    fn input_layout(&self) -> SpeakerLayout {
        self.input
    }

    fn output_layout(&self) -> SpeakerLayout {
        SpeakerLayout::Binaural
    }

    fn prepare(&mut self, max_frames: usize) {
        if !matches!(self.feed, Feed::Direct) {
            self.speakers
                .ensure_size(self.virtual_layout.channel_count(), max_frames);
        }
        if self.source_frames.channels() != self.sources.len() {
            self.source_frames = InterleavedBuffer::new(self.sources.len(), max_frames);
        }
        if self.ear_frames.channels() != 2 {
            self.ear_frames = InterleavedBuffer::new(2, max_frames);
        }
        self.source_frames.ensure_frames(max_frames);
        self.ear_frames.ensure_frames(max_frames);
    }

    fn render(&mut self, input: &AudioBuffer, output: &mut AudioBuffer) {
        debug_assert_shapes(input, output, self.input.channel_count(), 2);
        let frames = input.frames();
        let num_virtual = self.virtual_layout.channel_count();

        match &self.feed {
            Feed::Direct => {}
            Feed::Scatter(map) => {
                self.speakers.ensure_size(num_virtual, frames);
                self.speakers.clear();
                for &(dst, src) in map.iter() {
                    self.speakers.channel_mut(dst).copy_from_slice(input.channel(src));
                }
            }
            Feed::Decode(matrix) => {
                self.speakers.ensure_size(num_virtual, frames);
                AudioBuffer::apply_matrix(input, matrix, &mut self.speakers);
            }
        }
        let speakers = match self.feed {
            Feed::Direct => input,
            _ => &self.speakers,
        };

        self.source_frames.ensure_frames(frames);
        self.ear_frames.ensure_frames(frames);
        let num_sources = self.sources.len();
        let interleaved = self.source_frames.as_mut_slice();
        for (k, &slot) in self.sources.iter().enumerate() {
            for (f, &s) in speakers.channel(slot).iter().enumerate() {
                interleaved[f * num_sources + k] = s;
            }
        }

        self.head.process(&self.source_frames, &mut self.ear_frames);
        self.ear_frames.copy_to_planar(output);

        for &slot in self.lfe_slots.iter() {
            let lfe = speakers.channel(slot);
            for ear in 0..2 {
                for (o, &s) in output.channel_mut(ear).iter_mut().zip(lfe) {
                    *o += s * LFE_GAIN;
                }
            }
        }
    }
}
