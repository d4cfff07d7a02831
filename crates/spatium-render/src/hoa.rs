//! Ambisonic scene decoding into loudspeaker beds.
//!
//! The decoder only knows standardized loudspeaker systems. Targets without a
//! standard name are reached by decoding into a neighbouring standard layout and
//! mixing down through the gain table.

use std::borrow::Cow;

use spatium_core::{AudioBuffer, SpeakerLayout};

use crate::bed::mix_matrix;
use crate::renderer::{debug_assert_shapes, Render};
use crate::spatial::{decoder, sh};
use crate::{Error, Result};

/// Decodes a HOA scene into a bed or expanded layout.
#[derive(Debug, Clone)]
pub struct HoaToBedRenderer {
    input: SpeakerLayout,
    output: SpeakerLayout,
    intermediate: SpeakerLayout,
    orders: Box<[usize]>,
    degrees: Box<[i32]>,
    /// `num_ch_in × num_ch_inter`, input-major.
    decode: Box<[f32]>,
    /// `num_ch_inter × num_ch_out`, present when the intermediate differs from the output.
    mixdown: Option<Cow<'static, [f32]>>,
    scratch: AudioBuffer,
}

impl HoaToBedRenderer {
    pub fn new(input: SpeakerLayout, output: SpeakerLayout) -> Result<Self> {
        if !input.is_ambisonic() {
            return Err(Error::NotScene(input));
        }
        if !output.is_channel_based() {
            return Err(Error::UnsupportedTarget { input, output });
        }

        let (orders, degrees): (Vec<usize>, Vec<i32>) =
            (0..input.channel_count()).map(sh::acn_order_degree).unzip();

        let intermediate = intermediate_layout(output);
        let name = intermediate
            .itu_system_name()
            .ok_or_else(|| Error::UnknownDecodeLayout(intermediate.name().to_string()))?;
        let decode = decoder::decode_matrix(&orders, &degrees, name)?;

        let mixdown = if intermediate != output {
            Some(mix_matrix(intermediate, output)?)
        } else {
            None
        };

        tracing::debug!(
            "HOA renderer {} -> {} via {} ({})",
            input,
            output,
            intermediate,
            name
        );

        Ok(Self {
            input,
            output,
            intermediate,
            orders: orders.into_boxed_slice(),
            degrees: degrees.into_boxed_slice(),
            decode: decode.into_boxed_slice(),
            mixdown,
            scratch: AudioBuffer::default(),
        })
    }

    /// Layout the scene is decoded into before any mixdown.
    pub fn intermediate(&self) -> SpeakerLayout {
        self.intermediate
    }

    /// ACN order of each input channel.
    pub fn orders(&self) -> &[usize] {
        &self.orders
    }

    /// ACN degree of each input channel.
    pub fn degrees(&self) -> &[i32] {
        &self.degrees
    }

    pub fn decode_matrix(&self) -> &[f32] {
        &self.decode
    }
}

impl Render for HoaToBedRenderer {
    fn input_layout(&self) -> SpeakerLayout {
        self.input
    }

    fn output_layout(&self) -> SpeakerLayout {
        self.output
    }

    fn prepare(&mut self, max_frames: usize) {
        if self.mixdown.is_some() {
            self.scratch
                .ensure_size(self.intermediate.channel_count(), max_frames);
        }
    }

    fn render(&mut self, input: &AudioBuffer, output: &mut AudioBuffer) {
        debug_assert_shapes(
            input,
            output,
            self.input.channel_count(),
            self.output.channel_count(),
        );

        match &self.mixdown {
            None => AudioBuffer::apply_matrix(input, &self.decode, output),
            Some(mixdown) => {
                self.scratch
                    .ensure_size(self.intermediate.channel_count(), input.frames());
                AudioBuffer::apply_matrix(input, &self.decode, &mut self.scratch);
                AudioBuffer::apply_matrix(&self.scratch, mixdown, output);
            }
        }
    }
}

/// Standard layout a scene is decoded into on its way to `output`.
pub fn intermediate_layout(output: SpeakerLayout) -> SpeakerLayout {
    use SpeakerLayout::*;
    match output.resolved_base() {
        Mono => Stereo,
        Surround3_1_2 => Surround5_1_2,
        Surround7_1_2 => Surround7_1_4,
        Surround9_1_6 => Surround22_2,
        other => other,
    }
}
