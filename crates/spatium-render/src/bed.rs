//! Bed-to-bed transcoding through the static gain table.
//!
//! Expanded inputs are first scattered into a zeroed buffer shaped like their base
//! layout; expanded outputs are gathered from the base layout's columns. Both are
//! folded into the matrix or the scatter map at construction so `render` is a
//! single dense multiply.

use std::borrow::Cow;

use spatium_core::{get_matrix, AudioBuffer, SpeakerLayout};

use crate::renderer::{debug_assert_shapes, Render};
use crate::{Error, Result};

/// Linear transcode between two channel-based layouts.
#[derive(Debug, Clone)]
pub struct BedToBedRenderer {
    input: SpeakerLayout,
    output: SpeakerLayout,
    matrix: Cow<'static, [f32]>,
    /// Channels of the input's base layout.
    num_ch_in: usize,
    num_ch_out: usize,
    /// `(base slot, source channel)` pairs for expanded inputs.
    scatter: Option<Box<[(usize, usize)]>>,
    scratch: AudioBuffer,
}

impl BedToBedRenderer {
    /// Resolves the transcode from `input` to `output`.
    ///
    /// Returns `Ok(None)` when the layouts are identical and no rendering is needed.
    pub fn new(input: SpeakerLayout, output: SpeakerLayout) -> Result<Option<Self>> {
        if input == output {
            return Ok(None);
        }
        if !input.is_channel_based() || !output.is_channel_based() {
            return Err(Error::UnsupportedTarget { input, output });
        }

        let base = input.resolved_base();
        let matrix = mix_matrix(base, output)?;
        let scatter = input
            .is_expanded()
            .then(|| input.channel_map().collect::<Box<[_]>>());

        tracing::debug!(
            "Bed renderer {} -> {} (base {}, scatter: {})",
            input,
            output,
            base,
            scatter.is_some()
        );

        Ok(Some(Self {
            input,
            output,
            matrix,
            num_ch_in: base.channel_count(),
            num_ch_out: output.channel_count(),
            scatter,
            scratch: AudioBuffer::default(),
        }))
    }

    /// Input-major gains, `num_ch_in × num_ch_out`.
    pub fn matrix(&self) -> &[f32] {
        &self.matrix
    }

    pub fn num_ch_in(&self) -> usize {
        self.num_ch_in
    }

    pub fn num_ch_out(&self) -> usize {
        self.num_ch_out
    }

    pub fn has_scatter(&self) -> bool {
        self.scatter.is_some()
    }
}

impl Render for BedToBedRenderer {
    fn input_layout(&self) -> SpeakerLayout {
        self.input
    }

    fn output_layout(&self) -> SpeakerLayout {
        self.output
    }

    fn prepare(&mut self, max_frames: usize) {
        if self.scatter.is_some() {
            self.scratch.ensure_size(self.num_ch_in, max_frames);
        }
    }

    fn render(&mut self, input: &AudioBuffer, output: &mut AudioBuffer) {
        debug_assert_shapes(input, output, self.input.channel_count(), self.num_ch_out);

        let Some(scatter) = &self.scatter else {
            AudioBuffer::apply_matrix(input, &self.matrix, output);
            return;
        };

        self.scratch.ensure_size(self.num_ch_in, input.frames());
        self.scratch.clear();
        for &(dst, src) in scatter.iter() {
            self.scratch.channel_mut(dst).copy_from_slice(input.channel(src));
        }
        AudioBuffer::apply_matrix(&self.scratch, &self.matrix, output);
    }
}

/// Gains taking a bed `input` to the channel-based `output`.
///
/// Looks the pair up in the gain table. When `output` is expanded, the matrix to its
/// base layout is used and reduced to the output's own columns. A bed mixed into a
/// subset of itself reduces the identity.
pub(crate) fn mix_matrix(input: SpeakerLayout, output: SpeakerLayout) -> Result<Cow<'static, [f32]>> {
    debug_assert!(input.is_bed());
    let out_base = output.resolved_base();
    let num_in = input.channel_count();
    let num_base = out_base.channel_count();

    let base_gains: Cow<'static, [f32]> = if input == out_base {
        let mut identity = vec![0.0f32; num_in * num_in];
        for i in 0..num_in {
            identity[i * num_in + i] = 1.0;
        }
        Cow::Owned(identity)
    } else {
        let entry = get_matrix(input, out_base).ok_or(Error::NoGainMatrix { input, output })?;
        Cow::Borrowed(entry.gains())
    };

    if !output.is_expanded() {
        return Ok(base_gains);
    }

    let columns: Vec<usize> = output.channel_map().map(|(base_slot, _)| base_slot).collect();
    let num_out = columns.len();
    let mut gathered = vec![0.0f32; num_in * num_out];
    for i in 0..num_in {
        for (o, &col) in columns.iter().enumerate() {
            gathered[i * num_out + o] = base_gains[i * num_base + col];
        }
    }
    Ok(Cow::Owned(gathered))
}
