//! Precomputed gain matrices for bed-to-bed transcoding.
//!
//! One matrix exists for every ordered pair of distinct bed layouts. Matrices are
//! stored input-major, output-minor: the gain from input channel `i` to output
//! channel `o` lives at `gains[i * num_outputs + o]`.
//!
//! The table is derived once per process from per-channel fold rules and is
//! read-only afterwards. Lookup is a binary search on the `(input, output)` key.

use std::sync::OnceLock;

use crate::channel::ChannelType;
use crate::layout::SpeakerLayout;

const H: f32 = core::f32::consts::FRAC_1_SQRT_2;

/// Guards against a malformed rule graph; real chains are at most four hops.
const MAX_FOLD_DEPTH: usize = 8;

/// A linear transcode from one bed layout to another.
#[derive(Debug, Clone)]
pub struct GainMatrix {
    input: SpeakerLayout,
    output: SpeakerLayout,
    gains: Box<[f32]>,
}

impl GainMatrix {
    #[inline]
    pub fn input(&self) -> SpeakerLayout {
        self.input
    }

    #[inline]
    pub fn output(&self) -> SpeakerLayout {
        self.output
    }

    #[inline]
    pub fn num_inputs(&self) -> usize {
        self.input.channel_count()
    }

    #[inline]
    pub fn num_outputs(&self) -> usize {
        self.output.channel_count()
    }

    /// Flattened input-major gains.
    #[inline]
    pub fn gains(&self) -> &[f32] {
        &self.gains
    }

    /// Gain from input channel `input` to output channel `output`.
    #[inline]
    pub fn gain(&self, input: usize, output: usize) -> f32 {
        self.gains[input * self.num_outputs() + output]
    }

    /// Row of gains fed by a single input channel.
    pub fn row(&self, input: usize) -> &[f32] {
        let n = self.num_outputs();
        &self.gains[input * n..(input + 1) * n]
    }
}

/// Looks up the matrix transcoding `input` into `output`.
///
/// Returns `None` when no direct transcode exists: identical layouts, and any pair
/// that is not bed-to-bed (scene, binaural or expanded layouts are never keys).
///
/// The first call builds the table. Call [`init_gain_table`] from a non-realtime
/// thread first; renderers only look matrices up while being constructed.
pub fn get_matrix(input: SpeakerLayout, output: SpeakerLayout) -> Option<&'static GainMatrix> {
    let table = table();
    table
        .binary_search_by(|entry| (entry.input, entry.output).cmp(&(input, output)))
        .ok()
        .map(|idx| &table[idx])
}

/// Builds the table if it has not been built yet. Allocates; keep off the audio thread.
pub fn init_gain_table() {
    table();
}

/// `true` once the table exists and lookups no longer allocate.
pub fn is_gain_table_built() -> bool {
    TABLE.get().is_some()
}

/// Number of matrices in the table.
pub fn matrix_count() -> usize {
    table().len()
}

static TABLE: OnceLock<Vec<GainMatrix>> = OnceLock::new();

fn table() -> &'static [GainMatrix] {
    TABLE.get_or_init(build_table)
}

fn build_table() -> Vec<GainMatrix> {
    let mut table = Vec::with_capacity(SpeakerLayout::BEDS.len() * (SpeakerLayout::BEDS.len() - 1));
    for input in SpeakerLayout::BEDS {
        for output in SpeakerLayout::BEDS {
            if input != output {
                table.push(derive_matrix(input, output));
            }
        }
    }
    table.sort_by_key(|entry| (entry.input, entry.output));
    tracing::debug!("Built gain table with {} matrices", table.len());
    table
}

fn derive_matrix(input: SpeakerLayout, output: SpeakerLayout) -> GainMatrix {
    let out_order = output.channel_order();
    let num_out = out_order.len();
    let mut gains = vec![0.0f32; input.channel_count() * num_out].into_boxed_slice();

    for (i, &channel) in input.channel_order().iter().enumerate() {
        let row = &mut gains[i * num_out..(i + 1) * num_out];
        fold(channel, 1.0, out_order, row, 0);
    }

    GainMatrix {
        input,
        output,
        gains,
    }
}

/// Accumulates the contribution of `channel` (scaled by `gain`) into `row`.
fn fold(channel: ChannelType, gain: f32, out: &[ChannelType], row: &mut [f32], depth: usize) {
    if let Some(idx) = out.iter().position(|&c| c == channel) {
        row[idx] += gain;
        return;
    }
    if depth >= MAX_FOLD_DEPTH {
        return;
    }

    let alternatives = fold_rules(channel);
    let Some(last) = alternatives.last() else {
        // No substitute: the channel is dropped (LFE into an LFE-less bed).
        return;
    };

    let chosen = alternatives
        .iter()
        .find(|alt| alt.iter().all(|(target, _)| out.contains(target)))
        .unwrap_or(last);

    for &(target, g) in chosen.iter() {
        fold(target, gain * g, out, row, depth + 1);
    }
}

/// Substitutes for a channel missing from the output layout.
///
/// Alternatives are tried in order; the first one whose targets all exist in the
/// output wins. When none fits, the last alternative is folded recursively.
fn fold_rules(channel: ChannelType) -> &'static [&'static [(ChannelType, f32)]] {
    use ChannelType::*;
    match channel {
        Mono => &[&[(FrontCentre, 1.0)], &[(FrontLeft, H), (FrontRight, H)]],
        FrontLeft => &[&[(Mono, H)]],
        FrontRight => &[&[(Mono, H)]],
        FrontCentre => &[&[(FrontLeft, H), (FrontRight, H)], &[(Mono, 1.0)]],
        Lfe1 => &[],
        Lfe2 => &[&[(Lfe1, 1.0)]],

        SurroundLeft => &[
            &[(SideLeft, H), (BackLeft, H)],
            &[(SideLeft, 1.0)],
            &[(FrontLeft, H)],
        ],
        SurroundRight => &[
            &[(SideRight, H), (BackRight, H)],
            &[(SideRight, 1.0)],
            &[(FrontRight, H)],
        ],
        SideLeft => &[&[(SurroundLeft, 1.0)], &[(FrontLeft, H)]],
        SideRight => &[&[(SurroundRight, 1.0)], &[(FrontRight, H)]],
        BackLeft => &[&[(SurroundLeft, 1.0)], &[(SideLeft, 1.0)], &[(FrontLeft, H)]],
        BackRight => &[
            &[(SurroundRight, 1.0)],
            &[(SideRight, 1.0)],
            &[(FrontRight, H)],
        ],
        BackCentre => &[
            &[(BackLeft, H), (BackRight, H)],
            &[(SurroundLeft, H), (SurroundRight, H)],
        ],
        WideLeft => &[
            &[(FrontLeft, H), (SideLeft, H)],
            &[(FrontLeft, H), (SurroundLeft, H)],
            &[(FrontLeft, 1.0)],
        ],
        WideRight => &[
            &[(FrontRight, H), (SideRight, H)],
            &[(FrontRight, H), (SurroundRight, H)],
            &[(FrontRight, 1.0)],
        ],

        TopFrontLeft => &[&[(FrontLeft, H)]],
        TopFrontRight => &[&[(FrontRight, H)]],
        TopBackLeft => &[
            &[(TopFrontLeft, H)],
            &[(SurroundLeft, H)],
            &[(BackLeft, H)],
        ],
        TopBackRight => &[
            &[(TopFrontRight, H)],
            &[(SurroundRight, H)],
            &[(BackRight, H)],
        ],
        TopSideLeft => &[
            &[(TopFrontLeft, H), (TopBackLeft, H)],
            &[(TopFrontLeft, 1.0)],
            &[(SideLeft, H)],
        ],
        TopSideRight => &[
            &[(TopFrontRight, H), (TopBackRight, H)],
            &[(TopFrontRight, 1.0)],
            &[(SideRight, H)],
        ],
        TopFrontCentre => &[
            &[(TopFrontLeft, H), (TopFrontRight, H)],
            &[(FrontCentre, H)],
        ],
        TopCentre => &[
            &[(TopSideLeft, H), (TopSideRight, H)],
            &[
                (TopFrontLeft, 0.5),
                (TopFrontRight, 0.5),
                (TopBackLeft, 0.5),
                (TopBackRight, 0.5),
            ],
            &[(TopFrontLeft, H), (TopFrontRight, H)],
            &[(FrontCentre, H)],
        ],
        TopBackCentre => &[
            &[(TopBackLeft, H), (TopBackRight, H)],
            &[(TopFrontLeft, H), (TopFrontRight, H)],
            &[(BackCentre, H)],
        ],
        BottomFrontCentre => &[&[(FrontCentre, 1.0)]],
        BottomFrontLeft => &[&[(FrontLeft, 1.0)]],
        BottomFrontRight => &[&[(FrontRight, 1.0)]],

        BinauralLeft | BinauralRight | Ambisonic(_) => &[],
    }
}
