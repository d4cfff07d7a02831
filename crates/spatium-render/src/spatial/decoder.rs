//! Ambisonic decode-matrix routine.
//!
//! Produces a sampling decoder with max-rE order weighting for a loudspeaker
//! layout named by its ITU-R BS.2051 system label. The routine is pure: the
//! result depends only on the channel metadata and the target name.

use spatium_core::SpeakerLayout;

use super::sh;
use crate::{Error, Result};

/// Decode matrix for the given ACN channel metadata, stored input-major
/// (`matrix[i * speakers + s]`).
///
/// `orders` and `degrees` describe the input channels one by one. LFE slots of the
/// target receive no signal. Fails when `system_name` is not a known layout label.
pub fn decode_matrix(orders: &[usize], degrees: &[i32], system_name: &str) -> Result<Vec<f32>> {
    debug_assert_eq!(orders.len(), degrees.len());
    let layout = SpeakerLayout::from_itu_system_name(system_name)
        .ok_or_else(|| Error::UnknownDecodeLayout(system_name.to_string()))?;
    Ok(decode_matrix_for(orders, degrees, layout))
}

/// Same as [`decode_matrix`], for a layout that is already resolved.
///
/// Also accepts layouts without a standard label (used for virtual speaker rigs).
pub fn decode_matrix_for(orders: &[usize], degrees: &[i32], layout: SpeakerLayout) -> Vec<f32> {
    let max_order = orders.iter().copied().max().unwrap_or(0);
    let weights = max_re_weights(max_order);
    let speakers = layout.channel_order();
    let num_out = speakers.len();
    let num_loudspeakers = speakers.iter().filter(|ch| ch.direction().is_some()).count();

    let mut matrix = vec![0.0f32; orders.len() * num_out];
    if num_loudspeakers == 0 {
        return matrix;
    }

    let mut harmonics = vec![0.0f32; (max_order + 1) * (max_order + 1)];
    for (s, ch) in speakers.iter().enumerate() {
        let Some((az, el)) = ch.direction() else {
            continue;
        };
        sh::evaluate(max_order, az.to_radians(), el.to_radians(), &mut harmonics);
        for (i, (&n, &m)) in orders.iter().zip(degrees).enumerate() {
            let scale = weights[n] * (2 * n + 1) as f32 / num_loudspeakers as f32;
            matrix[i * num_out + s] = scale * harmonics[sh::acn_index(n, m)];
        }
    }
    matrix
}

/// Per-order max-rE weights (Zotter & Frank approximation).
pub fn max_re_weights(order: usize) -> Vec<f32> {
    let theta = (137.9f64).to_radians() / (order as f64 + 1.51);
    let x = theta.cos();
    let mut weights = Vec::with_capacity(order + 1);
    let (mut p0, mut p1) = (1.0f64, x);
    for n in 0..=order {
        let w = match n {
            0 => p0,
            1 => p1,
            _ => {
                let p2 = ((2 * n - 1) as f64 * x * p1 - (n - 1) as f64 * p0) / n as f64;
                p0 = p1;
                p1 = p2;
                p2
            }
        };
        weights.push(w as f32);
    }
    weights
}
