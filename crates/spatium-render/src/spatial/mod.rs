//! Spatial-math routines the renderers and panners call into.
//!
//! Everything here works on frame-major [`InterleavedBuffer`]s plus plain metadata
//! (positions, orders, layout names). Callers own the transposition to and from the
//! host's planar buffers.

pub mod decoder;
pub mod encoder;
pub mod head;
pub mod object;
pub mod sh;

use spatium_core::InterleavedBuffer;

/// Attenuation for a source at `distance` metres. Unity inside the 1 m reference sphere.
#[inline]
pub fn distance_gain(distance: f32) -> f32 {
    1.0 / distance.max(1.0)
}

/// Pans every input channel through one shared gain vector.
///
/// Gains glide linearly from `from` to `to` across the block, reaching `to` on the
/// last frame. The output is overwritten.
pub fn pan_block(
    input: &InterleavedBuffer,
    from: &[f32],
    to: &[f32],
    output: &mut InterleavedBuffer,
) {
    let frames = input.frames();
    let num_out = output.channels();
    debug_assert_eq!(from.len(), num_out);
    debug_assert_eq!(to.len(), num_out);
    debug_assert_eq!(output.frames(), frames);

    let ramping = from != to;
    for f in 0..frames {
        let sum: f32 = input.frame(f).iter().sum();
        let out = output.frame_mut(f);
        if ramping {
            let t = (f + 1) as f32 / frames as f32;
            for ((o, &a), &b) in out.iter_mut().zip(from).zip(to) {
                *o = sum * (a + (b - a) * t);
            }
        } else {
            for (o, &g) in out.iter_mut().zip(to) {
                *o = sum * g;
            }
        }
    }
}
