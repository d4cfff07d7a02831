//! Loudness hand-off for rendered output (EBU R128 / ITU-R BS.1770).
//!
//! Rendered buffers are handed to `ebur128` as-is. LFE channels are excluded from
//! the measurement.

use ebur128::{Channel, EbuR128, Mode};

use crate::buffer::AudioBuffer;
use crate::layout::SpeakerLayout;
use crate::{Error, Result};

/// Loudness statistics for one rendered buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoudnessStats {
    /// Integrated loudness in LUFS.
    pub integrated_lufs: f64,
    /// Maximum true peak in dBTP.
    pub true_peak_dbtp: f64,
    /// Loudness range in LU.
    pub loudness_range_lu: f64,
}

/// Measures a rendered buffer laid out as `layout`.
pub fn measure_loudness(
    buffer: &AudioBuffer,
    layout: SpeakerLayout,
    sample_rate: u32,
) -> Result<LoudnessStats> {
    if buffer.channels() != layout.channel_count() {
        return Err(Error::ChannelMismatch {
            expected: layout.channel_count(),
            got: buffer.channels(),
        });
    }

    let channels = buffer.channels() as u32;
    let mut meter = EbuR128::new(channels, sample_rate, Mode::I | Mode::LRA | Mode::TRUE_PEAK)
        .map_err(|e| Error::Loudness(format!("{e:?}")))?;

    for (idx, ch) in layout.channel_order().iter().enumerate() {
        if ch.is_lfe() {
            meter
                .set_channel(idx as u32, Channel::Unused)
                .map_err(|e| Error::Loudness(format!("{e:?}")))?;
        }
    }

    if buffer.frames() > 0 {
        let planes: Vec<&[f32]> = (0..buffer.channels()).map(|ch| buffer.channel(ch)).collect();
        meter
            .add_frames_planar_f32(&planes)
            .map_err(|e| Error::Loudness(format!("{e:?}")))?;
    }

    let integrated_lufs = meter.loudness_global().unwrap_or(-70.0);
    let loudness_range_lu = meter.loudness_range().unwrap_or(0.0);

    let true_peak_linear = (0..channels)
        .filter_map(|ch| meter.true_peak(ch).ok())
        .fold(0.0f64, f64::max);
    let true_peak_dbtp = if true_peak_linear > 0.0 {
        20.0 * true_peak_linear.log10()
    } else {
        -144.0
    };

    Ok(LoudnessStats {
        integrated_lufs,
        true_peak_dbtp,
        loudness_range_lu,
    })
}
