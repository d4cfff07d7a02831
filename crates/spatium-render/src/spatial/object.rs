//! Point-source object rendering onto discrete loudspeaker configurations.
//!
//! Gains come from VBAP over the configuration's loudspeakers (LFE slots excluded),
//! then get normalized to unit power and attenuated by distance.

use std::fmt;

use spatium_core::{PannerPosition, SpeakerLayout};
use vbap::VBAPanner;

use super::distance_gain;
use crate::{Error, Result};

/// Loudspeaker configurations the object renderer can render into directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectOutputConfig {
    Mono,
    Stereo,
    Surround3_1_2,
    Surround5_1,
    Surround5_1_2,
    Surround5_1_4,
    Surround7_1,
    Surround7_1_2,
    Surround7_1_4,
    Surround22_2,
}

impl ObjectOutputConfig {
    /// Channel ordering of this configuration.
    pub fn layout(self) -> SpeakerLayout {
        match self {
            Self::Mono => SpeakerLayout::Mono,
            Self::Stereo => SpeakerLayout::Stereo,
            Self::Surround3_1_2 => SpeakerLayout::Surround3_1_2,
            Self::Surround5_1 => SpeakerLayout::Surround5_1,
            Self::Surround5_1_2 => SpeakerLayout::Surround5_1_2,
            Self::Surround5_1_4 => SpeakerLayout::Surround5_1_4,
            Self::Surround7_1 => SpeakerLayout::Surround7_1,
            Self::Surround7_1_2 => SpeakerLayout::Surround7_1_2,
            Self::Surround7_1_4 => SpeakerLayout::Surround7_1_4,
            Self::Surround22_2 => SpeakerLayout::Surround22_2,
        }
    }

    /// Direct configuration for a bed layout, if there is one.
    pub fn from_layout(layout: SpeakerLayout) -> Option<Self> {
        let config = match layout {
            SpeakerLayout::Mono => Self::Mono,
            SpeakerLayout::Stereo => Self::Stereo,
            SpeakerLayout::Surround3_1_2 => Self::Surround3_1_2,
            SpeakerLayout::Surround5_1 => Self::Surround5_1,
            SpeakerLayout::Surround5_1_2 => Self::Surround5_1_2,
            SpeakerLayout::Surround5_1_4 => Self::Surround5_1_4,
            SpeakerLayout::Surround7_1 => Self::Surround7_1,
            SpeakerLayout::Surround7_1_2 => Self::Surround7_1_2,
            SpeakerLayout::Surround7_1_4 => Self::Surround7_1_4,
            SpeakerLayout::Surround22_2 => Self::Surround22_2,
            _ => return None,
        };
        Some(config)
    }

    #[inline]
    pub fn channel_count(self) -> usize {
        self.layout().channel_count()
    }
}

/// VBAP panner bound to one [`ObjectOutputConfig`].
///
/// Built once per panner; `point_source_gains` writes one gain per slot of the
/// configuration's layout.
pub struct ObjectRenderer {
    config: ObjectOutputConfig,
    /// `None` for mono, where the single speaker always takes the whole source.
    vbap: Option<VBAPanner>,
    /// Layout slot of each VBAP speaker, in the order they were added.
    slots: Box<[usize]>,
}

impl ObjectRenderer {
    pub fn new(config: ObjectOutputConfig) -> Result<Self> {
        let layout = config.layout();
        let (slots, directions): (Vec<usize>, Vec<(f32, f32)>) = layout
            .channel_order()
            .iter()
            .enumerate()
            .filter_map(|(slot, ch)| ch.direction().map(|dir| (slot, dir)))
            .unzip();

        let vbap = if directions.len() < 2 {
            None
        } else {
            let mut builder = VBAPanner::builder();
            for &(az, el) in &directions {
                builder = builder.add_speaker(az as f64, el as f64);
            }
            let panner = builder.build().map_err(|e| Error::InvalidSpeakerConfig {
                layout,
                reason: format!("{e:?}"),
            })?;
            Some(panner)
        };

        tracing::debug!("Object renderer for {} ({} speakers)", layout, slots.len());
        Ok(Self {
            config,
            vbap,
            slots: slots.into_boxed_slice(),
        })
    }

    pub fn config(&self) -> ObjectOutputConfig {
        self.config
    }

    pub fn channel_count(&self) -> usize {
        self.config.channel_count()
    }

    /// Speaker gains for a point source, unit power before distance attenuation.
    ///
    /// LFE slots stay silent. When VBAP leaves every loudspeaker silent (a source
    /// outside the speakers' coverage) the signal is spread over all of them at
    /// equal power.
    pub fn point_source_gains(&self, position: &PannerPosition, out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.channel_count());
        out.fill(0.0);

        match &self.vbap {
            None => {
                if let Some(&slot) = self.slots.first() {
                    out[slot] = 1.0;
                }
            }
            Some(vbap) => {
                let gains = vbap.compute_gains(position.azimuth as f64, position.elevation as f64);
                for (&slot, &g) in self.slots.iter().zip(gains.iter()) {
                    let g = g as f32;
                    out[slot] = if g.is_finite() { g.max(0.0) } else { 0.0 };
                }
            }
        }

        let mut power: f32 = out.iter().map(|g| g * g).sum();
        if power <= f32::EPSILON {
            let even = (1.0 / self.slots.len().max(1) as f32).sqrt();
            for &slot in self.slots.iter() {
                out[slot] = even;
            }
            power = 1.0;
        }

        let scale = distance_gain(position.distance) / power.sqrt();
        for gain in out.iter_mut() {
            *gain *= scale;
        }
    }
}

impl fmt::Debug for ObjectRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRenderer")
            .field("config", &self.config)
            .field("speakers", &self.slots.len())
            .finish()
    }
}
