//! Render configuration.

use serde::{Deserialize, Serialize};

use crate::layout::SpeakerLayout;
use crate::{Error, Result};

pub const MIN_SAMPLE_RATE: u32 = 8_000;
pub const MAX_SAMPLE_RATE: u32 = 384_000;
pub const MAX_BLOCK_SIZE: usize = 8192;

/// Parameters fixed for the lifetime of a set of renderers.
///
/// A change to any field means renderers are rebuilt outside the audio callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub sample_rate: u32,
    /// Largest block the host will pass to `render`.
    pub block_size: usize,
    pub output_layout: SpeakerLayout,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            block_size: 512,
            output_layout: SpeakerLayout::Stereo,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range ({MIN_SAMPLE_RATE}-{MAX_SAMPLE_RATE} Hz)",
                self.sample_rate
            )));
        }
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(Error::InvalidConfig(format!(
                "block_size {} out of range (1-{MAX_BLOCK_SIZE})",
                self.block_size
            )));
        }
        Ok(())
    }
}
