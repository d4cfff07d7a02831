//! Builder for configuring and constructing a `MixEngine`.

use spatium_core::{RenderConfig, SpeakerLayout};

use crate::{MixEngine, Result};

/// Unset fields fall back to [`RenderConfig::default`]: 48 kHz, 512-frame blocks,
/// stereo output.
///
/// # Example
///
/// ```
/// use spatium::prelude::*;
///
/// let engine = MixEngine::builder()
///     .sample_rate(48_000)
///     .block_size(256)
///     .output_layout(SpeakerLayout::Surround7_1_4)
///     .build()?;
///
/// assert_eq!(engine.output_layout(), SpeakerLayout::Surround7_1_4);
/// # Ok::<(), spatium::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MixEngineBuilder {
    config: RenderConfig,
}

impl MixEngineBuilder {
    /// Default: 48000
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Largest block passed to `render`. Default: 512
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.config.block_size = block_size;
        self
    }

    /// Default: stereo
    pub fn output_layout(mut self, layout: SpeakerLayout) -> Self {
        self.config.output_layout = layout;
        self
    }

    /// Replaces every setting at once, e.g. with a deserialized config.
    pub fn config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<MixEngine> {
        self.config.validate()?;
        Ok(MixEngine::from_config(self.config))
    }
}
