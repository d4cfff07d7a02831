//! MixEngine: per-substream renderers summed into one output layout.

use std::fmt;
use std::sync::Arc;

use spatium_core::{AtomicFloat, AudioBuffer, RenderConfig, SmoothedValue, SpeakerLayout};
use spatium_render::{create_renderer, Render, Renderer};

use crate::{Error, MixEngineBuilder, Result};

/// Gain changes glide over this long.
const GAIN_SMOOTH_SECS: f32 = 0.01;

/// Stable identifier of a substream within one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubstreamId(u64);

impl fmt::Display for SubstreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Substream {
    id: SubstreamId,
    layout: SpeakerLayout,
    gain: Arc<AtomicFloat>,
    ramp: SmoothedValue,
    renderer: Option<Renderer>,
    /// Set once `prepare` has tried to build a renderer for the current output.
    resolved: bool,
}

/// Renders any number of substreams, each in its own layout, into one output layout.
///
/// Renderers are (re)built in [`prepare`](Self::prepare), which must run outside the
/// audio callback after substreams are added or the output layout changes.
/// Substreams without a renderer for the current output are left out of the mix.
///
/// # Example
///
/// ```
/// use spatium::prelude::*;
///
/// let mut engine = MixEngine::builder()
///     .block_size(64)
///     .output_layout(SpeakerLayout::Surround5_1)
///     .build()?;
///
/// let dialog = engine.add_substream(SpeakerLayout::Mono);
/// let ambience = engine.add_substream(SpeakerLayout::Hoa1);
/// engine.prepare();
///
/// let inputs = [AudioBuffer::new(1, 64), AudioBuffer::new(4, 64)];
/// let mut out = AudioBuffer::new(6, 64);
/// engine.render(&inputs, &mut out);
/// # let _ = (dialog, ambience);
/// # Ok::<(), spatium::Error>(())
/// ```
pub struct MixEngine {
    config: RenderConfig,
    substreams: Vec<Substream>,
    next_id: u64,
    scratch: AudioBuffer,
    ramp_buffer: Vec<f32>,
}

impl MixEngine {
    pub fn builder() -> MixEngineBuilder {
        MixEngineBuilder::default()
    }

    pub(crate) fn from_config(config: RenderConfig) -> Self {
        spatium_core::init_gain_table();
        let scratch = AudioBuffer::new(config.output_layout.channel_count(), config.block_size);
        let ramp_buffer = vec![0.0; config.block_size];
        tracing::debug!(
            "Mix engine: {} Hz, block {}, output {}",
            config.sample_rate,
            config.block_size,
            config.output_layout
        );
        Self {
            config,
            substreams: Vec::new(),
            next_id: 0,
            scratch,
            ramp_buffer,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    pub fn output_layout(&self) -> SpeakerLayout {
        self.config.output_layout
    }

    /// Registers a substream. It joins the mix after the next [`prepare`](Self::prepare).
    pub fn add_substream(&mut self, layout: SpeakerLayout) -> SubstreamId {
        let id = SubstreamId(self.next_id);
        self.next_id += 1;
        let smooth_samples = (GAIN_SMOOTH_SECS * self.config.sample_rate as f32) as u32;
        self.substreams.push(Substream {
            id,
            layout,
            gain: Arc::new(AtomicFloat::new(1.0)),
            ramp: SmoothedValue::new(1.0, smooth_samples),
            renderer: None,
            resolved: false,
        });
        id
    }

    /// Returns `false` if no such substream exists.
    pub fn remove_substream(&mut self, id: SubstreamId) -> bool {
        let before = self.substreams.len();
        self.substreams.retain(|s| s.id != id);
        self.substreams.len() != before
    }

    /// Substream ids in render order: `render` expects inputs in this order.
    pub fn substreams(&self) -> impl Iterator<Item = (SubstreamId, SpeakerLayout)> + '_ {
        self.substreams.iter().map(|s| (s.id, s.layout))
    }

    pub fn substream_count(&self) -> usize {
        self.substreams.len()
    }

    /// Switches the output layout. Every renderer is rebuilt on the next `prepare`.
    pub fn set_output_layout(&mut self, layout: SpeakerLayout) {
        if layout == self.config.output_layout {
            return;
        }
        self.config.output_layout = layout;
        for substream in &mut self.substreams {
            substream.renderer = None;
            substream.resolved = false;
        }
        tracing::debug!("Output layout changed to {}", layout);
    }

    /// Builds renderers for every substream that does not have one yet and sizes
    /// the mix buffers.
    ///
    /// Returns the number of substreams that will be rendered. Substreams whose
    /// layout cannot reach the output are logged and skipped.
    pub fn prepare(&mut self) -> usize {
        let output = self.config.output_layout;
        let (block_size, sample_rate) = (self.config.block_size, self.config.sample_rate);

        for substream in self.substreams.iter_mut().filter(|s| !s.resolved) {
            substream.resolved = true;
            match create_renderer(substream.layout, output, block_size, sample_rate) {
                Ok(renderer) => substream.renderer = Some(renderer),
                Err(e) => {
                    tracing::warn!(
                        "Substream {} ({}) excluded from {} mix: {}",
                        substream.id,
                        substream.layout,
                        output,
                        e
                    );
                    substream.renderer = None;
                }
            }
        }

        self.scratch.ensure_size(output.channel_count(), block_size);
        if self.ramp_buffer.len() < block_size {
            self.ramp_buffer.resize(block_size, 0.0);
        }
        self.substreams
            .iter()
            .filter(|s| s.renderer.is_some())
            .count()
    }

    /// `true` once `prepare` found a renderer for this substream.
    pub fn is_renderable(&self, id: SubstreamId) -> bool {
        self.find(id).is_some_and(|s| s.renderer.is_some())
    }

    /// Variant name of the substream's renderer, if it has one.
    pub fn renderer_kind(&self, id: SubstreamId) -> Option<&'static str> {
        self.find(id)?.renderer.as_ref().map(Renderer::kind)
    }

    /// Sets a substream's linear gain. Safe to call while another thread renders
    /// through a shared handle from [`gain_control`](Self::gain_control).
    pub fn set_gain(&self, id: SubstreamId, gain: f32) -> Result<()> {
        let substream = self.find(id).ok_or(Error::UnknownSubstream(id))?;
        substream.gain.set(gain);
        Ok(())
    }

    /// Shared gain cell for control from another thread.
    pub fn gain_control(&self, id: SubstreamId) -> Option<Arc<AtomicFloat>> {
        self.find(id).map(|s| Arc::clone(&s.gain))
    }

    /// Mixes one block of every renderable substream into `output` (overwritten).
    ///
    /// `inputs` holds one buffer per substream, in [`substreams`](Self::substreams)
    /// order, each shaped for its substream's layout. Does not allocate for blocks
    /// up to the configured block size.
    pub fn render(&mut self, inputs: &[AudioBuffer], output: &mut AudioBuffer) {
        debug_assert_eq!(inputs.len(), self.substreams.len(), "one input per substream");
        debug_assert_eq!(output.channels(), self.config.output_layout.channel_count());

        let frames = output.frames();
        output.clear();
        self.scratch
            .ensure_size(self.config.output_layout.channel_count(), frames);
        if self.ramp_buffer.len() < frames {
            self.ramp_buffer.resize(frames, 0.0);
        }

        for (substream, input) in self.substreams.iter_mut().zip(inputs) {
            let Some(renderer) = substream.renderer.as_mut() else {
                continue;
            };
            renderer.render(input, &mut self.scratch);

            substream.ramp.set_target(substream.gain.get());
            if substream.ramp.is_smoothing() {
                let ramp = &mut self.ramp_buffer[..frames];
                substream.ramp.process_block(ramp);
                for ch in 0..output.channels() {
                    let src = self.scratch.channel(ch);
                    for ((o, &s), &g) in output.channel_mut(ch).iter_mut().zip(src).zip(ramp.iter()) {
                        *o += s * g;
                    }
                }
            } else {
                output.add_from(&self.scratch, substream.ramp.current());
            }
        }
    }

    /// EBU R128 statistics of a rendered output buffer.
    #[cfg(feature = "loudness")]
    pub fn measure_loudness(&self, output: &AudioBuffer) -> Result<spatium_core::LoudnessStats> {
        Ok(spatium_core::measure_loudness(
            output,
            self.config.output_layout,
            self.config.sample_rate,
        )?)
    }

    fn find(&self, id: SubstreamId) -> Option<&Substream> {
        self.substreams.iter().find(|s| s.id == id)
    }
}
