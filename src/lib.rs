//! # Spatium - Substream Rendering Engine
//!
//! Renders audio substreams authored in any supported speaker layout (channel
//! beds, expanded beds, higher-order ambisonics) into a single target layout:
//! loudspeakers, ambisonics-to-speakers or binaural headphones.
//!
//! ## Architecture
//!
//! Spatium is an umbrella crate that coordinates:
//! - **spatium-core** - Layout model, gain table, buffers, lock-free control, loudness
//! - **spatium-render** - Renderers, the renderer factory and point-source panners
//!
//! [`MixEngine`] sits on top: it owns one renderer per substream and sums them into
//! the output layout.
//!
//! ## Quick Start
//!
//! ```
//! use spatium::prelude::*;
//!
//! let mut engine = MixEngine::builder()
//!     .sample_rate(48_000)
//!     .block_size(256)
//!     .output_layout(SpeakerLayout::Stereo)
//!     .build()?;
//!
//! let bed = engine.add_substream(SpeakerLayout::Surround5_1);
//! assert_eq!(engine.prepare(), 1);
//! assert_eq!(engine.renderer_kind(bed), Some("bed-to-bed"));
//!
//! let inputs = [AudioBuffer::new(6, 256)];
//! let mut out = AudioBuffer::new(2, 256);
//! engine.render(&inputs, &mut out);
//! # Ok::<(), spatium::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Includes `loudness`
//! - `loudness` - EBU R128 measurement of rendered output

/// Re-export of spatium-core for direct access
pub use spatium_core as core;

/// Re-export of spatium-render for direct access
pub use spatium_render as render;

pub use spatium_core::{
    get_matrix, AtomicFlag, AtomicFloat, AudioBuffer, ChannelType, GainMatrix, LayoutKind,
    PannerPosition, PositionHandle, RenderConfig, SmoothedValue, SpeakerLayout,
};

#[cfg(feature = "loudness")]
pub use spatium_core::{measure_loudness, LoudnessStats};

pub use spatium_render::{
    create_panner, create_renderer, BedToBedRenderer, BinauralRenderer, HoaToBedRenderer,
    Pan, Panner, PassthroughRenderer, Render, Renderer,
};

mod builder;
mod engine;
mod error;

pub use builder::MixEngineBuilder;
pub use engine::{MixEngine, SubstreamId};
pub use error::{Error, Result};

/// Convenient imports for common use cases
pub mod prelude {
    pub use crate::{MixEngine, MixEngineBuilder, SubstreamId};

    pub use spatium_core::{AudioBuffer, PannerPosition, PositionHandle, RenderConfig, SpeakerLayout};

    pub use spatium_render::{create_panner, create_renderer, Pan, Panner, Render, Renderer};
}
