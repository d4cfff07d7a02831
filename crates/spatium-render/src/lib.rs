//! Substream renderers: bed transcoding, ambisonic decoding, binaural rendering
//! and object panning.
//!
//! # Primary API
//!
//! - [`create_renderer`]: resolves the [`Renderer`] for an (input, output) layout pair
//! - [`Render`]: the block contract every renderer implements
//! - [`create_panner`] / [`Panner`]: point-source panning with live position updates
//!
//! Renderers and panners are built outside the audio callback. Once prepared they
//! never allocate, lock or fail while rendering.
//!
//! # Example
//!
//! ```
//! use spatium_core::{AudioBuffer, SpeakerLayout};
//! use spatium_render::{create_renderer, Render};
//!
//! let mut renderer =
//!     create_renderer(SpeakerLayout::Surround5_1, SpeakerLayout::Stereo, 512, 48_000)?;
//!
//! let input = AudioBuffer::new(6, 512);
//! let mut output = AudioBuffer::new(2, 512);
//! renderer.render(&input, &mut output);
//! # Ok::<(), spatium_render::Error>(())
//! ```

mod error;
pub use error::{Error, Result};

mod renderer;
pub use renderer::{Render, Renderer};

mod bed;
mod binaural;
mod hoa;
mod passthrough;
pub use bed::BedToBedRenderer;
pub use binaural::BinauralRenderer;
pub use hoa::{intermediate_layout, HoaToBedRenderer};
pub use passthrough::PassthroughRenderer;

mod factory;
pub use factory::create_renderer;

pub mod panner;
pub use panner::{create_panner, Pan, Panner};

pub mod spatial;
