//! Layout model and shared primitives for spatial rendering.
//!
//! # Primary API
//!
//! - [`SpeakerLayout`] / [`ChannelType`]: bed, expanded, scene and binaural layouts
//! - [`get_matrix`] / [`GainMatrix`]: the static bed-to-bed gain table
//! - [`AudioBuffer`] / [`InterleavedBuffer`]: host and library buffer formats
//! - [`PositionCell`] / [`PositionHandle`]: tear-free position hand-off
//! - [`RenderConfig`]: sample rate, block size and output layout
//!
//! # Feature-gated APIs
//!
//! - `"loudness"`: [`measure_loudness`] via `ebur128` (enabled by default)

pub mod error;
pub use error::{Error, Result};

mod channel;
pub use channel::ChannelType;

pub mod layout;
pub use layout::{LayoutKind, SpeakerLayout};

pub mod gain_table;
pub use gain_table::{get_matrix, init_gain_table, is_gain_table_built, matrix_count, GainMatrix};

mod buffer;
pub use buffer::{AudioBuffer, InterleavedBuffer};

mod lockfree;
pub use lockfree::{AtomicFlag, AtomicFloat};

mod position;
pub use position::{direction_vector, PannerPosition, PositionCell, PositionHandle};

mod smooth;
pub use smooth::SmoothedValue;

mod config;
pub use config::{RenderConfig, MAX_BLOCK_SIZE, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};

#[cfg(feature = "loudness")]
mod loudness;
#[cfg(feature = "loudness")]
pub use loudness::{measure_loudness, LoudnessStats};
