//! Integration test modules for spatium
//!
//! - transcode: gain-table coverage, expanded layouts, linearity
//! - scene: ambisonic decoding, binaural output
//! - panning: panners built through the factory
//! - engine: MixEngine lifecycle and mixing

pub mod engine;
pub mod scene;
pub mod transcode;
