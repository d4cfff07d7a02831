//! Error types for spatium-render.

use spatium_core::SpeakerLayout;
use thiserror::Error;

/// Construction-time resolution failures. Rendering itself never fails.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No gain matrix from {input} to {output}")]
    NoGainMatrix {
        input: SpeakerLayout,
        output: SpeakerLayout,
    },

    #[error("Scene decode requires an ambisonic input, got {0}")]
    NotScene(SpeakerLayout),

    #[error("Cannot render {input} into {output}")]
    UnsupportedTarget {
        input: SpeakerLayout,
        output: SpeakerLayout,
    },

    #[error("Invalid speaker configuration for {layout}: {reason}")]
    InvalidSpeakerConfig {
        layout: SpeakerLayout,
        reason: String,
    },

    #[error("Unknown decode layout: {0:?}")]
    UnknownDecodeLayout(String),

    #[error(transparent)]
    Core(#[from] spatium_core::Error),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
