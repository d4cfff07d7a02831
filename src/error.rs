//! Centralized error type for the spatium umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

use crate::SubstreamId;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] spatium_core::Error),

    #[error("Render: {0}")]
    Render(#[from] spatium_render::Error),

    #[error("Unknown substream {0}")]
    UnknownSubstream(SubstreamId),
}

pub type Result<T> = std::result::Result<T, Error>;
