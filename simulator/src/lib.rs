//! # Simulator
//!
//! Synthesises the sine signal analysed by the rest of the workspace.
//! The signal can optionally be perturbed by one of several [WobbleMode]s, drawn from a seedable
//! random source so that perturbed signals are reproducible.
mod sine;
mod wobble;

use complex_plane_common::{ErrorKind, Real};
use thiserror::Error;

pub use sine::{Signal, SineParameters};
pub use wobble::{Wobble, WobbleMode, WobbleSource};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Number of hertz must be positive")]
    ZeroHertz,
    #[error("Sample count must be positive")]
    ZeroSampleCount,
    #[error("Wobble scale must be positive and finite, found {0}")]
    InvalidWobbleScale(Real),
    #[error("Unrecognised wobble mode: {0}")]
    UnknownWobbleMode(String),
    #[error("Invalid wobble magnitude distribution: {0}")]
    MagnitudeDistribution(#[from] rand_distr::uniform::Error),
    #[error("Invalid wobble sign distribution: {0}")]
    SignDistribution(#[from] rand_distr::BernoulliError),
}

impl SimulationError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }
}
