use super::SimulationError;
use clap::ValueEnum;
use complex_plane_common::Real;
use rand::Rng;
use rand_distr::{Bernoulli, Distribution, Uniform};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::Display;

/// Offsets are redrawn on indices which are multiples of this value,
/// in the modes that do not draw on every index.
const TRIGGER_PERIOD: usize = 10;

/// Smallest and largest offset magnitude, before division by the wobble scale.
const MIN_MAGNITUDE: u32 = 1;
const MAX_MAGNITUDE: u32 = 10;

/// Determines how the sine wave is perturbed.
///
/// Parsed the same way from the command line, from JSON and with [FromStr]:
/// case-insensitively, accepting the `wobble1..3` aliases.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Display, Deserialize, Serialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case", try_from = "String")]
#[strum(serialize_all = "kebab-case")]
pub enum WobbleMode {
    /// The sine wave is left unchanged.
    #[default]
    None,
    /// A random offset is added to, or subtracted from, every sample.
    #[value(alias = "wobble1")]
    JitterEveryStep,
    /// A random offset is drawn every tenth sample, and added to every sample until the next draw.
    #[value(alias = "wobble2")]
    JitterHold,
    /// A random offset is drawn and applied every tenth sample, other samples are unchanged.
    #[value(alias = "wobble3")]
    JitterPulse,
}

impl FromStr for WobbleMode {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
            .map_err(|_| SimulationError::UnknownWobbleMode(s.to_owned()))
    }
}

impl TryFrom<String> for WobbleMode {
    type Error = SimulationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn default_scale() -> Real {
    100.0
}

/// The perturbation to apply to the sine wave.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct WobbleSource {
    #[serde(default)]
    pub mode: WobbleMode,
    /// Offsets are divided by this value, so a larger scale gives a smaller perturbation.
    #[serde(default = "default_scale")]
    pub scale: Real,
}

impl Default for WobbleSource {
    fn default() -> Self {
        Self {
            mode: WobbleMode::default(),
            scale: default_scale(),
        }
    }
}

impl WobbleSource {
    pub fn new(mode: WobbleMode, scale: Real) -> Self {
        Self { mode, scale }
    }

    pub(crate) fn validate(&self) -> Result<(), SimulationError> {
        if self.scale.is_finite() && self.scale > 0.0 {
            Ok(())
        } else {
            Err(SimulationError::InvalidWobbleScale(self.scale))
        }
    }
}

/// Applies a [WobbleSource] to a sequence of samples, in index order.
///
/// Holds the most recently drawn offset, so a fresh instance must be used for each signal.
pub struct Wobble<'a> {
    source: &'a WobbleSource,
    sign: Bernoulli,
    magnitude: Uniform<u32>,
    held: Real,
}

impl<'a> Wobble<'a> {
    pub fn new(source: &'a WobbleSource) -> Result<Self, SimulationError> {
        source.validate()?;
        Ok(Self {
            source,
            sign: Bernoulli::new(0.5)?,
            magnitude: Uniform::new_inclusive(MIN_MAGNITUDE, MAX_MAGNITUDE)?,
            held: Real::default(),
        })
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Real {
        let magnitude = self.magnitude.sample(rng) as Real / self.source.scale;
        if self.sign.sample(rng) {
            magnitude
        } else {
            -magnitude
        }
    }

    /// Returns `value`, perturbed according to the mode and the sample's `index`.
    pub fn wobblify<R: Rng + ?Sized>(&mut self, value: Real, index: usize, rng: &mut R) -> Real {
        let is_trigger = index % TRIGGER_PERIOD == 0;
        match self.source.mode {
            WobbleMode::None => value,
            WobbleMode::JitterEveryStep => value + self.draw(rng),
            WobbleMode::JitterHold => {
                if is_trigger {
                    self.held = self.draw(rng);
                }
                value + self.held
            }
            WobbleMode::JitterPulse => {
                if is_trigger {
                    value + self.draw(rng)
                } else {
                    value
                }
            }
        }
    }
}
