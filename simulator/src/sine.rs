use super::{SimulationError, Wobble, WobbleSource};
use chrono::Utc;
use complex_plane_common::Real;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, instrument};

/// An ordered sequence of samples, indexed from zero.
pub type Signal = Vec<Real>;

///
/// Describes the sine wave to generate, and how to perturb it.
///
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct SineParameters {
    /// The number of samples in one second; with a frequency of one, one period spans this many samples.
    pub hertz: usize,
    /// The number of periods per `hertz` samples.
    pub frequency: i32,
    /// The number of samples to generate.
    pub sample_count: usize,
    #[serde(default)]
    pub wobble: WobbleSource,
}

impl SineParameters {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.hertz == 0 {
            return Err(SimulationError::ZeroHertz);
        }
        if self.sample_count == 0 {
            return Err(SimulationError::ZeroSampleCount);
        }
        self.wobble.validate()
    }

    /// The unperturbed value of the sine wave at sample `x`.
    pub fn base_value(&self, x: usize) -> Real {
        Real::sin(2.0 * PI * self.frequency as Real * x as Real / self.hertz as Real)
    }

    /// Generates the signal, drawing any perturbation from `rng`.
    #[instrument(skip_all, level = "debug", fields(
        hertz = self.hertz,
        frequency = self.frequency,
        sample_count = self.sample_count,
        wobble = %self.wobble.mode,
    ), err(level = "warn"))]
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Signal, SimulationError> {
        self.validate()?;
        let mut wobble = Wobble::new(&self.wobble)?;
        Ok((0..self.sample_count)
            .map(|x| wobble.wobblify(self.base_value(x), x, rng))
            .collect())
    }

    /// Generates the signal from a generator seeded with `seed`.
    ///
    /// If no seed is given, the generator is seeded from the current time.
    pub fn generate_seeded(&self, seed: Option<u64>) -> Result<Signal, SimulationError> {
        let seed = seed.unwrap_or_else(|| Utc::now().timestamp_subsec_nanos() as u64);
        debug!("Seeding wobble with {seed}");
        self.generate(&mut StdRng::seed_from_u64(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WobbleMode;
    use assert_approx_eq::assert_approx_eq;
    use complex_plane_common::ErrorKind;

    fn parameters(mode: WobbleMode) -> SineParameters {
        SineParameters {
            hertz: 780,
            frequency: 2,
            sample_count: 780,
            wobble: WobbleSource::new(mode, 100.0),
        }
    }

    #[test]
    fn unperturbed_sine() {
        let parameters = SineParameters {
            hertz: 8,
            frequency: 1,
            sample_count: 9,
            wobble: Default::default(),
        };
        let signal = parameters.generate_seeded(Some(0)).unwrap();
        let expected = [0.0, 0.5f64.sqrt(), 1.0, 0.5f64.sqrt(), 0.0];
        assert_eq!(signal.len(), 9);
        for (value, expected) in signal.iter().zip(expected) {
            assert_approx_eq!(*value, expected);
        }
        assert_approx_eq!(signal[6], -1.0);
        assert_approx_eq!(signal[8], 0.0);
    }

    #[test]
    fn default_signal_has_two_periods() {
        let signal = parameters(WobbleMode::None).generate_seeded(None).unwrap();
        assert_eq!(signal.len(), 780);
        assert_approx_eq!(signal[97], (2.0 * PI * 2.0 * 97.0 / 780.0).sin());
        assert_approx_eq!(signal[195], 0.0);
        assert_approx_eq!(signal[390], 0.0);
        assert!(signal[..195].iter().skip(1).all(|&v| v > 0.0));
        assert!(signal[196..390].iter().all(|&v| v < 0.0));
    }

    #[test]
    fn jitter_every_step() {
        let parameters = parameters(WobbleMode::JitterEveryStep);
        let signal = parameters.generate_seeded(Some(42)).unwrap();
        for (x, value) in signal.iter().enumerate() {
            let offset = (value - parameters.base_value(x)) * 100.0;
            assert!((0.999..=10.001).contains(&offset.abs()), "{offset} at {x}");
            assert_approx_eq!(offset, offset.round(), 1e-6);
        }
    }

    #[test]
    fn jitter_hold_reapplies_offset() {
        let parameters = parameters(WobbleMode::JitterHold);
        let signal = parameters.generate_seeded(Some(42)).unwrap();
        let offset = |x: usize| signal[x] - parameters.base_value(x);
        for x in 0..signal.len() {
            assert!(offset(x).abs() >= 0.0099);
            assert_approx_eq!(offset(x), offset(x - x % 10), 1e-9);
        }
    }

    #[test]
    fn jitter_pulse_restores_base() {
        let parameters = parameters(WobbleMode::JitterPulse);
        let signal = parameters.generate_seeded(Some(42)).unwrap();
        for (x, &value) in signal.iter().enumerate() {
            if x % 10 == 0 {
                assert!((value - parameters.base_value(x)).abs() >= 0.0099);
            } else {
                assert_eq!(value, parameters.base_value(x));
            }
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let parameters = parameters(WobbleMode::JitterEveryStep);
        assert_eq!(
            parameters.generate_seeded(Some(3)).unwrap(),
            parameters.generate_seeded(Some(3)).unwrap()
        );
        assert_ne!(
            parameters.generate_seeded(Some(3)).unwrap(),
            parameters.generate_seeded(Some(4)).unwrap()
        );
    }

    #[test]
    fn invalid_parameters() {
        let mut zero_hertz = parameters(WobbleMode::None);
        zero_hertz.hertz = 0;
        let error = zero_hertz.generate_seeded(Some(0)).unwrap_err();
        assert!(matches!(error, SimulationError::ZeroHertz));
        assert_eq!(error.kind(), ErrorKind::Configuration);

        let mut zero_samples = parameters(WobbleMode::None);
        zero_samples.sample_count = 0;
        assert!(matches!(
            zero_samples.generate_seeded(Some(0)),
            Err(SimulationError::ZeroSampleCount)
        ));
    }

    const JSON_INPUT: &str = r#"
    {
        "hertz": 780,
        "frequency": 2,
        "sample-count": 780,
        "wobble": { "mode": "wobble2", "scale": 50 }
    }
    "#;

    #[test]
    fn parse_json() {
        let parameters: SineParameters = serde_json::from_str(JSON_INPUT).unwrap();
        assert_eq!(parameters.sample_count, 780);
        assert_eq!(parameters.wobble.mode, WobbleMode::JitterHold);
        assert_eq!(parameters.wobble.scale, 50.0);

        let parameters: SineParameters =
            serde_json::from_str(r#"{ "hertz": 10, "frequency": 1, "sample-count": 10 }"#).unwrap();
        assert_eq!(parameters.wobble, WobbleSource::default());

        assert!(
            serde_json::from_str::<SineParameters>(
                r#"{ "hertz": 10, "frequency": 1, "sample-count": 10, "wobble": { "mode": "shake" } }"#
            )
            .is_err()
        );
    }
}
