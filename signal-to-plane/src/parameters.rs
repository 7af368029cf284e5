//! Defines the parameters of an analysis, read either from the command line or from a JSON file.
use crate::{
    Real,
    normalise::{MinMaxScaler, NormaliseError},
    projection::{CircularProjector, ProjectionError},
    windowing::{Windower, WindowingError},
};
use clap::{Parser, Subcommand, ValueEnum};
use complex_plane_common::ErrorKind;
use serde::{Deserialize, Serialize};
use simulator::{SineParameters, WobbleMode, WobbleSource};
use std::path::{Path, PathBuf};
use strum::Display;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParametersError {
    #[error("Cannot read parameter file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid parameters: {0}")]
    Json(#[from] serde_json::Error),
}

impl ParametersError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }
}

/// Determines what happens to windows too short to be scored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BoundaryPolicy {
    /// Leading windows with fewer than two samples are left out of the score table.
    #[default]
    Skip,
    /// Any window with fewer than two samples is an error.
    Reject,
}

/// Encapsulates the parameters of every stage of the analysis.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct AnalysisParameters {
    /// The number of samples per second of the sine wave.
    #[clap(long, env = "SIGNAL_TO_PLANE_HERTZ", default_value = "780")]
    pub hertz: usize,

    /// The number of periods of the sine wave per second.
    #[clap(
        long,
        env = "SIGNAL_TO_PLANE_FREQUENCY",
        default_value = "2",
        allow_negative_numbers = true,
    )]
    pub frequency: i32,

    /// The number of samples to generate.
    #[clap(long, env = "SIGNAL_TO_PLANE_SAMPLE_COUNT", default_value = "780")]
    pub sample_count: usize,

    /// How the sine wave is perturbed.
    #[clap(long, env = "SIGNAL_TO_PLANE_WOBBLE", default_value = "none")]
    pub wobble: WobbleMode,

    /// Perturbation offsets are divided by this value.
    #[clap(long, env = "SIGNAL_TO_PLANE_WOBBLE_SCALE", default_value = "100")]
    pub wobble_scale: Real,

    /// Seeds the perturbation. If not set, the current time is used.
    #[clap(long, env = "SIGNAL_TO_PLANE_SEED")]
    pub seed: Option<u64>,

    /// The span of samples each window covers.
    #[clap(long, env = "SIGNAL_TO_PLANE_SUBFRAME_LENGTH", default_value = "90")]
    pub subframe_length: usize,

    /// The spacing between consecutive samples of a window.
    #[clap(long, env = "SIGNAL_TO_PLANE_STRIDE", default_value = "1")]
    pub stride: usize,

    /// Window scores are rescaled so that the lowest is this value.
    #[clap(
        long,
        env = "SIGNAL_TO_PLANE_NORM_LOWER",
        default_value = "0.5",
        allow_negative_numbers = true,
    )]
    pub norm_lower: Real,

    /// Window scores are rescaled so that the highest is this value.
    #[clap(
        long,
        env = "SIGNAL_TO_PLANE_NORM_UPPER",
        default_value = "1.5",
        allow_negative_numbers = true,
    )]
    pub norm_upper: Real,

    /// Radius of the circle the rescaled scores are projected onto.
    #[clap(long, env = "SIGNAL_TO_PLANE_RADIUS", default_value = "1")]
    pub radius: Real,

    /// Determines what happens to windows too short to be scored.
    #[clap(long, env = "SIGNAL_TO_PLANE_BOUNDARY_POLICY", default_value = "skip")]
    pub boundary_policy: BoundaryPolicy,

    /// If set, only the windows covering the first period of the sine wave are scored.
    #[clap(long, env = "SIGNAL_TO_PLANE_SINGLE_PERIOD")]
    pub single_period: bool,

    /// Number of threads to score windows on. If not set, one per core is used.
    #[clap(long, env = "SIGNAL_TO_PLANE_THREADS")]
    pub threads: Option<usize>,

    /// If set, the windows are included in the output.
    #[clap(long, env = "SIGNAL_TO_PLANE_KEEP_WINDOWS")]
    pub keep_windows: bool,

    /// If set, every window's full score series is included in the output.
    #[clap(long, env = "SIGNAL_TO_PLANE_KEEP_SCORE_SERIES")]
    pub keep_score_series: bool,
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self {
            hertz: 780,
            frequency: 2,
            sample_count: 780,
            wobble: WobbleMode::None,
            wobble_scale: 100.0,
            seed: None,
            subframe_length: 90,
            stride: 1,
            norm_lower: 0.5,
            norm_upper: 1.5,
            radius: 1.0,
            boundary_policy: BoundaryPolicy::Skip,
            single_period: false,
            threads: None,
            keep_windows: false,
            keep_score_series: false,
        }
    }
}

impl AnalysisParameters {
    /// Parses parameters from a kebab-case JSON document. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, ParametersError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads parameters from the JSON file at `path`.
    pub fn from_json_file(path: &Path) -> Result<Self, ParametersError> {
        let json = std::fs::read_to_string(path).map_err(|source| ParametersError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn sine_parameters(&self) -> SineParameters {
        SineParameters {
            hertz: self.hertz,
            frequency: self.frequency,
            sample_count: self.sample_count,
            wobble: WobbleSource::new(self.wobble, self.wobble_scale),
        }
    }

    pub fn windower(&self) -> Result<Windower, WindowingError> {
        Windower::new(self.subframe_length, self.stride)
    }

    pub fn scaler(&self) -> Result<MinMaxScaler, NormaliseError> {
        MinMaxScaler::new(self.norm_lower, self.norm_upper)
    }

    pub fn projector(&self) -> Result<CircularProjector, ProjectionError> {
        CircularProjector::new(self.radius)
    }

    /// The number of samples in one period of the sine wave, or `None` if the frequency is zero.
    pub fn period(&self) -> Option<usize> {
        (self.frequency != 0).then(|| self.hertz / self.frequency.unsigned_abs() as usize)
    }
}

/// Location of a JSON file of [AnalysisParameters].
#[derive(Debug, Clone, Parser)]
pub struct JsonFile {
    /// Path to the file.
    #[clap(long)]
    pub path: PathBuf,
}

/// Specifies where the analysis parameters are read from.
#[derive(Subcommand, Debug)]
pub enum Mode {
    /// Reads the parameters from command line flags.
    FromArgs(AnalysisParameters),
    /// Reads the parameters from a JSON file.
    FromJson(JsonFile),
}
