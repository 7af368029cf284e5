//! Runs the stages of the analysis in order: the signal is windowed, each window is scored on a
//! worker pool, and the window scores are rescaled and projected onto a circle.
use crate::{
    Real,
    normalise::{MinMaxScaler, NormaliseError},
    parameters::{AnalysisParameters, BoundaryPolicy},
    projection::{CircularProjector, Coordinate, ProjectionError},
    scoring::{DifferenceScorer, ScoreSeries, Scorer, ScoringError},
    windowing::{Window, Windower, WindowingError},
};
use complex_plane_common::ErrorKind;
use rayon::{
    ThreadPoolBuildError, ThreadPoolBuilder,
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
};
use serde::Serialize;
use simulator::{Signal, SimulationError};
use std::ops::Range;
use thiserror::Error;
use tracing::{Span, debug, info, instrument};

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),
    #[error("Windowing error: {0}")]
    Windowing(#[from] WindowingError),
    #[error("Scoring error in window {window}: {source}")]
    Scoring {
        window: usize,
        #[source]
        source: ScoringError,
    },
    #[error("Normalisation error: {0}")]
    Normalise(#[from] NormaliseError),
    #[error("Projection error: {0}")]
    Projection(#[from] ProjectionError),
    #[error("Scoring a single period requires a non-zero frequency")]
    NoPeriod,
    #[error("Cannot build thread pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

impl ProcessingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessingError::Simulation(e) => e.kind(),
            ProcessingError::Windowing(e) => e.kind(),
            ProcessingError::Scoring { source, .. } => source.kind(),
            ProcessingError::Normalise(e) => e.kind(),
            ProcessingError::Projection(e) => e.kind(),
            ProcessingError::NoPeriod | ProcessingError::ThreadPool(_) => ErrorKind::Configuration,
        }
    }
}

/// A circle marking one of the bounds of the rescaled scores.
#[derive(Debug, Serialize)]
pub struct GuideCircle {
    pub magnitude: Real,
    pub points: Vec<Coordinate>,
}

/// The output of an analysis, and its intermediate results.
///
/// Entry `i` of `scores`, `rescaled_scores`, `coordinates` and `score_series`
/// belongs to window `first_scored_window + i`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Analysis {
    pub signal: Signal,
    pub window_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows: Option<Vec<Window>>,
    pub first_scored_window: usize,
    pub scores: Vec<Real>,
    pub rescaled_scores: Vec<Real>,
    pub coordinates: Vec<Coordinate>,
    pub guide_circles: Vec<GuideCircle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_series: Option<Vec<ScoreSeries>>,
}

/// The stages applied to a signal, and the options controlling them.
#[derive(Clone, Debug)]
pub struct Pipeline<S> {
    pub windower: Windower,
    pub scorer: S,
    pub scaler: MinMaxScaler,
    pub projector: CircularProjector,
    pub boundary_policy: BoundaryPolicy,
    /// If set, only windows ending before this index are scored.
    pub window_limit: Option<usize>,
    pub keep_windows: bool,
    pub keep_score_series: bool,
}

impl Pipeline<DifferenceScorer> {
    pub fn from_parameters(parameters: &AnalysisParameters) -> Result<Self, ProcessingError> {
        let window_limit = if parameters.single_period {
            Some(parameters.period().ok_or(ProcessingError::NoPeriod)?)
        } else {
            None
        };
        Ok(Self {
            windower: parameters.windower()?,
            scorer: DifferenceScorer,
            scaler: parameters.scaler()?,
            projector: parameters.projector()?,
            boundary_policy: parameters.boundary_policy,
            window_limit,
            keep_windows: parameters.keep_windows,
            keep_score_series: parameters.keep_score_series,
        })
    }
}

/// Applies `score` to each window on the current rayon pool.
///
/// The results are collected in window order, whatever order the workers finish in.
/// # Parameters
/// - windows: the windows to score.
/// - first_index: the index of the first window in the signal, used to report errors.
/// - score: the function to apply to each window.
fn score_in_parallel<T, F>(
    windows: &[Window],
    first_index: usize,
    score: F,
) -> Result<Vec<T>, ProcessingError>
where
    T: Send,
    F: Fn(&[Real]) -> Result<T, ScoringError> + Sync,
{
    let span = Span::current();
    windows
        .par_iter()
        .enumerate()
        .map(|(index, window)| {
            span.in_scope(|| score(window.as_slice()))
                .map_err(|source| ProcessingError::Scoring {
                    window: first_index + index,
                    source,
                })
        })
        .collect::<Vec<Result<_, ProcessingError>>>()
        .into_iter()
        .collect()
}

impl<S: Scorer> Pipeline<S> {
    /// The range of windows to score.
    fn scored_range(&self, windows: &[Window]) -> Range<usize> {
        let end = self
            .window_limit
            .map_or(windows.len(), |limit| limit.min(windows.len()));
        let start = match self.boundary_policy {
            BoundaryPolicy::Skip => windows[..end]
                .iter()
                .position(|window| window.len() > 1)
                .unwrap_or(end),
            BoundaryPolicy::Reject => 0,
        };
        start..end
    }

    /// Scores `windows`, returning the window scores and, if requested, the full score series.
    #[instrument(skip_all, level = "debug", fields(num_windows = windows.len()), err(level = "warn"))]
    fn score_windows(
        &self,
        windows: &[Window],
        first_index: usize,
    ) -> Result<(Vec<Real>, Option<Vec<ScoreSeries>>), ProcessingError> {
        if self.keep_score_series {
            let scored = score_in_parallel(windows, first_index, |window| {
                let series = self.scorer.score(window)?;
                let last = series.last().copied().ok_or(ScoringError::TooShort {
                    length: window.len(),
                })?;
                Ok((last, series))
            })?;
            let (scores, series) = scored.into_iter().unzip();
            Ok((scores, Some(series)))
        } else {
            let scores = score_in_parallel(windows, first_index, |window| {
                self.scorer.window_score(window)
            })?;
            Ok((scores, None))
        }
    }

    /// Runs every stage on `signal`.
    #[instrument(skip_all, fields(num_samples = signal.len()), err(level = "warn"))]
    pub fn analyse(&self, signal: Signal) -> Result<Analysis, ProcessingError> {
        let windows = self.windower.batch(&signal);
        let range = self.scored_range(&windows);
        debug!(
            "Scoring windows {}..{} of {}",
            range.start,
            range.end,
            windows.len()
        );

        let (scores, score_series) = self.score_windows(&windows[range.clone()], range.start)?;
        let rescaled_scores = self.scaler.rescale(&scores)?;
        let coordinates = self.projector.project(&rescaled_scores);
        let guide_circles = [self.scaler.lower(), self.scaler.upper()]
            .into_iter()
            .map(|magnitude| GuideCircle {
                magnitude,
                points: self.projector.guide_circle(magnitude, scores.len()),
            })
            .collect();

        Ok(Analysis {
            window_count: windows.len(),
            windows: self.keep_windows.then_some(windows),
            first_scored_window: range.start,
            signal,
            scores,
            rescaled_scores,
            coordinates,
            guide_circles,
            score_series,
        })
    }
}

/// Runs `op` on a dedicated pool of `threads` workers, or on the global pool if `threads` is `None`.
fn on_thread_pool<T, F>(threads: Option<usize>, op: F) -> Result<T, ProcessingError>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    match threads {
        Some(threads) => Ok(ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?
            .install(op)),
        None => Ok(op()),
    }
}

/// Generates the signal described by `parameters`, and analyses it.
#[instrument(skip_all, fields(
    hertz = parameters.hertz,
    frequency = parameters.frequency,
    wobble = %parameters.wobble,
    subframe_length = parameters.subframe_length,
    stride = parameters.stride,
    boundary_policy = %parameters.boundary_policy,
), err(level = "error"))]
pub fn run(parameters: &AnalysisParameters) -> Result<Analysis, ProcessingError> {
    let pipeline = Pipeline::from_parameters(parameters)?;
    let signal = parameters
        .sine_parameters()
        .generate_seeded(parameters.seed)?;

    let span = Span::current();
    let analysis = on_thread_pool(parameters.threads, || {
        span.in_scope(|| pipeline.analyse(signal))
    })??;
    info!(
        "Scored {} of {} windows",
        analysis.scores.len(),
        analysis.window_count
    );
    Ok(analysis)
}
