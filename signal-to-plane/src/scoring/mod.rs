//! Scorers turn a window into a series of scores, one per position of the window's difference pyramid.
//!
//! The [DifferenceScorer] builds the [DifferencePyramid] of a window, arranges it into a
//! [DifferenceTable], [symmetrise]s it, and aggregates the ranks of each column of the result.
pub mod pyramid;
pub mod rank;
pub mod symmetrise;

use crate::Real;
use complex_plane_common::ErrorKind;
use thiserror::Error;
use tracing::trace;

pub use pyramid::{DifferencePyramid, DifferenceTable};
pub use rank::{average_ranks, mean_column_rank};
pub use symmetrise::symmetrise;

/// The scores of one window, one per row of its [DifferenceTable].
pub type ScoreSeries = Vec<Real>;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Window sample {index} is not finite: {value}")]
    NonFiniteSample { index: usize, value: Real },
    #[error("Window of length {length} has no score")]
    TooShort { length: usize },
}

impl ScoringError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScoringError::NonFiniteSample { .. } => ErrorKind::DegenerateInput,
            ScoringError::TooShort { .. } => ErrorKind::BoundaryCase,
        }
    }
}

/// Implement for scorers, which take in a window and output a score series.
///
/// Scorers are shared between worker threads, so must be pure functions of the window.
pub trait Scorer: Sync {
    /// Scores every position of `window`.
    fn score(&self, window: &[Real]) -> Result<ScoreSeries, ScoringError>;

    /// The last element of the window's score series.
    ///
    /// Fails if the series is empty.
    fn window_score(&self, window: &[Real]) -> Result<Real, ScoringError> {
        self.score(window)?
            .last()
            .copied()
            .ok_or(ScoringError::TooShort {
                length: window.len(),
            })
    }
}

/// Scores a window by ranking its symmetrised difference table.
///
/// Windows of length zero or one have no differences, and score to an empty series.
#[derive(Clone, Copy, Debug, Default)]
pub struct DifferenceScorer;

impl Scorer for DifferenceScorer {
    fn score(&self, window: &[Real]) -> Result<ScoreSeries, ScoringError> {
        if let Some((index, &value)) = window.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ScoringError::NonFiniteSample { index, value });
        }
        let table = DifferencePyramid::new(window).to_table();
        let series = mean_column_rank(&symmetrise(&table));
        trace!("Scored window of length {}", window.len());
        Ok(series)
    }
}
