//! Projects window scores onto a circle.
//!
//! Each score is a magnitude, and the window's position in the sequence determines its angle.
//! The angles sweep anticlockwise from the positive x axis once over the whole sequence, so the
//! first quarter of the windows lands in the first quadrant, the second quarter in the second, and so on.
use crate::Real;
use complex_plane_common::ErrorKind;
use serde::Serialize;
use std::f64::consts::PI;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Radius must be positive and finite, found {0}")]
    InvalidRadius(Real),
}

impl ProjectionError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }
}

/// A point in the plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Coordinate {
    pub x: Real,
    pub y: Real,
}

impl Coordinate {
    fn from_polar(magnitude: Real, angle: Real) -> Self {
        Self {
            x: magnitude * angle.sin(),
            y: magnitude * angle.cos(),
        }
    }
}

/// `count` angles, evenly spaced from `π` down to `-π`, both inclusive.
pub fn full_angles(count: usize) -> Vec<Real> {
    let step = match count {
        0 | 1 => 0.0,
        _ => -2.0 * PI / (count - 1) as Real,
    };
    (0..count).map(|i| PI + step * i as Real).collect()
}

/// The [full_angles], rotated so that the first quarter is moved to the end.
pub fn quadrant_aligned_angles(count: usize) -> Vec<Real> {
    let full = full_angles(count);
    let quarter = count / 4;
    full.iter()
        .skip(quarter)
        .chain(full.iter().take(quarter))
        .copied()
        .collect()
}

/// Maps scores to coordinates on a circle of the given radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircularProjector {
    radius: Real,
}

impl Default for CircularProjector {
    fn default() -> Self {
        Self { radius: 1.0 }
    }
}

impl CircularProjector {
    pub fn new(radius: Real) -> Result<Self, ProjectionError> {
        if radius.is_finite() && radius > 0.0 {
            Ok(Self { radius })
        } else {
            Err(ProjectionError::InvalidRadius(radius))
        }
    }

    pub fn radius(&self) -> Real {
        self.radius
    }

    /// Projects `scores`, in order.
    ///
    /// Score `i` is placed at distance `scores[i]·radius` from the origin, at the `i`-th quadrant aligned angle.
    pub fn project(&self, scores: &[Real]) -> Vec<Coordinate> {
        scores
            .iter()
            .zip(quadrant_aligned_angles(scores.len()))
            .map(|(&score, angle)| Coordinate::from_polar(score * self.radius, angle))
            .collect()
    }

    /// A circle of `count` points at distance `magnitude·radius`, traced over the [full_angles].
    ///
    /// Used by renderers to mark the bounds of the rescaled scores.
    pub fn guide_circle(&self, magnitude: Real, count: usize) -> Vec<Coordinate> {
        full_angles(count)
            .iter()
            .map(|&angle| Coordinate::from_polar(magnitude * self.radius, angle))
            .collect()
    }
}
