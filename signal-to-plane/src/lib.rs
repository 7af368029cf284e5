//! # Signal to Plane
//!
//! Analyses the structure of a signal over sliding windows and maps the result onto the plane.
//! * [windowing]: the signal is cut into one window ending at each sample.
//! * [scoring]: each window is scored by ranking its symmetrised difference table.
//! * [normalise]: the window scores are rescaled into a target range.
//! * [projection]: the rescaled scores are placed on a circle, one angle per window.
//!
//! [processing] runs these stages in order, as configured by [parameters].
pub mod normalise;
pub mod parameters;
pub mod processing;
pub mod projection;
pub mod scoring;
pub mod windowing;

pub use complex_plane_common::{ErrorKind, Real};
