//! Types and utilities shared by the components of the workspace.
pub mod tracer;

pub use tracer::{TracerError, TracerOptions, init_tracer};

/// The numeric type of samples, scores and coordinates.
pub type Real = f64;

/// Classifies the errors raised by the components.
///
/// Each component defines its own error type, all of which can be reduced to one of these kinds.
/// None of them are transient, so none of them should be retried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied an invalid parameter or parameter combination.
    Configuration,
    /// The input data cannot be processed, e.g. a constant column cannot be rescaled.
    DegenerateInput,
    /// A window too short to carry a score was asked for one.
    BoundaryCase,
}

/// Creates a version string from the crate version and the git description of the build.
///
/// The calling crate must depend on `const_format` and `git-version`.
#[macro_export]
macro_rules! version {
    () => {
        const_format::concatcp!(
            env!("CARGO_PKG_VERSION"),
            " (",
            git_version::git_version!(args = ["--always", "--dirty=-modified"], fallback = "unknown"),
            ")"
        )
    };
}
