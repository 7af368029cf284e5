//! Mirrors a [DifferenceTable] into a full square matrix.
//!
//! With `T` the table and `Tt` its transpose, the result is
//! ```text
//! fill(T) + fill(Tt) - fill((T + Tt) / 2)
//! ```
//! where the average is undefined wherever either operand is, and `fill` replaces undefined cells with zero.
//! A cell defined in only one of `T` and `Tt` takes that value, a cell defined in both takes their mean.
use super::DifferenceTable;
use crate::Real;
use ndarray::{Array2, ArrayView2, Zip};

/// Replaces undefined cells with zero.
pub(crate) fn fill_undefined(cells: ArrayView2<Option<Real>>) -> Array2<Real> {
    cells.mapv(Option::unwrap_or_default)
}

/// The cell-wise mean of two tables, undefined where either cell is undefined.
pub(crate) fn defined_mean(
    left: ArrayView2<Option<Real>>,
    right: ArrayView2<Option<Real>>,
) -> Array2<Option<Real>> {
    Zip::from(left)
        .and(right)
        .map_collect(|&left, &right| Option::zip(left, right).map(|(l, r)| (l + r) / 2.0))
}

/// Symmetrises `table`.
pub fn symmetrise(table: &DifferenceTable) -> Array2<Real> {
    let cells = table.cells();
    let transposed = table.transposed();
    let mean = defined_mean(cells, transposed);
    fill_undefined(cells) + fill_undefined(transposed) - fill_undefined(mean.view())
}
