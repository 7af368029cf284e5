//! The finite-difference pyramid of a window, and the table it is arranged into.
use crate::Real;
use ndarray::{Array2, ArrayView2};

/// Successive forward-difference layers of a sequence.
///
/// Layer `k` (zero-indexed) holds the `(k + 1)`-th differences, and has `len - k - 1` values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DifferencePyramid {
    layers: Vec<Vec<Real>>,
}

/// Forward differences of `values`, one shorter than `values`.
fn differences(values: &[Real]) -> Vec<Real> {
    values.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

impl DifferencePyramid {
    pub fn new(window: &[Real]) -> Self {
        let mut layers = Vec::<Vec<Real>>::with_capacity(window.len().saturating_sub(1));
        let mut layer = differences(window);
        while !layer.is_empty() {
            let next = differences(&layer);
            layers.push(layer);
            layer = next;
        }
        Self { layers }
    }

    pub fn layers(&self) -> &[Vec<Real>] {
        &self.layers
    }

    /// The number of layers, which is also the width and height of the [DifferenceTable].
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Arranges the layers as the columns of a square table, aligned to the bottom row.
    pub fn to_table(&self) -> DifferenceTable {
        let size = self.depth();
        let cells = Array2::from_shape_fn((size, size), |(row, column)| {
            let layer = &self.layers[column];
            let leading = size - layer.len();
            row.checked_sub(leading).map(|index| layer[index])
        });
        DifferenceTable { cells }
    }
}

/// A square table whose columns are the layers of a [DifferencePyramid].
///
/// Column `k` holds layer `k` in its last rows. The leading cells of each column are undefined,
/// so the defined cells form the lower triangle, including the diagonal.
#[derive(Clone, Debug, PartialEq)]
pub struct DifferenceTable {
    cells: Array2<Option<Real>>,
}

impl DifferenceTable {
    pub fn size(&self) -> usize {
        self.cells.nrows()
    }

    pub fn get(&self, row: usize, column: usize) -> Option<Real> {
        self.cells.get((row, column)).copied().flatten()
    }

    pub fn cells(&self) -> ArrayView2<'_, Option<Real>> {
        self.cells.view()
    }

    /// The table reflected in its diagonal.
    pub fn transposed(&self) -> ArrayView2<'_, Option<Real>> {
        self.cells.t()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn powers_of_two() {
        let pyramid = DifferencePyramid::new(&[1.0, 2.0, 4.0, 8.0]);
        assert_eq!(
            pyramid.layers(),
            &[vec![1.0, 2.0, 4.0], vec![1.0, 2.0], vec![1.0]]
        );
    }

    #[test]
    fn constant_window() {
        let pyramid = DifferencePyramid::new(&[5.0, 5.0, 5.0, 5.0]);
        assert_eq!(
            pyramid.layers(),
            &[vec![0.0, 0.0, 0.0], vec![0.0, 0.0], vec![0.0]]
        );
    }

    #[test]
    fn short_windows() {
        assert_eq!(DifferencePyramid::new(&[]).depth(), 0);
        assert_eq!(DifferencePyramid::new(&[3.0]).depth(), 0);
        assert_eq!(DifferencePyramid::new(&[3.0]).to_table().size(), 0);
        assert_eq!(DifferencePyramid::new(&[3.0, 1.0]).layers(), &[vec![-2.0]]);
    }

    #[test]
    fn layer_lengths() {
        let window = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let pyramid = DifferencePyramid::new(&window);
        assert_eq!(pyramid.depth(), window.len() - 1);
        for (k, layer) in pyramid.layers().iter().enumerate() {
            assert_eq!(layer.len(), window.len() - k - 1);
        }
    }

    #[test]
    fn bottom_aligned_table() {
        let table = DifferencePyramid::new(&[1.0, 2.0, 4.0, 8.0]).to_table();
        assert_eq!(table.size(), 3);
        let expected = [
            [Some(1.0), None, None],
            [Some(2.0), Some(1.0), None],
            [Some(4.0), Some(2.0), Some(1.0)],
        ];
        for (row, cells) in expected.iter().enumerate() {
            for (column, cell) in cells.iter().enumerate() {
                assert_eq!(table.get(row, column), *cell);
                assert_eq!(table.transposed()[(column, row)], *cell);
            }
        }
        assert_eq!(table.get(3, 0), None);
    }
}
