//! Rank aggregation of the symmetrised matrix.
use crate::Real;
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Ranks `values` in ascending order, starting from one.
///
/// Equal values share the mean of the ranks they span, e.g. `[2, 1, 2]` ranks as `[2.5, 1, 2.5]`.
/// Values must be finite.
pub fn average_ranks(values: ArrayView1<Real>) -> Array1<Real> {
    let mut order = (0..values.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = Array1::<Real>::zeros(values.len());
    let mut start = 0;
    while start < order.len() {
        let value = values[order[start]];
        let end = order[start + 1..]
            .iter()
            .position(|&index| values[index] != value)
            .map_or(order.len(), |tied| start + 1 + tied);
        // Ranks `start + 1..=end` are shared by the tied values.
        let rank = (start + 1 + end) as Real / 2.0;
        for &index in &order[start..end] {
            ranks[index] = rank;
        }
        start = end;
    }
    ranks
}

/// Ranks each column of `matrix` independently, and returns the mean rank of each row.
pub fn mean_column_rank(matrix: &Array2<Real>) -> Vec<Real> {
    let mut ranks = Array2::<Real>::zeros(matrix.raw_dim());
    for (column, mut ranked) in matrix.columns().into_iter().zip(ranks.columns_mut()) {
        ranked.assign(&average_ranks(column));
    }
    ranks
        .mean_axis(Axis(1))
        .map(|means| means.to_vec())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use ndarray::array;

    #[test]
    fn distinct_values() {
        assert_eq!(average_ranks(array![4.0, 2.0, 1.0].view()), array![3.0, 2.0, 1.0]);
    }

    #[test]
    fn ties_share_mean_rank() {
        assert_eq!(average_ranks(array![2.0, 1.0, 2.0].view()), array![2.5, 1.0, 2.5]);
        assert_eq!(
            average_ranks(array![0.0, 0.0, 0.0, 0.0].view()),
            array![2.5, 2.5, 2.5, 2.5]
        );
        assert_eq!(
            average_ranks(array![3.0, -1.0, 3.0, 7.0, -1.0, 3.0].view()),
            array![4.0, 1.5, 4.0, 6.0, 1.5, 4.0]
        );
    }

    #[test]
    fn signed_zeros_tie() {
        assert_eq!(average_ranks(array![0.0, -0.0, 1.0].view()), array![1.5, 1.5, 3.0]);
    }

    #[test]
    fn empty() {
        assert_eq!(average_ranks(Array1::<Real>::zeros(0).view()).len(), 0);
        assert!(mean_column_rank(&Array2::zeros((0, 0))).is_empty());
    }

    #[test]
    fn row_means() {
        let matrix = array![[1.0, 2.0, 4.0], [2.0, 1.0, 2.0], [4.0, 2.0, 1.0]];
        let means = mean_column_rank(&matrix);
        assert_eq!(means.len(), 3);
        assert_approx_eq!(means[0], 13.0 / 6.0);
        assert_approx_eq!(means[1], 5.0 / 3.0);
        assert_approx_eq!(means[2], 13.0 / 6.0);
    }
}
