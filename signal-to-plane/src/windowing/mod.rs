//! Slices a signal into overlapping, backward-looking [Window]s.
//!
//! The window ending at index `t` holds the samples at `t, t - stride, t - 2·stride, ...`
//! for offsets less than the subframe length, in chronological order.
//! Offsets reaching before the start of the signal are dropped, so the leading windows are shorter.
//!
//! # Example
//! ```rust
//! use signal_to_plane::windowing::{Subframes, Windower};
//!
//! let signal = [0.0, 1.0, 2.0, 3.0, 4.0];
//! let windows = signal
//!     .subframes(Windower::new(3, 1).unwrap())
//!     .collect::<Vec<_>>();
//! assert_eq!(windows[0], vec![0.0]);
//! assert_eq!(windows[4], vec![2.0, 3.0, 4.0]);
//! ```
mod iter;

use crate::Real;
use complex_plane_common::ErrorKind;
use thiserror::Error;

pub use iter::{SubframeIter, Subframes};

/// A chronologically ordered slice of a signal.
pub type Window<T = Real> = Vec<T>;

#[derive(Debug, Error)]
pub enum WindowingError {
    #[error("Subframe length must be positive")]
    ZeroSubframeLength,
    #[error("Stride must be positive")]
    ZeroStride,
    #[error("Stride {stride} exceeds subframe length {subframe_length}")]
    StrideExceedsSubframe {
        stride: usize,
        subframe_length: usize,
    },
    #[error("Column {index} has length {length}, expected {expected}")]
    RaggedColumns {
        index: usize,
        length: usize,
        expected: usize,
    },
}

impl WindowingError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }
}

/// Determines the extent of each window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Windower {
    subframe_length: usize,
    stride: usize,
}

impl Windower {
    /// # Parameters
    /// - subframe_length: the span of samples each window covers.
    /// - stride: the spacing between consecutive samples of a window, at most `subframe_length`.
    pub fn new(subframe_length: usize, stride: usize) -> Result<Self, WindowingError> {
        if subframe_length == 0 {
            return Err(WindowingError::ZeroSubframeLength);
        }
        if stride == 0 {
            return Err(WindowingError::ZeroStride);
        }
        if stride > subframe_length {
            return Err(WindowingError::StrideExceedsSubframe {
                stride,
                subframe_length,
            });
        }
        Ok(Self {
            subframe_length,
            stride,
        })
    }

    pub fn subframe_length(&self) -> usize {
        self.subframe_length
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The length of every window ending at or after index `subframe_length - 1`.
    pub fn max_window_len(&self) -> usize {
        self.subframe_length.div_ceil(self.stride)
    }

    /// Extracts the window ending at index `end`.
    pub fn window_at<T: Clone>(&self, source: &[T], end: usize) -> Window<T> {
        let mut window = (0..self.subframe_length)
            .step_by(self.stride)
            .map_while(|offset| end.checked_sub(offset))
            .filter_map(|index| source.get(index).cloned())
            .collect::<Vec<_>>();
        window.reverse();
        window
    }

    /// Extracts one window per sample of `source`, in order.
    pub fn batch<T: Clone>(&self, source: &[T]) -> Vec<Window<T>> {
        source.subframes(*self).collect()
    }

    /// Windows a multi-column source.
    ///
    /// Rows are formed by zipping the columns, and each window is flattened row by row,
    /// so a window of `k` rows over `c` columns has `k·c` values.
    pub fn batch_columns(&self, columns: &[Vec<Real>]) -> Result<Vec<Window>, WindowingError> {
        let expected = columns.first().map(Vec::len).unwrap_or_default();
        if let Some((index, column)) = columns
            .iter()
            .enumerate()
            .find(|(_, column)| column.len() != expected)
        {
            return Err(WindowingError::RaggedColumns {
                index,
                length: column.len(),
                expected,
            });
        }
        let rows = (0..expected)
            .map(|row| columns.iter().map(|column| column[row]).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        Ok(rows
            .subframes(*self)
            .map(|window| window.into_iter().flatten().collect())
            .collect())
    }
}

/// Extracts one window per sample of `signal`, in order.
pub fn batch(
    signal: &[Real],
    subframe_length: usize,
    stride: usize,
) -> Result<Vec<Window>, WindowingError> {
    Ok(Windower::new(subframe_length, stride)?.batch(signal))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<Real> {
        (0..len).map(|i| i as Real).collect()
    }

    #[test]
    fn invalid_windowers() {
        assert!(matches!(
            Windower::new(0, 1),
            Err(WindowingError::ZeroSubframeLength)
        ));
        assert!(matches!(Windower::new(5, 0), Err(WindowingError::ZeroStride)));
        let error = Windower::new(5, 6).unwrap_err();
        assert!(matches!(
            error,
            WindowingError::StrideExceedsSubframe {
                stride: 6,
                subframe_length: 5
            }
        ));
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn unit_stride() {
        let windows = batch(&ramp(10), 3, 1).unwrap();
        assert_eq!(windows.len(), 10);
        assert_eq!(windows[0], vec![0.0]);
        assert_eq!(windows[1], vec![0.0, 1.0]);
        assert_eq!(windows[2], vec![0.0, 1.0, 2.0]);
        assert_eq!(windows[5], vec![3.0, 4.0, 5.0]);
        assert_eq!(windows[9], vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn wide_stride() {
        let windows = batch(&ramp(10), 5, 2).unwrap();
        assert_eq!(windows[0], vec![0.0]);
        assert_eq!(windows[1], vec![1.0]);
        assert_eq!(windows[2], vec![0.0, 2.0]);
        assert_eq!(windows[3], vec![1.0, 3.0]);
        assert_eq!(windows[4], vec![0.0, 2.0, 4.0]);
        assert_eq!(windows[6], vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn leading_windows_do_not_wrap() {
        let signal = ramp(20);
        let windows = batch(&signal, 8, 1).unwrap();
        for (end, window) in windows.iter().enumerate().take(8) {
            assert_eq!(window.len(), end + 1);
            assert!(window.iter().all(|&v| v <= end as Real));
        }
    }

    #[test]
    fn window_lengths() {
        let signal = ramp(60);
        for subframe_length in 1..12 {
            for stride in 1..=subframe_length {
                let windower = Windower::new(subframe_length, stride).unwrap();
                let windows = windower.batch(&signal);
                assert_eq!(windows.len(), signal.len());
                for (end, window) in windows.iter().enumerate() {
                    assert!(window.len() <= windower.max_window_len());
                    assert!(window.windows(2).all(|pair| pair[0] < pair[1]));
                    assert_eq!(window.last(), Some(&(end as Real)));
                    if end >= subframe_length {
                        assert_eq!(window.len(), windower.max_window_len());
                    }
                }
            }
        }
    }

    #[test]
    fn stride_equal_to_subframe_gives_single_samples() {
        let windows = batch(&ramp(6), 4, 4).unwrap();
        assert!(windows.iter().all(|window| window.len() == 1));
    }

    #[test]
    fn multi_column() {
        let windower = Windower::new(2, 1).unwrap();
        let windows = windower
            .batch_columns(&[vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0]])
            .unwrap();
        assert_eq!(
            windows,
            vec![
                vec![1.0, 10.0],
                vec![1.0, 10.0, 2.0, 20.0],
                vec![2.0, 20.0, 3.0, 30.0],
            ]
        );
    }

    #[test]
    fn ragged_columns() {
        let windower = Windower::new(2, 1).unwrap();
        assert!(matches!(
            windower.batch_columns(&[vec![1.0, 2.0], vec![1.0]]),
            Err(WindowingError::RaggedColumns {
                index: 1,
                length: 1,
                expected: 2
            })
        ));
        assert!(windower.batch_columns(&[]).unwrap().is_empty());
    }
}
