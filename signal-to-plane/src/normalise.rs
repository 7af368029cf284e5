//! Linear rescaling of score tables into a target range.
use crate::Real;
use complex_plane_common::ErrorKind;
use itertools::{Itertools, MinMaxResult};
use ndarray::{Array2, ArrayView1, Axis};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormaliseError {
    #[error("Lower bound {lower} must be finite and less than upper bound {upper}")]
    InvalidRange { lower: Real, upper: Real },
    #[error("Cannot rescale an empty table")]
    Empty,
    #[error("Column {column} is constant with value {value}")]
    ConstantColumn { column: usize, value: Real },
    #[error("Column {column} has non-finite value {value} at row {row}")]
    NonFiniteValue {
        column: usize,
        row: usize,
        value: Real,
    },
}

impl NormaliseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NormaliseError::InvalidRange { .. } => ErrorKind::Configuration,
            NormaliseError::Empty
            | NormaliseError::ConstantColumn { .. }
            | NormaliseError::NonFiniteValue { .. } => ErrorKind::DegenerateInput,
        }
    }
}

/// Maps the minimum of each column to `lower`, and the maximum to `upper`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxScaler {
    lower: Real,
    upper: Real,
}

/// The linear map taking `[min, max]` onto the scaler's range.
struct ColumnMap {
    min: Real,
    factor: Real,
    lower: Real,
}

impl ColumnMap {
    fn apply(&self, value: Real) -> Real {
        (value - self.min) * self.factor + self.lower
    }
}

impl MinMaxScaler {
    pub fn new(lower: Real, upper: Real) -> Result<Self, NormaliseError> {
        if lower.is_finite() && upper.is_finite() && lower < upper {
            Ok(Self { lower, upper })
        } else {
            Err(NormaliseError::InvalidRange { lower, upper })
        }
    }

    pub fn lower(&self) -> Real {
        self.lower
    }

    pub fn upper(&self) -> Real {
        self.upper
    }

    fn column_map(&self, column: usize, values: ArrayView1<Real>) -> Result<ColumnMap, NormaliseError> {
        if let Some((row, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(NormaliseError::NonFiniteValue { column, row, value });
        }
        match values.iter().copied().minmax() {
            MinMaxResult::NoElements => Err(NormaliseError::Empty),
            MinMaxResult::OneElement(value) => Err(NormaliseError::ConstantColumn { column, value }),
            MinMaxResult::MinMax(min, max) if min == max => {
                Err(NormaliseError::ConstantColumn { column, value: min })
            }
            MinMaxResult::MinMax(min, max) => Ok(ColumnMap {
                min,
                factor: (self.upper - self.lower) / (max - min),
                lower: self.lower,
            }),
        }
    }

    /// Rescales each column of `table` in place.
    ///
    /// Every column is checked before any is modified, so on failure `table` is unchanged.
    pub fn rescale_table(&self, table: &mut Array2<Real>) -> Result<(), NormaliseError> {
        if table.is_empty() {
            return Err(NormaliseError::Empty);
        }
        let maps = table
            .columns()
            .into_iter()
            .enumerate()
            .map(|(column, values)| self.column_map(column, values))
            .collect::<Result<Vec<_>, _>>()?;
        for (mut values, map) in table.axis_iter_mut(Axis(1)).zip(maps) {
            values.mapv_inplace(|value| map.apply(value));
        }
        Ok(())
    }

    /// Rescales a single column of values.
    pub fn rescale(&self, values: &[Real]) -> Result<Vec<Real>, NormaliseError> {
        let map = self.column_map(0, ArrayView1::from(values))?;
        Ok(values.iter().map(|&value| map.apply(value)).collect())
    }
}

/// Rescales each column of `table` so that its minimum is `lower` and its maximum is `upper`.
pub fn rescale(table: &Array2<Real>, lower: Real, upper: Real) -> Result<Array2<Real>, NormaliseError> {
    let mut rescaled = table.clone();
    MinMaxScaler::new(lower, upper)?.rescale_table(&mut rescaled)?;
    Ok(rescaled)
}
