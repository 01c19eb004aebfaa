//! Piecewise-linear weight tables.
//!
//! A table maps a non-negative raw quantity (a unit count, a resource
//! total) to a score contribution by interpolating between breakpoints.

use serde::{Deserialize, Serialize};

/// Reasons a weight table is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("table has no breakpoints")]
    Empty,

    #[error("breakpoint {index} has negative domain value {x}")]
    NegativeDomain { index: usize, x: f64 },

    #[error("breakpoint {index} is not strictly greater than the previous one")]
    Unsorted { index: usize },

    #[error("breakpoint {index} is not finite")]
    NonFinite { index: usize },
}

/// Breakpoints `(x, y)` with strictly increasing, non-negative `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(f64, f64)>", into = "Vec<(f64, f64)>")]
pub struct WeightTable {
    points: Vec<(f64, f64)>,
}

impl WeightTable {
    /// Builds a table from explicit breakpoints, validating the domain.
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self, TableError> {
        let table = WeightTable { points };
        table.validate()?;
        Ok(table)
    }

    /// Builds a table whose breakpoints sit at `0, 1, 2, ...`.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        WeightTable {
            points: values
                .into_iter()
                .enumerate()
                .map(|(i, y)| (i as f64, y))
                .collect(),
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.points.is_empty() {
            return Err(TableError::Empty);
        }
        for (index, &(x, y)) in self.points.iter().enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(TableError::NonFinite { index });
            }
            if x < 0.0 {
                return Err(TableError::NegativeDomain { index, x });
            }
            if index > 0 && x <= self.points[index - 1].0 {
                return Err(TableError::Unsorted { index });
            }
        }
        Ok(())
    }

    /// Interpolates the weight for `x`.
    ///
    /// Inputs past the last breakpoint take the last value. `x` must not
    /// be negative; callers clamp first.
    pub fn lookup(&self, x: f64) -> f64 {
        debug_assert!(x >= 0.0, "weight table lookup with negative input {x}");
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(f), Some(l)) => (*f, *l),
            _ => return 0.0,
        };
        if x <= first.0 {
            return first.1;
        }
        if x >= last.0 {
            return last.1;
        }
        for pair in self.points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            if x <= x1 {
                let t = (x - x0) / (x1 - x0);
                return y0 + t * (y1 - y0);
            }
        }
        last.1
    }
}

impl TryFrom<Vec<(f64, f64)>> for WeightTable {
    type Error = TableError;

    fn try_from(points: Vec<(f64, f64)>) -> Result<Self, Self::Error> {
        WeightTable::new(points)
    }
}

impl From<WeightTable> for Vec<(f64, f64)> {
    fn from(table: WeightTable) -> Self {
        table.points
    }
}
