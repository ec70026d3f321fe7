//! Series payloads
//!
//! A series is a dense `[T, 10]` array: column 0 is the global step and
//! columns 1-9 hold the value distribution at [`BASIS_POINTS`]. Scalar
//! indicators use the same layout with all nine value columns equal.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Percentiles summarised per step, in column order 1-9.
pub const BASIS_POINTS: [f64; 9] = [
    0.0, 6.68, 15.87, 30.85, 50.00, 69.15, 84.13, 93.32, 100.00,
];

/// Column count of a series row.
pub const SERIES_COLUMNS: usize = 10;

/// Column holding the global step.
pub const STEP_COLUMN: usize = 0;

/// Column holding the 50th percentile.
pub const MEDIAN_COLUMN: usize = 5;

/// One row: `[step, v1, .., v9]`.
pub type SeriesRow = [f64; SERIES_COLUMNS];

/// Dense `[T, 10]` time series of distribution summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    rows: Vec<SeriesRow>,
}

impl Series {
    /// Create a series from pre-summarised rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `rows` is empty (absence of data is
    /// `None`, never an empty series) or steps are not ascending.
    pub fn from_rows(rows: Vec<SeriesRow>) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::InvalidInput(
                "series must have at least one row".to_string(),
            ));
        }
        if rows
            .windows(2)
            .any(|w| w[1][STEP_COLUMN] < w[0][STEP_COLUMN])
        {
            return Err(Error::InvalidInput(
                "series steps must be ascending".to_string(),
            ));
        }
        Ok(Self { rows })
    }

    /// Summarise raw per-step samples into a series.
    ///
    /// Steps must arrive in ascending order (e.g. from a `BTreeMap`). Steps
    /// without finite samples are skipped; `None` if nothing remains.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_samples<'a, I>(steps: I) -> Option<Self>
    where
        I: IntoIterator<Item = (u64, &'a [f64])>,
    {
        let mut rows = Vec::new();
        let mut sorted = Vec::new();
        for (step, samples) in steps {
            sorted.clear();
            sorted.extend(samples.iter().copied().filter(|v| v.is_finite()));
            if sorted.is_empty() {
                continue;
            }
            sorted.sort_by(f64::total_cmp);

            let mut row = [0.0; SERIES_COLUMNS];
            row[STEP_COLUMN] = step as f64;
            for (column, &p) in BASIS_POINTS.iter().enumerate() {
                row[column + 1] = percentile(&sorted, p);
            }
            rows.push(row);
        }

        if rows.is_empty() {
            None
        } else {
            Some(Self { rows })
        }
    }

    /// Number of timesteps `T`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false for a constructed series; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Shape `(T, C)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), SERIES_COLUMNS)
    }

    /// All rows.
    #[must_use]
    pub fn rows(&self) -> &[SeriesRow] {
        &self.rows
    }

    /// Value at `(t, c)`, if in bounds.
    #[must_use]
    pub fn get(&self, t: usize, c: usize) -> Option<f64> {
        self.rows.get(t).and_then(|row| row.get(c)).copied()
    }

    /// One column as a vector.
    ///
    /// # Panics
    ///
    /// Panics if `column >= SERIES_COLUMNS`.
    #[must_use]
    pub fn column(&self, column: usize) -> Vec<f64> {
        assert!(column < SERIES_COLUMNS, "column {column} out of range");
        self.rows.iter().map(|row| row[column]).collect()
    }

    /// Global steps (column 0).
    #[must_use]
    pub fn steps(&self) -> Vec<f64> {
        self.column(STEP_COLUMN)
    }

    /// `[T, 2]` projection of `(step, median)`.
    #[must_use]
    pub fn summary(&self) -> Vec<[f64; 2]> {
        self.rows
            .iter()
            .map(|row| [row[STEP_COLUMN], row[MEDIAN_COLUMN]])
            .collect()
    }
}

/// Linear interpolation between closest ranks of a sorted, non-empty slice.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let fraction = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * fraction
}
