//! One-dimensional curves and row-wise cumulative distributions.

use crate::grid::interpolate;

/// A tabulated function y(x) with ascending abscissae.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TabulatedCurve {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl TabulatedCurve {
    /// Build a curve from paired samples.
    ///
    /// Returns `None` if the lengths differ or the abscissae are not
    /// strictly ascending.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Option<Self> {
        if xs.len() != ys.len() || xs.windows(2).any(|w| !(w[0] < w[1])) {
            return None;
        }
        Some(Self { xs, ys })
    }

    /// Abscissae.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Ordinates.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// First and last abscissa, `None` for an empty curve.
    pub fn domain(&self) -> Option<(f64, f64)> {
        Some((*self.xs.first()?, *self.xs.last()?))
    }

    /// Last sample, `None` for an empty curve.
    pub fn last(&self) -> Option<(f64, f64)> {
        Some((*self.xs.last()?, *self.ys.last()?))
    }

    /// Linear interpolation, clamped to the edge values.
    pub fn value(&self, x: f64) -> f64 {
        interpolate(x, &self.xs, &self.ys)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Whether the curve has no samples.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// Rows of unnormalised cumulative distributions, one per condition bin.
///
/// Each row is non-decreasing; sampling a bin from a row is done with
/// [`RandomSource::rand_bin`](uhecr_core::RandomSource::rand_bin).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CdfTable {
    rows: Vec<Vec<f64>>,
}

impl CdfTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from density rows, accumulating each row in place.
    pub fn from_densities(rows: Vec<Vec<f64>>) -> Self {
        let mut table = Self::new();
        for row in rows {
            table.push_density(row);
        }
        table
    }

    /// Append a density row, stored as its running sum.
    pub fn push_density(&mut self, mut row: Vec<f64>) {
        for j in 1..row.len() {
            row[j] += row[j - 1];
        }
        self.rows.push(row);
    }

    /// The cumulative row `index`, `None` beyond the table.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// The cumulative row `index` clamped into the table.
    pub fn row_clamped(&self, index: usize) -> Option<&[f64]> {
        let last = self.rows.len().checked_sub(1)?;
        self.row(index.min(last))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_requires_ascending_abscissae() {
        assert!(TabulatedCurve::new(vec![1.0, 2.0], vec![1.0]).is_none());
        assert!(TabulatedCurve::new(vec![2.0, 1.0], vec![1.0, 1.0]).is_none());
        assert!(TabulatedCurve::new(vec![1.0, 1.0], vec![1.0, 1.0]).is_none());
        let c = TabulatedCurve::new(vec![1.0, 3.0], vec![0.0, 4.0]).unwrap();
        assert_eq!(c.value(2.0), 2.0);
        assert_eq!(c.domain(), Some((1.0, 3.0)));
        assert_eq!(c.last(), Some((3.0, 4.0)));
    }

    #[test]
    fn densities_are_accumulated() {
        let t = CdfTable::from_densities(vec![vec![1.0, 0.0, 2.0], vec![0.5, 0.5]]);
        assert_eq!(t.row(0), Some(&[1.0, 1.0, 3.0][..]));
        assert_eq!(t.row(1), Some(&[0.5, 1.0][..]));
        assert_eq!(t.row(2), None);
        assert_eq!(t.row_clamped(9), Some(&[0.5, 1.0][..]));
        assert_eq!(CdfTable::new().row_clamped(0), None);
    }
}
