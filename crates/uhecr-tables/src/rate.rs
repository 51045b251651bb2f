//! Per-isotope interaction rates on the log-Lorentz grid.

use uhecr_core::Isotope;

use crate::error::TableError;
use crate::grid::{LogGrid, LORENTZ_GRID};
use crate::isotope::IsotopeTable;

/// Label used in errors for rows inserted programmatically.
pub(crate) const IN_MEMORY: &str = "<in-memory>";

/// Interaction rates [1/m] per isotope, sampled on a [`LogGrid`].
///
/// The table is redshift-agnostic: callers apply cosmological and
/// field-geometry scaling to the returned values.
#[derive(Clone, Debug, PartialEq)]
pub struct RateTable {
    grid: LogGrid,
    rows: IsotopeTable<Vec<f64>>,
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RateTable {
    /// An empty table on the standard Lorentz grid.
    pub fn new() -> Self {
        Self::with_grid(LORENTZ_GRID)
    }

    /// An empty table on a custom grid.
    pub fn with_grid(grid: LogGrid) -> Self {
        Self {
            grid,
            rows: IsotopeTable::new(),
        }
    }

    /// The sampling grid.
    pub fn grid(&self) -> &LogGrid {
        &self.grid
    }

    /// Store the rate curve of `isotope`, replacing any previous row.
    ///
    /// # Errors
    ///
    /// [`TableError::WrongLength`] if `values` does not match the grid,
    /// [`TableError::IsotopeOutOfRange`] if the isotope is not covered.
    pub fn insert(&mut self, isotope: Isotope, values: Vec<f64>) -> Result<(), TableError> {
        if values.len() != self.grid.points {
            return Err(TableError::WrongLength {
                source: IN_MEMORY.to_string(),
                line: 0,
                expected: self.grid.points,
                found: values.len(),
            });
        }
        self.rows
            .insert(isotope, values)
            .map(|_| ())
            .map_err(|_| TableError::IsotopeOutOfRange {
                source: IN_MEMORY.to_string(),
                line: 0,
                z: isotope.z,
                n: isotope.n,
            })
    }

    /// Whether a rate curve exists for `isotope`.
    pub fn contains(&self, isotope: Isotope) -> bool {
        self.rows.get(isotope).is_some()
    }

    /// The raw rate curve of `isotope`.
    pub fn row(&self, isotope: Isotope) -> Option<&[f64]> {
        self.rows.get(isotope).map(Vec::as_slice)
    }

    /// Interpolated rate [1/m] at log10(γ) = `lg`.
    ///
    /// `None` when the isotope has no data or `lg` lies outside the open
    /// grid window.
    pub fn rate(&self, isotope: Isotope, lg: f64) -> Option<f64> {
        if !self.grid.contains(lg) {
            return None;
        }
        let row = self.rows.get(isotope)?;
        Some(self.grid.interpolate(lg, row))
    }

    /// Mean free path [m], `f64::INFINITY` when no interaction applies.
    pub fn mean_free_path(&self, isotope: Isotope, lg: f64) -> f64 {
        match self.rate(isotope, lg) {
            Some(r) if r > 0.0 => 1.0 / r,
            _ => f64::INFINITY,
        }
    }

    /// Number of isotopes with data.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no data.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over isotopes with data.
    pub fn isotopes(&self) -> impl Iterator<Item = Isotope> + '_ {
        self.rows.iter().map(|(k, _)| k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Vec<f64> {
        (0..251).map(|i| i as f64).collect()
    }

    #[test]
    fn absent_isotope_has_infinite_mean_free_path() {
        let t = RateTable::new();
        assert_eq!(t.rate(Isotope::new(6, 6), 10.0), None);
        assert_eq!(t.mean_free_path(Isotope::new(6, 6), 10.0), f64::INFINITY);
    }

    #[test]
    fn out_of_window_is_none() {
        let mut t = RateTable::new();
        t.insert(Isotope::new(6, 6), ramp()).unwrap();
        assert_eq!(t.rate(Isotope::new(6, 6), 4.0), None);
        assert_eq!(t.rate(Isotope::new(6, 6), 14.0), None);
        assert_eq!(t.rate(Isotope::new(6, 6), 3.0), None);
        assert_eq!(t.mean_free_path(Isotope::new(6, 6), 15.0), f64::INFINITY);
    }

    #[test]
    fn interpolates_between_nodes() {
        let mut t = RateTable::new();
        t.insert(Isotope::new(2, 2), ramp()).unwrap();
        // Node spacing is 0.04 so lg = 4.06 sits halfway between nodes 1 and 2.
        let r = t.rate(Isotope::new(2, 2), 4.06).unwrap();
        assert!((r - 1.5).abs() < 1e-9);
        assert!((t.mean_free_path(Isotope::new(2, 2), 4.06) - 1.0 / 1.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_rows() {
        let mut t = RateTable::new();
        assert!(matches!(
            t.insert(Isotope::new(1, 0), vec![1.0; 10]),
            Err(TableError::WrongLength { expected: 251, found: 10, .. })
        ));
        assert!(matches!(
            t.insert(Isotope::new(27, 0), ramp()),
            Err(TableError::IsotopeOutOfRange { z: 27, n: 0, .. })
        ));
        assert!(t.is_empty());
    }

    #[test]
    fn zero_rate_is_infinite_path() {
        let mut t = RateTable::new();
        t.insert(Isotope::new(1, 1), vec![0.0; 251]).unwrap();
        assert_eq!(t.mean_free_path(Isotope::new(1, 1), 8.0), f64::INFINITY);
    }
}
