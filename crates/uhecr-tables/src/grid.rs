//! The equidistant log10(Lorentz factor) grid and interpolation helpers.

/// An equidistant grid over `[min, max]` with `points` nodes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogGrid {
    /// Lower edge (inclusive node).
    pub min: f64,
    /// Upper edge (inclusive node).
    pub max: f64,
    /// Number of nodes.
    pub points: usize,
}

/// The grid shared by every isotope table: log10(γ) from 4 to 14 in 251 points.
pub const LORENTZ_GRID: LogGrid = LogGrid {
    min: 4.0,
    max: 14.0,
    points: 251,
};

impl LogGrid {
    /// Node spacing.
    pub fn spacing(&self) -> f64 {
        (self.max - self.min) / (self.points - 1) as f64
    }

    /// Whether `lg` lies strictly inside the tabulated window.
    ///
    /// Values on or beyond either edge are outside: no tabulated
    /// interaction applies there.
    pub fn contains(&self, lg: f64) -> bool {
        lg > self.min && lg < self.max
    }

    /// Index of the node closest to `lg`, clamped to the grid.
    pub fn nearest_index(&self, lg: f64) -> usize {
        let p = ((lg - self.min) / (self.max - self.min) * (self.points - 1) as f64).round();
        if p.is_nan() || p <= 0.0 {
            0
        } else {
            (p as usize).min(self.points - 1)
        }
    }

    /// Linear interpolation of `values` (sampled on this grid) at `lg`.
    ///
    /// Clamps to the edge values outside the grid.
    pub fn interpolate(&self, lg: f64, values: &[f64]) -> f64 {
        interpolate_equidistant(lg, self.min, self.max, values)
    }
}

/// Linear interpolation of `values`, sampled equidistantly on `[lo, hi]`, at `x`.
///
/// Returns the first/last value for `x` outside the range, and 0 for an
/// empty table.
pub fn interpolate_equidistant(x: f64, lo: f64, hi: f64, values: &[f64]) -> f64 {
    let (first, last) = match (values.first(), values.last()) {
        (Some(&f), Some(&l)) => (f, l),
        _ => return 0.0,
    };
    if x <= lo || values.len() == 1 {
        return first;
    }
    if x >= hi {
        return last;
    }
    let dx = (hi - lo) / (values.len() - 1) as f64;
    let p = (x - lo) / dx;
    let i = (p.floor() as usize).min(values.len() - 2);
    values[i] + (p - i as f64) * (values[i + 1] - values[i])
}

/// Linear interpolation in a table with ascending, not necessarily
/// equidistant abscissae.
///
/// Returns the first/last ordinate outside the tabulated range.
pub fn interpolate(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }
    let i = xs[..n].partition_point(|&v| v <= x);
    let (x0, x1) = (xs[i - 1], xs[i]);
    let (y0, y1) = (ys[i - 1], ys[i]);
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn grid_spacing_and_nodes() {
        assert!((LORENTZ_GRID.spacing() - 0.04).abs() < 1e-12);
        assert_eq!(LORENTZ_GRID.nearest_index(4.0), 0);
        assert_eq!(LORENTZ_GRID.nearest_index(14.0), 250);
        assert_eq!(LORENTZ_GRID.nearest_index(4.04), 1);
        assert_eq!(LORENTZ_GRID.nearest_index(4.059), 1);
        assert_eq!(LORENTZ_GRID.nearest_index(4.061), 2);
        assert_eq!(LORENTZ_GRID.nearest_index(-3.0), 0);
        assert_eq!(LORENTZ_GRID.nearest_index(99.0), 250);
    }

    #[test]
    fn window_is_open() {
        assert!(!LORENTZ_GRID.contains(4.0));
        assert!(!LORENTZ_GRID.contains(14.0));
        assert!(LORENTZ_GRID.contains(4.0001));
        assert!(!LORENTZ_GRID.contains(f64::NAN));
    }

    #[test]
    fn equidistant_interpolation_hits_nodes_and_midpoints() {
        let values = [0.0, 10.0, 20.0, 40.0];
        assert_eq!(interpolate_equidistant(0.0, 0.0, 3.0, &values), 0.0);
        assert_eq!(interpolate_equidistant(1.0, 0.0, 3.0, &values), 10.0);
        assert_eq!(interpolate_equidistant(2.5, 0.0, 3.0, &values), 30.0);
        assert_eq!(interpolate_equidistant(-1.0, 0.0, 3.0, &values), 0.0);
        assert_eq!(interpolate_equidistant(7.0, 0.0, 3.0, &values), 40.0);
        assert_eq!(interpolate_equidistant(1.0, 0.0, 3.0, &[]), 0.0);
    }

    #[test]
    fn general_interpolation() {
        let xs = [1.0, 2.0, 4.0];
        let ys = [10.0, 20.0, 0.0];
        assert_eq!(interpolate(1.5, &xs, &ys), 15.0);
        assert_eq!(interpolate(3.0, &xs, &ys), 10.0);
        assert_eq!(interpolate(0.0, &xs, &ys), 10.0);
        assert_eq!(interpolate(5.0, &xs, &ys), 0.0);
    }

    proptest! {
        #[test]
        fn interpolation_stays_within_node_bounds(
            values in proptest::collection::vec(0.0f64..1e3, 2..50),
            x in -1.0f64..2.0,
        ) {
            let y = interpolate_equidistant(x, 0.0, 1.0, &values);
            let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(y >= lo - 1e-9 && y <= hi + 1e-9);
        }

        #[test]
        fn nearest_index_within_grid(lg in -100.0f64..100.0) {
            prop_assert!(LORENTZ_GRID.nearest_index(lg) < LORENTZ_GRID.points);
        }
    }
}
