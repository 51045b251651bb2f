//! Channel selection from branching ratios.
//!
//! One uniform draw is walked down the branch list, subtracting each
//! ratio until the remainder is no longer positive. Ratios of a fixed
//! isotope and grid point may sum to less than one; what happens to a
//! draw that lands in that residual is a [`ResidualPolicy`].

use uhecr_core::{Isotope, RandomSource};
use uhecr_tables::BranchingTable;

/// How branching ratios are read off the log-Lorentz grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IndexPolicy {
    /// Ratios at the nearest grid node.
    #[default]
    Nearest,
    /// Ratios linearly interpolated between nodes.
    Interpolated,
}

impl IndexPolicy {
    /// Branching ratios of `isotope` at log10(γ) = `lg` under this policy.
    pub fn ratios(self, table: &BranchingTable, isotope: Isotope, lg: f64) -> Vec<f64> {
        match self {
            Self::Nearest => table.ratios_nearest(isotope, lg),
            Self::Interpolated => table.ratios_interpolated(isotope, lg),
        }
    }
}

/// Outcome of a draw that exceeds the summed branching ratios.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResidualPolicy {
    /// No reaction takes place.
    #[default]
    NoReaction,
    /// The last branch with a positive ratio is taken.
    LastBranch,
}

/// Weighted discrete sampling over reaction channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelSelector {
    residual: ResidualPolicy,
}

impl ChannelSelector {
    /// A selector with the given residual policy.
    pub fn new(residual: ResidualPolicy) -> Self {
        Self { residual }
    }

    /// The residual policy.
    pub fn residual(&self) -> ResidualPolicy {
        self.residual
    }

    /// Select a branch index for the uniform draw `u` in `[0, 1)`.
    ///
    /// Branches with non-positive or non-finite ratios are never
    /// selected. Returns `None` for an empty list, and for a draw in the
    /// residual under [`ResidualPolicy::NoReaction`].
    pub fn select(&self, ratios: &[f64], u: f64) -> Option<usize> {
        let mut remainder = u;
        let mut last = None;
        for (i, &ratio) in ratios.iter().enumerate() {
            if !(ratio.is_finite() && ratio > 0.0) {
                continue;
            }
            last = Some(i);
            remainder -= ratio;
            if remainder <= 0.0 {
                return Some(i);
            }
        }
        match self.residual {
            ResidualPolicy::NoReaction => {
                log::debug!(
                    "channel draw {u} exceeds branching sum {}, no reaction",
                    u - remainder
                );
                None
            }
            ResidualPolicy::LastBranch => last,
        }
    }

    /// Draw one uniform value from `rng` and [`select`](Self::select).
    pub fn sample(&self, ratios: &[f64], rng: &mut dyn RandomSource) -> Option<usize> {
        let u = rng.uniform();
        self.select(ratios, u)
    }
}
