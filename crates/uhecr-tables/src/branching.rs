//! Photodisintegration branching ratios.
//!
//! A channel is a six-digit integer `nphHta`: the multiplicities of
//! neutrons, protons, deuterons, tritons, helium-3 and helium-4 nuclei
//! knocked out of the parent.

use std::fmt;

use uhecr_core::Isotope;

use crate::error::TableError;
use crate::grid::{LogGrid, LORENTZ_GRID};
use crate::isotope::IsotopeTable;
use crate::rate::IN_MEMORY;

/// Digit-encoded product multiplicities of a disintegration channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Channel(pub u32);

impl Channel {
    fn digit(self, place: u32) -> u32 {
        (self.0 / place) % 10
    }

    /// Number of emitted neutrons.
    pub fn neutrons(self) -> u32 {
        self.digit(100_000)
    }

    /// Number of emitted protons.
    pub fn protons(self) -> u32 {
        self.digit(10_000)
    }

    /// Number of emitted deuterons.
    pub fn deuterons(self) -> u32 {
        self.digit(1_000)
    }

    /// Number of emitted tritons.
    pub fn tritons(self) -> u32 {
        self.digit(100)
    }

    /// Number of emitted helium-3 nuclei.
    pub fn helions(self) -> u32 {
        self.digit(10)
    }

    /// Number of emitted alpha particles.
    pub fn alphas(self) -> u32 {
        self.digit(1)
    }

    /// Total mass number carried away by the products.
    pub fn mass_loss(self) -> u32 {
        self.neutrons()
            + self.protons()
            + 2 * self.deuterons()
            + 3 * self.tritons()
            + 3 * self.helions()
            + 4 * self.alphas()
    }

    /// Total charge number carried away by the products.
    pub fn charge_loss(self) -> u32 {
        self.protons() + self.deuterons() + self.tritons() + 2 * self.helions() + 2 * self.alphas()
    }

    /// The daughter of `parent`, or `None` if the channel removes more
    /// nucleons than the parent holds.
    pub fn daughter(self, parent: Isotope) -> Option<Isotope> {
        let dz = self.charge_loss();
        let dn = self.mass_loss() - dz;
        Some(Isotope::new(
            parent.z.checked_sub(dz)?,
            parent.n.checked_sub(dn)?,
        ))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

/// One reaction channel with its branching-ratio curve.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    /// The products of this channel.
    pub channel: Channel,
    /// Branching ratio per grid node.
    pub ratios: Vec<f64>,
}

impl Branch {
    /// Branching ratio at grid node `index` (0 beyond the curve).
    pub fn ratio_at(&self, index: usize) -> f64 {
        self.ratios.get(index).copied().unwrap_or(0.0)
    }
}

/// Branching ratios per isotope, in file order.
#[derive(Clone, Debug, PartialEq)]
pub struct BranchingTable {
    grid: LogGrid,
    branches: IsotopeTable<Vec<Branch>>,
}

impl Default for BranchingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BranchingTable {
    /// An empty table on the standard Lorentz grid.
    pub fn new() -> Self {
        Self {
            grid: LORENTZ_GRID,
            branches: IsotopeTable::new(),
        }
    }

    /// The sampling grid.
    pub fn grid(&self) -> &LogGrid {
        &self.grid
    }

    /// Append a branch for `isotope`.
    ///
    /// # Errors
    ///
    /// [`TableError::WrongLength`] if the ratio curve does not match the
    /// grid, [`TableError::IsotopeOutOfRange`] if the isotope is not covered.
    pub fn push(&mut self, isotope: Isotope, branch: Branch) -> Result<(), TableError> {
        if branch.ratios.len() != self.grid.points {
            return Err(TableError::WrongLength {
                source: IN_MEMORY.to_string(),
                line: 0,
                expected: self.grid.points,
                found: branch.ratios.len(),
            });
        }
        let list = self
            .branches
            .entry_or_default(isotope)
            .ok_or_else(|| TableError::IsotopeOutOfRange {
                source: IN_MEMORY.to_string(),
                line: 0,
                z: isotope.z,
                n: isotope.n,
            })?;
        list.push(branch);
        Ok(())
    }

    /// Branches of `isotope`; empty when none are tabulated.
    pub fn branches(&self, isotope: Isotope) -> &[Branch] {
        self.branches.get(isotope).map_or(&[], Vec::as_slice)
    }

    /// Branching ratios of `isotope` at the grid node nearest to `lg`.
    pub fn ratios_nearest(&self, isotope: Isotope, lg: f64) -> Vec<f64> {
        let index = self.grid.nearest_index(lg);
        self.branches(isotope).iter().map(|b| b.ratio_at(index)).collect()
    }

    /// Branching ratios of `isotope` linearly interpolated at `lg`.
    pub fn ratios_interpolated(&self, isotope: Isotope, lg: f64) -> Vec<f64> {
        self.branches(isotope)
            .iter()
            .map(|b| self.grid.interpolate(lg, &b.ratios))
            .collect()
    }

    /// Branching-ratio weighted mean number of nucleons lost per
    /// interaction, using interpolated ratios.
    pub fn mean_mass_loss(&self, isotope: Isotope, lg: f64) -> f64 {
        self.branches(isotope)
            .iter()
            .map(|b| self.grid.interpolate(lg, &b.ratios) * b.channel.mass_loss() as f64)
            .sum()
    }

    /// Number of isotopes with at least one branch.
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Whether no branches are stored.
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}
