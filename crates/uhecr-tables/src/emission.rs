//! De-excitation photon lines, keyed by parent and daughter isotope.

use indexmap::IndexMap;
use uhecr_core::Isotope;

use crate::error::TableError;
use crate::grid::{LogGrid, LORENTZ_GRID};
use crate::rate::IN_MEMORY;

/// A discrete photon line emitted by the daughter of a transition.
#[derive(Clone, Debug, PartialEq)]
pub struct PhotonLine {
    /// Rest-frame photon energy [J].
    pub energy: f64,
    /// Emission probability per grid node.
    pub probabilities: Vec<f64>,
}

impl PhotonLine {
    /// Emission probability at grid node `index` (0 beyond the curve).
    pub fn probability_at(&self, index: usize) -> f64 {
        self.probabilities.get(index).copied().unwrap_or(0.0)
    }
}

/// Photon lines per (parent, daughter) transition, in file order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhotonEmissionTable {
    lines: IndexMap<(Isotope, Isotope), Vec<PhotonLine>>,
}

impl PhotonEmissionTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The sampling grid of the probability curves.
    pub fn grid(&self) -> &LogGrid {
        &LORENTZ_GRID
    }

    /// Append a photon line for the `parent -> daughter` transition.
    ///
    /// # Errors
    ///
    /// [`TableError::WrongLength`] if the probability curve does not match
    /// the grid.
    pub fn push(
        &mut self,
        parent: Isotope,
        daughter: Isotope,
        line: PhotonLine,
    ) -> Result<(), TableError> {
        if line.probabilities.len() != LORENTZ_GRID.points {
            return Err(TableError::WrongLength {
                source: IN_MEMORY.to_string(),
                line: 0,
                expected: LORENTZ_GRID.points,
                found: line.probabilities.len(),
            });
        }
        self.lines.entry((parent, daughter)).or_default().push(line);
        Ok(())
    }

    /// Photon lines of a transition; empty when none are tabulated.
    pub fn lines(&self, parent: Isotope, daughter: Isotope) -> &[PhotonLine] {
        self.lines
            .get(&(parent, daughter))
            .map_or(&[], Vec::as_slice)
    }

    /// Number of transitions with at least one line.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uhecr_core::units::MEV;

    #[test]
    fn lines_are_keyed_by_transition() {
        let mut t = PhotonEmissionTable::new();
        let c12 = Isotope::new(6, 6);
        let c11 = Isotope::new(6, 5);
        t.push(
            c12,
            c11,
            PhotonLine {
                energy: 2.0 * MEV,
                probabilities: vec![1.0; 251],
            },
        )
        .unwrap();
        t.push(
            c12,
            c11,
            PhotonLine {
                energy: 4.4 * MEV,
                probabilities: vec![0.5; 251],
            },
        )
        .unwrap();
        assert_eq!(t.lines(c12, c11).len(), 2);
        assert_eq!(t.lines(c11, c12).len(), 0);
        assert_eq!(t.lines(c12, c11)[1].probability_at(3), 0.5);
        assert_eq!(t.lines(c12, c11)[1].probability_at(400), 0.0);
    }

    #[test]
    fn wrong_length_rejected() {
        let mut t = PhotonEmissionTable::new();
        let err = t
            .push(
                Isotope::new(1, 1),
                Isotope::new(1, 0),
                PhotonLine {
                    energy: 1.0,
                    probabilities: vec![],
                },
            )
            .unwrap_err();
        assert!(matches!(err, TableError::WrongLength { found: 0, .. }));
    }
}
