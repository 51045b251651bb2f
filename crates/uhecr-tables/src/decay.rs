//! Nuclear decay modes and rest-frame lifetimes.

use std::fmt;

use uhecr_core::Isotope;

use crate::error::TableError;
use crate::isotope::IsotopeTable;
use crate::rate::IN_MEMORY;

/// Digit-encoded multiplicities of a decay channel: `β⁻ β⁺ α p n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecayChannel(pub u32);

impl DecayChannel {
    fn digit(self, place: u32) -> u32 {
        (self.0 / place) % 10
    }

    /// Number of β⁻ decays.
    pub fn beta_minus(self) -> u32 {
        self.digit(10_000)
    }

    /// Number of β⁺ decays.
    pub fn beta_plus(self) -> u32 {
        self.digit(1_000)
    }

    /// Number of emitted alpha particles.
    pub fn alphas(self) -> u32 {
        self.digit(100)
    }

    /// Number of emitted protons.
    pub fn protons(self) -> u32 {
        self.digit(10)
    }

    /// Number of emitted neutrons.
    pub fn neutrons(self) -> u32 {
        self.digit(1)
    }

    /// The daughter of `parent`, or `None` if the channel is not possible.
    pub fn daughter(self, parent: Isotope) -> Option<Isotope> {
        let z = parent.z as i64 + self.beta_minus() as i64
            - self.beta_plus() as i64
            - 2 * self.alphas() as i64
            - self.protons() as i64;
        let n = parent.n as i64 - self.beta_minus() as i64 + self.beta_plus() as i64
            - 2 * self.alphas() as i64
            - self.neutrons() as i64;
        if z < 0 || n < 0 || z + n == 0 {
            return None;
        }
        Some(Isotope::new(z as u32, n as u32))
    }
}

impl fmt::Display for DecayChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:05}", self.0)
    }
}

/// One decay mode of an isotope.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecayMode {
    /// The channel products.
    pub channel: DecayChannel,
    /// Partial rest-frame lifetime [s].
    pub lifetime: f64,
}

/// Decay modes per isotope; stable isotopes have no entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecayTable {
    modes: IsotopeTable<Vec<DecayMode>>,
}

impl DecayTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decay mode for `isotope`.
    ///
    /// Modes with a non-finite or non-positive lifetime are treated as
    /// stable and skipped.
    ///
    /// # Errors
    ///
    /// [`TableError::IsotopeOutOfRange`] if the isotope is not covered.
    pub fn push(&mut self, isotope: Isotope, mode: DecayMode) -> Result<(), TableError> {
        let list = self
            .modes
            .entry_or_default(isotope)
            .ok_or_else(|| TableError::IsotopeOutOfRange {
                source: IN_MEMORY.to_string(),
                line: 0,
                z: isotope.z,
                n: isotope.n,
            })?;
        if mode.lifetime.is_finite() && mode.lifetime > 0.0 {
            list.push(mode);
        }
        Ok(())
    }

    /// Decay modes of `isotope`; empty for stable or unknown isotopes.
    pub fn modes(&self, isotope: Isotope) -> &[DecayMode] {
        self.modes.get(isotope).map_or(&[], Vec::as_slice)
    }

    /// Number of isotopes with at least one decay mode.
    pub fn len(&self) -> usize {
        self.modes.iter().filter(|(_, m)| !m.is_empty()).count()
    }

    /// Whether no decay modes are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
