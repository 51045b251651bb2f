//! Strongly-typed particle identifiers.
//!
//! Particles are identified by their PDG Monte-Carlo code. Nuclei use the
//! ten-digit form `10LZZZAAAI` with `L = I = 0`, i.e.
//! `1_000_000_000 + 10_000 * Z + 10 * A`.

use std::fmt;

use crate::error::CoreError;

/// Largest mass number representable in the nucleus code.
pub const MAX_MASS_NUMBER: u32 = 999;

const NUCLEUS_BASE: i32 = 1_000_000_000;

/// PDG particle code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub i32);

impl ParticleId {
    /// Electron.
    pub const ELECTRON: Self = Self(11);
    /// Positron.
    pub const POSITRON: Self = Self(-11);
    /// Electron neutrino.
    pub const NU_E: Self = Self(12);
    /// Electron anti-neutrino.
    pub const ANTI_NU_E: Self = Self(-12);
    /// Muon neutrino.
    pub const NU_MU: Self = Self(14);
    /// Muon anti-neutrino.
    pub const ANTI_NU_MU: Self = Self(-14);
    /// Photon.
    pub const PHOTON: Self = Self(22);
    /// Free neutron in nucleus notation (A = 1, Z = 0).
    pub const NEUTRON: Self = Self(NUCLEUS_BASE + 10);
    /// Proton in nucleus notation (A = 1, Z = 1).
    pub const PROTON: Self = Self(NUCLEUS_BASE + 10_000 + 10);

    /// Build the code of a nucleus with mass number `a` and charge number `z`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidNucleus`] if `a == 0`, `z > a`, or `a`
    /// exceeds [`MAX_MASS_NUMBER`].
    pub fn nucleus(a: u32, z: u32) -> Result<Self, CoreError> {
        if a == 0 || z > a || a > MAX_MASS_NUMBER {
            return Err(CoreError::InvalidNucleus {
                mass_number: a as i64,
                charge_number: z as i64,
            });
        }
        Ok(Self(NUCLEUS_BASE + 10_000 * z as i32 + 10 * a as i32))
    }

    /// Build a nucleus code from signed counts, as produced by channel arithmetic.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidNucleus`] for negative or inconsistent counts.
    pub fn nucleus_signed(a: i64, z: i64) -> Result<Self, CoreError> {
        if a <= 0 || z < 0 || z > a || a > MAX_MASS_NUMBER as i64 {
            return Err(CoreError::InvalidNucleus {
                mass_number: a,
                charge_number: z,
            });
        }
        Self::nucleus(a as u32, z as u32)
    }

    /// Whether this code denotes a nucleus (including single nucleons).
    pub fn is_nucleus(self) -> bool {
        self.0 >= NUCLEUS_BASE
    }

    /// Mass number A. Zero for non-nuclei.
    pub fn mass_number(self) -> u32 {
        if !self.is_nucleus() {
            return 0;
        }
        ((self.0 / 10) % 1000) as u32
    }

    /// Charge number in units of the elementary charge.
    ///
    /// Z for nuclei, ∓1 for electrons/positrons, zero otherwise.
    pub fn charge_number(self) -> i32 {
        if self.is_nucleus() {
            return (self.0 / 10_000) % 1000;
        }
        match self {
            Self::ELECTRON => -1,
            Self::POSITRON => 1,
            _ => 0,
        }
    }

    /// Neutron number N = A - Z. Zero for non-nuclei.
    pub fn neutron_number(self) -> u32 {
        self.mass_number()
            .saturating_sub(self.charge_number().max(0) as u32)
    }

    /// The (Z, N) composition of a nucleus, or `None` for other particles.
    pub fn isotope(self) -> Option<Isotope> {
        if !self.is_nucleus() {
            return None;
        }
        Some(Isotope::new(self.charge_number() as u32, self.neutron_number()))
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nucleus() {
            write!(f, "A={} Z={}", self.mass_number(), self.charge_number())
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<i32> for ParticleId {
    fn from(v: i32) -> Self {
        Self(v)
    }
}

/// Composition of a nucleus: proton count `z` and neutron count `n`.
///
/// Used as the key of every isotope-indexed table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Isotope {
    /// Proton count.
    pub z: u32,
    /// Neutron count.
    pub n: u32,
}

impl Isotope {
    /// Construct from proton and neutron counts.
    pub const fn new(z: u32, n: u32) -> Self {
        Self { z, n }
    }

    /// Mass number A = Z + N.
    pub const fn mass_number(self) -> u32 {
        self.z + self.n
    }

    /// The nucleus code for this composition.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidNucleus`] for the empty composition.
    pub fn particle_id(self) -> Result<ParticleId, CoreError> {
        ParticleId::nucleus(self.mass_number(), self.z)
    }
}

impl fmt::Display for Isotope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(Z={}, N={})", self.z, self.n)
    }
}
