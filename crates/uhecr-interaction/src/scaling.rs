//! Cosmological scaling of tabulated rates.
//!
//! Tables hold present-day rates. At redshift z the photon density grows
//! as (1+z)^3 and photon energies as (1+z); a rate per unit *physical*
//! distance therefore scales as (1+z)^3, while a rate per unit *comoving*
//! distance picks up one power less. Both conventions are used: stepping
//! consumes comoving step lengths, loss lengths are physical.

use uhecr_core::{Candidate, PhotonField};

/// Which distance measure a scaled rate refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RedshiftScaling {
    /// Rate per comoving distance: (1+z)^2.
    Comoving,
    /// Rate per physical distance: (1+z)^3.
    Physical,
}

impl RedshiftScaling {
    /// Power of (1+z) applied by this convention.
    pub fn exponent(self) -> i32 {
        match self {
            Self::Comoving => 2,
            Self::Physical => 3,
        }
    }

    /// Scale factor at redshift `z`, including the field's own evolution.
    pub fn factor(self, z: f64, field: &dyn PhotonField) -> f64 {
        (1.0 + z).powi(self.exponent()) * field.redshift_scaling(z)
    }
}

/// log10 of the Lorentz factor the photon field sees: γ(1+z).
pub fn log_lorentz(candidate: &Candidate) -> f64 {
    (candidate.current.lorentz_factor() * (1.0 + candidate.redshift())).log10()
}
