//! Rest masses of the particles the framework tracks.

use crate::id::ParticleId;
use crate::units::{AMU, MASS_ELECTRON, MASS_NEUTRON, MASS_PROTON};

/// Rest mass [kg] of a particle.
///
/// Free nucleons use their measured masses; heavier nuclei use
/// `A * amu - Z * m_e` (atomic mass approximation without binding
/// corrections). Electrons and positrons carry the electron mass;
/// photons and neutrinos are massless.
pub fn particle_mass(id: ParticleId) -> f64 {
    if id.is_nucleus() {
        return nuclear_mass(id.mass_number(), id.charge_number().max(0) as u32);
    }
    match id {
        ParticleId::ELECTRON | ParticleId::POSITRON => MASS_ELECTRON,
        _ => 0.0,
    }
}

/// Rest mass [kg] of a nucleus with mass number `a` and charge number `z`.
pub fn nuclear_mass(a: u32, z: u32) -> f64 {
    match (a, z) {
        (1, 1) => MASS_PROTON,
        (1, 0) => MASS_NEUTRON,
        _ => a as f64 * AMU - z as f64 * MASS_ELECTRON,
    }
}
