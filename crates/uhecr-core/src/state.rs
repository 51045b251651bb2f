//! Kinematic state of a single particle.

use std::fmt;

use crate::id::ParticleId;
use crate::mass::particle_mass;
use crate::units::{C_SQUARED, EEV, ELEMENTARY_CHARGE, MPC};
use crate::Vector3;

/// Identity, energy, position and direction of a particle.
///
/// The direction is kept as a unit vector; [`set_direction`](Self::set_direction)
/// normalises its input.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleState {
    id: ParticleId,
    energy: f64,
    position: Vector3,
    direction: Vector3,
}

impl Default for ParticleState {
    fn default() -> Self {
        Self {
            id: ParticleId(0),
            energy: 0.0,
            position: Vector3::zeros(),
            direction: Vector3::new(-1.0, 0.0, 0.0),
        }
    }
}

impl ParticleState {
    /// Create a state at `position` moving along `direction`.
    pub fn new(id: ParticleId, energy: f64, position: Vector3, direction: Vector3) -> Self {
        let mut state = Self {
            id,
            energy,
            position,
            direction: Vector3::new(-1.0, 0.0, 0.0),
        };
        state.set_direction(direction);
        state
    }

    /// Particle identifier.
    pub fn id(&self) -> ParticleId {
        self.id
    }

    /// Replace the particle identifier, keeping the energy.
    pub fn set_id(&mut self, id: ParticleId) {
        self.id = id;
    }

    /// Total energy [J].
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Set the total energy [J].
    pub fn set_energy(&mut self, energy: f64) {
        self.energy = energy.max(0.0);
    }

    /// Position [m].
    pub fn position(&self) -> Vector3 {
        self.position
    }

    /// Set the position [m].
    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    /// Unit direction of motion.
    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    /// Set the direction of motion. Zero vectors are ignored.
    pub fn set_direction(&mut self, direction: Vector3) {
        let norm = direction.norm();
        if norm > 0.0 && norm.is_finite() {
            self.direction = direction / norm;
        }
    }

    /// Rest mass [kg].
    pub fn mass(&self) -> f64 {
        particle_mass(self.id)
    }

    /// Electric charge [C].
    pub fn charge(&self) -> f64 {
        self.id.charge_number() as f64 * ELEMENTARY_CHARGE
    }

    /// Lorentz factor E / (m c²). Infinite for massless particles.
    pub fn lorentz_factor(&self) -> f64 {
        self.energy / (self.mass() * C_SQUARED)
    }

    /// Set the energy from a Lorentz factor.
    pub fn set_lorentz_factor(&mut self, gamma: f64) {
        self.set_energy(gamma * self.mass() * C_SQUARED);
    }

    /// Rigidity E / (Z e) [V]. Zero for neutral particles.
    pub fn rigidity(&self) -> f64 {
        let z = self.id.charge_number();
        if z == 0 {
            return 0.0;
        }
        self.energy / (z.unsigned_abs() as f64 * ELEMENTARY_CHARGE)
    }
}

impl fmt::Display for ParticleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position / MPC;
        write!(
            f,
            "Particle {}, E = {} EeV, x = ({}, {}, {}) Mpc",
            self.id,
            self.energy / EEV,
            p.x,
            p.y,
            p.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{MASS_PROTON, C_LIGHT};

    #[test]
    fn direction_is_normalised() {
        let mut s = ParticleState::default();
        s.set_direction(Vector3::new(3.0, 4.0, 0.0));
        assert!((s.direction().norm() - 1.0).abs() < 1e-15);
        s.set_direction(Vector3::zeros());
        assert!((s.direction().norm() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn lorentz_factor_round_trip() {
        let mut s = ParticleState::new(
            ParticleId::PROTON,
            0.0,
            Vector3::zeros(),
            Vector3::x(),
        );
        s.set_lorentz_factor(1e10);
        let expected = 1e10 * MASS_PROTON * C_LIGHT * C_LIGHT;
        assert!((s.energy() - expected).abs() / expected < 1e-14);
        assert!((s.lorentz_factor() - 1e10).abs() / 1e10 < 1e-14);
    }

    #[test]
    fn charge_and_rigidity() {
        let s = ParticleState::new(
            ParticleId::nucleus(4, 2).unwrap(),
            8.0 * EEV,
            Vector3::zeros(),
            Vector3::x(),
        );
        assert!((s.charge() - 2.0 * ELEMENTARY_CHARGE).abs() < 1e-30);
        assert!((s.rigidity() - 4e18).abs() / 4e18 < 1e-12);
    }
}
