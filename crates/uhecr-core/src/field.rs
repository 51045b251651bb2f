//! Field evaluator traits.
//!
//! Field models are external collaborators: the propagation and interaction
//! code only queries them at a position (and redshift). The uniform
//! implementations here cover the trivial configurations.

use crate::error::FieldError;
use crate::Vector3;

/// A magnetic field B(x, z) in tesla.
pub trait MagneticField: Send + Sync {
    /// Field vector at `position` for the epoch with redshift `z`.
    fn field(&self, position: &Vector3, z: f64) -> Result<Vector3, FieldError>;
}

/// A bulk advection (wind) velocity field in m/s.
pub trait AdvectionField: Send + Sync {
    /// Velocity vector at `position`.
    fn velocity(&self, position: &Vector3) -> Result<Vector3, FieldError>;
}

/// An isotropic photon background.
///
/// Interaction tables are computed for the present-day spectrum; the field
/// supplies the evolution and optional spatial intensity profile.
pub trait PhotonField: Send + Sync {
    /// Field name, used to locate its tabulated data (e.g. `"CMB"`).
    fn name(&self) -> &str;

    /// Relative photon density at redshift `z` on top of the adiabatic
    /// (1+z)^3 scaling. Default: 1 (no evolution, as for the CMB).
    fn redshift_scaling(&self, _z: f64) -> f64 {
        1.0
    }

    /// Relative intensity at distance `r` [m] from the field's centre.
    /// Default: 1 (homogeneous).
    fn radial_scaling(&self, _r: f64) -> f64 {
        1.0
    }
}

/// Constant magnetic field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformMagneticField {
    /// Field vector [T].
    pub value: Vector3,
}

impl UniformMagneticField {
    /// Create a uniform field.
    pub fn new(value: Vector3) -> Self {
        Self { value }
    }
}

impl MagneticField for UniformMagneticField {
    fn field(&self, _position: &Vector3, _z: f64) -> Result<Vector3, FieldError> {
        Ok(self.value)
    }
}

/// Constant advection velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformAdvectionField {
    /// Velocity vector [m/s].
    pub value: Vector3,
}

impl UniformAdvectionField {
    /// Create a uniform advection field.
    pub fn new(value: Vector3) -> Self {
        Self { value }
    }
}

impl AdvectionField for UniformAdvectionField {
    fn velocity(&self, _position: &Vector3) -> Result<Vector3, FieldError> {
        Ok(self.value)
    }
}
