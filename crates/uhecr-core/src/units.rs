//! SI unit and physical constants.
//!
//! All quantities inside the framework are SI: energies in joule, lengths
//! in metre, magnetic fields in tesla. Multiply by a unit constant to convert
//! into internal units, divide to convert back (`E / EEV` is energy in EeV).

/// Metre.
pub const METER: f64 = 1.0;
/// Kilometre.
pub const KILOMETER: f64 = 1e3 * METER;
/// Parsec.
pub const PARSEC: f64 = 3.085_677_581_491_367e16 * METER;
/// Kiloparsec.
pub const KPC: f64 = 1e3 * PARSEC;
/// Megaparsec.
pub const MPC: f64 = 1e6 * PARSEC;
/// Gigaparsec.
pub const GPC: f64 = 1e9 * PARSEC;

/// Second.
pub const SECOND: f64 = 1.0;

/// Tesla.
pub const TESLA: f64 = 1.0;
/// Gauss.
pub const GAUSS: f64 = 1e-4 * TESLA;
/// Nanogauss.
pub const NANOGAUSS: f64 = 1e-9 * GAUSS;
/// Microgauss.
pub const MICROGAUSS: f64 = 1e-6 * GAUSS;

/// Speed of light in vacuum [m/s].
pub const C_LIGHT: f64 = 299_792_458.0;
/// Squared speed of light [m²/s²].
pub const C_SQUARED: f64 = C_LIGHT * C_LIGHT;
/// Elementary charge [C].
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;

/// Electronvolt [J].
pub const EV: f64 = ELEMENTARY_CHARGE;
/// Kiloelectronvolt.
pub const KEV: f64 = 1e3 * EV;
/// Megaelectronvolt.
pub const MEV: f64 = 1e6 * EV;
/// Gigaelectronvolt.
pub const GEV: f64 = 1e9 * EV;
/// Teraelectronvolt.
pub const TEV: f64 = 1e12 * EV;
/// Petaelectronvolt.
pub const PEV: f64 = 1e15 * EV;
/// Exaelectronvolt.
pub const EEV: f64 = 1e18 * EV;

/// Atomic mass unit [kg].
pub const AMU: f64 = 1.660_539_066_60e-27;
/// Proton mass [kg].
pub const MASS_PROTON: f64 = 1.672_621_923_69e-27;
/// Neutron mass [kg].
pub const MASS_NEUTRON: f64 = 1.674_927_498_04e-27;
/// Electron mass [kg].
pub const MASS_ELECTRON: f64 = 9.109_383_701_5e-31;
