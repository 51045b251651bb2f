//! Core types and traits for the uhecr propagation framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! particle model shared by every other crate: particle identifiers and
//! masses, the [`ParticleState`] / [`Candidate`] containers, unit constants,
//! the field-evaluator traits, the seeded random source, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod candidate;
pub mod error;
pub mod field;
pub mod id;
pub mod mass;
pub mod random;
pub mod state;
pub mod units;

pub use candidate::Candidate;
pub use error::{ConfigError, CoreError, FieldError, InteractionError};
pub use field::{
    AdvectionField, MagneticField, PhotonField, UniformAdvectionField, UniformMagneticField,
};
pub use id::{Isotope, ParticleId};
pub use random::{RandomSource, RngState, SimRng};
pub use state::ParticleState;

/// Three-vector type used for positions, directions and field values.
pub type Vector3 = nalgebra::Vector3<f64>;
