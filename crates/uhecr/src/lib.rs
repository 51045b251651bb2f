//! uhecr: Monte-Carlo propagation of ultra-high-energy cosmic rays.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all uhecr sub-crates. For most users, adding `uhecr` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use uhecr::prelude::*;
//! use uhecr::types::units::{EEV, KPC, NANOGAUSS};
//!
//! let propagator = BorisPropagator::builder()
//!     .field(Arc::new(UniformMagneticField::new(Vector3::new(0.0, 0.0, NANOGAUSS))))
//!     .adaptive(1e-4, 0.1 * KPC, 100.0 * KPC)
//!     .build()
//!     .unwrap();
//!
//! let mut candidate = Candidate::new(ParticleId::PROTON, 10.0 * EEV);
//! let mut rng = SimRng::for_candidate(42, 0);
//! for _ in 0..10 {
//!     propagator.process(&mut candidate, &mut rng).unwrap();
//! }
//! assert!(candidate.current.position().norm() > 0.0);
//! assert!((candidate.current.direction().norm() - 1.0).abs() < 1e-12);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `uhecr-core` | Ids, candidates, units, fields, RNG, errors |
//! | [`tables`] | `uhecr-tables` | Log-Lorentz grid, rate and branching tables, loaders |
//! | [`interaction`] | `uhecr-interaction` | `Process` trait, channel selector, stepper |
//! | [`processes`] | `uhecr-processes` | Disintegration, pair and pion production, decay |
//! | [`propagation`] | `uhecr-propagation` | Boris-push propagator |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits and units (`uhecr-core`).
///
/// Contains [`types::Candidate`], [`types::ParticleId`], the field traits
/// and the seeded [`types::SimRng`].
pub use uhecr_core as types;

/// Tabulated interaction data (`uhecr-tables`).
///
/// Rate tables keyed by isotope on the [`tables::LORENTZ_GRID`], plus the
/// text loaders in [`tables::loader`].
pub use uhecr_tables as tables;

/// Interaction framework (`uhecr-interaction`).
///
/// The [`interaction::Process`] trait is the main extension point for
/// user-defined modules.
pub use uhecr_interaction as interaction;

/// Concrete interaction processes (`uhecr-processes`).
pub use uhecr_processes as processes;

/// Charged-particle propagation (`uhecr-propagation`).
pub use uhecr_propagation as propagation;

/// Common imports for typical uhecr usage.
///
/// ```rust
/// use uhecr::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use uhecr_core::{
        AdvectionField, Candidate, Isotope, MagneticField, ParticleId, ParticleState,
        PhotonField, RandomSource, SimRng, UniformAdvectionField, UniformMagneticField, Vector3,
    };

    // Errors
    pub use uhecr_core::{ConfigError, CoreError, FieldError, InteractionError};
    pub use uhecr_processes::SetupError;
    pub use uhecr_tables::TableError;

    // Interaction framework
    pub use uhecr_interaction::{ChannelSelector, Process, ResidualPolicy, StochasticStepper};

    // Processes
    pub use uhecr_processes::{
        ElasticScattering, ElectronPairProduction, NuclearDecay, PhotoDisintegration,
        PhotoPionProduction,
    };

    // Propagation
    pub use uhecr_propagation::{BorisPropagator, StepControl};
}
