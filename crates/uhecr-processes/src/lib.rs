//! Interaction processes for cosmic-ray nuclei on photon backgrounds.
//!
//! Every process implements [`Process`](uhecr_interaction::Process) and
//! is configured through a validated builder:
//!
//! | Process | Kind | Default tag |
//! |---|---|---|
//! | [`PhotoDisintegration`] | stochastic, tabulated channels | `PD` |
//! | [`ElectronPairProduction`] | continuous loss | `EPP` |
//! | [`PhotoPionProduction`] | stochastic, single nucleon | `PPP` |
//! | [`NuclearDecay`] | stochastic, lifetime based | `ND` |
//! | [`ElasticScattering`] | stochastic, photon emission | `ES` |
//!
//! Stochastic processes share the free-path loop of
//! [`StochasticStepper`](uhecr_interaction::StochasticStepper) and emit
//! their products through the [`SecondaryEmitter`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod elastic_scattering;
pub mod error;
pub mod nuclear_decay;
pub mod pair_production;
pub mod photo_disintegration;
pub mod pion_production;
pub mod secondaries;

pub use elastic_scattering::{ElasticScattering, ElasticScatteringBuilder, ElasticScatteringTables};
pub use error::SetupError;
pub use nuclear_decay::{NuclearDecay, NuclearDecayBuilder, NuclearDecayTables};
pub use pair_production::{
    ElectronPairProduction, ElectronPairProductionBuilder, PairProductionTables,
};
pub use photo_disintegration::{
    PhotoDisintegration, PhotoDisintegrationBuilder, PhotoDisintegrationTables,
};
pub use pion_production::{load_pion_rates, Pion, PhotoPionProduction, PhotoPionProductionBuilder};
pub use secondaries::{doppler_boost, Product, Products, SecondaryEmitter};
