//! Tabulated interaction data for the uhecr framework.
//!
//! Tables are loaded once per photon-field selection and are read-only for
//! the rest of the run, so they can be shared across worker threads behind
//! an `Arc` without locking.
//!
//! - [`LogGrid`]: the equidistant log10(Lorentz factor) grid every
//!   isotope table is sampled on, with interpolation helpers.
//! - [`IsotopeTable`]: bounds-checked (Z, N)-keyed storage.
//! - [`RateTable`], [`BranchingTable`], [`PhotonEmissionTable`],
//!   [`DecayTable`], [`TabulatedCurve`], [`CdfTable`]: the concrete tables.
//! - [`loader`]: line-oriented text parsers and file loaders.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod branching;
pub mod curve;
pub mod decay;
pub mod emission;
pub mod error;
pub mod grid;
pub mod isotope;
pub mod loader;
pub mod rate;

pub use branching::{Branch, BranchingTable, Channel};
pub use curve::{CdfTable, TabulatedCurve};
pub use decay::{DecayChannel, DecayMode, DecayTable};
pub use emission::{PhotonEmissionTable, PhotonLine};
pub use error::TableError;
pub use grid::{LogGrid, LORENTZ_GRID};
pub use isotope::IsotopeTable;
pub use rate::RateTable;
