//! Charged-particle propagation for uhecr.
//!
//! [`BorisPropagator`] advances a candidate's position and direction
//! through a [`MagneticField`](uhecr_core::MagneticField), optionally
//! carried by an [`AdvectionField`](uhecr_core::AdvectionField). It
//! implements [`Process`](uhecr_interaction::Process) and so runs in the
//! same module chain as the interaction processes, negotiating step
//! lengths through the candidate.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boris;

pub use boris::{BorisPropagator, BorisPropagatorBuilder, StepControl};
