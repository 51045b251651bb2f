//! Interaction framework for uhecr.
//!
//! - [`Process`]: the per-step module contract shared by interaction
//!   processes and propagators.
//! - [`ChannelSelector`]: weighted walk over branching ratios.
//! - [`StochasticStepper`]: the free-path control loop every stochastic
//!   process runs, parameterised by a [`RateProvider`] and an
//!   [`InteractionEffect`].
//! - [`RedshiftScaling`]: the cosmological rate-scaling conventions.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod process;
pub mod scaling;
pub mod selector;
pub mod stepper;

pub use process::Process;
pub use scaling::{log_lorentz, RedshiftScaling};
pub use selector::{ChannelSelector, IndexPolicy, ResidualPolicy};
pub use stepper::{InteractionEffect, LocalRate, RateProvider, StepReport, StochasticStepper};
