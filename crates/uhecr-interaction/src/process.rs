//! The [`Process`] trait.
//!
//! A process is a stateless operator applied to one candidate per
//! propagation step. Propagators advance the candidate and set its
//! current step; interaction processes consume that step.

use uhecr_core::{Candidate, InteractionError, RandomSource};

/// A module applied to a candidate once per propagation step.
///
/// # Contract
///
/// - `process()` MUST be deterministic given the candidate and the random
///   stream: same inputs produce identical outputs.
/// - `&self`: configuration and tables are read-only while candidates are
///   processed, so one instance can serve many worker threads.
/// - Species or energies a process does not act on are left unchanged and
///   return `Ok(())`.
///
/// # Object safety
///
/// This trait is object-safe; module lists are stored as
/// `Vec<Box<dyn Process>>`.
pub trait Process: Send + Sync {
    /// Human-readable name for log messages and error reports.
    fn name(&self) -> &str;

    /// Apply the process to `candidate`.
    ///
    /// # Errors
    ///
    /// [`InteractionError`] when a secondary or the updated primary cannot
    /// be constructed. The candidate must then be discarded; the error
    /// carries the random stream state for replay.
    fn process(
        &self,
        candidate: &mut Candidate,
        rng: &mut dyn RandomSource,
    ) -> Result<(), InteractionError>;
}

impl<P: Process + ?Sized> Process for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn process(
        &self,
        candidate: &mut Candidate,
        rng: &mut dyn RandomSource,
    ) -> Result<(), InteractionError> {
        (**self).process(candidate, rng)
    }
}

impl<P: Process + ?Sized> Process for std::sync::Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn process(
        &self,
        candidate: &mut Candidate,
        rng: &mut dyn RandomSource,
    ) -> Result<(), InteractionError> {
        (**self).process(candidate, rng)
    }
}
