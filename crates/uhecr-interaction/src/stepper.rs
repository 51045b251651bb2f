//! The stochastic interaction stepper.
//!
//! Every rate-driven process runs the same control loop over the step the
//! propagator just took:
//!
//! 1. **Idle → RateEvaluated**: ask the [`RateProvider`] for the local
//!    rate. No rate (wrong species, no data, energy outside the table)
//!    ends the step as a no-op.
//! 2. **RateEvaluated → InteractionPending**: draw a free path
//!    `-ln(1-u) / rate`. If the remaining step is shorter, no interaction
//!    happens: the next step is limited to `limit / rate` and the loop ends.
//! 3. **InteractionPending → Consumed**: the [`InteractionEffect`] mutates
//!    the candidate.
//! 4. **Consumed**: the free path is subtracted from the remaining step.
//!    A positive remainder loops back to 1 with the updated candidate.
//!
//! The loop runs at least once, so a zero-length step still limits the
//! next one.

use std::fmt;

use uhecr_core::{Candidate, InteractionError, Isotope, RandomSource};

/// Local interaction rate for the current candidate state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalRate {
    /// Rate per unit length [1/m], already scaled for redshift and field
    /// geometry.
    pub rate: f64,
    /// log10(γ(1+z)) at which the rate was evaluated.
    pub log_lorentz: f64,
    /// Composition the rate refers to, for nuclei.
    pub isotope: Option<Isotope>,
}

/// Source of local interaction rates.
pub trait RateProvider {
    /// Rate for the candidate's current state.
    ///
    /// `None` means the process does not act on this candidate right now.
    fn local_rate(&self, candidate: &Candidate) -> Option<LocalRate>;
}

/// What happens to a candidate when an interaction occurs.
pub trait InteractionEffect {
    /// Apply one interaction at the state described by `rate`.
    ///
    /// # Errors
    ///
    /// [`InteractionError`] when the products cannot be constructed.
    fn interact(
        &self,
        candidate: &mut Candidate,
        rate: &LocalRate,
        rng: &mut dyn RandomSource,
    ) -> Result<(), InteractionError>;
}

/// Phase of the stepper's control loop.
#[derive(Clone, Copy, Debug, PartialEq)]
enum StepPhase {
    /// Waiting for a rate evaluation.
    Idle,
    /// A positive rate is known.
    RateEvaluated(LocalRate),
    /// An interaction falls within the remaining step.
    InteractionPending {
        /// The rate the interaction was drawn with.
        rate: LocalRate,
        /// Distance to the interaction point [m].
        free_path: f64,
    },
    /// The interaction was applied; the free path still has to be consumed.
    Consumed {
        /// Distance to the interaction point [m].
        free_path: f64,
    },
}

/// Summary of one stepper run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Interactions applied during the step.
    pub interactions: usize,
    /// Next-step limit imposed [m], if the run ended without interaction.
    pub limited_to: Option<f64>,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} interaction(s)", self.interactions)?;
        if let Some(limit) = self.limited_to {
            write!(f, ", next step limited to {limit} m")?;
        }
        Ok(())
    }
}

/// The free-path control loop, configured by its step-limit fraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StochasticStepper {
    limit: f64,
}

impl Default for StochasticStepper {
    fn default() -> Self {
        Self { limit: 0.1 }
    }
}

impl StochasticStepper {
    /// A stepper limiting the next step to `limit` mean free paths.
    ///
    /// The limit is not validated here; process builders reject
    /// non-positive values.
    pub fn new(limit: f64) -> Self {
        Self { limit }
    }

    /// Fraction of the mean free path the next step is limited to.
    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Set the step-limit fraction.
    pub fn set_limit(&mut self, limit: f64) {
        self.limit = limit;
    }

    /// Run the control loop over `candidate`'s current step.
    ///
    /// # Errors
    ///
    /// Propagates the first [`InteractionError`] from `effect`; the
    /// candidate is left in the state the failing interaction reached.
    pub fn run<R, E>(
        &self,
        rates: &R,
        effect: &E,
        candidate: &mut Candidate,
        rng: &mut dyn RandomSource,
    ) -> Result<StepReport, InteractionError>
    where
        R: RateProvider + ?Sized,
        E: InteractionEffect + ?Sized,
    {
        let mut remaining = candidate.current_step();
        let mut report = StepReport::default();
        let mut phase = StepPhase::Idle;
        loop {
            phase = match phase {
                StepPhase::Idle => match rates.local_rate(candidate) {
                    None => return Ok(report),
                    Some(local) if !(local.rate.is_finite() && local.rate > 0.0) => {
                        log::debug!(
                            "degenerate rate {} at log10(gamma) = {}, no interaction",
                            local.rate,
                            local.log_lorentz
                        );
                        return Ok(report);
                    }
                    Some(local) => StepPhase::RateEvaluated(local),
                },
                StepPhase::RateEvaluated(local) => {
                    let free_path = rng.exponential() / local.rate;
                    if remaining <= 0.0 || remaining < free_path {
                        let limit = self.limit / local.rate;
                        candidate.limit_next_step(limit);
                        report.limited_to = Some(limit);
                        return Ok(report);
                    }
                    StepPhase::InteractionPending {
                        rate: local,
                        free_path,
                    }
                }
                StepPhase::InteractionPending { rate, free_path } => {
                    effect.interact(candidate, &rate, rng)?;
                    report.interactions += 1;
                    StepPhase::Consumed { free_path }
                }
                StepPhase::Consumed { free_path } => {
                    remaining -= free_path;
                    if remaining > 0.0 {
                        StepPhase::Idle
                    } else {
                        return Ok(report);
                    }
                }
            };
        }
    }
}
