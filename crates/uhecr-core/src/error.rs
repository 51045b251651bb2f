//! Error types for the uhecr framework.
//!
//! Organised by subsystem: particle construction, field evaluation,
//! module configuration, and per-candidate interaction failures.
//! Out-of-range energies or isotopes are never errors; processes treat
//! them as "no interaction applies".

use std::error::Error;
use std::fmt;

use crate::random::RngState;

/// Errors from constructing core particle types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// The requested nucleus composition does not exist.
    InvalidNucleus {
        /// Requested mass number.
        mass_number: i64,
        /// Requested charge number.
        charge_number: i64,
    },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNucleus {
                mass_number,
                charge_number,
            } => write!(
                f,
                "invalid nucleus: A={mass_number} Z={charge_number}"
            ),
        }
    }
}

impl Error for CoreError {}

/// Errors reported by field evaluators.
///
/// Propagation treats these as recoverable: the failure is logged and a
/// zero field is used for the affected evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldError {
    /// The field is not defined at the queried position.
    OutOfDomain {
        /// Description of the domain violation.
        reason: String,
    },
    /// The field evaluation failed for another reason.
    EvaluationFailed {
        /// Description of the failure.
        reason: String,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfDomain { reason } => write!(f, "position outside field domain: {reason}"),
            Self::EvaluationFailed { reason } => write!(f, "field evaluation failed: {reason}"),
        }
    }
}

impl Error for FieldError {}

/// Errors detected while configuring a process or propagator.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Target error tolerance outside `[0, 1]`.
    InvalidTolerance {
        /// The rejected value.
        value: f64,
    },
    /// Step bounds are negative, non-finite, or inverted.
    InvalidStep {
        /// Description of which bound was violated.
        reason: String,
    },
    /// Step-limit fraction is not finite and positive.
    InvalidLimit {
        /// The rejected value.
        value: f64,
    },
    /// Shock radius is negative or non-finite.
    InvalidShockRadius {
        /// The rejected value.
        value: f64,
    },
    /// A required builder field was not set.
    MissingField {
        /// Name of the missing field.
        name: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTolerance { value } => {
                write!(f, "target error tolerance must lie in [0, 1], got {value}")
            }
            Self::InvalidStep { reason } => write!(f, "invalid step bounds: {reason}"),
            Self::InvalidLimit { value } => {
                write!(f, "step limit must be finite and positive, got {value}")
            }
            Self::InvalidShockRadius { value } => {
                write!(f, "shock radius must be finite and >= 0, got {value}")
            }
            Self::MissingField { name } => write!(f, "{name} is required"),
        }
    }
}

impl Error for ConfigError {}

/// Unrecoverable failure while processing one candidate.
///
/// Carries the random stream state at the point of failure so the exact
/// scenario can be replayed with [`SimRng::restore`](crate::SimRng::restore).
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionError {
    /// A secondary or updated primary could not be constructed.
    SecondaryConstruction {
        /// Name of the process that failed.
        process: String,
        /// Description of the failure.
        reason: String,
        /// Random stream state when the failure occurred.
        rng: RngState,
    },
}

impl fmt::Display for InteractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SecondaryConstruction {
                process,
                reason,
                rng,
            } => write!(
                f,
                "{process}: cannot construct secondary: {reason} (replay with {rng})"
            ),
        }
    }
}

impl Error for InteractionError {}
