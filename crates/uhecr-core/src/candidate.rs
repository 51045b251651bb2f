//! The candidate: a particle under propagation plus its bookkeeping.
//!
//! A [`Candidate`] holds three snapshots of the particle (`current`,
//! `previous` = state before the last propagation step, `created` = state
//! at the last interaction), the redshift context, the step lengths
//! negotiated between modules, and the ordered list of secondaries it
//! produced. Secondaries are independent candidates from the moment they
//! are appended.

use crate::id::ParticleId;
use crate::state::ParticleState;
use crate::Vector3;

/// A particle being propagated.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// State after the most recent module.
    pub current: ParticleState,
    /// State before the most recent propagation step.
    pub previous: ParticleState,
    /// State at creation or at the most recent interaction.
    pub created: ParticleState,
    /// Statistical weight.
    pub weight: f64,
    /// Label of the process that produced this candidate.
    pub tag_origin: String,
    /// Secondaries produced by interactions, in emission order.
    pub secondaries: Vec<Candidate>,
    redshift: f64,
    current_step: f64,
    next_step: f64,
}

impl Default for Candidate {
    fn default() -> Self {
        Self::from_state(ParticleState::default())
    }
}

impl Candidate {
    /// Create a candidate with the given identity and energy at the origin.
    pub fn new(id: ParticleId, energy: f64) -> Self {
        Self::from_state(ParticleState::new(
            id,
            energy,
            Vector3::zeros(),
            Vector3::new(-1.0, 0.0, 0.0),
        ))
    }

    /// Create a candidate whose snapshots all equal `state`.
    pub fn from_state(state: ParticleState) -> Self {
        Self {
            previous: state.clone(),
            created: state.clone(),
            current: state,
            weight: 1.0,
            tag_origin: "PRIM".to_string(),
            secondaries: Vec::new(),
            redshift: 0.0,
            current_step: 0.0,
            next_step: f64::MAX,
        }
    }

    /// Builder-style position setter for all snapshots.
    pub fn at_position(mut self, position: Vector3) -> Self {
        self.current.set_position(position);
        self.previous.set_position(position);
        self.created.set_position(position);
        self
    }

    /// Redshift of the candidate's current epoch.
    pub fn redshift(&self) -> f64 {
        self.redshift
    }

    /// Set the redshift context.
    pub fn set_redshift(&mut self, z: f64) {
        self.redshift = z;
    }

    /// Length of the step performed by the last propagation [m].
    pub fn current_step(&self) -> f64 {
        self.current_step
    }

    /// Set the length of the current step [m].
    pub fn set_current_step(&mut self, step: f64) {
        self.current_step = step.max(0.0);
    }

    /// Step length proposed for the next propagation [m].
    pub fn next_step(&self) -> f64 {
        self.next_step
    }

    /// Set the proposed next step [m].
    pub fn set_next_step(&mut self, step: f64) {
        self.next_step = step.max(0.0);
    }

    /// Restrict the next step to at most `step`.
    pub fn limit_next_step(&mut self, step: f64) {
        if step < self.next_step {
            self.next_step = step.max(0.0);
        }
    }

    /// Append a secondary created at `position`.
    ///
    /// The secondary inherits the primary's current direction and redshift.
    pub fn add_secondary(
        &mut self,
        id: ParticleId,
        energy: f64,
        position: Vector3,
        weight: f64,
        tag: &str,
    ) {
        let mut state = self.current.clone();
        state.set_id(id);
        state.set_energy(energy);
        state.set_position(position);

        let mut secondary = Candidate::from_state(state);
        secondary.redshift = self.redshift;
        secondary.weight = self.weight * weight;
        secondary.tag_origin = tag.to_string();
        self.secondaries.push(secondary);
    }

    /// Short human-readable description used in log messages.
    pub fn description(&self) -> String {
        format!(
            "CosmicRay at z = {}\n  source:  {}\n  current: {}",
            self.redshift, self.created, self.current
        )
    }
}
