//! The secondary emitter shared by all interaction processes.
//!
//! A process turns a selected channel into a list of [`Product`]s and an
//! updated primary. [`SecondaryEmitter`] appends the products to the
//! candidate at one interaction point, updates the primary, and handles
//! de-excitation photon lines. Construction of every particle id happens
//! before the candidate is touched, so a failing channel leaves the
//! candidate unchanged.

use smallvec::SmallVec;
use uhecr_core::{Candidate, InteractionError, ParticleId, RandomSource, Vector3};
use uhecr_tables::PhotonLine;

/// One emitted particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Product {
    /// Particle identity.
    pub id: ParticleId,
    /// Lab-frame energy [J].
    pub energy: f64,
}

impl Product {
    /// A product of identity `id` and energy `energy`.
    pub fn new(id: ParticleId, energy: f64) -> Self {
        Self { id, energy }
    }
}

/// Products of a single interaction.
pub type Products = SmallVec<[Product; 8]>;

/// Lab-frame energy of a photon with rest-frame energy `eps` emitted at
/// angle cos θ by an emitter with Lorentz factor `gamma`.
pub fn doppler_boost(eps: f64, gamma: f64, cos_theta: f64) -> f64 {
    eps * gamma * (1.0 - cos_theta)
}

/// Emits secondaries with a process-specific tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecondaryEmitter {
    process: &'static str,
    tag: String,
}

impl SecondaryEmitter {
    /// An emitter for `process` labelling its secondaries with `tag`.
    pub fn new(process: &'static str, tag: impl Into<String>) -> Self {
        Self {
            process,
            tag: tag.into(),
        }
    }

    /// Name of the owning process.
    pub fn process(&self) -> &'static str {
        self.process
    }

    /// Interaction tag attached to every secondary.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Replace the interaction tag.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    /// Build the fatal error for `candidate`, logging it with the stream
    /// state needed to replay the failure.
    pub fn fatal(
        &self,
        reason: impl std::fmt::Display,
        candidate: &Candidate,
        rng: &dyn RandomSource,
    ) -> InteractionError {
        let state = rng.state();
        log::error!(
            "{}: cannot continue {}: {reason}; replay with {state}",
            self.process,
            candidate.description()
        );
        InteractionError::SecondaryConstruction {
            process: self.process.to_string(),
            reason: reason.to_string(),
            rng: state,
        }
    }

    /// Nucleus id for signed `(a, z)`, or the fatal error.
    pub fn nucleus(
        &self,
        a: i64,
        z: i64,
        candidate: &Candidate,
        rng: &dyn RandomSource,
    ) -> Result<ParticleId, InteractionError> {
        ParticleId::nucleus_signed(a, z).map_err(|e| self.fatal(e, candidate, rng))
    }

    /// Append `products` as secondaries created at `position`.
    pub fn emit(&self, candidate: &mut Candidate, products: &[Product], position: Vector3) {
        for p in products {
            candidate.add_secondary(p.id, p.energy, position, 1.0, &self.tag);
        }
    }

    /// Replace the primary's identity and energy, recording the
    /// pre-interaction state as its creation state.
    pub fn transform(&self, candidate: &mut Candidate, id: ParticleId, energy: f64) {
        candidate.created = candidate.current.clone();
        candidate.current.set_id(id);
        candidate.current.set_energy(energy);
    }

    /// Emit de-excitation photons of `lines` evaluated at grid node
    /// `index`, boosted by the primary's current Lorentz factor.
    ///
    /// Each line fires independently with its tabulated probability; the
    /// photon energy is taken from the primary. Returns the number of
    /// photons emitted.
    pub fn emit_photon_lines(
        &self,
        candidate: &mut Candidate,
        lines: &[PhotonLine],
        index: usize,
        position: Vector3,
        rng: &mut dyn RandomSource,
    ) -> usize {
        let gamma = candidate.current.lorentz_factor();
        let mut emitted = 0;
        for line in lines {
            if rng.uniform() > line.probability_at(index) {
                continue;
            }
            let cos_theta = 2.0 * rng.uniform() - 1.0;
            let energy =
                doppler_boost(line.energy, gamma, cos_theta).min(candidate.current.energy());
            let remaining = candidate.current.energy() - energy;
            candidate.current.set_energy(remaining);
            candidate.add_secondary(ParticleId::PHOTON, energy, position, 1.0, &self.tag);
            emitted += 1;
        }
        emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uhecr_core::units::{EEV, MEV};
    use uhecr_test_utils::MockRandom;

    fn carbon() -> Candidate {
        Candidate::new(ParticleId::nucleus(12, 6).unwrap(), 100.0 * EEV)
    }

    #[test]
    fn boost_spans_zero_to_twice_gamma() {
        assert_eq!(doppler_boost(1.0, 10.0, 1.0), 0.0);
        assert_eq!(doppler_boost(1.0, 10.0, -1.0), 20.0);
        assert_eq!(doppler_boost(1.0, 10.0, 0.0), 10.0);
    }

    #[test]
    fn emit_tags_secondaries() {
        let emitter = SecondaryEmitter::new("Test", "TAG");
        let mut c = carbon();
        let products = [
            Product::new(ParticleId::NEUTRON, 1.0),
            Product::new(ParticleId::PROTON, 2.0),
        ];
        emitter.emit(&mut c, &products, Vector3::x());
        assert_eq!(c.secondaries.len(), 2);
        assert!(c.secondaries.iter().all(|s| s.tag_origin == "TAG"));
        assert_eq!(c.secondaries[1].current.energy(), 2.0);
    }

    #[test]
    fn transform_records_created_state() {
        let emitter = SecondaryEmitter::new("Test", "TAG");
        let mut c = carbon();
        c.created.set_energy(0.0);
        emitter.transform(&mut c, ParticleId::nucleus(11, 6).unwrap(), 90.0 * EEV);
        assert_eq!(c.created.energy(), 100.0 * EEV);
        assert_eq!(c.created.id(), ParticleId::nucleus(12, 6).unwrap());
        assert_eq!(c.current.id().mass_number(), 11);
    }

    #[test]
    fn photon_lines_conserve_energy() {
        let emitter = SecondaryEmitter::new("Test", "TAG");
        let mut c = carbon();
        let lines = [
            PhotonLine { energy: 2.0 * MEV, probabilities: vec![1.0; 251] },
            PhotonLine { energy: 4.0 * MEV, probabilities: vec![0.0; 251] },
        ];
        // Line 1 fires (0.3 <= 1) with cos = 0; line 2 is rejected.
        let mut rng = MockRandom::new([0.3, 0.5, 0.9]);
        let n = emitter.emit_photon_lines(&mut c, &lines, 100, Vector3::zeros(), &mut rng);
        assert_eq!(n, 1);
        let total = c.current.energy() + c.secondaries[0].current.energy();
        assert!((total - 100.0 * EEV).abs() / (100.0 * EEV) < 1e-14);
        assert_eq!(c.secondaries[0].current.id(), ParticleId::PHOTON);
    }

    #[test]
    fn fatal_error_carries_stream_state() {
        let emitter = SecondaryEmitter::new("Test", "TAG");
        let c = carbon();
        let rng = MockRandom::seeded(99);
        let err = emitter.nucleus(0, 0, &c, &rng).unwrap_err();
        match err {
            InteractionError::SecondaryConstruction { process, rng, .. } => {
                assert_eq!(process, "Test");
                assert_eq!(rng.seed, 99);
            }
        }
    }
}
