//! Benchmark profiles for the uhecr propagation framework.
//!
//! - [`reference_profile`]: Boris propagation in a 1 nG field followed by
//!   photodisintegration, pair production, pion production and elastic
//!   scattering on the synthetic fixture tables
//! - [`primaries`]: a deterministic batch of mixed-composition candidates
//! - [`run_steps`]: apply a module list to one candidate a fixed number
//!   of times

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::error::Error;
use std::sync::Arc;

use uhecr_core::units::{EEV, KPC, MPC, NANOGAUSS};
use uhecr_core::{
    Candidate, InteractionError, ParticleId, PhotonField, RandomSource, SimRng,
    UniformMagneticField, Vector3,
};
use uhecr_interaction::Process;
use uhecr_processes::{
    ElasticScattering, ElasticScatteringTables, ElectronPairProduction, PairProductionTables,
    PhotoDisintegration, PhotoDisintegrationTables, PhotoPionProduction,
};
use uhecr_propagation::BorisPropagator;
use uhecr_test_utils::{fixtures, MockPhotonField};

/// Build the reference module list.
///
/// Boris (adaptive, 1 kpc .. 1 Mpc) → PD → EPP → PPP → ES, all on a
/// CMB-like fixture field with flat 1 / Mpc rates.
pub fn reference_profile() -> Result<Vec<Box<dyn Process>>, Box<dyn Error>> {
    let field: Arc<dyn PhotonField> = Arc::new(MockPhotonField::cmb());
    let boris = BorisPropagator::builder()
        .field(Arc::new(UniformMagneticField::new(Vector3::new(
            0.0, 0.0, NANOGAUSS,
        ))))
        .adaptive(1e-3, 1.0 * KPC, 1.0 * MPC)
        .build()?;
    let pd = PhotoDisintegration::builder()
        .photon_field(field.clone())
        .tables(Arc::new(PhotoDisintegrationTables {
            rates: fixtures::rate_table(fixtures::FIXTURE_RATE_PER_MPC),
            branching: fixtures::branching_table(),
            photons: fixtures::photon_emission_table(),
        }))
        .have_photons(true)
        .build()?;
    let epp = ElectronPairProduction::builder()
        .photon_field(field.clone())
        .tables(Arc::new(PairProductionTables {
            loss_rate: fixtures::loss_rate_curve(),
            spectrum: None,
        }))
        .build()?;
    let ppp = PhotoPionProduction::builder()
        .photon_field(field.clone())
        .rates(Arc::new(fixtures::pion_rate_table(
            fixtures::FIXTURE_RATE_PER_MPC,
        )))
        .build()?;
    let es = ElasticScattering::builder()
        .photon_field(field)
        .tables(Arc::new(ElasticScatteringTables {
            rates: fixtures::rate_table(0.1 * fixtures::FIXTURE_RATE_PER_MPC),
            spectrum: fixtures::scattering_spectrum(),
        }))
        .build()?;
    let modules: Vec<Box<dyn Process>> = vec![
        Box::new(boris),
        Box::new(pd),
        Box::new(epp),
        Box::new(ppp),
        Box::new(es),
    ];
    Ok(modules)
}

/// Generate `n` primaries with deterministic composition and energy.
///
/// Cycles through H, He, O and Fe with log-uniform energies between
/// 1 and 100 EeV drawn from `SimRng::new(seed)`.
pub fn primaries(n: usize, seed: u64) -> Vec<Candidate> {
    const SPECIES: [(u32, u32); 4] = [(1, 1), (4, 2), (16, 8), (56, 26)];
    let mut rng = SimRng::new(seed);
    (0..n)
        .filter_map(|i| {
            let (a, z) = SPECIES[i % SPECIES.len()];
            let energy = 10f64.powf(2.0 * rng.uniform()) * EEV;
            ParticleId::nucleus(a, z)
                .ok()
                .map(|id| Candidate::new(id, energy))
        })
        .collect()
}

/// Apply every module in order to `candidate`, `steps` times.
///
/// # Errors
///
/// The first [`InteractionError`] raised by a module.
pub fn run_steps(
    modules: &[Box<dyn Process>],
    candidate: &mut Candidate,
    rng: &mut dyn RandomSource,
    steps: usize,
) -> Result<(), InteractionError> {
    for _ in 0..steps {
        for module in modules {
            module.process(candidate, rng)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_profile_builds() {
        let names: Vec<String> = reference_profile()
            .unwrap()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(
            names,
            [
                "BorisPropagator",
                "PhotoDisintegration",
                "ElectronPairProduction",
                "PhotoPionProduction",
                "ElasticScattering"
            ]
        );
    }

    #[test]
    fn primaries_are_deterministic() {
        let a = primaries(8, 42);
        let b = primaries(8, 42);
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
        assert_eq!(a[3].current.id(), ParticleId::nucleus(56, 26).unwrap());
        assert!(a
            .iter()
            .all(|c| c.current.energy() >= EEV && c.current.energy() <= 100.0 * EEV));
    }

    #[test]
    fn reference_profile_runs() {
        let modules = reference_profile().unwrap();
        let mut c = primaries(4, 1).remove(3);
        let mut rng = SimRng::for_candidate(1, 3);
        run_steps(&modules, &mut c, &mut rng, 50).unwrap();
        assert!(c.current.position().norm() > 0.0);
    }
}
