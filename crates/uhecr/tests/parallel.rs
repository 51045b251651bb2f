//! Candidates are independent units of work: running them on worker
//! threads with per-candidate random streams reproduces a sequential run
//! bit for bit.

use std::sync::Arc;
use std::thread;

use uhecr::prelude::*;
use uhecr::processes::{PairProductionTables, PhotoDisintegrationTables};
use uhecr::types::units::{EEV, KPC, MPC, NANOGAUSS};
use uhecr_test_utils::{fixtures, MockPhotonField};

const SEED: u64 = 20_240_601;
const STEPS: usize = 60;

fn modules() -> Vec<Box<dyn Process>> {
    let field: Arc<dyn PhotonField> = Arc::new(MockPhotonField::cmb());
    vec![
        Box::new(
            BorisPropagator::builder()
                .field(Arc::new(UniformMagneticField::new(Vector3::new(
                    NANOGAUSS, 0.0, NANOGAUSS,
                ))))
                .adaptive(1e-3, 1.0 * KPC, 1.0 * MPC)
                .build()
                .unwrap(),
        ),
        Box::new(
            PhotoDisintegration::builder()
                .photon_field(field.clone())
                .tables(Arc::new(PhotoDisintegrationTables {
                    rates: fixtures::rate_table(fixtures::FIXTURE_RATE_PER_MPC),
                    branching: fixtures::branching_table(),
                    photons: fixtures::photon_emission_table(),
                }))
                .have_photons(true)
                .build()
                .unwrap(),
        ),
        Box::new(
            ElectronPairProduction::builder()
                .photon_field(field.clone())
                .tables(Arc::new(PairProductionTables {
                    loss_rate: fixtures::loss_rate_curve(),
                    spectrum: None,
                }))
                .build()
                .unwrap(),
        ),
        Box::new(
            PhotoPionProduction::builder()
                .photon_field(field)
                .rates(Arc::new(fixtures::pion_rate_table(0.1)))
                .have_photons(true)
                .build()
                .unwrap(),
        ),
    ]
}

fn primaries() -> Vec<Candidate> {
    let species = [(56, 26), (16, 8), (4, 2), (1, 1), (28, 14), (12, 6)];
    (0..24)
        .map(|i| {
            let (a, z) = species[i % species.len()];
            let energy = (10.0 + i as f64) * EEV;
            Candidate::new(ParticleId::nucleus(a, z).unwrap(), energy)
        })
        .collect()
}

fn propagate(modules: &[Box<dyn Process>], mut candidate: Candidate, index: u64) -> Candidate {
    let mut rng = SimRng::for_candidate(SEED, index);
    for _ in 0..STEPS {
        for module in modules {
            module.process(&mut candidate, &mut rng).unwrap();
        }
    }
    candidate
}

fn sequential(modules: &[Box<dyn Process>]) -> Vec<Candidate> {
    primaries()
        .into_iter()
        .enumerate()
        .map(|(i, c)| propagate(modules, c, i as u64))
        .collect()
}

#[test]
fn modules_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync + ?Sized>() {}
    assert_send_sync::<BorisPropagator>();
    assert_send_sync::<PhotoDisintegration>();
    assert_send_sync::<ElectronPairProduction>();
    assert_send_sync::<PhotoPionProduction>();
    assert_send_sync::<NuclearDecay>();
    assert_send_sync::<ElasticScattering>();
    assert_send_sync::<dyn Process>();
}

#[test]
fn scoped_threads_match_sequential_run() {
    let modules = modules();
    let expected = sequential(&modules);

    let indexed: Vec<(usize, Candidate)> = primaries().into_iter().enumerate().collect();
    let mut parallel: Vec<(usize, Candidate)> = thread::scope(|s| {
        let handles: Vec<_> = indexed
            .chunks(5)
            .map(|chunk| {
                let modules = &modules;
                s.spawn(move || {
                    chunk
                        .iter()
                        .map(|(i, c)| (*i, propagate(modules, c.clone(), *i as u64)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });
    parallel.sort_by_key(|(i, _)| *i);
    let parallel: Vec<Candidate> = parallel.into_iter().map(|(_, c)| c).collect();

    assert_eq!(parallel.len(), expected.len());
    for (p, e) in parallel.iter().zip(&expected) {
        assert_eq!(p, e);
    }
    assert!(expected.iter().any(|c| !c.secondaries.is_empty()));
}

#[test]
fn processing_order_does_not_matter() {
    let modules = modules();
    let expected = sequential(&modules);
    let mut reversed: Vec<Candidate> = primaries()
        .into_iter()
        .enumerate()
        .rev()
        .map(|(i, c)| propagate(&modules, c, i as u64))
        .collect();
    reversed.reverse();
    assert_eq!(reversed, expected);
}
