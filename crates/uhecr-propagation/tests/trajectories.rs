//! Trajectories through uniform fields, alone and in a module chain.

use std::sync::Arc;

use uhecr_core::units::{C_LIGHT, EEV, ELEMENTARY_CHARGE, MPC, NANOGAUSS};
use uhecr_core::{Candidate, ParticleId, SimRng, UniformMagneticField, Vector3};
use uhecr_interaction::Process;
use uhecr_processes::{PhotoDisintegration, PhotoDisintegrationTables};
use uhecr_propagation::BorisPropagator;
use uhecr_test_utils::{fixtures, FailingField, MockPhotonField, MockRandom};

/// Larmor radius [m] of an ultra-relativistic particle.
fn larmor_radius(energy: f64, charge_number: f64, b: f64) -> f64 {
    energy / (charge_number * ELEMENTARY_CHARGE * C_LIGHT * b)
}

fn gyrating_proton() -> Candidate {
    let mut c = Candidate::new(ParticleId::PROTON, 1.0 * EEV);
    c.current.set_direction(Vector3::new(1.0, 0.0, 0.0));
    c
}

#[test]
fn proton_circles_in_a_uniform_field() {
    let b = 1.0 * NANOGAUSS;
    let r = larmor_radius(1.0 * EEV, 1.0, b);
    let p = BorisPropagator::builder()
        .field(Arc::new(UniformMagneticField::new(Vector3::new(0.0, 0.0, b))))
        .fixed_step(r / 100.0)
        .build()
        .unwrap();

    // v x B points to -y for a positive charge moving along +x.
    let centre = Vector3::new(0.0, -r, 0.0);
    let mut c = gyrating_proton();
    let mut rng = MockRandom::seeded(0);
    for _ in 0..1000 {
        p.process(&mut c, &mut rng).unwrap();
        let pos = c.current.position();
        assert!(((pos - centre).norm() / r - 1.0).abs() < 1e-3);
        assert_eq!(pos.z, 0.0);
    }
}

#[test]
fn adaptive_orbit_keeps_its_radius() {
    let b = 1.0 * NANOGAUSS;
    let r = larmor_radius(1.0 * EEV, 1.0, b);
    let (min, max) = (r / 1000.0, r);
    let p = BorisPropagator::builder()
        .field(Arc::new(UniformMagneticField::new(Vector3::new(0.0, 0.0, b))))
        .adaptive(1e-4, min, max)
        .build()
        .unwrap();

    let centre = Vector3::new(0.0, -r, 0.0);
    let mut c = gyrating_proton();
    let mut rng = MockRandom::seeded(0);
    let mut travelled = 0.0;
    while travelled < 2.0 * std::f64::consts::PI * r {
        p.process(&mut c, &mut rng).unwrap();
        let step = c.current_step();
        assert!(step >= min && step <= max);
        travelled += step;
        let radius = (c.current.position() - centre).norm();
        assert!((radius / r - 1.0).abs() < 1e-2);
    }
}

#[test]
fn field_failures_do_not_stop_propagation() {
    let field = Arc::new(FailingField::after(Vector3::new(0.0, 0.0, NANOGAUSS), 5));
    let p = BorisPropagator::builder()
        .field(field.clone())
        .fixed_step(0.01 * MPC)
        .build()
        .unwrap();
    let mut c = gyrating_proton();
    let mut rng = MockRandom::seeded(0);
    for _ in 0..5 {
        p.process(&mut c, &mut rng).unwrap();
    }
    let turned = c.current.direction();
    assert!(turned.y < 0.0);
    for _ in 0..15 {
        p.process(&mut c, &mut rng).unwrap();
        assert!((c.current.direction() - turned).norm() < 1e-14);
    }
    assert_eq!(field.calls(), 20);
}

#[test]
fn interactions_follow_the_propagated_path() {
    let boris = BorisPropagator::builder()
        .field(Arc::new(UniformMagneticField::new(Vector3::new(0.0, 0.0, NANOGAUSS))))
        .adaptive(0.1, 0.001 * MPC, 1.0 * MPC)
        .build()
        .unwrap();
    let rates = fixtures::rate_table(fixtures::FIXTURE_RATE_PER_MPC);
    let pd = PhotoDisintegration::builder()
        .photon_field(Arc::new(MockPhotonField::cmb()))
        .tables(Arc::new(PhotoDisintegrationTables {
            rates: rates.clone(),
            branching: fixtures::branching_table(),
            photons: fixtures::photon_emission_table(),
        }))
        .build()
        .unwrap();

    let mut c = Candidate::new(ParticleId::nucleus(12, 6).unwrap(), 100.0 * EEV);
    let mut rng = SimRng::new(3);
    let mut limited = false;
    for _ in 0..200 {
        let emitted = c.secondaries.len();
        boris.process(&mut c, &mut rng).unwrap();
        if limited {
            // Mean free path of 1 Mpc, limit fraction 0.1.
            assert!(c.current_step() <= 0.1 * MPC * (1.0 + 1e-12));
        }
        pd.process(&mut c, &mut rng).unwrap();

        let segment = (c.current.position() - c.previous.position()).norm();
        for s in &c.secondaries[emitted..] {
            let offset = (s.current.position() - c.previous.position()).norm();
            assert!(offset <= segment * (1.0 + 1e-12));
            assert_eq!(s.tag_origin, "PD");
        }
        // Only tabulated species get a step limit.
        limited = c.current.id().isotope().is_some_and(|iso| rates.contains(iso));
        if c.current.id().mass_number() > 1 {
            assert!(limited, "{} left the tables", c.current.id());
        }
    }
    assert!(!c.secondaries.is_empty());
}
