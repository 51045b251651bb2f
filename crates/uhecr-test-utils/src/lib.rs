//! Test utilities and mock types for uhecr development.
//!
//! Provides a scripted [`RandomSource`] ([`MockRandom`]), mock field
//! evaluators ([`FailingField`], [`CountingField`], [`MockPhotonField`])
//! and, in [`fixtures`], synthetic interaction tables plus a writer for a
//! complete fixture data directory.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use uhecr_core::{
    FieldError, MagneticField, PhotonField, RandomSource, RngState, SimRng, Vector3,
};

/// Random source that replays scripted uniform draws, then falls back to
/// a seeded [`SimRng`] stream.
///
/// Push the exact draws a code path should see with
/// [`push`](MockRandom::push); once the script is exhausted, draws come
/// from the fallback so long-running scenarios still terminate.
pub struct MockRandom {
    script: VecDeque<f64>,
    fallback: SimRng,
    draws: usize,
}

impl MockRandom {
    /// Scripted source with the given draws and fallback seed 0.
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self::with_seed(draws, 0)
    }

    /// Unscripted source: every draw comes from the seeded stream.
    pub fn seeded(seed: u64) -> Self {
        Self::with_seed(Vec::new(), seed)
    }

    pub fn with_seed(draws: impl IntoIterator<Item = f64>, seed: u64) -> Self {
        Self {
            script: draws.into_iter().collect(),
            fallback: SimRng::new(seed),
            draws: 0,
        }
    }

    /// Append a scripted draw.
    pub fn push(&mut self, u: f64) {
        self.script.push_back(u);
    }

    /// Scripted draws not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Total uniform draws served so far.
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for MockRandom {
    fn uniform(&mut self) -> f64 {
        self.draws += 1;
        match self.script.pop_front() {
            Some(u) => u,
            None => self.fallback.uniform(),
        }
    }

    fn state(&self) -> RngState {
        self.fallback.state()
    }
}

/// Magnetic field that returns a constant value a number of times, then
/// fails on every further call.
///
/// Uses `AtomicUsize` for the call counter so it satisfies `Sync`.
pub struct FailingField {
    pub value: Vector3,
    pub succeed_count: usize,
    call_count: AtomicUsize,
}

impl FailingField {
    /// A field that fails on every call.
    pub fn always() -> Self {
        Self::after(Vector3::zeros(), 0)
    }

    /// A field that returns `value` for `succeed_count` calls, then fails.
    pub fn after(value: Vector3, succeed_count: usize) -> Self {
        Self {
            value,
            succeed_count,
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times the field has been evaluated.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl MagneticField for FailingField {
    fn field(&self, position: &Vector3, _z: f64) -> Result<Vector3, FieldError> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(FieldError::OutOfDomain {
                reason: format!(
                    "deliberate failure at ({}, {}, {})",
                    position.x, position.y, position.z
                ),
            });
        }
        Ok(self.value)
    }
}

/// Constant magnetic field that records every evaluation position.
pub struct CountingField {
    pub value: Vector3,
    positions: std::sync::Mutex<Vec<Vector3>>,
}

impl CountingField {
    pub fn new(value: Vector3) -> Self {
        Self {
            value,
            positions: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Positions at which the field was evaluated, in call order.
    pub fn positions(&self) -> Vec<Vector3> {
        self.positions
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl MagneticField for CountingField {
    fn field(&self, position: &Vector3, _z: f64) -> Result<Vector3, FieldError> {
        if let Ok(mut p) = self.positions.lock() {
            p.push(*position);
        }
        Ok(self.value)
    }
}

/// Photon field with configurable name and scalings.
#[derive(Clone, Debug)]
pub struct MockPhotonField {
    pub name: String,
    /// Constant factor returned by `redshift_scaling`.
    pub redshift_factor: f64,
    /// Constant factor returned by `radial_scaling`.
    pub radial_factor: f64,
}

impl MockPhotonField {
    /// A CMB-like field: no evolution, homogeneous.
    pub fn cmb() -> Self {
        Self::named("CMB")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            redshift_factor: 1.0,
            radial_factor: 1.0,
        }
    }

    pub fn with_redshift_factor(mut self, f: f64) -> Self {
        self.redshift_factor = f;
        self
    }

    pub fn with_radial_factor(mut self, f: f64) -> Self {
        self.radial_factor = f;
        self
    }
}

impl PhotonField for MockPhotonField {
    fn name(&self) -> &str {
        &self.name
    }

    fn redshift_scaling(&self, _z: f64) -> f64 {
        self.redshift_factor
    }

    fn radial_scaling(&self, _r: f64) -> f64 {
        self.radial_factor
    }
}
