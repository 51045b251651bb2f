//! Photo-pion production on single nucleons.
//!
//! A simplified treatment: the rate of a nucleus is the sum of its free
//! nucleon rates, one nucleon is struck, and it loses a uniformly drawn
//! fraction of its energy to a single pion that decays on the spot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use uhecr_core::{
    Candidate, ConfigError, InteractionError, Isotope, ParticleId, PhotonField, RandomSource,
};
use uhecr_interaction::{
    log_lorentz, ChannelSelector, InteractionEffect, LocalRate, Process, RateProvider,
    RedshiftScaling, ResidualPolicy, StochasticStepper,
};
use uhecr_tables::loader::load_rate_table;
use uhecr_tables::{RateTable, TableError};

use crate::error::{check_limit, SetupError};
use crate::secondaries::{Product, Products, SecondaryEmitter};

const NAME: &str = "PhotoPionProduction";

const PROTON_ROW: Isotope = Isotope::new(1, 0);
const NEUTRON_ROW: Isotope = Isotope::new(0, 1);

/// Charge of the produced pion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pion {
    /// π⁺, from p → n π⁺.
    Plus,
    /// π⁻, from n → p π⁻.
    Minus,
    /// π⁰, nucleon unchanged.
    Neutral,
}

/// Load the free-nucleon rates of photon field `field_name`.
///
/// # Errors
///
/// [`TableError`] if the file is missing or malformed.
pub fn load_pion_rates(data_dir: &Path, field_name: &str) -> Result<RateTable, TableError> {
    load_rate_table(
        &data_dir
            .join("PhotoPionProduction")
            .join(format!("rate_{field_name}.txt")),
    )
}

/// Photo-pion production process.
pub struct PhotoPionProduction {
    field: Arc<dyn PhotonField>,
    rates: Arc<RateTable>,
    stepper: StochasticStepper,
    selector: ChannelSelector,
    have_photons: bool,
    have_electrons: bool,
    have_neutrinos: bool,
    emitter: SecondaryEmitter,
}

/// Builder for [`PhotoPionProduction`].
///
/// Defaults: all secondary switches off, `limit = 0.1`, `tag = "PPP"`.
pub struct PhotoPionProductionBuilder {
    field: Option<Arc<dyn PhotonField>>,
    rates: Option<Arc<RateTable>>,
    data_dir: Option<PathBuf>,
    have_photons: bool,
    have_electrons: bool,
    have_neutrinos: bool,
    limit: f64,
    tag: String,
}

impl PhotoPionProduction {
    /// Create a builder.
    pub fn builder() -> PhotoPionProductionBuilder {
        PhotoPionProductionBuilder {
            field: None,
            rates: None,
            data_dir: None,
            have_photons: false,
            have_electrons: false,
            have_neutrinos: false,
            limit: 0.1,
            tag: "PPP".to_string(),
        }
    }
}

impl PhotoPionProductionBuilder {
    /// Photon background the rates belong to.
    pub fn photon_field(mut self, field: Arc<dyn PhotonField>) -> Self {
        self.field = Some(field);
        self
    }

    /// Use an already loaded rate table with rows `(1 0)` and `(0 1)`.
    pub fn rates(mut self, rates: Arc<RateTable>) -> Self {
        self.rates = Some(rates);
        self
    }

    /// Load rates for the photon field from this data directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Emit π⁰ decay photons.
    pub fn have_photons(mut self, on: bool) -> Self {
        self.have_photons = on;
        self
    }

    /// Emit π± decay electrons and positrons.
    pub fn have_electrons(mut self, on: bool) -> Self {
        self.have_electrons = on;
        self
    }

    /// Emit π± decay neutrinos.
    pub fn have_neutrinos(mut self, on: bool) -> Self {
        self.have_neutrinos = on;
        self
    }

    /// Next-step limit as a fraction of the mean free path.
    pub fn limit(mut self, limit: f64) -> Self {
        self.limit = limit;
        self
    }

    /// Interaction tag for secondaries.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Build the process, loading rates if needed.
    ///
    /// # Errors
    ///
    /// [`SetupError::Config`] for a missing field or an invalid limit,
    /// [`SetupError::Table`] if the rate file cannot be loaded.
    pub fn build(self) -> Result<PhotoPionProduction, SetupError> {
        let field = self
            .field
            .ok_or(ConfigError::MissingField { name: "photon_field" })?;
        let limit = check_limit(self.limit)?;
        let rates = match (self.rates, self.data_dir) {
            (Some(r), _) => r,
            (None, Some(dir)) => Arc::new(load_pion_rates(&dir, field.name())?),
            (None, None) => return Err(ConfigError::MissingField { name: "rates" }.into()),
        };
        Ok(PhotoPionProduction {
            field,
            rates,
            stepper: StochasticStepper::new(limit),
            selector: ChannelSelector::new(ResidualPolicy::LastBranch),
            have_photons: self.have_photons,
            have_electrons: self.have_electrons,
            have_neutrinos: self.have_neutrinos,
            emitter: SecondaryEmitter::new(NAME, self.tag),
        })
    }
}

impl PhotoPionProduction {
    /// Switch π⁰ photon emission.
    pub fn set_have_photons(&mut self, on: bool) {
        self.have_photons = on;
    }

    /// Switch π± electron emission.
    pub fn set_have_electrons(&mut self, on: bool) {
        self.have_electrons = on;
    }

    /// Switch π± neutrino emission.
    pub fn set_have_neutrinos(&mut self, on: bool) {
        self.have_neutrinos = on;
    }

    /// Next-step limit fraction.
    pub fn limit(&self) -> f64 {
        self.stepper.limit()
    }

    /// Interaction tag attached to secondaries.
    pub fn interaction_tag(&self) -> &str {
        self.emitter.tag()
    }

    /// Set the interaction tag.
    pub fn set_interaction_tag(&mut self, tag: impl Into<String>) {
        self.emitter.set_tag(tag);
    }

    /// Proton and neutron contributions to the rate of `isotope` at `lg`,
    /// before redshift and radial scaling.
    fn nucleon_rates(&self, isotope: Isotope, lg: f64) -> [f64; 2] {
        let rp = self.rates.rate(PROTON_ROW, lg).unwrap_or(0.0);
        let rn = self.rates.rate(NEUTRON_ROW, lg).unwrap_or(0.0);
        [isotope.z as f64 * rp, isotope.n as f64 * rn]
    }

    /// Decay products of a pion of energy `energy`, filtered by the
    /// secondary switches.
    fn pion_decay(&self, pion: Pion, energy: f64, products: &mut Products) {
        let quarter = energy / 4.0;
        let (lepton, neutrinos) = match pion {
            Pion::Neutral => {
                if self.have_photons {
                    products.push(Product::new(ParticleId::PHOTON, energy / 2.0));
                    products.push(Product::new(ParticleId::PHOTON, energy / 2.0));
                }
                return;
            }
            Pion::Plus => (
                ParticleId::POSITRON,
                [ParticleId::NU_E, ParticleId::ANTI_NU_MU, ParticleId::NU_MU],
            ),
            Pion::Minus => (
                ParticleId::ELECTRON,
                [ParticleId::ANTI_NU_E, ParticleId::NU_MU, ParticleId::ANTI_NU_MU],
            ),
        };
        if self.have_electrons {
            products.push(Product::new(lepton, quarter));
        }
        if self.have_neutrinos {
            for nu in neutrinos {
                products.push(Product::new(nu, quarter));
            }
        }
    }
}

impl RateProvider for PhotoPionProduction {
    fn local_rate(&self, candidate: &Candidate) -> Option<LocalRate> {
        let isotope = candidate.current.id().isotope()?;
        let lg = log_lorentz(candidate);
        let [p, n] = self.nucleon_rates(isotope, lg);
        let rate = (p + n)
            * RedshiftScaling::Comoving.factor(candidate.redshift(), self.field.as_ref())
            * self.field.radial_scaling(candidate.current.position().norm());
        Some(LocalRate {
            rate,
            log_lorentz: lg,
            isotope: Some(isotope),
        })
    }
}

impl InteractionEffect for PhotoPionProduction {
    fn interact(
        &self,
        candidate: &mut Candidate,
        rate: &LocalRate,
        rng: &mut dyn RandomSource,
    ) -> Result<(), InteractionError> {
        let Some(isotope) = rate.isotope else {
            return Ok(());
        };
        let weights = self.nucleon_rates(isotope, rate.log_lorentz);
        let total = weights[0] + weights[1];
        let shares = [weights[0] / total, weights[1] / total];
        let Some(struck) = self.selector.sample(&shares, rng) else {
            return Ok(());
        };
        let struck_proton = struck == 0;

        let a = isotope.mass_number();
        let epa = candidate.current.energy() / a as f64;
        let pion_energy = (0.1 + 0.4 * rng.uniform()) * epa;
        let exchange = rng.uniform() < 1.0 / 3.0;
        let (nucleon, pion) = match (struck_proton, exchange) {
            (true, true) => (ParticleId::NEUTRON, Pion::Plus),
            (false, true) => (ParticleId::PROTON, Pion::Minus),
            (true, false) => (ParticleId::PROTON, Pion::Neutral),
            (false, false) => (ParticleId::NEUTRON, Pion::Neutral),
        };
        let nucleon_energy = epa - pion_energy;

        let remnant = if a > 1 {
            let z = isotope.z as i64 - i64::from(struck_proton);
            Some(self.emitter.nucleus(a as i64 - 1, z, candidate, rng)?)
        } else {
            None
        };

        log::debug!("{NAME}: {pion:?} from {}", candidate.description());

        let mut products = Products::new();
        self.pion_decay(pion, pion_energy, &mut products);
        if remnant.is_some() {
            products.push(Product::new(nucleon, nucleon_energy));
        }

        let position = rng.interpolated_position(
            &candidate.previous.position(),
            &candidate.current.position(),
        );
        self.emitter.emit(candidate, &products, position);
        match remnant {
            Some(id) => self.emitter.transform(candidate, id, epa * (a - 1) as f64),
            None => self.emitter.transform(candidate, nucleon, nucleon_energy),
        }
        Ok(())
    }
}

impl Process for PhotoPionProduction {
    fn name(&self) -> &str {
        NAME
    }

    fn process(
        &self,
        candidate: &mut Candidate,
        rng: &mut dyn RandomSource,
    ) -> Result<(), InteractionError> {
        let report = self.stepper.run(self, self, candidate, rng)?;
        if report.interactions > 1 {
            log::debug!("{NAME}: {report} over {} m", candidate.current_step());
        }
        Ok(())
    }
}
