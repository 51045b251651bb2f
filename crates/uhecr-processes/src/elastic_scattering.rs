//! Elastic scattering of background photons off nuclei.
//!
//! The nucleus keeps its identity; the scattered photon is drawn from a
//! rest-frame spectrum tabulated per grid node and boosted into the lab.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use uhecr_core::units::EV;
use uhecr_core::{Candidate, ConfigError, InteractionError, ParticleId, PhotonField, RandomSource};
use uhecr_interaction::{
    log_lorentz, InteractionEffect, LocalRate, Process, RateProvider, RedshiftScaling,
    StochasticStepper,
};
use uhecr_tables::loader::{load_rate_table, load_spectrum_table};
use uhecr_tables::{CdfTable, RateTable, TableError, LORENTZ_GRID};

use crate::error::{check_limit, SetupError};
use crate::secondaries::{doppler_boost, SecondaryEmitter};

const NAME: &str = "ElasticScattering";

/// log10 of the lowest rest-frame photon energy [eV] in the spectrum.
const LG_EPS_MIN: f64 = 6.301_029_995_663_981; // log10(2e6)
/// log10 of the highest rest-frame photon energy [eV] in the spectrum.
const LG_EPS_MAX: f64 = 10.301_029_995_663_981; // log10(2e10)

/// Scattering rates and rest-frame photon spectra.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElasticScatteringTables {
    /// Scattering rate per isotope [1/m].
    pub rates: RateTable,
    /// Rest-frame photon energy CDF per grid node.
    pub spectrum: CdfTable,
}

impl ElasticScatteringTables {
    /// Load the tables of photon field `field_name` from `data_dir`.
    ///
    /// # Errors
    ///
    /// [`TableError`] if either file is missing or malformed.
    pub fn load(data_dir: &Path, field_name: &str) -> Result<Self, TableError> {
        let dir = data_dir.join("ElasticScattering");
        Ok(Self {
            rates: load_rate_table(&dir.join(format!("rate_{field_name}.txt")))?,
            spectrum: load_spectrum_table(&dir.join(format!("spectrum_{field_name}.txt")))?,
        })
    }
}

/// Elastic scattering process.
pub struct ElasticScattering {
    field: Arc<dyn PhotonField>,
    tables: Arc<ElasticScatteringTables>,
    stepper: StochasticStepper,
    emitter: SecondaryEmitter,
}

/// Builder for [`ElasticScattering`]. Defaults: `limit = 0.1`, `tag = "ES"`.
pub struct ElasticScatteringBuilder {
    field: Option<Arc<dyn PhotonField>>,
    tables: Option<Arc<ElasticScatteringTables>>,
    data_dir: Option<PathBuf>,
    limit: f64,
    tag: String,
}

impl ElasticScattering {
    /// Create a builder.
    pub fn builder() -> ElasticScatteringBuilder {
        ElasticScatteringBuilder {
            field: None,
            tables: None,
            data_dir: None,
            limit: 0.1,
            tag: "ES".to_string(),
        }
    }
}

impl ElasticScatteringBuilder {
    /// Photon background the tables belong to.
    pub fn photon_field(mut self, field: Arc<dyn PhotonField>) -> Self {
        self.field = Some(field);
        self
    }

    /// Use already loaded tables.
    pub fn tables(mut self, tables: Arc<ElasticScatteringTables>) -> Self {
        self.tables = Some(tables);
        self
    }

    /// Load tables for the photon field from this data directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
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

    /// Build the process, loading tables if needed.
    ///
    /// # Errors
    ///
    /// [`SetupError::Config`] for a missing field or an invalid limit,
    /// [`SetupError::Table`] if the data files cannot be loaded.
    pub fn build(self) -> Result<ElasticScattering, SetupError> {
        let field = self
            .field
            .ok_or(ConfigError::MissingField { name: "photon_field" })?;
        let limit = check_limit(self.limit)?;
        let tables = match (self.tables, self.data_dir) {
            (Some(t), _) => t,
            (None, Some(dir)) => Arc::new(ElasticScatteringTables::load(&dir, field.name())?),
            (None, None) => return Err(ConfigError::MissingField { name: "tables" }.into()),
        };
        Ok(ElasticScattering {
            field,
            tables,
            stepper: StochasticStepper::new(limit),
            emitter: SecondaryEmitter::new(NAME, self.tag),
        })
    }
}

impl ElasticScattering {
    /// Interaction tag attached to secondaries.
    pub fn interaction_tag(&self) -> &str {
        self.emitter.tag()
    }

    /// Set the interaction tag.
    pub fn set_interaction_tag(&mut self, tag: impl Into<String>) {
        self.emitter.set_tag(tag);
    }

    /// Rest-frame energy [J] of spectrum bin `bin` out of `bins`, at
    /// fractional position `u` within the bin.
    fn bin_energy(bin: usize, bins: usize, u: f64) -> f64 {
        let width = (LG_EPS_MAX - LG_EPS_MIN) / (bins.max(2) - 1) as f64;
        10f64.powf(LG_EPS_MIN + (bin as f64 + u) * width) * EV
    }
}

impl RateProvider for ElasticScattering {
    fn local_rate(&self, candidate: &Candidate) -> Option<LocalRate> {
        let isotope = candidate.current.id().isotope()?;
        let lg = log_lorentz(candidate);
        let rate = self.tables.rates.rate(isotope, lg)?
            * RedshiftScaling::Comoving.factor(candidate.redshift(), self.field.as_ref())
            * self.field.radial_scaling(candidate.current.position().norm());
        Some(LocalRate {
            rate,
            log_lorentz: lg,
            isotope: Some(isotope),
        })
    }
}

impl InteractionEffect for ElasticScattering {
    fn interact(
        &self,
        candidate: &mut Candidate,
        rate: &LocalRate,
        rng: &mut dyn RandomSource,
    ) -> Result<(), InteractionError> {
        let index = LORENTZ_GRID.nearest_index(rate.log_lorentz);
        let Some(cdf) = self.tables.spectrum.row_clamped(index) else {
            return Ok(());
        };
        let Some(bin) = rng.rand_bin(cdf) else {
            return Ok(());
        };
        let eps = Self::bin_energy(bin, cdf.len(), rng.uniform());
        let cos_theta = 2.0 * rng.uniform() - 1.0;
        let gamma = candidate.current.lorentz_factor();
        let energy = doppler_boost(eps, gamma, cos_theta).min(candidate.current.energy());
        log::debug!("{NAME}: {energy} J photon from {}", candidate.description());

        let position = rng.interpolated_position(
            &candidate.previous.position(),
            &candidate.current.position(),
        );
        let remaining = candidate.current.energy() - energy;
        candidate.current.set_energy(remaining);
        candidate.add_secondary(ParticleId::PHOTON, energy, position, 1.0, self.emitter.tag());
        Ok(())
    }
}

impl Process for ElasticScattering {
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
