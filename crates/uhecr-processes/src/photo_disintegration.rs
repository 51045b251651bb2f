//! Photodisintegration of nuclei on a photon background.
//!
//! A nucleus absorbs a background photon and sheds nucleons or light
//! nuclei. Rates, branching ratios and de-excitation photon lines come
//! from tabulated data on the log-Lorentz grid; the free-path loop is the
//! shared [`StochasticStepper`].
//!
//! Conventions:
//!
//! - channel selection uses the branching ratios at the nearest grid node;
//! - all fragments leave with the parent's energy per nucleon, at a point
//!   drawn uniformly between the previous and current position;
//! - de-excitation lines are looked up by (parent, daughter) and evaluated
//!   at the daughter's grid node; photon energy is taken from the daughter.
//!
//! # Construction
//!
//! ```no_run
//! use std::sync::Arc;
//! use uhecr_core::PhotonField;
//! use uhecr_processes::PhotoDisintegration;
//!
//! struct Cmb;
//! impl PhotonField for Cmb {
//!     fn name(&self) -> &str { "CMB" }
//! }
//!
//! let pd = PhotoDisintegration::builder()
//!     .photon_field(Arc::new(Cmb))
//!     .data_dir("share/data")
//!     .have_photons(true)
//!     .build()
//!     .unwrap();
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use uhecr_core::{Candidate, InteractionError, Isotope, ParticleId, PhotonField, RandomSource};
use uhecr_interaction::{
    log_lorentz, ChannelSelector, IndexPolicy, InteractionEffect, LocalRate, Process,
    RateProvider, RedshiftScaling, ResidualPolicy, StochasticStepper,
};
use uhecr_tables::loader::{load_branching_table, load_photon_emission_table, load_rate_table};
use uhecr_tables::{BranchingTable, Channel, PhotonEmissionTable, RateTable, TableError};

use crate::error::{check_limit, SetupError};
use crate::secondaries::{Product, Products, SecondaryEmitter};

const NAME: &str = "PhotoDisintegration";

/// Rate, branching and photon-emission tables for one photon field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhotoDisintegrationTables {
    /// Total disintegration rate per isotope [1/m].
    pub rates: RateTable,
    /// Branching ratios per isotope.
    pub branching: BranchingTable,
    /// De-excitation photon lines per transition.
    pub photons: PhotonEmissionTable,
}

impl PhotoDisintegrationTables {
    /// Load the tables of photon field `field_name` from `data_dir`.
    ///
    /// # Errors
    ///
    /// [`TableError`] if any of the three files is missing or malformed.
    pub fn load(data_dir: &Path, field_name: &str) -> Result<Self, TableError> {
        let dir = data_dir.join("Photodisintegration");
        let short: String = field_name.chars().take(3).collect();
        Ok(Self {
            rates: load_rate_table(&dir.join(format!("rate_{field_name}.txt")))?,
            branching: load_branching_table(&dir.join(format!("branching_{field_name}.txt")))?,
            photons: load_photon_emission_table(
                &dir.join(format!("photon_emission_{short}.txt")),
            )?,
        })
    }
}

/// Photodisintegration process.
pub struct PhotoDisintegration {
    field: Arc<dyn PhotonField>,
    tables: Arc<PhotoDisintegrationTables>,
    stepper: StochasticStepper,
    selector: ChannelSelector,
    branching: IndexPolicy,
    have_photons: bool,
    emitter: SecondaryEmitter,
}

/// Builder for [`PhotoDisintegration`].
///
/// Required: `photon_field`, and one of `tables` or `data_dir`.
/// Defaults: `have_photons = false`, `limit = 0.1`,
/// `residual = NoReaction`, `branching = Nearest`, `tag = "PD"`.
pub struct PhotoDisintegrationBuilder {
    field: Option<Arc<dyn PhotonField>>,
    tables: Option<Arc<PhotoDisintegrationTables>>,
    data_dir: Option<PathBuf>,
    have_photons: bool,
    limit: f64,
    residual: ResidualPolicy,
    branching: IndexPolicy,
    tag: String,
}

impl PhotoDisintegration {
    /// Create a builder.
    pub fn builder() -> PhotoDisintegrationBuilder {
        PhotoDisintegrationBuilder {
            field: None,
            tables: None,
            data_dir: None,
            have_photons: false,
            limit: 0.1,
            residual: ResidualPolicy::NoReaction,
            branching: IndexPolicy::Nearest,
            tag: "PD".to_string(),
        }
    }
}

impl PhotoDisintegrationBuilder {
    /// Photon background the tables belong to.
    pub fn photon_field(mut self, field: Arc<dyn PhotonField>) -> Self {
        self.field = Some(field);
        self
    }

    /// Use already loaded tables.
    pub fn tables(mut self, tables: Arc<PhotoDisintegrationTables>) -> Self {
        self.tables = Some(tables);
        self
    }

    /// Load tables for the photon field from this data directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Emit de-excitation photons. Default: `false`.
    pub fn have_photons(mut self, on: bool) -> Self {
        self.have_photons = on;
        self
    }

    /// Next-step limit as a fraction of the mean free path. Default: `0.1`.
    pub fn limit(mut self, limit: f64) -> Self {
        self.limit = limit;
        self
    }

    /// Outcome of channel draws beyond the branching sum.
    /// Default: [`ResidualPolicy::NoReaction`].
    pub fn residual(mut self, residual: ResidualPolicy) -> Self {
        self.residual = residual;
        self
    }

    /// How branching ratios are read between grid nodes.
    /// Default: [`IndexPolicy::Nearest`].
    pub fn branching(mut self, policy: IndexPolicy) -> Self {
        self.branching = policy;
        self
    }

    /// Interaction tag for secondaries. Default: `"PD"`.
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
    pub fn build(self) -> Result<PhotoDisintegration, SetupError> {
        let field = self
            .field
            .ok_or(uhecr_core::ConfigError::MissingField { name: "photon_field" })?;
        let limit = check_limit(self.limit)?;
        let tables = match (self.tables, self.data_dir) {
            (Some(t), _) => t,
            (None, Some(dir)) => Arc::new(PhotoDisintegrationTables::load(&dir, field.name())?),
            (None, None) => {
                return Err(uhecr_core::ConfigError::MissingField { name: "tables" }.into())
            }
        };
        Ok(PhotoDisintegration {
            field,
            tables,
            stepper: StochasticStepper::new(limit),
            selector: ChannelSelector::new(self.residual),
            branching: self.branching,
            have_photons: self.have_photons,
            emitter: SecondaryEmitter::new(NAME, self.tag),
        })
    }
}

impl PhotoDisintegration {
    /// The loaded tables.
    pub fn tables(&self) -> &Arc<PhotoDisintegrationTables> {
        &self.tables
    }

    /// Whether de-excitation photons are emitted.
    pub fn have_photons(&self) -> bool {
        self.have_photons
    }

    /// Switch de-excitation photon emission.
    pub fn set_have_photons(&mut self, on: bool) {
        self.have_photons = on;
    }

    /// Next-step limit fraction.
    pub fn limit(&self) -> f64 {
        self.stepper.limit()
    }

    /// Set the next-step limit fraction.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidLimit`](uhecr_core::ConfigError::InvalidLimit)
    /// for non-finite or non-positive values.
    pub fn set_limit(&mut self, limit: f64) -> Result<(), uhecr_core::ConfigError> {
        self.stepper.set_limit(check_limit(limit)?);
        Ok(())
    }

    /// How branching ratios are read between grid nodes.
    pub fn branching(&self) -> IndexPolicy {
        self.branching
    }

    /// Set the branching-ratio policy.
    pub fn set_branching(&mut self, policy: IndexPolicy) {
        self.branching = policy;
    }

    /// Interaction tag attached to secondaries.
    pub fn interaction_tag(&self) -> &str {
        self.emitter.tag()
    }

    /// Set the interaction tag.
    pub fn set_interaction_tag(&mut self, tag: impl Into<String>) {
        self.emitter.set_tag(tag);
    }

    /// Energy-loss length [m] of particle `id` with Lorentz factor `gamma`
    /// at redshift `z`.
    ///
    /// The total rate is scaled per physical distance, (1+z)^3, and
    /// weighted by the mean fraction of nucleons lost per interaction.
    /// Returns `f64::INFINITY` when no disintegration applies.
    pub fn loss_length(&self, id: ParticleId, gamma: f64, z: f64) -> f64 {
        let Some(isotope) = id.isotope() else {
            return f64::INFINITY;
        };
        let lg = (gamma * (1.0 + z)).log10();
        let Some(rate) = self.tables.rates.rate(isotope, lg) else {
            return f64::INFINITY;
        };
        let mean_loss = self.tables.branching.mean_mass_loss(isotope, lg);
        let loss_rate = rate
            * RedshiftScaling::Physical.factor(z, self.field.as_ref())
            * mean_loss
            / isotope.mass_number() as f64;
        if loss_rate > 0.0 && loss_rate.is_finite() {
            1.0 / loss_rate
        } else {
            f64::INFINITY
        }
    }

    /// Fragments of `channel` for a parent with energy per nucleon `epa`.
    fn fragments(
        &self,
        channel: Channel,
        epa: f64,
        candidate: &Candidate,
        rng: &dyn RandomSource,
    ) -> Result<Products, InteractionError> {
        let species = [
            (channel.neutrons(), 1, 0),
            (channel.protons(), 1, 1),
            (channel.deuterons(), 2, 1),
            (channel.tritons(), 3, 1),
            (channel.helions(), 3, 2),
            (channel.alphas(), 4, 2),
        ];
        let mut products = Products::new();
        for (count, a, z) in species {
            if count == 0 {
                continue;
            }
            let id = self.emitter.nucleus(a, z, candidate, rng)?;
            for _ in 0..count {
                products.push(Product::new(id, epa * a as f64));
            }
        }
        Ok(products)
    }

    /// Disintegrate the candidate through `channel`.
    fn disintegrate(
        &self,
        candidate: &mut Candidate,
        parent: Isotope,
        channel: Channel,
        rng: &mut dyn RandomSource,
    ) -> Result<(), InteractionError> {
        log::debug!(
            "{NAME}: channel {channel} on {}",
            candidate.description()
        );
        let a = parent.mass_number();
        let epa = candidate.current.energy() / a as f64;

        let daughter = channel.daughter(parent).ok_or_else(|| {
            self.emitter
                .fatal(format!("channel {channel} exceeds {parent}"), candidate, rng)
        })?;
        let daughter_id = self.emitter.nucleus(
            daughter.mass_number() as i64,
            daughter.z as i64,
            candidate,
            rng,
        )?;
        let products = self.fragments(channel, epa, candidate, rng)?;

        let position = rng.interpolated_position(
            &candidate.previous.position(),
            &candidate.current.position(),
        );
        self.emitter.emit(candidate, &products, position);
        self.emitter
            .transform(candidate, daughter_id, epa * daughter.mass_number() as f64);

        if self.have_photons {
            let index = self.tables.photons.grid().nearest_index(log_lorentz(candidate));
            let lines = self.tables.photons.lines(parent, daughter);
            self.emitter
                .emit_photon_lines(candidate, lines, index, position, rng);
        }
        Ok(())
    }
}

impl RateProvider for PhotoDisintegration {
    fn local_rate(&self, candidate: &Candidate) -> Option<LocalRate> {
        let isotope = candidate.current.id().isotope()?;
        let lg = log_lorentz(candidate);
        let z = candidate.redshift();
        let rate = self.tables.rates.rate(isotope, lg)?
            * RedshiftScaling::Comoving.factor(z, self.field.as_ref())
            * self.field.radial_scaling(candidate.current.position().norm());
        Some(LocalRate {
            rate,
            log_lorentz: lg,
            isotope: Some(isotope),
        })
    }
}

impl InteractionEffect for PhotoDisintegration {
    fn interact(
        &self,
        candidate: &mut Candidate,
        rate: &LocalRate,
        rng: &mut dyn RandomSource,
    ) -> Result<(), InteractionError> {
        let Some(parent) = rate.isotope else {
            return Ok(());
        };
        let ratios = self
            .branching
            .ratios(&self.tables.branching, parent, rate.log_lorentz);
        let Some(index) = self.selector.sample(&ratios, rng) else {
            return Ok(());
        };
        let channel = self.tables.branching.branches(parent)[index].channel;
        self.disintegrate(candidate, parent, channel, rng)
    }
}

impl Process for PhotoDisintegration {
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
