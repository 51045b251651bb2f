//! Bethe-Heitler electron-pair production as a continuous energy loss.
//!
//! Unlike the other processes, pair production is not stochastic: every
//! step removes the fraction `step / loss_length` of the nucleus' energy.
//! Optionally the lost energy is converted into e+e- pairs drawn from a
//! tabulated pair-energy spectrum.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use uhecr_core::mass::nuclear_mass;
use uhecr_core::units::{EV, MASS_PROTON};
use uhecr_core::{Candidate, ConfigError, InteractionError, ParticleId, PhotonField, RandomSource};
use uhecr_interaction::{Process, RedshiftScaling};
use uhecr_tables::loader::{load_loss_rate_curve, load_pair_spectrum, PAIR_SPECTRUM_ROWS};
use uhecr_tables::{CdfTable, TableError, TabulatedCurve};

use crate::error::{check_limit, SetupError};

const NAME: &str = "ElectronPairProduction";

/// Power-law slope of the loss rate beyond the last tabulated Lorentz factor.
const HIGH_ENERGY_SLOPE: f64 = -0.6;

/// Loss-rate curve and optional pair spectrum for one photon field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PairProductionTables {
    /// Loss rate [1/m] of a proton over Lorentz factor.
    pub loss_rate: TabulatedCurve,
    /// Pair-energy CDFs, one row per 0.1 decade of Lorentz factor.
    pub spectrum: Option<CdfTable>,
}

impl PairProductionTables {
    /// Load the tables of photon field `field_name` from `data_dir`.
    ///
    /// The spectrum is only read when `with_spectrum` is set.
    ///
    /// # Errors
    ///
    /// [`TableError`] if a required file is missing or malformed.
    pub fn load(
        data_dir: &Path,
        field_name: &str,
        with_spectrum: bool,
    ) -> Result<Self, TableError> {
        let dir = data_dir.join("ElectronPairProduction");
        let loss_rate = load_loss_rate_curve(&dir.join(format!("lossrate_{field_name}.txt")))?;
        let spectrum = if with_spectrum {
            let short: String = field_name.chars().take(3).collect();
            Some(load_pair_spectrum(&dir.join(format!("spectrum_{short}.txt")))?)
        } else {
            None
        };
        Ok(Self {
            loss_rate,
            spectrum,
        })
    }
}

/// Continuous electron-pair production energy loss.
pub struct ElectronPairProduction {
    field: Arc<dyn PhotonField>,
    tables: Arc<PairProductionTables>,
    have_electrons: bool,
    limit: f64,
    tag: String,
}

/// Builder for [`ElectronPairProduction`].
///
/// Defaults: `have_electrons = false`, `limit = 0.1`, `tag = "EPP"`.
pub struct ElectronPairProductionBuilder {
    field: Option<Arc<dyn PhotonField>>,
    tables: Option<Arc<PairProductionTables>>,
    data_dir: Option<PathBuf>,
    have_electrons: bool,
    limit: f64,
    tag: String,
}

impl ElectronPairProduction {
    /// Create a builder.
    pub fn builder() -> ElectronPairProductionBuilder {
        ElectronPairProductionBuilder {
            field: None,
            tables: None,
            data_dir: None,
            have_electrons: false,
            limit: 0.1,
            tag: "EPP".to_string(),
        }
    }
}

impl ElectronPairProductionBuilder {
    /// Photon background the tables belong to.
    pub fn photon_field(mut self, field: Arc<dyn PhotonField>) -> Self {
        self.field = Some(field);
        self
    }

    /// Use already loaded tables.
    pub fn tables(mut self, tables: Arc<PairProductionTables>) -> Self {
        self.tables = Some(tables);
        self
    }

    /// Load tables for the photon field from this data directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Emit the produced pairs as secondaries. Default: `false`.
    pub fn have_electrons(mut self, on: bool) -> Self {
        self.have_electrons = on;
        self
    }

    /// Next-step limit as a fraction of the loss length. Default: `0.1`.
    pub fn limit(mut self, limit: f64) -> Self {
        self.limit = limit;
        self
    }

    /// Interaction tag for secondaries. Default: `"EPP"`.
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
    pub fn build(self) -> Result<ElectronPairProduction, SetupError> {
        let field = self
            .field
            .ok_or(ConfigError::MissingField { name: "photon_field" })?;
        let limit = check_limit(self.limit)?;
        let tables = match (self.tables, self.data_dir) {
            (Some(t), _) => t,
            (None, Some(dir)) => Arc::new(PairProductionTables::load(
                &dir,
                field.name(),
                self.have_electrons,
            )?),
            (None, None) => return Err(ConfigError::MissingField { name: "tables" }.into()),
        };
        if self.have_electrons && tables.spectrum.is_none() {
            log::warn!("{NAME}: electrons requested but no pair spectrum loaded");
        }
        Ok(ElectronPairProduction {
            field,
            tables,
            have_electrons: self.have_electrons,
            limit,
            tag: self.tag,
        })
    }
}

impl ElectronPairProduction {
    /// The loaded tables.
    pub fn tables(&self) -> &Arc<PairProductionTables> {
        &self.tables
    }

    /// Whether pairs are emitted as secondaries.
    pub fn have_electrons(&self) -> bool {
        self.have_electrons
    }

    /// Switch pair emission. Without a loaded spectrum no pairs are
    /// emitted either way.
    pub fn set_have_electrons(&mut self, on: bool) {
        self.have_electrons = on;
    }

    /// Next-step limit fraction.
    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Set the next-step limit fraction.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidLimit`] for non-finite or non-positive values.
    pub fn set_limit(&mut self, limit: f64) -> Result<(), ConfigError> {
        self.limit = check_limit(limit)?;
        Ok(())
    }

    /// Interaction tag attached to secondaries.
    pub fn interaction_tag(&self) -> &str {
        &self.tag
    }

    /// Set the interaction tag.
    pub fn set_interaction_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    /// Energy-loss length [m] of particle `id` with Lorentz factor `gamma`
    /// at redshift `z`.
    ///
    /// The proton loss rate is scaled by Z²/A and per physical distance.
    /// Returns `f64::INFINITY` for neutral particles and below the
    /// tabulated threshold.
    pub fn loss_length(&self, id: ParticleId, gamma: f64, z: f64) -> f64 {
        let charge = id.charge_number();
        if !id.is_nucleus() || charge <= 0 {
            return f64::INFINITY;
        }
        let curve = &self.tables.loss_rate;
        let (Some((first, _)), Some((last_x, last_rate))) = (curve.domain(), curve.last()) else {
            return f64::INFINITY;
        };
        let lf = gamma * (1.0 + z);
        if lf < first {
            return f64::INFINITY;
        }
        let mut rate = if lf < last_x {
            curve.value(lf)
        } else {
            last_rate * (lf / last_x).powf(HIGH_ENERGY_SLOPE)
        };
        let a = nuclear_mass(id.mass_number(), charge as u32) / MASS_PROTON;
        let z2 = (charge * charge) as f64;
        rate *= z2 / a * RedshiftScaling::Physical.factor(z, self.field.as_ref());
        if rate > 0.0 && rate.is_finite() {
            1.0 / rate
        } else {
            f64::INFINITY
        }
    }

    /// Emit e+e- pairs until the lost energy `loss_energy` is used up.
    fn emit_pairs(
        &self,
        candidate: &mut Candidate,
        spectrum: &CdfTable,
        loss_energy: f64,
        rng: &mut dyn RandomSource,
    ) {
        let lg = candidate.current.lorentz_factor().log10();
        let row = ((lg - 6.05) * 10.0).round().clamp(0.0, (PAIR_SPECTRUM_ROWS - 1) as f64) as usize;
        let Some(cdf) = spectrum.row_clamped(row) else {
            return;
        };
        let mut remaining = loss_energy;
        while remaining > 0.0 {
            let Some(bin) = rng.rand_bin(cdf) else {
                break;
            };
            let energy = 10f64.powf(6.95 + (bin as f64 + rng.uniform()) * 0.1) * EV;
            let pair = 2.0 * energy;
            if pair > remaining && rng.uniform() > remaining / pair {
                break;
            }
            remaining -= pair;
            let position = rng.interpolated_position(
                &candidate.previous.position(),
                &candidate.current.position(),
            );
            candidate.add_secondary(ParticleId::ELECTRON, energy, position, 1.0, &self.tag);
            candidate.add_secondary(ParticleId::POSITRON, energy, position, 1.0, &self.tag);
        }
    }
}

impl Process for ElectronPairProduction {
    fn name(&self) -> &str {
        NAME
    }

    fn process(
        &self,
        candidate: &mut Candidate,
        rng: &mut dyn RandomSource,
    ) -> Result<(), InteractionError> {
        let id = candidate.current.id();
        if !id.is_nucleus() {
            return Ok(());
        }
        let z = candidate.redshift();
        let gamma = candidate.current.lorentz_factor();
        let radial = self.field.radial_scaling(candidate.current.position().norm());
        let loss_length = self.loss_length(id, gamma, z) / radial;
        if !loss_length.is_finite() {
            return Ok(());
        }

        let step = candidate.current_step() / (1.0 + z);
        let loss = step / loss_length;

        if self.have_electrons {
            if let Some(spectrum) = &self.tables.spectrum {
                let loss_energy = candidate.current.energy() * loss;
                self.emit_pairs(candidate, spectrum, loss_energy, rng);
            }
        }

        candidate
            .current
            .set_lorentz_factor(gamma * (1.0 - loss).max(0.0));
        candidate.limit_next_step(self.limit * loss_length);
        Ok(())
    }
}
