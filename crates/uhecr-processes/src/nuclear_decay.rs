//! Radioactive decay of unstable nuclei in flight.
//!
//! Rest-frame lifetimes are dilated by the Lorentz factor; the photon
//! background plays no role. Each decay mode is a combination of β⁻, β⁺,
//! alpha, proton and neutron emission.
//!
//! The β spectrum is simplified: each β decay hands a lepton energy of
//! γ·ε, ε uniform in [0, 1 MeV], to the charged lepton and its neutrino,
//! split uniformly between the two.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use uhecr_core::units::{C_LIGHT, MEV};
use uhecr_core::{Candidate, ConfigError, InteractionError, Isotope, ParticleId, RandomSource};
use uhecr_interaction::{
    log_lorentz, ChannelSelector, InteractionEffect, LocalRate, Process, RateProvider,
    ResidualPolicy, StochasticStepper,
};
use uhecr_tables::loader::load_decay_table;
use uhecr_tables::{DecayChannel, DecayTable, PhotonEmissionTable, TableError};

use crate::error::{check_limit, SetupError};
use crate::secondaries::{Product, Products, SecondaryEmitter};

const NAME: &str = "NuclearDecay";

/// Upper bound of the rest-frame β lepton energy.
const BETA_ENERGY_MAX: f64 = 1.0 * MEV;

/// Decay modes plus optional de-excitation lines.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NuclearDecayTables {
    /// Decay modes per isotope.
    pub decays: DecayTable,
    /// Photon lines per (parent, daughter); empty if none are known.
    pub photons: PhotonEmissionTable,
}

impl NuclearDecayTables {
    /// Load `nuclear_decay.txt` from `data_dir`, without photon lines.
    ///
    /// # Errors
    ///
    /// [`TableError`] if the file is missing or malformed.
    pub fn load(data_dir: &Path) -> Result<Self, TableError> {
        Ok(Self {
            decays: load_decay_table(&data_dir.join("nuclear_decay.txt"))?,
            photons: PhotonEmissionTable::new(),
        })
    }
}

/// Nuclear decay process.
pub struct NuclearDecay {
    tables: Arc<NuclearDecayTables>,
    stepper: StochasticStepper,
    selector: ChannelSelector,
    have_electrons: bool,
    have_neutrinos: bool,
    have_photons: bool,
    emitter: SecondaryEmitter,
}

/// Builder for [`NuclearDecay`].
///
/// Defaults: all secondary switches off, `limit = 0.1`, `tag = "ND"`.
pub struct NuclearDecayBuilder {
    tables: Option<Arc<NuclearDecayTables>>,
    data_dir: Option<PathBuf>,
    have_electrons: bool,
    have_neutrinos: bool,
    have_photons: bool,
    limit: f64,
    tag: String,
}

impl NuclearDecay {
    /// Create a builder.
    pub fn builder() -> NuclearDecayBuilder {
        NuclearDecayBuilder {
            tables: None,
            data_dir: None,
            have_electrons: false,
            have_neutrinos: false,
            have_photons: false,
            limit: 0.1,
            tag: "ND".to_string(),
        }
    }
}

impl NuclearDecayBuilder {
    /// Use already loaded tables.
    pub fn tables(mut self, tables: Arc<NuclearDecayTables>) -> Self {
        self.tables = Some(tables);
        self
    }

    /// Load the decay table from this data directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Emit β electrons and positrons.
    pub fn have_electrons(mut self, on: bool) -> Self {
        self.have_electrons = on;
        self
    }

    /// Emit β neutrinos.
    pub fn have_neutrinos(mut self, on: bool) -> Self {
        self.have_neutrinos = on;
        self
    }

    /// Emit de-excitation photons.
    pub fn have_photons(mut self, on: bool) -> Self {
        self.have_photons = on;
        self
    }

    /// Next-step limit as a fraction of the decay length.
    pub fn limit(mut self, limit: f64) -> Self {
        self.limit = limit;
        self
    }

    /// Interaction tag for secondaries.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Build the process.
    ///
    /// # Errors
    ///
    /// [`SetupError::Config`] without tables or with an invalid limit,
    /// [`SetupError::Table`] if the decay file cannot be loaded.
    pub fn build(self) -> Result<NuclearDecay, SetupError> {
        let limit = check_limit(self.limit)?;
        let tables = match (self.tables, self.data_dir) {
            (Some(t), _) => t,
            (None, Some(dir)) => Arc::new(NuclearDecayTables::load(&dir)?),
            (None, None) => return Err(ConfigError::MissingField { name: "tables" }.into()),
        };
        Ok(NuclearDecay {
            tables,
            stepper: StochasticStepper::new(limit),
            selector: ChannelSelector::new(ResidualPolicy::LastBranch),
            have_electrons: self.have_electrons,
            have_neutrinos: self.have_neutrinos,
            have_photons: self.have_photons,
            emitter: SecondaryEmitter::new(NAME, self.tag),
        })
    }
}

impl NuclearDecay {
    /// Switch β lepton emission.
    pub fn set_have_electrons(&mut self, on: bool) {
        self.have_electrons = on;
    }

    /// Switch β neutrino emission.
    pub fn set_have_neutrinos(&mut self, on: bool) {
        self.have_neutrinos = on;
    }

    /// Switch de-excitation photon emission.
    pub fn set_have_photons(&mut self, on: bool) {
        self.have_photons = on;
    }

    /// Interaction tag attached to secondaries.
    pub fn interaction_tag(&self) -> &str {
        self.emitter.tag()
    }

    /// Set the interaction tag.
    pub fn set_interaction_tag(&mut self, tag: impl Into<String>) {
        self.emitter.set_tag(tag);
    }

    /// Mean decay length [m] of `isotope` at Lorentz factor `gamma`;
    /// `f64::INFINITY` for stable isotopes.
    pub fn decay_length(&self, isotope: Isotope, gamma: f64) -> f64 {
        let rest_rate: f64 = self
            .tables
            .decays
            .modes(isotope)
            .iter()
            .map(|m| 1.0 / (C_LIGHT * m.lifetime))
            .sum();
        if rest_rate > 0.0 {
            gamma / rest_rate
        } else {
            f64::INFINITY
        }
    }

    /// Apply decay `channel` of `parent`.
    fn decay(
        &self,
        candidate: &mut Candidate,
        parent: Isotope,
        channel: DecayChannel,
        rng: &mut dyn RandomSource,
    ) -> Result<(), InteractionError> {
        let daughter = channel.daughter(parent).ok_or_else(|| {
            self.emitter
                .fatal(format!("decay channel {channel} impossible for {parent}"), candidate, rng)
        })?;
        let a_d = daughter.mass_number();
        let daughter_id = self
            .emitter
            .nucleus(a_d as i64, daughter.z as i64, candidate, rng)?;
        let alpha = self.emitter.nucleus(4, 2, candidate, rng)?;

        let gamma = candidate.current.lorentz_factor();
        let epa = candidate.current.energy() / parent.mass_number() as f64;

        let mut products = Products::new();
        for _ in 0..channel.protons() {
            products.push(Product::new(ParticleId::PROTON, epa));
        }
        for _ in 0..channel.neutrons() {
            products.push(Product::new(ParticleId::NEUTRON, epa));
        }
        for _ in 0..channel.alphas() {
            products.push(Product::new(alpha, 4.0 * epa));
        }

        let position = rng.interpolated_position(
            &candidate.previous.position(),
            &candidate.current.position(),
        );

        let mut lepton_energy = 0.0;
        let minus = (ParticleId::ELECTRON, ParticleId::ANTI_NU_E);
        let plus = (ParticleId::POSITRON, ParticleId::NU_E);
        let betas = std::iter::repeat_n(minus, channel.beta_minus() as usize)
            .chain(std::iter::repeat_n(plus, channel.beta_plus() as usize));
        for (lepton, neutrino) in betas {
            let energy = gamma * BETA_ENERGY_MAX * rng.uniform();
            let share = rng.uniform();
            lepton_energy += energy;
            if self.have_electrons {
                products.push(Product::new(lepton, share * energy));
            }
            if self.have_neutrinos {
                products.push(Product::new(neutrino, (1.0 - share) * energy));
            }
        }

        log::debug!("{NAME}: {parent} -> {daughter} via {channel}");

        self.emitter.emit(candidate, &products, position);
        self.emitter
            .transform(candidate, daughter_id, epa * a_d as f64 - lepton_energy);

        if self.have_photons {
            let index = self.tables.photons.grid().nearest_index(log_lorentz(candidate));
            let lines = self.tables.photons.lines(parent, daughter);
            self.emitter
                .emit_photon_lines(candidate, lines, index, position, rng);
        }
        Ok(())
    }
}

impl RateProvider for NuclearDecay {
    fn local_rate(&self, candidate: &Candidate) -> Option<LocalRate> {
        let isotope = candidate.current.id().isotope()?;
        let length = self.decay_length(isotope, candidate.current.lorentz_factor());
        if !length.is_finite() {
            return None;
        }
        Some(LocalRate {
            rate: 1.0 / length,
            log_lorentz: log_lorentz(candidate),
            isotope: Some(isotope),
        })
    }
}

impl InteractionEffect for NuclearDecay {
    fn interact(
        &self,
        candidate: &mut Candidate,
        rate: &LocalRate,
        rng: &mut dyn RandomSource,
    ) -> Result<(), InteractionError> {
        let Some(parent) = rate.isotope else {
            return Ok(());
        };
        let modes = self.tables.decays.modes(parent);
        let partial: Vec<f64> = modes.iter().map(|m| 1.0 / m.lifetime).collect();
        let total: f64 = partial.iter().sum();
        let weights: Vec<f64> = partial.iter().map(|w| w / total).collect();
        let Some(index) = self.selector.sample(&weights, rng) else {
            return Ok(());
        };
        self.decay(candidate, parent, modes[index].channel, rng)
    }
}

impl Process for NuclearDecay {
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
