//! Synthetic interaction tables.
//!
//! The fixtures mimic the shape of real CMB tables without their physics:
//!
//! - every nucleus with `1 <= Z <= 26`, `0 <= N <= 30`, `A >= 2` gets a
//!   flat rate, so interactions are certain over cosmological distances;
//! - branching ratios split evenly between single-neutron and
//!   single-proton knock-out, with an alpha channel for `Z >= 3, N >= 2`;
//!   hydrogen isotopes only shed neutrons and `N = 0` nuclei only shed
//!   protons, so no channel produces a chargeless multi-neutron daughter;
//! - single nucleons have no rate, so disintegration chains terminate.
//!
//! Each table is produced as file text (`*_text`) and parsed through the
//! real loaders, so the fixtures also exercise the file format.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use uhecr_core::Isotope;
use uhecr_tables::loader::{
    read_branching_table, read_decay_table, read_loss_rate_curve, read_pair_spectrum,
    read_photon_emission_table, read_rate_table, read_spectrum_table, PAIR_SPECTRUM_COLUMNS,
    PAIR_SPECTRUM_ROWS,
};
use uhecr_tables::{
    BranchingTable, CdfTable, DecayTable, PhotonEmissionTable, RateTable, TabulatedCurve,
    LORENTZ_GRID,
};

/// Rate per Mpc used by [`rate_text`] defaults.
pub const FIXTURE_RATE_PER_MPC: f64 = 1.0;

/// Number of rest-frame energy bins in the elastic-scattering spectrum.
pub const SPECTRUM_BINS: usize = 513;

/// Isotopes covered by the synthetic tables, in (Z, N) order.
pub fn fixture_isotopes() -> impl Iterator<Item = Isotope> {
    (1..=26u32)
        .flat_map(|z| (0..=30u32).map(move |n| Isotope::new(z, n)))
        .filter(|iso| iso.mass_number() >= 2)
}

fn push_curve(line: &mut String, value: f64) {
    for _ in 0..LORENTZ_GRID.points {
        let _ = write!(line, " {value}");
    }
    line.push('\n');
}

/// Flat photodisintegration rates for every fixture isotope.
pub fn rate_text(rate_per_mpc: f64) -> String {
    let mut text = String::from("# Z N rate[1/Mpc] on log10(gamma) = 4..14\n");
    for iso in fixture_isotopes() {
        let _ = write!(text, "{} {}", iso.z, iso.n);
        push_curve(&mut text, rate_per_mpc);
    }
    text
}

/// Nucleon (and, for `Z >= 3, N >= 2`, alpha) branching ratios.
pub fn branching_text() -> String {
    let mut text = String::from("# Z N channel ratios\n");
    for iso in fixture_isotopes() {
        let channels: &[(u32, f64)] = if iso.z >= 3 && iso.n >= 2 {
            &[(100_000, 0.4), (10_000, 0.4), (1, 0.2)]
        } else if iso.n == 0 {
            &[(10_000, 1.0)]
        } else if iso.z == 1 {
            &[(100_000, 1.0)]
        } else {
            &[(100_000, 0.5), (10_000, 0.5)]
        };
        for (channel, ratio) in channels {
            let _ = write!(text, "{} {} {channel}", iso.z, iso.n);
            push_curve(&mut text, *ratio);
        }
    }
    text
}

/// One certain 2 MeV de-excitation line for C-12 -> C-11 and C-12 -> B-11.
pub fn photon_emission_text() -> String {
    let mut text = String::from("# Z N Zd Nd E[eV] probabilities\n");
    for (zd, nd) in [(6, 5), (5, 6)] {
        let _ = write!(text, "6 6 {zd} {nd} 2000000");
        push_curve(&mut text, 1.0);
    }
    text
}

/// Constant loss rate 0.01 / Mpc for log10(γ) from 6 to 13.
pub fn loss_rate_text() -> String {
    let mut text = String::from("# log10(gamma) lossrate[1/Mpc]\n");
    for i in 0..=14 {
        let _ = writeln!(text, "{} 0.01", 6.0 + 0.5 * i as f64);
    }
    text
}

/// Flat dN/dE on the 70 x 170 pair-energy grid.
pub fn pair_spectrum_text() -> String {
    let mut text = String::new();
    let row = vec!["1e-20"; PAIR_SPECTRUM_COLUMNS].join(" ");
    for _ in 0..PAIR_SPECTRUM_ROWS {
        text.push_str(&row);
        text.push('\n');
    }
    text
}

/// Photo-pion rates for the free proton `(1 0)` and neutron `(0 1)`.
pub fn pion_rate_text(rate_per_mpc: f64) -> String {
    let mut text = String::from("# nucleon rates\n");
    for (z, n) in [(1, 0), (0, 1)] {
        let _ = write!(text, "{z} {n}");
        push_curve(&mut text, rate_per_mpc);
    }
    text
}

/// Flat rest-frame photon spectrum for every grid node.
pub fn scattering_spectrum_text() -> String {
    let mut text = String::from("# index weights\n");
    let weights = vec!["1"; SPECTRUM_BINS].join(" ");
    for i in 0..LORENTZ_GRID.points {
        let _ = writeln!(text, "{i} {weights}");
    }
    text
}

/// Neutron beta decay, Be-8 alpha decay and C-11 beta-plus decay.
pub fn decay_text() -> String {
    String::from(
        "# Z N channel lifetime[s]\n\
         0 1 10000 879.4\n\
         4 4 100 1.2e-16\n\
         6 5 1000 1760\n\
         6 6 0 inf\n",
    )
}

pub fn rate_table(rate_per_mpc: f64) -> RateTable {
    read_rate_table(rate_text(rate_per_mpc).as_bytes(), "fixture").unwrap()
}

pub fn branching_table() -> BranchingTable {
    read_branching_table(branching_text().as_bytes(), "fixture").unwrap()
}

pub fn photon_emission_table() -> PhotonEmissionTable {
    read_photon_emission_table(photon_emission_text().as_bytes(), "fixture").unwrap()
}

pub fn loss_rate_curve() -> TabulatedCurve {
    read_loss_rate_curve(loss_rate_text().as_bytes(), "fixture").unwrap()
}

pub fn pair_spectrum() -> CdfTable {
    read_pair_spectrum(pair_spectrum_text().as_bytes(), "fixture").unwrap()
}

pub fn pion_rate_table(rate_per_mpc: f64) -> RateTable {
    read_rate_table(pion_rate_text(rate_per_mpc).as_bytes(), "fixture").unwrap()
}

pub fn scattering_spectrum() -> CdfTable {
    read_spectrum_table(scattering_spectrum_text().as_bytes(), "fixture").unwrap()
}

pub fn decay_table() -> DecayTable {
    read_decay_table(decay_text().as_bytes(), "fixture").unwrap()
}

/// Write a complete data directory for the photon field `name` under `root`.
pub fn write_data_dir(root: &Path, name: &str) -> io::Result<()> {
    let short: String = name.chars().take(3).collect();
    let pd = root.join("Photodisintegration");
    let epp = root.join("ElectronPairProduction");
    let ppp = root.join("PhotoPionProduction");
    let es = root.join("ElasticScattering");
    for dir in [&pd, &epp, &ppp, &es] {
        fs::create_dir_all(dir)?;
    }
    fs::write(pd.join(format!("rate_{name}.txt")), rate_text(FIXTURE_RATE_PER_MPC))?;
    fs::write(pd.join(format!("branching_{name}.txt")), branching_text())?;
    fs::write(
        pd.join(format!("photon_emission_{short}.txt")),
        photon_emission_text(),
    )?;
    fs::write(epp.join(format!("lossrate_{name}.txt")), loss_rate_text())?;
    fs::write(epp.join(format!("spectrum_{short}.txt")), pair_spectrum_text())?;
    fs::write(
        ppp.join(format!("rate_{name}.txt")),
        pion_rate_text(FIXTURE_RATE_PER_MPC),
    )?;
    fs::write(es.join(format!("rate_{name}.txt")), rate_text(FIXTURE_RATE_PER_MPC))?;
    fs::write(es.join(format!("spectrum_{name}.txt")), scattering_spectrum_text())?;
    fs::write(root.join("nuclear_decay.txt"), decay_text())?;
    Ok(())
}
