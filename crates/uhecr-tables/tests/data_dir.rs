//! Loading a complete fixture data directory from disk.

use std::fs;

use uhecr_core::units::{EV, MPC};
use uhecr_core::Isotope;
use uhecr_tables::loader::{
    load_branching_table, load_decay_table, load_loss_rate_curve, load_pair_spectrum,
    load_photon_emission_table, load_rate_table, load_spectrum_table, PAIR_SPECTRUM_COLUMNS,
    PAIR_SPECTRUM_ROWS,
};
use uhecr_tables::{TableError, LORENTZ_GRID};
use uhecr_test_utils::fixtures;

#[test]
fn every_fixture_file_loads() {
    let dir = tempfile::tempdir().unwrap();
    fixtures::write_data_dir(dir.path(), "CMB").unwrap();
    let root = dir.path();

    let rates = load_rate_table(&root.join("Photodisintegration/rate_CMB.txt")).unwrap();
    assert_eq!(rates.len(), fixtures::fixture_isotopes().count());
    let r = rates.rate(Isotope::new(26, 30), 10.0).unwrap();
    assert!((r * MPC - fixtures::FIXTURE_RATE_PER_MPC).abs() < 1e-12);

    let branching =
        load_branching_table(&root.join("Photodisintegration/branching_CMB.txt")).unwrap();
    assert_eq!(branching.branches(Isotope::new(6, 6)).len(), 3);

    let photons =
        load_photon_emission_table(&root.join("Photodisintegration/photon_emission_CMB.txt"))
            .unwrap();
    let lines = photons.lines(Isotope::new(6, 6), Isotope::new(6, 5));
    assert_eq!(lines.len(), 1);
    assert!((lines[0].energy / (2e6 * EV) - 1.0).abs() < 1e-12);

    let curve =
        load_loss_rate_curve(&root.join("ElectronPairProduction/lossrate_CMB.txt")).unwrap();
    let (first, last) = curve.domain().unwrap();
    assert!((first / 1e6 - 1.0).abs() < 1e-12);
    assert!((last / 1e13 - 1.0).abs() < 1e-12);

    let pairs = load_pair_spectrum(&root.join("ElectronPairProduction/spectrum_CMB.txt")).unwrap();
    assert_eq!(pairs.len(), PAIR_SPECTRUM_ROWS);
    assert_eq!(pairs.row(0).unwrap().len(), PAIR_SPECTRUM_COLUMNS);

    let pion = load_rate_table(&root.join("PhotoPionProduction/rate_CMB.txt")).unwrap();
    assert!(pion.contains(Isotope::new(1, 0)));
    assert!(pion.contains(Isotope::new(0, 1)));

    let spectrum = load_spectrum_table(&root.join("ElasticScattering/spectrum_CMB.txt")).unwrap();
    assert_eq!(spectrum.len(), LORENTZ_GRID.points);
    let last = spectrum.row(0).unwrap().last().copied();
    assert_eq!(last, Some(fixtures::SPECTRUM_BINS as f64));

    let decays = load_decay_table(&root.join("nuclear_decay.txt")).unwrap();
    assert_eq!(decays.len(), 3);
    assert!(decays.modes(Isotope::new(6, 6)).is_empty());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_rate_table(&dir.path().join("rate_CMB.txt")).unwrap_err();
    assert!(matches!(err, TableError::Io { .. }));
    assert!(err.to_string().contains("rate_CMB.txt"));
}

#[test]
fn errors_point_at_file_and_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rate_bad.txt");
    fs::write(&path, "# header\n6 6 1 2 3\n").unwrap();
    match load_rate_table(&path).unwrap_err() {
        TableError::WrongLength {
            source,
            line,
            expected,
            found,
        } => {
            assert!(source.ends_with("rate_bad.txt"));
            assert_eq!(line, 2);
            assert_eq!(expected, LORENTZ_GRID.points);
            assert_eq!(found, 3);
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn out_of_range_isotope_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rate_heavy.txt");
    let mut text = String::from("27 30");
    for _ in 0..LORENTZ_GRID.points {
        text.push_str(" 1");
    }
    text.push('\n');
    fs::write(&path, text).unwrap();
    assert!(matches!(
        load_rate_table(&path).unwrap_err(),
        TableError::IsotopeOutOfRange { z: 27, n: 30, line: 1, .. }
    ));
}
