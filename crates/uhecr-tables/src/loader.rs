//! Line-oriented text loaders.
//!
//! Every table format is whitespace separated with one record per line.
//! Blank lines and lines starting with `#` are skipped. Each `read_*`
//! function parses from any [`BufRead`]; the matching `load_*` function
//! opens a file and logs what was loaded.
//!
//! Rates in the files are given per Mpc and converted to 1/m on load;
//! photon energies are given in eV and converted to J.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use uhecr_core::units::{EV, MPC};
use uhecr_core::Isotope;

use crate::branching::{Branch, BranchingTable, Channel};
use crate::curve::{CdfTable, TabulatedCurve};
use crate::decay::{DecayChannel, DecayMode, DecayTable};
use crate::emission::{PhotonEmissionTable, PhotonLine};
use crate::error::TableError;
use crate::grid::LORENTZ_GRID;
use crate::isotope::IsotopeTable;
use crate::rate::RateTable;

/// Rows of the electron-pair spectrum table.
pub const PAIR_SPECTRUM_ROWS: usize = 70;
/// Columns of the electron-pair spectrum table.
pub const PAIR_SPECTRUM_COLUMNS: usize = 170;

/// A tokenised data line.
struct Record<'a> {
    source: &'a str,
    line: usize,
    fields: Vec<&'a str>,
}

impl<'a> Record<'a> {
    fn parse<T: FromStr>(&self, index: usize, what: &str) -> Result<T, TableError> {
        let raw = self.fields.get(index).ok_or_else(|| TableError::Parse {
            source: self.source.to_string(),
            line: self.line,
            reason: format!("missing {what}"),
        })?;
        raw.parse().map_err(|_| TableError::Parse {
            source: self.source.to_string(),
            line: self.line,
            reason: format!("invalid {what} '{raw}'"),
        })
    }

    fn values(&self, start: usize, expected: usize) -> Result<Vec<f64>, TableError> {
        let found = self.fields.len().saturating_sub(start);
        if found != expected {
            return Err(TableError::WrongLength {
                source: self.source.to_string(),
                line: self.line,
                expected,
                found,
            });
        }
        (start..self.fields.len())
            .map(|i| self.parse::<f64>(i, "value"))
            .collect()
    }

    fn isotope(&self, z_index: usize) -> Result<Isotope, TableError> {
        let z: u32 = self.parse(z_index, "Z")?;
        let n: u32 = self.parse(z_index + 1, "N")?;
        let isotope = Isotope::new(z, n);
        if !IsotopeTable::<()>::covers(isotope) {
            return Err(TableError::IsotopeOutOfRange {
                source: self.source.to_string(),
                line: self.line,
                z,
                n,
            });
        }
        Ok(isotope)
    }
}

/// Read all lines, then hand each data line to `f` as a [`Record`].
fn for_each_record<R, F>(reader: R, source: &str, mut f: F) -> Result<(), TableError>
where
    R: BufRead,
    F: FnMut(&Record<'_>) -> Result<(), TableError>,
{
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| TableError::Io {
            path: source.to_string(),
            reason: e.to_string(),
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record = Record {
            source,
            line: idx + 1,
            fields: trimmed.split_whitespace().collect(),
        };
        f(&record)?;
    }
    Ok(())
}

/// Re-label an error raised by an in-memory insert with the file position.
fn locate(err: TableError, record: &Record<'_>) -> TableError {
    match err {
        TableError::WrongLength {
            expected, found, ..
        } => TableError::WrongLength {
            source: record.source.to_string(),
            line: record.line,
            expected,
            found,
        },
        TableError::IsotopeOutOfRange { z, n, .. } => TableError::IsotopeOutOfRange {
            source: record.source.to_string(),
            line: record.line,
            z,
            n,
        },
        other => other,
    }
}

/// Parse `Z N r0..r250` lines into a [`RateTable`] in 1/m.
pub fn read_rate_table<R: BufRead>(reader: R, source: &str) -> Result<RateTable, TableError> {
    let mut table = RateTable::new();
    for_each_record(reader, source, |rec| {
        let isotope = rec.isotope(0)?;
        let values = rec
            .values(2, LORENTZ_GRID.points)?
            .into_iter()
            .map(|r| r / MPC)
            .collect();
        table.insert(isotope, values).map_err(|e| locate(e, rec))
    })?;
    Ok(table)
}

/// Parse `Z N channel b0..b250` lines into a [`BranchingTable`].
pub fn read_branching_table<R: BufRead>(
    reader: R,
    source: &str,
) -> Result<BranchingTable, TableError> {
    let mut table = BranchingTable::new();
    for_each_record(reader, source, |rec| {
        let isotope = rec.isotope(0)?;
        let channel = Channel(rec.parse(2, "channel")?);
        let ratios = rec.values(3, LORENTZ_GRID.points)?;
        table
            .push(isotope, Branch { channel, ratios })
            .map_err(|e| locate(e, rec))
    })?;
    Ok(table)
}

/// Parse `Z N Zd Nd E_eV p0..p250` lines into a [`PhotonEmissionTable`].
pub fn read_photon_emission_table<R: BufRead>(
    reader: R,
    source: &str,
) -> Result<PhotonEmissionTable, TableError> {
    let mut table = PhotonEmissionTable::new();
    for_each_record(reader, source, |rec| {
        let parent = rec.isotope(0)?;
        let daughter = rec.isotope(2)?;
        let energy: f64 = rec.parse(4, "photon energy")?;
        let probabilities = rec.values(5, LORENTZ_GRID.points)?;
        table
            .push(
                parent,
                daughter,
                PhotonLine {
                    energy: energy * EV,
                    probabilities,
                },
            )
            .map_err(|e| locate(e, rec))
    })?;
    Ok(table)
}

/// Parse `log10(γ) rate_per_Mpc` lines into a curve of rate [1/m] over γ.
pub fn read_loss_rate_curve<R: BufRead>(
    reader: R,
    source: &str,
) -> Result<TabulatedCurve, TableError> {
    let mut gammas = Vec::new();
    let mut rates = Vec::new();
    let mut last_line = 0;
    for_each_record(reader, source, |rec| {
        let v = rec.values(0, 2)?;
        gammas.push(10f64.powf(v[0]));
        rates.push(v[1] / MPC);
        last_line = rec.line;
        Ok(())
    })?;
    TabulatedCurve::new(gammas, rates).ok_or_else(|| TableError::Parse {
        source: source.to_string(),
        line: last_line,
        reason: "Lorentz factors must be strictly ascending".to_string(),
    })
}

/// Parse the electron-pair spectrum: 70 rows of 170 dN/dE values.
///
/// The values may be spread over lines arbitrarily. Column `j` is
/// weighted by the pair energy 10^(7 + 0.1 j) and each row is stored as
/// an unnormalised CDF.
pub fn read_pair_spectrum<R: BufRead>(reader: R, source: &str) -> Result<CdfTable, TableError> {
    let mut values = Vec::with_capacity(PAIR_SPECTRUM_ROWS * PAIR_SPECTRUM_COLUMNS);
    let mut last_line = 0;
    for_each_record(reader, source, |rec| {
        for i in 0..rec.fields.len() {
            values.push(rec.parse::<f64>(i, "value")?);
        }
        last_line = rec.line;
        Ok(())
    })?;
    let expected = PAIR_SPECTRUM_ROWS * PAIR_SPECTRUM_COLUMNS;
    if values.len() != expected {
        return Err(TableError::WrongLength {
            source: source.to_string(),
            line: last_line,
            expected,
            found: values.len(),
        });
    }
    let rows = values
        .chunks(PAIR_SPECTRUM_COLUMNS)
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(j, dnde)| dnde * 10f64.powf(7.0 + 0.1 * j as f64))
                .collect()
        })
        .collect();
    Ok(CdfTable::from_densities(rows))
}

/// Parse `i w0..wK` lines (one per grid node, in order) into a [`CdfTable`].
pub fn read_spectrum_table<R: BufRead>(reader: R, source: &str) -> Result<CdfTable, TableError> {
    let mut table = CdfTable::new();
    for_each_record(reader, source, |rec| {
        let index: usize = rec.parse(0, "grid index")?;
        if index != table.len() {
            return Err(TableError::Parse {
                source: source.to_string(),
                line: rec.line,
                reason: format!("expected grid index {}, found {index}", table.len()),
            });
        }
        let width = rec.fields.len().saturating_sub(1);
        table.push_density(rec.values(1, width)?);
        Ok(())
    })?;
    Ok(table)
}

/// Parse `Z N channel lifetime_s` lines into a [`DecayTable`].
pub fn read_decay_table<R: BufRead>(reader: R, source: &str) -> Result<DecayTable, TableError> {
    let mut table = DecayTable::new();
    for_each_record(reader, source, |rec| {
        let isotope = rec.isotope(0)?;
        let channel = DecayChannel(rec.parse(2, "channel")?);
        let lifetime: f64 = rec.parse(3, "lifetime")?;
        table
            .push(isotope, DecayMode { channel, lifetime })
            .map_err(|e| locate(e, rec))
    })?;
    Ok(table)
}

fn open(path: &Path) -> Result<BufReader<File>, TableError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| TableError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

/// Load a rate table from `path`.
pub fn load_rate_table(path: &Path) -> Result<RateTable, TableError> {
    let source = path.display().to_string();
    let table = read_rate_table(open(path)?, &source)?;
    log::info!("loaded {} isotope rates from {source}", table.len());
    Ok(table)
}

/// Load a branching table from `path`.
pub fn load_branching_table(path: &Path) -> Result<BranchingTable, TableError> {
    let source = path.display().to_string();
    let table = read_branching_table(open(path)?, &source)?;
    log::info!("loaded branching ratios for {} isotopes from {source}", table.len());
    Ok(table)
}

/// Load a photon-emission table from `path`.
pub fn load_photon_emission_table(path: &Path) -> Result<PhotonEmissionTable, TableError> {
    let source = path.display().to_string();
    let table = read_photon_emission_table(open(path)?, &source)?;
    log::info!("loaded photon lines for {} transitions from {source}", table.len());
    Ok(table)
}

/// Load a loss-rate curve from `path`.
pub fn load_loss_rate_curve(path: &Path) -> Result<TabulatedCurve, TableError> {
    let source = path.display().to_string();
    let curve = read_loss_rate_curve(open(path)?, &source)?;
    log::info!("loaded {} loss-rate samples from {source}", curve.len());
    Ok(curve)
}

/// Load the electron-pair spectrum from `path`.
pub fn load_pair_spectrum(path: &Path) -> Result<CdfTable, TableError> {
    let source = path.display().to_string();
    let table = read_pair_spectrum(open(path)?, &source)?;
    log::info!("loaded pair spectrum ({} rows) from {source}", table.len());
    Ok(table)
}

/// Load a per-node spectrum table from `path`.
pub fn load_spectrum_table(path: &Path) -> Result<CdfTable, TableError> {
    let source = path.display().to_string();
    let table = read_spectrum_table(open(path)?, &source)?;
    log::info!("loaded spectrum ({} rows) from {source}", table.len());
    Ok(table)
}

/// Load a decay table from `path`.
pub fn load_decay_table(path: &Path) -> Result<DecayTable, TableError> {
    let source = path.display().to_string();
    let table = read_decay_table(open(path)?, &source)?;
    log::info!("loaded decay modes for {} isotopes from {source}", table.len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(prefix: &str, value: f64) -> String {
        let mut s = prefix.to_string();
        for _ in 0..251 {
            s.push_str(&format!(" {value}"));
        }
        s
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let text = format!("# header\n\n{}\n", row("6 6", 1.0));
        let table = read_rate_table(text.as_bytes(), "mem").unwrap();
        let r = table.rate(Isotope::new(6, 6), 10.0).unwrap();
        assert!((r - 1.0 / MPC).abs() / r < 1e-12);
    }

    #[test]
    fn short_row_reports_line() {
        let text = "# c\n6 6 1 2 3\n";
        let err = read_rate_table(text.as_bytes(), "mem").unwrap_err();
        assert_eq!(
            err,
            TableError::WrongLength {
                source: "mem".into(),
                line: 2,
                expected: 251,
                found: 3
            }
        );
    }

    #[test]
    fn uncovered_isotope_is_rejected() {
        let text = row("27 0", 1.0);
        let err = read_rate_table(text.as_bytes(), "mem").unwrap_err();
        assert!(matches!(err, TableError::IsotopeOutOfRange { z: 27, n: 0, line: 1, .. }));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let text = row("6 x", 1.0);
        let err = read_rate_table(text.as_bytes(), "mem").unwrap_err();
        assert!(matches!(err, TableError::Parse { line: 1, .. }));
    }

    #[test]
    fn branching_and_emission_rows() {
        let text = format!("{}\n{}\n", row("6 6 100000", 0.5), row("6 6 1", 0.5));
        let table = read_branching_table(text.as_bytes(), "mem").unwrap();
        assert_eq!(table.branches(Isotope::new(6, 6)).len(), 2);

        let text = row("6 6 6 5 2000000", 0.25);
        let table = read_photon_emission_table(text.as_bytes(), "mem").unwrap();
        let lines = table.lines(Isotope::new(6, 6), Isotope::new(6, 5));
        assert_eq!(lines.len(), 1);
        assert!((lines[0].energy - 2e6 * EV).abs() < 1e-25);
    }

    #[test]
    fn loss_rate_curve_uses_lorentz_factor() {
        let text = "# lg rate\n8 1.0\n9 2.0\n";
        let curve = read_loss_rate_curve(text.as_bytes(), "mem").unwrap();
        assert_eq!(curve.domain(), Some((1e8, 1e9)));
        assert!((curve.ys()[1] - 2.0 / MPC).abs() < 1e-35);

        let text = "9 1.0\n8 2.0\n";
        assert!(read_loss_rate_curve(text.as_bytes(), "mem").is_err());
    }

    #[test]
    fn pair_spectrum_requires_full_table() {
        let err = read_pair_spectrum("1 2 3".as_bytes(), "mem").unwrap_err();
        assert!(matches!(err, TableError::WrongLength { expected: 11_900, found: 3, .. }));

        let mut text = String::new();
        for _ in 0..PAIR_SPECTRUM_ROWS {
            text.push_str(&vec!["1"; PAIR_SPECTRUM_COLUMNS].join(" "));
            text.push('\n');
        }
        let table = read_pair_spectrum(text.as_bytes(), "mem").unwrap();
        assert_eq!(table.len(), PAIR_SPECTRUM_ROWS);
        let r = table.row(0).unwrap();
        assert_eq!(r.len(), PAIR_SPECTRUM_COLUMNS);
        assert!(r.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn spectrum_rows_must_be_in_order() {
        let table = read_spectrum_table("0 1 1\n1 2 0\n".as_bytes(), "mem").unwrap();
        assert_eq!(table.row(1), Some(&[2.0, 2.0][..]));
        assert!(read_spectrum_table("1 1 1\n".as_bytes(), "mem").is_err());
    }

    #[test]
    fn decay_rows() {
        let text = "# Z N channel tau\n0 1 10000 879.4\n";
        let table = read_decay_table(text.as_bytes(), "mem").unwrap();
        let modes = table.modes(Isotope::new(0, 1));
        assert_eq!(modes.len(), 1);
        assert_eq!(modes[0].channel, DecayChannel(10_000));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_rate_table(Path::new("/nonexistent/rate_CMB.txt")).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
        assert!(err.to_string().contains("could not open file"));
    }
}
