//! Error types for table loading.
//!
//! All variants are setup-time failures: a table that cannot be read or
//! parsed aborts configuration before any candidate is processed.

use std::error::Error;
use std::fmt;

/// Errors from reading or parsing a data table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableError {
    /// The file could not be opened or read.
    Io {
        /// Path of the file.
        path: String,
        /// Underlying I/O error message.
        reason: String,
    },
    /// A data line could not be parsed.
    Parse {
        /// Name of the table source (file path or label).
        source: String,
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        reason: String,
    },
    /// A data line has the wrong number of values.
    WrongLength {
        /// Name of the table source.
        source: String,
        /// 1-based line number.
        line: usize,
        /// Expected number of values.
        expected: usize,
        /// Number of values found.
        found: usize,
    },
    /// A data line refers to an isotope outside the table coverage.
    IsotopeOutOfRange {
        /// Name of the table source.
        source: String,
        /// 1-based line number.
        line: usize,
        /// Proton count on the line.
        z: u32,
        /// Neutron count on the line.
        n: u32,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, reason } => write!(f, "could not open file {path}: {reason}"),
            Self::Parse {
                source,
                line,
                reason,
            } => write!(f, "{source}:{line}: {reason}"),
            Self::WrongLength {
                source,
                line,
                expected,
                found,
            } => write!(
                f,
                "{source}:{line}: expected {expected} values, found {found}"
            ),
            Self::IsotopeOutOfRange { source, line, z, n } => write!(
                f,
                "{source}:{line}: isotope (Z={z}, N={n}) outside table coverage"
            ),
        }
    }
}

impl Error for TableError {}
