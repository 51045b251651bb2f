//! Setup errors for process construction.

use std::error::Error;
use std::fmt;

use uhecr_core::ConfigError;
use uhecr_tables::TableError;

/// Failure to construct a process: bad configuration or unreadable data.
#[derive(Clone, Debug, PartialEq)]
pub enum SetupError {
    /// A configuration value was rejected.
    Config(ConfigError),
    /// A data table could not be loaded.
    Table(TableError),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::Table(e) => write!(f, "table load failed: {e}"),
        }
    }
}

impl Error for SetupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Table(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SetupError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<TableError> for SetupError {
    fn from(e: TableError) -> Self {
        Self::Table(e)
    }
}

/// Validate a step-limit fraction.
pub(crate) fn check_limit(limit: f64) -> Result<f64, ConfigError> {
    if limit.is_finite() && limit > 0.0 {
        Ok(limit)
    } else {
        Err(ConfigError::InvalidLimit { value: limit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_chains_to_inner_error() {
        let err = SetupError::from(ConfigError::InvalidLimit { value: -1.0 });
        assert!(err.source().is_some());
        assert!(err.to_string().contains("step limit"));
    }

    #[test]
    fn limit_validation() {
        assert_eq!(check_limit(0.1), Ok(0.1));
        assert!(check_limit(0.0).is_err());
        assert!(check_limit(f64::NAN).is_err());
        assert!(check_limit(f64::INFINITY).is_err());
    }
}
