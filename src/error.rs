//! Error types for the call-site scanner
//!
//! Structured errors using thiserror, each with a stable status code and
//! actionable recovery suggestions.

use crate::frontend::FrontendError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for a scan run
#[derive(Error, Debug)]
pub enum ScanError {
    /// Configuration errors
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("Failed to load configuration from '{path}': {source}")]
    ConfigLoad {
        path: PathBuf,
        source: Box<figment::Error>,
    },

    /// Front-end errors that stop the whole run
    #[error(transparent)]
    Frontend(#[from] FrontendError),

    /// Output stream errors
    #[error("Failed to write output: {source}")]
    OutputWrite { source: std::io::Error },
}

impl ScanError {
    /// Stable identifier printed next to the error message
    pub fn status_code(&self) -> String {
        match self {
            Self::Config { .. } | Self::ConfigLoad { .. } => "CONFIG_ERROR",
            Self::Frontend(FrontendError::CompilationDatabase { .. }) => "COMPILATION_DATABASE_ERROR",
            Self::Frontend(_) => "FRONTEND_ERROR",
            Self::OutputWrite { .. } => "OUTPUT_WRITE_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Config { .. } | Self::ConfigLoad { .. } => vec![
                "Check the syntax of .callscan/settings.toml",
                "Environment overrides use CALLSCAN_<SECTION>__<KEY>",
            ],
            Self::Frontend(e) => e.recovery_suggestions(),
            Self::OutputWrite { .. } => vec![
                "Check that the output pipe or file is still open",
                "Ensure there is enough disk space when redirecting to a file",
            ],
        }
    }
}

impl From<figment::Error> for ScanError {
    fn from(error: figment::Error) -> Self {
        Self::Config {
            reason: error.to_string(),
        }
    }
}

/// Result type alias for scan operations
pub type ScanResult<T> = Result<T, ScanError>;
