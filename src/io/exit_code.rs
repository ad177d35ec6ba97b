//! Exit codes for the scanner following Unix conventions.
//!
//! # Exit Code Semantics
//!
//! - `0`: Success - every translation unit loaded (zero rows is still success)
//! - `1`: General error - unspecified failure
//! - `4`: One or more translation units failed in the front end
//! - `5`: Output could not be written
//! - `6`: Configuration could not be loaded
//! - `126-255`: Reserved by shell

use crate::error::ScanError;
use crate::frontend::FrontendError;

/// Standard exit codes for a scan run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Scan completed (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// Failed to load or parse translation units (code 4)
    ParseError = 4,

    /// Output I/O error (code 5)
    IoError = 5,

    /// Configuration error (code 6)
    ConfigError = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Convert a `ScanError` to the appropriate exit code.
    pub fn from_error(error: &ScanError) -> Self {
        match error {
            ScanError::Config { .. } | ScanError::ConfigLoad { .. } => ExitCode::ConfigError,
            // A database given with -p that cannot be read is a setup problem
            ScanError::Frontend(FrontendError::CompilationDatabase { .. }) => {
                ExitCode::ConfigError
            }
            ScanError::Frontend(_) => ExitCode::ParseError,
            ScanError::OutputWrite { .. } => ExitCode::IoError,
        }
    }

    /// Exit code for a completed run.
    pub fn from_failed_units(failed_units: usize) -> Self {
        if failed_units == 0 {
            ExitCode::Success
        } else {
            ExitCode::ParseError
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }
}
