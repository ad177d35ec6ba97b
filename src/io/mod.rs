//! Output handling for the CLI.
//!
//! - CSV row formatting and the streaming record writer
//! - Exit codes

pub mod csv;
pub mod exit_code;

pub use csv::{CSV_HEADER, RecordWriter, csv_quote, format_row};
pub use exit_code::ExitCode;
