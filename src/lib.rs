//! Call-site scanner for C++ translation units.
//!
//! [`scan`] holds the classification and extraction engine, written against
//! the [`model::SourceModel`] capability. [`frontend`] is the tree-sitter
//! based implementation of that capability, and [`driver`] wires both to the
//! CSV output.

pub mod config;
pub mod driver;
pub mod error;
pub mod frontend;
pub mod io;
pub mod logging;
pub mod model;
pub mod scan;

// Explicit exports for better API clarity
pub use config::Settings;
pub use driver::{ScanRequest, ScanSummary, run_scan};
pub use error::{ScanError, ScanResult};
pub use frontend::{CppFrontend, FrontendConfig, FrontendError, FrontendResult, TranslationUnit};
pub use io::ExitCode;
pub use model::{InvocationKind, SourceModel};
pub use scan::{FilterConfig, OutputRecord, ScanPipeline};
