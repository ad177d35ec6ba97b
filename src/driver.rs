//! Scan driver: loads each translation unit and streams it through the
//! pipeline.
//!
//! Units are processed in the order given. A unit that fails in the front
//! end is reported and counted, and the scan moves on; rows already written
//! stay in the output.

use crate::config::Settings;
use crate::error::{ScanError, ScanResult};
use crate::frontend::{CompilationSpec, CppFrontend, FrontendError};
use crate::io::{ExitCode, RecordWriter};
use crate::scan::{NodeMatcher, ScanPipeline, ScanStats, SystemHeaderPolicy};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// What to scan.
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    pub sources: Vec<PathBuf>,
    pub compilation: CompilationSpec,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Units handed to the front end
    pub units: usize,
    /// Units that failed to load or had syntax errors
    pub failed_units: usize,
    pub stats: ScanStats,
    /// Front-end messages, one per line, in `file:line:col: error: msg` form
    pub diagnostics: Vec<String>,
}

impl ScanSummary {
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from_failed_units(self.failed_units)
    }
}

/// Build the pipeline once and run it over every requested source.
///
/// Only setup failures and output write failures are returned as errors;
/// per-unit front-end failures end up in the summary.
pub fn run_scan<W: Write>(
    settings: &Settings,
    request: &ScanRequest,
    out: W,
) -> ScanResult<ScanSummary> {
    let frontend = CppFrontend::new(settings.frontend.clone(), &request.compilation)?;
    let policy = if settings.frontend.include_system_headers {
        SystemHeaderPolicy::Include
    } else {
        SystemHeaderPolicy::Exclude
    };
    let pipeline = ScanPipeline::new(
        NodeMatcher::new(policy),
        settings.filter.clone(),
        settings.output.record_options(),
    );

    let mut writer = RecordWriter::new(out);
    if settings.output.csv_header {
        writer
            .write_header()
            .map_err(|source| ScanError::OutputWrite { source })?;
    }

    let mut summary = ScanSummary::default();
    for source in &request.sources {
        summary.units += 1;

        let unit = match frontend.load(source) {
            Ok(unit) => unit,
            Err(e) => {
                warn!("[driver] {}: {e}", source.display());
                summary.failed_units += 1;
                summary.diagnostics.push(format!("error: {e}"));
                continue;
            }
        };

        if unit.has_errors() {
            summary
                .diagnostics
                .extend(unit.diagnostics().iter().map(ToString::to_string));
            if settings.frontend.strict_syntax {
                let error = FrontendError::SyntaxErrors {
                    path: source.clone(),
                    count: unit.diagnostics().len(),
                };
                warn!("[driver] {error}");
                summary.failed_units += 1;
            }
        }

        let stats = pipeline
            .run(&unit, &mut writer)
            .map_err(|source| ScanError::OutputWrite { source })?;
        debug!(
            "[driver] {}: {} matched, {} unresolved, {} filtered, {} emitted",
            source.display(),
            stats.matched,
            stats.unresolved,
            stats.filtered,
            stats.emitted
        );
        summary.stats += stats;
    }

    writer
        .flush()
        .map_err(|source| ScanError::OutputWrite { source })?;

    info!(
        "[driver] scanned {} unit(s), {} failed, {} row(s)",
        summary.units, summary.failed_units, summary.stats.emitted
    );
    Ok(summary)
}
