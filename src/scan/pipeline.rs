//! Streaming pipeline: matcher → resolver → classifier → filter → emitter.
//!
//! One node in, at most one record out. Nothing is buffered between nodes.

use crate::io::csv::RecordWriter;
use crate::model::SourceModel;
use crate::scan::filter::FilterConfig;
use crate::scan::matcher::NodeMatcher;
use crate::scan::record::{RecordOptions, emit};
use crate::scan::resolver::resolve;
use std::io::{self, Write};
use std::ops::AddAssign;

/// Counters for one or more pipeline runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Nodes handed over by the matcher
    pub matched: usize,
    /// Nodes without a direct callee
    pub unresolved: usize,
    /// Resolved nodes rejected by the filter
    pub filtered: usize,
    /// Rows written
    pub emitted: usize,
}

impl AddAssign for ScanStats {
    fn add_assign(&mut self, other: Self) {
        self.matched += other.matched;
        self.unresolved += other.unresolved;
        self.filtered += other.filtered;
        self.emitted += other.emitted;
    }
}

/// Pipeline configured once per process and reused for every unit.
#[derive(Debug, Clone)]
pub struct ScanPipeline {
    matcher: NodeMatcher,
    filter: FilterConfig,
    options: RecordOptions,
}

impl ScanPipeline {
    pub fn new(matcher: NodeMatcher, filter: FilterConfig, options: RecordOptions) -> Self {
        Self {
            matcher,
            filter,
            options,
        }
    }

    /// Scan one translation unit, writing rows as they are produced.
    ///
    /// Only output write failures are errors.
    pub fn run<M, W>(&self, model: &M, writer: &mut RecordWriter<W>) -> io::Result<ScanStats>
    where
        M: SourceModel,
        W: Write,
    {
        let mut stats = ScanStats::default();

        for matched in self.matcher.matches(model) {
            stats.matched += 1;

            let Some(identity) = resolve(model, &matched.node) else {
                stats.unresolved += 1;
                continue;
            };

            if !self.filter.accept(&identity) {
                stats.filtered += 1;
                continue;
            }

            let record = emit(model, &matched.site, identity, &self.options);
            writer.write_record(&record)?;
            stats.emitted += 1;
        }

        Ok(stats)
    }
}
