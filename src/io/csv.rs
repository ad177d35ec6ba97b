//! CSV record stream.
//!
//! Every free-text column is wrapped in double quotes with embedded quotes
//! doubled. Numeric columns and the exception column are written bare.
//! No other escaping is applied here.

use crate::scan::record::OutputRecord;
use std::io::{self, Write};

/// Fixed header row, without the trailing newline.
pub const CSV_HEADER: &str = "file,line,col,kind,qualified-name,noexcept,signature,callee-source";

/// Quote a free-text field: `a"b` → `"a""b"`.
pub fn csv_quote(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 2);
    out.push('"');
    for c in field.chars() {
        if c == '"' {
            out.push_str("\"\"");
        } else {
            out.push(c);
        }
    }
    out.push('"');
    out
}

/// Render one record as a CSV line, without the trailing newline.
pub fn format_row(record: &OutputRecord) -> String {
    format!(
        "{},{},{},{},{},{},{},{}",
        csv_quote(&record.file),
        record.line,
        record.column,
        csv_quote(record.kind.label()),
        csv_quote(&record.qualified_name),
        record.exception_guarantee.label(),
        csv_quote(&record.signature),
        csv_quote(&record.snippet),
    )
}

/// Streams records to an output, one line each, in arrival order.
pub struct RecordWriter<W: Write> {
    out: W,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.out, "{CSV_HEADER}")
    }

    pub fn write_record(&mut self, record: &OutputRecord) -> io::Result<()> {
        writeln!(self.out, "{}", format_row(record))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
