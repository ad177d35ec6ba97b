#![allow(dead_code)]

use callscan::{ScanRequest, ScanSummary, Settings, run_scan};
use callscan::frontend::CompilationSpec;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run the library scan over `sources` and return the summary and stdout text.
    pub fn scan(&self, settings: &Settings, sources: &[PathBuf], extra_args: &[&str]) -> (ScanSummary, String) {
        let request = ScanRequest {
            sources: sources.to_vec(),
            compilation: CompilationSpec {
                build_path: None,
                extra_args: extra_args.iter().map(|s| s.to_string()).collect(),
            },
        };
        let mut out = Vec::new();
        let summary = run_scan(settings, &request, &mut out).expect("scan runs");
        (summary, String::from_utf8(out).expect("CSV is UTF-8"))
    }

    /// Run the `callscan` binary inside the project directory.
    pub fn run_cli(&self, args: &[&str]) -> CliOutput {
        let output = Command::new(env!("CARGO_BIN_EXE_callscan"))
            .args(args)
            .current_dir(self.path())
            .env_remove("CALLSCAN_LOG")
            .env_remove("CALLSCAN_CONFIG")
            .output()
            .expect("run callscan");

        CliOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

pub struct CliOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Decode one CSV line using the quote-doubling rule only.
///
/// Quoted fields may contain commas, doubled quotes and raw newlines, so
/// the input is the full text rather than a single `lines()` item.
pub fn decode_csv(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (in_quotes, c) {
            (true, '"') if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            (true, '"') => in_quotes = false,
            (true, c) => field.push(c),
            (false, '"') => in_quotes = true,
            (false, ',') => row.push(std::mem::take(&mut field)),
            (false, '\n') => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            (false, c) => field.push(c),
        }
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

/// Decoded rows of a scan, each with exactly eight fields.
pub fn rows(csv: &str) -> Vec<Vec<String>> {
    let rows = decode_csv(csv);
    for row in &rows {
        assert_eq!(row.len(), 8, "row has eight fields: {row:?}");
    }
    rows
}
