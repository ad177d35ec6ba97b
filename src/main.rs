//! CLI entry point for the call-site scanner.
//!
//! Parses arguments, layers them over the loaded settings and hands the
//! run to [`callscan::driver`]. CSV goes to stdout, everything else to stderr.

use anyhow::Context;
use callscan::driver::{ScanRequest, run_scan};
use callscan::error::ScanError;
use callscan::frontend::CompilationSpec;
use callscan::io::ExitCode;
use callscan::{Settings, logging};
use clap::{
    Parser,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Accepts `true`/`false` as well as `1`/`0`, so `--only-std=1` works.
fn parse_flag(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean (1/0/true/false), got '{other}'")),
    }
}

/// Report every call-like expression of C++ translation units as CSV
#[derive(Parser, Debug)]
#[command(
    name = "callscan",
    version = env!("CARGO_PKG_VERSION"),
    about = "Report call sites of C++ translation units as CSV",
    long_about = "Scan C++ translation units and emit one CSV row per call, member call, \
                  constructor invocation and overloaded-operator call, with the callee's \
                  qualified name, declared signature and noexcept guarantee.",
    next_line_help = true,
    styles = clap_cargo_style(),
    after_help = "Examples:\n  callscan src/main.cpp\n  callscan --only-std=1 -p build src/*.cpp\n  callscan --csv-header src/a.cpp -- -Iinclude -isystem third_party"
)]
struct Cli {
    /// Source files, scanned in the order given
    #[arg(required = true, value_name = "SOURCES")]
    sources: Vec<PathBuf>,

    /// Only report callees in the std:: namespace
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = parse_flag)]
    only_std: Option<bool>,

    /// Only report callees whose qualified name starts with this text
    #[arg(long, value_name = "PREFIX")]
    name_prefix: Option<String>,

    /// Print the column header row first
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = parse_flag)]
    csv_header: Option<bool>,

    /// Build directory containing compile_commands.json
    #[arg(short = 'p', long, value_name = "DIR")]
    build_path: Option<PathBuf>,

    /// Path to custom settings.toml file
    #[arg(short, long, env = "CALLSCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Also report call sites located in system headers
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = parse_flag)]
    include_system_headers: Option<bool>,

    /// Escape control characters in snippets
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = parse_flag)]
    escape_control_chars: Option<bool>,

    /// Extra compiler arguments, appended to every compile command
    #[arg(last = true, value_name = "COMPILER_ARGS")]
    compiler_args: Vec<String>,
}

impl Cli {
    /// CLI flags take precedence over every configuration layer.
    fn apply_to(&self, settings: &mut Settings) {
        if let Some(only_std) = self.only_std {
            settings.filter.only_std = only_std;
        }
        if let Some(prefix) = &self.name_prefix {
            settings.filter.name_prefix = prefix.clone();
        }
        if let Some(csv_header) = self.csv_header {
            settings.output.csv_header = csv_header;
        }
        if let Some(include) = self.include_system_headers {
            settings.frontend.include_system_headers = include;
        }
        if let Some(escape) = self.escape_control_chars {
            settings.output.escape_control_chars = escape;
        }
    }

    fn request(&self) -> ScanRequest {
        ScanRequest {
            sources: self.sources.clone(),
            compilation: CompilationSpec {
                build_path: self.build_path.clone(),
                extra_args: self.compiler_args.clone(),
            },
        }
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, ScanError> {
    match &cli.config {
        Some(path) if !path.is_file() => Err(ScanError::Config {
            reason: format!("settings file '{}' does not exist", path.display()),
        }),
        Some(path) => Settings::load_from(path).map_err(|source| ScanError::ConfigLoad {
            path: path.clone(),
            source,
        }),
        None => Settings::load().map_err(|e| ScanError::from(*e)),
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let mut settings = load_settings(cli)?;
    cli.apply_to(&mut settings);
    logging::init_tracing(&settings.log_level);

    let stdout = std::io::stdout();
    let out = BufWriter::new(stdout.lock());
    let summary = run_scan(&settings, &cli.request(), out).context("scan aborted")?;

    let mut stderr = std::io::stderr().lock();
    for diagnostic in &summary.diagnostics {
        // Nothing sensible to do if stderr is gone
        let _ = writeln!(stderr, "{diagnostic}");
    }
    if summary.failed_units > 0 {
        let _ = writeln!(
            stderr,
            "Error while processing {} of {} file(s).",
            summary.failed_units, summary.units
        );
    }

    Ok(summary.exit_code())
}

fn main() {
    let cli = Cli::parse();

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            let scan_error = e.downcast_ref::<ScanError>();
            match scan_error {
                Some(error) => eprintln!("Error [{}]: {e:#}", error.status_code()),
                None => eprintln!("Error: {e:#}"),
            }
            for suggestion in scan_error.map(ScanError::recovery_suggestions).unwrap_or_default() {
                eprintln!("  - {suggestion}");
            }
            scan_error.map_or(ExitCode::GeneralError, ExitCode::from_error)
        }
    };

    std::process::exit(code.into());
}
