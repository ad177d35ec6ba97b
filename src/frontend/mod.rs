//! Tree-sitter based C++ front end.
//!
//! Loads one translation unit at a time: the main source and every header
//! it reaches through `#include`. System headers are loaded and indexed like
//! any other header but flagged, so callees declared there keep their
//! signature while their own call sites can be left out of the report.
//! The loaded unit implements [`crate::model::SourceModel`].

pub mod compile_db;
pub mod decls;
pub mod includes;
pub mod line_map;
pub mod sema;
pub mod syntax;
pub mod types;
pub mod unit;

pub use compile_db::{CompilationDatabase, CompilationSpec, CompileCommand};
pub use includes::{IncludePaths, ResolvedInclude};
pub use unit::{Diagnostic, SourceFile, TranslationUnit};

use crate::frontend::compile_db::normalize;
use crate::frontend::line_map::LineMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use tree_sitter::{Node, Parser};

#[derive(Error, Debug)]
pub enum FrontendError {
    #[error("Failed to read source file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to initialize C++ parser: {reason}")]
    ParserInit { reason: String },

    #[error("Parser produced no syntax tree for '{path}'")]
    ParseFailure { path: PathBuf },

    #[error("{count} error(s) while parsing '{path}'")]
    SyntaxErrors { path: PathBuf, count: usize },

    #[error("Failed to load compilation database '{path}': {reason}")]
    CompilationDatabase { path: PathBuf, reason: String },

    #[error("Skipping '{path}': compile command not found in the compilation database")]
    MissingCompileCommand { path: PathBuf },
}

impl FrontendError {
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::FileRead { .. } => vec![
                "Check that the file exists and you have read permissions",
                "Paths are resolved relative to the current directory",
            ],
            Self::CompilationDatabase { .. } => vec![
                "Pass the directory that contains compile_commands.json with -p",
                "Regenerate the database with your build system (e.g. CMAKE_EXPORT_COMPILE_COMMANDS=ON)",
            ],
            Self::MissingCompileCommand { .. } => vec![
                "Make sure the file is part of the build described by the database",
                "Pass compiler arguments after '--' to scan files outside the build",
            ],
            Self::SyntaxErrors { .. } => vec![
                "Fix the reported syntax errors or set frontend.strict_syntax = false",
            ],
            _ => vec![],
        }
    }
}

pub type FrontendResult<T> = Result<T, FrontendError>;

/// `[frontend]` settings section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Directories whose headers count as system headers
    #[serde(default = "default_system_include_dirs")]
    pub system_include_dirs: Vec<PathBuf>,

    /// Report invocations located inside system headers
    #[serde(default)]
    pub include_system_headers: bool,

    /// Treat syntax errors as a failed translation unit
    #[serde(default = "default_true")]
    pub strict_syntax: bool,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            system_include_dirs: default_system_include_dirs(),
            include_system_headers: false,
            strict_syntax: true,
        }
    }
}

fn default_system_include_dirs() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/usr/include"),
        PathBuf::from("/usr/local/include"),
    ]
}

fn default_true() -> bool {
    true
}

/// Loads translation units under one compilation specification.
#[derive(Debug)]
pub struct CppFrontend {
    config: FrontendConfig,
    database: Option<CompilationDatabase>,
    extra_args: Vec<String>,
}

impl CppFrontend {
    pub fn new(config: FrontendConfig, spec: &CompilationSpec) -> FrontendResult<Self> {
        let database = spec
            .build_path
            .as_deref()
            .map(CompilationDatabase::load)
            .transpose()?;
        if let Some(database) = &database {
            debug!("[frontend] loaded {} compile commands", database.len());
        }

        Ok(Self {
            config,
            database,
            extra_args: spec.extra_args.clone(),
        })
    }

    /// Parse `source` and everything it includes.
    pub fn load(&self, source: &Path) -> FrontendResult<TranslationUnit> {
        let path = std::path::absolute(source)
            .map(|p| normalize(&p))
            .map_err(|e| FrontendError::FileRead {
                path: source.to_path_buf(),
                source: e,
            })?;
        let text = read_source(&path)?;
        let command = self.command_for(&path)?;
        let include_paths = IncludePaths::from_command(
            &command,
            &self.extra_args,
            &self.config.system_include_dirs,
        );

        let mut loader = UnitLoader::new(include_paths)?;
        loader.add(path, source.display().to_string(), text, false)?;
        loader.load_includes();

        let unit = loader.finish();
        debug!(
            "[frontend] {}: {} file(s), {} function(s), {} class(es)",
            source.display(),
            unit.files().len(),
            unit.index().function_count(),
            unit.index().class_count()
        );
        Ok(unit)
    }

    fn command_for(&self, source: &Path) -> FrontendResult<CompileCommand> {
        let fallback = || CompileCommand {
            directory: source.parent().map(Path::to_path_buf).unwrap_or_default(),
            arguments: Vec::new(),
        };

        if let Some(database) = &self.database {
            return match database.command_for(source) {
                Some(command) => Ok(command.clone()),
                None if self.extra_args.is_empty() => Err(FrontendError::MissingCompileCommand {
                    path: source.to_path_buf(),
                }),
                None => {
                    debug!(
                        "[frontend] no compile command for {}, using extra arguments",
                        source.display()
                    );
                    Ok(fallback())
                }
            };
        }

        let Some(discovered) = source.parent().and_then(CompilationDatabase::discover) else {
            return Ok(fallback());
        };
        match CompilationDatabase::load(&discovered) {
            Ok(database) => {
                debug!("[frontend] using {}", discovered.display());
                Ok(database.command_for(source).cloned().unwrap_or_else(fallback))
            }
            Err(e) => {
                warn!("[frontend] ignoring discovered database: {e}");
                Ok(fallback())
            }
        }
    }
}

fn read_source(path: &Path) -> FrontendResult<String> {
    let bytes = std::fs::read(path).map_err(|e| FrontendError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

struct IncludeDirective {
    start_byte: usize,
    row: usize,
    column: usize,
    spelled: String,
    angled: bool,
}

struct UnitLoader {
    include_paths: IncludePaths,
    parser: Parser,
    files: Vec<SourceFile>,
    by_path: HashMap<PathBuf, usize>,
    diagnostics: Vec<Diagnostic>,
}

impl UnitLoader {
    fn new(include_paths: IncludePaths) -> FrontendResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_cpp::LANGUAGE.into())
            .map_err(|e| FrontendError::ParserInit {
                reason: e.to_string(),
            })?;

        Ok(Self {
            include_paths,
            parser,
            files: Vec::new(),
            by_path: HashMap::new(),
            diagnostics: Vec::new(),
        })
    }

    fn add(
        &mut self,
        path: PathBuf,
        display_name: String,
        text: String,
        is_system: bool,
    ) -> FrontendResult<usize> {
        let tree = self
            .parser
            .parse(&text, None)
            .ok_or_else(|| FrontendError::ParseFailure { path: path.clone() })?;
        let line_map = LineMap::new(display_name.clone(), &text);

        if !is_system && let Some(error) = syntax::first_error(tree.root_node()) {
            let point = error.start_position();
            let (file, line) = line_map.presume(point.row);
            let message = if error.is_missing() {
                format!("expected '{}'", error.kind())
            } else {
                "syntax error".to_string()
            };
            self.diagnostics.push(Diagnostic {
                file: file.to_string(),
                line,
                column: point.column as u32 + 1,
                message,
            });
        }

        let index = self.files.len();
        self.by_path.insert(normalize(&path), index);
        self.files.push(SourceFile {
            path,
            display_name,
            text,
            tree,
            is_system,
            line_map,
            includes: HashMap::new(),
        });
        Ok(index)
    }

    /// Resolve includes breadth first; files appended while resolving are
    /// processed in turn.
    fn load_includes(&mut self) {
        let mut next = 0;
        while next < self.files.len() {
            self.resolve_includes(next);
            next += 1;
        }
    }

    fn resolve_includes(&mut self, file: usize) {
        let directives = collect_includes(&self.files[file]);
        let including_dir = self.files[file]
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let including_is_system = self.files[file].is_system;

        for directive in directives {
            let resolved = self.include_paths.resolve(
                &directive.spelled,
                directive.angled,
                &including_dir,
                including_is_system,
            );

            let Some(found) = resolved else {
                if directive.angled || including_is_system {
                    debug!("[frontend] unresolved include <{}>", directive.spelled);
                } else {
                    let (name, line) = self.files[file].line_map.presume(directive.row);
                    self.diagnostics.push(Diagnostic {
                        file: name.to_string(),
                        line,
                        column: directive.column as u32 + 1,
                        message: format!("'{}' file not found", directive.spelled),
                    });
                }
                continue;
            };

            let target = match self.by_path.get(&normalize(&found.path)) {
                Some(&index) => index,
                None => match self.load_header(&found) {
                    Some(index) => index,
                    None => continue,
                },
            };
            self.files[file]
                .includes
                .insert(directive.start_byte, target);
        }
    }

    fn load_header(&mut self, found: &ResolvedInclude) -> Option<usize> {
        let text = match read_source(&found.path) {
            Ok(text) => text,
            Err(e) => {
                warn!("[frontend] {e}");
                return None;
            }
        };
        debug!("[frontend] including {}", found.path.display());
        let display = found.path.display().to_string();
        match self.add(found.path.clone(), display, text, found.is_system) {
            Ok(index) => Some(index),
            Err(e) => {
                warn!("[frontend] {e}");
                None
            }
        }
    }

    fn finish(self) -> TranslationUnit {
        TranslationUnit::new(self.files, self.diagnostics)
    }
}

fn collect_includes(file: &SourceFile) -> Vec<IncludeDirective> {
    let mut found = Vec::new();
    let mut stack = vec![file.tree.root_node()];

    while let Some(node) = stack.pop() {
        if node.kind() == "preproc_include" {
            if let Some(directive) = include_directive(node, &file.text) {
                found.push(directive);
            }
            continue;
        }
        // Includes never appear inside function bodies in practice.
        if node.kind() == "compound_statement" {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    found
}

fn include_directive(node: Node, source: &str) -> Option<IncludeDirective> {
    let path = node.child_by_field_name("path")?;
    let raw = syntax::text(path, source);
    let (spelled, angled) = match path.kind() {
        "system_lib_string" => (raw.trim_start_matches('<').trim_end_matches('>'), true),
        "string_literal" => (raw.trim_matches('"'), false),
        _ => return None,
    };
    let point = node.start_position();
    Some(IncludeDirective {
        start_byte: node.start_byte(),
        row: point.row,
        column: point.column,
        spelled: spelled.to_string(),
        angled,
    })
}
