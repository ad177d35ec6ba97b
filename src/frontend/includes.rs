//! Header search and system-header classification.

use crate::frontend::compile_db::{CompileCommand, normalize};
use std::path::{Path, PathBuf};

/// A header found on the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInclude {
    pub path: PathBuf,
    pub is_system: bool,
}

/// Search directories derived from compile flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludePaths {
    quote_dirs: Vec<PathBuf>,
    user_dirs: Vec<PathBuf>,
    system_dirs: Vec<PathBuf>,
}

impl IncludePaths {
    /// Interpret `-I`, `-iquote`, `-isystem` and `-idirafter` from the
    /// command and the extra arguments, then append default system dirs.
    pub fn from_command(
        command: &CompileCommand,
        extra_args: &[String],
        default_system_dirs: &[PathBuf],
    ) -> Self {
        let mut paths = Self::default();
        let base = command.directory.as_path();
        let mut args = command.arguments.iter().chain(extra_args.iter());

        while let Some(arg) = args.next() {
            let (bucket, value) = if let Some(rest) = arg.strip_prefix("-isystem") {
                (Bucket::System, rest)
            } else if let Some(rest) = arg.strip_prefix("-idirafter") {
                (Bucket::System, rest)
            } else if let Some(rest) = arg.strip_prefix("-iquote") {
                (Bucket::Quote, rest)
            } else if let Some(rest) = arg.strip_prefix("-I") {
                (Bucket::User, rest)
            } else {
                continue;
            };

            let value = if value.is_empty() {
                match args.next() {
                    Some(next) => next.as_str(),
                    None => break,
                }
            } else {
                value
            };

            let dir = absolutize(base, Path::new(value));
            match bucket {
                Bucket::Quote => paths.quote_dirs.push(dir),
                Bucket::User => paths.user_dirs.push(dir),
                Bucket::System => paths.system_dirs.push(dir),
            }
        }

        paths
            .system_dirs
            .extend(default_system_dirs.iter().map(|d| normalize(d)));
        paths
    }

    pub fn user_dirs(&self) -> &[PathBuf] {
        &self.user_dirs
    }

    pub fn system_dirs(&self) -> &[PathBuf] {
        &self.system_dirs
    }

    /// Whether `path` lives under one of the system directories.
    pub fn is_system_path(&self, path: &Path) -> bool {
        let path = normalize(path);
        self.system_dirs.iter().any(|dir| path.starts_with(dir))
    }

    /// Resolve an include as spelled in the directive.
    ///
    /// Quoted includes first try the including file's directory and
    /// inherit its system-ness.
    pub fn resolve(
        &self,
        spelled: &str,
        angled: bool,
        including_dir: &Path,
        including_is_system: bool,
    ) -> Option<ResolvedInclude> {
        if Path::new(spelled).is_absolute() {
            let path = PathBuf::from(spelled);
            return path.is_file().then(|| ResolvedInclude {
                is_system: self.is_system_path(&path),
                path,
            });
        }

        if !angled {
            let candidate = including_dir.join(spelled);
            if candidate.is_file() {
                return Some(ResolvedInclude {
                    is_system: including_is_system || self.is_system_path(&candidate),
                    path: candidate,
                });
            }
        }

        let quote = if angled { &[][..] } else { &self.quote_dirs[..] };
        let user = quote.iter().chain(self.user_dirs.iter());
        for dir in user {
            let candidate = dir.join(spelled);
            if candidate.is_file() {
                return Some(ResolvedInclude {
                    is_system: self.is_system_path(&candidate),
                    path: candidate,
                });
            }
        }

        self.system_dirs.iter().find_map(|dir| {
            let candidate = dir.join(spelled);
            candidate.is_file().then_some(ResolvedInclude {
                path: candidate,
                is_system: true,
            })
        })
    }
}

enum Bucket {
    Quote,
    User,
    System,
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}
