//! Compilation specification: `compile_commands.json` plus extra arguments.
//!
//! Only the flags that influence header lookup are interpreted.

use crate::frontend::{FrontendError, FrontendResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const COMPILE_COMMANDS_FILE: &str = "compile_commands.json";

/// Where compile flags come from for this run.
#[derive(Debug, Clone, Default)]
pub struct CompilationSpec {
    /// Directory holding `compile_commands.json`, or the file itself
    pub build_path: Option<PathBuf>,
    /// Arguments given after `--`, appended to every command
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawEntry {
    directory: PathBuf,
    file: PathBuf,
    #[serde(default)]
    arguments: Option<Vec<String>>,
    #[serde(default)]
    command: Option<String>,
}

/// Flags and working directory for one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileCommand {
    pub directory: PathBuf,
    pub arguments: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CompilationDatabase {
    entries: Vec<(PathBuf, CompileCommand)>,
}

impl CompilationDatabase {
    /// Load from a build directory or a direct path to the JSON file.
    pub fn load(build_path: &Path) -> FrontendResult<Self> {
        let path = if build_path.is_dir() {
            build_path.join(COMPILE_COMMANDS_FILE)
        } else {
            build_path.to_path_buf()
        };

        let content =
            std::fs::read_to_string(&path).map_err(|e| FrontendError::CompilationDatabase {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        Self::from_json(&content).map_err(|reason| FrontendError::CompilationDatabase {
            path,
            reason,
        })
    }

    /// Look for `compile_commands.json` in `start` and its ancestors.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(COMPILE_COMMANDS_FILE))
            .find(|candidate| candidate.is_file())
    }

    pub fn from_json(content: &str) -> Result<Self, String> {
        let raw: Vec<RawEntry> = serde_json::from_str(content).map_err(|e| e.to_string())?;

        let entries = raw
            .into_iter()
            .map(|entry| {
                let file = if entry.file.is_absolute() {
                    entry.file.clone()
                } else {
                    entry.directory.join(&entry.file)
                };
                let arguments = match (entry.arguments, entry.command) {
                    (Some(args), _) => args,
                    (None, Some(command)) => split_command_line(&command),
                    (None, None) => Vec::new(),
                };
                (
                    normalize(&file),
                    CompileCommand {
                        directory: entry.directory,
                        arguments,
                    },
                )
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First command whose file matches `source`.
    pub fn command_for(&self, source: &Path) -> Option<&CompileCommand> {
        let wanted = normalize(source);
        self.entries
            .iter()
            .find(|(file, _)| *file == wanted)
            .map(|(_, command)| command)
    }
}

/// Lexical normalization: drop `.` components and fold `..`.
pub fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Split a shell command line the way compilation databases quote it.
pub fn split_command_line(command: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = command.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                    in_word = true;
                }
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        args.push(current);
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command_line() {
        assert_eq!(
            split_command_line(r#"c++ -I"my dir" -DNAME='a b' -c x.cpp"#),
            vec!["c++", "-Imy dir", "-DNAME=a b", "-c", "x.cpp"]
        );
        assert_eq!(split_command_line(r"a\ b c"), vec!["a b", "c"]);
        assert!(split_command_line("   ").is_empty());
    }

    #[test]
    fn test_from_json_with_command_and_arguments() {
        let json = r#"[
            {"directory": "/build", "file": "../src/a.cpp", "command": "c++ -Iinc -c ../src/a.cpp"},
            {"directory": "/build", "file": "/src/b.cpp", "arguments": ["c++", "-isystem", "/opt/sdk"]}
        ]"#;
        let db = CompilationDatabase::from_json(json).expect("valid json");
        assert_eq!(db.len(), 2);

        let a = db.command_for(Path::new("/src/a.cpp")).expect("a.cpp entry");
        assert_eq!(a.directory, PathBuf::from("/build"));
        assert_eq!(a.arguments[1], "-Iinc");

        let b = db.command_for(Path::new("/src/./b.cpp")).expect("b.cpp entry");
        assert_eq!(b.arguments, vec!["c++", "-isystem", "/opt/sdk"]);

        assert!(db.command_for(Path::new("/src/c.cpp")).is_none());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(CompilationDatabase::from_json("{not json").is_err());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
    }
}
