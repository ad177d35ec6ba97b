//! Presumed-location mapping driven by `#line` directives.
//!
//! Both `#line 42 "file.cpp"` and the GNU linemarker form `# 42 "file.cpp"`
//! are honoured. Columns are never remapped.

use regex::Regex;
use std::sync::OnceLock;

fn directive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*#\s*(?:line\s+)?(\d+)(?:\s+"((?:[^"\\]|\\.)*)")?"#)
            .expect("line directive regex is valid")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LineDirective {
    /// 0-based row of the directive itself
    row: usize,
    /// Presumed line of the row following the directive
    line: u32,
    file: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LineMap {
    default_file: String,
    directives: Vec<LineDirective>,
}

impl LineMap {
    /// Scan `text` for line directives.
    pub fn new(default_file: impl Into<String>, text: &str) -> Self {
        let re = directive_regex();
        let directives = text
            .lines()
            .enumerate()
            .filter_map(|(row, line)| {
                let caps = re.captures(line)?;
                let number = caps.get(1)?.as_str().parse::<u32>().ok()?;
                Some(LineDirective {
                    row,
                    line: number,
                    file: caps.get(2).map(|m| unescape(m.as_str())),
                })
            })
            .collect();

        Self {
            default_file: default_file.into(),
            directives,
        }
    }

    pub fn default_file(&self) -> &str {
        &self.default_file
    }

    /// Presumed (file, 1-based line) of a 0-based row.
    pub fn presume(&self, row: usize) -> (&str, u32) {
        let mut file = self.default_file.as_str();
        let mut active = None;

        for directive in &self.directives {
            if directive.row >= row {
                break;
            }
            if let Some(name) = &directive.file {
                file = name.as_str();
            }
            active = Some(directive);
        }

        match active {
            Some(directive) => {
                let offset = (row - directive.row - 1) as u32;
                (file, directive.line.saturating_add(offset))
            }
            None => (file, row as u32 + 1),
        }
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
