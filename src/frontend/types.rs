//! Type and qualified-name text handling.
//!
//! Types are carried as normalized source text; lookups strip template
//! arguments while displayed names keep them.

const BUILTIN_WORDS: &[&str] = &[
    "void", "bool", "char", "wchar_t", "char8_t", "char16_t", "char32_t", "short", "int", "long",
    "float", "double", "signed", "unsigned", "size_t", "ptrdiff_t", "nullptr_t",
];

const SPECIFIER_PREFIXES: &[&str] = &[
    "const ", "volatile ", "typename ", "struct ", "class ", "union ", "enum ", "mutable ",
    "constexpr ", "static ", "inline ",
];

/// Canonical spelling of a type or qualified name.
///
/// `std :: map< int ,std::string >` → `std::map<int, std::string>`.
pub fn normalize_type(raw: &str) -> String {
    let mut collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    loop {
        let stripped = SPECIFIER_PREFIXES
            .iter()
            .find_map(|prefix| collapsed.strip_prefix(prefix).map(str::to_string));
        match stripped {
            Some(rest) => collapsed = rest,
            None => break,
        }
    }
    for suffix in [" const", " volatile"] {
        if let Some(rest) = collapsed.strip_suffix(suffix) {
            collapsed = rest.to_string();
        }
    }

    let chars: Vec<char> = collapsed.chars().collect();
    let mut out = String::with_capacity(collapsed.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let prev = out.chars().last();
            let next = chars.get(i + 1).copied();
            let glued = matches!(prev, Some('<' | ':' | '(' | ','))
                || matches!(next, Some('<' | '>' | ':' | ',' | ')' | '('));
            if glued {
                continue;
            }
        }
        out.push(c);
        if c == ',' {
            out.push(' ');
        }
    }
    out.trim().to_string()
}

/// Split on top-level `::`. A leading `::` yields an empty first segment.
pub fn split_qualified(name: &str) -> Vec<&str> {
    let bytes = name.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'<' | b'(' | b'[' => depth += 1,
            b'>' | b')' | b']' => depth -= 1,
            b':' if depth <= 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&name[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&name[start..]);
    segments
}

/// Segment without template arguments: `vector<int>` → `vector`.
pub fn segment_base(segment: &str) -> &str {
    if segment.starts_with("operator") {
        return segment;
    }
    match segment.find('<') {
        Some(pos) => segment[..pos].trim_end(),
        None => segment,
    }
}

/// A parsed qualified name with its lookup key and display spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    /// Written with a leading `::`
    pub global: bool,
    /// Segments with template arguments stripped, joined by `::`
    pub key: String,
    /// Segments as written, joined by `::`
    pub display: String,
    /// Last segment without template arguments
    pub last: String,
    /// Number of segments
    pub depth: usize,
}

impl QualifiedName {
    pub fn parse(raw: &str) -> Self {
        let normalized = normalize_type(raw);
        let mut segments = split_qualified(&normalized);
        let global = segments.first().is_some_and(|s| s.is_empty()) && segments.len() > 1;
        if global {
            segments.remove(0);
        }

        let key = segments
            .iter()
            .map(|s| segment_base(s))
            .collect::<Vec<_>>()
            .join("::");
        let last = segments
            .last()
            .map(|s| segment_base(s).to_string())
            .unwrap_or_default();

        Self {
            global,
            key,
            display: segments.join("::"),
            last,
            depth: segments.len(),
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.depth > 1
    }

    pub fn has_template_args(&self) -> bool {
        self.display.contains('<')
    }

    /// Display spelling of everything before the last segment.
    pub fn display_scope(&self) -> &str {
        let segments = split_qualified(&self.display);
        if segments.len() <= 1 {
            return "";
        }
        let last_len = segments.last().map_or(0, |s| s.len());
        &self.display[..self.display.len() - last_len - 2]
    }

    /// Key spelling of everything before the last segment.
    pub fn key_scope(&self) -> &str {
        match self.key.rfind("::") {
            Some(pos) if self.depth > 1 => &self.key[..pos],
            _ => "",
        }
    }
}

/// Join a scope and a name with `::`, skipping an empty scope.
pub fn join_scope(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else if name.is_empty() {
        scope.to_string()
    } else {
        format!("{scope}::{name}")
    }
}

/// `a::b::c` → [`a::b::c`, `a::b`, `a`, ``].
pub fn scope_prefixes(scope: &str) -> Vec<String> {
    let segments = split_qualified(scope);
    let mut prefixes = Vec::with_capacity(segments.len() + 1);
    if !scope.is_empty() {
        for len in (1..=segments.len()).rev() {
            prefixes.push(segments[..len].join("::"));
        }
    }
    prefixes.push(String::new());
    prefixes
}

/// Whether a normalized type is a builtin arithmetic or void type.
pub fn is_builtin(type_text: &str) -> bool {
    let trimmed = type_text.trim_start_matches("std::");
    !trimmed.is_empty()
        && trimmed
            .split_whitespace()
            .all(|word| BUILTIN_WORDS.contains(&word))
}

/// Heuristic for names not declared in loaded sources: `std::size_t`,
/// `std::uint32_t` and friends are scalar typedefs, not classes.
pub fn looks_like_scalar_typedef(name: &QualifiedName) -> bool {
    !name.has_template_args() && name.last.ends_with("_t")
}
