//! Output records and snippet shaping.

use crate::model::{InvocationKind, SourceModel};
use crate::scan::classify::ExceptionGuarantee;
use crate::scan::matcher::InvocationSite;
use crate::scan::resolver::CalleeIdentity;
use std::borrow::Cow;
use std::fmt::Write as _;

/// File column value when a location cannot be resolved.
pub const UNKNOWN_FILE: &str = "<unknown>";

/// Default snippet length limit, in characters.
pub const SNIPPET_MAX_CHARS: usize = 200;

/// Marker appended to truncated snippets.
pub const ELLIPSIS: &str = "...";

/// How snippets are shaped before emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOptions {
    pub snippet_max_chars: usize,
    /// Rewrite control characters as visible escapes
    pub escape_control_chars: bool,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            snippet_max_chars: SNIPPET_MAX_CHARS,
            escape_control_chars: false,
        }
    }
}

/// One emitted row. Field order matches the CSV columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub kind: InvocationKind,
    pub qualified_name: String,
    pub exception_guarantee: ExceptionGuarantee,
    pub signature: String,
    pub snippet: String,
}

impl OutputRecord {
    /// Build the record for a resolved site.
    ///
    /// Never fails: an unresolved location becomes `<unknown>`/0/0 and a
    /// missing snippet becomes empty.
    pub fn new(
        site: &InvocationSite,
        identity: CalleeIdentity,
        raw_snippet: Option<&str>,
        options: &RecordOptions,
    ) -> Self {
        let (file, line, column) = match &site.expr_location {
            Some(loc) => (loc.file.clone(), loc.line, loc.column),
            None => (UNKNOWN_FILE.to_string(), 0, 0),
        };

        Self {
            file,
            line,
            column,
            kind: site.kind,
            qualified_name: identity.qualified_name,
            exception_guarantee: identity.exception_guarantee,
            signature: identity.declared_signature,
            snippet: shape_snippet(raw_snippet.unwrap_or_default(), options),
        }
    }
}

/// Build the record for `site`, pulling the snippet text from the model.
pub fn emit<M: SourceModel>(
    model: &M,
    site: &InvocationSite,
    identity: CalleeIdentity,
    options: &RecordOptions,
) -> OutputRecord {
    OutputRecord::new(
        site,
        identity,
        model.source_text(&site.source_range),
        options,
    )
}

/// Escape (optionally) then truncate a snippet.
pub fn shape_snippet(text: &str, options: &RecordOptions) -> String {
    let text = if options.escape_control_chars {
        escape_control_chars(text)
    } else {
        Cow::Borrowed(text)
    };
    truncate_snippet(&text, options.snippet_max_chars).into_owned()
}

/// Cut `text` to `max_chars` characters and append the ellipsis marker.
///
/// A text of exactly `max_chars` characters is returned unchanged.
/// Applying it to its own output is a no-op.
pub fn truncate_snippet(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

/// Rewrite C0 control characters so a row stays on one physical line.
pub fn escape_control_chars(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| c.is_ascii_control()) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PresumedLocation, SourceRange};

    fn site(location: Option<PresumedLocation>) -> InvocationSite {
        InvocationSite {
            kind: InvocationKind::Call,
            source_range: SourceRange::new(0, 0, 3),
            expr_location: location,
        }
    }

    fn identity() -> CalleeIdentity {
        CalleeIdentity {
            qualified_name: "f".to_string(),
            declared_signature: "void f() noexcept".to_string(),
            exception_guarantee: ExceptionGuarantee::NoThrow,
        }
    }

    #[test]
    fn test_exactly_max_chars_is_unmodified() {
        let text = "a".repeat(200);
        assert_eq!(truncate_snippet(&text, 200), text);
    }

    #[test]
    fn test_one_over_is_truncated_with_ellipsis() {
        let text = format!("{}b", "a".repeat(200));
        let truncated = truncate_snippet(&text, 200);
        assert_eq!(truncated, format!("{}...", "a".repeat(200)));
    }

    #[test]
    fn test_truncation_is_idempotent() {
        let text = "x".repeat(500);
        let once = truncate_snippet(&text, 200).into_owned();
        let twice = truncate_snippet(&once, 200).into_owned();
        assert_eq!(once, twice);
        assert_eq!(once.chars().count(), 203);
    }

    #[test]
    fn test_truncation_counts_characters() {
        let text = "é".repeat(201);
        let truncated = truncate_snippet(&text, 200);
        assert_eq!(truncated.chars().count(), 203);
        assert!(truncated.starts_with(&"é".repeat(200)));
    }

    #[test]
    fn test_unknown_location_sentinel() {
        let record = OutputRecord::new(&site(None), identity(), Some("f()"), &RecordOptions::default());
        assert_eq!(record.file, UNKNOWN_FILE);
        assert_eq!((record.line, record.column), (0, 0));
        assert_eq!(record.snippet, "f()");
    }

    #[test]
    fn test_control_chars_kept_by_default() {
        let options = RecordOptions::default();
        assert_eq!(shape_snippet("f(\n  1)", &options), "f(\n  1)");
    }

    #[test]
    fn test_control_chars_escaped_when_enabled() {
        let options = RecordOptions {
            escape_control_chars: true,
            ..RecordOptions::default()
        };
        assert_eq!(shape_snippet("f(\n\t1\r)\u{7}", &options), "f(\\n\\t1\\r)\\x07");
    }
}
