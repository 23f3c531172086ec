//! Literal argument validation
//!
//! Some operations take extra arguments that must be quoted literals naming
//! entries of a fixed allow-list. These are checked when the call is
//! constructed, before any backend code is generated.

use crate::error::{CodegenError, CodegenResult};
use crate::ir::is_string_literal_text;

/// A fixed set of names a literal argument may resolve to.
#[derive(Debug, Clone, Copy)]
pub struct AllowList {
    entries: &'static [&'static str],
}

impl AllowList {
    pub const fn new(entries: &'static [&'static str]) -> Self {
        Self { entries }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains(&name)
    }

    /// Resolve the source text of one quoted literal against this list.
    pub fn resolve_literal(&self, text: &str) -> CodegenResult<&'static str> {
        let name = unquote(text)?;
        self.entries
            .iter()
            .copied()
            .find(|entry| *entry == name)
            .ok_or_else(|| CodegenError::UnrecognizedAllowListEntry {
                name: name.to_string(),
            })
    }

    /// Resolve every literal, failing on the first bad one.
    pub fn resolve_all(&self, texts: &[String]) -> CodegenResult<Vec<&'static str>> {
        texts.iter().map(|text| self.resolve_literal(text)).collect()
    }
}

/// The contents of a quoted literal.
///
/// The text must be a single string literal with a non-empty body.
pub fn unquote(text: &str) -> CodegenResult<&str> {
    let malformed = || CodegenError::MalformedLiteral {
        text: text.to_string(),
    };
    if !is_string_literal_text(text) {
        return Err(malformed());
    }
    let inner = &text[1..text.len() - 1];
    if inner.is_empty() {
        return Err(malformed());
    }
    Ok(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAGS: AllowList = AllowList::new(&["hr", "li", "ol", "span", "ul"]);

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'span'").unwrap(), "span");
        assert_eq!(unquote("\"ul\"").unwrap(), "ul");
        assert_eq!(unquote(r"'it\'s'").unwrap(), r"it\'s");
    }

    #[test]
    fn test_unquote_rejects_malformed() {
        for text in ["span", "''", "'", "'sp'an'", "'span\"", r"'span\'"] {
            match unquote(text) {
                Err(CodegenError::MalformedLiteral { text: t }) => assert_eq!(t, text),
                other => panic!("expected malformed literal for {text}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_resolve() {
        assert_eq!(TAGS.resolve_literal("'li'").unwrap(), "li");
        assert!(TAGS.contains("hr"));
        assert!(!TAGS.contains("b"));

        let err = TAGS.resolve_literal("'notatag'").unwrap_err();
        assert!(matches!(
            err,
            CodegenError::UnrecognizedAllowListEntry { ref name } if name == "notatag"
        ));
    }

    #[test]
    fn test_resolve_all_stops_at_first_failure() {
        let texts = vec!["'span'".to_string(), "'notatag'".to_string(), "bad".to_string()];
        let err = TAGS.resolve_all(&texts).unwrap_err();
        assert!(err.to_string().contains("notatag"));
        assert_eq!(TAGS.resolve_all(&["'ol'".to_string()]).unwrap(), vec!["ol"]);
    }
}
