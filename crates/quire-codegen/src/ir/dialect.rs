//! Text dialects
//!
//! A dialect maps the shared node IR onto one target language: operator
//! spellings and precedences, literal spellings, statement shapes.

use super::expr::{BinaryOp, Literal, UnaryOp};
use crate::precedence::{Associativity, Precedence};
use std::fmt::Write;

/// A text output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    JavaScript,
    Python,
}

impl Dialect {
    /// Precedence of a binary operator in this dialect.
    pub fn binary_precedence(self, op: BinaryOp) -> Precedence {
        match op {
            BinaryOp::Or => Precedence::LogicalOr,
            BinaryOp::And => Precedence::LogicalAnd,
            BinaryOp::Equal | BinaryOp::NotEqual if matches!(self, Dialect::JavaScript) => {
                Precedence::Equality
            }
            BinaryOp::Add | BinaryOp::Sub => Precedence::Additive,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => Precedence::Multiplicative,
            // Ordering, membership and (in Python) equality share one level.
            _ => Precedence::Relational,
        }
    }

    /// Associativity of a binary operator in this dialect.
    pub fn binary_associativity(self, op: BinaryOp) -> Associativity {
        match self {
            Dialect::Python if op.is_comparison() => Associativity::NonAssociative,
            _ => Associativity::Left,
        }
    }

    /// Precedence of a unary operator in this dialect.
    pub fn unary_precedence(self, op: UnaryOp) -> Precedence {
        match (self, op) {
            (Dialect::Python, UnaryOp::Not) => Precedence::LogicalNot,
            _ => Precedence::Unary,
        }
    }

    /// Source spelling of a binary operator.
    pub fn binary_token(self, op: BinaryOp) -> &'static str {
        match (self, op) {
            (Dialect::JavaScript, BinaryOp::Or) => "||",
            (Dialect::JavaScript, BinaryOp::And) => "&&",
            (Dialect::JavaScript, BinaryOp::Equal) => "===",
            (Dialect::JavaScript, BinaryOp::NotEqual) => "!==",
            (Dialect::Python, BinaryOp::Or) => "or",
            (Dialect::Python, BinaryOp::And) => "and",
            (Dialect::Python, BinaryOp::Equal) => "==",
            (Dialect::Python, BinaryOp::NotEqual) => "!=",
            (_, BinaryOp::Less) => "<",
            (_, BinaryOp::LessEqual) => "<=",
            (_, BinaryOp::Greater) => ">",
            (_, BinaryOp::GreaterEqual) => ">=",
            (_, BinaryOp::In) => "in",
            (_, BinaryOp::Add) => "+",
            (_, BinaryOp::Sub) => "-",
            (_, BinaryOp::Mul) => "*",
            (_, BinaryOp::Div) => "/",
            (_, BinaryOp::Mod) => "%",
        }
    }

    /// Source spelling of a unary operator, including any trailing space.
    pub fn unary_token(self, op: UnaryOp) -> &'static str {
        match (self, op) {
            (Dialect::JavaScript, UnaryOp::Not) => "!",
            (Dialect::Python, UnaryOp::Not) => "not ",
            (_, UnaryOp::Negate) => "-",
        }
    }

    /// Statement terminator (empty for Python).
    pub fn terminator(self) -> &'static str {
        match self {
            Dialect::JavaScript => ";",
            Dialect::Python => "",
        }
    }

    /// Keyword introducing a declaration, if the dialect has one.
    pub fn declaration_keyword(self, mutable: bool) -> Option<&'static str> {
        match (self, mutable) {
            (Dialect::JavaScript, true) => Some("let"),
            (Dialect::JavaScript, false) => Some("const"),
            (Dialect::Python, _) => None,
        }
    }

    /// Write a literal in this dialect's spelling.
    pub fn write_literal(self, out: &mut String, literal: &Literal) {
        match literal {
            Literal::Str(s) => write_quoted(out, s),
            Literal::Int(v) => {
                let _ = write!(out, "{}", v);
            }
            Literal::Float(v) => self.write_float(out, *v),
            Literal::Bool(b) => out.push_str(match (self, *b) {
                (Dialect::JavaScript, true) => "true",
                (Dialect::JavaScript, false) => "false",
                (Dialect::Python, true) => "True",
                (Dialect::Python, false) => "False",
            }),
            Literal::Null => out.push_str(match self {
                Dialect::JavaScript => "null",
                Dialect::Python => "None",
            }),
        }
    }

    fn write_float(self, out: &mut String, v: f64) {
        if v.is_nan() {
            out.push_str(match self {
                Dialect::JavaScript => "NaN",
                Dialect::Python => "float('nan')",
            });
        } else if v.is_infinite() {
            let sign = if v < 0.0 { "-" } else { "" };
            let _ = match self {
                Dialect::JavaScript => write!(out, "{}Infinity", sign),
                Dialect::Python => write!(out, "{}float('inf')", sign),
            };
        } else {
            let _ = write!(out, "{:?}", v);
        }
    }

    /// Write a documentation header, one or more full lines, at `indent`.
    pub fn write_doc(self, out: &mut String, indent: &str, text: &str) {
        match self {
            Dialect::JavaScript => {
                // A literal `*/` would end the comment early.
                let text = text.replace("*/", "*\\/");
                let lines: Vec<&str> = text.lines().collect();
                if lines.len() <= 1 {
                    let _ = writeln!(out, "{}/** {} */", indent, text.trim());
                } else {
                    let _ = writeln!(out, "{}/**", indent);
                    for line in lines {
                        let _ = writeln!(out, "{} * {}", indent, line);
                    }
                    let _ = writeln!(out, "{} */", indent);
                }
            }
            Dialect::Python => {
                for line in text.lines() {
                    let _ = writeln!(out, "{}# {}", indent, line);
                }
            }
        }
    }
}

/// `s` as a single-quoted string literal valid in every dialect.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    write_quoted(&mut out, s);
    out
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{2028}' || c == '\u{2029}' => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('\'');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(dialect: Dialect, literal: Literal) -> String {
        let mut out = String::new();
        dialect.write_literal(&mut out, &literal);
        out
    }

    #[test]
    fn test_literal_spellings() {
        assert_eq!(lit(Dialect::JavaScript, Literal::Null), "null");
        assert_eq!(lit(Dialect::Python, Literal::Null), "None");
        assert_eq!(lit(Dialect::Python, Literal::Bool(true)), "True");
        assert_eq!(lit(Dialect::JavaScript, Literal::Float(1.5)), "1.5");
        assert_eq!(lit(Dialect::JavaScript, Literal::Float(f64::NEG_INFINITY)), "-Infinity");
        assert_eq!(lit(Dialect::Python, Literal::Float(f64::NAN)), "float('nan')");
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            lit(Dialect::JavaScript, Literal::Str("it's\\\n".into())),
            r"'it\'s\\\n'"
        );
        assert_eq!(lit(Dialect::Python, Literal::Str("\u{1}".into())), r"'\u0001'");
    }

    #[test]
    fn test_python_comparisons_do_not_chain() {
        assert_eq!(
            Dialect::Python.binary_associativity(BinaryOp::Less),
            Associativity::NonAssociative
        );
        assert_eq!(
            Dialect::JavaScript.binary_associativity(BinaryOp::Less),
            Associativity::Left
        );
        assert_eq!(
            Dialect::Python.binary_precedence(BinaryOp::Equal),
            Dialect::Python.binary_precedence(BinaryOp::In)
        );
    }

    #[test]
    fn test_doc_headers() {
        let mut out = String::new();
        Dialect::JavaScript.write_doc(&mut out, "", "Helper.");
        assert_eq!(out, "/** Helper. */\n");

        let mut out = String::new();
        Dialect::JavaScript.write_doc(&mut out, "  ", "a\nb");
        assert_eq!(out, "  /**\n   * a\n   * b\n   */\n");

        let mut out = String::new();
        Dialect::Python.write_doc(&mut out, "", "a\nb");
        assert_eq!(out, "# a\n# b\n");
    }

    #[test]
    fn test_doc_header_cannot_close_comment_early() {
        let mut out = String::new();
        Dialect::JavaScript.write_doc(&mut out, "", "see a/*b*/c");
        assert_eq!(out, "/** see a/*b*\\/c */\n");

        let mut out = String::new();
        Dialect::JavaScript.write_doc(&mut out, "", "x */\ny*/");
        assert_eq!(out, "/**\n * x *\\/\n * y*\\/\n */\n");
        assert_eq!(out.matches("*/").count(), 1);
    }

    #[test]
    fn test_python_comparisons_are_non_associative() {
        use BinaryOp::*;
        for op in [Equal, NotEqual, Less, LessEqual, Greater, GreaterEqual, In] {
            assert!(op.is_comparison());
            assert_eq!(Dialect::Python.binary_associativity(op), Associativity::NonAssociative);
            assert_eq!(Dialect::JavaScript.binary_associativity(op), Associativity::Left);
        }
        for op in [Or, And, Add, Sub, Mul, Div, Mod] {
            assert!(!op.is_comparison());
            assert_eq!(Dialect::Python.binary_associativity(op), Associativity::Left);
        }
    }
}
