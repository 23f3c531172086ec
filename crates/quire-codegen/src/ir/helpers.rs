//! Expression-building helpers shared by the text realizations.

use super::dialect::Dialect;
use super::expr::{BinaryOp, Expr};

/// Join `operands` with the additive operator, left to right.
///
/// - no operands: the empty-string literal
/// - one operand: that same node
/// - more: a left-nested chain of `+` nodes; the first operand is
///   parenthesized only below additive precedence, every later one also at
///   additive precedence, so `a + (b + c)` keeps its evaluation order.
pub fn concat(operands: impl IntoIterator<Item = Expr>) -> Expr {
    let mut operands = operands.into_iter();
    let Some(first) = operands.next() else {
        return Expr::string("");
    };
    operands.fold(first, |acc, next| Expr::binary(BinaryOp::Add, acc, next))
}

/// Whether `text` is exactly one quoted string literal.
///
/// The text must open and close with the same quote character, and that
/// character must not appear unescaped in between. A backslash consumes
/// the character after it.
pub fn is_string_literal_text(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() < 2 {
        return false;
    }
    let quote = bytes[0];
    if (quote != b'\'' && quote != b'"') || bytes[bytes.len() - 1] != quote {
        return false;
    }

    let inner = &bytes[1..bytes.len() - 1];
    let mut i = 0;
    while i < inner.len() {
        match inner[i] {
            b'\\' => i += 2,
            c if c == quote => return false,
            _ => i += 1,
        }
    }
    // A trailing backslash escapes the closing quote.
    i == inner.len()
}

/// Whether `expr` renders as a single string literal in `dialect`.
pub fn is_string_literal(expr: &Expr, dialect: Dialect) -> bool {
    is_string_literal_text(&expr.render(dialect))
}

/// `expr` as a string value.
///
/// String literals are returned unchanged. Otherwise JavaScript relies on
/// `'' + expr`; Python's `+` does not coerce, so it uses `str(expr)`.
pub fn coerce_to_string(expr: &Expr, dialect: Dialect) -> Expr {
    if is_string_literal(expr, dialect) {
        return expr.clone();
    }
    match dialect {
        Dialect::JavaScript => concat([Expr::string(""), expr.clone()]),
        Dialect::Python => wrap_in_call("str", expr.clone()),
    }
}

/// `callee(operand)`, where `callee` may be a dotted path.
pub fn wrap_in_call(callee: &str, operand: Expr) -> Expr {
    Expr::call(Expr::dotted_id(callee), vec![operand])
}
