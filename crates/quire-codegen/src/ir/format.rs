//! Formatting engine
//!
//! Turns IR nodes into text. Expressions are rendered with the minimum
//! parentheses the precedence rules allow; statements are rendered line by
//! line, each preceded by the initial statements its expressions require.

use rustc_hash::FxHashSet;

use super::dialect::Dialect;
use super::expr::{Expr, ExprKind, Literal, UnaryOp};
use super::stmt::Statement;
use crate::precedence::{needs_protection, needs_unary_protection, Associativity, OperandPosition, Precedence};

/// Render an expression's own text (initial statements are not included).
pub fn render_expr(expr: &Expr, dialect: Dialect) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr, dialect);
    out
}

fn write_expr(out: &mut String, expr: &Expr, d: Dialect) {
    match expr.kind() {
        ExprKind::Literal(literal) => d.write_literal(out, literal),
        ExprKind::Var(name) => out.push_str(name),
        ExprKind::Unary { op, operand } => {
            let protect = needs_unary_protection(d.unary_precedence(*op), operand.precedence(d));
            let text = render_expr(operand, d);
            out.push_str(d.unary_token(*op));
            if protect {
                push_parenthesized(out, &text);
            } else {
                // `- -x` must not collapse into a decrement.
                if *op == UnaryOp::Negate && text.starts_with('-') {
                    out.push(' ');
                }
                out.push_str(&text);
            }
        }
        ExprKind::Binary { op, left, right } => {
            let prec = d.binary_precedence(*op);
            let assoc = d.binary_associativity(*op);
            write_operand(out, left, d, |p| needs_protection(prec, assoc, p, OperandPosition::Left));
            out.push(' ');
            out.push_str(d.binary_token(*op));
            out.push(' ');
            write_operand(out, right, d, |p| needs_protection(prec, assoc, p, OperandPosition::Right));
        }
        ExprKind::Ternary {
            condition,
            then_branch,
            else_branch,
        } => {
            let guard = |position: OperandPosition| {
                move |p: Precedence| {
                    needs_protection(Precedence::Conditional, Associativity::Right, p, position)
                }
            };
            match d {
                Dialect::JavaScript => {
                    write_operand(out, condition, d, guard(OperandPosition::Left));
                    out.push_str(" ? ");
                    write_operand(out, then_branch, d, guard(OperandPosition::Right));
                    out.push_str(" : ");
                    write_operand(out, else_branch, d, guard(OperandPosition::Right));
                }
                Dialect::Python => {
                    write_operand(out, then_branch, d, guard(OperandPosition::Left));
                    out.push_str(" if ");
                    write_operand(out, condition, d, guard(OperandPosition::Left));
                    out.push_str(" else ");
                    write_operand(out, else_branch, d, guard(OperandPosition::Right));
                }
            }
        }
        ExprKind::Call { callee, args } => {
            write_postfix_target(out, callee, d);
            out.push('(');
            write_list(out, args, d);
            out.push(')');
        }
        ExprKind::Member { object, name } => {
            write_postfix_target(out, object, d);
            out.push('.');
            out.push_str(name);
        }
        ExprKind::Index { object, index } => {
            write_postfix_target(out, object, d);
            out.push('[');
            write_expr(out, index, d);
            out.push(']');
        }
        ExprKind::Array(elements) => {
            out.push('[');
            write_list(out, elements, d);
            out.push(']');
        }
        ExprKind::Object(entries) => {
            out.push('{');
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                d.write_literal(out, &Literal::Str(key.clone()));
                out.push_str(": ");
                write_expr(out, value, d);
            }
            out.push('}');
        }
    }
}

fn write_operand(out: &mut String, operand: &Expr, d: Dialect, protect: impl Fn(Precedence) -> bool) {
    if protect(operand.precedence(d)) {
        push_parenthesized(out, &render_expr(operand, d));
    } else {
        write_expr(out, operand, d);
    }
}

/// Callee, member-access object or indexed value.
fn write_postfix_target(out: &mut String, target: &Expr, d: Dialect) {
    // `1.toString()` does not parse; numeric receivers always get parentheses.
    let numeric = matches!(
        target.kind(),
        ExprKind::Literal(Literal::Int(_) | Literal::Float(_))
    );
    if numeric || needs_unary_protection(Precedence::Primary, target.precedence(d)) {
        push_parenthesized(out, &render_expr(target, d));
    } else {
        write_expr(out, target, d);
    }
}

fn write_list(out: &mut String, items: &[Expr], d: Dialect) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expr(out, item, d);
    }
}

fn push_parenthesized(out: &mut String, text: &str) {
    out.push('(');
    out.push_str(text);
    out.push(')');
}

// ============================================================================
// Formatting Context
// ============================================================================

/// Accumulates rendered statements for one output unit.
///
/// Initial statements are queued with [`enqueue_initial_statements`] and
/// written, in insertion order, by the next [`flush_initial_statements`].
/// A statement is written at most once as an initial statement, even if
/// several expressions depend on it.
///
/// [`enqueue_initial_statements`]: FormattingContext::enqueue_initial_statements
/// [`flush_initial_statements`]: FormattingContext::flush_initial_statements
pub struct FormattingContext {
    dialect: Dialect,
    indent_unit: String,
    indent_level: usize,
    buf: String,
    pending: Vec<Statement>,
    emitted: FxHashSet<Statement>,
}

impl FormattingContext {
    pub fn new(dialect: Dialect) -> Self {
        let indent_unit = match dialect {
            Dialect::JavaScript => "  ",
            Dialect::Python => "    ",
        };
        Self {
            dialect,
            indent_unit: indent_unit.to_string(),
            indent_level: 0,
            buf: String::new(),
            pending: Vec::new(),
            emitted: FxHashSet::default(),
        }
    }

    /// Use `unit` for one level of indentation.
    pub fn with_indent(mut self, unit: impl Into<String>) -> Self {
        self.indent_unit = unit.into();
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Text written so far.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Queue statements to be written before the next expression text.
    pub fn enqueue_initial_statements(&mut self, statements: &[Statement]) {
        self.pending.extend(statements.iter().cloned());
    }

    /// Write every queued initial statement, in order, and empty the queue.
    pub fn flush_initial_statements(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for stmt in &pending {
            if !self.emitted.contains(stmt) {
                self.write_statement(stmt);
            }
        }
    }

    /// Flush `expr`'s initial statements and return its text, for callers
    /// embedding the expression in a line of their own.
    pub fn render_fragment(&mut self, expr: &Expr) -> String {
        self.enqueue_initial_statements(expr.initial_statements());
        self.flush_initial_statements();
        render_expr(expr, self.dialect)
    }

    /// Write a statement (and the initial statements it depends on).
    pub fn append_statement(&mut self, stmt: &Statement) {
        self.write_statement(stmt);
    }

    /// Flush anything still queued and return the text.
    pub fn finish(mut self) -> String {
        self.flush_initial_statements();
        self.buf
    }

    fn write_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Sequence(statements) => {
                for s in statements {
                    self.write_statement(s);
                }
                return;
            }
            Statement::Expression { expr, doc } => {
                let text = self.render_fragment(expr);
                self.write_doc(doc.as_deref());
                self.write_line(&format!("{}{}", text, self.dialect.terminator()));
            }
            Statement::Declaration {
                name,
                value,
                mutable,
                doc,
            } => {
                let value_text = value.as_ref().map(|v| self.render_fragment(v));
                self.write_doc(doc.as_deref());

                let mut line = String::new();
                if let Some(keyword) = self.dialect.declaration_keyword(*mutable) {
                    line.push_str(keyword);
                    line.push(' ');
                }
                line.push_str(name);
                match (value_text, self.dialect) {
                    (Some(text), _) => {
                        line.push_str(" = ");
                        line.push_str(&text);
                    }
                    (None, Dialect::Python) => line.push_str(" = None"),
                    (None, Dialect::JavaScript) => {}
                }
                line.push_str(self.dialect.terminator());
                self.write_line(&line);
            }
        }
        self.emitted.insert(stmt.clone());
    }

    fn write_doc(&mut self, doc: Option<&str>) {
        if let Some(text) = doc {
            let indent = self.indent_unit.repeat(self.indent_level);
            self.dialect.write_doc(&mut self.buf, &indent, text);
        }
    }

    fn write_line(&mut self, text: &str) {
        for _ in 0..self.indent_level {
            self.buf.push_str(&self.indent_unit);
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }
}
