//! Statement nodes

use super::dialect::Dialect;
use super::expr::Expr;
use super::format::FormattingContext;

/// A statement in generated text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    /// Statements emitted one after another
    Sequence(Vec<Statement>),

    /// `expr;` with an optional documentation header
    Expression { expr: Expr, doc: Option<String> },

    /// `const name = value;` / `let name;` / `name = value`
    Declaration {
        name: String,
        value: Option<Expr>,
        mutable: bool,
        doc: Option<String>,
    },
}

impl Statement {
    /// Wrap an expression as a statement
    pub fn expr(expr: Expr) -> Self {
        Statement::Expression { expr, doc: None }
    }

    /// Immutable declaration with an initializer
    pub fn declare(name: impl Into<String>, value: Expr) -> Self {
        Statement::Declaration {
            name: name.into(),
            value: Some(value),
            mutable: false,
            doc: None,
        }
    }

    /// Mutable declaration, optionally initialized
    pub fn declare_mutable(name: impl Into<String>, value: Option<Expr>) -> Self {
        Statement::Declaration {
            name: name.into(),
            value,
            mutable: true,
            doc: None,
        }
    }

    pub fn sequence(statements: Vec<Statement>) -> Self {
        Statement::Sequence(statements)
    }

    /// Attach a documentation header. Sequences carry no header of their own.
    pub fn with_doc(self, text: impl Into<String>) -> Self {
        match self {
            Statement::Expression { expr, .. } => Statement::Expression {
                expr,
                doc: Some(text.into()),
            },
            Statement::Declaration {
                name,
                value,
                mutable,
                ..
            } => Statement::Declaration {
                name,
                value,
                mutable,
                doc: Some(text.into()),
            },
            seq @ Statement::Sequence(_) => seq,
        }
    }

    /// The name introduced by a declaration.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Statement::Declaration { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Render this statement, preceded by any hoisted initial statements.
    pub fn render(&self, dialect: Dialect) -> String {
        let mut ctx = FormattingContext::new(dialect);
        ctx.append_statement(self);
        ctx.finish()
    }
}
