//! Expression nodes
//!
//! An [`Expr`] is an immutable, cheaply clonable handle to a node. Each node
//! also carries the statements that must run before its text is evaluated
//! (its *initial statements*), inherited from its children in order.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::dialect::Dialect;
use super::format;
use super::stmt::Statement;
use crate::precedence::Precedence;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Logical
    Or,
    And,

    // Comparison
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    In,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Equality, ordering and membership tests.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::Less
                | BinaryOp::LessEqual
                | BinaryOp::Greater
                | BinaryOp::GreaterEqual
                | BinaryOp::In
        )
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Negate,
}

/// Literal values
#[derive(Debug, Clone)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Literal::Str(a), Literal::Str(b)) => a == b,
            (Literal::Int(a), Literal::Int(b)) => a == b,
            (Literal::Float(a), Literal::Float(b)) => a.to_bits() == b.to_bits(),
            (Literal::Bool(a), Literal::Bool(b)) => a == b,
            (Literal::Null, Literal::Null) => true,
            _ => false,
        }
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Literal::Str(s) => s.hash(state),
            Literal::Int(v) => v.hash(state),
            Literal::Float(v) => v.to_bits().hash(state),
            Literal::Bool(b) => b.hash(state),
            Literal::Null => {}
        }
    }
}

/// The shape of an expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Literal(Literal),
    /// Identifier or dotted global path (`x`, `quire.rt.flat`)
    Var(String),
    Unary {
        op: UnaryOp,
        operand: Expr,
    },
    Binary {
        op: BinaryOp,
        left: Expr,
        right: Expr,
    },
    Ternary {
        condition: Expr,
        then_branch: Expr,
        else_branch: Expr,
    },
    Call {
        callee: Expr,
        args: Vec<Expr>,
    },
    Member {
        object: Expr,
        name: String,
    },
    Index {
        object: Expr,
        index: Expr,
    },
    Array(Vec<Expr>),
    Object(Vec<(String, Expr)>),
}

impl ExprKind {
    fn children(&self) -> Vec<&Expr> {
        match self {
            ExprKind::Literal(_) | ExprKind::Var(_) => Vec::new(),
            ExprKind::Unary { operand, .. } => vec![operand],
            ExprKind::Binary { left, right, .. } => vec![left, right],
            ExprKind::Ternary {
                condition,
                then_branch,
                else_branch,
            } => vec![condition, then_branch, else_branch],
            ExprKind::Call { callee, args } => std::iter::once(callee).chain(args).collect(),
            ExprKind::Member { object, .. } => vec![object],
            ExprKind::Index { object, index } => vec![object, index],
            ExprKind::Array(elements) => elements.iter().collect(),
            ExprKind::Object(entries) => entries.iter().map(|(_, v)| v).collect(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ExprNode {
    kind: ExprKind,
    initial_statements: Vec<Statement>,
}

/// Immutable expression handle. Cloning shares the node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr(Arc<ExprNode>);

impl Expr {
    fn from_kind(kind: ExprKind) -> Self {
        let mut initial_statements = Vec::new();
        for child in kind.children() {
            merge_statements(&mut initial_statements, child.initial_statements());
        }
        Self(Arc::new(ExprNode {
            kind,
            initial_statements,
        }))
    }

    // ── Leaves ──────────────────────────────────────────────────────────

    /// A literal of any kind
    pub fn literal(literal: Literal) -> Self {
        Self::from_kind(ExprKind::Literal(literal))
    }

    /// A string literal
    pub fn string(value: impl Into<String>) -> Self {
        Self::literal(Literal::Str(value.into()))
    }

    /// An integer literal
    pub fn int(value: i64) -> Self {
        Self::literal(Literal::Int(value))
    }

    /// A floating-point literal
    pub fn float(value: f64) -> Self {
        Self::literal(Literal::Float(value))
    }

    /// A boolean literal
    pub fn bool(value: bool) -> Self {
        Self::literal(Literal::Bool(value))
    }

    /// The null literal (`null` / `None`)
    pub fn null() -> Self {
        Self::literal(Literal::Null)
    }

    /// A variable reference
    pub fn var(name: impl Into<String>) -> Self {
        Self::from_kind(ExprKind::Var(name.into()))
    }

    /// A reference to a namespaced global such as `quire.rt.flat`
    pub fn dotted_id(path: impl Into<String>) -> Self {
        Self::var(path)
    }

    // ── Composites ──────────────────────────────────────────────────────

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::from_kind(ExprKind::Unary { op, operand })
    }

    pub fn not(operand: Expr) -> Self {
        Self::unary(UnaryOp::Not, operand)
    }

    pub fn negate(operand: Expr) -> Self {
        Self::unary(UnaryOp::Negate, operand)
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::from_kind(ExprKind::Binary { op, left, right })
    }

    pub fn ternary(condition: Expr, then_branch: Expr, else_branch: Expr) -> Self {
        Self::from_kind(ExprKind::Ternary {
            condition,
            then_branch,
            else_branch,
        })
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Self::from_kind(ExprKind::Call { callee, args })
    }

    pub fn member(object: Expr, name: impl Into<String>) -> Self {
        Self::from_kind(ExprKind::Member {
            object,
            name: name.into(),
        })
    }

    pub fn index(object: Expr, index: Expr) -> Self {
        Self::from_kind(ExprKind::Index { object, index })
    }

    pub fn array(elements: Vec<Expr>) -> Self {
        Self::from_kind(ExprKind::Array(elements))
    }

    pub fn object(entries: Vec<(String, Expr)>) -> Self {
        Self::from_kind(ExprKind::Object(entries))
    }

    /// `self.name(args...)`
    pub fn call_method(&self, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::call(Self::member(self.clone(), name), args)
    }

    /// A copy of this node that also requires `statements` to run first.
    ///
    /// The new statements follow the ones inherited from children.
    pub fn with_initial_statements(&self, statements: impl IntoIterator<Item = Statement>) -> Self {
        let mut initial_statements = self.0.initial_statements.clone();
        let extra: Vec<Statement> = statements.into_iter().collect();
        merge_statements(&mut initial_statements, &extra);
        Self(Arc::new(ExprNode {
            kind: self.0.kind.clone(),
            initial_statements,
        }))
    }

    /// A reference to `name` whose declaration `const name = value` is
    /// hoisted ahead of any statement that uses it.
    pub fn temporary(name: impl Into<String>, value: Expr) -> Self {
        let name = name.into();
        let declaration = Statement::declare(name.clone(), value);
        Self::var(name).with_initial_statements([declaration])
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn kind(&self) -> &ExprKind {
        &self.0.kind
    }

    pub fn initial_statements(&self) -> &[Statement] {
        &self.0.initial_statements
    }

    /// Whether both handles point at the very same node.
    pub fn same_node(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// The string value, if this is a string literal node.
    pub fn as_string_literal(&self) -> Option<&str> {
        match self.kind() {
            ExprKind::Literal(Literal::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Precedence of this node when rendered in `dialect`.
    pub fn precedence(&self, dialect: Dialect) -> Precedence {
        match self.kind() {
            // A leading minus sign binds like a unary operator.
            ExprKind::Literal(Literal::Int(v)) if *v < 0 => Precedence::Unary,
            ExprKind::Literal(Literal::Float(v)) if v.is_sign_negative() && !v.is_nan() => {
                Precedence::Unary
            }
            ExprKind::Literal(_)
            | ExprKind::Var(_)
            | ExprKind::Call { .. }
            | ExprKind::Member { .. }
            | ExprKind::Index { .. }
            | ExprKind::Array(_)
            | ExprKind::Object(_) => Precedence::Primary,
            ExprKind::Unary { op, .. } => dialect.unary_precedence(*op),
            ExprKind::Binary { op, .. } => dialect.binary_precedence(*op),
            ExprKind::Ternary { .. } => Precedence::Conditional,
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    /// This expression as a statement.
    pub fn as_statement(&self) -> Statement {
        Statement::expr(self.clone())
    }

    /// The expression's own text, without its initial statements.
    pub fn render(&self, dialect: Dialect) -> String {
        format::render_expr(self, dialect)
    }

    /// The full chunk: initial statements, then the expression as a statement.
    pub fn code(&self, dialect: Dialect) -> String {
        self.as_statement().render(dialect)
    }
}

/// Append `extra` to `into`, skipping statements already present.
fn merge_statements(into: &mut Vec<Statement>, extra: &[Statement]) {
    for stmt in extra {
        if !into.contains(stmt) {
            into.push(stmt.clone());
        }
    }
}
