//! Operator precedence and operand protection.
//!
//! A dialect decides which [`Precedence`] and [`Associativity`] an operator
//! has. Whether an operand must be wrapped in parentheses is decided here,
//! by the same rule for every dialect.

/// Operator precedence level (higher = tighter binding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Conditional = 1,    // ?:, x if c else y
    LogicalOr = 2,      // ||, or
    LogicalAnd = 3,     // &&, and
    LogicalNot = 4,     // not (Python only)
    Equality = 5,       // ===, !==
    Relational = 6,     // <, >, <=, >=, in
    Additive = 7,       // +, -
    Multiplicative = 8, // *, /, %
    Unary = 9,          // !, -
    Primary = 10,       // literals, identifiers, calls, member access, (...)
}

impl Precedence {
    /// Every level, lowest first.
    pub const ALL: [Precedence; 10] = [
        Precedence::Conditional,
        Precedence::LogicalOr,
        Precedence::LogicalAnd,
        Precedence::LogicalNot,
        Precedence::Equality,
        Precedence::Relational,
        Precedence::Additive,
        Precedence::Multiplicative,
        Precedence::Unary,
        Precedence::Primary,
    ];

    /// The maximal sentinel: atoms, calls and parenthesized forms.
    pub fn is_primary(self) -> bool {
        self == Precedence::Primary
    }
}

/// How operators of equal precedence group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    /// `a - b - c` is `(a - b) - c`
    Left,
    /// `a ? b : c ? d : e` is `a ? b : (c ? d : e)`
    Right,
    /// Chaining is not allowed without parentheses
    NonAssociative,
}

/// Side of a binary operator an operand sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandPosition {
    Left,
    Right,
}

impl Associativity {
    /// Whether an operand at `position` may share the operator's precedence
    /// without parentheses.
    pub fn favors(self, position: OperandPosition) -> bool {
        matches!(
            (self, position),
            (Associativity::Left, OperandPosition::Left)
                | (Associativity::Right, OperandPosition::Right)
        )
    }
}

/// Whether an operand of a binary (or ternary) operator must be parenthesized.
pub fn needs_protection(
    operator: Precedence,
    associativity: Associativity,
    operand: Precedence,
    position: OperandPosition,
) -> bool {
    if operand.is_primary() {
        return false;
    }
    operand < operator || (operand == operator && !associativity.favors(position))
}

/// Whether the operand of a unary (or postfix) operator must be parenthesized.
pub fn needs_unary_protection(operator: Precedence, operand: Precedence) -> bool {
    !operand.is_primary() && operand < operator
}
