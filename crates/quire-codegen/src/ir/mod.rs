//! Target-language IR
//!
//! Immutable expression and statement nodes for the text backends, and the
//! engine that renders them.
//!
//! # Structure
//!
//! - `Expr` - Shared handle to an expression node and its initial statements
//! - `Statement` - Sequences, expression statements and declarations
//! - `Dialect` - Spelling and precedence table of one target language
//! - `FormattingContext` - Output buffer plus the initial-statement queue

pub mod dialect;
pub mod expr;
pub mod format;
pub mod helpers;
pub mod stmt;

pub use dialect::Dialect;
pub use expr::{BinaryOp, Expr, ExprKind, Literal, UnaryOp};
pub use format::{render_expr, FormattingContext};
pub use helpers::{coerce_to_string, concat, is_string_literal, is_string_literal_text, wrap_in_call};
pub use stmt::Statement;
