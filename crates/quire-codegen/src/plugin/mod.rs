//! Plugin dispatch
//!
//! Operations are looked up by name in an [`OperationRegistry`]; each one
//! holds an independent realization per [`Backend`]. Text backends build
//! [`Expr`](crate::ir::Expr) trees through a [`TextContext`], the bytecode
//! backend builds [`Invocation`]s through an [`InvokeContext`].

pub mod backend;
pub mod builtins;
pub mod descriptor;
pub mod invoke;
pub mod literal;
pub mod method_id;
pub mod registry;
pub mod text;

pub use backend::Backend;
pub use descriptor::{
    InvokeRealization, LiteralValidator, OperandHandle, OperationDescriptor, OutputForm,
    Realization, StreamingRealization, TextRealization,
};
pub use invoke::{Constant, InvokeContext, Invocation, MethodKind, MethodRef, MethodTable, Operand};
pub use literal::{unquote, AllowList};
pub use registry::{OperationRegistry, RegistryBuilder};
pub use text::TextContext;
