//! Quire Codegen - Code-Generation IR and Backend Dispatch
//!
//! The back half of the Quire template compiler: turns resolved calls into
//! JavaScript or Python source text, or into bytecode invocations.
//!
//! # Structure
//!
//! - `precedence` - Operator precedence levels and the parenthesization rule
//! - `ir` - Immutable expression/statement nodes and the formatting engine
//! - `plugin` - Operation registry with one realization per backend
//! - `stream` - Output sinks, log-only suppression and streaming escapers
//! - `config` - Backend settings loaded from TOML

#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod ir;
pub mod plugin;
pub mod precedence;
pub mod stream;

pub use config::{CodegenConfig, ConfigError};
pub use error::{CodegenError, CodegenResult, ErrorTier, StreamError, StreamResult};
pub use ir::{Dialect, Expr, FormattingContext, Statement};
pub use plugin::{Backend, OperationDescriptor, OperationRegistry, RegistryBuilder};
pub use precedence::{Associativity, OperandPosition, Precedence};
pub use stream::{LogOnlySink, OutputSink};
