//! Text backend context
//!
//! Capabilities a text realization may use: the dialect, the configured
//! runtime helper namespace, and constructors for global references and
//! method calls.

use crate::config::CodegenConfig;
use crate::error::{CodegenError, CodegenResult};
use crate::ir::{coerce_to_string, Dialect, Expr, FormattingContext};

use super::backend::Backend;

/// Context handed to JavaScript and Python realizations.
#[derive(Debug, Clone)]
pub struct TextContext {
    backend: Backend,
    dialect: Dialect,
    helper_namespace: String,
    indent: String,
}

impl TextContext {
    /// Context for `backend`, which must be a text backend.
    pub fn new(backend: Backend, config: &CodegenConfig) -> CodegenResult<Self> {
        let dialect = backend
            .dialect()
            .ok_or(CodegenError::NotATextBackend { backend })?;
        Ok(Self::for_dialect(backend, dialect, config))
    }

    pub fn javascript(config: &CodegenConfig) -> Self {
        Self::for_dialect(Backend::JavaScript, Dialect::JavaScript, config)
    }

    pub fn python(config: &CodegenConfig) -> Self {
        Self::for_dialect(Backend::Python, Dialect::Python, config)
    }

    fn for_dialect(backend: Backend, dialect: Dialect, config: &CodegenConfig) -> Self {
        let (helper_namespace, indent) = match dialect {
            Dialect::JavaScript => (&config.javascript.runtime_namespace, &config.javascript.indent),
            Dialect::Python => (&config.python.runtime_module, &config.python.indent),
        };
        Self {
            backend,
            dialect,
            helper_namespace: helper_namespace.clone(),
            indent: indent.clone(),
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn helper_namespace(&self) -> &str {
        &self.helper_namespace
    }

    /// Reference to runtime helper `name`, e.g. `quire.rt.flat`.
    pub fn runtime_helper(&self, name: &str) -> Expr {
        Expr::dotted_id(format!("{}.{}", self.helper_namespace, name))
    }

    /// `helper(args...)` for runtime helper `name`.
    pub fn call_helper(&self, name: &str, args: Vec<Expr>) -> Expr {
        Expr::call(self.runtime_helper(name), args)
    }

    /// Reference to a global symbol, possibly dotted (`Math.max`).
    pub fn global(&self, name: &str) -> Expr {
        Expr::dotted_id(name)
    }

    /// `global(args...)`
    pub fn call_global(&self, name: &str, args: Vec<Expr>) -> Expr {
        Expr::call(self.global(name), args)
    }

    /// `receiver.name(args...)`
    pub fn method_call(&self, receiver: &Expr, name: &str, args: Vec<Expr>) -> Expr {
        receiver.call_method(name, args)
    }

    pub fn coerce_to_string(&self, expr: &Expr) -> Expr {
        coerce_to_string(expr, self.dialect)
    }

    /// A formatting context using the configured indentation.
    pub fn formatting_context(&self) -> FormattingContext {
        FormattingContext::new(self.dialect).with_indent(self.indent.clone())
    }
}
