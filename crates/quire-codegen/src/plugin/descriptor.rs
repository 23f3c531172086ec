//! Operation descriptors
//!
//! One logical operation: its name, the argument counts it accepts, and an
//! independent realization per backend. Backends do not share IR: a text
//! realization composes [`Expr`] nodes, a bytecode realization composes
//! [`Invocation`]s.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::{CodegenError, CodegenResult};
use crate::ir::{Dialect, Expr};
use crate::stream::{OutputSink, SinkAndOptions};

use super::backend::Backend;
use super::invoke::{InvokeContext, Invocation, Operand};
use super::text::TextContext;

/// Realization for a text backend.
pub type TextRealization = Arc<dyn Fn(&[Expr], &TextContext) -> CodegenResult<Expr> + Send + Sync>;

/// Realization for the bytecode backend.
pub type InvokeRealization =
    Arc<dyn Fn(&[Operand], &InvokeContext<'_>) -> CodegenResult<Invocation> + Send + Sync>;

/// Sink-producing form: wraps `sink` so the value written through it is
/// transformed on the way. The slice holds the source text of the
/// arguments after the value.
pub type StreamingRealization =
    for<'a> fn(Box<dyn OutputSink + 'a>, &[String]) -> CodegenResult<SinkAndOptions<'a>>;

/// Checks the source text of literal arguments.
pub type LiteralValidator = fn(&[String]) -> CodegenResult<()>;

/// A backend-native operand whose source text can be inspected.
pub trait OperandHandle {
    fn source_text(&self) -> String;
}

impl OperandHandle for Expr {
    fn source_text(&self) -> String {
        self.render(Dialect::JavaScript)
    }
}

impl OperandHandle for Operand {
    fn source_text(&self) -> String {
        self.to_string()
    }
}

impl OperandHandle for String {
    fn source_text(&self) -> String {
        self.clone()
    }
}

/// One backend's realization.
#[derive(Clone)]
pub enum Realization {
    Text(TextRealization),
    Invoke(InvokeRealization),
}

/// Whether a call is rendered to a value or streamed through a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputForm {
    Buffered,
    Streaming,
}

/// A registered operation.
#[derive(Clone)]
pub struct OperationDescriptor {
    name: String,
    arities: BTreeSet<usize>,
    realizations: FxHashMap<Backend, Realization>,
    literal_check: Option<(usize, LiteralValidator)>,
    streaming: Option<StreamingRealization>,
}

impl OperationDescriptor {
    pub fn new(name: impl Into<String>, arities: impl IntoIterator<Item = usize>) -> Self {
        Self {
            name: name.into(),
            arities: arities.into_iter().collect(),
            realizations: FxHashMap::default(),
            literal_check: None,
            streaming: None,
        }
    }

    // ── Builders ────────────────────────────────────────────────────────

    pub fn javascript<F>(self, f: F) -> Self
    where
        F: Fn(&[Expr], &TextContext) -> CodegenResult<Expr> + Send + Sync + 'static,
    {
        self.text(Backend::JavaScript, f)
    }

    pub fn python<F>(self, f: F) -> Self
    where
        F: Fn(&[Expr], &TextContext) -> CodegenResult<Expr> + Send + Sync + 'static,
    {
        self.text(Backend::Python, f)
    }

    /// Same realization for every text backend.
    pub fn text_all<F>(self, f: F) -> Self
    where
        F: Fn(&[Expr], &TextContext) -> CodegenResult<Expr> + Send + Sync + 'static,
    {
        let f: TextRealization = Arc::new(f);
        let mut this = self;
        for backend in Backend::ALL.into_iter().filter(|b| b.is_text()) {
            this.realizations.insert(backend, Realization::Text(Arc::clone(&f)));
        }
        this
    }

    pub fn bytecode<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Operand], &InvokeContext<'_>) -> CodegenResult<Invocation> + Send + Sync + 'static,
    {
        self.realizations
            .insert(Backend::Bytecode, Realization::Invoke(Arc::new(f)));
        self
    }

    pub fn streaming(mut self, f: StreamingRealization) -> Self {
        self.streaming = Some(f);
        self
    }

    /// Validate every argument from index `from` on as a literal.
    pub fn validate_literals(mut self, from: usize, validator: LiteralValidator) -> Self {
        self.literal_check = Some((from, validator));
        self
    }

    fn text<F>(mut self, backend: Backend, f: F) -> Self
    where
        F: Fn(&[Expr], &TextContext) -> CodegenResult<Expr> + Send + Sync + 'static,
    {
        self.realizations.insert(backend, Realization::Text(Arc::new(f)));
        self
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arities(&self) -> &BTreeSet<usize> {
        &self.arities
    }

    pub fn accepts_arity(&self, arity: usize) -> bool {
        self.arities.contains(&arity)
    }

    pub fn realization(&self, backend: Backend) -> Option<&Realization> {
        self.realizations.get(&backend)
    }

    /// Backends with a realization, in declaration order.
    pub fn backends(&self) -> Vec<Backend> {
        let mut backends: Vec<Backend> = self.realizations.keys().copied().collect();
        backends.sort();
        backends
    }

    pub fn has_realizations(&self) -> bool {
        !self.realizations.is_empty()
    }

    pub fn streaming_realization(&self) -> Option<StreamingRealization> {
        self.streaming
    }

    /// Streaming iff the caller already holds a sink and a streaming form exists.
    pub fn preferred_form(&self, holds_sink: bool) -> OutputForm {
        if holds_sink && self.streaming.is_some() {
            OutputForm::Streaming
        } else {
            OutputForm::Buffered
        }
    }

    // ── Call-site checks ────────────────────────────────────────────────

    pub fn check_arity(&self, arity: usize) -> CodegenResult<()> {
        if self.accepts_arity(arity) {
            Ok(())
        } else {
            Err(CodegenError::arity(&self.name, arity))
        }
    }

    pub fn check_literals<H: OperandHandle>(&self, args: &[H]) -> CodegenResult<()> {
        let Some((from, validator)) = self.literal_check else {
            return Ok(());
        };
        let texts: Vec<String> = args.iter().skip(from).map(OperandHandle::source_text).collect();
        validator(&texts)
    }
}

impl fmt::Debug for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("name", &self.name)
            .field("arities", &self.arities)
            .field("backends", &self.backends())
            .field("validates_literals", &self.literal_check.is_some())
            .field("streaming", &self.streaming.is_some())
            .finish()
    }
}
