//! Operation registry
//!
//! Operations are registered once while the pipeline is assembled, through
//! a [`RegistryBuilder`]. The built [`OperationRegistry`] is immutable and
//! may be shared by concurrent renders without locking.
//!
//! Dispatch of one call site checks, in order: the operation exists, the
//! argument count is registered, the backend has a realization, literal
//! arguments are valid. Only then does backend code run.

use rustc_hash::FxHashMap;

use crate::error::{CodegenError, CodegenResult};
use crate::ir::Expr;
use crate::stream::{OutputSink, SinkAndOptions};

use super::backend::Backend;
use super::builtins;
use super::descriptor::{OperandHandle, OperationDescriptor, OutputForm, Realization};
use super::invoke::{InvokeContext, Invocation, Operand};
use super::method_id;
use super::text::TextContext;

/// Collects operations during pipeline assembly.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    operations: FxHashMap<String, OperationDescriptor>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one operation. Rejects duplicate names, an empty arity set and
    /// an empty realization table.
    pub fn register(&mut self, descriptor: OperationDescriptor) -> CodegenResult<()> {
        let name = descriptor.name().to_string();
        if descriptor.arities().is_empty() {
            return Err(CodegenError::NoArities { name });
        }
        if !descriptor.has_realizations() {
            return Err(CodegenError::EmptyRealizationTable { name });
        }
        if self.operations.contains_key(&name) {
            return Err(CodegenError::DuplicateOperation { name });
        }

        tracing::debug!(
            operation = %name,
            arities = ?descriptor.arities(),
            backends = ?descriptor.backends(),
            "registered operation"
        );
        self.operations.insert(name, descriptor);
        Ok(())
    }

    pub fn build(self) -> OperationRegistry {
        OperationRegistry {
            operations: self.operations,
        }
    }
}

/// Immutable table of operations.
#[derive(Debug)]
pub struct OperationRegistry {
    operations: FxHashMap<String, OperationDescriptor>,
}

impl OperationRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registry holding the built-in operations.
    pub fn with_builtins() -> CodegenResult<Self> {
        let mut builder = RegistryBuilder::new();
        builtins::register_all(&mut builder)?;
        Ok(builder.build())
    }

    pub fn get(&self, name: &str) -> Option<&OperationDescriptor> {
        self.operations.get(name)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Registered operation names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Realize `name(args...)` for the text backend of `ctx`.
    pub fn realize_text(&self, name: &str, args: &[Expr], ctx: &TextContext) -> CodegenResult<Expr> {
        let realization = self.resolve(name, args, ctx.backend())?;
        match realization {
            Realization::Text(f) => {
                tracing::debug!(operation = name, backend = %ctx.backend(), arity = args.len(), "realizing call");
                (**f)(args, ctx)
            }
            Realization::Invoke(_) => Err(unknown_backend(name, ctx.backend())),
        }
    }

    /// Realize `name(args...)` as a bytecode invocation.
    pub fn realize_invocation(
        &self,
        name: &str,
        args: &[Operand],
        ctx: &InvokeContext<'_>,
    ) -> CodegenResult<Invocation> {
        let realization = self.resolve(name, args, Backend::Bytecode)?;
        match realization {
            Realization::Invoke(f) => {
                let invocation = (**f)(args, ctx)?;
                tracing::debug!(
                    operation = name,
                    backend = %Backend::Bytecode,
                    method = method_id::method_name(invocation.method.id),
                    arity = args.len(),
                    "realized call"
                );
                Ok(invocation)
            }
            Realization::Text(_) => Err(unknown_backend(name, Backend::Bytecode)),
        }
    }

    /// Wrap `sink` in the streaming form of `name`.
    ///
    /// The value being streamed counts as the first argument; `args` are
    /// the source text of the rest.
    pub fn open_stream<'a>(
        &self,
        name: &str,
        sink: Box<dyn OutputSink + 'a>,
        args: &[String],
    ) -> CodegenResult<SinkAndOptions<'a>> {
        let op = self.operation(name)?;
        reject_on_err(name, op.check_arity(args.len() + 1))?;
        let open = op
            .streaming_realization()
            .ok_or_else(|| CodegenError::NoStreamingForm {
                name: name.to_string(),
            })?;
        reject_on_err(name, op.check_literals(args))?;
        tracing::debug!(operation = name, "opening streaming form");
        open(sink, args)
    }

    /// See [`OperationDescriptor::preferred_form`]. Unknown operations are
    /// always buffered.
    pub fn preferred_form(&self, name: &str, holds_sink: bool) -> OutputForm {
        self.get(name)
            .map(|op| op.preferred_form(holds_sink))
            .unwrap_or(OutputForm::Buffered)
    }

    fn operation(&self, name: &str) -> CodegenResult<&OperationDescriptor> {
        let op = self.get(name).ok_or_else(|| CodegenError::UnknownOperation {
            name: name.to_string(),
        });
        reject_on_err(name, op)
    }

    fn resolve<H: OperandHandle>(&self, name: &str, args: &[H], backend: Backend) -> CodegenResult<&Realization> {
        let op = self.operation(name)?;
        reject_on_err(name, op.check_arity(args.len()))?;
        let realization = op
            .realization(backend)
            .ok_or_else(|| unknown_backend(name, backend));
        let realization = reject_on_err(name, realization)?;
        reject_on_err(name, op.check_literals(args))?;
        Ok(realization)
    }
}

fn unknown_backend(operation: &str, backend: Backend) -> CodegenError {
    CodegenError::UnknownBackend {
        operation: operation.to_string(),
        backend,
    }
}

fn reject_on_err<T>(operation: &str, result: CodegenResult<T>) -> CodegenResult<T> {
    if let Err(err) = &result {
        tracing::warn!(operation, error = %err, "call rejected");
    }
    result
}
