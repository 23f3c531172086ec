//! Numeric operations: `max`, `min`, `round`

use crate::error::CodegenResult;
use crate::ir::{Dialect, Expr};
use crate::plugin::descriptor::OperationDescriptor;
use crate::plugin::invoke::{InvokeContext, Invocation, MethodRef, Operand};
use crate::plugin::method_id;
use crate::plugin::registry::RegistryBuilder;
use crate::plugin::text::TextContext;

use super::wrong_arity;

pub(super) const METHODS: &[MethodRef] = &[
    MethodRef::new_static(method_id::MATH_MAX, "Math", "max", 2),
    MethodRef::new_static(method_id::MATH_MIN, "Math", "min", 2),
    MethodRef::new_static(method_id::MATH_ROUND, "Math", "round", 1),
    MethodRef::new_static(method_id::MATH_ROUND_DIGITS, "Math", "round", 2),
];

pub(super) fn register(builder: &mut RegistryBuilder) -> CodegenResult<()> {
    builder.register(
        OperationDescriptor::new("max", [2])
            .text_all(|args, ctx| extremum("max", args, ctx))
            .bytecode(|args, ctx| ctx.invoke_static("Math", "max", args.to_vec())),
    )?;
    builder.register(
        OperationDescriptor::new("min", [2])
            .text_all(|args, ctx| extremum("min", args, ctx))
            .bytecode(|args, ctx| ctx.invoke_static("Math", "min", args.to_vec())),
    )?;
    builder.register(
        OperationDescriptor::new("round", [1, 2])
            .text_all(round_text)
            .bytecode(round_invoke),
    )?;
    Ok(())
}

/// `Math.max(a, b)` in JavaScript, the `max(a, b)` builtin in Python.
fn extremum(name: &str, args: &[Expr], ctx: &TextContext) -> CodegenResult<Expr> {
    let [a, b] = args else {
        return Err(wrong_arity(name, args));
    };
    let callee = match ctx.dialect() {
        Dialect::JavaScript => format!("Math.{}", name),
        Dialect::Python => name.to_string(),
    };
    Ok(ctx.call_global(&callee, vec![a.clone(), b.clone()]))
}

/// Rounding to an integer uses the language's own round; rounding to a
/// number of digits goes through the runtime helper.
fn round_text(args: &[Expr], ctx: &TextContext) -> CodegenResult<Expr> {
    match (args, ctx.dialect()) {
        ([value], Dialect::JavaScript) => Ok(ctx.call_global("Math.round", vec![value.clone()])),
        ([value], Dialect::Python) => Ok(ctx.call_global("round", vec![value.clone()])),
        ([_, _], _) => Ok(ctx.call_helper("round", args.to_vec())),
        _ => Err(wrong_arity("round", args)),
    }
}

fn round_invoke(args: &[Operand], ctx: &InvokeContext<'_>) -> CodegenResult<Invocation> {
    ctx.invoke_static("Math", "round", args.to_vec())
}
