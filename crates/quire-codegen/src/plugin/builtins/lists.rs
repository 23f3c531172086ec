//! List operations: `flat`, `length`

use crate::error::CodegenResult;
use crate::ir::{wrap_in_call, Dialect, Expr};
use crate::plugin::descriptor::OperationDescriptor;
use crate::plugin::invoke::{InvokeContext, Invocation, MethodRef, Operand};
use crate::plugin::method_id;
use crate::plugin::registry::RegistryBuilder;
use crate::plugin::text::TextContext;

use super::wrong_arity;

pub(super) const METHODS: &[MethodRef] = &[
    MethodRef::new_static(method_id::LISTS_FLAT, "Lists", "flat", 1),
    MethodRef::new_static(method_id::LISTS_FLAT_DEPTH, "Lists", "flat", 2),
    MethodRef::new_instance(method_id::LIST_SIZE, "List", "size", 0),
];

pub(super) fn register(builder: &mut RegistryBuilder) -> CodegenResult<()> {
    builder.register(
        OperationDescriptor::new("flat", [1, 2])
            .text_all(flat_text)
            .bytecode(flat_invoke),
    )?;
    builder.register(
        OperationDescriptor::new("length", [1])
            .text_all(length_text)
            .bytecode(length_invoke),
    )?;
    Ok(())
}

/// `rt.flat(list)` or `rt.flat(list, depth)`. The depth is never defaulted.
fn flat_text(args: &[Expr], ctx: &TextContext) -> CodegenResult<Expr> {
    match args {
        [_] | [_, _] => Ok(ctx.call_helper("flat", args.to_vec())),
        _ => Err(wrong_arity("flat", args)),
    }
}

fn flat_invoke(args: &[Operand], ctx: &InvokeContext<'_>) -> CodegenResult<Invocation> {
    ctx.invoke_static("Lists", "flat", args.to_vec())
}

fn length_text(args: &[Expr], ctx: &TextContext) -> CodegenResult<Expr> {
    let [list] = args else {
        return Err(wrong_arity("length", args));
    };
    Ok(match ctx.dialect() {
        Dialect::JavaScript => Expr::member(list.clone(), "length"),
        Dialect::Python => wrap_in_call("len", list.clone()),
    })
}

fn length_invoke(args: &[Operand], ctx: &InvokeContext<'_>) -> CodegenResult<Invocation> {
    let [list] = args else {
        return Err(wrong_arity("length", args));
    };
    ctx.invoke_method(list.clone(), "List", "size", Vec::new())
}
