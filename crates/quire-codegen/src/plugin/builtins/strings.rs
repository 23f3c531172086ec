//! String operations: `strContains`

use crate::error::CodegenResult;
use crate::ir::{BinaryOp, Dialect, Expr};
use crate::plugin::descriptor::OperationDescriptor;
use crate::plugin::invoke::{InvokeContext, Invocation, MethodRef, Operand};
use crate::plugin::method_id;
use crate::plugin::registry::RegistryBuilder;
use crate::plugin::text::TextContext;

use super::wrong_arity;

pub(super) const METHODS: &[MethodRef] = &[MethodRef::new_static(
    method_id::STRINGS_CONTAINS,
    "Strings",
    "contains",
    2,
)];

pub(super) fn register(builder: &mut RegistryBuilder) -> CodegenResult<()> {
    builder.register(
        OperationDescriptor::new("strContains", [2])
            .text_all(contains_text)
            .bytecode(contains_invoke),
    )
}

/// The haystack is coerced to a string first; the needle is used as is.
fn contains_text(args: &[Expr], ctx: &TextContext) -> CodegenResult<Expr> {
    let [haystack, needle] = args else {
        return Err(wrong_arity("strContains", args));
    };
    let haystack = ctx.coerce_to_string(haystack);
    Ok(match ctx.dialect() {
        Dialect::JavaScript => Expr::binary(
            BinaryOp::NotEqual,
            ctx.method_call(&haystack, "indexOf", vec![needle.clone()]),
            Expr::int(-1),
        ),
        Dialect::Python => Expr::binary(BinaryOp::In, needle.clone(), haystack),
    })
}

fn contains_invoke(args: &[Operand], ctx: &InvokeContext<'_>) -> CodegenResult<Invocation> {
    ctx.invoke_static("Strings", "contains", args.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodegenConfig;

    #[test]
    fn test_contains_text() {
        let config = CodegenConfig::default();
        let args = [Expr::var("s"), Expr::string("x")];

        let js = contains_text(&args, &TextContext::javascript(&config)).unwrap();
        assert_eq!(js.render(Dialect::JavaScript), "('' + s).indexOf('x') !== -1");

        let py = contains_text(&args, &TextContext::python(&config)).unwrap();
        assert_eq!(py.render(Dialect::Python), "'x' in str(s)");
    }

    #[test]
    fn test_literal_haystack_not_coerced() {
        let js = TextContext::javascript(&CodegenConfig::default());
        let out = contains_text(&[Expr::string("abc"), Expr::var("n")], &js).unwrap();
        assert_eq!(out.render(Dialect::JavaScript), "'abc'.indexOf(n) !== -1");
    }
}
