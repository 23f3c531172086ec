//! HTML operations: `escapeHtml`, `cleanHtml`
//!
//! `escapeHtml` has a streaming form and no Python realization.
//! `cleanHtml` takes up to five extra tag names that must be quoted
//! literals naming entries of [`SAFE_TAGS`].

use crate::error::CodegenResult;
use crate::ir::{wrap_in_call, Dialect, Expr};
use crate::plugin::descriptor::{OperandHandle, OperationDescriptor};
use crate::plugin::invoke::{Constant, InvokeContext, Invocation, MethodRef, Operand};
use crate::plugin::literal::AllowList;
use crate::plugin::method_id;
use crate::plugin::registry::RegistryBuilder;
use crate::plugin::text::TextContext;
use crate::stream::{DisposalOptions, EscapeHtmlSink, OutputSink, SinkAndOptions};

use super::wrong_arity;

/// Tags `cleanHtml` may be asked to keep beyond its default set.
pub const SAFE_TAGS: AllowList = AllowList::new(&["hr", "li", "ol", "span", "ul"]);

/// The value plus at most one extra argument per safe tag.
const CLEAN_HTML_ARITIES: std::ops::RangeInclusive<usize> = 1..=6;

pub(super) const METHODS: &[MethodRef] = &[
    MethodRef::new_static(method_id::SANITIZERS_ESCAPE_HTML, "Sanitizers", "escapeHtml", 1),
    MethodRef::new_static(method_id::SANITIZERS_CLEAN_HTML, "Sanitizers", "cleanHtml", 1),
    MethodRef::new_static(method_id::SANITIZERS_CLEAN_HTML_TAGS, "Sanitizers", "cleanHtml", 2),
];

pub(super) fn register(builder: &mut RegistryBuilder) -> CodegenResult<()> {
    builder.register(
        OperationDescriptor::new("escapeHtml", [1])
            .javascript(escape_html_js)
            .bytecode(escape_html_invoke)
            .streaming(escape_html_stream),
    )?;
    builder.register(
        OperationDescriptor::new("cleanHtml", CLEAN_HTML_ARITIES)
            .text_all(clean_html_text)
            .bytecode(clean_html_invoke)
            .validate_literals(1, validate_tags),
    )?;
    Ok(())
}

// ── escapeHtml ──────────────────────────────────────────────────────────

fn escape_html_js(args: &[Expr], ctx: &TextContext) -> CodegenResult<Expr> {
    let [value] = args else {
        return Err(wrong_arity("escapeHtml", args));
    };
    Ok(ctx.call_helper("escapeHtml", vec![value.clone()]))
}

fn escape_html_invoke(args: &[Operand], ctx: &InvokeContext<'_>) -> CodegenResult<Invocation> {
    ctx.invoke_static("Sanitizers", "escapeHtml", args.to_vec())
}

fn escape_html_stream<'a>(
    sink: Box<dyn OutputSink + 'a>,
    _args: &[String],
) -> CodegenResult<SinkAndOptions<'a>> {
    Ok(SinkAndOptions {
        sink: Box::new(EscapeHtmlSink::new(sink)),
        options: DisposalOptions::default(),
    })
}

// ── cleanHtml ───────────────────────────────────────────────────────────

fn validate_tags(texts: &[String]) -> CodegenResult<()> {
    SAFE_TAGS.resolve_all(texts).map(|_| ())
}

/// Tag names from the arguments after the value.
fn extra_tags<H: OperandHandle>(args: &[H]) -> CodegenResult<Vec<&'static str>> {
    let texts: Vec<String> = args.iter().skip(1).map(OperandHandle::source_text).collect();
    SAFE_TAGS.resolve_all(&texts)
}

/// `rt.cleanHtml(value)`, or `rt.cleanHtml(value, ['tag', ...])` when
/// extra tags are allowed.
fn clean_html_text(args: &[Expr], ctx: &TextContext) -> CodegenResult<Expr> {
    let Some(value) = args.first() else {
        return Err(wrong_arity("cleanHtml", args));
    };
    let helper = match ctx.dialect() {
        Dialect::JavaScript => "cleanHtml",
        Dialect::Python => "clean_html",
    };
    let tags = extra_tags(args)?;
    if tags.is_empty() {
        let callee = format!("{}.{}", ctx.helper_namespace(), helper);
        return Ok(wrap_in_call(&callee, value.clone()));
    }
    let tags = Expr::array(tags.into_iter().map(Expr::string).collect());
    Ok(ctx.call_helper(helper, vec![value.clone(), tags]))
}

fn clean_html_invoke(args: &[Operand], ctx: &InvokeContext<'_>) -> CodegenResult<Invocation> {
    let Some(value) = args.first() else {
        return Err(wrong_arity("cleanHtml", args));
    };
    let tags = extra_tags(args)?;
    let mut operands = vec![value.clone()];
    if !tags.is_empty() {
        let tags = tags.into_iter().map(str::to_string).collect();
        operands.push(Operand::Constant(Constant::StrList(tags)));
    }
    ctx.invoke_static("Sanitizers", "cleanHtml", operands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodegenConfig;
    use crate::error::CodegenError;
    use crate::plugin::builtins::method_table;
    use crate::stream::StringSink;

    #[test]
    fn test_clean_html_text() {
        let config = CodegenConfig::default();
        let js = TextContext::javascript(&config);
        let plain = clean_html_text(&[Expr::var("v")], &js).unwrap();
        assert_eq!(plain.render(Dialect::JavaScript), "quire.rt.cleanHtml(v)");

        let args = [Expr::var("v"), Expr::string("span"), Expr::string("ul")];
        let tagged = clean_html_text(&args, &js).unwrap();
        assert_eq!(tagged.render(Dialect::JavaScript), "quire.rt.cleanHtml(v, ['span', 'ul'])");

        let py = TextContext::python(&config);
        let tagged = clean_html_text(&args, &py).unwrap();
        assert_eq!(tagged.render(Dialect::Python), "quire_rt.clean_html(v, ['span', 'ul'])");
    }

    #[test]
    fn test_clean_html_invoke_selects_overload() {
        let table = method_table().unwrap();
        let ctx = InvokeContext::new(&table);
        let plain = clean_html_invoke(&[Operand::Local(0)], &ctx).unwrap();
        assert_eq!(plain.method.id, method_id::SANITIZERS_CLEAN_HTML);

        let tagged = clean_html_invoke(&[Operand::Local(0), Operand::string("li")], &ctx).unwrap();
        assert_eq!(tagged.method.id, method_id::SANITIZERS_CLEAN_HTML_TAGS);
        assert_eq!(tagged.to_string(), "Sanitizers.cleanHtml(l0, ['li'])");
    }

    #[test]
    fn test_validate_tags() {
        assert!(validate_tags(&["'hr'".to_string(), "\"ol\"".to_string()]).is_ok());
        let err = validate_tags(&["'b'".to_string()]).unwrap_err();
        assert!(matches!(err, CodegenError::UnrecognizedAllowListEntry { ref name } if name == "b"));
    }

    #[test]
    fn test_escape_html_stream() {
        let mut out = StringSink::new();
        let mut wrapped = escape_html_stream(Box::new(&mut out), &[]).unwrap();
        wrapped.sink.append_str("<b>").unwrap();
        wrapped.finish().unwrap();
        assert_eq!(out.as_str(), "&lt;b&gt;");
    }
}
