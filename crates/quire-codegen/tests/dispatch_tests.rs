//! Call-site dispatch through the operation registry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use quire_codegen::config::CodegenConfig;
use quire_codegen::error::{CodegenError, ErrorTier};
use quire_codegen::ir::{Dialect, Expr};
use quire_codegen::plugin::builtins::method_table;
use quire_codegen::plugin::method_id;
use quire_codegen::plugin::{
    Backend, Constant, InvokeContext, Operand, OperationDescriptor, OperationRegistry, OutputForm,
    RegistryBuilder, TextContext,
};
use quire_codegen::stream::{OutputSink, StringSink};

fn registry() -> OperationRegistry {
    OperationRegistry::with_builtins().unwrap()
}

fn js() -> TextContext {
    TextContext::javascript(&CodegenConfig::default())
}

fn py() -> TextContext {
    TextContext::python(&CodegenConfig::default())
}

// ============================================================================
// Arity
// ============================================================================

#[test]
fn test_flat_one_and_two_arguments() {
    let registry = registry();
    let list = Expr::var("list");

    let one = registry.realize_text("flat", &[list.clone()], &js()).unwrap();
    assert_eq!(one.render(Dialect::JavaScript), "quire.rt.flat(list)");

    let two = registry
        .realize_text("flat", &[list.clone(), Expr::int(2)], &js())
        .unwrap();
    assert_eq!(two.render(Dialect::JavaScript), "quire.rt.flat(list, 2)");

    let py_one = registry.realize_text("flat", &[list], &py()).unwrap();
    assert_eq!(py_one.render(Dialect::Python), "quire_rt.flat(list)");
}

#[test]
fn test_unregistered_arity_fails_before_realization() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut builder = RegistryBuilder::new();
    builder
        .register(OperationDescriptor::new("counted", [1, 2]).text_all(move |args, _ctx| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Expr::array(args.to_vec()))
        }))
        .unwrap();
    let registry = builder.build();

    let x = Expr::var("x");
    registry.realize_text("counted", &[x.clone()], &js()).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let err = registry
        .realize_text("counted", &[x.clone(), x.clone(), x], &js())
        .unwrap_err();
    assert_eq!(err.to_string(), "Arity 3 not registered for operation counted");
    assert_eq!(err.tier(), ErrorTier::CallSite);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_flat_arity_checked_on_every_backend() {
    let registry = registry();
    let table = method_table().unwrap();
    let ctx = InvokeContext::new(&table);

    let err = registry.realize_invocation("flat", &[], &ctx).unwrap_err();
    assert!(matches!(err, CodegenError::ArityNotRegistered { arity: 0, .. }));

    let err = registry
        .realize_text("flat", &[Expr::var("a"), Expr::var("b"), Expr::var("c")], &py())
        .unwrap_err();
    assert!(matches!(err, CodegenError::ArityNotRegistered { arity: 3, .. }));
}

// ============================================================================
// Backends
// ============================================================================

#[test]
fn test_missing_backend_realization() {
    let registry = registry();
    let err = registry
        .realize_text("escapeHtml", &[Expr::var("v")], &py())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unknown backend requested for operation escapeHtml: python"
    );

    let ok = registry.realize_text("escapeHtml", &[Expr::var("v")], &js()).unwrap();
    assert_eq!(ok.render(Dialect::JavaScript), "quire.rt.escapeHtml(v)");
}

#[test]
fn test_bytecode_overloads_by_exact_arity() {
    let registry = registry();
    let table = method_table().unwrap();
    let ctx = InvokeContext::new(&table);

    let one = registry
        .realize_invocation("flat", &[Operand::Local(0)], &ctx)
        .unwrap();
    assert_eq!(one.method.id, method_id::LISTS_FLAT);
    assert_eq!(one.args.len(), 1);

    let two = registry
        .realize_invocation("flat", &[Operand::Local(0), Operand::int(1)], &ctx)
        .unwrap();
    assert_eq!(two.method.id, method_id::LISTS_FLAT_DEPTH);
    assert_eq!(method_id::method_name(two.method.id), "Lists.flat");
    assert_eq!(two.to_string(), "Lists.flat(l0, 1)");
}

#[test]
fn test_bytecode_composes_registered_methods() {
    let registry = registry();
    let mut table = method_table().unwrap();
    table.register_global("items", 7);
    let ctx = InvokeContext::new(&table);

    let items = ctx.lookup_global("items").unwrap();
    let length = registry.realize_invocation("length", &[items], &ctx).unwrap();
    assert_eq!(length.method.id, method_id::LIST_SIZE);
    assert_eq!(length.to_string(), "@items.size()");

    let contains = registry
        .realize_invocation("strContains", &[Operand::Local(1), Operand::string("x")], &ctx)
        .unwrap();
    assert_eq!(contains.to_string(), "Strings.contains(l1, 'x')");
}

#[test]
fn test_text_backends_do_not_share_output() {
    let registry = registry();
    let args = [Expr::var("s"), Expr::var("n")];
    let js_out = registry.realize_text("strContains", &args, &js()).unwrap();
    let py_out = registry.realize_text("strContains", &args, &py()).unwrap();
    assert_eq!(js_out.render(Dialect::JavaScript), "('' + s).indexOf(n) !== -1");
    assert_eq!(py_out.render(Dialect::Python), "n in str(s)");
}

#[test]
fn test_text_context_rejects_bytecode() {
    let err = TextContext::new(Backend::Bytecode, &CodegenConfig::default()).unwrap_err();
    assert!(matches!(err, CodegenError::NotATextBackend { .. }));
}

// ============================================================================
// Literal Validation
// ============================================================================

#[test]
fn test_clean_html_rejects_unknown_tag() {
    let registry = registry();
    let args = [Expr::var("v"), Expr::string("span"), Expr::string("notatag")];

    let err = registry.realize_text("cleanHtml", &args, &js()).unwrap_err();
    assert!(matches!(
        err,
        CodegenError::UnrecognizedAllowListEntry { ref name } if name == "notatag"
    ));
    assert!(err.to_string().contains("notatag"));
}

#[test]
fn test_clean_html_rejects_unknown_tag_on_bytecode() {
    let registry = registry();
    let table = method_table().unwrap();
    let ctx = InvokeContext::new(&table);
    let args = [Operand::Local(0), Operand::string("span"), Operand::string("notatag")];

    let err = registry.realize_invocation("cleanHtml", &args, &ctx).unwrap_err();
    assert!(err.to_string().contains("notatag"));
}

#[test]
fn test_clean_html_malformed_literals() {
    let registry = registry();
    for bad in ["'sp'an'", "''", "span", "'span\""] {
        let args = [Expr::var("v"), Expr::var(bad)];
        let err = registry.realize_text("cleanHtml", &args, &js()).unwrap_err();
        assert_eq!(err.to_string(), format!("Malformed literal argument: `{}`", bad));
    }

    let err = registry
        .realize_text("cleanHtml", &[Expr::var("v"), Expr::string("")], &js())
        .unwrap_err();
    assert!(matches!(err, CodegenError::MalformedLiteral { .. }));
}

#[test]
fn test_clean_html_accepts_allow_list() {
    let registry = registry();
    let args = [
        Expr::var("v"),
        Expr::string("hr"),
        Expr::string("li"),
        Expr::string("ol"),
        Expr::string("span"),
        Expr::string("ul"),
    ];
    let out = registry.realize_text("cleanHtml", &args, &py()).unwrap();
    assert_eq!(
        out.render(Dialect::Python),
        "quire_rt.clean_html(v, ['hr', 'li', 'ol', 'span', 'ul'])"
    );

    let table = method_table().unwrap();
    let ctx = InvokeContext::new(&table);
    let inv = registry
        .realize_invocation("cleanHtml", &[Operand::Local(2), Operand::string("ul")], &ctx)
        .unwrap();
    assert_eq!(
        inv.args[1],
        Operand::Constant(Constant::StrList(vec!["ul".to_string()]))
    );
}

#[test]
fn test_clean_html_arity_limit() {
    let registry = registry();
    let mut args = vec![Expr::var("v")];
    args.extend(std::iter::repeat(Expr::string("li")).take(6));
    let err = registry.realize_text("cleanHtml", &args, &js()).unwrap_err();
    assert!(matches!(err, CodegenError::ArityNotRegistered { arity: 7, .. }));
}

// ============================================================================
// Assembly
// ============================================================================

#[test]
fn test_builtins_cannot_be_registered_twice() {
    let mut builder = RegistryBuilder::new();
    quire_codegen::plugin::builtins::register_all(&mut builder).unwrap();
    let err = quire_codegen::plugin::builtins::register_all(&mut builder).unwrap_err();
    assert!(matches!(err, CodegenError::DuplicateOperation { .. }));
    assert_eq!(err.tier(), ErrorTier::Assembly);
}

#[test]
fn test_registry_shared_across_threads() {
    let registry = Arc::new(registry());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                let ctx = TextContext::javascript(&CodegenConfig::default());
                let out = registry
                    .realize_text("max", &[Expr::var("a"), Expr::int(i)], &ctx)
                    .unwrap();
                out.render(Dialect::JavaScript)
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("Math.max(a, {})", i));
    }
}

// ============================================================================
// Output Form
// ============================================================================

#[test]
fn test_streaming_form_selection() {
    let registry = registry();
    assert_eq!(registry.preferred_form("escapeHtml", true), OutputForm::Streaming);
    assert_eq!(registry.preferred_form("escapeHtml", false), OutputForm::Buffered);
    assert_eq!(registry.preferred_form("cleanHtml", true), OutputForm::Buffered);
}

#[test]
fn test_open_stream_escapes_through_sink() {
    let registry = registry();
    let mut out = StringSink::new();
    let mut wrapped = registry
        .open_stream("escapeHtml", Box::new(&mut out), &[])
        .unwrap();
    wrapped.sink.append_str("<a href=\"x\">").unwrap();
    wrapped.sink.append_char('&').unwrap();
    wrapped.finish().unwrap();
    assert_eq!(out.as_str(), "&lt;a href=&quot;x&quot;&gt;&amp;");
}

#[test]
fn test_open_stream_errors() {
    let registry = registry();
    let mut out = StringSink::new();

    let err = registry
        .open_stream("flat", Box::new(&mut out), &[])
        .err()
        .unwrap();
    assert!(matches!(err, CodegenError::NoStreamingForm { .. }));

    let err = registry
        .open_stream("escapeHtml", Box::new(&mut out), &["'x'".to_string()])
        .err()
        .unwrap();
    assert!(matches!(err, CodegenError::ArityNotRegistered { arity: 2, .. }));
}
