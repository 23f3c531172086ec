//! Invocation backend
//!
//! The bytecode backend does not build text. A realization composes
//! invocations of methods registered up front in a [`MethodTable`], each
//! identified by a stable method ID the runtime dispatches on.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::{CodegenError, CodegenResult};
use crate::ir::dialect::quote;

/// Whether a method takes a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Static,
    Instance,
}

/// A pre-registered runtime method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub id: u16,
    pub owner: &'static str,
    pub name: &'static str,
    /// Argument count, not counting the receiver
    pub arity: usize,
    pub kind: MethodKind,
}

impl MethodRef {
    pub const fn new_static(id: u16, owner: &'static str, name: &'static str, arity: usize) -> Self {
        Self {
            id,
            owner,
            name,
            arity,
            kind: MethodKind::Static,
        }
    }

    pub const fn new_instance(id: u16, owner: &'static str, name: &'static str, arity: usize) -> Self {
        Self {
            id,
            owner,
            name,
            arity,
            kind: MethodKind::Instance,
        }
    }
}

/// Constant operand values
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    StrList(Vec<String>),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Str(s) => write!(f, "{}", quote(s)),
            Constant::Int(v) => write!(f, "{}", v),
            Constant::Float(v) => write!(f, "{:?}", v),
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::Null => write!(f, "null"),
            Constant::StrList(items) => {
                let quoted: Vec<String> = items.iter().map(|s| quote(s)).collect();
                write!(f, "[{}]", quoted.join(", "))
            }
        }
    }
}

/// An already-lowered value handed to a bytecode realization.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Local variable slot
    Local(u16),
    /// Global slot, resolved by name
    Global { name: String, slot: u16 },
    Constant(Constant),
    /// The result of another invocation
    Result(Box<Invocation>),
}

impl Operand {
    pub fn string(s: impl Into<String>) -> Self {
        Operand::Constant(Constant::Str(s.into()))
    }

    pub fn int(v: i64) -> Self {
        Operand::Constant(Constant::Int(v))
    }

    /// The string value, if this is a string constant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Operand::Constant(Constant::Str(s)) => Some(s),
            _ => None,
        }
    }
}

impl From<Invocation> for Operand {
    fn from(invocation: Invocation) -> Self {
        Operand::Result(Box::new(invocation))
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Local(index) => write!(f, "l{}", index),
            Operand::Global { name, .. } => write!(f, "@{}", name),
            Operand::Constant(c) => write!(f, "{}", c),
            Operand::Result(inv) => write!(f, "{}", inv),
        }
    }
}

/// A call of one registered method with ordered arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub method: MethodRef,
    pub receiver: Option<Box<Operand>>,
    pub args: Vec<Operand>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.receiver {
            Some(receiver) => write!(f, "{}.{}(", receiver, self.method.name)?,
            None => write!(f, "{}.{}(", self.method.owner, self.method.name)?,
        }
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

// ============================================================================
// Method Table
// ============================================================================

/// Registered methods, keyed by `(owner, name)` with one overload per arity.
#[derive(Debug, Default)]
pub struct MethodTable {
    overloads: FxHashMap<(&'static str, &'static str), FxHashMap<usize, MethodRef>>,
    globals: FxHashMap<String, u16>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one overload. A second overload with the same arity is an error.
    pub fn register(&mut self, method: MethodRef) -> CodegenResult<()> {
        let by_arity = self.overloads.entry((method.owner, method.name)).or_default();
        if by_arity.contains_key(&method.arity) {
            return Err(CodegenError::DuplicateMethod {
                owner: method.owner.to_string(),
                name: method.name.to_string(),
                arity: method.arity,
            });
        }
        by_arity.insert(method.arity, method);
        Ok(())
    }

    pub fn register_global(&mut self, name: impl Into<String>, slot: u16) {
        self.globals.insert(name.into(), slot);
    }

    /// The overload of `owner.name` taking exactly `arity` arguments.
    pub fn lookup(&self, owner: &str, name: &str, arity: usize) -> CodegenResult<MethodRef> {
        self.overloads
            .get(&(owner, name))
            .and_then(|by_arity| by_arity.get(&arity))
            .copied()
            .ok_or_else(|| CodegenError::NoOverload {
                owner: owner.to_string(),
                name: name.to_string(),
                arity,
            })
    }

    /// Registered arities of `owner.name`, ascending.
    pub fn overload_arities(&self, owner: &str, name: &str) -> Vec<usize> {
        let mut arities: Vec<usize> = self
            .overloads
            .get(&(owner, name))
            .map(|by_arity| by_arity.keys().copied().collect())
            .unwrap_or_default();
        arities.sort_unstable();
        arities
    }

    pub fn global_slot(&self, name: &str) -> Option<u16> {
        self.globals.get(name).copied()
    }
}

/// Capabilities the bytecode backend offers a realization.
pub struct InvokeContext<'a> {
    methods: &'a MethodTable,
}

impl<'a> InvokeContext<'a> {
    pub fn new(methods: &'a MethodTable) -> Self {
        Self { methods }
    }

    /// `owner.name(args...)`, choosing the overload whose arity matches exactly.
    pub fn invoke_static(&self, owner: &str, name: &str, args: Vec<Operand>) -> CodegenResult<Invocation> {
        let method = self.select(owner, name, args.len(), MethodKind::Static)?;
        Ok(Invocation {
            method,
            receiver: None,
            args,
        })
    }

    /// `receiver.name(args...)` for an instance method of `owner`.
    pub fn invoke_method(
        &self,
        receiver: Operand,
        owner: &str,
        name: &str,
        args: Vec<Operand>,
    ) -> CodegenResult<Invocation> {
        let method = self.select(owner, name, args.len(), MethodKind::Instance)?;
        Ok(Invocation {
            method,
            receiver: Some(Box::new(receiver)),
            args,
        })
    }

    /// A registered global, as an operand.
    pub fn lookup_global(&self, name: &str) -> CodegenResult<Operand> {
        let slot = self
            .methods
            .global_slot(name)
            .ok_or_else(|| CodegenError::UnknownGlobal {
                name: name.to_string(),
            })?;
        Ok(Operand::Global {
            name: name.to_string(),
            slot,
        })
    }

    fn select(&self, owner: &str, name: &str, arity: usize, kind: MethodKind) -> CodegenResult<MethodRef> {
        let method = self.methods.lookup(owner, name, arity)?;
        if method.kind != kind {
            return Err(CodegenError::NoOverload {
                owner: owner.to_string(),
                name: name.to_string(),
                arity,
            });
        }
        Ok(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> MethodTable {
        let mut t = MethodTable::new();
        t.register(MethodRef::new_static(1, "Lists", "flat", 1)).unwrap();
        t.register(MethodRef::new_static(2, "Lists", "flat", 2)).unwrap();
        t.register(MethodRef::new_instance(3, "List", "size", 0)).unwrap();
        t.register_global("ij", 4);
        t
    }

    #[test]
    fn test_overload_by_exact_arity() {
        let t = table();
        let ctx = InvokeContext::new(&t);
        let one = ctx.invoke_static("Lists", "flat", vec![Operand::Local(0)]).unwrap();
        assert_eq!(one.method.id, 1);
        let two = ctx
            .invoke_static("Lists", "flat", vec![Operand::Local(0), Operand::int(2)])
            .unwrap();
        assert_eq!(two.method.id, 2);
        assert_eq!(two.to_string(), "Lists.flat(l0, 2)");

        let err = ctx.invoke_static("Lists", "flat", vec![]).unwrap_err();
        assert!(matches!(err, CodegenError::NoOverload { arity: 0, .. }));
        assert_eq!(t.overload_arities("Lists", "flat"), vec![1, 2]);
    }

    #[test]
    fn test_duplicate_overload_rejected() {
        let mut t = table();
        let err = t.register(MethodRef::new_static(9, "Lists", "flat", 2)).unwrap_err();
        assert!(matches!(err, CodegenError::DuplicateMethod { arity: 2, .. }));
    }

    #[test]
    fn test_instance_and_static_do_not_mix() {
        let t = table();
        let ctx = InvokeContext::new(&t);
        let size = ctx.invoke_method(Operand::Local(1), "List", "size", vec![]).unwrap();
        assert_eq!(size.to_string(), "l1.size()");
        assert!(ctx.invoke_static("List", "size", vec![]).is_err());
    }

    #[test]
    fn test_globals_and_nesting() {
        let t = table();
        let ctx = InvokeContext::new(&t);
        let ij = ctx.lookup_global("ij").unwrap();
        assert_eq!(ij, Operand::Global { name: "ij".into(), slot: 4 });
        assert!(matches!(ctx.lookup_global("nope"), Err(CodegenError::UnknownGlobal { .. })));

        let inner = ctx.invoke_static("Lists", "flat", vec![ij]).unwrap();
        let outer = ctx.invoke_method(inner.into(), "List", "size", vec![]).unwrap();
        assert_eq!(outer.to_string(), "Lists.flat(@ij).size()");
    }

    #[test]
    fn test_constant_display() {
        assert_eq!(Operand::string("it's").to_string(), r"'it\'s'");
        assert_eq!(
            Constant::StrList(vec!["b".into(), "span".into()]).to_string(),
            "['b', 'span']"
        );
        assert_eq!(Constant::Null.to_string(), "null");
    }
}
