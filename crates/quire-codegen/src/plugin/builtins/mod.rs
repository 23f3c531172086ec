//! Built-in operations
//!
//! Every operation the compiler ships with, grouped by domain. Each group
//! registers its operations and lists the runtime methods its bytecode
//! realizations invoke.

pub mod html;
pub mod lists;
pub mod math;
pub mod strings;

use crate::error::{CodegenError, CodegenResult};

use super::invoke::{MethodRef, MethodTable};
use super::registry::RegistryBuilder;

/// Register every built-in operation.
pub fn register_all(builder: &mut RegistryBuilder) -> CodegenResult<()> {
    lists::register(builder)?;
    math::register(builder)?;
    strings::register(builder)?;
    html::register(builder)?;
    Ok(())
}

/// Runtime methods backing the built-in bytecode realizations.
pub fn method_table() -> CodegenResult<MethodTable> {
    let mut table = MethodTable::new();
    let groups: [&[MethodRef]; 4] = [lists::METHODS, math::METHODS, strings::METHODS, html::METHODS];
    for method in groups.into_iter().flatten() {
        table.register(*method)?;
    }
    Ok(table)
}

/// Arity error for a realization handed the wrong number of operands.
pub(crate) fn wrong_arity<H>(operation: &str, args: &[H]) -> CodegenError {
    CodegenError::arity(operation, args.len())
}
