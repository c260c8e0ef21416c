//! Variable references.

use classgen_core::{CompilationError, Span, SymbolHash, ValueType};
use classgen_registry::ScopeKind;

use super::{ExprCompiler, Result, resolve_as};
use crate::bytecode::{Address, Instruction, Location};

/// Where a variable lives and what it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub location: Location,
    pub value_type: ValueType,
}

/// Resolve `name` to a storage location.
pub(super) fn resolve_variable(
    compiler: &ExprCompiler<'_, '_>,
    name: &str,
    span: Span,
) -> Result<Resolved> {
    if let Some(local) = compiler.locals.get(name) {
        return Ok(Resolved {
            location: Location::Register(local.slot),
            value_type: local.value_type,
        });
    }

    let found = resolve_as(compiler.chain, name, "a variable", span, |found| {
        found.scope != ScopeKind::Methods && found.symbol.as_variable().is_some()
    })?;
    let value_type = found.symbol.value_type().ok_or_else(|| {
        CompilationError::type_mismatch(format!("'{}' is not a variable", name), span)
    })?;

    let location = match found.scope {
        ScopeKind::Params => Location::Register(found.position as u32),
        ScopeKind::Members => Location::Memory(Address::Field(found.position as u32)),
        ScopeKind::Globals => Location::Memory(Address::Global(SymbolHash::from_global(name))),
        ScopeKind::Methods => {
            return Err(CompilationError::type_mismatch(
                format!("'{}' is declared in a method table, not as a variable", name),
                span,
            ));
        }
    };

    Ok(Resolved {
        location,
        value_type,
    })
}

/// Emit a load of `name`.
pub(super) fn compile_variable(
    compiler: &mut ExprCompiler<'_, '_>,
    name: &str,
    span: Span,
) -> Result<ValueType> {
    let resolved = resolve_variable(compiler, name, span)?;
    let load = match resolved.location {
        Location::Register(slot) => Instruction::Register(slot),
        Location::Memory(address) => Instruction::Memory(address),
    };
    compiler.emitter.emit(load);
    Ok(resolved.value_type)
}
