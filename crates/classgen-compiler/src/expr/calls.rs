//! Calls and instantiation.
//!
//! A call is resolved and its argument count checked before anything is
//! emitted, so a rejected call leaves no partial argument sequence behind.
//! Callees resolve to the innermost function of that name and `new` to the
//! innermost class; variables of the same name, locals included, do not
//! hide them.
//! Each argument is then evaluated and bound with `Param(i)` in order, and
//! the call itself is emitted last.

use classgen_core::{CompilationError, Span, SymbolHash, ValueType};
use classgen_registry::ScopeKind;

use super::{ExprCompiler, Result, resolve_as};
use crate::bytecode::Instruction;
use crate::tree::Tree;

pub(super) fn compile_call(
    compiler: &mut ExprCompiler<'_, '_>,
    name: &str,
    args: &[Tree],
    span: Span,
) -> Result<ValueType> {
    let callee = resolve_as(compiler.chain, name, "a function", span, |found| {
        found.symbol.as_function().is_some()
    })?;
    let function = callee.symbol.as_function().ok_or_else(|| {
        CompilationError::type_mismatch(format!("'{}' is not a function", name), span)
    })?;

    if args.len() != function.arity() {
        return Err(CompilationError::ArityMismatch {
            name: name.to_string(),
            expected: function.arity(),
            got: args.len(),
            span,
        });
    }
    if args.len() > compiler.max_arguments {
        return Err(CompilationError::TooManyArguments {
            name: name.to_string(),
            count: args.len(),
            max: compiler.max_arguments,
            span,
        });
    }

    let target = match (callee.scope, compiler.current_class) {
        (ScopeKind::Methods, Some(class)) => SymbolHash::from_method(class, name),
        _ => SymbolHash::from_function(name),
    };

    for (index, (arg, param)) in args.iter().zip(function.params.iter()).enumerate() {
        let expected = param.value_type().ok_or_else(|| {
            CompilationError::type_mismatch(
                format!("parameter '{}' of '{}' is not a variable", param.name, name),
                span,
            )
        })?;
        compiler.check(arg, expected, &format!("argument {} of '{}'", index + 1, name))?;
        // `max_arguments` never exceeds MAX_CALL_ARGUMENTS, so indices fit
        compiler.emitter().emit(Instruction::Param(index as u8));
    }

    compiler.emitter().emit(Instruction::Call {
        target,
        argc: args.len() as u8,
    });

    log::trace!("call '{}' -> {} with {} argument(s)", name, target, args.len());
    Ok(function.return_type)
}

pub(super) fn compile_new(
    compiler: &mut ExprCompiler<'_, '_>,
    class: &str,
    span: Span,
) -> Result<ValueType> {
    resolve_as(compiler.chain, class, "a class", span, |found| {
        found.symbol.as_class().is_some()
    })?;

    compiler
        .emitter()
        .emit(Instruction::New(SymbolHash::from_class(class)));
    Ok(ValueType::Object)
}
