//! Expression compiler.
//!
//! The [`ExprCompiler`] walks a [`Tree`] depth-first, left to right,
//! resolving names against the method's locals and the scope chain at the
//! moment it reaches them, and emits instructions that leave the value on
//! top of the stack. It returns the value type of the expression.
//!
//! Resolution order for a name: locals (innermost block first), then the
//! chain: parameters, methods of the current class, members, globals. The
//! walk only stops at a binding of the kind the node needs: variable
//! references skip functions and classes, calls and `new` skip variables.

mod calls;
mod identifiers;
mod operators;

use classgen_core::{CompilationError, Span, SymbolHash, ValueType};
use classgen_registry::{Lookup, ScopeChain};

use crate::bytecode::Instruction;
use crate::emit::BytecodeEmitter;
use crate::scope::LocalScope;
use crate::tree::{Tree, TreeKind};

pub(crate) use identifiers::Resolved;

type Result<T> = std::result::Result<T, CompilationError>;

/// Compiles expression trees for one method.
pub struct ExprCompiler<'a, 's> {
    /// Declaration scopes (params, methods, members, globals)
    chain: &'a ScopeChain<'s>,
    /// Locals of the current method
    locals: &'a LocalScope,
    /// Output
    emitter: &'a mut BytecodeEmitter,
    /// Class whose method is being generated
    current_class: Option<SymbolHash>,
    /// Call argument limit
    max_arguments: usize,
    /// Location used for nodes that carry none
    fallback_span: Span,
}

impl<'a, 's> ExprCompiler<'a, 's> {
    pub fn new(
        chain: &'a ScopeChain<'s>,
        locals: &'a LocalScope,
        emitter: &'a mut BytecodeEmitter,
        current_class: Option<SymbolHash>,
        max_arguments: usize,
    ) -> Self {
        let fallback_span = Span::line(emitter.current_line());
        Self {
            chain,
            locals,
            emitter,
            current_class,
            max_arguments,
            fallback_span,
        }
    }

    /// Compile `tree` and return its type.
    pub fn infer(&mut self, tree: &Tree) -> Result<ValueType> {
        let span = self.span_of(tree);
        match &tree.kind {
            TreeKind::Immediate(value) => {
                self.emitter.emit(Instruction::Immediate(*value));
                Ok(ValueType::Int)
            }
            TreeKind::Variable(name) => identifiers::compile_variable(self, name, span),
            TreeKind::Operator { op, left, right } => {
                operators::compile_operator(self, *op, left, right.as_deref(), span)
            }
            TreeKind::New { class } => calls::compile_new(self, class, span),
            TreeKind::Call { name, args } => calls::compile_call(self, name, args, span),
        }
    }

    /// Compile `tree` and require a value usable as a condition.
    pub fn check_condition(&mut self, tree: &Tree) -> Result<()> {
        let found = self.infer(tree)?;
        if !found.is_condition() {
            return Err(CompilationError::InvalidCondition {
                found,
                span: self.span_of(tree),
            });
        }
        Ok(())
    }

    /// Compile `tree` and require type `expected`.
    pub fn check(&mut self, tree: &Tree, expected: ValueType, what: &str) -> Result<()> {
        let found = self.infer(tree)?;
        if found != expected {
            return Err(CompilationError::type_mismatch(
                format!("{}: expected '{}', got '{}'", what, expected, found),
                self.span_of(tree),
            ));
        }
        Ok(())
    }

    /// Resolve a variable name without emitting anything.
    pub(crate) fn resolve_variable(&self, name: &str, span: Span) -> Result<Resolved> {
        identifiers::resolve_variable(self, name, span)
    }

    pub(crate) fn emitter(&mut self) -> &mut BytecodeEmitter {
        self.emitter
    }

    fn span_of(&self, tree: &Tree) -> Span {
        tree.span.or(self.fallback_span)
    }
}

/// Resolve `name` on the chain as the kind of symbol `accept` admits.
///
/// Bindings of other kinds are skipped. If the name is bound only to other
/// kinds it is a [`CompilationError::TypeMismatch`]; if it is not bound at
/// all it is unresolved.
fn resolve_as<'s>(
    chain: &ScopeChain<'s>,
    name: &str,
    expected: &str,
    span: Span,
    accept: impl FnMut(&Lookup<'s>) -> bool,
) -> Result<Lookup<'s>> {
    if let Some(found) = chain.find_where(name, accept) {
        return Ok(found);
    }
    let other = chain.lookup(name, span)?;
    Err(CompilationError::type_mismatch(
        format!(
            "'{}' is a {}, not {}",
            name,
            other.symbol.kind_name(),
            expected
        ),
        span,
    ))
}
