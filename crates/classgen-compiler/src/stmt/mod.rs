//! Statement compiler.
//!
//! The [`StmtCompiler`] emits one statement, or one edge of a conditional or
//! guarded region, into the current method's chunk:
//! - Expression statements (value discarded)
//! - Local definitions and assignments
//! - Returns checked against the method's return type
//! - Conditional and guarded regions with break/continue support
//!
//! It borrows the generator's state for a single operation; the
//! [`CodeGenerator`](crate::CodeGenerator) owns the state between calls and
//! decides which regions are open.

mod assignment;
mod guarded;
mod if_stmt;
mod return_stmt;
mod var_decl;

pub use guarded::Guarded;

use classgen_core::{CompilationError, Span, SymbolHash, ValueType};
use classgen_registry::ScopeChain;

use crate::emit::{BreakError, BytecodeEmitter};
use crate::expr::ExprCompiler;
use crate::scope::LocalScope;
use crate::tree::Tree;

type Result<T> = std::result::Result<T, CompilationError>;

/// Compiles statements of one method.
pub struct StmtCompiler<'a, 's> {
    /// Declaration scopes (params, methods, members, globals)
    chain: &'a ScopeChain<'s>,
    /// Locals of the current method
    locals: &'a mut LocalScope,
    /// Output
    emitter: &'a mut BytecodeEmitter,
    /// Declared return type of the current method
    return_type: ValueType,
    /// Class whose method is being generated
    current_class: Option<SymbolHash>,
    /// Call argument limit
    max_arguments: usize,
    /// Location of the statement, used when a tree carries none
    span: Span,
}

impl<'a, 's> StmtCompiler<'a, 's> {
    pub fn new(
        chain: &'a ScopeChain<'s>,
        locals: &'a mut LocalScope,
        emitter: &'a mut BytecodeEmitter,
        return_type: ValueType,
        current_class: Option<SymbolHash>,
        max_arguments: usize,
    ) -> Self {
        let span = Span::line(emitter.current_line());
        Self {
            chain,
            locals,
            emitter,
            return_type,
            current_class,
            max_arguments,
            span,
        }
    }

    /// Use `span` for errors not attributable to a tree node.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Compile an expression statement.
    ///
    /// The expression is evaluated for its side effects and its value is
    /// popped.
    pub fn compile_expression(&mut self, tree: &Tree) -> Result<()> {
        self.expr_compiler().infer(tree)?;
        self.emitter.emit_pop();
        Ok(())
    }

    /// Compile a break statement.
    pub fn compile_break(&mut self) -> Result<()> {
        let span = self.span;
        self.emitter.emit_break().map_err(|e| match e {
            BreakError::NotInLoop => CompilationError::NoEnclosingLoop {
                statement: "break",
                span,
            },
        })
    }

    /// Compile a continue statement.
    pub fn compile_continue(&mut self) -> Result<()> {
        let span = self.span;
        self.emitter.emit_continue().map_err(|e| match e {
            BreakError::NotInLoop => CompilationError::NoEnclosingLoop {
                statement: "continue",
                span,
            },
        })
    }

    /// Create an expression compiler over the current state.
    fn expr_compiler(&mut self) -> ExprCompiler<'_, 's> {
        ExprCompiler::new(
            self.chain,
            self.locals,
            self.emitter,
            self.current_class,
            self.max_arguments,
        )
    }

    fn span_of(&self, tree: &Tree) -> Span {
        tree.span.or(self.span)
    }
}
