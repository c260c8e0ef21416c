//! Conditional regions.
//!
//! A conditional is compiled in two halves: [`open_cond`] emits the
//! condition and a forward jump when the region is entered, and
//! [`close_cond`] patches that jump when the region ends. Else and elif
//! chains are expressed by nesting regions.
//!
//! [`open_cond`]: StmtCompiler::open_cond
//! [`close_cond`]: StmtCompiler::close_cond

use crate::bytecode::OpCode;
use crate::emit::JumpLabel;
use crate::tree::Tree;

use super::{Result, StmtCompiler};

impl<'a, 's> StmtCompiler<'a, 's> {
    /// Open a conditional region.
    ///
    /// The condition must be `int`. Returns the jump to patch at the end of
    /// the region.
    ///
    /// Bytecode layout:
    /// ```text
    /// [condition]
    /// JumpIfFalse -> end
    /// [body]
    /// end:
    /// ```
    pub fn open_cond(&mut self, condition: &Tree) -> Result<JumpLabel> {
        self.expr_compiler().check_condition(condition)?;
        let end_jump = self.emitter.emit_jump(OpCode::JumpIfFalse);
        self.locals.push_scope();
        Ok(end_jump)
    }

    /// Close a conditional region opened by [`open_cond`](Self::open_cond).
    pub fn close_cond(&mut self, end_jump: JumpLabel) {
        self.locals.pop_scope();
        self.emitter.patch_jump(end_jump);
    }
}
