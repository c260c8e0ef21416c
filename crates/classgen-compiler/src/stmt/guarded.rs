//! Guarded loops.
//!
//! A guarded region re-tests its condition on every entry. It is compiled
//! in two halves like a conditional: [`open_guarded`] emits the condition,
//! the exit jump and a loop context, and [`close_guarded`] ends the body
//! according to how the region was written.
//!
//! Bytecode layout:
//! ```text
//! retest:
//! [condition]
//! JumpIfFalse -> exit
//! [body]            ; break  -> Jump exit
//!                   ; continue -> Loop retest
//! Loop retest       ; Guarded::Continue only
//! exit:
//! ```
//!
//! [`open_guarded`]: StmtCompiler::open_guarded
//! [`close_guarded`]: StmtCompiler::close_guarded

use std::fmt;

use crate::bytecode::OpCode;
use crate::context::LoopMarker;
use crate::tree::Tree;

use super::{Result, StmtCompiler};

/// How a guarded region ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Guarded {
    /// Leave the region after one pass through the body.
    Break,
    /// Jump back and re-test the condition, like `while`.
    Continue,
}

impl Guarded {
    pub fn keyword(self) -> &'static str {
        match self {
            Guarded::Break => "break",
            Guarded::Continue => "continue",
        }
    }
}

impl fmt::Display for Guarded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl<'a, 's> StmtCompiler<'a, 's> {
    /// Open a guarded region.
    ///
    /// The condition must be `int`. The returned marker records the retest
    /// point and the exit jump, and is handed back to
    /// [`close_guarded`](Self::close_guarded).
    pub fn open_guarded(&mut self, condition: &Tree) -> Result<LoopMarker> {
        let retest = self.emitter.current_offset();

        self.expr_compiler().check_condition(condition)?;
        let exit_jump = self.emitter.emit_jump(OpCode::JumpIfFalse);

        // Enter loop context (enables break/continue)
        self.emitter.enter_loop(retest);
        self.locals.push_scope();

        Ok(LoopMarker { retest, exit_jump })
    }

    /// Close a guarded region.
    ///
    /// The exit jump and every `break` in the body land after the region.
    pub fn close_guarded(&mut self, marker: LoopMarker, kind: Guarded) {
        self.locals.pop_scope();

        if kind == Guarded::Continue {
            self.emitter.emit_loop(marker.retest);
        }

        self.emitter.patch_jump(marker.exit_jump);
        self.emitter.exit_loop();
    }
}
