//! Loop bookkeeping for break/continue.
//!
//! Each active guarded loop has a re-test offset (the target of `continue`)
//! and the list of `break` jumps emitted so far, which are patched to the
//! loop exit when the loop closes.

use super::{BreakError, JumpLabel};

/// Stack of loop contexts, innermost last.
#[derive(Debug, Default)]
pub struct JumpManager {
    loops: Vec<LoopContext>,
}

#[derive(Debug)]
struct LoopContext {
    /// Offset of the loop condition
    continue_target: usize,
    /// Pending break jumps to patch when the loop exits
    break_labels: Vec<JumpLabel>,
}

impl JumpManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a new loop whose condition starts at `continue_target`.
    pub fn enter_loop(&mut self, continue_target: usize) {
        self.loops.push(LoopContext {
            continue_target,
            break_labels: Vec::new(),
        });
    }

    /// Exit the innermost loop.
    ///
    /// Returns the break labels that need to be patched to jump past the loop.
    pub fn exit_loop(&mut self) -> Vec<JumpLabel> {
        self.loops
            .pop()
            .map(|ctx| ctx.break_labels)
            .unwrap_or_default()
    }

    pub fn in_loop(&self) -> bool {
        !self.loops.is_empty()
    }

    /// Record a break jump against the innermost loop.
    pub fn add_break(&mut self, label: JumpLabel) -> Result<(), BreakError> {
        let ctx = self.loops.last_mut().ok_or(BreakError::NotInLoop)?;
        ctx.break_labels.push(label);
        Ok(())
    }

    /// Re-test offset of the innermost loop.
    pub fn continue_target(&self) -> Result<usize, BreakError> {
        self.loops
            .last()
            .map(|ctx| ctx.continue_target)
            .ok_or(BreakError::NotInLoop)
    }

    /// Forget break labels at or past `offset`.
    ///
    /// Used when emitted code is rolled back.
    pub fn discard_from(&mut self, offset: usize) {
        for ctx in &mut self.loops {
            ctx.break_labels.retain(|label| label.0 < offset);
        }
    }

    pub fn loop_depth(&self) -> usize {
        self.loops.len()
    }
}
