//! Instruction emitter.
//!
//! The [`BytecodeEmitter`] builds the [`BytecodeChunk`] of one method. It
//! tracks the current source line, patches forward jumps and keeps the loop
//! stack used to resolve `break` and `continue`.
//!
//! ```
//! use classgen_compiler::bytecode::Instruction;
//! use classgen_compiler::emit::BytecodeEmitter;
//!
//! let mut emitter = BytecodeEmitter::new();
//! emitter.set_line(1);
//! emitter.emit(Instruction::Immediate(42));
//! emitter.emit(Instruction::Immediate(10));
//! emitter.emit(Instruction::Add);
//!
//! let chunk = emitter.finish();
//! assert_eq!(chunk.len(), 3);
//! ```

mod jumps;

use thiserror::Error;

use crate::bytecode::{BytecodeChunk, Instruction, OpCode};
use jumps::JumpManager;

/// Emits instructions for a single method.
#[derive(Debug, Default)]
pub struct BytecodeEmitter {
    /// The chunk being built
    chunk: BytecodeChunk,

    /// Loop contexts for break/continue
    jumps: JumpManager,

    /// Current source line for debug info
    current_line: u32,
}

impl BytecodeEmitter {
    pub fn new() -> Self {
        Self {
            chunk: BytecodeChunk::new(),
            jumps: JumpManager::new(),
            current_line: 0,
        }
    }

    /// Set current source line for debug info.
    pub fn set_line(&mut self, line: u32) {
        self.current_line = line;
    }

    pub fn current_line(&self) -> u32 {
        self.current_line
    }

    // ==========================================================================
    // Basic Emission
    // ==========================================================================

    pub fn emit(&mut self, instruction: Instruction) {
        self.chunk.write(instruction, self.current_line);
    }

    pub fn emit_pop(&mut self) {
        self.emit(Instruction::Pop);
    }

    pub fn emit_return(&mut self) {
        self.emit(Instruction::Return);
    }

    /// The last instruction emitted, if any.
    pub fn last(&self) -> Option<&Instruction> {
        self.chunk.last()
    }

    // ==========================================================================
    // Jumps and Control Flow
    // ==========================================================================

    /// Emit a forward jump (target unknown).
    ///
    /// Returns a label that must be patched later with [`patch_jump`](Self::patch_jump).
    pub fn emit_jump(&mut self, op: OpCode) -> JumpLabel {
        JumpLabel(self.chunk.emit_jump(op, self.current_line))
    }

    /// Patch a forward jump to the current position.
    pub fn patch_jump(&mut self, label: JumpLabel) {
        self.chunk.patch_jump(label.0);
    }

    /// Emit a backward jump to `target`.
    pub fn emit_loop(&mut self, target: usize) {
        self.chunk.emit_loop(target, self.current_line);
    }

    /// Current instruction offset.
    pub fn current_offset(&self) -> usize {
        self.chunk.current_offset()
    }

    /// Roll back everything emitted from `offset` on, including break
    /// jumps recorded in that range.
    pub fn truncate(&mut self, offset: usize) {
        self.chunk.truncate(offset);
        self.jumps.discard_from(offset);
    }

    // ==========================================================================
    // Loop Control (Break/Continue)
    // ==========================================================================

    /// Enter a loop whose condition starts at `continue_target`.
    pub fn enter_loop(&mut self, continue_target: usize) {
        self.jumps.enter_loop(continue_target);
    }

    /// Exit the innermost loop, patching its break jumps to the current
    /// position.
    pub fn exit_loop(&mut self) {
        let break_labels = self.jumps.exit_loop();
        for label in break_labels {
            self.patch_jump(label);
        }
    }

    /// Emit a jump to the innermost loop's exit.
    pub fn emit_break(&mut self) -> Result<(), BreakError> {
        if !self.jumps.in_loop() {
            return Err(BreakError::NotInLoop);
        }
        let label = self.emit_jump(OpCode::Jump);
        self.jumps.add_break(label)
    }

    /// Emit a jump back to the innermost loop's condition.
    pub fn emit_continue(&mut self) -> Result<(), BreakError> {
        let target = self.jumps.continue_target()?;
        self.emit_loop(target);
        Ok(())
    }

    pub fn in_loop(&self) -> bool {
        self.jumps.in_loop()
    }

    pub fn loop_depth(&self) -> usize {
        self.jumps.loop_depth()
    }

    // ==========================================================================
    // Finalization
    // ==========================================================================

    /// Finish emission and return the chunk.
    pub fn finish(self) -> BytecodeChunk {
        self.chunk
    }

    /// The chunk built so far.
    pub fn chunk(&self) -> &BytecodeChunk {
        &self.chunk
    }
}

/// A forward jump awaiting its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpLabel(pub(crate) usize);

impl JumpLabel {
    /// Offset of the jump instruction.
    pub fn offset(&self) -> usize {
        self.0
    }
}

/// Error from break/continue emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BreakError {
    #[error("not inside a loop")]
    NotInLoop,
}
