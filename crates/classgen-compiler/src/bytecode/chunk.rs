//! Instruction storage for a single method.

use super::{Instruction, OpCode};

/// Placeholder target written by forward jumps until they are patched.
pub(crate) const UNPATCHED: u32 = u32::MAX;

/// The instructions of one method, in emission order, with the source line
/// of each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BytecodeChunk {
    /// The instructions.
    code: Vec<Instruction>,
    /// Line numbers, parallel to `code`.
    lines: Vec<u32>,
}

impl BytecodeChunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction.
    pub fn write(&mut self, instruction: Instruction, line: u32) {
        self.code.push(instruction);
        self.lines.push(line);
    }

    /// Offset the next instruction will be written at.
    pub fn current_offset(&self) -> usize {
        self.code.len()
    }

    /// Emit a forward jump with a placeholder target.
    ///
    /// Returns the offset to hand back to [`patch_jump`](Self::patch_jump).
    pub fn emit_jump(&mut self, op: OpCode, line: u32) -> usize {
        let offset = self.code.len();
        let instruction = match op {
            OpCode::JumpIfFalse => Instruction::JumpIfFalse(UNPATCHED),
            _ => Instruction::Jump(UNPATCHED),
        };
        self.write(instruction, line);
        offset
    }

    /// Point the jump at `offset` to the current position.
    ///
    /// An `offset` that does not hold a forward jump is left untouched.
    pub fn patch_jump(&mut self, offset: usize) {
        let target = self.code.len() as u32;
        match self.code.get_mut(offset) {
            Some(Instruction::Jump(t)) | Some(Instruction::JumpIfFalse(t)) => *t = target,
            other => {
                debug_assert!(false, "no forward jump at offset {}: {:?}", offset, other);
            }
        }
    }

    /// Emit a backward jump to `loop_start`.
    pub fn emit_loop(&mut self, loop_start: usize, line: u32) {
        self.write(Instruction::Loop(loop_start as u32), line);
    }

    /// Drop every instruction from `offset` on.
    pub fn truncate(&mut self, offset: usize) {
        self.code.truncate(offset);
        self.lines.truncate(offset);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.code
    }

    pub fn lines(&self) -> &[u32] {
        &self.lines
    }

    /// Line number of the instruction at `offset`.
    pub fn line_at(&self, offset: usize) -> Option<u32> {
        self.lines.get(offset).copied()
    }

    pub fn last(&self) -> Option<&Instruction> {
        self.code.last()
    }

    /// Whether every forward jump has been patched.
    pub fn is_fully_patched(&self) -> bool {
        self.code
            .iter()
            .all(|i| i.jump_target() != Some(UNPATCHED))
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}
