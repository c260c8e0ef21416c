//! Operation codes.
//!
//! The target is a stack machine. Loads push a value, operators pop their
//! operands and push the result, stores and `Pop` consume the top of stack.
//! Numbering starts at 1; zero is never a valid opcode.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum OpCode {
    // =========================================================================
    // Loads
    // =========================================================================
    /// Push an integer literal.
    Immediate = 1,
    /// Push a calling-convention slot (parameter or local).
    Register,
    /// Push a value from memory (member field or global variable).
    Memory,

    // =========================================================================
    // Operators
    // =========================================================================
    /// Logical not of an int.
    Not,
    /// Arithmetic negation of an int.
    Negate,
    Add,
    Multiply,
    /// Logical or of two ints.
    Or,
    /// Signed greater-than; pushes 1 or 0.
    Greater,
    /// Inequality of two ints or two object references; pushes 1 or 0.
    NotEqual,

    // =========================================================================
    // Objects and calls
    // =========================================================================
    /// Allocate an instance of a class and push the reference.
    New,
    /// Pop the top of stack into an outgoing parameter position.
    Param,
    /// Call a function or method with the bound parameters; pushes the result.
    Call,

    // =========================================================================
    // Storage and control
    // =========================================================================
    /// Pop the top of stack into a register or memory location.
    Store,
    /// Discard the top of stack.
    Pop,
    /// Return the top of stack to the caller.
    Return,
    /// Unconditional forward jump.
    Jump,
    /// Pop a condition and jump if it is zero.
    JumpIfFalse,
    /// Backward jump to a loop's re-test point.
    Loop,
}

impl OpCode {
    /// Assembly mnemonic.
    pub fn name(self) -> &'static str {
        match self {
            OpCode::Immediate => "immediate",
            OpCode::Register => "register",
            OpCode::Memory => "memory",
            OpCode::Not => "not",
            OpCode::Negate => "negate",
            OpCode::Add => "add",
            OpCode::Multiply => "multiply",
            OpCode::Or => "or",
            OpCode::Greater => "greater",
            OpCode::NotEqual => "not_equal",
            OpCode::New => "new",
            OpCode::Param => "param",
            OpCode::Call => "call",
            OpCode::Store => "store",
            OpCode::Pop => "pop",
            OpCode::Return => "return",
            OpCode::Jump => "jump",
            OpCode::JumpIfFalse => "jump_if_false",
            OpCode::Loop => "loop",
        }
    }

    /// Whether the instruction transfers control.
    pub fn is_jump(self) -> bool {
        matches!(self, OpCode::Jump | OpCode::JumpIfFalse | OpCode::Loop)
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
