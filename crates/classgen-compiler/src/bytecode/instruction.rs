//! Instructions with operands.

use std::fmt;

use classgen_core::SymbolHash;

use super::OpCode;

/// A memory address: a field of the current object or a global variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    /// Member field by layout position.
    Field(u32),
    /// Global variable by hash.
    Global(SymbolHash),
}

/// Destination of a [`Instruction::Store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Register(u32),
    Memory(Address),
}

/// One emitted operation.
///
/// Jump targets are absolute instruction offsets within the method's chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Immediate(i64),
    Register(u32),
    Memory(Address),
    Not,
    Negate,
    Add,
    Multiply,
    Or,
    Greater,
    NotEqual,
    New(SymbolHash),
    /// Bind the popped value as parameter `index` of the next call.
    Param(u8),
    Call { target: SymbolHash, argc: u8 },
    Store(Location),
    Pop,
    Return,
    Jump(u32),
    JumpIfFalse(u32),
    Loop(u32),
}

impl Instruction {
    /// The operation code of this instruction.
    pub fn opcode(&self) -> OpCode {
        match self {
            Instruction::Immediate(_) => OpCode::Immediate,
            Instruction::Register(_) => OpCode::Register,
            Instruction::Memory(_) => OpCode::Memory,
            Instruction::Not => OpCode::Not,
            Instruction::Negate => OpCode::Negate,
            Instruction::Add => OpCode::Add,
            Instruction::Multiply => OpCode::Multiply,
            Instruction::Or => OpCode::Or,
            Instruction::Greater => OpCode::Greater,
            Instruction::NotEqual => OpCode::NotEqual,
            Instruction::New(_) => OpCode::New,
            Instruction::Param(_) => OpCode::Param,
            Instruction::Call { .. } => OpCode::Call,
            Instruction::Store(_) => OpCode::Store,
            Instruction::Pop => OpCode::Pop,
            Instruction::Return => OpCode::Return,
            Instruction::Jump(_) => OpCode::Jump,
            Instruction::JumpIfFalse(_) => OpCode::JumpIfFalse,
            Instruction::Loop(_) => OpCode::Loop,
        }
    }

    /// Target offset of a jump instruction.
    pub fn jump_target(&self) -> Option<u32> {
        match self {
            Instruction::Jump(t) | Instruction::JumpIfFalse(t) | Instruction::Loop(t) => Some(*t),
            _ => None,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Field(index) => write!(f, "field {}", index),
            Address::Global(hash) => write!(f, "global {}", hash),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Register(slot) => write!(f, "r{}", slot),
            Location::Memory(address) => write!(f, "[{}]", address),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.opcode();
        match self {
            Instruction::Immediate(value) => write!(f, "{} {}", op, value),
            Instruction::Register(slot) => write!(f, "{} r{}", op, slot),
            Instruction::Memory(address) => write!(f, "{} [{}]", op, address),
            Instruction::New(class) => write!(f, "{} {}", op, class),
            Instruction::Param(index) => write!(f, "{} {}", op, index),
            Instruction::Call { target, argc } => write!(f, "{} {} ({})", op, target, argc),
            Instruction::Store(location) => write!(f, "{} {}", op, location),
            Instruction::Jump(t) | Instruction::JumpIfFalse(t) | Instruction::Loop(t) => {
                write!(f, "{} @{}", op, t)
            }
            _ => write!(f, "{}", op),
        }
    }
}
