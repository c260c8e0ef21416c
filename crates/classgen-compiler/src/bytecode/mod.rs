//! Instruction set and per-method instruction storage.
//!
//! - [`OpCode`]: one-byte operation identifiers
//! - [`Instruction`]: an operation with its operands
//! - [`BytecodeChunk`]: the instructions of one method plus line info

mod chunk;
mod instruction;
mod opcode;

pub use chunk::BytecodeChunk;
pub use instruction::{Address, Instruction, Location};
pub use opcode::OpCode;
