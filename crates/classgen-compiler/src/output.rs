//! Compiled output.

use std::fmt::Write;

use classgen_core::{SymbolHash, ValueType};
use rustc_hash::FxHashMap;

use crate::bytecode::{Address, BytecodeChunk, Instruction, Location};

/// Everything generated for one compilation unit.
#[derive(Debug, Default)]
pub struct CompiledModule {
    /// Classes in the order they were closed.
    pub classes: Vec<CompiledClass>,
    /// Methods in the order they were closed.
    pub methods: Vec<CompiledMethod>,
    /// Names of every hash an instruction may reference.
    pub names: FxHashMap<SymbolHash, String>,
}

/// A class and its member layout.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledClass {
    pub name: String,
    pub hash: SymbolHash,
    /// Member variables in field order.
    pub members: Vec<(String, ValueType)>,
}

/// A compiled method.
#[derive(Debug, Clone)]
pub struct CompiledMethod {
    /// Owning class name.
    pub class: String,
    /// Method name.
    pub name: String,
    /// Hash of `class::name`, the target calls use.
    pub hash: SymbolHash,
    pub param_count: u32,
    /// Registers needed for parameters and locals.
    pub frame_size: u32,
    /// Compiled instructions.
    pub chunk: BytecodeChunk,
}

impl CompiledMethod {
    pub fn instructions(&self) -> &[Instruction] {
        self.chunk.instructions()
    }
}

impl CompiledModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a method by class and name.
    pub fn method(&self, class: &str, name: &str) -> Option<&CompiledMethod> {
        self.methods
            .iter()
            .find(|method| method.class == class && method.name == name)
    }

    /// Find a class by name.
    pub fn class(&self, name: &str) -> Option<&CompiledClass> {
        self.classes.iter().find(|class| class.name == name)
    }

    /// Name registered for `hash`.
    pub fn name_of(&self, hash: SymbolHash) -> Option<&str> {
        self.names.get(&hash).map(String::as_str)
    }

    pub(crate) fn register_name(&mut self, hash: SymbolHash, name: impl Into<String>) {
        self.names.entry(hash).or_insert_with(|| name.into());
    }

    /// Render a listing of `method`: offset, line, opcode byte and
    /// instruction, with referenced hashes resolved to names.
    ///
    /// ```text
    /// == Counter::inc (params 1, frame 1) ==
    /// 0000    3  03  memory [field 0]
    /// ```
    pub fn disassemble(&self, method: &CompiledMethod) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "== {}::{} (params {}, frame {}) ==",
            method.class, method.name, method.param_count, method.frame_size
        );

        for (offset, instruction) in method.instructions().iter().enumerate() {
            let line = method.chunk.line_at(offset).unwrap_or(0);
            let _ = write!(
                out,
                "{:04} {:>4}  {:02x}  {}",
                offset,
                line,
                u8::from(instruction.opcode()),
                instruction
            );
            if let Some(name) = referenced_hash(instruction).and_then(|hash| self.name_of(hash)) {
                let _ = write!(out, "  ; {}", name);
            }
            out.push('\n');
        }
        out
    }
}

fn referenced_hash(instruction: &Instruction) -> Option<SymbolHash> {
    match instruction {
        Instruction::New(hash) | Instruction::Call { target: hash, .. } => Some(*hash),
        Instruction::Memory(Address::Global(hash))
        | Instruction::Store(Location::Memory(Address::Global(hash))) => Some(*hash),
        _ => None,
    }
}
