//! Classgen
//!
//! Code generation backend for a small class-based language: a symbol table
//! of nested scopes and a generator that turns classes, methods, statements
//! and expression trees into instruction chunks.
//!
//! This crate re-exports the workspace crates:
//!
//! - `classgen-core`: spans, value types, symbol hashes, errors
//! - `classgen-registry`: symbols, symbol tables, the scope chain
//! - `classgen-compiler`: expression trees and the [`CodeGenerator`]

pub use classgen_compiler as compiler;
pub use classgen_core as core;
pub use classgen_registry as registry;

pub use classgen_compiler::{
    CodeGenerator, CompiledClass, CompiledMethod, CompiledModule, GeneratorConfig, Guarded,
    Instruction, OperatorKind, Tree,
};
pub use classgen_core::{CompilationError, Span, SymbolHash, ValueType};
pub use classgen_registry::{ScopeChain, ScopeKind, Symbol, SymbolKind, SymbolTable};

/// Everything needed to drive the generator.
pub mod prelude {
    pub use classgen_compiler::bytecode::{Address, Location};
    pub use classgen_compiler::{
        CodeGenerator, CompiledModule, GeneratorConfig, Guarded, Instruction, OperatorKind, Tree,
    };
    pub use classgen_core::{CompilationError, Span, SymbolHash, ValueType};
    pub use classgen_registry::{Symbol, SymbolTable};
}
