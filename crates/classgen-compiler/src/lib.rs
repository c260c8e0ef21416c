//! Classgen Compiler
//!
//! Code generation backend for a small class-based language. The parser
//! drives a [`CodeGenerator`] through the classes, methods and statements of
//! a program; the generator resolves names against the declaration tables
//! from `classgen-registry` and emits one instruction chunk per method.
//!
//! ## Modules
//!
//! - [`bytecode`]: Instruction set (OpCode, Instruction, BytecodeChunk)
//! - [`config`]: Generator options
//! - [`context`]: Stack of open classes, methods and regions
//! - [`emit`]: Instruction emitter with jump patching and loop contexts
//! - [`expr`]: Expression compiler
//! - [`scope`]: Locals of the method being generated
//! - [`stmt`]: Statement compiler for definitions, assignments, returns and regions
//! - [`tree`]: Expression trees built by the parser
//!
//! ## Example
//!
//! ```
//! use classgen_compiler::{CodeGenerator, Tree};
//! use classgen_core::ValueType;
//! use classgen_registry::{Symbol, SymbolTable};
//!
//! let params = SymbolTable::new();
//! let methods = SymbolTable::from_symbols([
//!     Symbol::function("zero", ValueType::Int, SymbolTable::new()),
//! ]).unwrap();
//! let members = SymbolTable::new();
//! let globals = SymbolTable::new();
//!
//! let mut generator = CodeGenerator::new();
//! generator.begin_class(&globals, "Zero", &members, &methods)?;
//! generator.begin_method("zero", &params)?;
//! generator.generate_return_statement(&Tree::immediate(0))?;
//! generator.end_method()?;
//! generator.end_class()?;
//!
//! let module = generator.finish()?;
//! assert_eq!(module.method("Zero", "zero").unwrap().instructions().len(), 2);
//! # Ok::<(), classgen_core::CompilationError>(())
//! ```

pub mod bytecode;
pub mod config;
pub mod context;
pub mod emit;
pub mod expr;
mod generator;
mod output;
pub mod scope;
pub mod stmt;
pub mod tree;

pub use bytecode::{Address, BytecodeChunk, Instruction, Location, OpCode};
pub use config::{GeneratorConfig, MAX_CALL_ARGUMENTS};
pub use context::{GenerationContext, LoopMarker};
pub use emit::{BreakError, BytecodeEmitter, JumpLabel};
pub use expr::ExprCompiler;
pub use generator::CodeGenerator;
pub use output::{CompiledClass, CompiledMethod, CompiledModule};
pub use scope::{LocalScope, LocalVar};
pub use stmt::{Guarded, StmtCompiler};
pub use tree::{OperatorKind, Tree, TreeKind};

// Re-export CompilationError from core for convenience
pub use classgen_core::CompilationError;
