//! Core types shared by the classgen crates.
//!
//! - [`Span`]: source locations attached to symbols, trees and errors
//! - [`ValueType`]: the two value types of the language (`int`, `object`)
//! - [`SymbolHash`]: deterministic identity for classes, functions and methods
//! - [`CompilationError`]: every semantic error the backend can report

mod error;
mod span;
mod symbol_hash;
mod value_type;

pub use error::CompilationError;
pub use span::Span;
pub use symbol_hash::{SymbolHash, hash_constants};
pub use value_type::ValueType;
