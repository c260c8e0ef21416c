//! Symbol table for the classgen backend.
//!
//! Declarations arrive from the front end as [`Symbol`]s and are appended to
//! ordered [`SymbolTable`]s: one global table, a member and a method table per
//! class, a parameter table per function. A [`ScopeChain`] stacks borrowed
//! tables so the generator can resolve names innermost-first.

mod scope_chain;
mod symbol;
mod symbol_table;

pub use scope_chain::{Lookup, ScopeChain, ScopeKind};
pub use symbol::{ClassSymbol, FunctionSymbol, Symbol, SymbolKind, VariableSymbol};
pub use symbol_table::SymbolTable;
