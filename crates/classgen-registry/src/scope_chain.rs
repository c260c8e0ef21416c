//! Innermost-first name resolution over borrowed scopes.
//!
//! The generator pushes the global table when a class opens, then the
//! class's member and method tables, then a method's parameter table. A
//! lookup walks that stack from the top, so parameters shadow members and
//! members shadow globals.

use classgen_core::{CompilationError, Span};

use crate::{Symbol, SymbolTable};

/// Which syntactic unit a scope on the chain belongs to.
///
/// The generator uses this to decide where a resolved variable lives:
/// parameters in registers, members and globals in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Program scope: classes, free functions, global variables.
    Globals,
    /// Member variables of the current class.
    Members,
    /// Methods of the current class.
    Methods,
    /// Parameters of the current method.
    Params,
}

/// A successful lookup.
#[derive(Debug, Clone, Copy)]
pub struct Lookup<'s> {
    /// The symbol found.
    pub symbol: &'s Symbol,
    /// The kind of scope it was found in.
    pub scope: ScopeKind,
    /// Its declaration position within that scope.
    pub position: usize,
}

#[derive(Debug, Clone, Copy)]
struct ScopeEntry<'s> {
    kind: ScopeKind,
    table: &'s SymbolTable,
}

/// Stack of borrowed scopes, innermost last.
#[derive(Debug, Clone, Default)]
pub struct ScopeChain<'s> {
    scopes: Vec<ScopeEntry<'s>>,
}

impl<'s> ScopeChain<'s> {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Push a scope; it becomes the innermost.
    pub fn push(&mut self, kind: ScopeKind, table: &'s SymbolTable) {
        self.scopes.push(ScopeEntry { kind, table });
    }

    /// Pop the innermost scope, returning its kind.
    pub fn pop(&mut self) -> Option<ScopeKind> {
        self.scopes.pop().map(|entry| entry.kind)
    }

    /// Pop scopes until only `depth` remain.
    pub fn truncate(&mut self, depth: usize) {
        self.scopes.truncate(depth);
    }

    /// Number of scopes on the chain.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// The innermost scope of the given kind.
    pub fn innermost(&self, kind: ScopeKind) -> Option<&'s SymbolTable> {
        self.scopes
            .iter()
            .rev()
            .find(|entry| entry.kind == kind)
            .map(|entry| entry.table)
    }

    /// Resolve a name, innermost scope first.
    pub fn find(&self, name: &str) -> Option<Lookup<'s>> {
        self.scopes.iter().rev().find_map(|entry| {
            let position = entry.table.position(name)?;
            let symbol = entry.table.get_index(position)?;
            Some(Lookup {
                symbol,
                scope: entry.kind,
                position,
            })
        })
    }

    /// Resolve a name, innermost scope first, skipping bindings `accept`
    /// rejects.
    ///
    /// Used to look a name up as a particular kind of symbol, so a member
    /// variable does not hide a function of the same name and a method does
    /// not hide a member.
    pub fn find_where<F>(&self, name: &str, mut accept: F) -> Option<Lookup<'s>>
    where
        F: FnMut(&Lookup<'s>) -> bool,
    {
        self.scopes.iter().rev().find_map(|entry| {
            let position = entry.table.position(name)?;
            let symbol = entry.table.get_index(position)?;
            let found = Lookup {
                symbol,
                scope: entry.kind,
                position,
            };
            accept(&found).then_some(found)
        })
    }

    /// Resolve a name or fail with [`CompilationError::UnresolvedName`].
    pub fn lookup(&self, name: &str, span: Span) -> Result<Lookup<'s>, CompilationError> {
        self.find(name).ok_or_else(|| CompilationError::UnresolvedName {
            name: name.to_string(),
            span,
        })
    }
}
