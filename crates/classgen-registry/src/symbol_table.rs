//! Ordered, append-only symbol scopes.

use classgen_core::CompilationError;
use rustc_hash::FxHashMap;

use crate::Symbol;

/// One scope: symbols in insertion order plus a name index.
///
/// Insertion order is significant. It fixes parameter positions and member
/// layout, so iteration always yields symbols in the order they were
/// declared. Names are unique within one table; nothing is ever removed.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// Symbols in declaration order
    symbols: Vec<Symbol>,
    /// Name to position in `symbols`
    index: FxHashMap<String, usize>,
}

impl SymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a symbol.
    ///
    /// Only this table is checked for duplicates; a name declared in an
    /// enclosing scope may be shadowed freely.
    ///
    /// Returns the symbol's position.
    pub fn insert(&mut self, symbol: Symbol) -> Result<usize, CompilationError> {
        if let Some(&existing) = self.index.get(&symbol.name) {
            return Err(CompilationError::DuplicateSymbol {
                name: symbol.name,
                original_span: self.symbols[existing].span,
                span: symbol.span,
            });
        }

        let position = self.symbols.len();
        self.index.insert(symbol.name.clone(), position);
        self.symbols.push(symbol);
        Ok(position)
    }

    /// Build a table from symbols in declaration order.
    pub fn from_symbols<I>(symbols: I) -> Result<Self, CompilationError>
    where
        I: IntoIterator<Item = Symbol>,
    {
        let mut table = Self::new();
        for symbol in symbols {
            table.insert(symbol)?;
        }
        Ok(table)
    }

    /// Look up a name in this table only.
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&i| &self.symbols[i])
    }

    /// Position of a name in declaration order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Symbol at a declaration position.
    pub fn get_index(&self, position: usize) -> Option<&Symbol> {
        self.symbols.get(position)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl PartialEq for SymbolTable {
    fn eq(&self, other: &Self) -> bool {
        self.symbols == other.symbols
    }
}

impl<'a> IntoIterator for &'a SymbolTable {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
