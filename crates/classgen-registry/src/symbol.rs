//! Symbol descriptions.

use classgen_core::{Span, ValueType};

use crate::SymbolTable;

/// A named entity: a function or method selector, a class, or a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Declared name.
    pub name: String,
    /// What the name denotes.
    pub kind: SymbolKind,
    /// Where the name was declared.
    pub span: Span,
}

/// The closed set of symbol kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    /// Free function, method selector or method implementation.
    Function(FunctionSymbol),
    /// Class with its member and method scopes.
    Class(ClassSymbol),
    /// Global variable, class member, parameter or local.
    Variable(VariableSymbol),
}

/// Signature of a function or method.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSymbol {
    /// Declared return type.
    pub return_type: ValueType,
    /// Parameters in declaration order. Every entry is a variable symbol.
    pub params: SymbolTable,
}

impl FunctionSymbol {
    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Parameter types in declaration order.
    ///
    /// Non-variable entries in the parameter table are skipped.
    pub fn param_types(&self) -> impl Iterator<Item = ValueType> + '_ {
        self.params.iter().filter_map(Symbol::value_type)
    }
}

/// A class: member variables in layout order plus its methods.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassSymbol {
    pub members: SymbolTable,
    pub methods: SymbolTable,
}

/// A variable of some value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableSymbol {
    pub value_type: ValueType,
}

impl Symbol {
    /// Create a variable symbol.
    pub fn variable(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Variable(VariableSymbol { value_type }),
            span: Span::default(),
        }
    }

    /// Create a function symbol.
    pub fn function(name: impl Into<String>, return_type: ValueType, params: SymbolTable) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Function(FunctionSymbol {
                return_type,
                params,
            }),
            span: Span::default(),
        }
    }

    /// Create a class symbol.
    pub fn class(name: impl Into<String>, members: SymbolTable, methods: SymbolTable) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Class(ClassSymbol { members, methods }),
            span: Span::default(),
        }
    }

    /// Attach the declaration location.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Human-readable kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            SymbolKind::Function(_) => "function",
            SymbolKind::Class(_) => "class",
            SymbolKind::Variable(_) => "variable",
        }
    }

    pub fn as_function(&self) -> Option<&FunctionSymbol> {
        match &self.kind {
            SymbolKind::Function(func) => Some(func),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassSymbol> {
        match &self.kind {
            SymbolKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableSymbol> {
        match &self.kind {
            SymbolKind::Variable(var) => Some(var),
            _ => None,
        }
    }

    /// The value type of a variable symbol.
    pub fn value_type(&self) -> Option<ValueType> {
        self.as_variable().map(|var| var.value_type)
    }
}
