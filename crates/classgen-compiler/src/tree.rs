//! Expression trees.
//!
//! The parser builds a [`Tree`] bottom-up with the constructors below. Nothing
//! is checked at construction time: names are resolved and types compared
//! only when the generator walks the tree, because the declarations a
//! sub-expression refers to may not be complete yet while it is being built.
//!
//! ```
//! use classgen_compiler::tree::{OperatorKind, Tree};
//!
//! // n + d
//! let sum = Tree::binary(OperatorKind::Add, Tree::variable("n"), Tree::variable("d"));
//! assert!(sum.is_operator());
//! ```

use std::fmt;

use classgen_core::Span;
use classgen_registry::Symbol;

/// Operators of the expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    /// Logical not (unary).
    Not,
    /// Arithmetic negation (unary).
    Negate,
    Add,
    Multiply,
    /// Logical or.
    Or,
    Greater,
    NotEqual,
}

impl OperatorKind {
    /// Whether this operator takes a single (left) operand.
    pub fn is_unary(self) -> bool {
        matches!(self, OperatorKind::Not | OperatorKind::Negate)
    }

    /// Source spelling, for diagnostics.
    pub fn symbol(self) -> &'static str {
        match self {
            OperatorKind::Not => "!",
            OperatorKind::Negate => "-",
            OperatorKind::Add => "+",
            OperatorKind::Multiply => "*",
            OperatorKind::Or => "||",
            OperatorKind::Greater => ">",
            OperatorKind::NotEqual => "!=",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An immutable expression node. Children are owned exclusively.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub kind: TreeKind,
    pub span: Span,
}

/// The node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeKind {
    /// Integer literal.
    Immediate(i64),
    /// Reference to a variable, resolved at generation time.
    Variable(String),
    /// Unary operators use `left` only; binary operators need both.
    Operator {
        op: OperatorKind,
        left: Box<Tree>,
        right: Option<Box<Tree>>,
    },
    /// Instantiation of the named class.
    New { class: String },
    /// Call of a free function or a method of the current class.
    Call { name: String, args: Vec<Tree> },
}

impl Tree {
    fn from_kind(kind: TreeKind) -> Self {
        Self {
            kind,
            span: Span::default(),
        }
    }

    pub fn immediate(value: i64) -> Self {
        Self::from_kind(TreeKind::Immediate(value))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::from_kind(TreeKind::Variable(name.into()))
    }

    /// General operator node, mirroring how the parser hands operators over.
    ///
    /// Operand arity is checked against `op` at generation time.
    pub fn operator(op: OperatorKind, left: Tree, right: Option<Tree>) -> Self {
        Self::from_kind(TreeKind::Operator {
            op,
            left: Box::new(left),
            right: right.map(Box::new),
        })
    }

    pub fn unary(op: OperatorKind, operand: Tree) -> Self {
        Self::operator(op, operand, None)
    }

    pub fn binary(op: OperatorKind, left: Tree, right: Tree) -> Self {
        Self::operator(op, left, Some(right))
    }

    /// Instantiate `class`.
    ///
    /// Only the name is kept. If `class` is not a class symbol the
    /// generator reports a type mismatch when it reaches this node.
    pub fn new_object(class: &Symbol) -> Self {
        Self::from_kind(TreeKind::New {
            class: class.name.clone(),
        })
    }

    /// Call `name` with arguments in evaluation order.
    pub fn call(name: impl Into<String>, args: Vec<Tree>) -> Self {
        Self::from_kind(TreeKind::Call {
            name: name.into(),
            args,
        })
    }

    /// Attach a source location.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn is_operator(&self) -> bool {
        matches!(self.kind, TreeKind::Operator { .. })
    }

    /// Number of nodes in this tree, including itself.
    pub fn node_count(&self) -> usize {
        1 + match &self.kind {
            TreeKind::Immediate(_) | TreeKind::Variable(_) | TreeKind::New { .. } => 0,
            TreeKind::Operator { left, right, .. } => {
                left.node_count() + right.as_ref().map_or(0, |r| r.node_count())
            }
            TreeKind::Call { args, .. } => args.iter().map(Tree::node_count).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classgen_core::ValueType;
    use classgen_registry::SymbolTable;

    #[test]
    fn unary_keeps_only_left() {
        let tree = Tree::unary(OperatorKind::Negate, Tree::immediate(3));
        match tree.kind {
            TreeKind::Operator { op, left, right } => {
                assert_eq!(op, OperatorKind::Negate);
                assert_eq!(left.kind, TreeKind::Immediate(3));
                assert!(right.is_none());
            }
            other => panic!("expected operator, got {:?}", other),
        }
    }

    #[test]
    fn call_keeps_argument_order() {
        let tree = Tree::call("f", vec![Tree::immediate(1), Tree::variable("x")]);
        match &tree.kind {
            TreeKind::Call { name, args } => {
                assert_eq!(name, "f");
                assert_eq!(args[0].kind, TreeKind::Immediate(1));
                assert_eq!(args[1].kind, TreeKind::Variable("x".into()));
            }
            other => panic!("expected call, got {:?}", other),
        }
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn new_object_takes_class_name() {
        let class = Symbol::class("Point", SymbolTable::new(), SymbolTable::new());
        let tree = Tree::new_object(&class);
        assert_eq!(
            tree.kind,
            TreeKind::New {
                class: "Point".into()
            }
        );
    }

    #[test]
    fn construction_does_not_validate() {
        // A binary operator missing its right operand and a "new" of a
        // variable are both accepted here and rejected by the generator.
        let bad_op = Tree::operator(OperatorKind::Add, Tree::immediate(1), None);
        assert!(bad_op.is_operator());

        let var = Symbol::variable("v", ValueType::Int);
        let bad_new = Tree::new_object(&var);
        assert_eq!(bad_new.node_count(), 1);
    }

    #[test]
    fn span_attached() {
        let span = Span::new(4, 2, 1);
        assert_eq!(Tree::variable("x").at(span).span, span);
    }

    #[test]
    fn operator_arity_and_spelling() {
        assert!(OperatorKind::Not.is_unary());
        assert!(!OperatorKind::Greater.is_unary());
        assert_eq!(OperatorKind::NotEqual.to_string(), "!=");
    }
}
