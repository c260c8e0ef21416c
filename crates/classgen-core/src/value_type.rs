//! Value types of the source language.

use std::fmt;

/// The type of a value: every variable, parameter and expression is either
/// an integer or an object reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueType {
    /// Machine integer. Also the boolean type: non-zero is true.
    #[default]
    Int,
    /// Reference to a class instance.
    Object,
}

impl ValueType {
    /// Whether a value of this type can drive a conditional branch.
    #[inline]
    pub fn is_condition(self) -> bool {
        matches!(self, ValueType::Int)
    }

    /// Source-level name of the type.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Object => "object",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
