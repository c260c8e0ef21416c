//! Compilation errors.
//!
//! Every error the backend reports is semantic: a disagreement between the
//! trees handed to the generator and the declarations in the symbol table,
//! or a misuse of the generator's begin/end protocol. None of them is
//! recoverable for the compilation unit that raised it.
//!
//! ```text
//! CompilationError
//! ├── DuplicateSymbol    - name declared twice in one scope
//! ├── UnresolvedName     - lookup miss across the whole scope chain
//! ├── ArityMismatch      - call argument count vs declared parameters
//! ├── TypeMismatch       - operand, argument, store or return type
//! ├── InvalidCondition   - object used where a condition is required
//! ├── NoEnclosingLoop    - break/continue outside any guarded loop
//! ├── UnbalancedContext  - begin/end nesting violated
//! ├── TooManyArguments   - call exceeds the configured argument limit
//! └── Aborted            - generator used after an earlier error
//! ```

use thiserror::Error;

use crate::{Span, ValueType};

/// Errors that occur during code generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// A name was declared twice in the same scope.
    #[error("at {span}: '{name}' is already declared in this scope (first declared at {original_span})")]
    DuplicateSymbol {
        /// The duplicated name.
        name: String,
        /// Where the name was first declared.
        original_span: Span,
        /// Where the duplicate was declared.
        span: Span,
    },

    /// A name could not be found in any active scope.
    #[error("at {span}: unresolved name '{name}'")]
    UnresolvedName {
        /// The name that wasn't found.
        name: String,
        /// Where the name was referenced.
        span: Span,
    },

    /// A call supplied the wrong number of arguments.
    #[error("at {span}: '{name}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        /// The called function or method.
        name: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        got: usize,
        /// Where the call occurred.
        span: Span,
    },

    /// A value had the wrong type for where it was used.
    #[error("at {span}: {message}")]
    TypeMismatch {
        /// Description of the mismatch.
        message: String,
        /// Where the mismatch occurred.
        span: Span,
    },

    /// A condition expression did not produce a boolean-compatible value.
    #[error("at {span}: condition must be of type 'int', found '{found}'")]
    InvalidCondition {
        /// The type the condition resolved to.
        found: ValueType,
        /// Where the condition occurred.
        span: Span,
    },

    /// A break or continue was requested with no active guarded loop.
    #[error("at {span}: '{statement}' outside of a guarded loop")]
    NoEnclosingLoop {
        /// `"break"` or `"continue"`.
        statement: &'static str,
        /// Where the statement occurred.
        span: Span,
    },

    /// The begin/end protocol was violated.
    #[error("at {span}: unbalanced context: {message}")]
    UnbalancedContext {
        /// What was expected versus what was found.
        message: String,
        /// Where the violation was detected.
        span: Span,
    },

    /// A call passed more arguments than the generator allows.
    #[error("at {span}: call to '{name}' passes {count} arguments, the limit is {max}")]
    TooManyArguments {
        /// The called function or method.
        name: String,
        /// Supplied argument count.
        count: usize,
        /// Configured maximum.
        max: usize,
        /// Where the call occurred.
        span: Span,
    },

    /// The generator was used after it had already failed.
    #[error("code generation was aborted by an earlier error")]
    Aborted,
}

impl CompilationError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            CompilationError::DuplicateSymbol { span, .. } => *span,
            CompilationError::UnresolvedName { span, .. } => *span,
            CompilationError::ArityMismatch { span, .. } => *span,
            CompilationError::TypeMismatch { span, .. } => *span,
            CompilationError::InvalidCondition { span, .. } => *span,
            CompilationError::NoEnclosingLoop { span, .. } => *span,
            CompilationError::UnbalancedContext { span, .. } => *span,
            CompilationError::TooManyArguments { span, .. } => *span,
            CompilationError::Aborted => Span::default(),
        }
    }

    /// Build a [`CompilationError::TypeMismatch`].
    pub fn type_mismatch(message: impl Into<String>, span: Span) -> Self {
        CompilationError::TypeMismatch {
            message: message.into(),
            span,
        }
    }

    /// Build a [`CompilationError::UnbalancedContext`].
    pub fn unbalanced(message: impl Into<String>, span: Span) -> Self {
        CompilationError::UnbalancedContext {
            message: message.into(),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_location() {
        let err = CompilationError::UnresolvedName {
            name: "x".to_string(),
            span: Span::new(4, 9, 1),
        };
        assert_eq!(err.to_string(), "at 4:9: unresolved name 'x'");
    }

    #[test]
    fn arity_display() {
        let err = CompilationError::ArityMismatch {
            name: "add".to_string(),
            expected: 2,
            got: 1,
            span: Span::new(1, 1, 3),
        };
        assert_eq!(err.to_string(), "at 1:1: 'add' expects 2 argument(s), got 1");
    }

    #[test]
    fn invalid_condition_names_type() {
        let err = CompilationError::InvalidCondition {
            found: ValueType::Object,
            span: Span::point(2, 3),
        };
        assert!(err.to_string().contains("'object'"));
    }

    #[test]
    fn span_accessor() {
        let span = Span::new(10, 5, 3);
        let err = CompilationError::type_mismatch("test", span);
        assert_eq!(err.span(), span);
        assert_eq!(CompilationError::Aborted.span(), Span::default());
    }
}
