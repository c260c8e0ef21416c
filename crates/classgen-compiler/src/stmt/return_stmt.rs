//! Return statements.

use crate::tree::Tree;

use super::{Result, StmtCompiler};

impl<'a, 's> StmtCompiler<'a, 's> {
    /// Compile `return value`.
    ///
    /// The value must have the method's declared return type.
    pub fn compile_return(&mut self, value: &Tree) -> Result<()> {
        let return_type = self.return_type;
        self.expr_compiler()
            .check(value, return_type, "return value")?;
        self.emitter.emit_return();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use crate::bytecode::Instruction;
    use crate::tree::{OperatorKind, Tree};
    use classgen_core::CompilationError;

    #[test]
    fn value_then_return() {
        let mut h = Harness::new();
        h.with(|c| {
            c.compile_return(&Tree::binary(
                OperatorKind::Add,
                Tree::variable("size"),
                Tree::variable("scale"),
            ))
        })
        .unwrap();
        assert_eq!(h.code().last(), Some(&Instruction::Return));
        assert_eq!(h.code().len(), 4);
    }

    #[test]
    fn wrong_return_type() {
        let mut h = Harness::new();
        let result = h.with(|c| c.compile_return(&Tree::variable("next")));
        assert!(matches!(result, Err(CompilationError::TypeMismatch { .. })));
    }
}
