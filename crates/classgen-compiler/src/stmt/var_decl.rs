//! Local definitions.

use classgen_core::CompilationError;
use classgen_registry::ScopeKind;

use crate::bytecode::{Instruction, Location};
use crate::tree::Tree;

use super::{Result, StmtCompiler};

impl<'a, 's> StmtCompiler<'a, 's> {
    /// Compile `name = initializer` introducing a new local.
    ///
    /// The initializer is evaluated before the local is declared, so it
    /// cannot refer to the variable it initializes. The local takes the
    /// initializer's type and the next free register. Returns that register.
    ///
    /// At the top level of the method body a local may not reuse a
    /// parameter's name; blocks nested in a conditional or guarded
    /// statement may shadow it.
    ///
    /// Bytecode layout:
    /// ```text
    /// [initializer]
    /// Store r<slot>
    /// ```
    pub fn compile_definition(&mut self, name: &str, initializer: &Tree) -> Result<u32> {
        let value_type = self.expr_compiler().infer(initializer)?;

        let span = self.span_of(initializer);
        if self.locals.depth() == 0 {
            let param = self
                .chain
                .innermost(ScopeKind::Params)
                .and_then(|params| params.get(name));
            if let Some(param) = param {
                return Err(CompilationError::DuplicateSymbol {
                    name: name.to_string(),
                    original_span: param.span,
                    span,
                });
            }
        }
        let slot = self.locals.declare(name, value_type, span)?;

        self.emitter
            .emit(Instruction::Store(Location::Register(slot)));
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use crate::bytecode::{Address, Instruction, Location};
    use crate::tree::{OperatorKind, Tree};
    use classgen_core::{CompilationError, ValueType};

    #[test]
    fn local_takes_slot_after_parameters() {
        let mut h = Harness::new();
        let slot = h
            .with(|c| c.compile_definition("twice", &Tree::binary(
                OperatorKind::Multiply,
                Tree::variable("scale"),
                Tree::immediate(2),
            )))
            .unwrap();

        assert_eq!(slot, 1);
        assert_eq!(
            h.code(),
            vec![
                Instruction::Register(0),
                Instruction::Immediate(2),
                Instruction::Multiply,
                Instruction::Store(Location::Register(1)),
            ]
        );
        assert_eq!(h.locals.get("twice").unwrap().value_type, ValueType::Int);
    }

    #[test]
    fn local_type_follows_initializer() {
        let mut h = Harness::new();
        h.with(|c| c.compile_definition("other", &Tree::variable("next")))
            .unwrap();
        assert_eq!(h.locals.get("other").unwrap().value_type, ValueType::Object);
        assert_eq!(h.code()[0], Instruction::Memory(Address::Field(1)));
    }

    #[test]
    fn later_references_use_the_local() {
        let mut h = Harness::new();
        h.with(|c| {
            c.compile_definition("size", &Tree::immediate(4))?;
            c.compile_expression(&Tree::variable("size"))
        })
        .unwrap();
        assert_eq!(h.code()[2], Instruction::Register(1));
    }

    #[test]
    fn duplicate_in_same_block() {
        let mut h = Harness::new();
        let result = h.with(|c| {
            c.compile_definition("x", &Tree::immediate(1))?;
            c.compile_definition("x", &Tree::immediate(2))
        });
        assert!(matches!(
            result,
            Err(CompilationError::DuplicateSymbol { ref name, .. }) if name == "x"
        ));
    }

    #[test]
    fn parameter_name_at_body_level() {
        let mut h = Harness::new();
        let result = h.with(|c| c.compile_definition("scale", &Tree::immediate(1)));
        assert!(matches!(
            result,
            Err(CompilationError::DuplicateSymbol { ref name, .. }) if name == "scale"
        ));
        assert!(h.code().is_empty());
        assert!(h.locals.get("scale").is_none());
    }

    #[test]
    fn nested_block_may_shadow_parameter() {
        let mut h = Harness::new();
        let slot = h
            .with(|c| {
                c.locals.push_scope();
                c.compile_definition("scale", &Tree::immediate(1))
            })
            .unwrap();
        assert_eq!(slot, 1);
        assert_eq!(
            h.code(),
            vec![
                Instruction::Immediate(1),
                Instruction::Store(Location::Register(1)),
            ]
        );
    }

    #[test]
    fn initializer_cannot_see_its_own_local() {
        let mut h = Harness::new();
        let result = h.with(|c| c.compile_definition("fresh", &Tree::variable("fresh")));
        assert!(matches!(
            result,
            Err(CompilationError::UnresolvedName { .. })
        ));
        assert!(h.locals.get("fresh").is_none());
    }
}
