//! Assignment to existing variables.

use crate::bytecode::Instruction;
use crate::tree::Tree;

use super::{Result, StmtCompiler};

impl<'a, 's> StmtCompiler<'a, 's> {
    /// Compile `name = value`.
    ///
    /// The target is resolved first (locals, parameters, members, globals)
    /// and the value must have the target's type. Locals and parameters are
    /// stored to their register; members and globals to memory.
    pub fn compile_assignment(&mut self, name: &str, value: &Tree) -> Result<()> {
        let span = self.span_of(value);

        let mut expr_compiler = self.expr_compiler();
        let target = expr_compiler.resolve_variable(name, span)?;
        expr_compiler.check(
            value,
            target.value_type,
            &format!("assignment to '{}'", name),
        )?;

        self.emitter.emit(Instruction::Store(target.location));
        Ok(())
    }
}
