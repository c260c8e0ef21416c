//! Unary and binary operators.
//!
//! Operands are evaluated left before right and the operator instruction is
//! emitted last. There is no short-circuiting and no reordering, so calls
//! embedded in operands run in source order.

use classgen_core::{CompilationError, Span, ValueType};

use super::{ExprCompiler, Result};
use crate::bytecode::Instruction;
use crate::tree::{OperatorKind, Tree};

pub(super) fn compile_operator(
    compiler: &mut ExprCompiler<'_, '_>,
    op: OperatorKind,
    left: &Tree,
    right: Option<&Tree>,
    span: Span,
) -> Result<ValueType> {
    if op.is_unary() {
        if right.is_some() {
            return Err(CompilationError::type_mismatch(
                format!("unary operator '{}' takes a single operand", op),
                span,
            ));
        }
        return compile_unary(compiler, op, left, span);
    }

    let Some(right) = right else {
        return Err(CompilationError::type_mismatch(
            format!("binary operator '{}' is missing its right operand", op),
            span,
        ));
    };
    compile_binary(compiler, op, left, right, span)
}

fn compile_unary(
    compiler: &mut ExprCompiler<'_, '_>,
    op: OperatorKind,
    operand: &Tree,
    span: Span,
) -> Result<ValueType> {
    let operand_type = compiler.infer(operand)?;
    require_int(op, operand_type, span)?;

    let instruction = match op {
        OperatorKind::Not => Instruction::Not,
        _ => Instruction::Negate,
    };
    compiler.emitter().emit(instruction);
    Ok(ValueType::Int)
}

fn compile_binary(
    compiler: &mut ExprCompiler<'_, '_>,
    op: OperatorKind,
    left: &Tree,
    right: &Tree,
    span: Span,
) -> Result<ValueType> {
    let left_type = compiler.infer(left)?;
    let right_type = compiler.infer(right)?;

    let instruction = match op {
        OperatorKind::NotEqual => {
            // References compare by identity; ints by value. Mixing is an error.
            if left_type != right_type {
                return Err(CompilationError::type_mismatch(
                    format!(
                        "operator '{}' cannot compare '{}' with '{}'",
                        op, left_type, right_type
                    ),
                    span,
                ));
            }
            Instruction::NotEqual
        }
        _ => {
            require_int(op, left_type, span)?;
            require_int(op, right_type, span)?;
            match op {
                OperatorKind::Add => Instruction::Add,
                OperatorKind::Multiply => Instruction::Multiply,
                OperatorKind::Or => Instruction::Or,
                OperatorKind::Greater => Instruction::Greater,
                OperatorKind::Not | OperatorKind::Negate | OperatorKind::NotEqual => {
                    unreachable!("handled above")
                }
            }
        }
    };

    compiler.emitter().emit(instruction);
    Ok(ValueType::Int)
}

fn require_int(op: OperatorKind, found: ValueType, span: Span) -> Result<()> {
    if found != ValueType::Int {
        return Err(CompilationError::type_mismatch(
            format!("operator '{}' requires 'int' operands, got '{}'", op, found),
            span,
        ));
    }
    Ok(())
}
