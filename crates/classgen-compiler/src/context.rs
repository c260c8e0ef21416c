//! Generation context: the stack of open classes, methods, conditionals and
//! guarded loops.
//!
//! Every `begin_*` pushes a frame and the matching `end_*` pops it. A pop
//! that finds a different frame on top is an [`UnbalancedContext`] error,
//! reported at the point of the mismatched `end_*`.
//!
//! [`UnbalancedContext`]: CompilationError::UnbalancedContext

use std::fmt;

use classgen_core::{CompilationError, Span, SymbolHash, ValueType};

use crate::emit::JumpLabel;

/// An open class.
#[derive(Debug, Clone)]
pub struct ClassFrame {
    pub name: String,
    pub hash: SymbolHash,
    /// Scope chain depth before the class's scopes were pushed
    pub chain_depth: usize,
}

/// An open method.
#[derive(Debug, Clone)]
pub struct MethodFrame {
    pub name: String,
    pub hash: SymbolHash,
    pub return_type: ValueType,
    pub param_count: u32,
}

/// An open conditional region.
#[derive(Debug, Clone, Copy)]
pub struct CondFrame {
    /// Jump taken when the condition is false
    pub end_jump: JumpLabel,
}

/// An open guarded loop.
#[derive(Debug, Clone, Copy)]
pub struct LoopMarker {
    /// Offset of the condition, the target of `continue`
    pub retest: usize,
    /// Jump taken when the condition is false
    pub exit_jump: JumpLabel,
}

#[derive(Debug, Clone)]
pub enum Frame {
    Class(ClassFrame),
    Method(MethodFrame),
    Cond(CondFrame),
    Guarded(LoopMarker),
}

impl Frame {
    fn describe(&self) -> String {
        match self {
            Frame::Class(class) => format!("class '{}'", class.name),
            Frame::Method(method) => format!("method '{}'", method.name),
            Frame::Cond(_) => "conditional".to_string(),
            Frame::Guarded(_) => "guarded loop".to_string(),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// The frame stack of one compilation unit.
#[derive(Debug, Default)]
pub struct GenerationContext {
    frames: Vec<Frame>,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The innermost open class.
    pub fn current_class(&self) -> Option<&ClassFrame> {
        self.frames.iter().rev().find_map(|frame| match frame {
            Frame::Class(class) => Some(class),
            _ => None,
        })
    }

    /// The innermost open method.
    pub fn current_method(&self) -> Option<&MethodFrame> {
        self.frames.iter().rev().find_map(|frame| match frame {
            Frame::Method(method) => Some(method),
            _ => None,
        })
    }

    /// The innermost guarded loop of the current method.
    pub fn innermost_loop(&self) -> Option<&LoopMarker> {
        for frame in self.frames.iter().rev() {
            match frame {
                Frame::Guarded(marker) => return Some(marker),
                Frame::Method(_) | Frame::Class(_) => return None,
                Frame::Cond(_) => {}
            }
        }
        None
    }

    /// Number of guarded loops open in the current method.
    pub fn loop_depth(&self) -> usize {
        self.frames
            .iter()
            .rev()
            .take_while(|frame| !matches!(frame, Frame::Method(_) | Frame::Class(_)))
            .filter(|frame| matches!(frame, Frame::Guarded(_)))
            .count()
    }

    // ==========================================================================
    // Balanced pops
    // ==========================================================================

    pub fn pop_class(&mut self, span: Span) -> Result<ClassFrame, CompilationError> {
        match self.pop_expecting("end_class", span)? {
            Frame::Class(class) => Ok(class),
            other => Err(self.restore_mismatch(other, "end_class", span)),
        }
    }

    pub fn pop_method(&mut self, span: Span) -> Result<MethodFrame, CompilationError> {
        match self.pop_expecting("end_method", span)? {
            Frame::Method(method) => Ok(method),
            other => Err(self.restore_mismatch(other, "end_method", span)),
        }
    }

    pub fn pop_cond(&mut self, span: Span) -> Result<CondFrame, CompilationError> {
        match self.pop_expecting("end_cond", span)? {
            Frame::Cond(cond) => Ok(cond),
            other => Err(self.restore_mismatch(other, "end_cond", span)),
        }
    }

    /// Pop the innermost guarded loop.
    ///
    /// With no loop open in the current method this is
    /// [`CompilationError::NoEnclosingLoop`]; with a loop open but another
    /// frame on top it is [`CompilationError::UnbalancedContext`].
    pub fn pop_guarded(
        &mut self,
        statement: &'static str,
        span: Span,
    ) -> Result<LoopMarker, CompilationError> {
        if self.innermost_loop().is_none() {
            return Err(CompilationError::NoEnclosingLoop { statement, span });
        }
        match self.pop_expecting("end_guarded", span)? {
            Frame::Guarded(marker) => Ok(marker),
            other => Err(self.restore_mismatch(other, "end_guarded", span)),
        }
    }

    fn pop_expecting(&mut self, op: &str, span: Span) -> Result<Frame, CompilationError> {
        self.frames.pop().ok_or_else(|| {
            CompilationError::unbalanced(format!("'{}' with nothing open", op), span)
        })
    }

    fn restore_mismatch(&mut self, frame: Frame, op: &str, span: Span) -> CompilationError {
        let message = format!("'{}' while {} is still open", op, frame);
        self.frames.push(frame);
        CompilationError::unbalanced(message, span)
    }

    /// Describe the innermost open frame, for end-of-unit diagnostics.
    pub fn describe_top(&self) -> Option<String> {
        self.top().map(Frame::describe)
    }
}
