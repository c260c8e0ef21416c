//! Local variables of the method being generated.
//!
//! Parameters occupy register slots `0..n` and are resolved through the
//! scope chain. Locals introduced by definition statements take the slots
//! after them. Each conditional or guarded body opens a nested block; a local
//! may shadow one from an enclosing block but not one from its own block.

use classgen_core::{CompilationError, Span, ValueType};
use rustc_hash::FxHashMap;

/// A local variable.
#[derive(Debug, Clone)]
pub struct LocalVar {
    pub name: String,
    pub value_type: ValueType,
    /// Register slot
    pub slot: u32,
    /// Block depth where declared
    pub depth: u32,
    /// Source location of declaration
    pub span: Span,
}

/// Locals of one method body.
#[derive(Debug)]
pub struct LocalScope {
    /// Visible variables by name
    variables: FxHashMap<String, LocalVar>,

    /// Current block depth (0 = method body)
    depth: u32,

    /// Stack of shadowed variables (shadowing_depth, name, old_var)
    shadowed: Vec<(u32, String, LocalVar)>,

    /// First slot available to locals
    base_slot: u32,

    /// Next available slot
    next_slot: u32,

    /// Highest slot count reached
    max_slot: u32,
}

impl LocalScope {
    /// Create the scope for a method with `param_count` parameters.
    pub fn new(param_count: u32) -> Self {
        Self {
            variables: FxHashMap::default(),
            depth: 0,
            shadowed: Vec::new(),
            base_slot: param_count,
            next_slot: param_count,
            max_slot: param_count,
        }
    }

    // ==========================================================================
    // Block Management
    // ==========================================================================

    /// Enter a nested block.
    pub fn push_scope(&mut self) {
        self.depth += 1;
    }

    /// Leave the current block, dropping its locals and restoring any
    /// bindings they shadowed.
    pub fn pop_scope(&mut self) {
        let depth = self.depth;
        self.variables.retain(|_, var| var.depth < depth);

        while let Some((shadowing_depth, _, _)) = self.shadowed.last() {
            if *shadowing_depth != depth {
                break;
            }
            if let Some((_, name, var)) = self.shadowed.pop() {
                self.variables.insert(name, var);
            }
        }

        // Slots are not reused: a block's registers stay reserved so the
        // frame size covers every local ever live.
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    // ==========================================================================
    // Declaration and Lookup
    // ==========================================================================

    /// Declare a local in the current block.
    ///
    /// Returns its slot, or [`CompilationError::DuplicateSymbol`] if the
    /// name is already declared in this block.
    pub fn declare(
        &mut self,
        name: &str,
        value_type: ValueType,
        span: Span,
    ) -> Result<u32, CompilationError> {
        if let Some(existing) = self.variables.get(name) {
            if existing.depth == self.depth {
                return Err(CompilationError::DuplicateSymbol {
                    name: name.to_string(),
                    original_span: existing.span,
                    span,
                });
            }
            self.shadowed
                .push((self.depth, name.to_string(), existing.clone()));
        }

        let slot = self.next_slot;
        self.next_slot += 1;
        self.max_slot = self.max_slot.max(self.next_slot);

        self.variables.insert(
            name.to_string(),
            LocalVar {
                name: name.to_string(),
                value_type,
                slot,
                depth: self.depth,
                span,
            },
        );

        Ok(slot)
    }

    pub fn get(&self, name: &str) -> Option<&LocalVar> {
        self.variables.get(name)
    }

    /// Registers needed for parameters and every local.
    pub fn frame_size(&self) -> u32 {
        self.max_slot
    }

    /// Number of locals declared so far.
    pub fn local_count(&self) -> u32 {
        self.next_slot - self.base_slot
    }
}
