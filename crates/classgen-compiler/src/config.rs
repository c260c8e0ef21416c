//! Generator configuration.

/// Hard upper bound on call arguments; `Call` encodes its count as a `u8`.
pub const MAX_CALL_ARGUMENTS: usize = u8::MAX as usize;

/// Options controlling code generation.
///
/// ```
/// use classgen_compiler::GeneratorConfig;
///
/// let config = GeneratorConfig::new()
///     .with_max_arguments(8)
///     .with_implicit_return(true);
/// assert_eq!(config.max_arguments(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    max_arguments: usize,
    line_info: bool,
    implicit_return: bool,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self {
            max_arguments: MAX_CALL_ARGUMENTS,
            line_info: true,
            implicit_return: false,
        }
    }

    /// Limit the number of arguments a single call may pass.
    ///
    /// Values above [`MAX_CALL_ARGUMENTS`] are clamped.
    pub fn with_max_arguments(mut self, max: usize) -> Self {
        self.max_arguments = max.min(MAX_CALL_ARGUMENTS);
        self
    }

    /// Record source line numbers alongside emitted instructions.
    pub fn with_line_info(mut self, enabled: bool) -> Self {
        self.line_info = enabled;
        self
    }

    /// Append `Immediate(0); Return` to method bodies that do not end in a
    /// return.
    pub fn with_implicit_return(mut self, enabled: bool) -> Self {
        self.implicit_return = enabled;
        self
    }

    pub fn max_arguments(&self) -> usize {
        self.max_arguments
    }

    pub fn line_info(&self) -> bool {
        self.line_info
    }

    pub fn implicit_return(&self) -> bool {
        self.implicit_return
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}
