//! The code generator.
//!
//! [`CodeGenerator`] is driven by the parser through paired `begin_*` /
//! `end_*` calls and one `generate_*` call per statement:
//!
//! ```text
//! begin_class
//!   begin_method
//!     generate_*            statements
//!     begin_cond / begin_guarded
//!       generate_*          nested statements, break, continue
//!     end_cond / end_guarded
//!   end_method
//! end_class
//! finish
//! ```
//!
//! Each call either succeeds completely or fails without leaving any of its
//! instructions behind. The first failure aborts the generator: every later
//! call returns [`CompilationError::Aborted`].

use classgen_core::{CompilationError, Span, SymbolHash, ValueType};
use classgen_registry::{ScopeChain, ScopeKind, SymbolKind, SymbolTable};
use log::{debug, trace};

use crate::bytecode::Instruction;
use crate::config::GeneratorConfig;
use crate::context::{ClassFrame, CondFrame, Frame, GenerationContext, MethodFrame};
use crate::emit::BytecodeEmitter;
use crate::output::{CompiledClass, CompiledMethod, CompiledModule};
use crate::scope::LocalScope;
use crate::stmt::{Guarded, StmtCompiler};
use crate::tree::Tree;

type Result<T> = std::result::Result<T, CompilationError>;

/// Emission state of the open method.
#[derive(Debug)]
struct MethodState {
    emitter: BytecodeEmitter,
    locals: LocalScope,
}

/// Generates instructions for one compilation unit.
///
/// The generator borrows the declaration tables for `'s` and owns
/// everything it produces.
#[derive(Debug)]
pub struct CodeGenerator<'s> {
    config: GeneratorConfig,
    /// Declaration scopes of the open class and method
    chain: ScopeChain<'s>,
    /// Open classes, methods and regions
    context: GenerationContext,
    /// Present while a method is open
    method: Option<MethodState>,
    /// Finished output
    module: CompiledModule,
    /// Current source line
    line: u32,
    /// Set by the first error
    aborted: bool,
}

impl Default for CodeGenerator<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'s> CodeGenerator<'s> {
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::default())
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            chain: ScopeChain::new(),
            context: GenerationContext::new(),
            method: None,
            module: CompiledModule::new(),
            line: 0,
            aborted: false,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Set the source line for subsequent instructions and errors.
    pub fn set_line(&mut self, line: u32) {
        self.line = line;
        let emitted = self.emitted_line();
        if let Some(state) = self.method.as_mut() {
            state.emitter.set_line(emitted);
        }
    }

    /// Whether an earlier call failed.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Number of open classes, methods and regions.
    pub fn depth(&self) -> usize {
        self.context.depth()
    }

    // ==========================================================================
    // Classes
    // ==========================================================================

    /// Open class `name`.
    ///
    /// `globals` holds the program's classes, free functions and global
    /// variables; `members` and `methods` are the class's own tables.
    ///
    /// # Errors
    ///
    /// [`CompilationError::UnbalancedContext`] if anything is already open.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn begin_class(
        &mut self,
        globals: &'s SymbolTable,
        name: &str,
        members: &'s SymbolTable,
        methods: &'s SymbolTable,
    ) -> Result<()> {
        self.ensure_live()?;
        if let Some(open) = self.context.describe_top() {
            let message = format!("'begin_class' for '{}' while {} is still open", name, open);
            let span = self.span();
            return Err(self.abort(CompilationError::unbalanced(message, span)));
        }

        let hash = SymbolHash::from_class(name);
        let chain_depth = self.chain.depth();
        self.chain.push(ScopeKind::Globals, globals);
        self.chain.push(ScopeKind::Members, members);
        self.chain.push(ScopeKind::Methods, methods);

        self.register_names(globals, name, methods);
        self.module.register_name(hash, name);

        self.context.push(Frame::Class(ClassFrame {
            name: name.to_string(),
            hash,
            chain_depth,
        }));
        debug!(
            "begin class '{}' ({} member(s), {} method(s))",
            name,
            members.len(),
            methods.len()
        );
        Ok(())
    }

    /// Close the open class and record its member layout.
    ///
    /// # Errors
    ///
    /// [`CompilationError::UnbalancedContext`] if the innermost open frame is
    /// not a class.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn end_class(&mut self) -> Result<()> {
        self.ensure_live()?;
        let span = self.span();
        let frame = match self.context.pop_class(span) {
            Ok(frame) => frame,
            Err(err) => return Err(self.abort(err)),
        };

        let members: Vec<(String, ValueType)> = self
            .chain
            .innermost(ScopeKind::Members)
            .map(|table| {
                table
                    .iter()
                    .filter_map(|symbol| Some((symbol.name.clone(), symbol.value_type()?)))
                    .collect()
            })
            .unwrap_or_default();
        self.chain.truncate(frame.chain_depth);

        debug!("end class '{}'", frame.name);
        self.module.classes.push(CompiledClass {
            name: frame.name,
            hash: frame.hash,
            members,
        });
        Ok(())
    }

    fn register_names(&mut self, globals: &SymbolTable, class: &str, methods: &SymbolTable) {
        let class_hash = SymbolHash::from_class(class);
        for symbol in globals {
            let hash = match &symbol.kind {
                SymbolKind::Class(_) => SymbolHash::from_class(&symbol.name),
                SymbolKind::Function(_) => SymbolHash::from_function(&symbol.name),
                SymbolKind::Variable(_) => SymbolHash::from_global(&symbol.name),
            };
            self.module.register_name(hash, symbol.name.as_str());
        }
        for symbol in methods {
            self.module.register_name(
                SymbolHash::from_method(class_hash, &symbol.name),
                format!("{}::{}", class, symbol.name),
            );
        }
    }

    // ==========================================================================
    // Methods
    // ==========================================================================

    /// Open method `name` of the open class.
    ///
    /// The method's selector in the class's method table supplies the return
    /// type; `params` must agree with the selector's parameters. Parameters
    /// occupy registers `0..n` in declaration order.
    ///
    /// # Errors
    ///
    /// - [`CompilationError::UnbalancedContext`] unless a class is the
    ///   innermost open frame
    /// - [`CompilationError::UnresolvedName`] if the class declares no such
    ///   method
    /// - [`CompilationError::ArityMismatch`] / [`CompilationError::TypeMismatch`]
    ///   if `params` disagrees with the selector
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn begin_method(&mut self, name: &str, params: &'s SymbolTable) -> Result<()> {
        self.ensure_live()?;
        let span = self.span();

        let class_hash = match self.context.top() {
            Some(Frame::Class(class)) => class.hash,
            Some(other) => {
                let message = format!("'begin_method' for '{}' while {} is still open", name, other);
                return Err(self.abort(CompilationError::unbalanced(message, span)));
            }
            None => {
                let message = format!("'begin_method' for '{}' outside of a class", name);
                return Err(self.abort(CompilationError::unbalanced(message, span)));
            }
        };

        let return_type = match self.check_selector(name, params, span) {
            Ok(return_type) => return_type,
            Err(err) => return Err(self.abort(err)),
        };

        self.chain.push(ScopeKind::Params, params);

        let mut emitter = BytecodeEmitter::new();
        emitter.set_line(self.emitted_line());
        let param_count = params.len() as u32;
        self.method = Some(MethodState {
            emitter,
            locals: LocalScope::new(param_count),
        });

        self.context.push(Frame::Method(MethodFrame {
            name: name.to_string(),
            hash: SymbolHash::from_method(class_hash, name),
            return_type,
            param_count,
        }));
        debug!("begin method '{}' ({} parameter(s))", name, param_count);
        Ok(())
    }

    /// Compare `params` against the declared selector and return its
    /// return type.
    fn check_selector(&self, name: &str, params: &SymbolTable, span: Span) -> Result<ValueType> {
        let selector = self
            .chain
            .innermost(ScopeKind::Methods)
            .and_then(|methods| methods.get(name))
            .ok_or_else(|| CompilationError::UnresolvedName {
                name: name.to_string(),
                span,
            })?;
        let function = selector.as_function().ok_or_else(|| {
            CompilationError::type_mismatch(
                format!("'{}' is a {}, not a method", name, selector.kind_name()),
                span,
            )
        })?;

        if function.arity() != params.len() {
            return Err(CompilationError::ArityMismatch {
                name: name.to_string(),
                expected: function.arity(),
                got: params.len(),
                span,
            });
        }

        for (declared, given) in function.params.iter().zip(params.iter()) {
            match (declared.value_type(), given.value_type()) {
                (Some(expected), Some(found)) if expected == found => {}
                (expected, found) => {
                    return Err(CompilationError::type_mismatch(
                        format!(
                            "parameter '{}' of '{}': declared as {}, given {}",
                            given.name,
                            name,
                            describe(expected),
                            describe(found)
                        ),
                        span,
                    ));
                }
            }
        }

        Ok(function.return_type)
    }

    /// Close the open method and add it to the module.
    ///
    /// # Errors
    ///
    /// [`CompilationError::UnbalancedContext`] if the innermost open frame is
    /// not a method.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn end_method(&mut self) -> Result<()> {
        self.ensure_live()?;
        let span = self.span();
        let frame = match self.context.pop_method(span) {
            Ok(frame) => frame,
            Err(err) => return Err(self.abort(err)),
        };
        let Some(mut state) = self.method.take() else {
            let message = format!("method '{}' has no emission state", frame.name);
            return Err(self.abort(CompilationError::unbalanced(message, span)));
        };

        if self.config.implicit_return()
            && state.emitter.last() != Some(&Instruction::Return)
        {
            state.emitter.emit(Instruction::Immediate(0));
            state.emitter.emit_return();
        }

        let class = self
            .context
            .current_class()
            .map(|class| class.name.clone())
            .unwrap_or_default();
        let frame_size = state.locals.frame_size();
        let chunk = state.emitter.finish();
        debug_assert!(chunk.is_fully_patched(), "unpatched jump in '{}'", frame.name);
        self.chain.pop();

        debug!(
            "end method '{}::{}': {} instruction(s), frame size {}",
            class,
            frame.name,
            chunk.len(),
            frame_size
        );
        self.module.methods.push(CompiledMethod {
            class,
            name: frame.name,
            hash: frame.hash,
            param_count: frame.param_count,
            frame_size,
            chunk,
        });
        Ok(())
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    /// Emit `return value`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate_return_statement(&mut self, value: &Tree) -> Result<()> {
        self.statement("return", |stmt| stmt.compile_return(value))
    }

    /// Emit `name = initializer`, introducing a local in the innermost block.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate_definition_statement(&mut self, name: &str, initializer: &Tree) -> Result<()> {
        self.statement("definition", |stmt| {
            stmt.compile_definition(name, initializer).map(|_| ())
        })
    }

    /// Emit `name = value` for an existing variable.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate_assignment_statement(&mut self, name: &str, value: &Tree) -> Result<()> {
        self.statement("assignment", |stmt| stmt.compile_assignment(name, value))
    }

    /// Emit an expression evaluated for its side effects.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate_expression_statement(&mut self, expression: &Tree) -> Result<()> {
        self.statement("expression", |stmt| stmt.compile_expression(expression))
    }

    /// Leave the innermost guarded loop.
    ///
    /// # Errors
    ///
    /// [`CompilationError::NoEnclosingLoop`] if no loop is open in the
    /// current method.
    pub fn generate_break_statement(&mut self) -> Result<()> {
        self.statement("break", |stmt| stmt.compile_break())
    }

    /// Jump back to the condition of the innermost guarded loop.
    ///
    /// # Errors
    ///
    /// [`CompilationError::NoEnclosingLoop`] if no loop is open in the
    /// current method.
    pub fn generate_continue_statement(&mut self) -> Result<()> {
        self.statement("continue", |stmt| stmt.compile_continue())
    }

    // ==========================================================================
    // Regions
    // ==========================================================================

    /// Open a conditional region guarded by `condition`.
    ///
    /// # Errors
    ///
    /// [`CompilationError::InvalidCondition`] if the condition is an object.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn begin_cond(&mut self, condition: &Tree) -> Result<()> {
        let end_jump = self.statement("begin_cond", |stmt| stmt.open_cond(condition))?;
        self.context.push(Frame::Cond(CondFrame { end_jump }));
        debug!("begin cond (depth {})", self.context.depth());
        Ok(())
    }

    /// Close the innermost conditional region.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn end_cond(&mut self) -> Result<()> {
        self.ensure_live()?;
        let span = self.span();
        let frame = match self.context.pop_cond(span) {
            Ok(frame) => frame,
            Err(err) => return Err(self.abort(err)),
        };
        self.statement("end_cond", |stmt| {
            stmt.close_cond(frame.end_jump);
            Ok(())
        })?;
        debug!("end cond");
        Ok(())
    }

    /// Open a guarded loop re-testing `condition` on each entry.
    ///
    /// # Errors
    ///
    /// [`CompilationError::InvalidCondition`] if the condition is an object.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn begin_guarded(&mut self, condition: &Tree) -> Result<()> {
        let marker = self.statement("begin_guarded", |stmt| stmt.open_guarded(condition))?;
        self.context.push(Frame::Guarded(marker));
        debug!(
            "begin guarded at {} (loop depth {})",
            marker.retest,
            self.context.loop_depth()
        );
        Ok(())
    }

    /// Close the innermost guarded loop.
    ///
    /// With [`Guarded::Continue`] the body ends by jumping back to the
    /// condition; with [`Guarded::Break`] it falls through to the exit.
    ///
    /// # Errors
    ///
    /// - [`CompilationError::NoEnclosingLoop`] if no loop is open
    /// - [`CompilationError::UnbalancedContext`] if a conditional opened
    ///   inside the loop is still open
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn end_guarded(&mut self, kind: Guarded) -> Result<()> {
        self.ensure_live()?;
        let span = self.span();
        let marker = match self.context.pop_guarded(kind.keyword(), span) {
            Ok(marker) => marker,
            Err(err) => return Err(self.abort(err)),
        };
        self.statement("end_guarded", |stmt| {
            stmt.close_guarded(marker, kind);
            Ok(())
        })?;
        debug!("end guarded ({})", kind);
        Ok(())
    }

    // ==========================================================================
    // Finalization
    // ==========================================================================

    /// Finish the unit and return its output.
    ///
    /// # Errors
    ///
    /// - [`CompilationError::Aborted`] if any earlier call failed
    /// - [`CompilationError::UnbalancedContext`] if anything is still open
    pub fn finish(self) -> Result<CompiledModule> {
        if self.aborted {
            return Err(CompilationError::Aborted);
        }
        if let Some(open) = self.context.describe_top() {
            return Err(CompilationError::unbalanced(
                format!("{} is still open at the end of the unit", open),
                Span::line(self.line),
            ));
        }
        debug!(
            "finished unit: {} class(es), {} method(s)",
            self.module.classes.len(),
            self.module.methods.len()
        );
        Ok(self.module)
    }

    // ==========================================================================
    // Helpers
    // ==========================================================================

    /// Run one statement against the open method.
    ///
    /// On failure everything `f` emitted is discarded and the generator is
    /// aborted.
    fn statement<R>(
        &mut self,
        what: &'static str,
        f: impl FnOnce(&mut StmtCompiler<'_, 's>) -> Result<R>,
    ) -> Result<R> {
        self.ensure_live()?;
        let span = self.span();

        let Some(method) = self.context.current_method() else {
            let message = format!("'{}' outside of a method", what);
            return Err(self.abort(CompilationError::unbalanced(message, span)));
        };
        let return_type = method.return_type;
        let current_class = self.context.current_class().map(|class| class.hash);

        let Some(state) = self.method.as_mut() else {
            let message = format!("'{}' with no method being emitted", what);
            return Err(self.abort(CompilationError::unbalanced(message, span)));
        };

        let start = state.emitter.current_offset();
        let result = {
            let mut compiler = StmtCompiler::new(
                &self.chain,
                &mut state.locals,
                &mut state.emitter,
                return_type,
                current_class,
                self.config.max_arguments(),
            )
            .at(span);
            f(&mut compiler)
        };

        match result {
            Ok(value) => {
                trace!("{} at line {}: ok", what, self.line);
                Ok(value)
            }
            Err(err) => {
                state.emitter.truncate(start);
                Err(self.abort(err))
            }
        }
    }

    fn ensure_live(&self) -> Result<()> {
        if self.aborted {
            return Err(CompilationError::Aborted);
        }
        Ok(())
    }

    fn abort(&mut self, err: CompilationError) -> CompilationError {
        debug!("generation aborted: {}", err);
        self.aborted = true;
        err
    }

    fn span(&self) -> Span {
        Span::line(self.line)
    }

    /// Line recorded with instructions.
    fn emitted_line(&self) -> u32 {
        if self.config.line_info() { self.line } else { 0 }
    }
}

fn describe(value_type: Option<ValueType>) -> String {
    match value_type {
        Some(value_type) => format!("'{}'", value_type),
        None => "a non-variable".to_string(),
    }
}
