//! End-to-end tests driving the generator the way a parser would.

use classgen::prelude::*;

/// Declarations shared by the tests:
///
/// ```text
/// global: class Counter, class Node, f():int, g():int, add(a:int, b:int):int, total:int
/// class Counter { n:int; d:int; inc(d:int):int; get():int; scan(limit:int):int; peer():object }
/// ```
struct Program {
    globals: SymbolTable,
    members: SymbolTable,
    methods: SymbolTable,
    inc_params: SymbolTable,
    scan_params: SymbolTable,
    none: SymbolTable,
}

impl Program {
    fn new() -> Self {
        let inc_params = SymbolTable::from_symbols([Symbol::variable("d", ValueType::Int)]).unwrap();
        let scan_params =
            SymbolTable::from_symbols([Symbol::variable("limit", ValueType::Int)]).unwrap();
        let add_params = SymbolTable::from_symbols([
            Symbol::variable("a", ValueType::Int),
            Symbol::variable("b", ValueType::Int),
        ])
        .unwrap();
        let members = SymbolTable::from_symbols([
            Symbol::variable("n", ValueType::Int),
            Symbol::variable("d", ValueType::Int),
        ])
        .unwrap();
        let methods = SymbolTable::from_symbols([
            Symbol::function("inc", ValueType::Int, inc_params.clone()),
            Symbol::function("get", ValueType::Int, SymbolTable::new()),
            Symbol::function("scan", ValueType::Int, scan_params.clone()),
            Symbol::function("peer", ValueType::Object, SymbolTable::new()),
        ])
        .unwrap();

        let mut globals = SymbolTable::new();
        globals
            .insert(Symbol::class("Counter", members.clone(), methods.clone()))
            .unwrap();
        globals
            .insert(Symbol::class("Node", SymbolTable::new(), SymbolTable::new()))
            .unwrap();
        globals
            .insert(Symbol::function("f", ValueType::Int, SymbolTable::new()))
            .unwrap();
        globals
            .insert(Symbol::function("g", ValueType::Int, SymbolTable::new()))
            .unwrap();
        globals
            .insert(Symbol::function("add", ValueType::Int, add_params))
            .unwrap();
        globals
            .insert(Symbol::variable("total", ValueType::Int))
            .unwrap();

        Self {
            globals,
            members,
            methods,
            inc_params,
            scan_params,
            none: SymbolTable::new(),
        }
    }

    fn generator(&self) -> CodeGenerator<'_> {
        let mut generator = CodeGenerator::new();
        generator
            .begin_class(&self.globals, "Counter", &self.members, &self.methods)
            .unwrap();
        generator
    }

    fn counter(&self) -> SymbolHash {
        SymbolHash::from_class("Counter")
    }
}

fn finish(mut generator: CodeGenerator<'_>) -> CompiledModule {
    generator.end_class().unwrap();
    generator.finish().unwrap()
}

// =============================================================================
// Counter::inc
// =============================================================================

#[test]
fn counter_inc_end_to_end() {
    let program = Program::new();
    let mut generator = program.generator();

    generator.begin_method("inc", &program.inc_params).unwrap();
    // n = n + d
    generator
        .generate_assignment_statement(
            "n",
            &Tree::binary(OperatorKind::Add, Tree::variable("n"), Tree::variable("d")),
        )
        .unwrap();
    // return n
    generator
        .generate_return_statement(&Tree::variable("n"))
        .unwrap();
    generator.end_method().unwrap();

    let module = finish(generator);
    let inc = module.method("Counter", "inc").unwrap();
    assert_eq!(
        inc.instructions(),
        &[
            Instruction::Memory(Address::Field(0)),
            Instruction::Register(0),
            Instruction::Add,
            Instruction::Store(Location::Memory(Address::Field(0))),
            Instruction::Memory(Address::Field(0)),
            Instruction::Return,
        ]
    );
    assert_eq!(inc.param_count, 1);
    assert_eq!(inc.frame_size, 1);
    assert_eq!(inc.hash, SymbolHash::from_method(program.counter(), "inc"));
}

// =============================================================================
// Scoping
// =============================================================================

#[test]
fn parameter_shadows_member() {
    // Counter has a member `d` and inc has a parameter `d`
    let program = Program::new();
    let mut generator = program.generator();
    generator.begin_method("inc", &program.inc_params).unwrap();
    generator
        .generate_return_statement(&Tree::variable("d"))
        .unwrap();
    generator.end_method().unwrap();

    // Outside inc, `d` is the member again
    generator.begin_method("get", &program.none).unwrap();
    generator
        .generate_return_statement(&Tree::variable("d"))
        .unwrap();
    generator.end_method().unwrap();

    let module = finish(generator);
    assert_eq!(
        module.method("Counter", "inc").unwrap().instructions()[0],
        Instruction::Register(0)
    );
    assert_eq!(
        module.method("Counter", "get").unwrap().instructions()[0],
        Instruction::Memory(Address::Field(1))
    );
}

#[test]
fn globals_resolve_through_the_chain() {
    let program = Program::new();
    let mut generator = program.generator();
    generator.begin_method("get", &program.none).unwrap();
    generator
        .generate_return_statement(&Tree::variable("total"))
        .unwrap();
    generator.end_method().unwrap();

    let module = finish(generator);
    let get = module.method("Counter", "get").unwrap();
    let global = SymbolHash::from_global("total");
    assert_eq!(get.instructions()[0], Instruction::Memory(Address::Global(global)));
    assert_eq!(module.name_of(global), Some("total"));
}

#[test]
fn duplicate_declaration_rejected() {
    let mut table = SymbolTable::new();
    table.insert(Symbol::variable("x", ValueType::Int)).unwrap();
    let result = table.insert(Symbol::variable("x", ValueType::Object));
    assert!(matches!(
        result,
        Err(CompilationError::DuplicateSymbol { ref name, .. }) if name == "x"
    ));
    assert_eq!(table.len(), 1);

    // Locals: same block is a duplicate, a nested block may shadow
    let program = Program::new();
    let mut generator = program.generator();
    generator.begin_method("get", &program.none).unwrap();
    generator
        .generate_definition_statement("t", &Tree::immediate(1))
        .unwrap();
    generator.begin_cond(&Tree::immediate(1)).unwrap();
    generator
        .generate_definition_statement("t", &Tree::immediate(2))
        .unwrap();
    generator.end_cond().unwrap();
    assert!(matches!(
        generator.generate_definition_statement("t", &Tree::immediate(3)),
        Err(CompilationError::DuplicateSymbol { .. })
    ));
}

#[test]
fn parameter_name_cannot_be_redefined_in_body() {
    let program = Program::new();
    let mut generator = program.generator();
    generator.begin_method("inc", &program.inc_params).unwrap();

    generator.begin_cond(&Tree::immediate(1)).unwrap();
    generator
        .generate_definition_statement("d", &Tree::immediate(1))
        .unwrap();
    generator.end_cond().unwrap();

    assert!(matches!(
        generator.generate_definition_statement("d", &Tree::immediate(1)),
        Err(CompilationError::DuplicateSymbol { ref name, .. }) if name == "d"
    ));
}

#[test]
fn member_and_method_may_share_a_name() {
    // class Box { size:int; size():int; get():int }
    let program = Program::new();
    let members = SymbolTable::from_symbols([Symbol::variable("size", ValueType::Int)]).unwrap();
    let methods = SymbolTable::from_symbols([
        Symbol::function("size", ValueType::Int, SymbolTable::new()),
        Symbol::function("get", ValueType::Int, SymbolTable::new()),
    ])
    .unwrap();

    let mut generator = CodeGenerator::new();
    generator
        .begin_class(&program.globals, "Box", &members, &methods)
        .unwrap();
    generator.begin_method("get", &program.none).unwrap();
    // return size + size()
    generator
        .generate_return_statement(&Tree::binary(
            OperatorKind::Add,
            Tree::variable("size"),
            Tree::call("size", vec![]),
        ))
        .unwrap();
    generator.end_method().unwrap();

    let module = finish(generator);
    let get = module.method("Box", "get").unwrap();
    assert_eq!(
        get.instructions(),
        &[
            Instruction::Memory(Address::Field(0)),
            Instruction::Call {
                target: SymbolHash::from_method(SymbolHash::from_class("Box"), "size"),
                argc: 0
            },
            Instruction::Add,
            Instruction::Return,
        ]
    );
}

#[test]
fn member_variable_does_not_hide_global_function() {
    // class Holder { f:int; get():int } calling the global f()
    let program = Program::new();
    let members = SymbolTable::from_symbols([Symbol::variable("f", ValueType::Int)]).unwrap();
    let methods =
        SymbolTable::from_symbols([Symbol::function("get", ValueType::Int, SymbolTable::new())])
            .unwrap();

    let mut generator = CodeGenerator::new();
    generator
        .begin_class(&program.globals, "Holder", &members, &methods)
        .unwrap();
    generator.begin_method("get", &program.none).unwrap();
    generator
        .generate_return_statement(&Tree::call("f", vec![]))
        .unwrap();
    generator.end_method().unwrap();

    let module = finish(generator);
    assert_eq!(
        module.method("Holder", "get").unwrap().instructions()[0],
        Instruction::Call {
            target: SymbolHash::from_function("f"),
            argc: 0
        }
    );
}

// =============================================================================
// Context balance
// =============================================================================

#[test]
fn end_class_inside_method_is_unbalanced() {
    let program = Program::new();
    let mut generator = program.generator();
    generator.begin_method("get", &program.none).unwrap();

    let err = generator.end_class().unwrap_err();
    assert!(matches!(err, CompilationError::UnbalancedContext { .. }));
    assert!(err.to_string().contains("method 'get'"));
}

#[test]
fn end_cond_without_cond_is_unbalanced() {
    let program = Program::new();
    let mut generator = program.generator();
    generator.begin_method("get", &program.none).unwrap();
    assert!(matches!(
        generator.end_cond(),
        Err(CompilationError::UnbalancedContext { .. })
    ));
}

// =============================================================================
// Guarded loops
// =============================================================================

#[test]
fn continue_resolves_to_innermost_loop() {
    let program = Program::new();
    let mut generator = program.generator();
    generator.begin_method("scan", &program.scan_params).unwrap();

    // while (limit > 0) {          0..3
    //   while (n > limit) {        4..7
    //     if (n) { continue }      8..10
    //     n = 0                    11..12
    //   }                          13: loop 4
    //   limit = 0                  14..15
    // }                            16: loop 0
    // return n                     17..18
    generator
        .begin_guarded(&Tree::binary(
            OperatorKind::Greater,
            Tree::variable("limit"),
            Tree::immediate(0),
        ))
        .unwrap();
    generator
        .begin_guarded(&Tree::binary(
            OperatorKind::Greater,
            Tree::variable("n"),
            Tree::variable("limit"),
        ))
        .unwrap();
    generator.begin_cond(&Tree::variable("n")).unwrap();
    generator.generate_continue_statement().unwrap();
    generator.end_cond().unwrap();
    generator
        .generate_assignment_statement("n", &Tree::immediate(0))
        .unwrap();
    generator.end_guarded(Guarded::Continue).unwrap();
    generator
        .generate_assignment_statement("limit", &Tree::immediate(0))
        .unwrap();
    generator.end_guarded(Guarded::Continue).unwrap();
    generator
        .generate_return_statement(&Tree::variable("n"))
        .unwrap();
    generator.end_method().unwrap();

    let module = finish(generator);
    let code = module.method("Counter", "scan").unwrap().instructions();

    assert_eq!(code[3], Instruction::JumpIfFalse(17));
    assert_eq!(code[7], Instruction::JumpIfFalse(14));
    assert_eq!(code[9], Instruction::JumpIfFalse(11));
    // continue inside the inner loop goes to the inner retest
    assert_eq!(code[10], Instruction::Loop(4));
    assert_eq!(code[13], Instruction::Loop(4));
    assert_eq!(code[16], Instruction::Loop(0));
    assert_eq!(code[18], Instruction::Return);
}

#[test]
fn break_leaves_loop() {
    let program = Program::new();
    let mut generator = program.generator();
    generator.begin_method("get", &program.none).unwrap();

    generator.begin_guarded(&Tree::immediate(1)).unwrap();
    generator.begin_cond(&Tree::variable("n")).unwrap();
    generator.generate_break_statement().unwrap();
    generator.end_cond().unwrap();
    generator.generate_break_statement().unwrap();
    generator.end_guarded(Guarded::Continue).unwrap();
    generator
        .generate_return_statement(&Tree::variable("n"))
        .unwrap();
    generator.end_method().unwrap();

    let module = finish(generator);
    let code = module.method("Counter", "get").unwrap().instructions();
    // 0 imm, 1 jif, 2 memory, 3 jif, 4 jump, 5 jump, 6 loop, 7 memory, 8 return
    assert_eq!(code[4], Instruction::Jump(7));
    assert_eq!(code[5], Instruction::Jump(7));
    assert_eq!(code[1], Instruction::JumpIfFalse(7));
    assert_eq!(code[6], Instruction::Loop(0));
    assert!(module.method("Counter", "get").unwrap().chunk.is_fully_patched());
}

#[test]
fn one_shot_guarded_block() {
    let program = Program::new();
    let mut generator = program.generator();
    generator.begin_method("get", &program.none).unwrap();
    generator.begin_guarded(&Tree::variable("n")).unwrap();
    generator
        .generate_assignment_statement("n", &Tree::immediate(0))
        .unwrap();
    generator.end_guarded(Guarded::Break).unwrap();
    generator
        .generate_return_statement(&Tree::variable("n"))
        .unwrap();
    generator.end_method().unwrap();

    let module = finish(generator);
    let code = module.method("Counter", "get").unwrap().instructions();
    assert_eq!(code[1], Instruction::JumpIfFalse(4));
    assert!(!code.iter().any(|i| matches!(i, Instruction::Loop(_))));
}

#[test]
fn break_outside_loop() {
    let program = Program::new();
    let mut generator = program.generator();
    generator.begin_method("get", &program.none).unwrap();
    generator.begin_cond(&Tree::immediate(1)).unwrap();
    assert!(matches!(
        generator.generate_break_statement(),
        Err(CompilationError::NoEnclosingLoop {
            statement: "break",
            ..
        })
    ));
}

#[test]
fn object_condition_rejected() {
    let program = Program::new();
    let mut generator = program.generator();
    generator.begin_method("get", &program.none).unwrap();
    assert!(matches!(
        generator.begin_guarded(&Tree::call("peer", vec![])),
        Err(CompilationError::InvalidCondition {
            found: ValueType::Object,
            ..
        })
    ));
}

// =============================================================================
// Expressions
// =============================================================================

#[test]
fn operands_evaluate_left_to_right() {
    let program = Program::new();
    let mut generator = program.generator();
    generator.begin_method("get", &program.none).unwrap();
    generator
        .generate_return_statement(&Tree::binary(
            OperatorKind::Add,
            Tree::call("f", vec![]),
            Tree::call("g", vec![]),
        ))
        .unwrap();
    generator.end_method().unwrap();

    let module = finish(generator);
    let code = module.method("Counter", "get").unwrap().instructions();
    assert_eq!(
        code,
        &[
            Instruction::Call {
                target: SymbolHash::from_function("f"),
                argc: 0
            },
            Instruction::Call {
                target: SymbolHash::from_function("g"),
                argc: 0
            },
            Instruction::Add,
            Instruction::Return,
        ]
    );
}

#[test]
fn arity_mismatch_emits_nothing_for_the_call() {
    let program = Program::new();
    let mut generator = program.generator();
    generator.begin_method("get", &program.none).unwrap();
    generator
        .generate_assignment_statement("n", &Tree::immediate(1))
        .unwrap();

    let result =
        generator.generate_expression_statement(&Tree::call("add", vec![Tree::immediate(1)]));
    match result {
        Err(CompilationError::ArityMismatch {
            name,
            expected,
            got,
            ..
        }) => {
            assert_eq!(name, "add");
            assert_eq!((expected, got), (2, 1));
        }
        other => panic!("expected ArityMismatch, got {:?}", other),
    }

    // The generator is aborted; nothing more is produced
    assert_eq!(generator.end_method(), Err(CompilationError::Aborted));
}

#[test]
fn method_calls_and_instantiation() {
    let program = Program::new();
    let mut generator = program.generator();
    generator.begin_method("get", &program.none).unwrap();
    generator
        .generate_definition_statement("node", &Tree::new_object(program.globals.get("Node").unwrap()))
        .unwrap();
    generator
        .generate_return_statement(&Tree::call("inc", vec![Tree::immediate(5)]))
        .unwrap();
    generator.end_method().unwrap();

    let module = finish(generator);
    let get = module.method("Counter", "get").unwrap();
    let inc = SymbolHash::from_method(program.counter(), "inc");
    assert_eq!(
        get.instructions(),
        &[
            Instruction::New(SymbolHash::from_class("Node")),
            Instruction::Store(Location::Register(0)),
            Instruction::Immediate(5),
            Instruction::Param(0),
            Instruction::Call {
                target: inc,
                argc: 1
            },
            Instruction::Return,
        ]
    );
    assert_eq!(get.frame_size, 1);

    let listing = module.disassemble(get);
    assert!(listing.contains("; Counter::inc"));
    assert!(listing.contains("; Node"));
}

#[test]
fn new_of_non_class_is_a_mismatch() {
    let program = Program::new();
    let mut generator = program.generator();
    generator.begin_method("get", &program.none).unwrap();
    let total = program.globals.get("total").unwrap();
    assert!(matches!(
        generator.generate_expression_statement(&Tree::new_object(total)),
        Err(CompilationError::TypeMismatch { .. })
    ));
}

#[test]
fn argument_limit_is_configurable() {
    let program = Program::new();
    let mut generator = CodeGenerator::with_config(GeneratorConfig::new().with_max_arguments(1));
    generator
        .begin_class(&program.globals, "Counter", &program.members, &program.methods)
        .unwrap();
    generator.begin_method("get", &program.none).unwrap();
    let call = Tree::call("add", vec![Tree::immediate(1), Tree::immediate(2)]);
    assert!(matches!(
        generator.generate_return_statement(&call),
        Err(CompilationError::TooManyArguments { max: 1, .. })
    ));
}

#[test]
fn module_records_classes_in_order() {
    let program = Program::new();
    let mut generator = program.generator();
    generator.end_class().unwrap();
    generator
        .begin_class(&program.globals, "Node", &program.none, &program.none)
        .unwrap();
    generator.end_class().unwrap();

    let module = generator.finish().unwrap();
    let names: Vec<_> = module.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Counter", "Node"]);
    assert_eq!(
        module.class("Counter").unwrap().members,
        vec![
            ("n".to_string(), ValueType::Int),
            ("d".to_string(), ValueType::Int)
        ]
    );
}
