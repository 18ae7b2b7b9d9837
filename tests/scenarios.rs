//! End-to-end scripts lexed, parsed, and evaluated through the public
//! `Interpreter` API, matching the worked examples that justify operator
//! dispatch, pattern matching, and null propagation.

use parsley::adapters::Adapters;
use parsley::environment::Environment;
use parsley::interpreter::Interpreter;
use parsley::lexer::Lexer;
use parsley::parser::Parser;
use parsley::value::Value;
use std::rc::Rc;

fn run(src: &str) -> Value {
    run_with_adapters(src, Adapters::native(vec![], vec![], vec![]))
}

fn run_with_adapters(src: &str, adapters: Adapters) -> Value {
    let tokens = Lexer::new(src, "scenario.pars").lex().expect("lex");
    let program = Parser::new(tokens, "scenario.pars").parse_program().expect("parse");
    let global = Environment::root("scenario.pars", Rc::new(adapters));
    let interpreter = Interpreter::new(global);
    interpreter.run(&program).expect("run")
}

fn ints(v: &Value) -> Vec<i64> {
    match v {
        Value::Array(a) => a
            .borrow()
            .iter()
            .map(|x| match x {
                Value::Integer(n) => *n,
                Value::Array(_) => panic!("nested array where integer expected"),
                other => panic!("expected integer, got {other:?}"),
            })
            .collect(),
        other => panic!("expected array, got {other:?}"),
    }
}

#[test]
fn scenario_destructured_file_read_binds_error_on_missing_path() {
    let (global, interpreter) = {
        let adapters = Adapters::native(vec![], vec![], vec![]);
        let global = Environment::root("scenario.pars", Rc::new(adapters));
        (global.clone(), Interpreter::new(global))
    };
    let tokens = Lexer::new(
        r#"let {data, error} <== @/nonexistent.json; data"#,
        "scenario.pars",
    )
    .lex()
    .unwrap();
    let program = Parser::new(tokens, "scenario.pars").parse_program().unwrap();
    let result = interpreter.run(&program).unwrap();
    assert!(matches!(result, Value::Null));

    let error = global.get("error").expect("error should be bound");
    match error {
        Value::String(s) => assert!(s.contains("failed to read"), "unexpected error message: {s}"),
        other => panic!("expected error to be a string, got {other:?}"),
    }
}

#[test]
fn scenario_arithmetic_on_arrays() {
    let result = run(
        r#"
        let a = [1,2,3]; let b = [2,3,4];
        [a && b, a || b, a - b, a ++ b, a * 2, a / 2]
        "#,
    );
    let Value::Array(outer) = result else { panic!("expected array") };
    let outer = outer.borrow();
    assert_eq!(ints(&outer[0]), vec![2, 3]);
    assert_eq!(ints(&outer[1]), vec![1, 2, 3, 4]);
    assert_eq!(ints(&outer[2]), vec![1]);
    assert_eq!(ints(&outer[3]), vec![1, 2, 3, 2, 3, 4]);
    assert_eq!(ints(&outer[4]), vec![1, 2, 3, 1, 2, 3]);
    match &outer[5] {
        Value::Array(chunks) => {
            let chunks = chunks.borrow();
            assert_eq!(ints(&chunks[0]), vec![1, 2]);
            assert_eq!(ints(&chunks[1]), vec![3]);
        }
        other => panic!("expected chunked array, got {other:?}"),
    }
}

#[test]
fn scenario_datetime_kind_preservation() {
    let result = run(
        r#"
        [(@2024-12-25 + 86400).kind, (@2024-12-25T14:30:00 + @1h).kind, (@12:30 + 3600).kind]
        "#,
    );
    let Value::Array(kinds) = result else { panic!("expected array") };
    let kinds = kinds.borrow();
    let as_str = |v: &Value| match v {
        Value::String(s) => s.clone(),
        other => panic!("expected string, got {other:?}"),
    };
    assert_eq!(as_str(&kinds[0]), "date");
    assert_eq!(as_str(&kinds[1]), "datetime");
    assert_eq!(as_str(&kinds[2]), "time");
}

#[test]
fn scenario_module_export_hides_unexported_bindings() {
    let dir = std::env::temp_dir().join(format!("parsley-scenario-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let module_path = dir.join("m.pars");
    std::fs::write(&module_path, "export let add = fn(a,b){a+b}\nlet secret = 42\n").unwrap();
    let main_path = dir.join("main.pars");
    std::fs::write(&main_path, "import m \"m.pars\";\n[m.add(2,3), m.secret]\n").unwrap();

    let adapters = Adapters::native(vec![dir.clone()], vec![], vec![dir.clone()]);
    let tokens = Lexer::new(&std::fs::read_to_string(&main_path).unwrap(), main_path.to_string_lossy().to_string())
        .lex()
        .unwrap();
    let program = Parser::new(tokens, main_path.to_string_lossy().to_string()).parse_program().unwrap();
    let global = Environment::root(main_path.to_string_lossy().to_string(), Rc::new(adapters));
    let interpreter = Interpreter::new(global);
    let result = interpreter.run(&program).unwrap();

    assert_eq!(ints(&result), vec![5]);
    let Value::Array(items) = result else { unreachable!() };
    assert!(matches!(items.borrow()[1], Value::Null));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn scenario_regex_destructuring() {
    let result = run(
        r#"
        let [full, user, domain] = "a@b.com" ~ /(\w+)@([\w.]+)/;
        [user, domain]
        "#,
    );
    let Value::Array(items) = result else { panic!("expected array") };
    let items = items.borrow();
    let as_str = |v: &Value| match v {
        Value::String(s) => s.clone(),
        other => panic!("expected string, got {other:?}"),
    };
    assert_eq!(as_str(&items[0]), "a");
    assert_eq!(as_str(&items[1]), "b.com");
}

#[test]
fn scenario_null_propagation_through_missing_dict_field_and_method_chain() {
    let result = run(
        r#"
        let d = {a: 1};
        [d.b.toUpper(), d.b.split(",").reverse()]
        "#,
    );
    let Value::Array(items) = result else { panic!("expected array") };
    let items = items.borrow();
    assert!(matches!(items[0], Value::Null));
    assert!(matches!(items[1], Value::Null));
}
