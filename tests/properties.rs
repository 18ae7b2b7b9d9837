//! Universal invariants and boundary behaviors, exercised as ordinary
//! `#[test]` functions over hand-picked sample inputs.

use parsley::adapters::Adapters;
use parsley::environment::Environment;
use parsley::interpreter::Interpreter;
use parsley::lexer::Lexer;
use parsley::parser::Parser;
use parsley::value::Value;
use std::rc::Rc;

fn run(src: &str) -> Value {
    let tokens = Lexer::new(src, "prop.pars").lex().expect("lex");
    let program = Parser::new(tokens, "prop.pars").parse_program().expect("parse");
    let adapters = Adapters::native(vec![], vec![], vec![]);
    let global = Environment::root("prop.pars", Rc::new(adapters));
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
                other => panic!("expected integer, got {other:?}"),
            })
            .collect(),
        other => panic!("expected array, got {other:?}"),
    }
}

fn as_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => panic!("expected string, got {other:?}"),
    }
}

// -- universal invariants -----------------------------------------------

#[test]
fn array_reverse_is_its_own_inverse() {
    let result = run("let a = [1,2,3,4]; a.reverse().reverse()");
    assert_eq!(ints(&result), vec![1, 2, 3, 4]);
}

#[test]
fn array_sort_is_non_decreasing_and_a_permutation() {
    let result = run("[3,1,4,1,5,9,2,6].sort()");
    let sorted = ints(&result);
    assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
    let mut expected = vec![3, 1, 4, 1, 5, 9, 2, 6];
    expected.sort();
    assert_eq!(sorted, expected);
}

#[test]
fn string_split_join_round_trips_when_separator_present() {
    let result = run(r#""a,b,c".split(",").join(",")"#);
    assert_eq!(as_string(&result), "a,b,c");
}

#[test]
fn string_split_join_round_trips_when_separator_absent() {
    let result = run(r#""abc".split(",").join(",")"#);
    assert_eq!(as_string(&result), "abc");
}

#[test]
fn dictionary_method_resolves_this_to_the_defining_dictionary() {
    let result = run(
        r#"
        let d = {x: 10, getX: fn() { return this.x; }};
        d.getX()
        "#,
    );
    assert!(matches!(result, Value::Integer(10)));
}

#[test]
fn null_method_call_with_arguments_propagates_null() {
    let result = run("null.add(1, 2, 3)");
    assert!(matches!(result, Value::Null));
}

#[test]
fn path_cleaning_is_idempotent() {
    let result = run(r#"let p = @/a/b/../c/./; (@/a/b/../c/./).string == p.string"#);
    assert!(matches!(result, Value::Boolean(true)));
}

// -- boundary behaviors ---------------------------------------------------

#[test]
fn empty_array_join_is_empty_string() {
    let result = run("[].join(\",\")");
    assert_eq!(as_string(&result), "");
}

#[test]
fn chunking_by_zero_is_an_error() {
    let tokens = Lexer::new("[1,2,3] / 0", "prop.pars").lex().unwrap();
    let program = Parser::new(tokens, "prop.pars").parse_program().unwrap();
    let adapters = Adapters::native(vec![], vec![], vec![]);
    let global = Environment::root("prop.pars", Rc::new(adapters));
    let interpreter = Interpreter::new(global);
    assert!(interpreter.run(&program).is_err());
}

#[test]
fn full_slice_with_missing_bounds_is_a_copy() {
    let result = run("let a = [1,2,3]; a[:]");
    assert_eq!(ints(&result), vec![1, 2, 3]);
}

#[test]
fn negative_repetition_count_is_empty_string() {
    let result = run(r#""ab" * -1"#);
    assert_eq!(as_string(&result), "");
}

#[test]
fn empty_string_full_slice_is_empty_string() {
    let result = run(r#""" [:]"#);
    assert_eq!(as_string(&result), "");
}

#[test]
fn partial_slice_respects_both_bounds() {
    let result = run("let a = [1,2,3,4,5]; a[1:3]");
    assert_eq!(ints(&result), vec![2, 3]);
}

#[test]
fn negative_slice_bounds_count_from_the_end() {
    let result = run("let a = [1,2,3,4,5]; a[-2:]");
    assert_eq!(ints(&result), vec![4, 5]);
}

#[test]
fn slice_with_start_past_end_is_empty() {
    let result = run("let a = [1,2,3]; a[5:1]");
    assert_eq!(ints(&result), vec![]);
}

#[test]
fn string_slice_operates_on_runes_not_bytes() {
    let result = run(r#""héllo"[0:2]"#);
    assert_eq!(as_string(&result), "hé");
}

#[test]
fn leap_day_datetime_literal_is_valid() {
    let result = run("@2024-02-29.year");
    assert!(matches!(result, Value::Integer(2024)));
}

#[test]
fn invalid_calendar_day_is_an_invalid_literal_error() {
    let tokens = Lexer::new("@2024-02-30", "prop.pars").lex();
    if let Ok(tokens) = tokens {
        let program = Parser::new(tokens, "prop.pars").parse_program();
        if let Ok(program) = program {
            let adapters = Adapters::native(vec![], vec![], vec![]);
            let global = Environment::root("prop.pars", Rc::new(adapters));
            let interpreter = Interpreter::new(global);
            assert!(interpreter.run(&program).is_err());
            return;
        }
    }
    // lexing/parsing itself rejecting the malformed literal also satisfies
    // the invariant: @2024-02-30 never produces a usable datetime.
}

#[test]
fn descending_range_counts_down() {
    let result = run("5..1");
    assert_eq!(ints(&result), vec![5, 4, 3, 2, 1]);
}

#[test]
fn single_element_range_is_a_singleton() {
    let result = run("3..3");
    assert_eq!(ints(&result), vec![3]);
}
