// tests/evaluator_tests.rs

use jql::cli::json_to_value;
use jql::{BindError, CompileError, EvalError, Expression, Registry, Value, compile, compile_with};
use serde_json::json;

fn eval(query: &str, input: Value) -> Result<Value, EvalError> {
    compile(query).unwrap().evaluate(&input)
}

fn eval_json(query: &str, input: serde_json::Value) -> Result<Value, EvalError> {
    eval(query, json_to_value(input))
}

fn compile_err(query: &str) -> CompileError {
    compile(query).unwrap_err()
}

fn strings(items: &[&str]) -> Value {
    Value::Array(items.iter().map(|s| Value::from(*s)).collect())
}

fn ints(items: &[i64]) -> Value {
    Value::Array(items.iter().map(|n| Value::Integer(*n)).collect())
}

// ============================================================================
// Identity and addressing
// ============================================================================

#[test]
fn test_identity() {
    let input = json_to_value(json!({"a": [1, 2]}));
    assert_eq!(eval("(id)", input.clone()), Ok(input));
}

#[test]
fn test_literal_ignores_input() {
    assert_eq!(eval(r#""x""#, Value::Null), Ok(Value::from("x")));
    assert_eq!(eval("7", Value::Null), Ok(Value::Integer(7)));
}

#[test]
fn test_field_and_index() {
    let input = json!({"a": ["x", "y"]});
    assert_eq!(eval_json(r#"("a" (1))"#, input.clone()), Ok(Value::from("y")));
    assert_eq!(eval_json(r#"(elem "a" (elem 0))"#, input), Ok(Value::from("x")));
}

#[test]
fn test_missing_field_and_index_are_null() {
    assert_eq!(eval_json(r#"("missing")"#, json!({"a": 1})), Ok(Value::Null));
    assert_eq!(eval_json("(5)", json!([1, 2])), Ok(Value::Null));
}

#[test]
fn test_leaf_not_applied_to_missing_element() {
    assert_eq!(
        eval_json(r#"("missing" (error "unreachable"))"#, json!({})),
        Ok(Value::Null)
    );
}

#[test]
fn test_position_type_mismatch() {
    assert!(matches!(eval_json("(0)", json!({"a": 1})), Err(EvalError::Type(_))));
    assert!(matches!(eval_json(r#"("a")"#, json!([1])), Err(EvalError::Type(_))));
    assert!(matches!(eval_json("(true)", json!([1])), Err(EvalError::Type(_))));
    assert!(matches!(eval_json("(null)", json!({})), Err(EvalError::Type(_))));
}

#[test]
fn test_float_position_is_rejected() {
    // Numbers from input are floats and cannot address an array.
    let input = json!({"i": 0, "items": ["a"]});
    assert!(matches!(
        eval_json(r#"(elem "items" (elem (pipe (id) 0)))"#, input.clone()),
        Ok(Value::String(_))
    ));
    assert!(matches!(
        eval_json(r#"(pipe ("i") (elem (id)))"#, input),
        Err(EvalError::Type(_))
    ));
}

#[test]
fn test_array_positions_broadcast() {
    let input = json!(["a", "b", "c"]);
    assert_eq!(eval_json("((array 2 0 7))", input), Ok(Value::Array(vec![
        Value::from("c"),
        Value::from("a"),
        Value::Null,
    ])));
}

#[test]
fn test_nested_positions_keep_shape() {
    let input = json!({"x": 1, "y": 2});
    let result = eval_json(r#"((array "x" (array "y" "x")))"#, input).unwrap();
    assert_eq!(
        result,
        Value::Array(vec![
            Value::Float(1.0),
            Value::Array(vec![Value::Float(2.0), Value::Float(1.0)])
        ])
    );
}

#[test]
fn test_object_positions_keep_keys() {
    let input = json!({"first": "a", "second": "b"});
    let result = eval_json(r#"((object "one" "first" "two" "second"))"#, input).unwrap();
    assert_eq!(result, json_to_value(json!({"one": "a", "two": "b"})));
}

#[test]
fn test_keys() {
    assert_eq!(eval_json("(keys)", json!(["a", "b", "c"])), Ok(ints(&[0, 1, 2])));
    assert_eq!(
        eval_json("(keys)", json!({"b": 1, "a": 2, "c": 3})),
        Ok(strings(&["a", "b", "c"]))
    );
    assert_eq!(eval_json("(keys)", json!([])), Ok(Value::Array(vec![])));
    assert!(matches!(eval_json("(keys)", json!("abc")), Err(EvalError::Type(_))));
}

#[test]
fn test_keys_as_positions() {
    let input = json!([{"n": 1}, {"n": 2}]);
    assert_eq!(
        eval_json(r#"((keys) ("n"))"#, input),
        Ok(Value::Array(vec![Value::Float(1.0), Value::Float(2.0)]))
    );
}

// ============================================================================
// Constructors
// ============================================================================

#[test]
fn test_array_and_object() {
    assert_eq!(eval("(array)", Value::Null), Ok(Value::Array(vec![])));
    assert_eq!(
        eval(r#"(object "a" "x" "b" (array true null))"#, Value::Null),
        Ok(json_to_value(json!({"a": "x", "b": [true, null]})))
    );
}

#[test]
fn test_object_last_write_wins() {
    assert_eq!(
        eval(r#"(object "a" 1 "a" 2)"#, Value::Null),
        Ok(Value::Object([("a".to_string(), Value::Integer(2))].into_iter().collect()))
    );
}

#[test]
fn test_object_dynamic_key_must_be_string() {
    assert_eq!(
        eval_json(r#"(object ("k") 1)"#, json!({"k": "name"})),
        Ok(Value::Object([("name".to_string(), Value::Integer(1))].into_iter().collect()))
    );
    assert!(matches!(
        eval_json(r#"(object ("k") 1)"#, json!({"k": 5})),
        Err(EvalError::Type(_))
    ));
}

#[test]
fn test_pipe() {
    let input = json!({"a": {"b": [10, 20]}});
    assert_eq!(
        eval_json(r#"(pipe ("a") ("b") (1))"#, input),
        Ok(Value::Float(20.0))
    );
    assert_eq!(eval("(pipe 1)", Value::Null), Ok(Value::Integer(1)));
}

#[test]
fn test_range() {
    assert_eq!(eval("(range 3)", Value::Null), Ok(ints(&[0, 1, 2])));
    assert_eq!(eval("(range 2 5)", Value::Null), Ok(ints(&[2, 3, 4])));
    assert_eq!(eval("(range 5 2)", Value::Null), Ok(Value::Array(vec![])));
    assert_eq!(eval("(range 0)", Value::Null), Ok(Value::Array(vec![])));
}

#[test]
fn test_range_rejects_float_bounds() {
    assert!(matches!(
        eval_json(r#"(range ("n"))"#, json!({"n": 3})),
        Err(EvalError::Type(_))
    ));
}

// ============================================================================
// Text
// ============================================================================

#[test]
fn test_sprintf() {
    let input = json!({"name": "Poland", "population": 38000000});
    assert_eq!(
        eval_json(r#"(sprintf "%s: %.1f (%d)" ("name") ("population") 7)"#, input),
        Ok(Value::from("Poland: 38000000.0 (7)"))
    );
}

#[test]
fn test_sprintf_missing_and_extra_arguments() {
    assert_eq!(
        eval(r#"(sprintf "%s and %s" "a")"#, Value::Null),
        Ok(Value::from("a and %s"))
    );
    assert_eq!(
        eval(r#"(sprintf "only %s" "a" "b")"#, Value::Null),
        Ok(Value::from("only a"))
    );
}

#[test]
fn test_sprintf_huge_width_or_precision_does_not_abort() {
    assert_eq!(
        eval_json(r#"(recover (sprintf "%.70000f" (id)))"#, json!(1.5)),
        Ok(Value::from("%.70000f"))
    );
    assert_eq!(
        eval_json(r#"(sprintf "[%1000000000000d]" (id))"#, json!(1)),
        Ok(Value::from("[%1000000000000d]"))
    );
}

#[test]
fn test_sprintf_dynamic_format_must_be_string() {
    assert!(matches!(
        eval_json(r#"(sprintf ("f"))"#, json!({"f": 1})),
        Err(EvalError::Type(_))
    ));
}

#[test]
fn test_join() {
    assert_eq!(eval(r#"(join (array "a" "b"))"#, Value::Null), Ok(Value::from("ab")));
    assert_eq!(
        eval(r#"(join (array 1 null true "x") "-")"#, Value::Null),
        Ok(Value::from("1-null-true-x"))
    );
    assert_eq!(eval(r#"(join "solo" ", ")"#, Value::Null), Ok(Value::from("solo")));
}

#[test]
fn test_join_float_text() {
    let input = json!([38000000, 0.5]);
    assert_eq!(
        eval_json(r#"(join (id) ",")"#, input),
        Ok(Value::from("3.8e+07,0.5"))
    );
}

#[test]
fn test_join_nested_values_as_json() {
    let input = json!([[1, 2], {"b": 1, "a": null}]);
    assert_eq!(
        eval_json(r#"(join (id) " ")"#, input),
        Ok(Value::from(r#"[1,2] {"a":null,"b":1}"#))
    );
}

#[test]
fn test_join_dynamic_separator_must_be_string() {
    assert!(matches!(
        eval_json(r#"(join (array "a") ("sep"))"#, json!({"sep": 1})),
        Err(EvalError::Type(_))
    ));
}

// ============================================================================
// Filtering and comparison
// ============================================================================

#[test]
fn test_filter() {
    let input = json!([1, 5, 10]);
    assert_eq!(
        eval_json("(filter (gt (id) 3))", input.clone()),
        Ok(Value::Array(vec![Value::Float(5.0), Value::Float(10.0)]))
    );
    assert_eq!(
        eval_json(r#"(filter (lt (id) 3) (sprintf "%.0f!" (id)))"#, input),
        Ok(strings(&["1!"]))
    );
}

#[test]
fn test_filter_requires_array() {
    assert!(matches!(
        eval_json("(filter true)", json!({"a": 1})),
        Err(EvalError::Type(_))
    ));
}

#[test]
fn test_eq() {
    assert_eq!(
        eval_json(r#"(eq ("n") ("m"))"#, json!({"n": 1, "m": 1.0})),
        Ok(Value::Boolean(true))
    );
    assert_eq!(eval(r#"(eq "1" 1)"#, Value::Null), Ok(Value::Boolean(false)));
    assert_eq!(eval("(eq null null)", Value::Null), Ok(Value::Boolean(true)));
    assert_eq!(
        eval(r#"(eq (object "a" 1 "b" 2) (object "b" 2 "a" 1))"#, Value::Null),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        eval(r#"(eq (array 1 2) (array 2 1))"#, Value::Null),
        Ok(Value::Boolean(false))
    );
}

#[test]
fn test_eq_keeps_number_kinds_apart() {
    // Input numbers are floats; integer literals come from the query.
    assert_eq!(eval_json("(eq (id) 3)", json!(3)), Ok(Value::Boolean(false)));
    assert_eq!(eval_json(r#"(eq ("n") 1)"#, json!({"n": 1})), Ok(Value::Boolean(false)));
    assert_eq!(eval("(eq 3 3)", Value::Null), Ok(Value::Boolean(true)));
    assert_eq!(
        eval_json("(eq (keys) (array 0 1))", json!(["a", "b"])),
        Ok(Value::Boolean(true))
    );
}

#[test]
fn test_lt_gt() {
    assert_eq!(eval(r#"(lt "abc" "abd")"#, Value::Null), Ok(Value::Boolean(true)));
    assert_eq!(eval(r#"(gt "b" "abc")"#, Value::Null), Ok(Value::Boolean(true)));
    assert_eq!(eval("(lt 1 1)", Value::Null), Ok(Value::Boolean(false)));
    assert_eq!(eval(r#"(lt 1 "2")"#, Value::Null), Ok(Value::Boolean(false)));
    assert_eq!(eval(r#"(gt 1 "0")"#, Value::Null), Ok(Value::Boolean(false)));
    assert_eq!(
        eval_json(r#"(gt ("n") 2)"#, json!({"n": 2.5})),
        Ok(Value::Boolean(true))
    );
}

// ============================================================================
// Logic
// ============================================================================

#[test]
fn test_truthiness() {
    for truthy in ["0", r#""""#, "(array)", "(object)", "true"] {
        let query = format!(r#"(ifte {} "yes" "no")"#, truthy);
        assert_eq!(eval(&query, Value::Null), Ok(Value::from("yes")), "{}", truthy);
    }
    for falsy in ["null", "false", r#"("missing")"#] {
        let query = format!(r#"(ifte {} "yes" "no")"#, falsy);
        assert_eq!(
            eval_json(&query, json!({})),
            Ok(Value::from("no")),
            "{}",
            falsy
        );
    }
}

#[test]
fn test_and_or_not() {
    assert_eq!(eval("(and)", Value::Null), Ok(Value::Boolean(true)));
    assert_eq!(eval("(or)", Value::Null), Ok(Value::Boolean(false)));
    assert_eq!(eval(r#"(and 1 "x")"#, Value::Null), Ok(Value::Boolean(true)));
    assert_eq!(eval("(or null false 0)", Value::Null), Ok(Value::Boolean(true)));
    assert_eq!(eval("(not null)", Value::Null), Ok(Value::Boolean(true)));
    assert_eq!(eval("(not 0)", Value::Null), Ok(Value::Boolean(false)));
}

#[test]
fn test_short_circuit() {
    assert_eq!(
        eval(r#"(and false (error "boom"))"#, Value::Null),
        Ok(Value::Boolean(false))
    );
    assert_eq!(
        eval(r#"(or true (error "boom"))"#, Value::Null),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        eval(r#"(and true (error "boom"))"#, Value::Null),
        Err(EvalError::User("boom".to_string()))
    );
}

#[test]
fn test_ifte_evaluates_one_branch() {
    assert_eq!(
        eval(r#"(ifte true 1 (error "else"))"#, Value::Null),
        Ok(Value::Integer(1))
    );
    assert_eq!(
        eval(r#"(ifte false (error "then") 2)"#, Value::Null),
        Ok(Value::Integer(2))
    );
}

// ============================================================================
// Errors and recovery
// ============================================================================

#[test]
fn test_error() {
    let err = eval(r#"(error "bad input")"#, Value::Null).unwrap_err();
    assert_eq!(err, EvalError::User("bad input".to_string()));
    assert_eq!(err.to_string(), "error: bad input");

    assert_eq!(
        eval("(error (array 1 2))", Value::Null),
        Err(EvalError::User("[1,2]".to_string()))
    );
}

#[test]
fn test_recover() {
    assert_eq!(eval(r#"(recover (error "x"))"#, Value::Null), Ok(Value::Null));
    assert_eq!(eval("(recover 5)", Value::Null), Ok(Value::Integer(5)));
    assert_eq!(eval_json("(recover (keys))", json!(1)), Ok(Value::Null));
}

#[test]
fn test_recover_is_local() {
    let input = json!([{"n": 1}, "oops", {"n": 3}]);
    assert_eq!(
        eval_json(r#"((keys) (recover ("n")))"#, input),
        Ok(Value::Array(vec![Value::Float(1.0), Value::Null, Value::Float(3.0)]))
    );
}

#[test]
fn test_error_propagates_through_pipe() {
    assert!(matches!(
        eval_json(r#"(pipe ("a") (keys) (array 1))"#, json!({"a": true})),
        Err(EvalError::Type(_))
    ));
}

// ============================================================================
// Compilation
// ============================================================================

#[test]
fn test_unknown_function() {
    assert_eq!(
        compile_err("(array (frobnicate))"),
        CompileError::Bind(BindError::UnknownFunction {
            name: "frobnicate".to_string()
        })
    );
}

#[test]
fn test_arity_errors() {
    for query in [
        "(not)",
        "(eq 1)",
        "(ifte 1 2)",
        "(id 1)",
        "(keys 1)",
        "(elem)",
        "(elem 1 2 3)",
        "(range)",
        "(pipe)",
        "(sprintf)",
        r#"(object "a")"#,
        "(recover)",
        "(error)",
    ] {
        assert!(
            matches!(compile(query), Err(CompileError::Bind(BindError::Arity { .. }))),
            "{}",
            query
        );
    }
}

#[test]
fn test_arity_message() {
    assert_eq!(
        compile_err("(eq 1)").to_string(),
        "bind error: eq expects 2 argument(s), got 1"
    );
}

#[test]
fn test_shape_errors() {
    for query in [
        "(object 1 2)",
        "(sprintf 1)",
        "(join (id) 1)",
        r#"(range "a")"#,
        r#"(range 0 "b")"#,
    ] {
        assert!(
            matches!(compile(query), Err(CompileError::Bind(BindError::Shape { .. }))),
            "{}",
            query
        );
    }
}

#[test]
fn test_lex_and_parse_errors() {
    assert!(matches!(compile("(id"), Err(CompileError::Parse(_))));
    assert!(matches!(compile(r#"("abc"#), Err(CompileError::Lex(_))));
    assert!(compile("(").unwrap_err().to_string().starts_with("parse error: "));
}

#[test]
fn test_compile_with_custom_registry() {
    let mut registry = Registry::new();
    registry.register("self", Registry::standard().get("id").unwrap());

    let query = compile_with("(self)", &registry).unwrap();
    assert_eq!(query.evaluate(&Value::Integer(3)), Ok(Value::Integer(3)));
    assert!(matches!(
        compile_with("(keys)", &registry),
        Err(CompileError::Bind(BindError::UnknownFunction { .. }))
    ));
}

#[test]
fn test_compiled_query_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Expression>();

    let query = compile(r#"(sprintf "%d" (id))"#).unwrap();
    std::thread::scope(|scope| {
        for n in 0..4 {
            let query = &query;
            scope.spawn(move || {
                assert_eq!(
                    query.evaluate(&Value::Integer(n)),
                    Ok(Value::from(n.to_string()))
                );
            });
        }
    });
}

#[test]
fn test_evaluation_is_repeatable() {
    let query = compile(r#"(object "k" (keys))"#).unwrap();
    let input = json_to_value(json!({"z": 1, "y": 2}));
    let first = query.evaluate(&input).unwrap();
    assert_eq!(query.evaluate(&input).unwrap(), first);
    assert_eq!(jql::evaluate(&query, &input).unwrap(), first);
}
