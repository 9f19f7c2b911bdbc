// ABOUTME: End-to-end tests running full programs through the reader and evaluator together

use little_scheme::env::Environment;
use little_scheme::eval::eval;
use little_scheme::reader::read_all;
use little_scheme::value::Value;
use std::rc::Rc;

fn setup() -> Rc<Environment> {
    let env = Environment::new();
    little_scheme::builtins::register_builtins(&env);
    env
}

fn run_all(env: &Rc<Environment>, src: &str) -> Value {
    let forms = read_all(src).expect("source should parse");
    let mut result = Value::Unit;
    for form in forms {
        result = eval(form, env.clone()).expect("evaluation should succeed");
    }
    result
}

#[test]
fn factorial() {
    let env = setup();
    let result = run_all(
        &env,
        "(define fact (lambda (n) (if (= n 0) 1 (* n (fact (- n 1)))))) (fact 10)",
    );
    assert_eq!(result.to_string(), "3628800");
}

#[test]
fn map_over_a_list() {
    let env = setup();
    let result = run_all(
        &env,
        "(define (map f xs)
           (if (null? xs) '() (cons (f (car xs)) (map f (cdr xs)))))
         (map (lambda (x) (* x x)) '(1 2 3 4))",
    );
    assert_eq!(result.to_string(), "(1 4 9 16)");
}

#[test]
fn call_cc_non_local_escape() {
    let env = setup();
    let result = run_all(&env, "(+ 1 (call/cc (lambda (k) (+ 2 (k 10)))))");
    assert_eq!(result.to_string(), "11");
}

#[test]
fn call_cc_stored_and_reinvoked_later() {
    let env = setup();
    run_all(&env, "(define c #f)");
    run_all(&env, "(+ 1 (call/cc (lambda (k) (set! c k) 0)))");
    let result = run_all(&env, "(c 99)");
    assert_eq!(result.to_string(), "100");
}

#[test]
fn apply_spreads_a_list_of_arguments() {
    let env = setup();
    let result = run_all(&env, "(apply + '(1 2))");
    assert_eq!(result.to_string(), "3");
}

#[test]
fn nested_define_shadows_locally() {
    let env = setup();
    let result = run_all(
        &env,
        "(define x 1) (define (f) (define x 2) x) (f) x",
    );
    assert_eq!(result.to_string(), "1");
}

#[test]
fn tail_calls_run_in_bounded_space() {
    let env = setup();
    let result = run_all(
        &env,
        "(define loop (lambda (n) (if (= n 0) 'done (loop (- n 1))))) (loop 1000000)",
    );
    assert_eq!(result.to_string(), "done");
}

#[test]
fn begin_and_lambda_wrapping_are_transparent() {
    let env = setup();
    assert_eq!(run_all(&env, "5"), run_all(&env, "(begin 5)"));
    assert_eq!(run_all(&env, "5"), run_all(&env, "((lambda () 5))"));
}

#[test]
fn symbol_literals_are_eq() {
    let env = setup();
    let result = run_all(&env, "(eq? 'abc 'abc)");
    assert_eq!(result.to_string(), "#t");
}

#[test]
fn globals_lists_registered_builtins() {
    let env = setup();
    let result = run_all(&env, "(globals)");
    let names: Vec<String> = result
        .list_to_vec()
        .unwrap()
        .iter()
        .map(|v| v.to_string())
        .collect();
    assert!(names.contains(&"car".to_string()));
    assert!(names.contains(&"call/cc".to_string()));
}

#[test]
fn undefined_variable_is_reported_as_unbound() {
    let env = setup();
    let form = read_all("this-is-not-defined").unwrap().remove(0);
    let err = eval(form, env).unwrap_err();
    assert_eq!(err.kind(), "Unbound variable");
}

#[test]
fn calling_a_non_procedure_is_a_type_error() {
    let env = setup();
    let form = read_all("(5 6 7)").unwrap().remove(0);
    let err = eval(form, env).unwrap_err();
    assert_eq!(err.kind(), "Type");
}
