// ABOUTME: Black-box tests driving full programs through run_source end to end

use lox_interpreter::{run_source, RunOutcome};

fn run(source: &str) -> (String, RunOutcome) {
    let mut out = Vec::new();
    let outcome = run_source(source, &mut out);
    (String::from_utf8(out).unwrap(), outcome)
}

fn assert_ok_output(source: &str, expected: &str) {
    let (out, outcome) = run(source);
    assert!(matches!(outcome, RunOutcome::Ok), "expected Ok, got a static/runtime error");
    assert_eq!(out, expected);
}

#[test]
fn arithmetic_and_print() {
    assert_ok_output("print 1 + 2 * 3 - 4 / 2;", "5\n");
}

#[test]
fn string_concatenation() {
    assert_ok_output(r#"print "foo" + "bar";"#, "foobar\n");
}

#[test]
fn variables_and_assignment() {
    assert_ok_output(
        r#"
        var a = 1;
        var b = 2;
        a = a + b;
        print a;
        "#,
        "3\n",
    );
}

#[test]
fn block_scoping_restores_outer_binding() {
    assert_ok_output(
        r#"
        var a = "outer";
        {
            var a = "inner";
            print a;
        }
        print a;
        "#,
        "inner\nouter\n",
    );
}

#[test]
fn if_else_branches() {
    assert_ok_output(
        r#"
        var n = 4;
        if (n > 3) {
            print "big";
        } else {
            print "small";
        }
        "#,
        "big\n",
    );
}

#[test]
fn while_loop_counts_up() {
    assert_ok_output(
        r#"
        var i = 0;
        while (i < 3) {
            print i;
            i = i + 1;
        }
        "#,
        "0\n1\n2\n",
    );
}

#[test]
fn for_loop_desugars_correctly() {
    assert_ok_output(
        r#"
        for (var i = 0; i < 3; i = i + 1) {
            print i;
        }
        "#,
        "0\n1\n2\n",
    );
}

#[test]
fn function_call_and_return() {
    assert_ok_output(
        r#"
        fun add(a, b) {
            return a + b;
        }
        print add(2, 3);
        "#,
        "5\n",
    );
}

#[test]
fn recursive_function() {
    assert_ok_output(
        r#"
        fun fib(n) {
            if (n <= 1) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fib(10);
        "#,
        "55\n",
    );
}

#[test]
fn closures_capture_their_declaration_environment() {
    assert_ok_output(
        r#"
        fun makeCounter() {
            var count = 0;
            fun increment() {
                count = count + 1;
                print count;
            }
            return increment;
        }
        var counter = makeCounter();
        counter();
        counter();
        counter();
        "#,
        "1\n2\n3\n",
    );
}

#[test]
fn closure_binds_the_scope_present_at_declaration_not_at_call() {
    assert_ok_output(
        r#"
        var a = "global";
        {
            fun showA() {
                print a;
            }
            showA();
            var a = "block";
            showA();
        }
        "#,
        "global\nglobal\n",
    );
}

#[test]
fn logical_and_or_short_circuit() {
    assert_ok_output(
        r#"
        print "hi" or 2;
        print nil or "yes";
        print false and "no";
        "#,
        "hi\nyes\nfalse\n",
    );
}

#[test]
fn clock_native_is_available_and_numeric() {
    let (out, outcome) = run("print clock() >= 0;");
    assert!(matches!(outcome, RunOutcome::Ok));
    assert_eq!(out, "true\n");
}

#[test]
fn undefined_variable_is_a_runtime_error() {
    let (_, outcome) = run("print undefinedThing;");
    assert!(matches!(outcome, RunOutcome::RuntimeError));
}

#[test]
fn type_mismatch_on_minus_is_a_runtime_error() {
    let (_, outcome) = run(r#"print "a" - 1;"#);
    assert!(matches!(outcome, RunOutcome::RuntimeError));
}

#[test]
fn unterminated_string_is_a_static_error() {
    let (_, outcome) = run("\"unterminated");
    assert!(matches!(outcome, RunOutcome::StaticError));
}

#[test]
fn missing_semicolon_is_a_static_error_and_does_not_execute() {
    let (out, outcome) = run(r#"print "never shown" print "also never";"#);
    assert!(matches!(outcome, RunOutcome::StaticError));
    assert!(out.is_empty());
}

#[test]
fn arity_mismatch_is_a_runtime_error() {
    let (_, outcome) = run(
        r#"
        fun add(a, b) { return a + b; }
        add(1);
        "#,
    );
    assert!(matches!(outcome, RunOutcome::RuntimeError));
}

#[test]
fn whole_number_results_print_without_a_trailing_decimal() {
    assert_ok_output("print 6 / 2;", "2\n");
}
