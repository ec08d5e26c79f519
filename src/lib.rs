// ABOUTME: Library surface tying scanner/parser/resolver/interpreter into a driver

pub mod ast;
pub mod config;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod token;
pub mod value;

use error::ErrorReporter;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;
use std::io::Write;

/// Outcome of running one chunk of source through the whole pipeline.
pub enum RunOutcome {
    Ok,
    StaticError,
    RuntimeError,
}

/// Runs the scan -> parse -> resolve -> interpret pipeline over `source`, writing
/// `print` output to `stdout`. Static errors (lex/parse/resolve) skip execution
/// entirely; a runtime error aborts execution at the point it occurs. Returns which
/// phase (if any) failed so the driver shell can pick an exit code.
pub fn run_source(source: &str, stdout: &mut dyn Write) -> RunOutcome {
    let mut reporter = ErrorReporter::new();

    let tokens = Scanner::new(source, &mut reporter).scan_tokens();
    let statements = Parser::new(tokens, &mut reporter).parse();

    if reporter.had_error() {
        return RunOutcome::StaticError;
    }

    let locals = Resolver::new(&mut reporter).resolve(&statements);

    if reporter.had_error() {
        return RunOutcome::StaticError;
    }

    let mut interpreter = Interpreter::new(locals, stdout);
    match interpreter.interpret(&statements) {
        Ok(()) => RunOutcome::Ok,
        Err(err) => {
            reporter.runtime_error(&err);
            RunOutcome::RuntimeError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> (String, bool, bool) {
        let mut out = Vec::new();
        let outcome = run_source(source, &mut out);
        let (is_static, is_runtime) = match outcome {
            RunOutcome::Ok => (false, false),
            RunOutcome::StaticError => (true, false),
            RunOutcome::RuntimeError => (false, true),
        };
        (String::from_utf8(out).unwrap(), is_static, is_runtime)
    }

    #[test]
    fn full_pipeline_happy_path() {
        let (out, is_static, is_runtime) = run("print 1 + 2 * 3;");
        assert!(!is_static && !is_runtime);
        assert_eq!(out, "7\n");
    }

    #[test]
    fn unterminated_string_is_a_static_error() {
        let (_, is_static, _) = run("\"unterminated");
        assert!(is_static);
    }

    #[test]
    fn runtime_type_error_is_reported_as_runtime() {
        let (_, is_static, is_runtime) = run("print \"a\" - 1;");
        assert!(!is_static);
        assert!(is_runtime);
    }
}
