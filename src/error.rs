// ABOUTME: Diagnostic types and the error reporter shared by every compiler phase

use crate::token::{Token, TokenKind};
use thiserror::Error;

/// Runtime errors raised while evaluating a resolved program.
///
/// Each variant carries the source line of the token responsible, so the reporter can
/// print `[line N] Error: MESSAGE` the way golox's runtime errors do.
#[derive(Error, Debug, Clone)]
pub enum RuntimeError {
    #[error("Operand must be a number.")]
    OperandMustBeNumber { line: usize },

    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers { line: usize },

    #[error("Operands must be two numbers or two strings.")]
    OperandsMustBeNumbersOrStrings { line: usize },

    #[error("Undefined variable '{name}'.")]
    UndefinedVariable { name: String, line: usize },

    #[error("Can only call functions and classes.")]
    NotCallable { line: usize },

    #[error("Expected {expected} arguments but got {actual}.")]
    ArityMismatch {
        expected: usize,
        actual: usize,
        line: usize,
    },
}

impl RuntimeError {
    pub fn line(&self) -> usize {
        match self {
            RuntimeError::OperandMustBeNumber { line }
            | RuntimeError::OperandsMustBeNumbers { line }
            | RuntimeError::OperandsMustBeNumbersOrStrings { line }
            | RuntimeError::UndefinedVariable { line, .. }
            | RuntimeError::NotCallable { line }
            | RuntimeError::ArityMismatch { line, .. } => *line,
        }
    }
}

/// Collects lex/parse/resolve diagnostics and tracks the sticky "had an error this
/// run" flags the driver shell needs. A fresh `ErrorReporter` is created
/// per REPL line so errors do not carry over between prompts.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    had_error: bool,
    had_runtime_error: bool,
}

impl ErrorReporter {
    pub fn new() -> Self {
        ErrorReporter::default()
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }


    /// Reports a static diagnostic bound to a source line (scanner/resolver errors).
    pub fn error_at_line(&mut self, line: usize, message: &str) {
        self.report(line, "", message);
    }

    /// Reports a static diagnostic bound to a token (parser errors).
    pub fn error_at_token(&mut self, token: &Token, message: &str) {
        if token.kind == TokenKind::Eof {
            self.report(token.line, " at end", message);
        } else {
            self.report(token.line, &format!(" at '{}'", token.lexeme), message);
        }
    }

    /// Reports a runtime error surfaced by the interpreter.
    pub fn runtime_error(&mut self, err: &RuntimeError) {
        eprintln!("[line {}] {}", err.line(), err);
        self.had_runtime_error = true;
    }

    fn report(&mut self, line: usize, where_: &str, message: &str) {
        eprintln!("[line {}] Error{}: {}", line, where_, message);
        self.had_error = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_reporter_has_no_errors() {
        let reporter = ErrorReporter::new();
        assert!(!reporter.had_error());
        assert!(!reporter.had_runtime_error());
    }

    #[test]
    fn error_at_line_sets_had_error() {
        let mut reporter = ErrorReporter::new();
        reporter.error_at_line(3, "Unexpected character.");
        assert!(reporter.had_error());
        assert!(!reporter.had_runtime_error());
    }
}
