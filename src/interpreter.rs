// ABOUTME: Tree-walking evaluator: executes statements against an environment chain

use crate::ast::{Expr, Literal, NodeId, Stmt};
use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::token::TokenKind;
use crate::value::{Callable, LoxFunction, Native, Value};
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;
use std::time::Instant;

/// Unwinds a `return` statement up to the nearest enclosing function call frame,
/// or carries a runtime error up to `Interpreter::interpret`'s catch point. Neither
/// variant is allowed to escape those two catch points.
pub enum Unwind {
    Error(RuntimeError),
    Return(Value),
}

impl From<RuntimeError> for Unwind {
    fn from(err: RuntimeError) -> Self {
        Unwind::Error(err)
    }
}

type EvalResult<T> = Result<T, Unwind>;

pub struct Interpreter<'out> {
    pub globals: Rc<Environment>,
    environment: Rc<Environment>,
    locals: HashMap<NodeId, usize>,
    stdout: &'out mut dyn Write,
}

impl<'out> Interpreter<'out> {
    pub fn new(locals: HashMap<NodeId, usize>, stdout: &'out mut dyn Write) -> Self {
        let globals = Environment::new_global();
        register_natives(&globals);
        Interpreter {
            environment: globals.clone(),
            globals,
            locals,
            stdout,
        }
    }

    /// Executes a resolved program. Runtime errors abort the run at the point they
    /// occur and are returned to the caller, which reports them and sets
    /// `had_runtime_error`.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in statements {
            match self.execute(stmt) {
                Ok(()) => {}
                Err(Unwind::Error(err)) => return Err(err),
                // A `return` outside any function body cannot occur: the parser only
                // accepts `return` inside a function's block, and the resolver does
                // not otherwise reach this call boundary.
                Err(Unwind::Return(_)) => return Ok(()),
            }
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> EvalResult<()> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.stdout, "{}", value).expect("stdout write failed");
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.define(name.lexeme.clone(), value);
                Ok(())
            }
            Stmt::Block(statements) => {
                let enclosing = Environment::with_parent(self.environment.clone());
                self.execute_block(statements, enclosing)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }
            Stmt::Function(decl) => {
                let function = LoxFunction {
                    declaration: decl.clone(),
                    closure: self.environment.clone(),
                };
                self.environment.define(
                    decl.name.lexeme.clone(),
                    Value::Callable(Callable::Function(Rc::new(function))),
                );
                Ok(())
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Err(Unwind::Return(value))
            }
        }
    }

    /// Executes a block's statements in a fresh child environment, restoring the
    /// previous one on every exit path, including error/return unwinding, since the
    /// environment swap happens via RAII-style save/restore before `?` can propagate.
    fn execute_block(&mut self, statements: &[Stmt], new_env: Rc<Environment>) -> EvalResult<()> {
        let previous = std::mem::replace(&mut self.environment, new_env);
        let result = (|| {
            for stmt in statements {
                self.execute(stmt)?;
            }
            Ok(())
        })();
        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal(lit) => Ok(literal_value(lit)),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Unary { op, operand } => {
                let right = self.evaluate(operand)?;
                match op.kind {
                    TokenKind::Bang => Ok(Value::Bool(!right.is_truthy())),
                    TokenKind::Minus => match right {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        _ => Err(RuntimeError::OperandMustBeNumber { line: op.line }.into()),
                    },
                    _ => unreachable!("parser only produces ! and - as unary operators"),
                }
            }
            Expr::Binary { left, op, right } => self.evaluate_binary(left, op, right),
            Expr::Logical { left, op, right } => {
                let left_val = self.evaluate(left)?;
                // Short-circuit: the operand value itself is returned, not a
                // coerced boolean.
                match op.kind {
                    TokenKind::Or if left_val.is_truthy() => Ok(left_val),
                    TokenKind::And if !left_val.is_truthy() => Ok(left_val),
                    _ => self.evaluate(right),
                }
            }
            Expr::Variable { id, name } => self.lookup_variable(*id, &name.lexeme, name.line),
            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;
                match self.locals.get(id) {
                    Some(&distance) => {
                        self.environment
                            .assign_at(distance, &name.lexeme, value.clone());
                    }
                    None => {
                        self.globals
                            .assign(&name.lexeme, value.clone(), name.line)?;
                    }
                }
                Ok(value)
            }
            Expr::Call { callee, paren, args } => self.evaluate_call(callee, paren.line, args),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, op: &crate::token::Token, right: &Expr) -> EvalResult<Value> {
        // Strict left-to-right evaluation.
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;
        let line = op.line;

        use TokenKind::*;
        match op.kind {
            EqualEqual => Ok(Value::Bool(left.is_equal(&right))),
            BangEqual => Ok(Value::Bool(!left.is_equal(&right))),
            Plus => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}"))),
                _ => Err(RuntimeError::OperandsMustBeNumbersOrStrings { line }.into()),
            },
            Minus | Star | Slash | Greater | GreaterEqual | Less | LessEqual => {
                match (&left, &right) {
                    (Value::Number(a), Value::Number(b)) => Ok(match op.kind {
                        Minus => Value::Number(a - b),
                        Star => Value::Number(a * b),
                        Slash => Value::Number(a / b),
                        Greater => Value::Bool(a > b),
                        GreaterEqual => Value::Bool(a >= b),
                        Less => Value::Bool(a < b),
                        LessEqual => Value::Bool(a <= b),
                        _ => unreachable!(),
                    }),
                    _ => Err(RuntimeError::OperandsMustBeNumbers { line }.into()),
                }
            }
            _ => unreachable!("parser only produces comparison/arithmetic/equality operators here"),
        }
    }

    fn evaluate_call(&mut self, callee: &Expr, line: usize, arg_exprs: &[Expr]) -> EvalResult<Value> {
        let callee = self.evaluate(callee)?;
        let mut args = Vec::with_capacity(arg_exprs.len());
        for arg in arg_exprs {
            args.push(self.evaluate(arg)?);
        }

        let callable = match callee {
            Value::Callable(c) => c,
            _ => return Err(RuntimeError::NotCallable { line }.into()),
        };

        if args.len() != callable.arity() {
            return Err(RuntimeError::ArityMismatch {
                expected: callable.arity(),
                actual: args.len(),
                line,
            }
            .into());
        }

        match callable {
            Callable::Native(native) => Ok((native.func)(&args)?),
            Callable::Function(function) => self.call_function(&function, args),
        }
    }

    /// Invokes a user function: the call frame's parent is the function's captured
    /// environment, *not* the caller's, so closures see their
    /// declaration-time bindings regardless of how the caller's scope looks.
    fn call_function(&mut self, function: &LoxFunction, args: Vec<Value>) -> EvalResult<Value> {
        let call_env = Environment::with_parent(function.closure.clone());
        for (param, arg) in function.declaration.params.iter().zip(args) {
            call_env.define(param.lexeme.clone(), arg);
        }

        match self.execute_block(&function.declaration.body, call_env) {
            Ok(()) => Ok(Value::Nil), // falling off the end yields nil
            Err(Unwind::Return(value)) => Ok(value),
            Err(err @ Unwind::Error(_)) => Err(err),
        }
    }

    fn lookup_variable(&self, id: NodeId, name: &str, line: usize) -> EvalResult<Value> {
        match self.locals.get(&id) {
            Some(&distance) => Ok(self.environment.get_at(distance, name)),
            None => Ok(self.globals.get(name, line)?),
        }
    }
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::String(s.clone()),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Nil => Value::Nil,
    }
}

/// Pre-installs the single globally visible native: `clock/0`, returning a
/// monotonic elapsed-seconds count.
fn register_natives(globals: &Rc<Environment>) {
    let start = Instant::now();
    let clock = Native {
        name: "clock",
        arity: 0,
        func: Rc::new(move |_args| Ok(Value::Number(start.elapsed().as_secs_f64()))),
    };
    globals.define(
        "clock".to_string(),
        Value::Callable(Callable::Native(clock)),
    );
}
