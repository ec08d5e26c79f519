// ABOUTME: Lexically scoped name-to-value bindings organised as a parent-linked chain

use crate::error::RuntimeError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct Environment {
    values: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates the outermost ("globals") environment, which has no parent.
    pub fn new_global() -> Rc<Self> {
        Rc::new(Environment {
            values: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a new child scope, e.g. for a block body or a function call frame.
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            values: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Unconditionally binds `name` in this scope. Redeclaring a name already bound
    /// here overwrites it: redeclaring a name in the same scope, latest wins.
    pub fn define(&self, name: String, value: Value) {
        self.values.borrow_mut().insert(name, value);
    }

    pub fn get(&self, name: &str, line: usize) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.borrow().get(name) {
            return Ok(value.clone());
        }
        if let Some(parent) = &self.parent {
            return parent.get(name, line);
        }
        Err(RuntimeError::UndefinedVariable {
            name: name.to_string(),
            line,
        })
    }

    pub fn assign(&self, name: &str, value: Value, line: usize) -> Result<(), RuntimeError> {
        if self.values.borrow().contains_key(name) {
            self.values.borrow_mut().insert(name.to_string(), value);
            return Ok(());
        }
        if let Some(parent) = &self.parent {
            return parent.assign(name, value, line);
        }
        Err(RuntimeError::UndefinedVariable {
            name: name.to_string(),
            line,
        })
    }

    /// Reads `name` directly from the environment `distance` parents away. The
    /// resolver guarantees the name is present there, so this never needs to fall
    /// back further.
    pub fn get_at(&self, distance: usize, name: &str) -> Value {
        if distance == 0 {
            return self
                .values
                .borrow()
                .get(name)
                .cloned()
                .expect("resolver guarantees the binding exists at this depth");
        }
        self.parent
            .as_ref()
            .expect("resolver-reported distance exceeds the actual chain length")
            .get_at(distance - 1, name)
    }

    pub fn assign_at(&self, distance: usize, name: &str, value: Value) {
        if distance == 0 {
            self.values.borrow_mut().insert(name.to_string(), value);
            return;
        }
        self.parent
            .as_ref()
            .expect("resolver-reported distance exceeds the actual chain length")
            .assign_at(distance - 1, name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_get() {
        let env = Environment::new_global();
        env.define("x".to_string(), Value::Number(42.0));
        assert!(matches!(env.get("x", 1), Ok(Value::Number(n)) if n == 42.0));
    }

    #[test]
    fn undefined_variable_is_a_runtime_error() {
        let env = Environment::new_global();
        assert!(env.get("nope", 1).is_err());
    }

    #[test]
    fn child_shadows_parent() {
        let parent = Environment::new_global();
        parent.define("x".to_string(), Value::Number(1.0));
        let child = Environment::with_parent(parent);
        child.define("x".to_string(), Value::Number(2.0));
        assert!(matches!(child.get("x", 1), Ok(Value::Number(n)) if n == 2.0));
    }

    #[test]
    fn child_sees_parent_binding() {
        let parent = Environment::new_global();
        parent.define("x".to_string(), Value::Number(1.0));
        let child = Environment::with_parent(parent);
        assert!(matches!(child.get("x", 1), Ok(Value::Number(n)) if n == 1.0));
    }

    #[test]
    fn assign_updates_the_defining_scope_not_a_shadow() {
        let parent = Environment::new_global();
        parent.define("x".to_string(), Value::Number(1.0));
        let child = Environment::with_parent(parent.clone());
        child.assign("x", Value::Number(5.0), 1).unwrap();
        assert!(matches!(parent.get("x", 1), Ok(Value::Number(n)) if n == 5.0));
    }

    #[test]
    fn assign_to_undefined_is_an_error() {
        let env = Environment::new_global();
        assert!(env.assign("nope", Value::Nil, 1).is_err());
    }

    #[test]
    fn get_at_and_assign_at_walk_fixed_depth() {
        let grandparent = Environment::new_global();
        grandparent.define("a".to_string(), Value::Number(1.0));
        let parent = Environment::with_parent(grandparent);
        parent.define("b".to_string(), Value::Number(2.0));
        let child = Environment::with_parent(parent);
        child.define("c".to_string(), Value::Number(3.0));

        assert!(matches!(child.get_at(0, "c"), Value::Number(n) if n == 3.0));
        assert!(matches!(child.get_at(1, "b"), Value::Number(n) if n == 2.0));
        assert!(matches!(child.get_at(2, "a"), Value::Number(n) if n == 1.0));

        child.assign_at(2, "a", Value::Number(99.0));
        assert!(matches!(child.get_at(2, "a"), Value::Number(n) if n == 99.0));
    }
}
