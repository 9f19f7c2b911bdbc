// ABOUTME: Environment module for managing variable bindings and lexical scopes

use crate::error::EvalError;
use crate::symbol::Symbol;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One activation frame: its own bindings plus a link to the enclosing
/// frame. A fresh frame is pushed for the top level, for each closure
/// call, and for nothing else, so `define` inside a function body stays
/// local to that call the way the frame-top marker in the model intends.
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<Symbol, Rc<RefCell<Value>>>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new global environment with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a new child frame.
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Builds a child frame binding `params` to `args` positionally.
    pub fn extend(parent: &Rc<Environment>, params: &[Symbol], args: &[Value]) -> Rc<Self> {
        let env = Environment::with_parent(Rc::clone(parent));
        for (p, a) in params.iter().zip(args.iter()) {
            env.define(p.clone(), a.clone());
        }
        env
    }

    /// Defines a binding in THIS frame, shadowing any binding of the same
    /// name further out. Defining the same name twice in the same frame
    /// replaces the cell; earlier handles captured via `lookup_cell` keep
    /// pointing at the old value, which matches re-`define`'s shadowing
    /// behavior rather than mutating existing captures.
    pub fn define(&self, name: Symbol, value: Value) {
        self.bindings
            .borrow_mut()
            .insert(name, Rc::new(RefCell::new(value)));
    }

    /// Looks up a symbol's current value, walking outward through parents.
    pub fn get(&self, name: &Symbol) -> Result<Value, EvalError> {
        self.lookup_cell(name)
            .map(|cell| cell.borrow().clone())
            .ok_or_else(|| EvalError::UndefinedSymbol(name.to_string()))
    }

    /// Resolves the storage cell backing `name`, for `set!` to capture
    /// once and mutate later without a second lookup.
    pub fn lookup_cell(&self, name: &Symbol) -> Option<Rc<RefCell<Value>>> {
        if let Some(cell) = self.bindings.borrow().get(name) {
            return Some(Rc::clone(cell));
        }
        self.parent.as_ref().and_then(|p| p.lookup_cell(name))
    }

    /// Updates an existing binding; errors if `name` is unbound anywhere
    /// in the chain.
    pub fn set(&self, name: &Symbol, value: Value) -> Result<(), EvalError> {
        match self.lookup_cell(name) {
            Some(cell) => {
                *cell.borrow_mut() = value;
                Ok(())
            }
            None => Err(EvalError::UndefinedSymbol(name.to_string())),
        }
    }

    /// All symbols currently bound in this frame and its ancestors, for
    /// the `globals` intrinsic. Not deduplicated by shadowing since the
    /// global frame has no parent in ordinary use.
    pub fn all_symbols(&self) -> Vec<Symbol> {
        let mut out: Vec<Symbol> = self.bindings.borrow().keys().cloned().collect();
        if let Some(parent) = &self.parent {
            out.extend(parent.all_symbols());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::intern;

    #[test]
    fn define_and_get() {
        let env = Environment::new();
        env.define(intern("x"), Value::int(42));
        assert!(matches!(env.get(&intern("x")), Ok(Value::Number(_))));
    }

    #[test]
    fn undefined_symbol_errors() {
        let env = Environment::new();
        assert!(env.get(&intern("undefined")).is_err());
    }

    #[test]
    fn shadowing_in_child_frame() {
        let parent = Environment::new();
        parent.define(intern("x"), Value::int(42));

        let child = Environment::with_parent(parent);
        child.define(intern("x"), Value::int(100));

        match child.get(&intern("x")) {
            Ok(Value::Number(n)) => assert_eq!(n.as_f64(), 100.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parent_lookup() {
        let parent = Environment::new();
        parent.define(intern("x"), Value::int(42));
        let child = Environment::with_parent(parent);
        match child.get(&intern("x")) {
            Ok(Value::Number(n)) => assert_eq!(n.as_f64(), 42.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn set_mutates_through_chain() {
        let parent = Environment::new();
        parent.define(intern("x"), Value::int(1));
        let child = Environment::with_parent(parent.clone());
        child.set(&intern("x"), Value::int(2)).unwrap();
        match parent.get(&intern("x")) {
            Ok(Value::Number(n)) => assert_eq!(n.as_f64(), 2.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn set_on_undefined_errors() {
        let env = Environment::new();
        assert!(env.set(&intern("nope"), Value::int(1)).is_err());
    }

    #[test]
    fn define_local_to_frame_does_not_leak_to_parent() {
        let parent = Environment::new();
        let child = Environment::with_parent(parent.clone());
        child.define(intern("local"), Value::int(9));
        assert!(parent.get(&intern("local")).is_err());
    }
}
