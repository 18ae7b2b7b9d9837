//! Lexical environment chain (spec §4.4).
//!
//! Grounded on the teacher's `interpreter::Scope` (a `Rc<RefCell<_>>` chain
//! of `HashMap<String, VariableType>` frames with a parent pointer):
//! generalized here to also carry the module's filename, a handle to the
//! shared `Security` policy, the module-level export set, and an optional
//! `this` binding for dictionary method calls (spec §4.5).

use crate::adapters::Adapters;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// State shared by every environment descended from a module's root scope.
pub struct ModuleState {
    pub filename: String,
    pub exports: RefCell<HashSet<String>>,
    pub adapters: Rc<Adapters>,
}

struct Frame {
    bindings: HashMap<String, Value>,
    this_binding: Option<Value>,
    parent: Option<Environment>,
    module: Rc<ModuleState>,
}

#[derive(Clone)]
pub struct Environment(Rc<RefCell<Frame>>);

impl Environment {
    pub fn root(filename: impl Into<String>, adapters: Rc<Adapters>) -> Self {
        let module = Rc::new(ModuleState {
            filename: filename.into(),
            exports: RefCell::new(HashSet::new()),
            adapters,
        });
        Environment(Rc::new(RefCell::new(Frame {
            bindings: HashMap::new(),
            this_binding: None,
            parent: None,
            module,
        })))
    }

    pub fn child(&self) -> Self {
        let module = self.0.borrow().module.clone();
        Environment(Rc::new(RefCell::new(Frame {
            bindings: HashMap::new(),
            this_binding: None,
            parent: Some(self.clone()),
            module,
        })))
    }

    /// A child scope with `this` bound for the duration of a dictionary
    /// method call (spec §4.5).
    pub fn with_this(&self, value: Value) -> Self {
        let env = self.child();
        env.0.borrow_mut().this_binding = Some(value);
        env
    }

    pub fn module(&self) -> Rc<ModuleState> {
        self.0.borrow().module.clone()
    }

    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().bindings.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(v) = self.0.borrow().bindings.get(name) {
            return Some(v.clone());
        }
        let parent = self.0.borrow().parent.clone();
        parent.and_then(|p| p.get(name))
    }

    /// Walks up to the frame that actually owns `name` and mutates it there,
    /// matching Parsley's lexical (not dynamic) scoping for assignment.
    pub fn assign(&self, name: &str, value: Value) -> bool {
        if self.0.borrow().bindings.contains_key(name) {
            self.0.borrow_mut().bindings.insert(name.to_string(), value);
            return true;
        }
        let parent = self.0.borrow().parent.clone();
        match parent {
            Some(p) => p.assign(name, value),
            None => false,
        }
    }

    pub fn export(&self, name: &str) {
        self.module().exports.borrow_mut().insert(name.to_string());
    }

    /// The nearest `this` binding in scope, searching outward through
    /// enclosing blocks (a nested `fn` inside a method still sees its
    /// enclosing `this`, matching ordinary lexical closure rules).
    pub fn this(&self) -> Option<Value> {
        if let Some(v) = self.0.borrow().this_binding.clone() {
            return Some(v);
        }
        let parent = self.0.borrow().parent.clone();
        parent.and_then(|p| p.this())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Adapters;

    fn root() -> Environment {
        Environment::root("test.pars", Rc::new(Adapters::native(vec![], vec![], vec![])))
    }

    #[test]
    fn child_sees_parent_bindings() {
        let parent = root();
        parent.define("x", Value::Integer(1));
        let child = parent.child();
        assert!(matches!(child.get("x"), Some(Value::Integer(1))));
    }

    #[test]
    fn define_in_child_does_not_leak_to_parent() {
        let parent = root();
        let child = parent.child();
        child.define("y", Value::Integer(2));
        assert!(parent.get("y").is_none());
    }

    #[test]
    fn assign_mutates_the_owning_frame_not_a_shadow() {
        let parent = root();
        parent.define("x", Value::Integer(1));
        let child = parent.child();
        assert!(child.assign("x", Value::Integer(9)));
        assert!(matches!(parent.get("x"), Some(Value::Integer(9))));
    }

    #[test]
    fn assign_to_undefined_name_fails() {
        let env = root();
        assert!(!env.assign("nope", Value::Null));
    }

    #[test]
    fn this_binding_is_visible_through_nested_blocks() {
        let env = root();
        let method_scope = env.with_this(Value::Integer(42));
        let nested = method_scope.child();
        assert!(matches!(nested.this(), Some(Value::Integer(42))));
    }

    #[test]
    fn export_records_name_on_shared_module_state() {
        let env = root();
        env.export("add");
        assert!(env.module().exports.borrow().contains("add"));
    }
}
