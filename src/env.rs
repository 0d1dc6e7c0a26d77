use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::{self, Debug},
    rc::Rc,
};

use crate::{
    error as e,
    value::{Args, Value},
};

/// Shared handle to one scope of the environment chain.
///
/// Clones share the same scope, so a closure and the frame that created it
/// observe each other's `set`s. Scopes only point outward.
pub struct Env(Rc<Scope>);

struct Scope {
    data: RefCell<HashMap<String, Value>>,
    outer: Option<Env>,
}

impl Env {
    pub fn new() -> Self {
        Self::builder().make()
    }

    /// Fresh empty scope whose lookups fall back to `outer`. Writes to it
    /// never reach `outer`.
    pub fn enclosed(outer: &Env) -> Self {
        Self::builder().outer(outer.clone()).make()
    }

    pub fn builder() -> EnvBuilder {
        EnvBuilder {
            data: HashMap::new(),
            outer: None,
        }
    }

    pub fn get(&self, k: &str) -> Result<Value, Value> {
        self.find(k).ok_or_else(|| e::identifier_not_found(k))
    }

    fn find(&self, k: &str) -> Option<Value> {
        self.0
            .data
            .borrow()
            .get(k)
            .cloned()
            .or_else(|| self.0.outer.as_ref().and_then(|e| e.find(k)))
    }

    /// Binds `key` in this scope only, shadowing any outer binding.
    pub fn set<K: Into<String>>(&self, key: K, value: Value) {
        self.0.data.borrow_mut().insert(key.into(), value);
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Env {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Env({} bindings)", self.0.data.borrow().len())
    }
}

pub struct EnvBuilder {
    data: HashMap<String, Value>,
    outer: Option<Env>,
}

impl EnvBuilder {
    pub fn outer(mut self, env: Env) -> Self {
        self.outer = Some(env);
        self
    }

    /// Binds `vars` positionally to `values`; the counts must match.
    pub fn binds(mut self, vars: &[String], values: Args) -> Result<Self, Value> {
        if vars.len() != values.len() {
            return Err(e::fn_arity(vars.len(), values.len()));
        }

        self.data.extend(vars.iter().cloned().zip(values));
        Ok(self)
    }

    pub fn make(mut self) -> Env {
        let outer = self.outer.take();

        Env(Rc::new(Scope {
            data: RefCell::new(self.data),
            outer,
        }))
    }
}
