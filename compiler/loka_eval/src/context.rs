//! Execution context: the scoped variable environment of one evaluation.
//!
//! A context family shares one `globals` table by reference. Each context owns
//! its own `locals` and `variables`, so a child never sees its parent's locals
//! and the parent never sees the child's.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::host::Element;
use crate::Value;

type Bindings = FxHashMap<String, Value>;

/// The `globals` table of one context family. Clones share the table.
#[derive(Clone, Default)]
struct SharedGlobals(Rc<RefCell<Bindings>>);

impl SharedGlobals {
    fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().get(name).cloned()
    }

    fn contains(&self, name: &str) -> bool {
        self.0.borrow().contains_key(name)
    }

    fn insert(&self, name: &str, value: Value) {
        self.0.borrow_mut().insert(name.to_string(), value);
    }

    fn same_table(&self, other: &SharedGlobals) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SharedGlobals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.borrow().iter()).finish()
    }
}

/// The variable environment an evaluation runs against.
#[derive(Debug)]
pub struct ExecutionContext {
    /// The element the code is attached to, or `null`.
    pub me: Value,
    pub you: Value,
    /// Result of the last `get`/`call`.
    pub it: Value,
    pub result: Value,
    locals: Bindings,
    globals: SharedGlobals,
    variables: Bindings,
    /// How many `child` steps separate this context from its family root.
    depth: usize,
}

impl ExecutionContext {
    /// A fresh context: new `locals`, `globals` and `variables`.
    pub fn new(host: Option<Element>) -> Self {
        Self::with_globals(host, SharedGlobals::default(), 0)
    }

    fn with_globals(host: Option<Element>, globals: SharedGlobals, depth: usize) -> Self {
        ExecutionContext {
            me: host.map_or(Value::Null, Value::Element),
            you: Value::Null,
            it: Value::Null,
            result: Value::Null,
            locals: Bindings::default(),
            globals,
            variables: Bindings::default(),
            depth,
        }
    }

    /// A child sharing this context's `globals`, with its own empty `locals`
    /// and a `me` independent of the parent's.
    pub fn child(&self, host: Option<Element>) -> Self {
        Self::with_globals(host, self.globals.clone(), self.depth + 1)
    }

    /// Nesting depth within the context family; a fresh context is `0`.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The element bound to `me`, if any.
    pub fn me_element(&self) -> Option<&Element> {
        self.me.as_element()
    }

    /// Whether `other` belongs to the same context family.
    pub fn shares_globals(&self, other: &ExecutionContext) -> bool {
        self.globals.same_table(&other.globals)
    }

    // Locals

    pub fn local(&self, name: &str) -> Option<Value> {
        self.locals.get(name).cloned()
    }

    pub fn has_local(&self, name: &str) -> bool {
        self.locals.contains_key(name)
    }

    pub fn set_local(&mut self, name: &str, value: Value) {
        self.locals.insert(name.to_string(), value);
    }

    // Globals

    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.get(name)
    }

    pub fn has_global(&self, name: &str) -> bool {
        self.globals.contains(name)
    }

    pub fn set_global(&self, name: &str, value: Value) {
        self.globals.insert(name, value);
    }

    // Variables

    pub fn variable(&self, name: &str) -> Option<Value> {
        self.variables.get(name).cloned()
    }

    pub fn set_variable(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_string(), value);
    }

    /// Exact-name lookup in `locals`, then `variables`, then `globals`.
    ///
    /// This is the order template interpolation uses.
    pub fn lookup_for_template(&self, name: &str) -> Option<Value> {
        self.local(name)
            .or_else(|| self.variable(name))
            .or_else(|| self.global(name))
    }

    /// Lookup in `locals`, then `globals`, then `variables`.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.local(name)
            .or_else(|| self.global(name))
            .or_else(|| self.variable(name))
    }

    /// The singular binding named by a reserved word, if `name` is one.
    pub fn reserved(&self, name: &str) -> Option<Value> {
        match name {
            "me" | "my" | "I" => Some(self.me.clone()),
            "you" | "your" => Some(self.you.clone()),
            "it" | "its" => Some(self.it.clone()),
            "result" => Some(self.result.clone()),
            _ => None,
        }
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        ExecutionContext::new(None)
    }
}
