//! Runtime values.
//!
//! Values follow the host scripting model: loosely typed, with reference
//! semantics for arrays, objects, elements and functions. Arrays and objects
//! are shared mutable cells, so `items.push(x)` is visible through every alias.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use loka_ir::Node;

use crate::host::Element;
use crate::EvalError;

/// A shared, mutable array.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

/// A shared, mutable object with insertion-ordered keys.
pub type ObjectRef = Rc<RefCell<IndexMap<String, Value>>>;

/// Signature of a native function body.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync;

/// A runtime value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Array(ArrayRef),
    Object(ObjectRef),
    Element(Element),
    /// Ordered result of a selector query. Distinct from `Array` so calls
    /// can unwrap the first element.
    Collection(Rc<[Element]>),
    Function(FunctionValue),
}

/// A callable value.
#[derive(Clone)]
pub enum FunctionValue {
    Native(NativeFunction),
    User(Rc<UserFunction>),
}

impl FunctionValue {
    pub fn name(&self) -> &str {
        match self {
            FunctionValue::Native(f) => &f.name,
            FunctionValue::User(f) => &f.name,
        }
    }
}

/// A function implemented in Rust and registered by name.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    func: Arc<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        NativeFunction {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    #[inline]
    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        (self.func)(args)
    }
}

/// A function defined with `def`.
#[derive(Debug)]
pub struct UserFunction {
    pub name: String,
    pub params: Vec<String>,
    pub body: Arc<Node>,
}

impl Value {
    /// Build a string value.
    #[inline]
    pub fn string(text: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(text.as_ref()))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object(entries: IndexMap<String, Value>) -> Self {
        Value::Object(Rc::new(RefCell::new(entries)))
    }

    pub fn collection(elements: Vec<Element>) -> Self {
        Value::Collection(Rc::from(elements))
    }

    pub fn user_function(name: String, params: Vec<String>, body: Arc<Node>) -> Self {
        Value::Function(FunctionValue::User(Rc::new(UserFunction {
            name,
            params,
            body,
        })))
    }

    /// The value's type as the host's `typeof`-style name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Element(_) => "element",
            Value::Collection(_) => "collection",
            Value::Function(_) => "function",
        }
    }

    #[inline]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Truthiness. Empty collections are falsy so `if .x in me` reads naturally.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Collection(items) => !items.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Element(_) | Value::Function(_) => true,
        }
    }

    /// Numeric coercion.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
            Value::Array(items) => {
                let items = items.borrow();
                match items.as_slice() {
                    [] => 0.0,
                    [only] => only.to_number(),
                    _ => f64::NAN,
                }
            }
            Value::Object(_) | Value::Element(_) | Value::Collection(_) | Value::Function(_) => {
                f64::NAN
            }
        }
    }

    /// Borrow as a string slice if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Value::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Elements held by an element, collection or array value.
    pub fn elements(&self) -> Vec<Element> {
        match self {
            Value::Element(el) => vec![el.clone()],
            Value::Collection(items) => items.to_vec(),
            Value::Array(items) => items
                .borrow()
                .iter()
                .filter_map(|v| v.as_element().cloned())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Strict equality (`===`): same type and value, references by identity.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => same_number(*a, *b),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Element(a), Value::Element(b)) => a.ptr_eq(b),
            (Value::Collection(a), Value::Collection(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => function_ptr_eq(a, b),
            _ => false,
        }
    }

    /// Loose equality (`==`, `is`): `null == undefined`, and primitives of
    /// different types compare numerically.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
            (Value::Number(_), Value::Str(_))
            | (Value::Str(_), Value::Number(_))
            | (Value::Bool(_), _)
            | (_, Value::Bool(_)) => same_number(self.to_number(), other.to_number()),
            _ => self.strict_eq(other),
        }
    }
}

#[allow(clippy::float_cmp)]
fn same_number(a: f64, b: f64) -> bool {
    a == b
}

fn function_ptr_eq(a: &FunctionValue, b: &FunctionValue) -> bool {
    match (a, b) {
        (FunctionValue::Native(a), FunctionValue::Native(b)) => Arc::ptr_eq(&a.func, &b.func),
        (FunctionValue::User(a), FunctionValue::User(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

/// Format a number the way the host prints it: integral values without a
/// fractional part, infinities as `Infinity`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// String conversion, as used by concatenation, templates and `log`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Str(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !item.is_nullish() {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => f.write_str("[object Object]"),
            Value::Element(el) => write!(f, "{el:?}"),
            Value::Collection(items) => {
                for (i, el) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{el:?}")?;
                }
                Ok(())
            }
            Value::Function(func) => write!(f, "function {}", func.name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Array(items) => f.debug_list().entries(items.borrow().iter()).finish(),
            Value::Object(entries) => f.debug_map().entries(entries.borrow().iter()).finish(),
            Value::Collection(items) => f.debug_list().entries(items.iter()).finish(),
            other => write!(f, "{other}"),
        }
    }
}

/// Structural equality, used by tests and by `includes`/`indexOf` on
/// primitives. Containers compare by contents, elements by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Collection(a), Value::Collection(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.ptr_eq(y))
            }
            _ => self.strict_eq(other),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<Element> for Value {
    fn from(el: Element) -> Self {
        Value::Element(el)
    }
}
