//! Built-in properties and methods of strings, arrays, numbers, elements
//! and objects.

use crate::errors::{cannot_call_method, invalid_assignment_target, invalid_selector, wrong_arg_type};
use crate::host::{Element, Selector};
use crate::value::format_number;
use crate::{EvalError, Value};

/// Read `receiver.name`. Missing properties, and any property of
/// `null`/`undefined`, read as `undefined`.
pub fn get_property(receiver: &Value, name: &str) -> Value {
    if let Some(index) = parse_index(name) {
        return get_index(receiver, index);
    }
    match receiver {
        Value::Str(s) if name == "length" => count(s.chars().count()),
        Value::Array(items) => {
            let items = items.borrow();
            match name {
                "length" => count(items.len()),
                "first" => items.first().cloned().unwrap_or_default(),
                "last" => items.last().cloned().unwrap_or_default(),
                _ => Value::Undefined,
            }
        }
        Value::Collection(items) => match name {
            "length" => count(items.len()),
            "first" => items.first().cloned().map_or(Value::Undefined, Value::Element),
            "last" => items.last().cloned().map_or(Value::Undefined, Value::Element),
            // Other properties map over the elements.
            _ => Value::array(
                items
                    .iter()
                    .map(|el| element_property(el, name))
                    .collect(),
            ),
        },
        Value::Element(el) => element_property(el, name),
        Value::Object(entries) => entries.borrow().get(name).cloned().unwrap_or_default(),
        Value::Function(f) if name == "name" => Value::string(f.name()),
        _ => Value::Undefined,
    }
}

/// Read `receiver[key]`.
pub fn get_computed(receiver: &Value, key: &Value) -> Value {
    match key {
        Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 => {
            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "checked non-negative integral above"
            )]
            let index = *n as usize;
            get_index(receiver, index)
        }
        _ => get_property(receiver, &property_key(key)),
    }
}

fn get_index(receiver: &Value, index: usize) -> Value {
    match receiver {
        Value::Array(items) => items.borrow().get(index).cloned().unwrap_or_default(),
        Value::Collection(items) => items
            .get(index)
            .cloned()
            .map_or(Value::Undefined, Value::Element),
        Value::Str(s) => s
            .chars()
            .nth(index)
            .map_or(Value::Undefined, |c| Value::string(c.to_string())),
        Value::Object(entries) => entries
            .borrow()
            .get(&index.to_string())
            .cloned()
            .unwrap_or_default(),
        _ => Value::Undefined,
    }
}

fn element_property(el: &Element, name: &str) -> Value {
    match name {
        "id" => Value::string(el.id().unwrap_or_default()),
        "tagName" => Value::string(el.tag_name().to_ascii_uppercase()),
        "className" => Value::string(el.classes().join(" ")),
        "children" => Value::collection(el.children()),
        "parentElement" => el.parent().map_or(Value::Null, Value::Element),
        _ => el.property(name).unwrap_or_default(),
    }
}

/// Write `target[key] = value`.
pub fn set_property(target: &Value, key: &Value, value: Value) -> Result<(), EvalError> {
    let name = property_key(key);
    match target {
        Value::Object(entries) => {
            entries.borrow_mut().insert(name, value);
            Ok(())
        }
        Value::Array(items) => {
            let Some(index) = parse_index(&name) else {
                return Err(invalid_assignment_target(&format!("array property `{name}`")));
            };
            let mut items = items.borrow_mut();
            if index >= items.len() {
                items.resize(index + 1, Value::Undefined);
            }
            items[index] = value;
            Ok(())
        }
        Value::Element(el) => {
            set_element_property(el, &name, value);
            Ok(())
        }
        Value::Collection(items) => {
            for el in items.iter() {
                set_element_property(el, &name, value.clone());
            }
            Ok(())
        }
        other => Err(invalid_assignment_target(&format!(
            "property `{name}` of {}",
            other.type_name()
        ))),
    }
}

fn set_element_property(el: &Element, name: &str, value: Value) {
    match name {
        "id" => el.set_attribute("id", &value.to_string()),
        "className" => el.set_attribute("class", &value.to_string()),
        _ => el.set_property(name, value),
    }
}

/// Property key of a computed access.
pub fn property_key(key: &Value) -> String {
    match key {
        Value::Str(s) => s.to_string(),
        other => other.to_string(),
    }
}

fn parse_index(name: &str) -> Option<usize> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

#[expect(clippy::cast_precision_loss, reason = "lengths are far below 2^52")]
fn count(n: usize) -> Value {
    Value::Number(n as f64)
}

/// Call a built-in method on `receiver`.
pub fn call_method(receiver: &Value, method: &str, args: &[Value]) -> Result<Value, EvalError> {
    let result = match receiver {
        Value::Str(s) => string_method(s, method, args)?,
        Value::Array(_) => array_method(receiver, method, args)?,
        Value::Number(n) => number_method(*n, method, args)?,
        Value::Element(el) => element_method(el, method, args)?,
        _ => None,
    };
    match result {
        Some(value) => Ok(value),
        None if method == "toString" => Ok(Value::string(receiver.to_string())),
        None => Err(cannot_call_method(method, receiver.type_name())),
    }
}

fn arg_str(args: &[Value], index: usize, method: &str) -> Result<String, EvalError> {
    match args.get(index) {
        Some(Value::Str(s)) => Ok(s.to_string()),
        Some(other) if !other.is_nullish() => Ok(other.to_string()),
        _ => Err(wrong_arg_type(method, "a string argument")),
    }
}

fn string_method(s: &str, method: &str, args: &[Value]) -> Result<Option<Value>, EvalError> {
    Ok(Some(match method {
        "toUpperCase" => Value::string(s.to_uppercase()),
        "toLowerCase" => Value::string(s.to_lowercase()),
        "trim" => Value::string(s.trim()),
        "includes" => Value::Bool(s.contains(&arg_str(args, 0, method)?)),
        "startsWith" => Value::Bool(s.starts_with(&arg_str(args, 0, method)?)),
        "endsWith" => Value::Bool(s.ends_with(&arg_str(args, 0, method)?)),
        "indexOf" => {
            let needle = arg_str(args, 0, method)?;
            match s.find(&needle) {
                Some(byte) => count(s[..byte].chars().count()),
                None => Value::Number(-1.0),
            }
        }
        "split" => {
            let sep = arg_str(args, 0, method)?;
            let parts: Vec<Value> = if sep.is_empty() {
                s.chars().map(|c| Value::string(c.to_string())).collect()
            } else {
                s.split(sep.as_str()).map(Value::string).collect()
            };
            Value::array(parts)
        }
        "replace" => {
            let from = arg_str(args, 0, method)?;
            let to = arg_str(args, 1, method)?;
            Value::string(s.replacen(&from, &to, 1))
        }
        _ => return Ok(None),
    }))
}

fn array_method(receiver: &Value, method: &str, args: &[Value]) -> Result<Option<Value>, EvalError> {
    let Value::Array(items) = receiver else {
        return Ok(None);
    };
    Ok(Some(match method {
        "push" => {
            let mut items = items.borrow_mut();
            items.extend(args.iter().cloned());
            count(items.len())
        }
        "pop" => items.borrow_mut().pop().unwrap_or_default(),
        "includes" => {
            let needle = args.first().cloned().unwrap_or_default();
            Value::Bool(items.borrow().iter().any(|v| v.strict_eq(&needle)))
        }
        "indexOf" => {
            let needle = args.first().cloned().unwrap_or_default();
            items
                .borrow()
                .iter()
                .position(|v| v.strict_eq(&needle))
                .map_or(Value::Number(-1.0), count)
        }
        "join" => {
            let sep = match args.first() {
                Some(v) if !v.is_nullish() => v.to_string(),
                _ => ",".to_string(),
            };
            let joined = items
                .borrow()
                .iter()
                .map(|v| if v.is_nullish() { String::new() } else { v.to_string() })
                .collect::<Vec<_>>()
                .join(&sep);
            Value::string(joined)
        }
        _ => return Ok(None),
    }))
}

fn number_method(n: f64, method: &str, args: &[Value]) -> Result<Option<Value>, EvalError> {
    Ok(Some(match method {
        "toFixed" => {
            let digits = args.first().map_or(0.0, Value::to_number);
            if !(0.0..=100.0).contains(&digits) {
                return Err(wrong_arg_type(method, "between 0 and 100 digits"));
            }
            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "range checked above"
            )]
            let digits = digits as usize;
            Value::string(format!("{n:.digits$}"))
        }
        "toString" => Value::string(format_number(n)),
        _ => return Ok(None),
    }))
}

fn element_method(el: &Element, method: &str, args: &[Value]) -> Result<Option<Value>, EvalError> {
    Ok(Some(match method {
        "getAttribute" => el
            .get_attribute(&arg_str(args, 0, method)?)
            .map_or(Value::Null, Value::string),
        "setAttribute" => {
            let value = args.get(1).map(ToString::to_string).unwrap_or_default();
            el.set_attribute(&arg_str(args, 0, method)?, &value);
            Value::Undefined
        }
        "hasAttribute" => Value::Bool(el.has_attribute(&arg_str(args, 0, method)?)),
        "removeAttribute" => {
            el.remove_attribute(&arg_str(args, 0, method)?);
            Value::Undefined
        }
        "matches" => {
            let selector = arg_str(args, 0, method)?;
            Value::Bool(Selector::parse(&selector).is_ok_and(|s| s.matches(el)))
        }
        "querySelector" | "querySelectorAll" => {
            let selector = Selector::parse(&arg_str(args, 0, method)?)
                .map_err(|err| invalid_selector(&err))?;
            let found = selector.query_all(el);
            if method == "querySelector" {
                found.into_iter().next().map_or(Value::Null, Value::Element)
            } else {
                Value::collection(found)
            }
        }
        _ => return Ok(None),
    }))
}
