//! Array method table (spec §6.1).

use super::{arity_error, type_error, unknown_method};
use crate::ast::Position;
use crate::error::ParsleyError;
use crate::interpreter::Interpreter;
use crate::value::{ArrayRef, Stringify, Value};
use std::cmp::Ordering;

pub fn call(
    interp: &Interpreter,
    items: &ArrayRef,
    method: &str,
    args: &[Value],
    position: &Position,
) -> Result<Value, ParsleyError> {
    match method {
        "length" => Ok(Value::Integer(items.borrow().len() as i64)),
        "sort" => {
            items.borrow_mut().sort_by(compare_values);
            Ok(Value::Array(items.clone()))
        }
        "reverse" => {
            items.borrow_mut().reverse();
            Ok(Value::Array(items.clone()))
        }
        "map" => {
            let func = args.first().ok_or_else(|| arity_error("map", "1", args.len()))?;
            let snapshot = items.borrow().clone();
            let mut out = Vec::with_capacity(snapshot.len());
            for element in snapshot {
                out.push(interp.call_function(func, &[element], position, None)?);
            }
            Ok(Value::new_array(out))
        }
        "filter" => {
            let func = args.first().ok_or_else(|| arity_error("filter", "1", args.len()))?;
            let snapshot = items.borrow().clone();
            let mut out = Vec::new();
            for element in snapshot {
                if interp.call_function(func, &[element.clone()], position, None)?.is_truthy() {
                    out.push(element);
                }
            }
            Ok(Value::new_array(out))
        }
        "join" => {
            let sep = match args.first() {
                Some(Value::String(s)) => s.clone(),
                Some(other) => return Err(type_error(format!("join expects a string separator, found a {}", other.type_name()))),
                None => String::new(),
            };
            let parts: Vec<String> = items.borrow().iter().map(Stringify::stringify).collect();
            Ok(Value::String(parts.join(&sep)))
        }
        "format" => {
            let conjunction = match args.first() {
                Some(Value::String(s)) => s.clone(),
                Some(other) => return Err(type_error(format!("format expects a string conjunction, found a {}", other.type_name()))),
                None => "and".to_string(),
            };
            Ok(Value::String(format_list(&items.borrow(), &conjunction)))
        }
        _ => Err(unknown_method(&Value::Array(items.clone()), method)),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::Integer(x), Value::Float(y)) => (*x as f64).partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::Float(x), Value::Integer(y)) => x.partial_cmp(&(*y as f64)).unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => a.stringify().cmp(&b.stringify()),
    }
}

/// Locale list form, e.g. `"a, b, and c"` (spec §6.1); the real locale-aware
/// variants of this are out of scope (spec §1) so this is the plain
/// default-locale rendering.
fn format_list(items: &[Value], conjunction: &str) -> String {
    let parts: Vec<String> = items.iter().map(Stringify::stringify).collect();
    match parts.len() {
        0 => String::new(),
        1 => parts[0].clone(),
        2 => format!("{} {conjunction} {}", parts[0], parts[1]),
        n => {
            let mut out = parts[..n - 1].join(", ");
            out.push_str(&format!(", {conjunction} {}", parts[n - 1]));
            out
        }
    }
}
