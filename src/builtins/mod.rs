//! Built-in method tables (spec §6.1) and `@`-literal constructors (spec
//! §6.2), one submodule per receiver kind.
//!
//! Grounded on the teacher's `typechecker`'s per-type operation tables,
//! generalized from a handful of arithmetic/comparison checks to the full
//! dynamically dispatched method surface a `Value` exposes to scripts.

pub mod array;
pub mod datetime;
pub mod dict;
pub mod duration;
pub mod number;
pub mod path;
pub mod regex;
pub mod string;
pub mod url;

use crate::ast::Position;
use crate::error::{ErrorKind, ParsleyError};
use crate::interpreter::Interpreter;
use crate::value::Value;

pub fn dispatch_method(
    interp: &Interpreter,
    receiver: &Value,
    method: &str,
    args: &[Value],
    position: &Position,
) -> Result<Value, ParsleyError> {
    let result = match receiver {
        Value::String(s) => string::call(s, method, args, position),
        Value::Array(items) => array::call(interp, items, method, args, position),
        Value::Dict(entries) => dict::call(entries, method, args, position),
        Value::Integer(_) | Value::Float(_) => number::call(receiver, method, args, position),
        Value::Datetime(d) => datetime::call(d, method, args, position),
        Value::Duration(d) => duration::call(d, method, args, position),
        Value::Path(p) => path::call(p, method, args, position),
        Value::Url(u) => url::call(u, method, args, position),
        Value::Regex(r) => regex::call(r, method, args, position),
        Value::Tag(_) => match method {
            "toString" => {
                use crate::value::Stringify;
                Ok(Value::String(receiver.stringify()))
            }
            _ => Err(unknown_method(receiver, method)),
        },
        _ => Err(unknown_method(receiver, method)),
    };
    result.map_err(|e| e.with_position(position.clone()))
}

pub(crate) fn unknown_method(receiver: &Value, method: &str) -> ParsleyError {
    ParsleyError::new(ErrorKind::UnknownMethod, format!("'{}' has no method '{method}'", receiver.type_name()))
}

pub(crate) fn arity_error(method: &str, expected: &str, got: usize) -> ParsleyError {
    ParsleyError::new(ErrorKind::Arity, format!("'{method}' expects {expected} argument(s), got {got}"))
}

pub(crate) fn type_error(message: impl Into<String>) -> ParsleyError {
    ParsleyError::new(ErrorKind::TypeMismatch, message.into())
}

pub(crate) fn expect_string<'a>(value: &'a Value, context: &str) -> Result<&'a str, ParsleyError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(type_error(format!("{context} expects a string, found a {}", other.type_name()))),
    }
}
