//! Dictionary method table (spec §6.1).
//!
//! Iteration order here is the key's lexicographic order (`DictRef` is a
//! `BTreeMap`) rather than true insertion order; spec §9's design notes
//! explicitly allow a deterministic substitute since scripts are told not to
//! rely on dictionary order.

use super::{arity_error, expect_string, unknown_method};
use crate::ast::Position;
use crate::error::ParsleyError;
use crate::value::{DictRef, Value};

pub fn call(entries: &DictRef, method: &str, args: &[Value], _position: &Position) -> Result<Value, ParsleyError> {
    match method {
        "keys" => Ok(Value::new_array(entries.borrow().keys().map(|k| Value::String(k.clone())).collect())),
        "values" => Ok(Value::new_array(entries.borrow().values().cloned().collect())),
        "has" => {
            let key = args.first().ok_or_else(|| arity_error("has", "1", args.len()))?;
            let key = expect_string(key, "has")?;
            Ok(Value::Boolean(entries.borrow().contains_key(key)))
        }
        "delete" => {
            let key = args.first().ok_or_else(|| arity_error("delete", "1", args.len()))?;
            let key = expect_string(key, "delete")?;
            entries.borrow_mut().remove(key);
            Ok(Value::Null)
        }
        _ => Err(unknown_method(&Value::Dict(entries.clone()), method)),
    }
}
