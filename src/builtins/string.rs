//! String method table (spec §6.1).

use super::{arity_error, expect_string, type_error, unknown_method};
use crate::ast::Position;
use crate::error::ParsleyError;
use crate::value::Value;

pub fn call(s: &str, method: &str, args: &[Value], _position: &Position) -> Result<Value, ParsleyError> {
    match method {
        "length" => Ok(Value::Integer(s.chars().count() as i64)),
        "toUpper" => Ok(Value::String(s.to_uppercase())),
        "toLower" => Ok(Value::String(s.to_lowercase())),
        "trim" => Ok(Value::String(s.trim().to_string())),
        "split" => {
            let sep = args.first().ok_or_else(|| arity_error("split", "1", args.len()))?;
            let parts: Vec<Value> = match sep {
                Value::String(sep) if sep.is_empty() => {
                    s.chars().map(|c| Value::String(c.to_string())).collect()
                }
                Value::String(sep) => s.split(sep.as_str()).map(|p| Value::String(p.to_string())).collect(),
                Value::Regex(r) => r.compiled.split(s).map(|p| Value::String(p.to_string())).collect(),
                other => {
                    return Err(type_error(format!(
                        "split expects a string or regex separator, found a {}",
                        other.type_name()
                    )))
                }
            };
            Ok(Value::new_array(parts))
        }
        "replace" => {
            let old = args.first().ok_or_else(|| arity_error("replace", "2", args.len()))?;
            let new = args.get(1).ok_or_else(|| arity_error("replace", "2", args.len()))?;
            let new = expect_string(new, "replace")?;
            let result = match old {
                Value::String(old) => s.replace(old.as_str(), new),
                Value::Regex(r) => r.compiled.replace_all(s, new).into_owned(),
                other => {
                    return Err(type_error(format!(
                        "replace expects a string or regex pattern, found a {}",
                        other.type_name()
                    )))
                }
            };
            Ok(Value::String(result))
        }
        _ => Err(unknown_method(&Value::String(s.to_string()), method)),
    }
}
