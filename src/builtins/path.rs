//! Path constructor (spec §4.6) and method table (spec §6.1).

use super::unknown_method;
use crate::ast::Position;
use crate::error::ParsleyError;
use crate::value::{PathValue, ToDict, Value};
use std::path::PathBuf;

pub fn make_path(raw: &str) -> Value {
    Value::Path(PathValue { raw: clean(raw) })
}

/// Rob Pike cleanname-equivalent cleaning (spec §4.6): empty and `.`
/// components drop; `..` eliminates the preceding non-`..` component;
/// leading `..` drops on absolute paths but survives on relative ones.
pub(crate) fn clean(raw: &str) -> PathBuf {
    let absolute = raw.starts_with('/');
    let mut out: Vec<String> = Vec::new();
    for part in raw.split('/') {
        match part {
            "" | "." => continue,
            ".." => {
                if out.last().is_some_and(|p| p != "..") {
                    out.pop();
                } else if !absolute {
                    out.push("..".to_string());
                }
            }
            p => out.push(p.to_string()),
        }
    }
    let mut s = String::new();
    if absolute {
        s.push('/');
    }
    s.push_str(&out.join("/"));
    PathBuf::from(if s.is_empty() { ".".to_string() } else { s })
}

pub fn call(p: &PathValue, method: &str, _args: &[Value], _position: &Position) -> Result<Value, ParsleyError> {
    match method {
        "isAbsolute" => Ok(Value::Boolean(p.raw.is_absolute())),
        "isRelative" => Ok(Value::Boolean(!p.raw.is_absolute())),
        "toDict" => Ok(Value::Path(p.clone()).to_dict().unwrap()),
        _ => Err(unknown_method(&Value::Path(p.clone()), method)),
    }
}
