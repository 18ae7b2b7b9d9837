//! Regex constructor (spec §4.3 line 38) and method table (spec §6.1 line
//! 274). Compilation is eager, at literal construction, per spec.

use super::{arity_error, expect_string, unknown_method};
use crate::ast::Position;
use crate::error::{ErrorKind, ParsleyError};
use crate::value::{RegexValue, ToDict, Value};
use regex::RegexBuilder;

pub fn make_regex(pattern: &str, flags: &str, pos: &Position) -> Result<Value, ParsleyError> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            _ => {
                return Err(ParsleyError::at(
                    ErrorKind::InvalidLiteral,
                    format!("unknown regex flag '{flag}'"),
                    pos.clone(),
                ))
            }
        }
    }
    let compiled = builder
        .build()
        .map_err(|e| ParsleyError::at(ErrorKind::InvalidLiteral, format!("invalid regex /{pattern}/: {e}"), pos.clone()))?;
    Ok(Value::Regex(RegexValue { source: pattern.to_string(), flags: flags.to_string(), compiled }))
}

pub fn call(r: &RegexValue, method: &str, args: &[Value], _position: &Position) -> Result<Value, ParsleyError> {
    match method {
        "test" => {
            let s = args.first().ok_or_else(|| arity_error("test", "1", args.len()))?;
            let s = expect_string(s, "test")?;
            Ok(Value::Boolean(r.compiled.is_match(s)))
        }
        "format" => {
            let style = match args.first() {
                Some(Value::String(s)) => s.as_str(),
                _ => "pattern",
            };
            Ok(Value::String(match style {
                "literal" => format!("/{}/{}", r.source, r.flags),
                "verbose" => format!("pattern: {}, flags: {}", r.source, r.flags),
                _ => r.source.clone(),
            }))
        }
        "toDict" => Ok(Value::Regex(r.clone()).to_dict().unwrap()),
        _ => Err(unknown_method(&Value::Regex(r.clone()), method)),
    }
}
