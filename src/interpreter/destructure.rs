//! Pattern-binding for `let`, `for`, and function parameters (spec §4.2).

use crate::ast::Pattern;
use crate::environment::Environment;
use crate::error::{ErrorKind, ParsleyError};
use crate::value::Value;

pub fn bind_pattern(pattern: &Pattern, value: Value, env: &Environment) -> Result<(), ParsleyError> {
    match pattern {
        Pattern::Wildcard(_) => Ok(()),
        Pattern::Ident(name, _) => {
            env.define(name, value);
            Ok(())
        }
        Pattern::Array { elements, rest, position } => {
            let Value::Array(items) = &value else {
                return Err(ParsleyError::at(
                    ErrorKind::TypeMismatch,
                    format!("cannot destructure a {} as an array", value.type_name()),
                    position.clone(),
                ));
            };
            let items = items.borrow();
            for (i, elem_pattern) in elements.iter().enumerate() {
                let elem = items.get(i).cloned().unwrap_or(Value::Null);
                bind_pattern(elem_pattern, elem, env)?;
            }
            if let Some(rest_pattern) = rest {
                let remainder: Vec<Value> = items.iter().skip(elements.len()).cloned().collect();
                bind_pattern(rest_pattern, Value::new_array(remainder), env)?;
            }
            Ok(())
        }
        Pattern::Dict { fields, rest, position } => {
            let Value::Dict(entries) = &value else {
                return Err(ParsleyError::at(
                    ErrorKind::TypeMismatch,
                    format!("cannot destructure a {} as a dict", value.type_name()),
                    position.clone(),
                ));
            };
            let entries = entries.borrow();
            let mut taken = std::collections::HashSet::new();
            for (key, field_pattern) in fields {
                let field_value = entries.get(key).cloned().unwrap_or(Value::Null);
                taken.insert(key.clone());
                bind_pattern(field_pattern, field_value, env)?;
            }
            if let Some(rest_pattern) = rest {
                let mut remainder = std::collections::BTreeMap::new();
                for (k, v) in entries.iter() {
                    if !taken.contains(k) {
                        remainder.insert(k.clone(), v.clone());
                    }
                }
                bind_pattern(rest_pattern, Value::new_dict(remainder), env)?;
            }
            Ok(())
        }
    }
}
