//! Method-call dispatch (spec §4.3.3, §6.1).
//!
//! A dictionary whose field holds a function value is called with `this`
//! bound to the dictionary itself — this is what lets a dictionary carry
//! "methods" that can read its own other fields (spec §3: "self-referencing
//! dictionaries"). Every other value kind routes to its builtin method
//! table in `crate::builtins`. Method calls on `null` propagate `null`
//! rather than raising, matching the "null-propagating method dispatch"
//! rule (spec §4.3.3).

use super::Interpreter;
use crate::ast::{Expression, Position};
use crate::error::ErrorKind;
use crate::value::Value;

pub fn eval_method_call(
    interp: &Interpreter,
    receiver_expr: &Expression,
    method: &str,
    arg_exprs: &[Expression],
    position: &Position,
    env: &crate::environment::Environment,
) -> Result<Value, crate::error::ParsleyError> {
    let receiver = interp.eval(receiver_expr, env)?;
    if matches!(receiver, Value::Null) {
        return Ok(Value::Null);
    }
    let args = arg_exprs
        .iter()
        .map(|a| interp.eval(a, env))
        .collect::<Result<Vec<_>, _>>()?;

    if let Value::Dict(entries) = &receiver {
        let field = entries.borrow().get(method).cloned();
        if let Some(func @ Value::Function(_)) = field {
            return interp.call_function(&func, &args, position, Some(receiver.clone()));
        }
    }

    crate::builtins::dispatch_method(interp, &receiver, method, &args, position).map_err(|e| {
        if e.kind == ErrorKind::UnknownMethod && e.position.is_none() {
            e.with_position(position.clone())
        } else {
            e
        }
    })
}
