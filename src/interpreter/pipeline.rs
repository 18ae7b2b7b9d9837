//! Pipeline / I/O operators (spec §6.3): `<==`, `==>`, `==>>`, `<=/=`,
//! `=/=>`, `=/=>>`, `<=#=>`, `<=?=>`, `<=??=>`, `<=!=>`.
//!
//! Every one dispatches on the right-hand side's (`source`) pseudo-type
//! (spec §4.4). The left-hand side (`target`) plays a dual role depending on
//! direction: for a *read* (`<==`, `<=/=`, `<=?=>`, `<=??=>`) it is the
//! capture site the result gets assigned into; for a *write* (`==>`, `==>>`,
//! `=/=>`, `=/=>>`, `<=#=>`'s stdin, `<=!=>`) its evaluated value is the
//! payload being sent. Either way, when `target` is a `{data, error}`
//! destructuring pattern, I/O failure binds `error` instead of aborting
//! (spec §6.3); without that pattern, failure surfaces as a plain `Error`
//! value rather than unwinding the script (spec §6.3, §7).

use super::Interpreter;
use crate::adapters::security_denied;
use crate::ast::{Expression, Position};
use crate::environment::Environment;
use crate::error::ParsleyError;
use crate::token::Operator;
use crate::value::{CommandHandle, RequestHandle, Stringify, Value};
use std::collections::BTreeMap;
use std::rc::Rc;

pub fn eval_pipeline(
    interp: &Interpreter,
    op: Operator,
    target: &Expression,
    source: &Expression,
    position: &Position,
    env: &Environment,
) -> Result<Value, ParsleyError> {
    let destructures = matches!(target, Expression::Dict(_, _));
    match run_io(interp, op, target, source, position, env) {
        Ok(data) => {
            let result = if destructures { capture(Some(data), None) } else { data };
            if is_assignable(target) {
                interp.eval_assign(target, result.clone(), position, env)?;
            }
            Ok(result)
        }
        Err(e) => {
            if destructures {
                let result = capture(None, Some(Value::String(e.to_string())));
                interp.eval_assign(target, result.clone(), position, env)?;
                Ok(result)
            } else {
                let err_value = Value::Error(Rc::new(e));
                if is_assignable(target) {
                    interp.eval_assign(target, err_value.clone(), position, env)?;
                }
                Ok(err_value)
            }
        }
    }
}

fn is_assignable(expr: &Expression) -> bool {
    matches!(
        expr,
        Expression::Ident(..) | Expression::Index { .. } | Expression::Member { .. } | Expression::Dict(..)
    )
}

fn capture(data: Option<Value>, error: Option<Value>) -> Value {
    let mut map = BTreeMap::new();
    map.insert("data".to_string(), data.unwrap_or(Value::Null));
    map.insert("error".to_string(), error.unwrap_or(Value::Null));
    Value::new_dict(map)
}

fn run_io(
    interp: &Interpreter,
    op: Operator,
    target: &Expression,
    source: &Expression,
    position: &Position,
    env: &Environment,
) -> Result<Value, ParsleyError> {
    let module = env.module();
    let source_value = interp.eval(source, env)?;

    match op {
        Operator::ReadFile => {
            let path = path_of(&source_value, position)?;
            if !module.adapters.security.allow_read(&path) {
                return Err(security_denied(path.display()));
            }
            Ok(Value::String(module.adapters.filesystem.read_to_string(&path)?))
        }
        Operator::WriteFile | Operator::AppendFile => {
            let path = path_of(&source_value, position)?;
            if !module.adapters.security.allow_write(&path) {
                return Err(security_denied(path.display()));
            }
            let payload = interp.eval(target, env)?.stringify();
            module.adapters.filesystem.write_string(&path, &payload, op == Operator::AppendFile)?;
            Ok(Value::Null)
        }
        Operator::ReadRemote => {
            let request = request_of(&source_value, "GET", None, position)?;
            let response = module.adapters.http.send(&request)?;
            Ok(Value::Response(Rc::new(response)))
        }
        Operator::WriteRemote | Operator::AppendRemote => {
            let payload = interp.eval(target, env)?.stringify();
            let method = if op == Operator::WriteRemote { "PUT" } else { "PATCH" };
            let request = request_of(&source_value, method, Some(payload), position)?;
            let response = module.adapters.http.send(&request)?;
            Ok(Value::Response(Rc::new(response)))
        }
        Operator::ExecCommand => {
            let stdin = interp.eval(target, env)?;
            let stdin = (!matches!(stdin, Value::Null)).then(|| stdin.stringify());
            let command = command_of(&source_value, stdin, position)?;
            if !module.adapters.security.allow_execute(std::path::Path::new(&command.program)) {
                return Err(security_denied(&command.program));
            }
            module.adapters.process.run(&command)
        }
        Operator::DbOne | Operator::DbAll | Operator::DbExec => {
            let (dsn, sql) = query_of(&source_value, position)?;
            match op {
                Operator::DbOne => module.adapters.database.query_one(&dsn, &sql),
                Operator::DbAll => module.adapters.database.query_all(&dsn, &sql),
                _ => module.adapters.database.execute(&dsn, &sql),
            }
        }
        _ => unreachable!("non-pipeline operator reached run_io"),
    }
}

fn path_of(value: &Value, position: &Position) -> Result<std::path::PathBuf, ParsleyError> {
    match value {
        Value::Path(p) => Ok(p.raw.clone()),
        Value::String(s) => Ok(std::path::PathBuf::from(s)),
        other => Err(ParsleyError::at(
            crate::error::ErrorKind::TypeMismatch,
            format!("expected a path, found a {}", other.type_name()),
            position.clone(),
        )),
    }
}

fn request_of(value: &Value, method: &str, body: Option<String>, position: &Position) -> Result<RequestHandle, ParsleyError> {
    match value {
        Value::Request(r) => {
            let mut r = (**r).clone();
            if body.is_some() {
                r.body = body;
            }
            Ok(r)
        }
        Value::Url(u) => Ok(RequestHandle {
            method: method.to_string(),
            url: u.clone(),
            headers: Vec::new(),
            body,
        }),
        other => Err(ParsleyError::at(
            crate::error::ErrorKind::TypeMismatch,
            format!("expected a url or request, found a {}", other.type_name()),
            position.clone(),
        )),
    }
}

fn command_of(value: &Value, stdin: Option<String>, position: &Position) -> Result<CommandHandle, ParsleyError> {
    match value {
        Value::Command(c) => {
            let mut c = (**c).clone();
            if stdin.is_some() {
                c.stdin = stdin;
            }
            Ok(c)
        }
        Value::String(s) => {
            let mut parts = s.split_whitespace();
            let program = parts.next().unwrap_or_default().to_string();
            let args = parts.map(str::to_string).collect();
            Ok(CommandHandle { program, args, stdin })
        }
        other => Err(ParsleyError::at(
            crate::error::ErrorKind::TypeMismatch,
            format!("expected a command, found a {}", other.type_name()),
            position.clone(),
        )),
    }
}

fn query_of(value: &Value, position: &Position) -> Result<(String, String), ParsleyError> {
    match value {
        Value::Array(items) => {
            let items = items.borrow();
            let dsn = items.first().map(Stringify::stringify).unwrap_or_default();
            let sql = items.get(1).map(Stringify::stringify).unwrap_or_default();
            Ok((dsn, sql))
        }
        Value::String(sql) => Ok((String::new(), sql.clone())),
        other => Err(ParsleyError::at(
            crate::error::ErrorKind::TypeMismatch,
            format!("expected a [dsn, sql] pair or a sql string, found a {}", other.type_name()),
            position.clone(),
        )),
    }
}
