//! Tree-walking evaluator (spec §4.4, §4.5).
//!
//! Grounded on the teacher's `interpreter::Scope`/`VariableType` walker,
//! generalized from its four static value kinds to the full dynamically
//! typed `Value` and from its flat `scope_stack` to the `Environment`
//! parent-pointer chain (spec §4.4 requires real closures over enclosing
//! scopes, which a flat stack can't express once functions are captured as
//! values and called later).

mod destructure;
mod methods;
mod pipeline;
mod tags;

use crate::ast::*;
use crate::environment::Environment;
use crate::error::{ErrorKind, ParsleyError};
use crate::value::{dispatch_binary, Function, Value};
use std::rc::Rc;

pub use destructure::bind_pattern;

/// Non-local control flow a block can unwind through. `Return` is the only
/// one Parsley's grammar produces (no `break`/`continue` in spec), modeled
/// as its own variant rather than folded into `ParsleyError` so a `return`
/// doesn't get mistaken for an uncaught script error.
pub enum Flow {
    Value(Value),
    Return(Value),
}

type EvalResult = Result<Value, ParsleyError>;
type ExecResult = Result<Flow, ParsleyError>;

pub struct Interpreter {
    pub global: Environment,
}

impl Interpreter {
    pub fn new(global: Environment) -> Self {
        Self { global }
    }

    pub fn run(&self, program: &Program) -> Result<Value, ParsleyError> {
        let mut last = Value::Null;
        for stmt in &program.statements {
            match self.exec_statement(stmt, &self.global)? {
                Flow::Value(v) => last = v,
                Flow::Return(v) => return Ok(v),
            }
        }
        Ok(last)
    }

    fn exec_block(&self, block: &Block, env: &Environment) -> ExecResult {
        let scope = env.child();
        let mut last = Value::Null;
        for stmt in &block.statements {
            match self.exec_statement(stmt, &scope)? {
                Flow::Value(v) => last = v,
                ret @ Flow::Return(_) => return Ok(ret),
            }
        }
        Ok(Flow::Value(last))
    }

    fn exec_statement(&self, stmt: &Statement, env: &Environment) -> ExecResult {
        match stmt {
            Statement::Let(l) => {
                let value = self.eval(&l.value, env)?;
                bind_pattern(&l.pattern, value, env)?;
                if l.exported {
                    for name in l.pattern.bound_names() {
                        env.export(&name);
                    }
                }
                Ok(Flow::Value(Value::Null))
            }
            Statement::FnDef(def) => {
                let func = Value::Function(Rc::new(Function::Closure {
                    params: def.params.clone(),
                    body: Rc::new(def.body.clone()),
                    env: env.clone(),
                    name: Some(def.name.clone()),
                }));
                env.define(&def.name, func);
                if def.exported {
                    env.export(&def.name);
                }
                Ok(Flow::Value(Value::Null))
            }
            Statement::If(if_stmt) => self.exec_if(if_stmt, env),
            Statement::For(for_stmt) => self.exec_for(for_stmt, env),
            Statement::Return(ret) => {
                let value = match &ret.value {
                    Some(e) => self.eval(e, env)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            }
            Statement::Import(import) => {
                self.exec_import(import, env)?;
                Ok(Flow::Value(Value::Null))
            }
            Statement::Expression(expr) => Ok(Flow::Value(self.eval(expr, env)?)),
        }
    }

    fn exec_if(&self, if_stmt: &If, env: &Environment) -> ExecResult {
        if self.eval(&if_stmt.cond, env)?.is_truthy() {
            return self.exec_block(&if_stmt.then_branch, env);
        }
        match &if_stmt.else_branch {
            Some(branch) => match branch.as_ref() {
                ElseBranch::Block(b) => self.exec_block(b, env),
                ElseBranch::If(nested) => self.exec_if(nested, env),
            },
            None => Ok(Flow::Value(Value::Null)),
        }
    }

    fn exec_for(&self, for_stmt: &For, env: &Environment) -> ExecResult {
        let iterable = self.eval(&for_stmt.iterable, env)?;
        let items = iterate(&iterable, &for_stmt.position)?;
        for item in items {
            let scope = env.child();
            bind_pattern(&for_stmt.pattern, item, &scope)?;
            match self.exec_block(&for_stmt.body, &scope)? {
                Flow::Value(_) => {}
                ret @ Flow::Return(_) => return Ok(ret),
            }
        }
        Ok(Flow::Value(Value::Null))
    }

    fn exec_import(&self, import: &Import, env: &Environment) -> Result<(), ParsleyError> {
        let module_env = self.load_module(&import.path, env)?;
        match &import.binding {
            ImportBinding::Module(name) => {
                let mut map = std::collections::BTreeMap::new();
                for exported in module_env.module().exports.borrow().iter() {
                    if let Some(v) = module_env.get(exported) {
                        map.insert(exported.clone(), v);
                    }
                }
                env.define(name, Value::new_dict(map));
            }
            ImportBinding::Names(names) => {
                for (name, alias) in names {
                    let value = module_env.get(name).ok_or_else(|| {
                        ParsleyError::at(
                            ErrorKind::UnknownIdentifier,
                            format!("module '{}' has no export '{name}'", import.path),
                            import.position.clone(),
                        )
                    })?;
                    env.define(alias.as_deref().unwrap_or(name), value);
                }
            }
        }
        Ok(())
    }

    /// Loads and evaluates a module file, keyed by its canonical path in a
    /// cache shared across the whole run (spec §4.6: "canonical-path-keyed
    /// shared cache").
    fn load_module(&self, path: &str, env: &Environment) -> Result<Environment, ParsleyError> {
        let base = std::path::Path::new(&env.module().filename);
        let resolved = base.parent().unwrap_or(std::path::Path::new(".")).join(path);
        let canonical = resolved
            .canonicalize()
            .unwrap_or(resolved.clone());
        let key = canonical.to_string_lossy().to_string();

        if let Some(cached) = MODULE_CACHE.with(|c| c.borrow().get(&key).cloned()) {
            return Ok(cached);
        }

        let adapters = env.module().adapters.clone();
        if !adapters.security.allow_execute(&canonical) {
            return Err(crate::adapters::security_denied(canonical.display()));
        }
        let source = adapters.filesystem.read_to_string(&canonical)?;
        let tokens = crate::lexer::Lexer::new(&source, key.clone()).lex()?;
        let program = crate::parser::Parser::new(tokens, key.clone())
            .parse_program()
            .map_err(|errs| errs.into_iter().next().unwrap())?;

        let module_env = Environment::root(key.clone(), adapters);
        let sub = Interpreter::new(module_env.clone());
        sub.run(&program)?;

        MODULE_CACHE.with(|c| c.borrow_mut().insert(key, module_env.clone()));
        Ok(module_env)
    }

    // -- expressions --------------------------------------------------------

    fn eval(&self, expr: &Expression, env: &Environment) -> EvalResult {
        match expr {
            Expression::Literal(lit, pos) => self.eval_literal(lit, pos, env),
            Expression::Ident(name, pos) => env.get(name).ok_or_else(|| {
                ParsleyError::at(ErrorKind::UnknownIdentifier, format!("unknown identifier '{name}'"), pos.clone())
            }),
            Expression::This(pos) => env.this().ok_or_else(|| {
                ParsleyError::at(ErrorKind::UnknownIdentifier, "'this' is not bound here", pos.clone())
            }),
            Expression::Array(items, _) => {
                let values = items.iter().map(|e| self.eval(e, env)).collect::<Result<Vec<_>, _>>()?;
                Ok(Value::new_array(values))
            }
            Expression::Dict(entries, _) => self.eval_dict(entries, env),
            Expression::Tag(tag, _) => tags::eval_tag(self, tag, env),
            Expression::Unary { op, operand, .. } => {
                let value = self.eval(operand, env)?;
                crate::value::dispatch_unary(*op, &value)
            }
            Expression::Binary { op, left, right, position } => {
                let l = self.eval(left, env)?;
                let r = self.eval(right, env)?;
                dispatch_binary(*op, &l, &r).map_err(|e| e.with_position(position.clone()))
            }
            Expression::NullCoalesce { left, right, .. } => {
                let l = self.eval(left, env)?;
                if matches!(l, Value::Null) {
                    self.eval(right, env)
                } else {
                    Ok(l)
                }
            }
            Expression::Range { start, end, position } => {
                let s = self.eval(start, env)?;
                let e = self.eval(end, env)?;
                match (s, e) {
                    (Value::Integer(a), Value::Integer(b)) => {
                        Ok(Value::new_array((a..b).map(Value::Integer).collect()))
                    }
                    _ => Err(ParsleyError::at(ErrorKind::TypeMismatch, "range bounds must be integers", position.clone())),
                }
            }
            Expression::Call { callee, args, position } => self.eval_call(callee, args, position, env),
            Expression::MethodCall { receiver, method, args, position } => {
                methods::eval_method_call(self, receiver, method, args, position, env)
            }
            Expression::Index { target, index, position } => self.eval_index(target, index, position, env),
            Expression::Slice { target, start, end, position } => self.eval_slice(target, start, end, position, env),
            Expression::Member { target, field, position } => self.eval_member(target, field, position, env),
            Expression::Assign { target, value, position } => {
                let v = self.eval(value, env)?;
                self.eval_assign(target, v, position, env)
            }
            Expression::CompoundAssign { op, target, value, position } => {
                let current = self.eval(target, env)?;
                let rhs = self.eval(value, env)?;
                let combined = dispatch_binary(*op, &current, &rhs).map_err(|e| e.with_position(position.clone()))?;
                self.eval_assign(target, combined, position, env)
            }
            Expression::FnExpr { params, body, position: _ } => {
                Ok(Value::Function(Rc::new(Function::Closure {
                    params: params.clone(),
                    body: Rc::new((**body).clone()),
                    env: env.clone(),
                    name: None,
                })))
            }
            Expression::Pipeline { op, target, source, position } => {
                pipeline::eval_pipeline(self, *op, target, source, position, env)
            }
            Expression::Grouping(inner, _) => self.eval(inner, env),
        }
    }

    fn eval_literal(&self, lit: &Literal, pos: &Position, env: &Environment) -> EvalResult {
        Ok(match lit {
            Literal::Integer(n) => Value::Integer(*n),
            Literal::Float(n) => Value::Float(*n),
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Null => Value::Null,
            Literal::Str(parts) => Value::String(self.eval_string_parts(parts, env)?),
            Literal::Regex { pattern, flags } => {
                crate::builtins::regex::make_regex(pattern, flags, pos)?
            }
            Literal::Path(parts) => {
                let raw = self.eval_string_parts(parts, env)?;
                crate::builtins::path::make_path(&raw)
            }
            Literal::Url(parts) => {
                let raw = self.eval_string_parts(parts, env)?;
                crate::builtins::url::make_url(&raw, pos)?
            }
            Literal::Datetime(parts) => {
                let raw = self.eval_string_parts(parts, env)?;
                crate::builtins::datetime::make_datetime(&raw, pos)?
            }
            Literal::Duration(raw) => crate::builtins::duration::make_duration(raw, pos)?,
        })
    }

    fn eval_string_parts(&self, parts: &[StringPart], env: &Environment) -> Result<String, ParsleyError> {
        use crate::value::Stringify;
        let mut out = String::new();
        for part in parts {
            match part {
                StringPart::Text(t) => out.push_str(t),
                StringPart::Expr(e) => out.push_str(&self.eval(e, env)?.stringify()),
            }
        }
        Ok(out)
    }

    fn eval_dict(&self, entries: &[(DictKey, Expression)], env: &Environment) -> EvalResult {
        let mut map = std::collections::BTreeMap::new();
        for (key, value_expr) in entries {
            let key = match key {
                DictKey::Ident(name) => name.clone(),
                DictKey::Str(parts) => self.eval_string_parts(parts, env)?,
                DictKey::Computed(expr) => {
                    use crate::value::Stringify;
                    self.eval(expr, env)?.stringify()
                }
            };
            let value = self.eval(value_expr, env)?;
            map.insert(key, value);
        }
        Ok(Value::new_dict(map))
    }

    fn eval_call(&self, callee: &Expression, args: &[Expression], position: &Position, env: &Environment) -> EvalResult {
        let func = self.eval(callee, env)?;
        let arg_values = args.iter().map(|a| self.eval(a, env)).collect::<Result<Vec<_>, _>>()?;
        self.call_function(&func, &arg_values, position, None)
    }

    pub fn call_function(
        &self,
        func: &Value,
        args: &[Value],
        position: &Position,
        this: Option<Value>,
    ) -> EvalResult {
        let Value::Function(f) = func else {
            return Err(ParsleyError::at(
                ErrorKind::TypeMismatch,
                format!("'{}' is not callable", func.type_name()),
                position.clone(),
            ));
        };
        match f.as_ref() {
            Function::Native { func, arity, name } => {
                if let Some(arity) = arity {
                    if args.len() != *arity {
                        return Err(ParsleyError::at(
                            ErrorKind::Arity,
                            format!("'{name}' expects {arity} argument(s), got {}", args.len()),
                            position.clone(),
                        ));
                    }
                }
                func(args)
            }
            Function::Closure { params, body, env: closure_env, name } => {
                let call_env = match this {
                    Some(t) => closure_env.with_this(t),
                    None => closure_env.child(),
                };
                bind_params(params, args, &call_env, self, position, name.as_deref())?;
                match self.exec_block(body, &call_env)? {
                    Flow::Value(v) | Flow::Return(v) => Ok(v),
                }
            }
        }
    }

    fn eval_index(&self, target: &Expression, index: &Expression, position: &Position, env: &Environment) -> EvalResult {
        let t = self.eval(target, env)?;
        let i = self.eval(index, env)?;
        index_value(&t, &i, position)
    }

    fn eval_slice(
        &self,
        target: &Expression,
        start: &Option<Box<Expression>>,
        end: &Option<Box<Expression>>,
        position: &Position,
        env: &Environment,
    ) -> EvalResult {
        let t = self.eval(target, env)?;
        let start = start.as_ref().map(|e| self.eval(e, env)).transpose()?;
        let end = end.as_ref().map(|e| self.eval(e, env)).transpose()?;
        slice_value(&t, start.as_ref(), end.as_ref(), position)
    }

    fn eval_member(&self, target: &Expression, field: &str, position: &Position, env: &Environment) -> EvalResult {
        let t = self.eval(target, env)?;
        if matches!(t, Value::Null) {
            return Ok(Value::Null);
        }
        member_value(&t, field, position)
    }

    fn eval_assign(&self, target: &Expression, value: Value, position: &Position, env: &Environment) -> EvalResult {
        match target {
            Expression::Ident(name, _) => {
                if !env.assign(name, value.clone()) {
                    env.define(name, value.clone());
                }
                Ok(value)
            }
            Expression::Index { target, index, .. } => {
                let t = self.eval(target, env)?;
                let i = self.eval(index, env)?;
                assign_index(&t, &i, value.clone(), position)?;
                Ok(value)
            }
            Expression::Member { target, field, .. } => {
                let t = self.eval(target, env)?;
                assign_member(&t, field, value.clone(), position)?;
                Ok(value)
            }
            // `{data, error} <== source`: destructure the pipeline's result
            // dict into the named targets (spec §6.3).
            Expression::Dict(entries, _) => {
                let Value::Dict(source_fields) = &value else {
                    return Err(ParsleyError::at(
                        ErrorKind::TypeMismatch,
                        format!("cannot destructure a {} into {{..}}", value.type_name()),
                        position.clone(),
                    ));
                };
                for (key, sub_target) in entries {
                    let DictKey::Ident(name) = key else {
                        return Err(ParsleyError::at(ErrorKind::InvalidLiteral, "invalid destructuring key", position.clone()));
                    };
                    let field_value = source_fields.borrow().get(name).cloned().unwrap_or(Value::Null);
                    self.eval_assign(sub_target, field_value, position, env)?;
                }
                Ok(value)
            }
            _ => Err(ParsleyError::at(ErrorKind::InvalidLiteral, "invalid assignment target", position.clone())),
        }
    }
}

fn bind_params(
    params: &[Param],
    args: &[Value],
    env: &Environment,
    interp: &Interpreter,
    position: &Position,
    fn_name: Option<&str>,
) -> Result<(), ParsleyError> {
    let required = params.iter().filter(|p| p.default.is_none()).count();
    if args.len() < required || args.len() > params.len() {
        return Err(ParsleyError::at(
            ErrorKind::Arity,
            format!(
                "'{}' expects {}{} argument(s), got {}",
                fn_name.unwrap_or("<anonymous>"),
                if required == params.len() { "" } else { "at least " },
                required,
                args.len()
            ),
            position.clone(),
        ));
    }
    for (i, param) in params.iter().enumerate() {
        let value = match args.get(i) {
            Some(v) => v.clone(),
            None => match &param.default {
                Some(expr) => interp.eval(expr, env)?,
                None => Value::Null,
            },
        };
        bind_pattern(&param.pattern, value, env)?;
    }
    Ok(())
}

fn iterate(value: &Value, position: &Position) -> Result<Vec<Value>, ParsleyError> {
    match value {
        Value::Array(items) => Ok(items.borrow().clone()),
        Value::String(s) => Ok(s.chars().map(|c| Value::String(c.to_string())).collect()),
        Value::Dict(entries) => Ok(entries
            .borrow()
            .iter()
            .map(|(k, v)| Value::new_array(vec![Value::String(k.clone()), v.clone()]))
            .collect()),
        _ => Err(ParsleyError::at(
            ErrorKind::TypeMismatch,
            format!("'{}' is not iterable", value.type_name()),
            position.clone(),
        )),
    }
}

pub fn index_value(target: &Value, index: &Value, position: &Position) -> EvalResult {
    match (target, index) {
        (Value::Array(items), Value::Integer(i)) => {
            let items = items.borrow();
            let idx = normalize_index(*i, items.len());
            items.get(idx).cloned().ok_or_else(|| {
                ParsleyError::at(ErrorKind::IndexOutOfRange, format!("index {i} out of range"), position.clone())
            })
        }
        (Value::String(s), Value::Integer(i)) => {
            let chars: Vec<char> = s.chars().collect();
            let idx = normalize_index(*i, chars.len());
            chars
                .get(idx)
                .map(|c| Value::String(c.to_string()))
                .ok_or_else(|| ParsleyError::at(ErrorKind::IndexOutOfRange, format!("index {i} out of range"), position.clone()))
        }
        (Value::Dict(entries), Value::String(k)) => entries
            .borrow()
            .get(k)
            .cloned()
            .ok_or_else(|| ParsleyError::at(ErrorKind::KeyMissing, format!("key '{k}' is missing"), position.clone())),
        _ => Err(ParsleyError::at(
            ErrorKind::TypeMismatch,
            format!("cannot index a {} with a {}", target.type_name(), index.type_name()),
            position.clone(),
        )),
    }
}

/// Clamps a possibly-negative, possibly-absent slice bound into `0..=len`
/// (spec §4.3.2: both bounds optional, out-of-range values clamp rather
/// than error, `start > end` yields an empty result).
fn clamp_bound(i: Option<i64>, len: usize, default: usize) -> usize {
    match i {
        None => default,
        Some(i) if i < 0 => ((len as i64 + i).max(0) as usize).min(len),
        Some(i) => (i as usize).min(len),
    }
}

pub fn slice_value(target: &Value, start: Option<&Value>, end: Option<&Value>, position: &Position) -> EvalResult {
    let as_int = |v: Option<&Value>, name: &str| -> Result<Option<i64>, ParsleyError> {
        match v {
            None => Ok(None),
            Some(Value::Integer(i)) => Ok(Some(*i)),
            Some(other) => Err(ParsleyError::at(
                ErrorKind::TypeMismatch,
                format!("slice {name} must be an integer, got {}", other.type_name()),
                position.clone(),
            )),
        }
    };
    let start = as_int(start, "start")?;
    let end = as_int(end, "end")?;

    match target {
        Value::Array(items) => {
            let items = items.borrow();
            let len = items.len();
            let from = clamp_bound(start, len, 0);
            let to = clamp_bound(end, len, len);
            if from >= to {
                Ok(Value::new_array(Vec::new()))
            } else {
                Ok(Value::new_array(items[from..to].to_vec()))
            }
        }
        Value::String(s) => {
            let chars: Vec<char> = s.chars().collect();
            let len = chars.len();
            let from = clamp_bound(start, len, 0);
            let to = clamp_bound(end, len, len);
            if from >= to {
                Ok(Value::String(String::new()))
            } else {
                Ok(Value::String(chars[from..to].iter().collect()))
            }
        }
        _ => Err(ParsleyError::at(
            ErrorKind::TypeMismatch,
            format!("cannot slice a {}", target.type_name()),
            position.clone(),
        )),
    }
}

fn normalize_index(i: i64, len: usize) -> usize {
    if i < 0 {
        (len as i64 + i).max(-1) as usize
    } else {
        i as usize
    }
}

pub fn member_value(target: &Value, field: &str, position: &Position) -> EvalResult {
    match target {
        Value::Dict(entries) => entries.borrow().get(field).cloned().or(Some(Value::Null)).ok_or_else(|| {
            ParsleyError::at(ErrorKind::KeyMissing, format!("key '{field}' is missing"), position.clone())
        }),
        other => other
            .to_dict_field(field)
            .ok_or_else(|| ParsleyError::at(ErrorKind::UnknownMethod, format!("'{field}' is not a field of {}", other.type_name()), position.clone())),
    }
}

fn assign_index(target: &Value, index: &Value, value: Value, position: &Position) -> Result<(), ParsleyError> {
    match (target, index) {
        (Value::Array(items), Value::Integer(i)) => {
            let mut items = items.borrow_mut();
            let idx = normalize_index(*i, items.len());
            if idx >= items.len() {
                if idx == items.len() {
                    items.push(value);
                    return Ok(());
                }
                return Err(ParsleyError::at(ErrorKind::IndexOutOfRange, format!("index {i} out of range"), position.clone()));
            }
            items[idx] = value;
            Ok(())
        }
        (Value::Dict(entries), Value::String(k)) => {
            entries.borrow_mut().insert(k.clone(), value);
            Ok(())
        }
        _ => Err(ParsleyError::at(ErrorKind::TypeMismatch, "invalid index-assignment target", position.clone())),
    }
}

fn assign_member(target: &Value, field: &str, value: Value, position: &Position) -> Result<(), ParsleyError> {
    match target {
        Value::Dict(entries) => {
            entries.borrow_mut().insert(field.to_string(), value);
            Ok(())
        }
        _ => Err(ParsleyError::at(
            ErrorKind::TypeMismatch,
            format!("cannot set field '{field}' on a {}", target.type_name()),
            position.clone(),
        )),
    }
}

thread_local! {
    static MODULE_CACHE: std::cell::RefCell<std::collections::HashMap<String, Environment>> =
        std::cell::RefCell::new(std::collections::HashMap::new());
}
