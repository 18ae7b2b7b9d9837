//! The runtime value model (spec §3, §4.3).
//!
//! The original system represents every pseudo-type (`Datetime`, `Regex`,
//! `Path`, ...) as a plain dictionary carrying a magic `__type` string key.
//! Here they are proper `Value` variants with their own Rust-typed payload
//! records instead — `__type` is synthesized on demand by `ToDict` when a
//! script asks to see one as a dictionary (spec's redesign note, §9).
//! Grounded on the teacher's tree-walking `interpreter::Scope` holding typed
//! `VariableType` values rather than a dynamically-typed blob.

mod ops;
mod pseudo;
mod stringify;

pub use ops::{dispatch_binary, dispatch_unary};
pub use pseudo::*;
pub use stringify::{Stringify, ToDict};

use crate::ast::{Block, Param};
use crate::environment::Environment;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// A user-defined or builtin function value.
#[derive(Clone)]
pub enum Function {
    Closure {
        params: Vec<Param>,
        body: Rc<Block>,
        env: Environment,
        name: Option<String>,
    },
    Native {
        name: &'static str,
        arity: Option<usize>,
        func: Rc<dyn Fn(&[Value]) -> Result<Value, crate::error::ParsleyError>>,
    },
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Closure { name, params, .. } => {
                write!(f, "<fn {} /{}>", name.as_deref().unwrap_or("anonymous"), params.len())
            }
            Function::Native { name, .. } => write!(f, "<native fn {name}>"),
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Function::Native { name: a, .. }, Function::Native { name: b, .. }) => a == b,
            (Function::Closure { body: a, .. }, Function::Closure { body: b, .. }) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A dictionary is the one genuinely recursive, mutable, self-referencing
/// value kind (spec §3: "self-referencing dictionaries as first-class
/// values") so it is the only variant wrapped in `Rc<RefCell<_>>`; arrays get
/// the same treatment for the same reason (in-place mutation visible through
/// aliases), everything else is plain-old-data and clones cheaply.
pub type DictRef = Rc<RefCell<BTreeMap<String, Value>>>;
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    Array(ArrayRef),
    Dict(DictRef),
    Function(Rc<Function>),

    Datetime(Datetime),
    Duration(Duration),
    Regex(RegexValue),
    Path(PathValue),
    Url(UrlValue),
    Tag(Rc<TagValue>),

    File(Rc<RefCell<FileHandle>>),
    Dir(Rc<DirHandle>),
    Request(Rc<RequestHandle>),
    Response(Rc<ResponseHandle>),
    Command(Rc<CommandHandle>),
    DbConnection(Rc<DbConnectionHandle>),
    SftpConnection(Rc<SftpConnectionHandle>),

    /// An uncaught/captured error value, as produced by pipeline operators'
    /// `{data, error}` idiom (spec §6.3) and by the `Error`/`throw`-style
    /// builtin.
    Error(Rc<crate::error::ParsleyError>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
            Value::Function(_) => "function",
            Value::Datetime(_) => "datetime",
            Value::Duration(_) => "duration",
            Value::Regex(_) => "regex",
            Value::Path(_) => "path",
            Value::Url(_) => "url",
            Value::Tag(_) => "tag",
            Value::File(_) => "file",
            Value::Dir(_) => "dir",
            Value::Request(_) => "request",
            Value::Response(_) => "response",
            Value::Command(_) => "command",
            Value::DbConnection(_) => "db_connection",
            Value::SftpConnection(_) => "sftp_connection",
            Value::Error(_) => "error",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.borrow().is_empty(),
            Value::Dict(d) => !d.borrow().is_empty(),
            _ => true,
        }
    }

    pub fn new_array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn new_dict(entries: BTreeMap<String, Value>) -> Value {
        Value::Dict(Rc::new(RefCell::new(entries)))
    }

    /// Field access on a pseudo-type (`url.host`, `datetime.iso`, ...),
    /// routed through its synthesized `__type` dictionary view (spec §9).
    pub fn to_dict_field(&self, field: &str) -> Option<Value> {
        use stringify::ToDict;
        match self.to_dict()? {
            Value::Dict(entries) => entries.borrow().get(field).cloned(),
            _ => None,
        }
    }

    /// Structural equality used by `==`/`!=` (spec §4.3.1): value equality
    /// for primitives, reference equality for the mutable reference kinds.
    pub fn structural_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => *a as f64 == *b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                Rc::ptr_eq(a, b) || {
                    let a = a.borrow();
                    let b = b.borrow();
                    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.structural_eq(y))
                }
            }
            (Value::Dict(a), Value::Dict(b)) => Rc::ptr_eq(a, b),
            (Value::Datetime(a), Value::Datetime(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Path(a), Value::Path(b)) => a == b,
            (Value::Url(a), Value::Url(b)) => a == b,
            (Value::Regex(a), Value::Regex(b)) => a.source == b.source && a.flags == b.flags,
            _ => false,
        }
    }
}
