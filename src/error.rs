//! Error kinds and the runtime error type.
//!
//! Mirrors the teacher's `loader::loaderror::FileLoadError` /
//! `typechecker::error::TypeError` shape: a plain struct carrying a message
//! and a source position, with hand-written `Display`/`Error` impls rather
//! than a derive-macro error crate (the teacher carries neither `thiserror`
//! nor `anyhow`, so neither is introduced here).

use std::error::Error as StdError;
use std::fmt::{self, Display};

/// A 1-based (line, column) position together with the file it came from.
pub type Position = (String, usize, usize);

/// The tag carried alongside every runtime `Error` value (spec §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    TypeMismatch,
    Arity,
    UnknownIdentifier,
    UnknownMethod,
    IndexOutOfRange,
    KeyMissing,
    InvalidLiteral,
    Io,
    Security,
    DivisionByZero,
    User,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Parse => "parse",
            ErrorKind::TypeMismatch => "type-mismatch",
            ErrorKind::Arity => "arity",
            ErrorKind::UnknownIdentifier => "unknown-identifier",
            ErrorKind::UnknownMethod => "unknown-method",
            ErrorKind::IndexOutOfRange => "index-out-of-range",
            ErrorKind::KeyMissing => "key-missing",
            ErrorKind::InvalidLiteral => "invalid-literal",
            ErrorKind::Io => "io",
            ErrorKind::Security => "security",
            ErrorKind::DivisionByZero => "division-by-zero",
            ErrorKind::User => "user",
        };
        f.write_str(name)
    }
}

/// A Parsley runtime or diagnostic error.
///
/// Doubles as both the value carried by `Value::Error` and the type
/// returned from lexing/parsing, matching the teacher's habit of reusing one
/// small error struct across compiler phases.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsleyError {
    pub kind: ErrorKind,
    pub message: String,
    pub position: Option<Position>,
}

impl ParsleyError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
        }
    }

    pub fn at(kind: ErrorKind, message: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            message: message.into(),
            position: Some(position),
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        if self.position.is_none() {
            self.position = Some(position);
        }
        self
    }
}

impl Display for ParsleyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some((file, line, col)) => {
                write!(f, "{} ({}:{}:{})", self.message, file, line, col)
            }
            None => write!(f, "{}", self.message),
        }
    }
}

impl StdError for ParsleyError {}

pub type LexResult<T> = Result<T, ParsleyError>;
pub type ParseResult<T> = Result<T, ParsleyError>;
