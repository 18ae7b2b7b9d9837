//! Expression nodes (spec §4.2, §4.3, §6.2, §6.3).

use super::{Pattern, Position, Tag};
use crate::token::Operator;

/// A `"..."` string literal's content, split around `{expr}` interpolation
/// segments (spec §4.1).
#[derive(Debug, Clone, PartialEq)]
pub enum StringPart {
    Text(String),
    Expr(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Str(Vec<StringPart>),
    Boolean(bool),
    Null,
    Regex { pattern: String, flags: String },
    /// Raw text of an `@`-literal/template, still unparsed at this stage —
    /// the evaluator turns it into a `Value::Path`/`Url`/`Datetime`/
    /// `Duration` (spec §6.2), resolving any `{expr}` segments first.
    Path(Vec<StringPart>),
    Url(Vec<StringPart>),
    Datetime(Vec<StringPart>),
    Duration(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub pattern: Pattern,
    pub default: Option<Expression>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal, Position),
    Ident(String, Position),
    This(Position),
    Array(Vec<Expression>, Position),
    Dict(Vec<(DictKey, Expression)>, Position),
    Tag(Box<Tag>, Position),

    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
        position: Position,
    },
    Binary {
        op: Operator,
        left: Box<Expression>,
        right: Box<Expression>,
        position: Position,
    },
    /// `a ?? b`
    NullCoalesce {
        left: Box<Expression>,
        right: Box<Expression>,
        position: Position,
    },
    /// `start..end`
    Range {
        start: Box<Expression>,
        end: Box<Expression>,
        position: Position,
    },

    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
        position: Position,
    },
    /// `receiver.method(args)` — kept distinct from `Call` so the
    /// interpreter can resolve built-in methods without first evaluating
    /// `receiver.method` as a standalone value (spec §4.3.3).
    MethodCall {
        receiver: Box<Expression>,
        method: String,
        args: Vec<Expression>,
        position: Position,
    },
    Index {
        target: Box<Expression>,
        index: Box<Expression>,
        position: Position,
    },
    /// `target[start:end]`, either bound optional (spec §4.3.2).
    Slice {
        target: Box<Expression>,
        start: Option<Box<Expression>>,
        end: Option<Box<Expression>>,
        position: Position,
    },
    Member {
        target: Box<Expression>,
        field: String,
        position: Position,
    },

    Assign {
        target: Box<Expression>,
        value: Box<Expression>,
        position: Position,
    },
    /// `target += value`-family compound assignment.
    CompoundAssign {
        op: Operator,
        target: Box<Expression>,
        value: Box<Expression>,
        position: Position,
    },

    FnExpr {
        params: Vec<Param>,
        body: Box<super::Block>,
        position: Position,
    },

    /// One of the pipeline/I/O operators from spec §6.3, e.g.
    /// `result <== path` or `response <=#=> command`.
    Pipeline {
        op: Operator,
        target: Box<Expression>,
        source: Box<Expression>,
        position: Position,
    },

    Grouping(Box<Expression>, Position),
}

/// A dictionary literal's key: a bare identifier, a string, or a computed
/// `[expr]` key (spec §4.3, §6.2).
#[derive(Debug, Clone, PartialEq)]
pub enum DictKey {
    Ident(String),
    Str(Vec<StringPart>),
    Computed(Box<Expression>),
}

impl Expression {
    pub fn position(&self) -> Position {
        match self {
            Expression::Literal(_, p)
            | Expression::Ident(_, p)
            | Expression::This(p)
            | Expression::Array(_, p)
            | Expression::Dict(_, p)
            | Expression::Tag(_, p)
            | Expression::Unary { position: p, .. }
            | Expression::Binary { position: p, .. }
            | Expression::NullCoalesce { position: p, .. }
            | Expression::Range { position: p, .. }
            | Expression::Call { position: p, .. }
            | Expression::MethodCall { position: p, .. }
            | Expression::Index { position: p, .. }
            | Expression::Slice { position: p, .. }
            | Expression::Member { position: p, .. }
            | Expression::Assign { position: p, .. }
            | Expression::CompoundAssign { position: p, .. }
            | Expression::FnExpr { position: p, .. }
            | Expression::Pipeline { position: p, .. }
            | Expression::Grouping(_, p) => p.clone(),
        }
    }
}
