//! Tag (HTML/XML-like) expression nodes (spec §4.7, §4.8).

use super::{Expression, Position};

/// One attribute on an opening tag: `name="literal"`, `name={expr}`, or a
/// bare boolean attribute `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct TagAttr {
    pub name: String,
    pub value: Option<Expression>,
    pub position: Position,
}

/// A single child of a tag: literal text, an interpolated `{expr}`, or a
/// nested tag/fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum TagChild {
    Text(String),
    Expr(Expression),
    Tag(Box<Tag>),
}

/// `<Name attr...>children</Name>`, `<Name attr.../>`, or a fragment
/// `<>children</>` when `name` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: Option<String>,
    pub attrs: Vec<TagAttr>,
    pub children: Vec<TagChild>,
    pub self_closing: bool,
    pub position: Position,
}
