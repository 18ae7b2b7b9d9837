//! Destructuring patterns for `let` bindings, `for` loops, and pipeline
//! `{data, error}` captures (spec §4.2, §6.3).

use super::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// A plain `name` binding.
    Ident(String, Position),
    /// `[a, b, ...rest]`
    Array {
        elements: Vec<Pattern>,
        rest: Option<Box<Pattern>>,
        position: Position,
    },
    /// `{a, b: renamed, ...rest}`
    Dict {
        fields: Vec<(String, Pattern)>,
        rest: Option<Box<Pattern>>,
        position: Position,
    },
    /// `_`, discards the bound value.
    Wildcard(Position),
}

impl Pattern {
    pub fn position(&self) -> Position {
        match self {
            Pattern::Ident(_, p) => p.clone(),
            Pattern::Array { position, .. } => position.clone(),
            Pattern::Dict { position, .. } => position.clone(),
            Pattern::Wildcard(p) => p.clone(),
        }
    }

    /// Every identifier this pattern would bind, in binding order.
    pub fn bound_names(&self) -> Vec<String> {
        match self {
            Pattern::Ident(name, _) => vec![name.clone()],
            Pattern::Wildcard(_) => vec![],
            Pattern::Array { elements, rest, .. } => {
                let mut names: Vec<String> = elements.iter().flat_map(Pattern::bound_names).collect();
                if let Some(rest) = rest {
                    names.extend(rest.bound_names());
                }
                names
            }
            Pattern::Dict { fields, rest, .. } => {
                let mut names: Vec<String> = fields.iter().flat_map(|(_, p)| p.bound_names()).collect();
                if let Some(rest) = rest {
                    names.extend(rest.bound_names());
                }
                names
            }
        }
    }
}
