//! Token model (spec §3.1).
//!
//! A single flat `Token { kind, text, line, column }` struct, in the spirit
//! of the teacher's `(line, col)` position pairs carried on every AST node,
//! but collapsed to one struct instead of the teacher's one-variant-per-kind
//! `Token` enum (`lexer/token.rs`) — Parsley's token set is large (five
//! `@`-literal families, tag tokens, a dozen pipeline operators) and a flat
//! struct keeps the lexer and the Pratt parser free of per-kind match
//! boilerplate.

use std::fmt::{self, Display};

/// Keywords recognized by the lexer (spec §3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Let,
    Export,
    Fn,
    If,
    Else,
    For,
    In,
    Import,
    Return,
    This,
    As,
}

impl Keyword {
    pub fn from_str(s: &str) -> Option<Keyword> {
        Some(match s {
            "let" => Keyword::Let,
            "export" => Keyword::Export,
            "fn" => Keyword::Fn,
            "if" => Keyword::If,
            "else" => Keyword::Else,
            "for" => Keyword::For,
            "in" => Keyword::In,
            "import" => Keyword::Import,
            "return" => Keyword::Return,
            "this" => Keyword::This,
            "as" => Keyword::As,
            _ => return None,
        })
    }
}

/// Binary/unary/assignment operator punctuation (spec §4.2, §4.3.1, §6.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Assign,      // =
    Plus,        // +
    Minus,       // -
    Star,        // *
    Slash,       // /
    Percent,     // %
    PlusPlus,    // ++
    EqEq,        // ==
    NotEq,       // !=
    Lt,          // <
    Le,          // <=
    Gt,          // >
    Ge,          // >=
    DotDot,      // ..
    Tilde,       // ~
    NotTilde,    // !~
    AndAnd,      // &&
    OrOr,        // ||
    QuestionQuestion, // ??
    Bang,        // !
    // Pipeline/I/O operators (§6.3)
    ReadFile,    // <==
    WriteFile,   // ==>
    AppendFile,  // ==>>
    ReadRemote,  // <=/=
    WriteRemote, // =/=>
    AppendRemote, // =/=>>
    ExecCommand, // <=#=>
    DbOne,       // <=?=>
    DbAll,       // <=??=>
    DbExec,      // <=!=>
}

impl Operator {
    /// Whether this operator begins an assignment/read-write statement form
    /// (precedence level 1 in spec §4.2's table).
    pub fn is_assign_like(self) -> bool {
        matches!(
            self,
            Operator::Assign
                | Operator::ReadFile
                | Operator::WriteFile
                | Operator::AppendFile
                | Operator::ReadRemote
                | Operator::WriteRemote
                | Operator::AppendRemote
                | Operator::ExecCommand
                | Operator::DbOne
                | Operator::DbAll
                | Operator::DbExec
        )
    }
}

/// Structural punctuation that isn't an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Dot,
    Semicolon,
    Ellipsis, // ...
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Integer,
    Float,
    String,
    Boolean,
    Null,
    Keyword(Keyword),
    Operator(Operator),
    Punct(Punct),
    PathLiteral,
    UrlLiteral,
    DatetimeLiteral,
    DurationLiteral,
    PathTemplate,
    UrlTemplate,
    DatetimeTemplate,
    TagOpen,
    TagClose,
    TagSelfClose,
    RawText,
    FragmentOpen,
    FragmentClose,
    Regex,
    Eof,
}

/// A single lexeme: its kind, the literal source text it was read from, and
/// its 1-based source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// Whether this token could terminate an expression, i.e. whether a
    /// following `/` should be read as division rather than the start of a
    /// regex literal (spec §4.1).
    pub fn ends_expression(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Identifier
                | TokenKind::Integer
                | TokenKind::Float
                | TokenKind::String
                | TokenKind::Boolean
                | TokenKind::Null
                | TokenKind::PathLiteral
                | TokenKind::UrlLiteral
                | TokenKind::DatetimeLiteral
                | TokenKind::DurationLiteral
                | TokenKind::Regex
                | TokenKind::TagSelfClose
                | TokenKind::TagClose
                | TokenKind::FragmentClose
                | TokenKind::Punct(Punct::RParen)
                | TokenKind::Punct(Punct::RBracket)
                | TokenKind::Punct(Punct::RBrace)
                | TokenKind::Keyword(Keyword::This)
        )
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?} at {}:{}", self.kind, self.text, self.line, self.column)
    }
}
