//! Recursive-descent statement/tag parser plus a Pratt expression parser
//! over the token stream, following spec §4.2's precedence table.
//!
//! The teacher parses via a `pest` grammar; Parsley's lexer does real
//! stateful mode-switching (tags, raw text, regex-vs-division) that a PEG
//! grammar can't express cleanly, so this parser is hand-written instead,
//! working directly off `Vec<Token>` the way the teacher's `Tokens<T>`
//! peekable cursor (`lexer/tokens.rs`) wraps its own token stream. Parse
//! errors accumulate into a `Vec<ParsleyError>` rather than bailing on the
//! first one, so a single `parsley check` run can report more than one
//! mistake (spec §7).

mod tags;

use crate::ast::*;
use crate::error::{ErrorKind, ParsleyError};
use crate::token::{Keyword, Operator, Punct, Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    file: String,
    errors: Vec<ParsleyError>,
}

type PResult<T> = Result<T, ParsleyError>;

impl Parser {
    pub fn new(tokens: Vec<Token>, file: impl Into<String>) -> Self {
        Self {
            tokens,
            pos: 0,
            file: file.into(),
            errors: Vec::new(),
        }
    }

    pub fn parse_program(mut self) -> Result<Program, Vec<ParsleyError>> {
        let mut statements = Vec::new();
        while !self.at_eof() {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }
        if self.errors.is_empty() {
            Ok(Program::new(statements))
        } else {
            Err(self.errors)
        }
    }

    /// Skip tokens until the start of what looks like the next statement,
    /// so one parse error doesn't cascade into dozens of spurious ones.
    fn synchronize(&mut self) {
        while !self.at_eof() {
            if self.check_punct(Punct::Semicolon) {
                self.advance();
                return;
            }
            if matches!(
                self.peek().kind,
                TokenKind::Keyword(Keyword::Let)
                    | TokenKind::Keyword(Keyword::Fn)
                    | TokenKind::Keyword(Keyword::If)
                    | TokenKind::Keyword(Keyword::For)
                    | TokenKind::Keyword(Keyword::Return)
                    | TokenKind::Keyword(Keyword::Import)
                    | TokenKind::Keyword(Keyword::Export)
            ) {
                return;
            }
            self.advance();
        }
    }

    // -- cursor helpers ---------------------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if !self.at_eof() {
            self.pos += 1;
        }
        tok
    }

    fn pos_of(&self, tok: &Token) -> Position {
        (self.file.clone(), tok.line, tok.column)
    }

    fn error(&self, message: impl Into<String>) -> ParsleyError {
        ParsleyError::at(ErrorKind::Parse, message, self.pos_of(self.peek()))
    }

    fn check_punct(&self, p: Punct) -> bool {
        matches!(self.peek().kind, TokenKind::Punct(k) if k == p)
    }

    fn check_op(&self, op: Operator) -> bool {
        matches!(self.peek().kind, TokenKind::Operator(k) if k == op)
    }

    fn check_kw(&self, kw: Keyword) -> bool {
        matches!(self.peek().kind, TokenKind::Keyword(k) if k == kw)
    }

    fn expect_punct(&mut self, p: Punct) -> PResult<Token> {
        if self.check_punct(p) {
            Ok(self.advance())
        } else {
            Err(self.error(format!("expected '{p:?}', found {:?}", self.peek().kind)))
        }
    }

    fn expect_identifier(&mut self) -> PResult<(String, Position)> {
        if matches!(self.peek().kind, TokenKind::Identifier) {
            let tok = self.advance();
            Ok((tok.text, self.pos_of(&tok)))
        } else {
            Err(self.error(format!("expected identifier, found {:?}", self.peek().kind)))
        }
    }

    // -- statements --------------------------------------------------------

    fn parse_statement(&mut self) -> PResult<Statement> {
        if self.check_kw(Keyword::Export) && self.peek_at(1).kind == TokenKind::Keyword(Keyword::Let) {
            self.advance();
            return self.parse_let(true);
        }
        if self.check_kw(Keyword::Let) {
            return self.parse_let(false);
        }
        if self.check_kw(Keyword::Export) && self.peek_at(1).kind == TokenKind::Keyword(Keyword::Fn) {
            self.advance();
            return self.parse_fn_def(true);
        }
        if self.check_kw(Keyword::Fn) {
            return self.parse_fn_def(false);
        }
        if self.check_kw(Keyword::If) {
            return Ok(Statement::If(self.parse_if()?));
        }
        if self.check_kw(Keyword::For) {
            return self.parse_for();
        }
        if self.check_kw(Keyword::Return) {
            return self.parse_return();
        }
        if self.check_kw(Keyword::Import) {
            return self.parse_import();
        }
        let expr = self.parse_expression(0)?;
        if self.check_punct(Punct::Semicolon) {
            self.advance();
        }
        Ok(Statement::Expression(expr))
    }

    fn parse_let(&mut self, exported: bool) -> PResult<Statement> {
        let start = self.pos_of(self.peek());
        self.advance(); // let
        let pattern = self.parse_pattern()?;
        self.expect_op(Operator::Assign)?;
        let value = self.parse_expression(0)?;
        if self.check_punct(Punct::Semicolon) {
            self.advance();
        }
        Ok(Statement::Let(Let {
            pattern,
            value,
            exported,
            position: start,
        }))
    }

    fn expect_op(&mut self, op: Operator) -> PResult<Token> {
        if self.check_op(op) {
            Ok(self.advance())
        } else {
            Err(self.error(format!("expected operator {op:?}, found {:?}", self.peek().kind)))
        }
    }

    fn parse_pattern(&mut self) -> PResult<Pattern> {
        if self.check_punct(Punct::LBracket) {
            let start = self.pos_of(self.peek());
            self.advance();
            let mut elements = Vec::new();
            let mut rest = None;
            while !self.check_punct(Punct::RBracket) {
                if self.check_punct(Punct::Ellipsis) {
                    self.advance();
                    let (name, pos) = self.expect_identifier()?;
                    rest = Some(Box::new(Pattern::Ident(name, pos)));
                    break;
                }
                elements.push(self.parse_pattern()?);
                if self.check_punct(Punct::Comma) {
                    self.advance();
                }
            }
            self.expect_punct(Punct::RBracket)?;
            return Ok(Pattern::Array { elements, rest, position: start });
        }
        if self.check_punct(Punct::LBrace) {
            let start = self.pos_of(self.peek());
            self.advance();
            let mut fields = Vec::new();
            let mut rest = None;
            while !self.check_punct(Punct::RBrace) {
                if self.check_punct(Punct::Ellipsis) {
                    self.advance();
                    let (name, pos) = self.expect_identifier()?;
                    rest = Some(Box::new(Pattern::Ident(name, pos)));
                    break;
                }
                let (name, pos) = self.expect_identifier()?;
                let binding = if self.check_punct(Punct::Colon) {
                    self.advance();
                    self.parse_pattern()?
                } else {
                    Pattern::Ident(name.clone(), pos)
                };
                fields.push((name, binding));
                if self.check_punct(Punct::Comma) {
                    self.advance();
                }
            }
            self.expect_punct(Punct::RBrace)?;
            return Ok(Pattern::Dict { fields, rest, position: start });
        }
        let (name, pos) = self.expect_identifier()?;
        if name == "_" {
            return Ok(Pattern::Wildcard(pos));
        }
        Ok(Pattern::Ident(name, pos))
    }

    fn parse_params(&mut self) -> PResult<Vec<Param>> {
        self.expect_punct(Punct::LParen)?;
        let mut params = Vec::new();
        while !self.check_punct(Punct::RParen) {
            let position = self.pos_of(self.peek());
            let pattern = self.parse_pattern()?;
            let default = if self.check_op(Operator::Assign) {
                self.advance();
                Some(self.parse_expression(0)?)
            } else {
                None
            };
            params.push(Param { pattern, default, position });
            if self.check_punct(Punct::Comma) {
                self.advance();
            }
        }
        self.expect_punct(Punct::RParen)?;
        Ok(params)
    }

    fn parse_fn_def(&mut self, exported: bool) -> PResult<Statement> {
        let start = self.pos_of(self.peek());
        self.advance(); // fn
        let (name, _) = self.expect_identifier()?;
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        Ok(Statement::FnDef(FnDef { name, params, body, exported, position: start }))
    }

    fn parse_block(&mut self) -> PResult<Block> {
        let start = self.pos_of(self.peek());
        self.expect_punct(Punct::LBrace)?;
        let mut statements = Vec::new();
        while !self.check_punct(Punct::RBrace) {
            if self.at_eof() {
                return Err(self.error("unterminated block, expected '}'"));
            }
            statements.push(self.parse_statement()?);
        }
        self.expect_punct(Punct::RBrace)?;
        Ok(Block { statements, position: start })
    }

    fn parse_if(&mut self) -> PResult<If> {
        let start = self.pos_of(self.peek());
        self.advance(); // if
        let cond = self.parse_expression(0)?;
        let then_branch = self.parse_block()?;
        let else_branch = if self.check_kw(Keyword::Else) {
            self.advance();
            if self.check_kw(Keyword::If) {
                Some(Box::new(ElseBranch::If(self.parse_if()?)))
            } else {
                Some(Box::new(ElseBranch::Block(self.parse_block()?)))
            }
        } else {
            None
        };
        Ok(If { cond, then_branch, else_branch, position: start })
    }

    fn parse_for(&mut self) -> PResult<Statement> {
        let start = self.pos_of(self.peek());
        self.advance(); // for
        let pattern = self.parse_pattern()?;
        if self.check_kw(Keyword::In) {
            self.advance();
        } else {
            return Err(self.error("expected 'in' in for loop"));
        }
        let iterable = self.parse_expression(0)?;
        let body = self.parse_block()?;
        Ok(Statement::For(For { pattern, iterable, body, position: start }))
    }

    fn parse_return(&mut self) -> PResult<Statement> {
        let start = self.pos_of(self.peek());
        self.advance(); // return
        let value = if self.check_punct(Punct::Semicolon) || self.check_punct(Punct::RBrace) {
            None
        } else {
            Some(self.parse_expression(0)?)
        };
        if self.check_punct(Punct::Semicolon) {
            self.advance();
        }
        Ok(Statement::Return(Return { value, position: start }))
    }

    fn parse_import(&mut self) -> PResult<Statement> {
        let start = self.pos_of(self.peek());
        self.advance(); // import
        let binding = if self.check_punct(Punct::LBrace) {
            self.advance();
            let mut names = Vec::new();
            while !self.check_punct(Punct::RBrace) {
                let (name, _) = self.expect_identifier()?;
                let alias = if self.check_kw(Keyword::As) {
                    self.advance();
                    Some(self.expect_identifier()?.0)
                } else {
                    None
                };
                names.push((name, alias));
                if self.check_punct(Punct::Comma) {
                    self.advance();
                }
            }
            self.expect_punct(Punct::RBrace)?;
            ImportBinding::Names(names)
        } else {
            let (name, _) = self.expect_identifier()?;
            ImportBinding::Module(name)
        };
        let path = match &binding {
            ImportBinding::Module(_) => {
                if self.check_kw(Keyword::As) {
                    self.advance();
                }
                self.expect_string_literal()?
            }
            ImportBinding::Names(_) => {
                self.expect_from()?;
                self.expect_string_literal()?
            }
        };
        if self.check_punct(Punct::Semicolon) {
            self.advance();
        }
        Ok(Statement::Import(Import { path, binding, position: start }))
    }

    fn expect_from(&mut self) -> PResult<()> {
        if matches!(self.peek().kind, TokenKind::Identifier) && self.peek().text == "from" {
            self.advance();
            Ok(())
        } else {
            Err(self.error("expected 'from'"))
        }
    }

    fn expect_string_literal(&mut self) -> PResult<String> {
        if matches!(self.peek().kind, TokenKind::String) {
            Ok(self.advance().text)
        } else {
            Err(self.error("expected a string literal"))
        }
    }

    // -- Pratt expression parser -------------------------------------------
    //
    // Precedence table (spec §4.2), low to high:
    //  0  assignment / compound-assignment / pipeline operators (right-assoc)
    //  1  ??
    //  2  ?:  (ternary)
    //  3  ||
    //  4  &&
    //  5  == != ~ !~
    //  6  < <= > >=
    //  7  ..
    //  8  + -
    //  9  * / %
    //  10 unary ! -
    //  11 call / index / member / tag-application

    fn parse_expression(&mut self, min_bp: u8) -> PResult<Expression> {
        let mut left = self.parse_prefix()?;

        loop {
            if min_bp == 0 && self.is_assign_start() {
                left = self.parse_assignment(left)?;
                continue;
            }
            let Some((op, l_bp, r_bp)) = self.peek_infix() else { break };
            if l_bp < min_bp {
                break;
            }
            let position = self.pos_of(self.peek());
            self.advance();
            left = match op {
                InfixOp::NullCoalesce => Expression::NullCoalesce {
                    left: Box::new(left),
                    right: Box::new(self.parse_expression(r_bp)?),
                    position,
                },
                InfixOp::Range => Expression::Range {
                    start: Box::new(left),
                    end: Box::new(self.parse_expression(r_bp)?),
                    position,
                },
                InfixOp::Binary(o) => Expression::Binary {
                    op: o,
                    left: Box::new(left),
                    right: Box::new(self.parse_expression(r_bp)?),
                    position,
                },
            };
        }
        Ok(left)
    }

    fn is_assign_start(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Operator(op) if op.is_assign_like())
    }

    fn parse_assignment(&mut self, target: Expression) -> PResult<Expression> {
        let position = self.pos_of(self.peek());
        let TokenKind::Operator(op) = self.advance().kind else { unreachable!() };
        let value = self.parse_expression(0)?;
        if op == Operator::Assign {
            Ok(Expression::Assign { target: Box::new(target), value: Box::new(value), position })
        } else if matches!(
            op,
            Operator::ReadFile
                | Operator::WriteFile
                | Operator::AppendFile
                | Operator::ReadRemote
                | Operator::WriteRemote
                | Operator::AppendRemote
                | Operator::ExecCommand
                | Operator::DbOne
                | Operator::DbAll
                | Operator::DbExec
        ) {
            Ok(Expression::Pipeline { op, target: Box::new(target), source: Box::new(value), position })
        } else {
            Ok(Expression::CompoundAssign { op, target: Box::new(target), value: Box::new(value), position })
        }
    }

    fn peek_infix(&self) -> Option<(InfixOp, u8, u8)> {
        let TokenKind::Operator(op) = self.peek().kind else {
            if self.check_punct(Punct::Colon) {
                return None;
            }
            return None;
        };
        Some(match op {
            Operator::QuestionQuestion => (InfixOp::NullCoalesce, 1, 2),
            Operator::OrOr => (InfixOp::Binary(op), 3, 4),
            Operator::AndAnd => (InfixOp::Binary(op), 4, 5),
            Operator::EqEq | Operator::NotEq | Operator::Tilde | Operator::NotTilde => {
                (InfixOp::Binary(op), 5, 6)
            }
            Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => (InfixOp::Binary(op), 6, 7),
            Operator::DotDot => (InfixOp::Range, 7, 8),
            Operator::Plus | Operator::Minus => (InfixOp::Binary(op), 8, 9),
            Operator::Star | Operator::Slash | Operator::Percent => (InfixOp::Binary(op), 9, 10),
            _ => return None,
        })
    }

    fn parse_prefix(&mut self) -> PResult<Expression> {
        let position = self.pos_of(self.peek());
        match self.peek().kind {
            TokenKind::Operator(Operator::Bang) => {
                self.advance();
                let operand = self.parse_expression(10)?;
                Ok(Expression::Unary { op: UnaryOp::Not, operand: Box::new(operand), position })
            }
            TokenKind::Operator(Operator::Minus) => {
                self.advance();
                let operand = self.parse_expression(10)?;
                Ok(Expression::Unary { op: UnaryOp::Neg, operand: Box::new(operand), position })
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> PResult<Expression> {
        let mut expr = self.parse_primary()?;
        loop {
            let position = self.pos_of(self.peek());
            if self.check_punct(Punct::LParen) {
                let args = self.parse_args()?;
                expr = Expression::Call { callee: Box::new(expr), args, position };
            } else if self.check_punct(Punct::LBracket) {
                self.advance();
                if self.check_punct(Punct::Colon) {
                    self.advance();
                    let end = if self.check_punct(Punct::RBracket) {
                        None
                    } else {
                        Some(Box::new(self.parse_expression(0)?))
                    };
                    self.expect_punct(Punct::RBracket)?;
                    expr = Expression::Slice { target: Box::new(expr), start: None, end, position };
                } else {
                    let index = self.parse_expression(0)?;
                    if self.check_punct(Punct::Colon) {
                        self.advance();
                        let end = if self.check_punct(Punct::RBracket) {
                            None
                        } else {
                            Some(Box::new(self.parse_expression(0)?))
                        };
                        self.expect_punct(Punct::RBracket)?;
                        expr = Expression::Slice { target: Box::new(expr), start: Some(Box::new(index)), end, position };
                    } else {
                        self.expect_punct(Punct::RBracket)?;
                        expr = Expression::Index { target: Box::new(expr), index: Box::new(index), position };
                    }
                }
            } else if self.check_punct(Punct::Dot) {
                self.advance();
                let (name, _) = self.expect_identifier()?;
                if self.check_punct(Punct::LParen) {
                    let args = self.parse_args()?;
                    expr = Expression::MethodCall { receiver: Box::new(expr), method: name, args, position };
                } else {
                    expr = Expression::Member { target: Box::new(expr), field: name, position };
                }
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_args(&mut self) -> PResult<Vec<Expression>> {
        self.expect_punct(Punct::LParen)?;
        let mut args = Vec::new();
        while !self.check_punct(Punct::RParen) {
            args.push(self.parse_expression(0)?);
            if self.check_punct(Punct::Comma) {
                self.advance();
            }
        }
        self.expect_punct(Punct::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> PResult<Expression> {
        let tok = self.peek().clone();
        let position = self.pos_of(&tok);
        match tok.kind {
            TokenKind::Integer => {
                self.advance();
                let n = tok.text.parse::<i64>().map_err(|_| self.error("invalid integer literal"))?;
                Ok(Expression::Literal(Literal::Integer(n), position))
            }
            TokenKind::Float => {
                self.advance();
                let n = tok.text.parse::<f64>().map_err(|_| self.error("invalid float literal"))?;
                Ok(Expression::Literal(Literal::Float(n), position))
            }
            TokenKind::Boolean => {
                self.advance();
                Ok(Expression::Literal(Literal::Boolean(tok.text == "true"), position))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Expression::Literal(Literal::Null, position))
            }
            TokenKind::String => {
                self.advance();
                Ok(Expression::Literal(Literal::Str(self.split_interpolation(&tok.text, &position)?), position))
            }
            TokenKind::Regex => {
                self.advance();
                let (pattern, flags) = split_regex_literal(&tok.text);
                Ok(Expression::Literal(Literal::Regex { pattern, flags }, position))
            }
            TokenKind::PathLiteral => {
                self.advance();
                Ok(Expression::Literal(Literal::Path(vec![StringPart::Text(tok.text)]), position))
            }
            TokenKind::UrlLiteral => {
                self.advance();
                Ok(Expression::Literal(Literal::Url(vec![StringPart::Text(tok.text)]), position))
            }
            TokenKind::DatetimeLiteral => {
                self.advance();
                Ok(Expression::Literal(Literal::Datetime(vec![StringPart::Text(tok.text)]), position))
            }
            TokenKind::DurationLiteral => {
                self.advance();
                Ok(Expression::Literal(Literal::Duration(tok.text), position))
            }
            TokenKind::PathTemplate => {
                self.advance();
                Ok(Expression::Literal(Literal::Path(self.split_interpolation(&tok.text, &position)?), position))
            }
            TokenKind::UrlTemplate => {
                self.advance();
                Ok(Expression::Literal(Literal::Url(self.split_interpolation(&tok.text, &position)?), position))
            }
            TokenKind::DatetimeTemplate => {
                self.advance();
                Ok(Expression::Literal(Literal::Datetime(self.split_interpolation(&tok.text, &position)?), position))
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(Expression::Ident(tok.text, position))
            }
            TokenKind::Keyword(Keyword::This) => {
                self.advance();
                Ok(Expression::This(position))
            }
            TokenKind::Keyword(Keyword::Fn) => self.parse_fn_expr(),
            TokenKind::Punct(Punct::LParen) => {
                self.advance();
                let inner = self.parse_expression(0)?;
                self.expect_punct(Punct::RParen)?;
                Ok(Expression::Grouping(Box::new(inner), position))
            }
            TokenKind::Punct(Punct::LBracket) => self.parse_array_literal(),
            TokenKind::Punct(Punct::LBrace) => self.parse_dict_literal(),
            TokenKind::TagOpen | TokenKind::FragmentOpen => {
                let tag = self.parse_tag()?;
                Ok(Expression::Tag(Box::new(tag), position))
            }
            _ => Err(self.error(format!("unexpected token {:?} in expression", tok.kind))),
        }
    }

    fn parse_fn_expr(&mut self) -> PResult<Expression> {
        let position = self.pos_of(self.peek());
        self.advance(); // fn
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        Ok(Expression::FnExpr { params, body: Box::new(body), position })
    }

    fn parse_array_literal(&mut self) -> PResult<Expression> {
        let position = self.pos_of(self.peek());
        self.advance(); // [
        let mut elements = Vec::new();
        while !self.check_punct(Punct::RBracket) {
            elements.push(self.parse_expression(0)?);
            if self.check_punct(Punct::Comma) {
                self.advance();
            }
        }
        self.expect_punct(Punct::RBracket)?;
        Ok(Expression::Array(elements, position))
    }

    fn parse_dict_literal(&mut self) -> PResult<Expression> {
        let position = self.pos_of(self.peek());
        self.advance(); // {
        let mut entries = Vec::new();
        while !self.check_punct(Punct::RBrace) {
            let key = if self.check_punct(Punct::LBracket) {
                self.advance();
                let e = self.parse_expression(0)?;
                self.expect_punct(Punct::RBracket)?;
                DictKey::Computed(Box::new(e))
            } else if matches!(self.peek().kind, TokenKind::String) {
                let tok = self.advance();
                DictKey::Str(self.split_interpolation(&tok.text, &position)?)
            } else {
                let (name, _) = self.expect_identifier()?;
                DictKey::Ident(name)
            };
            // `{data, error}` shorthand: a bare identifier key with no
            // `: value` stands for `key: key` (used by the pipeline
            // operators' `{data, error}` capture idiom, spec §6.3).
            let value = if self.check_punct(Punct::Colon) {
                self.advance();
                self.parse_expression(0)?
            } else if let DictKey::Ident(name) = &key {
                Expression::Ident(name.clone(), position.clone())
            } else {
                return Err(self.error("expected ':' after dict key"));
            };
            entries.push((key, value));
            if self.check_punct(Punct::Comma) {
                self.advance();
            }
        }
        self.expect_punct(Punct::RBrace)?;
        Ok(Expression::Dict(entries, position))
    }

    /// Splits a raw string's source text around `{expr}` segments, reparsing
    /// each interpolated expression through a fresh lexer+parser pass
    /// (spec §4.1). Parse errors from nested expressions are folded into the
    /// position of the enclosing literal.
    fn split_interpolation(&mut self, raw: &str, position: &Position) -> PResult<Vec<StringPart>> {
        let mut parts = Vec::new();
        let mut text = String::new();
        let chars: Vec<char> = raw.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            if chars[i] == '\\' && i + 1 < chars.len() {
                text.push(chars[i]);
                text.push(chars[i + 1]);
                i += 2;
                continue;
            }
            if chars[i] == '{' {
                if !text.is_empty() {
                    parts.push(StringPart::Text(std::mem::take(&mut text)));
                }
                let mut depth = 1usize;
                let mut inner = String::new();
                i += 1;
                while i < chars.len() && depth > 0 {
                    match chars[i] {
                        '{' => {
                            depth += 1;
                            inner.push('{');
                        }
                        '}' => {
                            depth -= 1;
                            if depth > 0 {
                                inner.push('}');
                            }
                        }
                        c => inner.push(c),
                    }
                    i += 1;
                }
                let sub_tokens = crate::lexer::Lexer::new(&inner, self.file.clone()).lex()?;
                let expr = Parser::new(sub_tokens, self.file.clone())
                    .parse_expression_standalone()
                    .map_err(|mut e| {
                        if e.position.is_none() {
                            e.position = Some(position.clone());
                        }
                        e
                    })?;
                parts.push(StringPart::Expr(expr));
                continue;
            }
            text.push(chars[i]);
            i += 1;
        }
        if !text.is_empty() || parts.is_empty() {
            parts.push(StringPart::Text(text));
        }
        Ok(parts)
    }

    fn parse_expression_standalone(mut self) -> PResult<Expression> {
        self.parse_expression(0)
    }
}

enum InfixOp {
    NullCoalesce,
    Range,
    Binary(Operator),
}

fn split_regex_literal(text: &str) -> (String, String) {
    // text is of the form "/pattern/flags"
    if let Some(rest) = text.strip_prefix('/') {
        if let Some(idx) = rest.rfind('/') {
            return (rest[..idx].to_string(), rest[idx + 1..].to_string());
        }
    }
    (text.to_string(), String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(src: &str) -> Program {
        let tokens = Lexer::new(src, "test.pars").lex().unwrap();
        Parser::new(tokens, "test.pars").parse_program().unwrap()
    }

    fn parse_err(src: &str) -> Vec<ParsleyError> {
        let tokens = Lexer::new(src, "test.pars").lex().unwrap();
        Parser::new(tokens, "test.pars").parse_program().unwrap_err()
    }

    #[test]
    fn parses_let_binding() {
        let program = parse("let x = 1;");
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(&program.statements[0], Statement::Let(l) if matches!(l.pattern, Pattern::Ident(ref n, _) if n == "x")));
    }

    #[test]
    fn parses_array_destructuring_pattern() {
        let program = parse("let [a, b, ...rest] = [1,2,3,4];");
        let Statement::Let(l) = &program.statements[0] else { panic!("expected let") };
        match &l.pattern {
            Pattern::Array { elements, rest, .. } => {
                assert_eq!(elements.len(), 2);
                assert!(rest.is_some());
            }
            other => panic!("expected array pattern, got {other:?}"),
        }
    }

    #[test]
    fn parses_dict_destructuring_pattern_for_pipeline_capture() {
        let program = parse("let {data, error} = x;");
        let Statement::Let(l) = &program.statements[0] else { panic!("expected let") };
        match &l.pattern {
            Pattern::Dict { fields, .. } => {
                assert_eq!(fields.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(), vec!["data", "error"]);
            }
            other => panic!("expected dict pattern, got {other:?}"),
        }
    }

    #[test]
    fn binary_precedence_multiplies_before_adding() {
        let program = parse("1 + 2 * 3;");
        let Statement::Expression(Expression::Binary { op, left, right, .. }) = &program.statements[0] else {
            panic!("expected binary expression")
        };
        assert_eq!(*op, Operator::Plus);
        assert!(matches!(**left, Expression::Literal(Literal::Integer(1), _)));
        assert!(matches!(**right, Expression::Binary { op: Operator::Star, .. }));
    }

    #[test]
    fn parses_method_call_chain() {
        let program = parse(r#""a,b".split(",").reverse();"#);
        assert!(matches!(&program.statements[0], Statement::Expression(Expression::MethodCall { method, .. }) if method == "reverse"));
    }

    #[test]
    fn parses_null_coalesce_as_right_associated() {
        let program = parse("a ?? b ?? c;");
        let Statement::Expression(Expression::NullCoalesce { left, .. }) = &program.statements[0] else {
            panic!("expected null-coalesce expression")
        };
        assert!(matches!(**left, Expression::Ident(ref n, _) if n == "a"));
    }

    #[test]
    fn parses_fn_expression() {
        let program = parse("let add = fn(a, b) { return a + b; };");
        let Statement::Let(l) = &program.statements[0] else { panic!("expected let") };
        assert!(matches!(l.value, Expression::FnExpr { .. }));
    }

    #[test]
    fn parses_import_statement_with_named_bindings() {
        let program = parse(r#"import {add, secret} from "m.pars";"#);
        let Statement::Import(import) = &program.statements[0] else { panic!("expected import") };
        assert_eq!(import.path, "m.pars");
        assert!(matches!(&import.binding, ImportBinding::Names(names) if names.len() == 2));
    }

    #[test]
    fn parses_full_slice_with_both_bounds_omitted() {
        let program = parse("a[:];");
        let Statement::Expression(Expression::Slice { start, end, .. }) = &program.statements[0] else {
            panic!("expected slice expression")
        };
        assert!(start.is_none());
        assert!(end.is_none());
    }

    #[test]
    fn parses_slice_with_start_only() {
        let program = parse("a[1:];");
        let Statement::Expression(Expression::Slice { start, end, .. }) = &program.statements[0] else {
            panic!("expected slice expression")
        };
        assert!(matches!(start.as_deref(), Some(Expression::Literal(Literal::Integer(1), _))));
        assert!(end.is_none());
    }

    #[test]
    fn parses_slice_with_end_only() {
        let program = parse("a[:2];");
        let Statement::Expression(Expression::Slice { start, end, .. }) = &program.statements[0] else {
            panic!("expected slice expression")
        };
        assert!(start.is_none());
        assert!(matches!(end.as_deref(), Some(Expression::Literal(Literal::Integer(2), _))));
    }

    #[test]
    fn plain_index_without_colon_is_still_an_index_expression() {
        let program = parse("a[0];");
        assert!(matches!(&program.statements[0], Statement::Expression(Expression::Index { .. })));
    }

    #[test]
    fn unterminated_block_is_a_parse_error() {
        let errors = parse_err("fn broken() { let x = 1;");
        assert!(!errors.is_empty());
    }

    #[test]
    fn synchronize_recovers_after_an_error_to_report_more_than_one() {
        let errors = parse_err("let = ; let y = 1;");
        // the bogus `let =` shouldn't swallow the otherwise-valid second statement
        assert!(!errors.is_empty());
    }
}
