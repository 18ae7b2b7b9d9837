//! Tag/fragment parsing (spec §4.7, §4.8), feeding off the lexer's
//! `TagOpen`/`TagClose`/`TagSelfClose`/`FragmentOpen`/`FragmentClose`/
//! `RawText` token kinds.

use super::Parser;
use crate::ast::{Tag, TagAttr, TagChild};
use crate::error::ParsleyError;
use crate::token::{Punct, TokenKind};

type PResult<T> = Result<T, ParsleyError>;

impl Parser {
    pub(super) fn parse_tag(&mut self) -> PResult<Tag> {
        let start_tok = self.peek().clone();
        let position = self.pos_of(&start_tok);
        let is_fragment = matches!(start_tok.kind, TokenKind::FragmentOpen);
        self.advance(); // TagOpen or FragmentOpen

        let name = if is_fragment { None } else { Some(start_tok.text.clone()) };
        let mut attrs = Vec::new();
        loop {
            match &self.peek().kind {
                TokenKind::TagSelfClose => {
                    self.advance();
                    return Ok(Tag { name, attrs, children: Vec::new(), self_closing: true, position });
                }
                TokenKind::FragmentOpen | TokenKind::TagOpen if is_fragment => {
                    // fragment has no attributes; its '>' was already folded
                    // into the lexer's FragmentOpen/TagClose handling
                    break;
                }
                TokenKind::Identifier => {
                    let attr_pos = self.pos_of(self.peek());
                    let attr_name = self.advance().text;
                    let value = if self.check_op_eq() {
                        self.advance();
                        Some(self.parse_attr_value()?)
                    } else {
                        None
                    };
                    attrs.push(TagAttr { name: attr_name, value, position: attr_pos });
                }
                _ => break,
            }
        }

        let children = self.parse_tag_children(name.as_deref())?;
        Ok(Tag { name, attrs, children, self_closing: false, position })
    }

    fn check_op_eq(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Operator(crate::token::Operator::Assign))
    }

    fn parse_attr_value(&mut self) -> PResult<crate::ast::Expression> {
        match self.peek().kind {
            TokenKind::String => {
                let tok = self.advance();
                let position = self.pos_of(&tok);
                let parts = self.split_interpolation(&tok.text, &position)?;
                Ok(crate::ast::Expression::Literal(crate::ast::Literal::Str(parts), position))
            }
            TokenKind::Punct(Punct::LBrace) => {
                self.advance();
                let expr = self.parse_expression(0)?;
                self.expect_punct(Punct::RBrace)?;
                Ok(expr)
            }
            _ => Err(self.error("expected a string or '{expr}' attribute value")),
        }
    }

    fn parse_tag_children(&mut self, tag_name: Option<&str>) -> PResult<Vec<TagChild>> {
        let mut children = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::TagClose | TokenKind::FragmentClose => {
                    self.advance();
                    break;
                }
                TokenKind::TagOpen | TokenKind::FragmentOpen => {
                    children.push(TagChild::Tag(Box::new(self.parse_tag()?)));
                }
                TokenKind::String | TokenKind::RawText => {
                    let text = self.advance().text;
                    children.push(TagChild::Text(text));
                }
                TokenKind::Punct(Punct::LBrace) => {
                    self.advance();
                    let expr = self.parse_expression(0)?;
                    self.expect_punct(Punct::RBrace)?;
                    children.push(TagChild::Expr(expr));
                }
                TokenKind::Eof => {
                    return Err(self.error(format!(
                        "unterminated tag '{}'",
                        tag_name.unwrap_or("<fragment>")
                    )));
                }
                _ => {
                    return Err(self.error(format!("unexpected token {:?} in tag children", self.peek().kind)));
                }
            }
        }
        Ok(children)
    }
}
