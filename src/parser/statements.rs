//! Statement parsing implementation
//!
//! This module handles parsing of all Tython statement types:
//!
//! - Headers: `PROGRAM "name"`, `VERSION 1 0 2`
//! - Declarations: `INT32 A`, `IMPLICIT REAL64 X`
//! - Assignments: `A -> 1 + 2` and the store form `1 + 2 -> A`
//! - Control flow: `IF`/`THEN`/`ELSE`/`END`, `LBL`, `GOTO`
//! - Output: `DISP`, `DISPSTR`
//!
//! # Grammar
//!
//! ```text
//! block     ::= { statement | LINE_BREAK }
//! statement ::= program | version | declaration | implicit | assignment
//!             | if_block | if_line | label | goto | disp | disp_str
//! if_block  ::= IF condition THEN block [ELSE block] END
//! if_line   ::= IF condition LINE_BREAK { LINE_BREAK } statement
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::Node;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::options::UnknownStatementPolicy;
use crate::parser::parse::{BlockEnd, Diagnostic, ParseError, Parser};

impl Parser {
    /// Parse statements into `block` until `end` is reached.
    ///
    /// The terminating token (`END`, `ELSE`, line break or EOF) is left for the caller.
    pub(crate) fn parse_block(
        &mut self,
        block: &mut Node,
        end: BlockEnd,
    ) -> Result<(), ParseError> {
        loop {
            match self.peek_kind() {
                TokenKind::Eof => {
                    if self.position + 1 != self.tokens.len() {
                        return Err(ParseError::at(self.peek(), "EOF must be the final token"));
                    }
                    return Ok(());
                }
                TokenKind::LineBreak if end == BlockEnd::Line => return Ok(()),
                TokenKind::LineBreak => {
                    self.advance();
                }
                TokenKind::End | TokenKind::Else if end != BlockEnd::Eof => return Ok(()),
                _ => {
                    if let Some(statement) = self.parse_statement()? {
                        block.push(statement);
                    }
                }
            }
        }
    }

    /// Parse one statement starting at the cursor.
    ///
    /// Returns `None` when the leading token was skipped.
    pub(crate) fn parse_statement(&mut self) -> Result<Option<Node>, ParseError> {
        let token = self.peek().clone();
        self.trace(format_args!("statement {} on line {}", token, token.line()));

        let statement = match token.kind() {
            TokenKind::Program => self.parse_program_header()?,
            TokenKind::Version => self.parse_version()?,
            kind if kind.is_data_type() => self.parse_declaration()?,
            TokenKind::Implicit => self.parse_implicit()?,
            kind if kind.is_variable()
                && self.peek_ahead(1).map(Token::kind) == Some(TokenKind::Assign) =>
            {
                self.parse_assignment()?
            }
            TokenKind::If => self.parse_if()?,
            TokenKind::Label | TokenKind::Goto => self.parse_jump()?,
            TokenKind::Disp => self.parse_disp()?,
            TokenKind::DispStr => self.parse_disp_str()?,
            TokenKind::Call => {
                return Err(ParseError::NotImplemented {
                    feature: "CALL",
                    line: token.line(),
                })
            }
            _ if self.is_store_assignment() => self.parse_store_assignment()?,
            _ => return self.skip_unknown(),
        };
        Ok(Some(statement))
    }

    /// `PROGRAM "name"` - only valid as the very first token.
    fn parse_program_header(&mut self) -> Result<Node, ParseError> {
        let keyword = self.advance();
        if self.position != 1 {
            return Err(ParseError::at(&keyword, "PROGRAM must be the first token of the program"));
        }
        let name = self.expect_one_of(
            |k| k == TokenKind::StrLit,
            "Expected program name string after PROGRAM",
        )?;
        Ok(Node::with_children(keyword, vec![Node::leaf(name)]))
    }

    fn parse_version(&mut self) -> Result<Node, ParseError> {
        let keyword = self.advance();
        let mut parts = Vec::with_capacity(3);
        for part in ["major", "minor", "patch"] {
            let message = format!("Expected {} version number after VERSION", part);
            let number = self.expect_one_of(|k| k == TokenKind::IntLit, &message)?;
            parts.push(Node::leaf(number));
        }
        Ok(Node::with_children(keyword, parts))
    }

    /// `<type> <variable>`, with the type first on its line.
    fn parse_declaration(&mut self) -> Result<Node, ParseError> {
        if !self.at_line_start() {
            return Err(ParseError::at(
                self.peek(),
                "data type must be the first token on its line",
            ));
        }
        let data_type = self.advance();
        let message = format!("Expected variable after {}", data_type.kind());
        let variable = self.expect_one_of(TokenKind::is_variable, &message)?;
        Ok(Node::with_children(data_type, vec![Node::leaf(variable)]))
    }

    /// `IMPLICIT <type> <variable>`
    fn parse_implicit(&mut self) -> Result<Node, ParseError> {
        let keyword = self.advance();
        let data_type =
            self.expect_one_of(TokenKind::is_data_type, "Expected data type after IMPLICIT")?;
        let variable =
            self.expect_one_of(TokenKind::is_variable, "Expected variable after data type")?;
        Ok(Node::with_children(
            keyword,
            vec![Node::leaf(data_type), Node::leaf(variable)],
        ))
    }

    /// `<variable> -> <expression to end of line>`
    fn parse_assignment(&mut self) -> Result<Node, ParseError> {
        let variable = self.advance();
        let arrow = self.advance();
        let span = self.rest_of_line().to_vec();
        if span.is_empty() {
            return Err(ParseError::at(&arrow, "Expected expression after ->"));
        }
        let expression = self.parse_expression(&span)?;
        self.position += span.len();
        Ok(Node::with_children(arrow, vec![Node::leaf(variable), expression]))
    }

    /// Line that opens a statement and ends in `-> <variable>`.
    fn is_store_assignment(&self) -> bool {
        if !self.at_line_start() {
            return false;
        }
        let line = self.rest_of_line();
        match line {
            [.., arrow, target] if line.len() >= 3 => {
                arrow.kind() == TokenKind::Assign
                    && target.kind().is_variable()
                    && line.iter().filter(|t| t.kind() == TokenKind::Assign).count() == 1
            }
            _ => false,
        }
    }

    /// `<expression> -> <variable>`
    fn parse_store_assignment(&mut self) -> Result<Node, ParseError> {
        let line = self.rest_of_line().to_vec();
        let (span, tail) = line.split_at(line.len() - 2);
        let expression = self.parse_expression(span)?;
        self.position += line.len();
        let (arrow, variable) = (tail[0].clone(), tail[1].clone());
        Ok(Node::with_children(arrow, vec![Node::leaf(variable), expression]))
    }

    /// Block form `IF <cond> THEN ... [ELSE ...] END`, or the single-line form
    /// where the body is the statement on the next non-blank line.
    fn parse_if(&mut self) -> Result<Node, ParseError> {
        let keyword = self.advance();
        let line = self.rest_of_line().to_vec();
        let then_at = line.iter().position(|t| t.kind() == TokenKind::Then);
        let condition_span = &line[..then_at.unwrap_or(line.len())];
        if condition_span.is_empty() {
            return Err(ParseError::at(&keyword, "IF statement requires a condition"));
        }
        let condition = self.parse_logical(condition_span)?;

        let mut children = vec![condition];
        match then_at {
            Some(then_at) => {
                self.position += then_at + 1;
                children.push(self.parse_branch(&keyword, BlockEnd::Keyword)?);

                if self.peek_kind() == TokenKind::Else {
                    let else_keyword = self.advance();
                    children.push(self.parse_branch(&else_keyword, BlockEnd::Keyword)?);
                    if self.peek_kind() == TokenKind::Else {
                        let message = "IF statement may only have one ELSE";
                        return Err(ParseError::at(self.peek(), message));
                    }
                }
                if self.peek_kind() != TokenKind::End {
                    return Err(ParseError::at(&keyword, "IF statement is missing END"));
                }
                self.advance();
            }
            None => {
                self.position += line.len();
                // Blank and comment-only lines before the body are skipped
                while self.peek_kind() == TokenKind::LineBreak {
                    self.advance();
                }
                children.push(self.parse_branch(&keyword, BlockEnd::Line)?);
            }
        }
        Ok(Node::with_children(keyword, children))
    }

    /// Parse a conditional body into a `BLOCK` node, rejecting empty bodies.
    fn parse_branch(&mut self, opener: &Token, end: BlockEnd) -> Result<Node, ParseError> {
        let mut body = Node::synthetic(TokenKind::Block, opener.line(), Vec::new());
        self.parse_block(&mut body, end)?;
        if body.is_leaf() {
            return Err(ParseError::at(opener, "IF statement must be followed by code"));
        }
        Ok(body)
    }

    /// `LBL <variable>` / `GOTO <variable>`, first on their line.
    fn parse_jump(&mut self) -> Result<Node, ParseError> {
        if !self.at_line_start() {
            let message = format!("{} must be the first token on its line", self.peek_kind());
            return Err(ParseError::at(self.peek(), message));
        }
        let keyword = self.advance();
        let message = format!("Expected label name after {}", keyword.kind());
        let target = self.expect_one_of(TokenKind::is_variable, &message)?;
        Ok(Node::with_children(keyword, vec![Node::leaf(target)]))
    }

    fn parse_disp(&mut self) -> Result<Node, ParseError> {
        let keyword = self.advance();
        let operand = self.expect_one_of(
            |k| k.is_variable() || k.is_literal(),
            "Expected variable or literal after DISP",
        )?;
        Ok(Node::with_children(keyword, vec![Node::leaf(operand)]))
    }

    fn parse_disp_str(&mut self) -> Result<Node, ParseError> {
        let keyword = self.advance();
        let operand = self.expect_one_of(
            |k| k == TokenKind::StrLit || k.is_variable(),
            "Expected string or variable after DISPSTR",
        )?;
        Ok(Node::with_children(keyword, vec![Node::leaf(operand)]))
    }

    /// Drop a token no statement grammar starts with.
    fn skip_unknown(&mut self) -> Result<Option<Node>, ParseError> {
        let token = self.advance();
        match self.options.unknown_statements {
            UnknownStatementPolicy::Reject => {
                Err(ParseError::at(&token, "unexpected token at start of statement"))
            }
            UnknownStatementPolicy::Skip => {
                log::warn!("line {}: skipping unexpected token {}", token.line(), token);
                self.diagnostics.push(Diagnostic {
                    line: token.line(),
                    message: format!("skipped unexpected token {}", token),
                });
                Ok(None)
            }
        }
    }
}
