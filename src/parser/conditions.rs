//! Condition parsing
//!
//! A condition is either a single comparison (`A + 1 >= B`) or comparisons
//! joined by logical connectives. One connective is allowed per group, so
//! longer chains are spelled with parentheses:
//!
//! ```text
//! (A == 1 AND B == 2) OR NOT C < 0
//! ```

use crate::parser::ast::Node;
use crate::parser::expressions::{split_groups, Segment};
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{ParseError, Parser};

/// Peel parentheses that enclose the whole span: `((A == 1))` -> `A == 1`.
fn strip_wrapping_parens(mut span: &[Token]) -> &[Token] {
    while span.len() >= 2
        && span[0].kind() == TokenKind::LParen
        && span[span.len() - 1].kind() == TokenKind::RParen
    {
        let mut depth = 0usize;
        let mut close = None;
        for (i, token) in span.iter().enumerate() {
            match token.kind() {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        close = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }
        if close != Some(span.len() - 1) {
            break;
        }
        span = &span[1..span.len() - 1];
    }
    span
}

fn no_condition() -> ParseError {
    ParseError::Syntax {
        message: "expected a condition".to_string(),
        token: None,
        line: None,
    }
}

impl Parser {
    /// Parse a single comparison into `BOOL_EXPR[CMP[lhs, rhs]]`.
    pub fn parse_boolean(&self, span: &[Token]) -> Result<Node, ParseError> {
        let span = strip_wrapping_parens(span);
        let first = span.first().ok_or_else(no_condition)?;

        let comparisons: Vec<usize> = span
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind().is_comparison())
            .map(|(i, _)| i)
            .collect();
        let at = match comparisons.as_slice() {
            [] => return Err(ParseError::at(first, "expected a boolean operator")),
            [at] => *at,
            [_, second, ..] => {
                return Err(ParseError::at(
                    &span[*second],
                    "at most one boolean operator is allowed",
                ))
            }
        };

        let top_level = split_groups(span)?.contains(&Segment::Token(at));
        let op = &span[at];
        if !top_level {
            return Err(ParseError::at(
                op,
                "boolean operator cannot appear inside arithmetic parentheses",
            ));
        }

        let (lhs, rhs) = (&span[..at], &span[at + 1..]);
        if lhs.is_empty() || rhs.is_empty() {
            return Err(ParseError::at(op, format!("missing operand for {}", op.kind())));
        }
        self.trace(format_args!("comparison {} on line {}", op.kind(), op.line()));
        let operands = vec![self.parse_expression(lhs)?, self.parse_expression(rhs)?];
        let comparison = Node::with_children(op.clone(), operands);
        Ok(Node::synthetic(TokenKind::BoolExpr, op.line(), vec![comparison]))
    }

    /// Parse a condition that may use `AND`, `OR`, `NOT`, `NAND`, `XOR` or `NOR`.
    ///
    /// Spans without a connective are plain comparisons and yield a
    /// `BOOL_EXPR`; otherwise the result is `LOGIC_EXPR[CONN[operands...]]`.
    pub fn parse_logical(&self, span: &[Token]) -> Result<Node, ParseError> {
        self.logical_at(span, 0)
    }

    /// `depth` counts the connectives and groups enclosing `span`.
    fn logical_at(&self, span: &[Token], depth: usize) -> Result<Node, ParseError> {
        let first = span.first().ok_or_else(no_condition)?;
        self.check_nesting(depth, first)?;
        if !span.iter().any(|t| t.kind().is_logical()) {
            return self.parse_boolean(span);
        }

        let segments = split_groups(span)?;
        let connectives: Vec<usize> = segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Token(i) if span[*i].kind().is_logical() => Some(*i),
                _ => None,
            })
            .collect();

        let at = match connectives.as_slice() {
            [] => {
                if let [Segment::Group(inner)] = segments.as_slice() {
                    return self.logical_at(&span[inner.clone()], depth + 1);
                }
                let nested = span.iter().find(|t| t.kind().is_logical()).unwrap_or(first);
                return Err(ParseError::at(
                    nested,
                    "logical operator inside parentheses must form its own condition",
                ));
            }
            [at] => *at,
            [_, second, ..] => {
                return Err(ParseError::at(
                    &span[*second],
                    "only one logical operator is allowed per group, use parentheses",
                ))
            }
        };

        let op = &span[at];
        let (left, right) = (&span[..at], &span[at + 1..]);
        let mut operands = Vec::with_capacity(2);
        if op.kind() == TokenKind::Not {
            if !left.is_empty() {
                return Err(ParseError::at(op, "NOT takes a single operand on its right"));
            }
        } else {
            if left.is_empty() {
                let message = format!("missing left operand for {}", op.kind());
                return Err(ParseError::at(op, message));
            }
            operands.push(self.logical_at(left, depth + 1)?);
        }
        if right.is_empty() {
            let message = format!("missing right operand for {}", op.kind());
            return Err(ParseError::at(op, message));
        }
        operands.push(self.logical_at(right, depth + 1)?);

        self.trace(format_args!("connective {} on line {}", op.kind(), op.line()));
        let connective = Node::with_children(op.clone(), operands);
        Ok(Node::synthetic(TokenKind::LogicExpr, op.line(), vec![connective]))
    }
}
