//! Expression parsing implementation
//!
//! Arithmetic expressions are parsed from a flat token span rather than from
//! the cursor. The span is first cut into depth-zero pieces by
//! [`split_groups`], every parenthesized run is parsed recursively, and the
//! resulting sibling list is folded tier by tier:
//!
//! ```text
//! tokens:    A  *  ( 1 + 2 )  -  4
//! siblings:  A  *  EXPR        -  4
//! tier * /:  MUL[A, EXPR]      -  4
//! tier + -:  MINUS[MUL[A, EXPR], 4]
//! ```
//!
//! Function names (`SIN`, `ARCTAN`, ...) are applied after all operators have
//! been folded, so a call inside a larger expression needs its own
//! parentheses: `(SIN(X)) * 2`.

use crate::parser::ast::Node;
use crate::parser::lexer::{tokens_to_source, Token, TokenKind};
use crate::parser::parse::{ParseError, Parser};
use std::ops::Range;

/// One depth-zero piece of a token span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// Index of a token outside any parentheses.
    Token(usize),
    /// Indices strictly between a matched pair of outer parentheses.
    Group(Range<usize>),
}

/// Cut `span` at depth zero, checking that parentheses balance.
pub(crate) fn split_groups(span: &[Token]) -> Result<Vec<Segment>, ParseError> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut open = 0usize;

    for (i, token) in span.iter().enumerate() {
        match token.kind() {
            TokenKind::LParen => {
                if depth == 0 {
                    open = i;
                }
                depth += 1;
            }
            TokenKind::RParen => {
                if depth == 0 {
                    return Err(ParseError::at(token, "too many right parentheses"));
                }
                depth -= 1;
                if depth == 0 {
                    if open + 1 == i {
                        return Err(ParseError::at(&span[open], "empty parentheses"));
                    }
                    segments.push(Segment::Group(open + 1..i));
                }
            }
            _ if depth == 0 => segments.push(Segment::Token(i)),
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ParseError::at(&span[open], "not all parentheses closed"));
    }
    Ok(segments)
}

/// Numeral leaves, nested expressions and already folded nodes.
fn is_operand(node: &Node) -> bool {
    !node.is_leaf() || node.kind() == TokenKind::Expr || node.kind().is_numeral()
}

fn describe(span: &[Token]) -> String {
    tokens_to_source(span).replace('\n', " ")
}

impl Parser {
    /// Parse one arithmetic expression span.
    pub fn parse_expression(&self, span: &[Token]) -> Result<Node, ParseError> {
        self.expression_at(span, 0)
    }

    /// `depth` counts the parenthesized groups enclosing `span`.
    fn expression_at(&self, span: &[Token], depth: usize) -> Result<Node, ParseError> {
        let first = match span.first() {
            Some(first) => first,
            None => {
                return Err(ParseError::Syntax {
                    message: "expected expression".to_string(),
                    token: None,
                    line: None,
                })
            }
        };
        self.check_nesting(depth, first)?;
        if span.len() == 1 && first.kind().is_numeral() {
            return Ok(Node::leaf(first.clone()));
        }
        if let Some(t) = span
            .iter()
            .find(|t| matches!(t.kind(), TokenKind::LineBreak | TokenKind::Eof))
        {
            return Err(ParseError::at(t, "expression ends unexpectedly"));
        }

        self.trace(format_args!("expression `{}`", describe(span)));
        let mut siblings = self.resolve_parentheses(span, depth)?;
        for tier in self.options.precedence.tiers() {
            self.fold_tier(&mut siblings, tier)?;
        }
        self.apply_functions(&mut siblings)?;

        if siblings.len() > 1 {
            let stray = siblings[1..]
                .iter()
                .find(|n| n.is_leaf() && n.kind().is_numeral())
                .unwrap_or(&siblings[1]);
            return Err(ParseError::at(
                stray.token(),
                format!("orphaned numeral in expression `{}`", describe(span)),
            ));
        }
        let node = match siblings.pop() {
            Some(node) => node,
            None => return Err(ParseError::at(first, "expected expression")),
        };
        if !is_operand(&node) {
            return Err(ParseError::at(node.token(), "invalid operand in expression"));
        }
        // Redundant outer parentheses
        if node.kind() == TokenKind::Expr {
            return Ok(node);
        }
        Ok(Node::synthetic(TokenKind::Expr, first.line(), vec![node]))
    }

    /// Flatten a span into sibling nodes, parsing each parenthesized run.
    pub(crate) fn resolve_parentheses(
        &self,
        span: &[Token],
        depth: usize,
    ) -> Result<Vec<Node>, ParseError> {
        let segments = split_groups(span)?;
        let mut siblings = Vec::with_capacity(segments.len());
        for segment in segments {
            let node = match segment {
                Segment::Token(i) => Node::leaf(span[i].clone()),
                Segment::Group(inner) => self.expression_at(&span[inner], depth + 1)?,
            };
            siblings.push(node);
        }
        Ok(siblings)
    }

    /// Fold every operator of one precedence tier, left to right.
    fn fold_tier(&self, siblings: &mut Vec<Node>, tier: &[TokenKind]) -> Result<(), ParseError> {
        let mut i = 0;
        while i < siblings.len() {
            let node = &siblings[i];
            if !(node.is_leaf() && tier.contains(&node.kind())) {
                i += 1;
                continue;
            }
            if i == 0 || i + 1 >= siblings.len() {
                return Err(ParseError::at(
                    node.token(),
                    format!("missing operand for {}", node.kind()),
                ));
            }
            for operand in [&siblings[i - 1], &siblings[i + 1]] {
                if !is_operand(operand) {
                    return Err(ParseError::at(
                        operand.token(),
                        format!("invalid operand for {}", node.kind()),
                    ));
                }
            }

            let right = siblings.remove(i + 1);
            let op = siblings.remove(i);
            let left = siblings.remove(i - 1);
            self.trace(format_args!("fold {} on line {}", op.kind(), op.line()));
            let folded = Node::with_children(op.token().clone(), vec![left, right]);
            siblings.insert(i - 1, folded);
            i = i.saturating_sub(3);
        }
        Ok(())
    }

    /// Collapse each function name with the operand to its right.
    fn apply_functions(&self, siblings: &mut Vec<Node>) -> Result<(), ParseError> {
        let mut i = 0;
        while i < siblings.len() {
            let node = &siblings[i];
            if node.is_leaf() && node.kind().is_function() {
                let arg = siblings.get(i + 1).ok_or_else(|| {
                    ParseError::at(node.token(), format!("{} requires an argument", node.kind()))
                })?;
                let valid =
                    arg.kind() == TokenKind::Expr || (arg.is_leaf() && arg.kind().is_numeral());
                if !valid {
                    return Err(ParseError::at(
                        arg.token(),
                        format!(
                            "argument of {} must be a numeral or a parenthesized expression",
                            node.kind()
                        ),
                    ));
                }
                let arg = siblings.remove(i + 1);
                let func = siblings.remove(i);
                self.trace(format_args!("call {} on line {}", func.kind(), func.line()));
                siblings.insert(i, Node::with_children(func.token().clone(), vec![arg]));
            }
            i += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::options::{ParserOptions, Precedence};
    use crate::parser::parse::MAX_NESTING;

    fn span(source: &str) -> Vec<Token> {
        let mut tokens = tokenize(source).unwrap();
        tokens.pop(); // EOF
        tokens
    }

    fn parse_expr(source: &str) -> Result<Node, ParseError> {
        let parser = Parser::from_tokens(Vec::new(), ParserOptions::default());
        parser.parse_expression(&span(source))
    }

    fn parse_legacy(source: &str) -> Node {
        let options = ParserOptions {
            precedence: Precedence::Legacy,
            ..ParserOptions::default()
        };
        let parser = Parser::from_tokens(Vec::new(), options);
        parser.parse_expression(&span(source)).unwrap()
    }

    #[test]
    fn test_single_numeral_is_leaf() {
        for source in ["7", "2.5", "0x1F", "0b11", "A", "@B1"] {
            let node = parse_expr(source).unwrap();
            assert!(node.is_leaf());
            assert_eq!(node.value(), Some(source));
        }
    }

    #[test]
    fn test_simple_addition() {
        let node = parse_expr("1 + 2").unwrap();
        assert_eq!(node.kind(), TokenKind::Expr);
        let plus = node.child(0).unwrap();
        assert_eq!(plus.kind(), TokenKind::Plus);
        assert_eq!(plus.child(0).unwrap().value(), Some("1"));
        assert_eq!(plus.child(1).unwrap().value(), Some("2"));
    }

    #[test]
    fn test_standard_precedence() {
        let node = parse_expr("1 + 2 * 3").unwrap();
        let plus = node.child(0).unwrap();
        assert_eq!(plus.kind(), TokenKind::Plus);
        assert_eq!(plus.child(0).unwrap().value(), Some("1"));
        assert_eq!(plus.child(1).unwrap().kind(), TokenKind::Mul);
    }

    #[test]
    fn test_legacy_precedence() {
        let node = parse_legacy("1 + 2 * 3");
        let mul = node.child(0).unwrap();
        assert_eq!(mul.kind(), TokenKind::Mul);
        assert_eq!(mul.child(0).unwrap().kind(), TokenKind::Plus);
        assert_eq!(mul.child(1).unwrap().value(), Some("3"));
    }

    #[test]
    fn test_left_associative_chain() {
        let node = parse_expr("8 - 2 + 1").unwrap();
        let plus = node.child(0).unwrap();
        assert_eq!(plus.kind(), TokenKind::Plus);
        let minus = plus.child(0).unwrap();
        assert_eq!(minus.kind(), TokenKind::Minus);
        assert_eq!(minus.child(0).unwrap().value(), Some("8"));
        assert_eq!(plus.child(1).unwrap().value(), Some("1"));
    }

    #[test]
    fn test_parentheses_nest() {
        let node = parse_expr("(1 + 2) * 3").unwrap();
        let mul = node.child(0).unwrap();
        assert_eq!(mul.kind(), TokenKind::Mul);
        let group = mul.child(0).unwrap();
        assert_eq!(group.kind(), TokenKind::Expr);
        assert_eq!(group.child(0).unwrap().kind(), TokenKind::Plus);
    }

    #[test]
    fn test_parenthesized_numeral_collapses() {
        let node = parse_expr("(((4)))").unwrap();
        assert_eq!(node.kind(), TokenKind::Expr);
        assert_eq!(node.child(0).unwrap().value(), Some("4"));
    }

    #[test]
    fn test_function_call() {
        let node = parse_expr("SIN(1)").unwrap();
        let sin = node.child(0).unwrap();
        assert_eq!(sin.kind(), TokenKind::Sin);
        assert_eq!(sin.children().len(), 1);
        assert_eq!(sin.child(0).unwrap().value(), Some("1"));
    }

    #[test]
    fn test_function_of_expression() {
        let node = parse_expr("ARCTAN(A / 2)").unwrap();
        let call = node.child(0).unwrap();
        assert_eq!(call.kind(), TokenKind::ArcTan);
        assert_eq!(call.child(0).unwrap().kind(), TokenKind::Expr);
    }

    #[test]
    fn test_function_inside_sum_needs_parentheses() {
        assert!(parse_expr("SIN(1) + 2").is_err());
        let node = parse_expr("(SIN(1)) + 2").unwrap();
        let plus = node.child(0).unwrap();
        assert_eq!(plus.child(0).unwrap().child(0).unwrap().kind(), TokenKind::Sin);
    }

    #[test]
    fn test_function_without_argument() {
        let err = parse_expr("2 COS").unwrap_err();
        assert!(err.message().contains("requires an argument"));
    }

    #[test]
    fn test_missing_operand() {
        let err = parse_expr("1 +").unwrap_err();
        assert!(err.message().contains("missing operand"));
        let err = parse_expr("* 2").unwrap_err();
        assert!(err.message().contains("missing operand"));
    }

    #[test]
    fn test_invalid_operand() {
        let err = parse_expr("\"s\" + 1").unwrap_err();
        assert!(err.message().contains("invalid operand"));
    }

    #[test]
    fn test_orphaned_numeral() {
        let err = parse_expr("1 + 2 3").unwrap_err();
        assert!(err.message().contains("orphaned numeral"));
        assert!(matches!(err, ParseError::Syntax { token: Some(ref t), .. } if t == "INT_LIT:3"));
    }

    #[test]
    fn test_too_many_right_parentheses() {
        let err = parse_expr("1 + 2) * (3").unwrap_err();
        assert!(err.message().contains("too many right parentheses"));
    }

    #[test]
    fn test_unclosed_parenthesis() {
        let err = parse_expr("(1 + (2 * 3)").unwrap_err();
        assert!(err.message().contains("not all parentheses closed"));
    }

    #[test]
    fn test_empty_parentheses() {
        let err = parse_expr("1 + ()").unwrap_err();
        assert!(err.message().contains("empty parentheses"));
    }

    #[test]
    fn test_split_groups() {
        let tokens = span("A * (1 + (2)) - 4");
        let segments = split_groups(&tokens).unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Token(0),
                Segment::Token(1),
                Segment::Group(3..8),
                Segment::Token(9),
                Segment::Token(10),
            ]
        );
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));

        let node = parse_expr(&nested(MAX_NESTING)).unwrap();
        assert_eq!(node.kind(), TokenKind::Expr);

        for depth in [MAX_NESTING + 1, 3000] {
            let err = parse_expr(&nested(depth)).unwrap_err();
            assert_eq!(err.message(), "expression nested too deeply");
        }
    }

    #[test]
    fn test_folding_is_deterministic() {
        let a = parse_expr("A * (1 + B) / 2 - C").unwrap();
        let b = parse_expr("A * (1 + B) / 2 - C").unwrap();
        assert_eq!(a, b);
    }
}
