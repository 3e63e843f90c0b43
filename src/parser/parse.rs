//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, diagnostics, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! - This module: Parser context, helper methods, and coordination
//! - `statements`: the statement/block state machine
//! - `expressions`: arithmetic spans, parenthesis resolution and folding
//! - `conditions`: boolean comparisons and logical connectives
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks.
//! The parser owns its token list, cursor, options and diagnostics, so
//! separate compilations never share state.

use crate::parser::ast::Node;
use crate::parser::lexer::{tokenize, LexError, Token, TokenKind};
use crate::parser::options::ParserOptions;
use std::fmt;

/// Deepest parenthesis or connective nesting accepted in one expression.
pub const MAX_NESTING: usize = 64;

/// Parser error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Lexical error: {0}")]
    Lex(#[from] LexError),

    #[error("Syntax error{}: {message}{}", line_suffix(.line), token_suffix(.token))]
    Syntax {
        message: String,
        token: Option<String>,
        line: Option<usize>,
    },

    #[error("{feature} is not implemented (line {line})")]
    NotImplemented { feature: &'static str, line: usize },
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

fn token_suffix(token: &Option<String>) -> String {
    token
        .as_ref()
        .map(|t| format!(" (got {})", t))
        .unwrap_or_default()
}

impl ParseError {
    /// Syntax error pinned to the offending token.
    pub fn at(token: &Token, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            message: message.into(),
            token: Some(token.to_string()),
            line: Some(token.line()),
        }
    }

    /// The program uses a feature the compiler recognizes but cannot build yet.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, ParseError::NotImplemented { .. })
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Lex(e) => Some(e.line),
            ParseError::Syntax { line, .. } => *line,
            ParseError::NotImplemented { line, .. } => Some(*line),
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParseError::Lex(e) => e.to_string(),
            ParseError::Syntax { message, .. } => message.clone(),
            ParseError::NotImplemented { feature, .. } => format!("{} is not implemented", feature),
        }
    }
}

/// A non-fatal finding recorded while parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Result of a successful compilation pass.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub root: Node,
    pub diagnostics: Vec<Diagnostic>,
}

/// Recursive descent parser for Tython
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) options: ParserOptions,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        Self::with_options(source, ParserOptions::default())
    }

    pub fn with_options(source: &str, options: ParserOptions) -> Result<Self, ParseError> {
        let tokens = tokenize(source)?;
        Ok(Self::from_tokens(tokens, options))
    }

    /// Build a parser over an existing token list.
    ///
    /// The list must end with exactly one [`TokenKind::Eof`]; one is appended
    /// when it is missing.
    pub fn from_tokens(mut tokens: Vec<Token>, options: ParserOptions) -> Self {
        if tokens.last().map(Token::kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map(Token::line).unwrap_or(1);
            tokens.push(Token::new(TokenKind::Eof, line));
        }
        Self {
            tokens,
            position: 0,
            options,
            diagnostics: Vec::new(),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Parse the entire program into a `PROG` root node.
    pub fn parse_program(&mut self) -> Result<Node, ParseError> {
        if self.options.require_program_header {
            self.check_program_header()?;
        }
        let mut root = Node::synthetic(TokenKind::Prog, 0, Vec::new());
        self.parse_block(&mut root, BlockEnd::Eof)?;
        if let Some(program) = root.children().first() {
            if program.kind() == TokenKind::Program {
                let title = program
                    .child(0)
                    .and_then(Node::value)
                    .map(|v| v.trim_matches('"').to_string());
                if let Some(title) = title {
                    root = root.named(title);
                }
            }
        }
        if self.options.debug {
            log::debug!("parsed {} top-level statements", root.children().len());
        }
        Ok(root)
    }

    /// Parse and hand back the tree together with any diagnostics.
    pub fn compile(mut self) -> Result<Compilation, ParseError> {
        let root = self.parse_program()?;
        Ok(Compilation {
            root,
            diagnostics: self.diagnostics,
        })
    }

    fn check_program_header(&self) -> Result<(), ParseError> {
        let first = self.tokens.first().map(Token::kind);
        let second = self.tokens.get(1).map(Token::kind);
        if first == Some(TokenKind::Program) && second == Some(TokenKind::StrLit) {
            return Ok(());
        }
        Err(ParseError::at(
            &self.tokens[0],
            "Program must begin with a program name",
        ))
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.position.min(last)]
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind()
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> Option<&Token> {
        self.position
            .checked_sub(1)
            .and_then(|p| self.tokens.get(p))
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    /// True when the current token opens a physical line.
    pub(crate) fn at_line_start(&self) -> bool {
        match self.previous() {
            None => true,
            Some(prev) => prev.kind() == TokenKind::LineBreak,
        }
    }

    /// Consume the next token if it has one of `kinds`, else fail with `message`.
    pub(crate) fn expect_one_of(
        &mut self,
        kinds: impl Fn(TokenKind) -> bool,
        message: &str,
    ) -> Result<Token, ParseError> {
        if kinds(self.peek_kind()) {
            Ok(self.advance())
        } else {
            Err(ParseError::at(self.peek(), message))
        }
    }

    /// Tokens from the cursor up to (not including) the next line break or EOF.
    pub(crate) fn rest_of_line(&self) -> &[Token] {
        let start = self.position.min(self.tokens.len() - 1);
        let len = self.tokens[start..]
            .iter()
            .position(|t| matches!(t.kind(), TokenKind::LineBreak | TokenKind::Eof))
            .unwrap_or(self.tokens.len() - start);
        &self.tokens[start..start + len]
    }

    /// Fail once a recursive parse goes past [`MAX_NESTING`] levels.
    pub(crate) fn check_nesting(&self, depth: usize, token: &Token) -> Result<(), ParseError> {
        if depth > MAX_NESTING {
            return Err(ParseError::at(token, "expression nested too deeply"));
        }
        Ok(())
    }

    pub(crate) fn trace(&self, message: fmt::Arguments<'_>) {
        if self.options.debug {
            log::debug!("{}", message);
        }
    }
}

/// Where a block stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockEnd {
    /// Top level: runs to end of file.
    Eof,
    /// Block-form conditional body: stops before `END` or `ELSE`.
    Keyword,
    /// Single-line conditional body: stops before the next line break.
    Line,
}

/// Parse a whole program with default options.
pub fn parse(source: &str) -> Result<Compilation, ParseError> {
    Parser::new(source)?.compile()
}

/// Parse a whole program with explicit options.
pub fn parse_with(source: &str, options: ParserOptions) -> Result<Compilation, ParseError> {
    Parser::with_options(source, options)?.compile()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let token = Token::with_value(TokenKind::IntLit, "7", 4);
        let err = ParseError::at(&token, "orphaned numeral");
        assert_eq!(
            err.to_string(),
            "Syntax error at line 4: orphaned numeral (got INT_LIT:7)"
        );
        assert_eq!(err.line(), Some(4));
        assert!(!err.is_not_implemented());
    }

    #[test]
    fn test_lex_error_converts() {
        let err = Parser::new("A -> 1+2").err().unwrap();
        assert!(matches!(err, ParseError::Lex(ref e) if e.text == "1+2"));
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn test_from_tokens_appends_eof() {
        let parser = Parser::from_tokens(
            vec![Token::with_value(TokenKind::Var, "A", 2)],
            ParserOptions::default(),
        );
        assert_eq!(parser.tokens().len(), 2);
        assert_eq!(parser.tokens()[1].kind(), TokenKind::Eof);
    }

    #[test]
    fn test_program_name_on_root() {
        let compilation = parse("PROGRAM \"p1\"\nA -> 1").unwrap();
        assert_eq!(compilation.root.name(), Some("p1"));
        assert_eq!(compilation.root.kind(), TokenKind::Prog);
    }

    #[test]
    fn test_required_header() {
        let options = ParserOptions {
            require_program_header: true,
            ..ParserOptions::default()
        };
        let err = parse_with("A -> 1", options.clone()).unwrap_err();
        assert!(err.message().contains("program name"));
        assert!(parse_with("PROGRAM \"x\"\nA -> 1", options).is_ok());
    }

    #[test]
    fn test_rest_of_line() {
        let parser = Parser::new("A -> 1 + 2\nB -> 3").unwrap();
        assert_eq!(parser.rest_of_line().len(), 5);
    }
}
