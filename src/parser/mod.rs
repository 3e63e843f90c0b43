//! Tython source code parser
//!
//! This module transforms Tython source text into a syntax tree:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser context, errors and entry points (tokens → tree)
//! - [`ast`]: Tree node definition
//! - [`options`]: Precedence and recovery configuration
//!
//! # Language
//!
//! Tython is line oriented and case-insensitive:
//! - Types: `INT32`, `INT64`, `REAL32`, `REAL64`, `CHAR8`
//! - Statements: declarations, `->` assignments, `IF`/`THEN`/`ELSE`/`END`,
//!   `LBL`/`GOTO`, `DISP`/`DISPSTR`
//! - Expressions: `+ - * /`, parentheses, trigonometric functions
//! - Conditions: one comparison per group, joined by `AND OR NOT NAND XOR NOR`
//! - `#` starts a comment that runs to the end of the line
//!
//! # Parser Implementation
//!
//! Hand-written cursor-driven statement parser; expression spans are folded
//! by operator tier. No external parser generator dependencies.

pub mod ast;
mod conditions;
mod expressions;
pub mod lexer;
pub mod options;
pub mod parse;
mod statements;

pub use ast::Node;
pub use lexer::{tokenize, LexError, Token, TokenKind};
pub use options::{ParserOptions, Precedence, UnknownStatementPolicy};
pub use parse::{parse, parse_with, Compilation, Diagnostic, ParseError, Parser, MAX_NESTING};
