//! Parser configuration
//!
//! [`ParserOptions`] is passed to
//! [`Parser::with_options`](crate::parser::parse::Parser::with_options)
//! and stays fixed for the whole compilation.

use crate::parser::lexer::TokenKind;

/// Order in which arithmetic operator tiers are folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precedence {
    /// `*` and `/` bind tighter than `+` and `-`: `1 + 2 * 3` is `1 + (2 * 3)`.
    #[default]
    Standard,
    /// Additive operators are folded first: `1 + 2 * 3` is `(1 + 2) * 3`.
    /// Kept for programs written against the first Tython releases.
    Legacy,
}

impl Precedence {
    /// Operator tiers in folding order.
    pub fn tiers(self) -> [&'static [TokenKind]; 2] {
        const MULTIPLICATIVE: &[TokenKind] = &[TokenKind::Mul, TokenKind::Div];
        const ADDITIVE: &[TokenKind] = &[TokenKind::Plus, TokenKind::Minus];
        match self {
            Precedence::Standard => [MULTIPLICATIVE, ADDITIVE],
            Precedence::Legacy => [ADDITIVE, MULTIPLICATIVE],
        }
    }
}

/// What to do with a statement that starts with a token no grammar claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownStatementPolicy {
    /// Record a diagnostic and move on to the next token.
    #[default]
    Skip,
    /// Abort the compilation with a syntax error.
    Reject,
}

#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    pub precedence: Precedence,
    pub unknown_statements: UnknownStatementPolicy,
    /// Require `PROGRAM "<name>"` as the first statement.
    pub require_program_header: bool,
    /// Emit `debug`-level traces of dispatch and folding.
    pub debug: bool,
}

impl ParserOptions {
    pub fn strict() -> Self {
        Self {
            unknown_statements: UnknownStatementPolicy::Reject,
            require_program_header: true,
            ..Self::default()
        }
    }
}
