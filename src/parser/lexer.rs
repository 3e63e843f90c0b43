//! Lexer (tokenizer) for Tython source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Tokens are whitespace separated; only `(`, `)` and `,` split a word on their
//! own. Everything after a `#` outside a string literal is a comment.
//!
//! Every buffered word is classified by `classify`, which tries the exact
//! keyword table first and the structural literal/identifier matchers second.
//! The order matters: `IF` must become the keyword, never a variable.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::OnceLock;

const COMMENT_DELIM: char = '#';

/// The closed set of token categories.
///
/// The last five variants are never produced by the lexer; the parser uses
/// them to tag the non-terminal nodes it synthesizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Data types
    Int32,
    Int64,
    Real32,
    Real64,
    Char8,

    // Arithmetic
    Assign, // ->
    Plus,
    Minus,
    Mul,
    Div,
    LParen,
    RParen,

    // Conditionals
    If,
    Then,
    Else,
    End,

    // Flow control
    Label,
    Goto,

    // Comparison
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
    EqualTo,
    NotEqualTo,

    // Logical
    And,
    Or,
    Not,
    Nand,
    Xor,
    Nor,

    // Program control
    Program,
    Version,
    Implicit,
    Call,

    // Literals
    CharLit,
    StrLit,
    IntLit,
    FloatLit,
    HexLit,
    BinLit,

    // Variables
    Var,
    ArrayVar,

    // Commands
    Disp,
    DispStr,

    // Trig functions
    Sin,
    Cos,
    Tan,
    Cot,
    Sec,
    Csc,
    ArcSin,
    ArcCos,
    ArcTan,
    ArcCot,
    ArcSec,
    ArcCsc,

    Comma,

    // Structure
    LineBreak,
    Eof,
    Expr,
    Prog,
    BoolExpr,
    LogicExpr,
    Block,
}

impl TokenKind {
    /// Literal and identifier kinds keep their source text.
    pub fn carries_value(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            CharLit | StrLit | IntLit | FloatLit | HexLit | BinLit | Var | ArrayVar
        )
    }

    /// Kinds that may stand alone as an arithmetic operand.
    pub fn is_numeral(self) -> bool {
        use TokenKind::*;
        matches!(self, IntLit | FloatLit | HexLit | BinLit | Var | ArrayVar)
    }

    pub fn is_literal(self) -> bool {
        use TokenKind::*;
        matches!(self, CharLit | StrLit | IntLit | FloatLit | HexLit | BinLit)
    }

    pub fn is_variable(self) -> bool {
        matches!(self, TokenKind::Var | TokenKind::ArrayVar)
    }

    pub fn is_data_type(self) -> bool {
        use TokenKind::*;
        matches!(self, Int32 | Int64 | Real32 | Real64 | Char8)
    }

    pub fn is_arithmetic_operator(self) -> bool {
        use TokenKind::*;
        matches!(self, Plus | Minus | Mul | Div)
    }

    pub fn is_comparison(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Greater | Less | GreaterEqual | LessEqual | EqualTo | NotEqualTo
        )
    }

    pub fn is_logical(self) -> bool {
        use TokenKind::*;
        matches!(self, And | Or | Not | Nand | Xor | Nor)
    }

    pub fn is_function(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Sin | Cos | Tan | Cot | Sec | Csc | ArcSin | ArcCos | ArcTan | ArcCot | ArcSec | ArcCsc
        )
    }

    /// Source spelling for kinds that have a fixed one.
    pub fn symbol(self) -> Option<&'static str> {
        use TokenKind::*;
        let s = match self {
            Int32 => "INT32",
            Int64 => "INT64",
            Real32 => "REAL32",
            Real64 => "REAL64",
            Char8 => "CHAR8",
            Assign => "->",
            Plus => "+",
            Minus => "-",
            Mul => "*",
            Div => "/",
            LParen => "(",
            RParen => ")",
            If => "IF",
            Then => "THEN",
            Else => "ELSE",
            End => "END",
            Label => "LBL",
            Goto => "GOTO",
            Greater => ">",
            Less => "<",
            GreaterEqual => ">=",
            LessEqual => "<=",
            EqualTo => "==",
            NotEqualTo => "!=",
            And => "AND",
            Or => "OR",
            Not => "NOT",
            Nand => "NAND",
            Xor => "XOR",
            Nor => "NOR",
            Program => "PROGRAM",
            Version => "VERSION",
            Implicit => "IMPLICIT",
            Call => "CALL",
            Disp => "DISP",
            DispStr => "DISPSTR",
            Sin => "SIN",
            Cos => "COS",
            Tan => "TAN",
            Cot => "COT",
            Sec => "SEC",
            Csc => "CSC",
            ArcSin => "ARCSIN",
            ArcCos => "ARCCOS",
            ArcTan => "ARCTAN",
            ArcCot => "ARCCOT",
            ArcSec => "ARCSEC",
            ArcCsc => "ARCCSC",
            Comma => ",",
            CharLit | StrLit | IntLit | FloatLit | HexLit | BinLit | Var | ArrayVar | LineBreak
            | Eof | Expr | Prog | BoolExpr | LogicExpr | Block => return None,
        };
        Some(s)
    }

    /// Upper-case tag used in tree listings and error messages.
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Int32 => "INT32",
            Int64 => "INT64",
            Real32 => "REAL32",
            Real64 => "REAL64",
            Char8 => "CHAR8",
            Assign => "ASSIGN",
            Plus => "PLUS",
            Minus => "MINUS",
            Mul => "MUL",
            Div => "DIV",
            LParen => "L_PAREN",
            RParen => "R_PAREN",
            If => "IF",
            Then => "THEN",
            Else => "ELSE",
            End => "END",
            Label => "LABEL",
            Goto => "GOTO",
            Greater => "GREATER_THAN",
            Less => "LESS_THAN",
            GreaterEqual => "GE_THAN",
            LessEqual => "LE_THAN",
            EqualTo => "EQUAL_TO",
            NotEqualTo => "NOT_EQUAL_TO",
            And => "LOGICAL_AND",
            Or => "LOGICAL_OR",
            Not => "LOGICAL_NOT",
            Nand => "LOGICAL_NAND",
            Xor => "LOGICAL_XOR",
            Nor => "LOGICAL_NOR",
            Program => "PROGRAM",
            Version => "VERSION",
            Implicit => "IMPLICIT",
            Call => "CALL",
            CharLit => "CHAR_LIT",
            StrLit => "STR_LIT",
            IntLit => "INT_LIT",
            FloatLit => "FLOAT_LIT",
            HexLit => "HEX_LIT",
            BinLit => "BIN_LIT",
            Var => "VAR",
            ArrayVar => "ARRAY_VAR",
            Disp => "DISP",
            DispStr => "DISP_STR",
            Sin => "SIN",
            Cos => "COS",
            Tan => "TAN",
            Cot => "COT",
            Sec => "SEC",
            Csc => "CSC",
            ArcSin => "ARCSIN",
            ArcCos => "ARCCOS",
            ArcTan => "ARCTAN",
            ArcCot => "ARCCOT",
            ArcSec => "ARCSEC",
            ArcCsc => "ARCCSC",
            Comma => "COMMA",
            LineBreak => "LINE_BREAK",
            Eof => "EOF",
            Expr => "EXPR",
            Prog => "PROG",
            BoolExpr => "BOOL_EXPR",
            LogicExpr => "LOGIC_EXPR",
            Block => "BLOCK",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified lexical unit.
///
/// Whether `value` is present is decided by the kind alone, so the fields are
/// private and tokens can only be built through the constructors below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    value: Option<String>,
    line: usize,
}

impl Token {
    /// Build a token for a kind that carries no text.
    ///
    /// # Panics
    /// In debug builds, if `kind` is a literal or identifier kind.
    pub fn new(kind: TokenKind, line: usize) -> Self {
        debug_assert!(!kind.carries_value(), "{} requires a value", kind);
        Self {
            kind,
            value: None,
            line,
        }
    }

    /// Build a token for a literal or identifier kind.
    ///
    /// # Panics
    /// In debug builds, if `kind` does not carry text.
    pub fn with_value(kind: TokenKind, value: impl Into<String>, line: usize) -> Self {
        debug_assert!(kind.carries_value(), "{} takes no value", kind);
        Self {
            kind,
            value: Some(value.into()),
            line,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Text that re-tokenizes to this token.
    pub fn source_text(&self) -> &str {
        match (&self.value, self.kind) {
            (Some(v), _) => v,
            (None, TokenKind::LineBreak) => "\n",
            (None, kind) => kind.symbol().unwrap_or(""),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{}:{}", self.kind, v),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unable to match token <{text}> on line {line}")]
pub struct LexError {
    pub text: String,
    pub line: usize,
}

fn keyword_table() -> &'static FxHashMap<&'static str, TokenKind> {
    static TABLE: OnceLock<FxHashMap<&'static str, TokenKind>> = OnceLock::new();
    TABLE.get_or_init(|| {
        use TokenKind::*;
        let mut table = FxHashMap::default();
        for kind in [
            Int32, Int64, Real32, Real64, Char8, Assign, Plus, Minus, Mul, Div, LParen, RParen,
            If, Then, Else, End, Label, Goto, Greater, Less, GreaterEqual, LessEqual, EqualTo,
            NotEqualTo, And, Or, Not, Nand, Xor, Nor, Program, Version, Implicit, Call, Disp,
            DispStr, Sin, Cos, Tan, Cot, Sec, Csc, ArcSin, ArcCos, ArcTan, ArcCot, ArcSec,
            ArcCsc, Comma,
        ] {
            if let Some(symbol) = kind.symbol() {
                table.insert(symbol, kind);
            }
        }
        // Alternate spellings
        table.insert("LABEL", Label);
        table.insert("DISP_STR", DispStr);
        table
    })
}

fn is_char_lit(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(
        (chars.next(), chars.next(), chars.next(), chars.next()),
        (Some('\''), Some(_), Some('\''), None)
    )
}

fn is_str_lit(s: &str) -> bool {
    s.len() >= 2 && s.starts_with('"') && s.ends_with('"')
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_float_lit(s: &str) -> bool {
    match s.split_once('.') {
        Some((whole, frac)) => is_digits(whole) && (frac.is_empty() || is_digits(frac)),
        None => false,
    }
}

fn is_prefixed(s: &str, prefix: &str, digit: fn(u8) -> bool) -> bool {
    match s.strip_prefix(prefix) {
        Some(rest) => !rest.is_empty() && rest.bytes().all(digit),
        None => false,
    }
}

fn is_var(s: &str) -> bool {
    let b = s.as_bytes();
    match b.len() {
        1 => b[0].is_ascii_uppercase(),
        2 => b[0].is_ascii_uppercase() && b[1].is_ascii_digit(),
        _ => false,
    }
}

/// Classify one buffered word. `upper` is the upper-cased buffer text.
fn classify(upper: &str) -> Option<TokenKind> {
    if let Some(kind) = keyword_table().get(upper) {
        return Some(*kind);
    }
    let kind = if is_char_lit(upper) {
        TokenKind::CharLit
    } else if is_str_lit(upper) {
        TokenKind::StrLit
    } else if is_digits(upper) {
        TokenKind::IntLit
    } else if is_float_lit(upper) {
        TokenKind::FloatLit
    } else if is_prefixed(upper, "0X", |b| b.is_ascii_hexdigit()) {
        TokenKind::HexLit
    } else if is_prefixed(upper, "0B", |b| b == b'0' || b == b'1') {
        TokenKind::BinLit
    } else if is_var(upper) {
        TokenKind::Var
    } else if upper.strip_prefix('@').is_some_and(is_var) {
        TokenKind::ArrayVar
    } else {
        return None;
    };
    Some(kind)
}

/// Classify a single word the way the lexer would, ignoring case.
pub fn classify_word(word: &str) -> Option<TokenKind> {
    classify(&word.to_uppercase())
}

/// Tokenize a whole program.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Print tokens back to source text, one space between tokens on a line.
pub fn tokens_to_source(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut line_start = true;
    for token in tokens {
        match token.kind() {
            TokenKind::Eof => break,
            TokenKind::LineBreak => {
                out.push('\n');
                line_start = true;
            }
            _ => {
                if !line_start {
                    out.push(' ');
                }
                out.push_str(token.source_text());
                line_start = false;
            }
        }
    }
    out
}

/// Lexer for Tython source code
pub struct Lexer<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    buffer: String,
    line: usize,
    in_string: bool,
    in_comment: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            tokens: Vec::new(),
            buffer: String::new(),
            line: 1,
            in_string: false,
            in_comment: false,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        for ch in self.input.chars() {
            if ch == '\n' {
                if !self.in_comment {
                    self.flush()?;
                }
                self.buffer.clear();
                self.tokens.push(Token::new(TokenKind::LineBreak, self.line));
                self.in_string = false;
                self.in_comment = false;
                self.line += 1;
                continue;
            }
            if self.in_comment {
                continue;
            }
            if self.in_string {
                self.buffer.push(ch);
                if ch == '"' {
                    self.in_string = false;
                    self.flush()?;
                }
                continue;
            }
            match ch {
                COMMENT_DELIM => {
                    self.flush()?;
                    self.in_comment = true;
                }
                ' ' | '\t' | '\r' => self.flush()?,
                '(' | ')' | ',' => {
                    self.flush()?;
                    self.buffer.push(ch);
                    self.flush()?;
                }
                '"' => {
                    self.flush()?;
                    self.buffer.push(ch);
                    self.in_string = true;
                }
                _ => self.buffer.push(ch),
            }
        }
        self.flush()?;

        let first = self
            .tokens
            .iter()
            .position(|t| t.kind() != TokenKind::LineBreak)
            .unwrap_or(self.tokens.len());
        self.tokens.drain(..first);
        while self
            .tokens
            .last()
            .is_some_and(|t| t.kind() == TokenKind::LineBreak)
        {
            self.tokens.pop();
        }
        self.tokens.push(Token::new(TokenKind::Eof, self.line));

        log::debug!("tokenized {} tokens over {} lines", self.tokens.len(), self.line);
        Ok(self.tokens)
    }

    /// Classify the pending buffer, if any, and reset it.
    fn flush(&mut self) -> Result<(), LexError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut self.buffer);
        let kind = classify(&text.to_uppercase()).ok_or_else(|| LexError {
            text: text.clone(),
            line: self.line,
        })?;
        let token = if kind.carries_value() {
            Token::with_value(kind, text, self.line)
        } else {
            Token::new(kind, self.line)
        };
        log::trace!("line {}: {}", self.line, token);
        self.tokens.push(token);
        Ok(())
    }
}
