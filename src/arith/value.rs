//! Data types and runtime values
//!
//! [`DataType`] mirrors the five declaration keywords. [`Value`] holds the
//! four numeric widths; `CHAR8` is a declaration-only type with no arithmetic.

use crate::parser::lexer::{Token, TokenKind};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int32,
    Int64,
    Real32,
    Real64,
    Char8,
}

impl DataType {
    /// Map a data-type keyword token kind.
    pub fn from_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Int32 => Some(DataType::Int32),
            TokenKind::Int64 => Some(DataType::Int64),
            TokenKind::Real32 => Some(DataType::Real32),
            TokenKind::Real64 => Some(DataType::Real64),
            TokenKind::Char8 => Some(DataType::Char8),
            _ => None,
        }
    }

    /// Type of an undeclared variable: names starting with `I` through `N`
    /// are integers, everything else is real.
    pub fn implicit_for(name: &str) -> Self {
        let first = name.trim_start_matches('@').chars().next();
        match first.map(|c| c.to_ascii_uppercase()) {
            Some('I'..='N') => DataType::Int32,
            _ => DataType::Real32,
        }
    }

    /// Storage size in bytes
    pub fn size(self) -> usize {
        match self {
            DataType::Int32 | DataType::Real32 => 4,
            DataType::Int64 | DataType::Real64 => 8,
            DataType::Char8 => 1,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int32 => "INT32",
            DataType::Int64 => "INT64",
            DataType::Real32 => "REAL32",
            DataType::Real64 => "REAL64",
            DataType::Char8 => "CHAR8",
        };
        f.write_str(name)
    }
}

/// Runtime numeric value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int32(i32),
    Int64(i64),
    Real32(f32),
    Real64(f64),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Int32(_) => DataType::Int32,
            Value::Int64(_) => DataType::Int64,
            Value::Real32(_) => DataType::Real32,
            Value::Real64(_) => DataType::Real64,
        }
    }

    /// Zero of the given type, `None` for `CHAR8`.
    pub fn zero(data_type: DataType) -> Option<Self> {
        match data_type {
            DataType::Int32 => Some(Value::Int32(0)),
            DataType::Int64 => Some(Value::Int64(0)),
            DataType::Real32 => Some(Value::Real32(0.0)),
            DataType::Real64 => Some(Value::Real64(0.0)),
            DataType::Char8 => None,
        }
    }

    /// Value of a numeric literal token.
    ///
    /// Integer literals (decimal, `0x`, `0b`) become `Int32` when they fit
    /// and `Int64` otherwise; float literals become `Real64`.
    pub fn from_literal(token: &Token) -> Option<Self> {
        let text = token.value()?;
        let integer = match token.kind() {
            TokenKind::IntLit => text.parse::<i64>().ok()?,
            TokenKind::HexLit => i64::from_str_radix(text.get(2..)?, 16).ok()?,
            TokenKind::BinLit => i64::from_str_radix(text.get(2..)?, 2).ok()?,
            TokenKind::FloatLit => return text.parse::<f64>().ok().map(Value::Real64),
            _ => return None,
        };
        Some(match i32::try_from(integer) {
            Ok(small) => Value::Int32(small),
            Err(_) => Value::Int64(integer),
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int32(n) => write!(f, "{}", n),
            Value::Int64(n) => write!(f, "{}", n),
            Value::Real32(x) => write!(f, "{}", x),
            Value::Real64(x) => write!(f, "{}", x),
        }
    }
}
