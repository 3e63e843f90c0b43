//! Arithmetic unit
//!
//! Fixed-width arithmetic for the Tython data types, kept behind the
//! [`ArithmeticUnit`] trait so a back end can swap the implementation:
//! - [`value`]: [`DataType`] and the tagged runtime [`Value`]
//! - [`native`]: [`NativeArithmetic`], the default implementation
//!
//! # Semantics
//!
//! Both operands must have the same width; mixing widths is an error rather
//! than an implicit promotion. Integer results wrap on overflow, the way the
//! fixed-width C routines of the first Tython releases did. Floats follow IEEE
//! rules, so `1.0 / 0.0` is infinity while `1 / 0` is an error.

pub mod native;
pub mod value;

pub use native::NativeArithmetic;
pub use value::{DataType, Value};

/// Arithmetic error type
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArithError {
    #[error("operand width mismatch: {left} and {right}")]
    WidthMismatch { left: DataType, right: DataType },

    #[error("integer division by zero")]
    DivisionByZero,
}

/// Operations every arithmetic back end provides.
pub trait ArithmeticUnit {
    fn add(&self, left: Value, right: Value) -> Result<Value, ArithError>;
    fn subtract(&self, left: Value, right: Value) -> Result<Value, ArithError>;
    fn multiply(&self, left: Value, right: Value) -> Result<Value, ArithError>;
    fn divide(&self, left: Value, right: Value) -> Result<Value, ArithError>;
    fn negate(&self, value: Value) -> Value;
}
