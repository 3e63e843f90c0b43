use crate::arith::{ArithError, ArithmeticUnit, Value};

/// Arithmetic on the host's native integer and float types.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeArithmetic;

impl NativeArithmetic {
    pub fn new() -> Self {
        Self
    }
}

fn mismatch(left: Value, right: Value) -> ArithError {
    ArithError::WidthMismatch {
        left: left.data_type(),
        right: right.data_type(),
    }
}

impl ArithmeticUnit for NativeArithmetic {
    fn add(&self, left: Value, right: Value) -> Result<Value, ArithError> {
        match (left, right) {
            (Value::Int32(a), Value::Int32(b)) => Ok(Value::Int32(a.wrapping_add(b))),
            (Value::Int64(a), Value::Int64(b)) => Ok(Value::Int64(a.wrapping_add(b))),
            (Value::Real32(a), Value::Real32(b)) => Ok(Value::Real32(a + b)),
            (Value::Real64(a), Value::Real64(b)) => Ok(Value::Real64(a + b)),
            _ => Err(mismatch(left, right)),
        }
    }

    fn subtract(&self, left: Value, right: Value) -> Result<Value, ArithError> {
        match (left, right) {
            (Value::Int32(a), Value::Int32(b)) => Ok(Value::Int32(a.wrapping_sub(b))),
            (Value::Int64(a), Value::Int64(b)) => Ok(Value::Int64(a.wrapping_sub(b))),
            (Value::Real32(a), Value::Real32(b)) => Ok(Value::Real32(a - b)),
            (Value::Real64(a), Value::Real64(b)) => Ok(Value::Real64(a - b)),
            _ => Err(mismatch(left, right)),
        }
    }

    fn multiply(&self, left: Value, right: Value) -> Result<Value, ArithError> {
        match (left, right) {
            (Value::Int32(a), Value::Int32(b)) => Ok(Value::Int32(a.wrapping_mul(b))),
            (Value::Int64(a), Value::Int64(b)) => Ok(Value::Int64(a.wrapping_mul(b))),
            (Value::Real32(a), Value::Real32(b)) => Ok(Value::Real32(a * b)),
            (Value::Real64(a), Value::Real64(b)) => Ok(Value::Real64(a * b)),
            _ => Err(mismatch(left, right)),
        }
    }

    /// Integer division truncates toward zero.
    fn divide(&self, left: Value, right: Value) -> Result<Value, ArithError> {
        match (left, right) {
            (Value::Int32(_), Value::Int32(0)) | (Value::Int64(_), Value::Int64(0)) => {
                Err(ArithError::DivisionByZero)
            }
            (Value::Int32(a), Value::Int32(b)) => Ok(Value::Int32(a.wrapping_div(b))),
            (Value::Int64(a), Value::Int64(b)) => Ok(Value::Int64(a.wrapping_div(b))),
            (Value::Real32(a), Value::Real32(b)) => Ok(Value::Real32(a / b)),
            (Value::Real64(a), Value::Real64(b)) => Ok(Value::Real64(a / b)),
            _ => Err(mismatch(left, right)),
        }
    }

    fn negate(&self, value: Value) -> Value {
        match value {
            Value::Int32(a) => Value::Int32(a.wrapping_neg()),
            Value::Int64(a) => Value::Int64(a.wrapping_neg()),
            Value::Real32(a) => Value::Real32(-a),
            Value::Real64(a) => Value::Real64(-a),
        }
    }
}
