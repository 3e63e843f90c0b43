use tython::arith::{ArithError, ArithmeticUnit, DataType, NativeArithmetic, Value};
use tython::parser::{parse, TokenKind};

#[test]
fn test_integer_widths_wrap() {
    let unit = NativeArithmetic::new();
    assert_eq!(
        unit.add(Value::Int32(i32::MAX), Value::Int32(1)),
        Ok(Value::Int32(i32::MIN))
    );
    assert_eq!(
        unit.add(Value::Int64(i32::MAX as i64), Value::Int64(1)),
        Ok(Value::Int64(2_147_483_648))
    );
    assert_eq!(
        unit.multiply(Value::Int64(i64::MAX), Value::Int64(2)),
        Ok(Value::Int64(-2))
    );
}

#[test]
fn test_widths_never_mix() {
    let unit = NativeArithmetic::new();
    let err = unit.divide(Value::Real32(1.0), Value::Real64(2.0)).unwrap_err();
    assert!(matches!(
        err,
        ArithError::WidthMismatch {
            left: DataType::Real32,
            right: DataType::Real64
        }
    ));
}

#[test]
fn test_declared_types_from_tree() {
    let root = parse("INT64 A\nIMPLICIT REAL32 @B1\nK -> 2").unwrap().root;

    let declared = root.child(0).unwrap();
    assert_eq!(DataType::from_kind(declared.kind()), Some(DataType::Int64));

    let implicit = root.child(1).unwrap();
    assert_eq!(
        DataType::from_kind(implicit.child(0).unwrap().kind()),
        Some(DataType::Real32)
    );

    // Undeclared K falls back to implicit typing
    let target = root.child(2).unwrap().child(0).unwrap();
    assert_eq!(DataType::implicit_for(target.value().unwrap()), DataType::Int32);
}

#[test]
fn test_evaluate_folded_literals() {
    // A tiny evaluator over literal-only trees: (1 + 2) * 7 / 2
    fn eval(unit: &impl ArithmeticUnit, node: &tython::parser::Node) -> Result<Value, ArithError> {
        match node.kind() {
            TokenKind::Expr => eval(unit, node.child(0).unwrap()),
            TokenKind::Plus => unit.add(
                eval(unit, node.child(0).unwrap())?,
                eval(unit, node.child(1).unwrap())?,
            ),
            TokenKind::Minus => unit.subtract(
                eval(unit, node.child(0).unwrap())?,
                eval(unit, node.child(1).unwrap())?,
            ),
            TokenKind::Mul => unit.multiply(
                eval(unit, node.child(0).unwrap())?,
                eval(unit, node.child(1).unwrap())?,
            ),
            TokenKind::Div => unit.divide(
                eval(unit, node.child(0).unwrap())?,
                eval(unit, node.child(1).unwrap())?,
            ),
            _ => Ok(Value::from_literal(node.token()).unwrap()),
        }
    }

    let unit = NativeArithmetic::new();
    let root = parse("(1 + 1) / 2 * 7 / 2 -> I\nX -> 0x10 - 0b11\nY -> 5 / (2 - 2)")
        .unwrap()
        .root;
    let value = |i: usize| eval(&unit, root.child(i).unwrap().child(1).unwrap());

    assert_eq!(value(0), Ok(Value::Int32(3)));
    assert_eq!(value(1), Ok(Value::Int32(13)));
    assert_eq!(value(2), Err(ArithError::DivisionByZero));
}
