use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{ErrorKind, MathError};
use crate::identifiers::IdentifierTable;
use crate::parser::Reduce;

/// Integer semantics for every operator, applied as soon as a production reduces.
///
/// All arithmetic is on `i64` and wraps in two's complement instead of trapping.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    /// Evaluates a recorded sub-expression against the current identifier values.
    pub fn evaluate(&self, expr: &Expr, identifiers: &IdentifierTable) -> Result<i64, MathError> {
        match expr {
            Expr::Number { value } => Ok(*value),
            Expr::Variable { name, column } => identifiers.lookup(name, *column),
            Expr::Unary {
                operator: UnaryOp::Negate,
                operand,
            } => Ok(self.evaluate(operand, identifiers)?.wrapping_neg()),
            Expr::Binary {
                left,
                operator,
                right,
                column,
            } => {
                let left_val = self.evaluate(left, identifiers)?;
                let right_val = self.evaluate(right, identifiers)?;
                apply_binary(*operator, left_val, right_val, *column)
            }
        }
    }
}

impl Reduce for Evaluator {
    type Output = i64;

    fn number(&mut self, value: i64) -> i64 {
        value
    }

    fn variable(
        &mut self,
        identifiers: &IdentifierTable,
        name: &str,
        column: usize,
    ) -> Result<i64, MathError> {
        identifiers.lookup(name, column)
    }

    fn negate(&mut self, operand: i64) -> i64 {
        operand.wrapping_neg()
    }

    fn binary(
        &mut self,
        operator: BinaryOp,
        left: i64,
        right: i64,
        column: usize,
    ) -> Result<i64, MathError> {
        apply_binary(operator, left, right, column)
    }
}

/// `column` is the operator's, used when the operation itself fails.
pub fn apply_binary(
    operator: BinaryOp,
    left: i64,
    right: i64,
    column: usize,
) -> Result<i64, MathError> {
    match operator {
        BinaryOp::BitOr => Ok(left | right),
        BinaryOp::BitXor => Ok(left ^ right),
        BinaryOp::BitAnd => Ok(left & right),
        // Shift counts are taken modulo 64; `>>` does not propagate the sign bit.
        BinaryOp::ShiftLeft => Ok(left.wrapping_shl(right as u32)),
        BinaryOp::ShiftRight => Ok((left as u64).wrapping_shr(right as u32) as i64),
        BinaryOp::Add => Ok(left.wrapping_add(right)),
        BinaryOp::Subtract => Ok(left.wrapping_sub(right)),
        BinaryOp::Multiply => Ok(left.wrapping_mul(right)),
        BinaryOp::Divide => {
            if right == 0 {
                Err(MathError::new(ErrorKind::DivisionByZero, column))
            } else {
                Ok(left.wrapping_div(right))
            }
        }
        BinaryOp::Modulo => {
            if right == 0 {
                Err(MathError::new(ErrorKind::ModulusByZero, column))
            } else {
                Ok(left.wrapping_rem(right))
            }
        }
        BinaryOp::Power => power(left, right, column),
    }
}

/// Integer power. A negative exponent truncates `1 / base^n` toward zero.
pub fn power(base: i64, exponent: i64, column: usize) -> Result<i64, MathError> {
    if exponent < 0 {
        return match base {
            0 => Err(MathError::new_with_help(
                ErrorKind::DivisionByZero,
                column,
                "0 raised to a negative power divides by zero.".to_string(),
            )),
            1 => Ok(1),
            -1 => Ok(if exponent % 2 == 0 { 1 } else { -1 }),
            _ => Ok(0),
        };
    }

    let mut result: i64 = 1;
    let mut base = base;
    let mut exponent = exponent as u64;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exponent >>= 1;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_is_true_exponentiation() {
        assert_eq!(power(2, 10, 1), Ok(1024));
        assert_eq!(power(-3, 3, 1), Ok(-27));
        assert_eq!(power(7, 0, 1), Ok(1));
        assert_eq!(power(0, 0, 1), Ok(1));
    }

    #[test]
    fn power_wraps() {
        assert_eq!(power(2, 64, 1), Ok(0));
        assert_eq!(power(2, 63, 1), Ok(i64::MIN));
        assert_eq!(power(3, 41, 1), Ok(3i64.wrapping_pow(41)));
    }

    #[test]
    fn negative_exponents_truncate() {
        assert_eq!(power(2, -1, 1), Ok(0));
        assert_eq!(power(1, -5, 1), Ok(1));
        assert_eq!(power(-1, -3, 1), Ok(-1));
        assert_eq!(power(-1, -4, 1), Ok(1));
        assert_eq!(power(0, -1, 4).unwrap_err().kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn right_shift_is_logical() {
        assert_eq!(apply_binary(BinaryOp::ShiftRight, -1, 60, 1), Ok(15));
        assert_eq!(apply_binary(BinaryOp::ShiftRight, 256, 4, 1), Ok(16));
    }

    #[test]
    fn shift_counts_wrap_at_64() {
        assert_eq!(apply_binary(BinaryOp::ShiftLeft, 1, 65, 1), Ok(2));
        assert_eq!(apply_binary(BinaryOp::ShiftLeft, 1, 63, 1), Ok(i64::MIN));
    }

    #[test]
    fn division_truncates_and_wraps() {
        assert_eq!(apply_binary(BinaryOp::Divide, -7, 2, 1), Ok(-3));
        assert_eq!(apply_binary(BinaryOp::Modulo, -7, 2, 1), Ok(-1));
        assert_eq!(apply_binary(BinaryOp::Divide, i64::MIN, -1, 1), Ok(i64::MIN));
        assert_eq!(apply_binary(BinaryOp::Modulo, i64::MIN, -1, 1), Ok(0));
    }

    #[test]
    fn zero_divisors_report_the_operator_column() {
        let error = apply_binary(BinaryOp::Divide, 5, 0, 2).unwrap_err();
        assert_eq!(error.kind, ErrorKind::DivisionByZero);
        assert_eq!(error.column, 2);

        let error = apply_binary(BinaryOp::Modulo, 5, 0, 2).unwrap_err();
        assert_eq!(error.kind, ErrorKind::ModulusByZero);
    }

    #[test]
    fn recorded_expressions_follow_identifier_changes() {
        let mut identifiers = IdentifierTable::new();
        let body = Expr::Binary {
            left: Box::new(Expr::Variable {
                name: "i".to_string(),
                column: 1,
            }),
            operator: BinaryOp::Multiply,
            right: Box::new(Expr::Variable {
                name: "i".to_string(),
                column: 3,
            }),
            column: 2,
        };

        identifiers.get_or_create("i").set(3);
        assert_eq!(Evaluator.evaluate(&body, &identifiers), Ok(9));
        identifiers.get_or_create("i").set(-4);
        assert_eq!(Evaluator.evaluate(&body, &identifiers), Ok(16));
    }
}
