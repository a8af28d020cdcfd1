use crate::error::MathError;
use crate::identifiers::IdentifierTable;
use crate::parser::Reduce;

/// Sub-expression kept around so a summation body can be evaluated once per
/// iteration without re-reading its tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Number {
        value: i64,
    },
    Variable {
        name: String,
        column: usize,
    },
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
        column: usize,
    },
    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    BitOr,
    BitXor,
    BitAnd,
    ShiftLeft,
    ShiftRight,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
}

/// Reducer that records the parse instead of computing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct AstBuilder;

impl Reduce for AstBuilder {
    type Output = Expr;

    fn number(&mut self, value: i64) -> Expr {
        Expr::Number { value }
    }

    fn variable(
        &mut self,
        _identifiers: &IdentifierTable,
        name: &str,
        column: usize,
    ) -> Result<Expr, MathError> {
        Ok(Expr::Variable {
            name: name.to_string(),
            column,
        })
    }

    fn negate(&mut self, operand: Expr) -> Expr {
        Expr::Unary {
            operator: UnaryOp::Negate,
            operand: Box::new(operand),
        }
    }

    fn binary(
        &mut self,
        operator: BinaryOp,
        left: Expr,
        right: Expr,
        column: usize,
    ) -> Result<Expr, MathError> {
        Ok(Expr::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            column,
        })
    }
}
