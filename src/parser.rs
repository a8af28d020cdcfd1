use crate::ast::{AstBuilder, BinaryOp};
use crate::error::{ErrorKind, MathError, Paren};
use crate::evaluator::Evaluator;
use crate::identifiers::IdentifierTable;
use crate::lexer::{Token, TokenType};
use std::mem;
use tracing::{debug, trace};

/// Deepest parenthesis nesting a line may use.
pub const MAX_NESTING_DEPTH: usize = 100;

/// Most iterations a single summation may run.
pub const MAX_SUM_ITERATIONS: i128 = 1 << 24;

/// What the parser does with each reduced production.
///
/// `Evaluator` computes integers as the grammar reduces; `AstBuilder` records
/// an `Expr` for later (repeated) evaluation. The grammar walk is the same.
pub trait Reduce {
    type Output;

    fn number(&mut self, value: i64) -> Self::Output;

    fn variable(
        &mut self,
        identifiers: &IdentifierTable,
        name: &str,
        column: usize,
    ) -> Result<Self::Output, MathError>;

    fn negate(&mut self, operand: Self::Output) -> Self::Output;

    fn binary(
        &mut self,
        operator: BinaryOp,
        left: Self::Output,
        right: Self::Output,
        column: usize,
    ) -> Result<Self::Output, MathError>;
}

pub struct Parser<'a> {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
    identifiers: &'a mut IdentifierTable,
}

impl<'a> Parser<'a> {
    /// `tokens` must end with the single `Eof` token the lexer produces.
    pub fn new(tokens: Vec<Token>, identifiers: &'a mut IdentifierTable) -> Self {
        Self {
            tokens,
            current: 0,
            depth: 0,
            identifiers,
        }
    }

    /// Parses and evaluates a whole line; the token stream must be used up.
    pub fn parse(&mut self) -> Result<i64, MathError> {
        let value = self.block()?;

        if !self.is_at_end() {
            let leftover = self.peek();
            return Err(match leftover.token_type {
                TokenType::RightParen => MathError::unmatched(Paren::Open, leftover.column),
                _ => MathError::new_with_help(
                    ErrorKind::TrailingTokens,
                    leftover.column,
                    "Everything from here on could not be combined with the expression before it."
                        .to_string(),
                ),
            });
        }

        Ok(value)
    }

    fn block(&mut self) -> Result<i64, MathError> {
        if self.check(&TokenType::Sum) {
            self.summation()
        } else if matches!(self.peek().token_type, TokenType::Identifier(_))
            && self.peek_next_is(&TokenType::Equal)
        {
            self.assignment()
        } else {
            self.expression(&mut Evaluator)
        }
    }

    fn assignment(&mut self) -> Result<i64, MathError> {
        trace!("parsing assignment");
        let name = self.lvalue()?;
        // Readable from here on, so `x = x + 1` sees the prior (or default) value.
        self.identifiers.get_or_create(&name).mark_assigned();
        self.consume(TokenType::Equal)?;

        let value = self.expression(&mut Evaluator)?;
        self.identifiers.get_or_create(&name).set(value);
        Ok(value)
    }

    fn summation(&mut self) -> Result<i64, MathError> {
        trace!("parsing summation");
        self.consume(TokenType::Sum)?;
        let name = self.lvalue()?;
        self.identifiers.get_or_create(&name).mark_assigned();

        self.consume(TokenType::Over)?;
        let (lower, upper, range_column) = self.subrange()?;
        self.consume(TokenType::In)?;

        let body = self.expression(&mut AstBuilder)?;
        if i128::from(upper) - i128::from(lower) >= MAX_SUM_ITERATIONS {
            return Err(MathError::new_with_help(
                ErrorKind::RangeTooLarge,
                range_column,
                format!("A summation may run at most {} iterations.", MAX_SUM_ITERATIONS),
            ));
        }
        debug!(variable = %name, lower, upper, "evaluating summation");

        self.identifiers.get_or_create(&name).set(lower);
        let mut total: i64 = 0;
        for i in lower..=upper {
            self.identifiers.get_or_create(&name).set(i);
            total = total.wrapping_add(Evaluator.evaluate(&body, self.identifiers)?);
        }
        Ok(total)
    }

    /// Returns both bounds and the column of the `...` between them.
    fn subrange(&mut self) -> Result<(i64, i64, usize), MathError> {
        let lower = self.expression(&mut Evaluator)?;
        let column = self.consume(TokenType::DotDotDot)?.column;
        let upper = self.expression(&mut Evaluator)?;
        Ok((lower, upper, column))
    }

    fn expression<R: Reduce>(&mut self, reducer: &mut R) -> Result<R::Output, MathError> {
        self.bit_or(reducer)
    }

    fn bit_or<R: Reduce>(&mut self, reducer: &mut R) -> Result<R::Output, MathError> {
        let mut value = self.bit_xor(reducer)?;

        while self.check(&TokenType::Pipe) {
            let column = self.advance().column;
            let right = self.bit_xor(reducer)?;
            value = reducer.binary(BinaryOp::BitOr, value, right, column)?;
        }

        Ok(value)
    }

    fn bit_xor<R: Reduce>(&mut self, reducer: &mut R) -> Result<R::Output, MathError> {
        let mut value = self.bit_and(reducer)?;

        while self.check(&TokenType::Caret) {
            let column = self.advance().column;
            let right = self.bit_and(reducer)?;
            value = reducer.binary(BinaryOp::BitXor, value, right, column)?;
        }

        Ok(value)
    }

    fn bit_and<R: Reduce>(&mut self, reducer: &mut R) -> Result<R::Output, MathError> {
        let mut value = self.shift(reducer)?;

        while self.check(&TokenType::Ampersand) {
            let column = self.advance().column;
            let right = self.shift(reducer)?;
            value = reducer.binary(BinaryOp::BitAnd, value, right, column)?;
        }

        Ok(value)
    }

    fn shift<R: Reduce>(&mut self, reducer: &mut R) -> Result<R::Output, MathError> {
        let mut value = self.arith(reducer)?;

        while let Some((operator, column)) = self.match_operator(&[
            (TokenType::LessLess, BinaryOp::ShiftLeft),
            (TokenType::GreaterGreater, BinaryOp::ShiftRight),
        ]) {
            let right = self.arith(reducer)?;
            value = reducer.binary(operator, value, right, column)?;
        }

        Ok(value)
    }

    fn arith<R: Reduce>(&mut self, reducer: &mut R) -> Result<R::Output, MathError> {
        let negative = if self.check(&TokenType::Plus) {
            self.advance();
            false
        } else if self.check(&TokenType::Minus) {
            self.advance();
            true
        } else {
            false
        };

        let mut value = self.term(reducer)?;
        if negative {
            value = reducer.negate(value);
        }

        while let Some((operator, column)) = self.match_operator(&[
            (TokenType::Plus, BinaryOp::Add),
            (TokenType::Minus, BinaryOp::Subtract),
        ]) {
            let right = self.term(reducer)?;
            value = reducer.binary(operator, value, right, column)?;
        }

        Ok(value)
    }

    fn term<R: Reduce>(&mut self, reducer: &mut R) -> Result<R::Output, MathError> {
        let mut value = self.exponent(reducer)?;

        while let Some((operator, column)) = self.match_operator(&[
            (TokenType::Star, BinaryOp::Multiply),
            (TokenType::Slash, BinaryOp::Divide),
            (TokenType::Percent, BinaryOp::Modulo),
        ]) {
            let right = self.exponent(reducer)?;
            value = reducer.binary(operator, value, right, column)?;
        }

        Ok(value)
    }

    /// A single optional `**`; chains are left for the caller to reject.
    fn exponent<R: Reduce>(&mut self, reducer: &mut R) -> Result<R::Output, MathError> {
        let value = self.factor(reducer)?;

        if self.check(&TokenType::StarStar) {
            let column = self.advance().column;
            let power = self.factor(reducer)?;
            return reducer.binary(BinaryOp::Power, value, power, column);
        }

        Ok(value)
    }

    fn factor<R: Reduce>(&mut self, reducer: &mut R) -> Result<R::Output, MathError> {
        let token = self.peek().clone();
        trace!(column = token.column, "parsing factor at {}", token.token_type);

        match token.token_type {
            TokenType::LeftParen => {
                self.advance();
                if self.depth == MAX_NESTING_DEPTH {
                    return Err(MathError::new_with_help(
                        ErrorKind::NestingTooDeep,
                        token.column,
                        format!("At most {} parentheses may be open at once.", MAX_NESTING_DEPTH),
                    ));
                }
                self.depth += 1;
                let value = self.expression(reducer);
                self.depth -= 1;
                let value = value?;
                if !self.check(&TokenType::RightParen) {
                    return Err(MathError::unmatched(Paren::Close, token.column));
                }
                self.advance();
                Ok(value)
            }
            TokenType::RightParen => {
                // `()` is an empty group worth 0; the caller consumes the `)`.
                if self.current > 0 && self.previous().token_type == TokenType::LeftParen {
                    Ok(reducer.number(0))
                } else {
                    Err(MathError::unmatched(Paren::Open, token.column))
                }
            }
            TokenType::Identifier(name) => {
                self.advance();
                reducer.variable(self.identifiers, &name, token.column)
            }
            _ => {
                let mut negative = false;
                loop {
                    if self.check(&TokenType::Minus) {
                        self.advance();
                        negative = !negative;
                    } else if self.check(&TokenType::Plus) {
                        self.advance();
                    } else {
                        break;
                    }
                }

                let found = self.peek().clone();
                match found.token_type {
                    TokenType::Number(value) => {
                        self.advance();
                        Ok(reducer.number(if negative { value.wrapping_neg() } else { value }))
                    }
                    other => Err(MathError::mismatch("Number", other.name(), found.column)),
                }
            }
        }
    }

    fn lvalue(&mut self) -> Result<String, MathError> {
        let token = self.peek().clone();
        match token.token_type {
            TokenType::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(MathError::mismatch("Identifier", other.name(), token.column)),
        }
    }

    fn match_operator(
        &mut self,
        operators: &[(TokenType, BinaryOp)],
    ) -> Option<(BinaryOp, usize)> {
        for (token_type, operator) in operators {
            if self.check(token_type) {
                let column = self.advance().column;
                return Some((*operator, column));
            }
        }
        None
    }

    fn consume(&mut self, expected: TokenType) -> Result<&Token, MathError> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            let found = self.peek();
            Err(MathError::mismatch(expected.name(), found.token_type.name(), found.column))
        }
    }

    /// Compares terminal kinds only; payloads such as a number's value are ignored.
    fn check(&self, token_type: &TokenType) -> bool {
        mem::discriminant(&self.peek().token_type) == mem::discriminant(token_type)
    }

    fn peek_next_is(&self, token_type: &TokenType) -> bool {
        self.tokens
            .get(self.current + 1)
            .map_or(false, |token| {
                mem::discriminant(&token.token_type) == mem::discriminant(token_type)
            })
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }
}
