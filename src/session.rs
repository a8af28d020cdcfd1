use crate::error::{ErrorKind, MathError};
use crate::identifiers::IdentifierTable;
use crate::lexer::{Lexer, Token, TokenType};
use crate::parser::Parser;
use tracing::debug;

/// Buffer size; an input line must be strictly shorter.
pub const MAX_INPUT_LEN: usize = 1023;

/// Result of a successful evaluation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Value(i64),
    Help,
}

/// Long-lived evaluation context.
///
/// Only the identifier table survives from one `evaluate` call to the next;
/// the tokens and parser of a call are dropped when it returns.
#[derive(Debug)]
pub struct Session {
    identifiers: IdentifierTable,
    max_input_len: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::with_max_input(MAX_INPUT_LEN)
    }

    pub fn with_max_input(max_input_len: usize) -> Self {
        Self {
            identifiers: IdentifierTable::new(),
            max_input_len,
        }
    }

    pub fn identifiers(&self) -> &IdentifierTable {
        &self.identifiers
    }

    pub fn evaluate(&mut self, line: &str) -> Result<Outcome, MathError> {
        if line.len() >= self.max_input_len {
            return Err(MathError::new_with_help(
                ErrorKind::InputTooLong,
                self.max_input_len,
                format!("Expressions must be shorter than {} characters.", self.max_input_len),
            ));
        }

        let tokens = self.tokenize(line)?;
        debug!(
            tokens = tokens.len(),
            identifiers = self.identifiers.len(),
            "token stream generated"
        );

        match tokens[0].token_type {
            TokenType::Eof => {
                return Err(MathError::new(ErrorKind::UnexpectedEndOfInput, tokens[0].column))
            }
            TokenType::Help => {
                let next = &tokens[1];
                return if next.token_type == TokenType::Eof {
                    Ok(Outcome::Help)
                } else {
                    Err(MathError::new(ErrorKind::TrailingTokens, next.column))
                };
            }
            _ => {}
        }

        let mut parser = Parser::new(tokens, &mut self.identifiers);
        parser.parse().map(Outcome::Value)
    }

    /// Scans the whole line before any parsing, registering identifiers as they
    /// appear. Stops at the first illegal character.
    fn tokenize(&mut self, line: &str) -> Result<Vec<Token>, MathError> {
        let mut tokens = Vec::new();

        for token in Lexer::new(line) {
            match &token.token_type {
                TokenType::Illegal(c) => return Err(MathError::illegal_char(*c, token.column)),
                TokenType::Identifier(name) => self.identifiers.declare(name, token.column),
                _ => {}
            }
            tokens.push(token);
        }

        Ok(tokens)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
