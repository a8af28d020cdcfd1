/// Printed for a line consisting of `help` alone.
pub const HELP_TEXT: &str = "\
Each line is evaluated as one integer expression, for example:
  1 + 2 * 3
  x = 0x1F
  sum i over 1...10 in i ** 2

Literals: decimal (17), hexadecimal (0x1F), binary (0b101).
Operators, lowest to highest precedence:
  |   ^   &   << >>   + -   * / %   **

Grammar:
  --------- Lowest Precedence ---------
  Block       -> Assignment | Summation | Exp
  Assignment  -> LValue '=' Exp
  Summation   -> 'sum' LValue 'over' Subrange 'in' Exp
  Subrange    -> Exp '...' Exp
  Exp         -> BitwiseOr
  BitwiseOr   -> BitwiseXor {'|' BitwiseXor}
  BitwiseXor  -> BitwiseAnd {'^' BitwiseAnd}
  BitwiseAnd  -> Bitshift {'&' Bitshift}
  Bitshift    -> Arith {('<<' | '>>') Arith}
  Arith       -> ['+' | '-'] Term {('+' | '-') Term}
  Term        -> Exponent {('*' | '/' | '%') Exponent}
  Exponent    -> Factor ['**' Factor]
  Factor      -> '(' Exp ')' | {'+' | '-'} Numeric | LValue
  Numeric     -> ['0x' | '0b'] DIGITS
  LValue      -> IDENTIFIER
  --------- Highest Precedence ---------

Variables keep their values for the rest of the session.
A summation runs at most 16777216 iterations; parentheses nest at most 100 deep.";
