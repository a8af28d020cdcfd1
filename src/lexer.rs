use std::collections::HashMap;
use std::fmt;

/// Longest identifier, in characters. A longer alphabetic run is split.
pub const MAX_IDENT_LEN: usize = 50;
/// Most digits accumulated into a single literal.
pub const MAX_LITERAL_LEN: usize = 1023;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenType {
    Eof,
    Number(i64),
    Percent,
    Star,
    Slash,
    StarStar,
    LeftParen,
    RightParen,
    Plus,
    Minus,
    Caret,
    Pipe,
    Ampersand,
    LessLess,
    GreaterGreater,
    DotDotDot,

    // Keywords
    Sum,
    Over,
    In,
    Help,

    Identifier(String),
    Equal,
    Illegal(char),
}

impl TokenType {
    /// Terminal name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::Eof => "EOF",
            TokenType::Number(_) => "Number",
            TokenType::Percent => "Modulus",
            TokenType::Star => "Multiply",
            TokenType::Slash => "Divide",
            TokenType::StarStar => "Exponentiate",
            TokenType::LeftParen => "LParen",
            TokenType::RightParen => "RParen",
            TokenType::Plus => "Plus",
            TokenType::Minus => "Minus",
            TokenType::Caret => "Xor",
            TokenType::Pipe => "Or",
            TokenType::Ampersand => "And",
            TokenType::LessLess => "LShift",
            TokenType::GreaterGreater => "RShift",
            TokenType::DotDotDot => "Range",
            TokenType::Sum => "Sum",
            TokenType::Over => "Over",
            TokenType::In => "In",
            TokenType::Help => "Help",
            TokenType::Identifier(_) => "Identifier",
            TokenType::Equal => "Assignment",
            TokenType::Illegal(_) => "Illegal",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    /// 1-based column of the token's first character.
    pub column: usize,
}

impl Token {
    pub fn new(token_type: TokenType, column: usize) -> Self {
        Self { token_type, column }
    }
}

/// Lazily turns one input line into tokens.
///
/// Yields exactly one `Eof` token as its last item. An `Illegal` token is
/// yielded like any other; stopping at it is the caller's decision.
pub struct Lexer {
    source: Vec<char>,
    current: usize,
    finished: bool,
    keywords: HashMap<&'static str, TokenType>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        let mut keywords = HashMap::new();
        keywords.insert("sum", TokenType::Sum);
        keywords.insert("over", TokenType::Over);
        keywords.insert("in", TokenType::In);
        keywords.insert("help", TokenType::Help);

        Self {
            source: source.chars().collect(),
            current: 0,
            finished: false,
            keywords,
        }
    }

    fn scan_token(&mut self) -> Token {
        // Space is the only whitespace; tabs fall through to Illegal.
        while self.peek() == Some(' ') {
            self.current += 1;
        }

        let column = self.current + 1;
        let c = match self.advance() {
            Some(c) => c,
            None => {
                self.finished = true;
                return Token::new(TokenType::Eof, column);
            }
        };

        let token_type = match c {
            '/' => TokenType::Slash,
            '%' => TokenType::Percent,
            '+' => TokenType::Plus,
            '-' => TokenType::Minus,
            '(' => TokenType::LeftParen,
            ')' => TokenType::RightParen,
            '^' => TokenType::Caret,
            '&' => TokenType::Ampersand,
            '|' => TokenType::Pipe,
            '=' => TokenType::Equal,
            '*' => {
                if self.match_char('*') {
                    TokenType::StarStar
                } else {
                    TokenType::Star
                }
            }
            '<' => {
                if self.match_char('<') {
                    TokenType::LessLess
                } else {
                    TokenType::Illegal(c)
                }
            }
            '>' => {
                if self.match_char('>') {
                    TokenType::GreaterGreater
                } else {
                    TokenType::Illegal(c)
                }
            }
            '.' => {
                if self.match_char('.') && self.match_char('.') {
                    TokenType::DotDotDot
                } else {
                    TokenType::Illegal(c)
                }
            }
            c if c.is_ascii_digit() => self.number(c),
            c if c.is_ascii_alphabetic() => self.identifier(c),
            _ => TokenType::Illegal(c),
        };

        Token::new(token_type, column)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += 1;
        Some(c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }

    fn number(&mut self, first: char) -> TokenType {
        let radix = if first != '0' {
            10
        } else if self.match_char('b') {
            2
        } else if self.match_char('x') || self.match_char('X') {
            16
        } else {
            10
        };

        let mut digits = String::new();
        if radix == 10 {
            digits.push(first);
        }

        while let Some(c) = self.peek() {
            let legal = if radix == 16 {
                c.is_ascii_hexdigit()
            } else {
                c.is_ascii_digit()
            };
            if !legal || digits.len() >= MAX_LITERAL_LEN {
                break;
            }
            digits.push(c);
            self.current += 1;
        }

        TokenType::Number(decode_literal(&digits, radix))
    }

    fn identifier(&mut self, first: char) -> TokenType {
        let mut name = String::from(first);
        while let Some(c) = self.peek() {
            if !c.is_ascii_alphabetic() || name.len() >= MAX_IDENT_LEN {
                break;
            }
            name.push(c);
            self.current += 1;
        }

        self.keywords
            .get(name.as_str())
            .cloned()
            .unwrap_or(TokenType::Identifier(name))
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            None
        } else {
            Some(self.scan_token())
        }
    }
}

/// Decodes digits up to the first one not valid in `radix`, wrapping on overflow.
fn decode_literal(digits: &str, radix: u32) -> i64 {
    digits
        .chars()
        .map_while(|c| c.to_digit(radix))
        .fold(0i64, |acc, digit| {
            acc.wrapping_mul(radix as i64).wrapping_add(digit as i64)
        })
}
