use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;
use std::io::{self, Write};
use thiserror::Error;

/// Which half of a parenthesis pair has no partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paren {
    Open,
    Close,
}

impl fmt::Display for Paren {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Paren::Open => write!(f, "LParen '(' to open"),
            Paren::Close => write!(f, "RParen ')' to close"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("Syntax error")]
    LexicalIllegalChar(char),
    #[error("Input too long")]
    InputTooLong,
    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("Expected {expected} but encountered {found}")]
    SyntaxMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("Missing {0}")]
    UnmatchedParen(Paren),
    #[error("Division by 0 error")]
    DivisionByZero,
    #[error("Modulus by 0 error")]
    ModulusByZero,
    #[error("Unassigned Identifier '{0}'")]
    UnassignedIdentifierUse(String),
    #[error("First in unknown sequence")]
    TrailingTokens,
    #[error("Parentheses nested too deeply")]
    NestingTooDeep,
    #[error("Summation range too large")]
    RangeTooLarge,
}

impl ErrorKind {
    fn title_and_color(&self) -> (&'static str, Color) {
        match self {
            ErrorKind::LexicalIllegalChar(_) | ErrorKind::InputTooLong => {
                ("Lexical Error", Color::Red)
            }
            ErrorKind::DivisionByZero
            | ErrorKind::ModulusByZero
            | ErrorKind::UnassignedIdentifierUse(_)
            | ErrorKind::RangeTooLarge => ("Runtime Error", Color::Magenta),
            _ => ("Parse Error", Color::Yellow),
        }
    }
}

/// A single diagnostic, anchored at a 1-based column of the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathError {
    pub kind: ErrorKind,
    pub column: usize,
    pub help: Option<String>,
}

impl MathError {
    pub fn new(kind: ErrorKind, column: usize) -> Self {
        Self {
            kind,
            column,
            help: None,
        }
    }

    pub fn new_with_help(kind: ErrorKind, column: usize, help: String) -> Self {
        Self {
            kind,
            column,
            help: Some(help),
        }
    }

    pub fn illegal_char(c: char, column: usize) -> Self {
        Self::new_with_help(
            ErrorKind::LexicalIllegalChar(c),
            column,
            format!("'{}' is not part of any operator, number or identifier.", c.escape_default()),
        )
    }

    pub fn mismatch(expected: &'static str, found: &'static str, column: usize) -> Self {
        Self::new(ErrorKind::SyntaxMismatch { expected, found }, column)
    }

    pub fn unmatched(missing: Paren, partner_column: usize) -> Self {
        let help = match missing {
            Paren::Open => "This ')' closes a group that was never opened.",
            Paren::Close => "This '(' is never closed. Add a matching ')'.",
        };
        Self::new_with_help(ErrorKind::UnmatchedParen(missing), partner_column, help.to_string())
    }

    pub fn unassigned(name: &str, column: usize) -> Self {
        Self::new_with_help(
            ErrorKind::UnassignedIdentifierUse(name.to_string()),
            column,
            format!("Assign a value first, for example: {} = 1", name),
        )
    }

    /// Echo the line, then a caret under the offending column followed by the message.
    pub fn render(&self, line: &str) -> String {
        let padding = " ".repeat(self.column.saturating_sub(1));
        format!("{}\n{}^ Error: {}", line, padding, self.kind)
    }

    pub fn report(&self, line: &str, name: Option<&str>) -> io::Result<()> {
        self.write_report(line, name, io::stderr())
    }

    /// Writes the ariadne report for `line` to `writer`.
    pub fn write_report<W: Write>(
        &self,
        line: &str,
        name: Option<&str>,
        writer: W,
    ) -> io::Result<()> {
        let name = name.unwrap_or("<expr>");
        let (title, color) = self.kind.title_and_color();
        let message = self.kind.to_string();

        // ariadne counts in characters. The trailing space gives the EOF column,
        // one past the end, a character to underline, even on an empty line.
        let source = format!("{} ", line);
        let length = line.chars().count();
        let start = self.column.saturating_sub(1).min(length);

        let mut report_builder = Report::build(ReportKind::Error, name, start)
            .with_message(format!("{}: {}", title.fg(color), message))
            .with_label(
                Label::new((name, start..start + 1))
                    .with_message(&message)
                    .with_color(color),
            );

        if let Some(ref help_text) = self.help {
            report_builder =
                report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        report_builder
            .finish()
            .write((name, Source::from(source)), writer)
    }
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "column {}: {}", self.column, self.kind)
    }
}

impl std::error::Error for MathError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_lines_up_with_column() {
        let error = MathError::new(ErrorKind::TrailingTokens, 5);
        assert_eq!(error.render("1+1 2"), "1+1 2\n    ^ Error: First in unknown sequence");
    }

    #[test]
    fn paren_messages_depend_on_side() {
        assert_eq!(
            ErrorKind::UnmatchedParen(Paren::Open).to_string(),
            "Missing LParen '(' to open"
        );
        assert_eq!(
            ErrorKind::UnmatchedParen(Paren::Close).to_string(),
            "Missing RParen ')' to close"
        );
    }

    fn fancy(error: &MathError, line: &str) -> String {
        let mut buffer = Vec::new();
        error
            .write_report(line, Some("test"), &mut buffer)
            .expect("report writes to a Vec");
        String::from_utf8(buffer).expect("report is UTF-8")
    }

    #[test]
    fn fancy_report_on_empty_line() {
        let error = MathError::new(ErrorKind::UnexpectedEndOfInput, 1);
        assert!(fancy(&error, "").contains("Unexpected end of input"));
    }

    #[test]
    fn fancy_report_at_end_of_line() {
        let error = MathError::mismatch("Number", "EOF", 4);
        assert!(fancy(&error, "1 +").contains("Expected Number but encountered EOF"));
    }

    #[test]
    fn fancy_report_clamps_columns_past_the_line() {
        let line = "1".repeat(20);
        let error = MathError::new(ErrorKind::InputTooLong, 1023);
        assert!(fancy(&error, &line).contains("Input too long"));
    }

    #[test]
    fn fancy_report_includes_help() {
        let error = MathError::unassigned("x", 1);
        assert!(fancy(&error, "x").contains("Assign a value first, for example: x = 1"));
    }
}
