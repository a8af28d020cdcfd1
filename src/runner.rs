use crate::help::HELP_TEXT;
use crate::session::{Outcome, Session};
use std::io::{self, Write};

/// How diagnostics are written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    /// The input line, then a caret under the offending column.
    #[default]
    Plain,
    /// Coloured ariadne report with a help note.
    Fancy,
}

/// Evaluates one line and prints its value, the help text, or the diagnostic.
///
/// Returns whether the line evaluated successfully.
pub fn run(
    session: &mut Session,
    line: &str,
    style: ReportStyle,
    filename: Option<&str>,
) -> io::Result<bool> {
    run_to(session, line, style, filename, &mut io::stdout(), &mut io::stderr())
}

/// Like [`run`], with values and help going to `out` and diagnostics to `err`.
pub fn run_to<O: Write, E: Write>(
    session: &mut Session,
    line: &str,
    style: ReportStyle,
    filename: Option<&str>,
    out: &mut O,
    err: &mut E,
) -> io::Result<bool> {
    match session.evaluate(line) {
        Ok(Outcome::Value(value)) => {
            writeln!(out, "{}", value)?;
            Ok(true)
        }
        Ok(Outcome::Help) => {
            writeln!(out, "{}", HELP_TEXT)?;
            Ok(true)
        }
        Err(error) => {
            match style {
                ReportStyle::Plain => writeln!(err, "{}", error.render(line))?,
                ReportStyle::Fancy => error.write_report(line, filename, &mut *err)?,
            }
            Ok(false)
        }
    }
}

/// Evaluates each non-empty line of `source` in order, in the same session.
///
/// Returns whether every line succeeded.
pub fn run_lines(
    session: &mut Session,
    source: &str,
    style: ReportStyle,
    filename: Option<&str>,
) -> io::Result<bool> {
    run_lines_to(session, source, style, filename, &mut io::stdout(), &mut io::stderr())
}

pub fn run_lines_to<O: Write, E: Write>(
    session: &mut Session,
    source: &str,
    style: ReportStyle,
    filename: Option<&str>,
    out: &mut O,
    err: &mut E,
) -> io::Result<bool> {
    let mut all_ok = true;
    for line in source.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        all_ok &= run_to(session, line, style, filename, out, err)?;
    }
    Ok(all_ok)
}
