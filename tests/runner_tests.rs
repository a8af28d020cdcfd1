// Output tests: what a line prints, where it goes, and the exit status of the binary.

use bashmath::help::HELP_TEXT;
use bashmath::runner::{run_lines_to, run_to, ReportStyle};
use bashmath::Session;
use std::fs;
use std::process::{Command, Output};

struct Captured {
    ok: bool,
    out: String,
    err: String,
}

fn run_line(session: &mut Session, line: &str, style: ReportStyle) -> Captured {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let ok = run_to(session, line, style, Some("test"), &mut out, &mut err)
        .expect("writing to a Vec cannot fail");
    Captured {
        ok,
        out: String::from_utf8(out).expect("stdout is UTF-8"),
        err: String::from_utf8(err).expect("stderr is UTF-8"),
    }
}

fn run_source(source: &str) -> Captured {
    let mut session = Session::new();
    let mut out = Vec::new();
    let mut err = Vec::new();
    let ok = run_lines_to(&mut session, source, ReportStyle::Plain, None, &mut out, &mut err)
        .expect("writing to a Vec cannot fail");
    Captured {
        ok,
        out: String::from_utf8(out).expect("stdout is UTF-8"),
        err: String::from_utf8(err).expect("stderr is UTF-8"),
    }
}

#[test]
fn values_go_to_stdout() {
    let mut session = Session::new();
    let result = run_line(&mut session, "6 * 7", ReportStyle::Plain);
    assert!(result.ok);
    assert_eq!(result.out, "42\n");
    assert!(result.err.is_empty());
}

#[test]
fn diagnostics_go_to_stderr() {
    let mut session = Session::new();
    let result = run_line(&mut session, "5/0", ReportStyle::Plain);
    assert!(!result.ok);
    assert!(result.out.is_empty());
    assert_eq!(result.err, "5/0\n ^ Error: Division by 0 error\n");
}

#[test]
fn help_prints_the_grammar() {
    let mut session = Session::new();
    let result = run_line(&mut session, "help", ReportStyle::Plain);
    assert!(result.ok);
    assert_eq!(result.out, format!("{}\n", HELP_TEXT));
}

#[test]
fn fancy_style_survives_edge_columns() {
    let mut session = Session::new();

    let result = run_line(&mut session, "", ReportStyle::Fancy);
    assert!(!result.ok);
    assert!(result.err.contains("Unexpected end of input"));

    let result = run_line(&mut session, "1 +", ReportStyle::Fancy);
    assert!(!result.ok);
    assert!(result.err.contains("Expected Number but encountered EOF"));

    let too_long = "1".repeat(1100);
    let result = run_line(&mut session, &too_long, ReportStyle::Fancy);
    assert!(!result.ok);
    assert!(result.err.contains("Input too long"));
    assert!(result.out.is_empty());
}

#[test]
fn lines_share_a_session_and_skip_blanks() {
    let result = run_source("x = 2\r\n\n   \nx * 10\r\n");
    assert!(result.ok);
    assert_eq!(result.out, "2\n20\n");
    assert!(result.err.is_empty());
}

#[test]
fn one_failing_line_fails_the_batch() {
    let result = run_source("1 + 1\n1 $ 2\n3 * 3\n");
    assert!(!result.ok);
    assert_eq!(result.out, "2\n9\n");
    assert_eq!(result.err, "1 $ 2\n  ^ Error: Syntax error\n");
}

// ============================================================================
// Binary
// ============================================================================

fn bashmath(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bashmath"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run bashmath binary")
}

#[test]
fn binary_evaluates_expressions_in_one_session() {
    let output = bashmath(&["-e", "x = 4", "-e", "-x * 2"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "4\n-8\n");
    assert!(output.stderr.is_empty());
}

#[test]
fn binary_exits_with_failure_on_error() {
    let output = bashmath(&["-e", "1/0", "-e", "2"]);
    assert!(!output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "2\n");
    assert_eq!(
        String::from_utf8_lossy(&output.stderr),
        "1/0\n ^ Error: Division by 0 error\n"
    );
}

#[test]
fn binary_runs_files() {
    let path = std::env::temp_dir().join(format!("bashmath-{}.txt", std::process::id()));
    fs::write(&path, "a = 3\n\nsum i over 1...a in i\n").expect("write source file");

    let output = bashmath(&[path.to_str().expect("temp path is UTF-8")]);
    fs::remove_file(&path).expect("remove source file");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "3\n6\n");
}

#[test]
fn binary_reports_missing_files() {
    let output = bashmath(&["/nonexistent/bashmath-input.txt"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}
