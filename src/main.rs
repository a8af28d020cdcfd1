use bashmath::runner::{self, ReportStyle};
use bashmath::{repl, Session, MAX_INPUT_LEN};
use clap::{value_parser, Arg, ArgAction, Command};
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let matches = Command::new("bashmath")
        .about("Evaluates integer expressions one line at a time")
        .arg(
            Arg::new("file")
                .help("Evaluate every line of FILE in one session")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("expr")
                .short('e')
                .long("expr")
                .help("Evaluate EXPR; repeat to evaluate several in one session")
                .value_name("EXPR")
                .allow_hyphen_values(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("fancy")
                .long("fancy")
                .help("Show coloured diagnostics with hints")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("max-input")
                .long("max-input")
                .help("Buffer size; input lines must be shorter than this")
                .value_name("N")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log pipeline details to stderr (-v debug, -vv trace)")
                .action(ArgAction::Count),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"));

    let style = if matches.get_flag("fancy") {
        ReportStyle::Fancy
    } else {
        ReportStyle::Plain
    };
    let max_input = matches
        .get_one::<usize>("max-input")
        .copied()
        .unwrap_or(MAX_INPUT_LEN);
    let mut session = Session::with_max_input(max_input);

    let batch = if let Some(mut exprs) = matches.get_many::<String>("expr") {
        Some(exprs.try_fold(true, |all_ok, expr| {
            runner::run(&mut session, expr, style, None).map(|ok| all_ok && ok)
        }))
    } else {
        matches
            .get_one::<String>("file")
            .map(|file_path| run_file(&mut session, file_path, style))
    };

    let result = match batch {
        None => repl::start(&mut session, style).map(|_| true),
        Some(Ok(all_ok)) if matches.get_flag("interactive") => {
            repl::start(&mut session, style).map(|_| all_ok)
        }
        Some(other) => other,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::FAILURE
        }
    }
}

fn run_file(session: &mut Session, path: &str, style: ReportStyle) -> std::io::Result<bool> {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        return Ok(false);
    }

    let source = fs::read_to_string(path)?;
    let filename = path.display().to_string();
    runner::run_lines(session, &source, style, Some(&filename))
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
