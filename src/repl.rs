use crate::runner::{self, ReportStyle};
use crate::session::Session;
use std::io::{self, Write};

/// Reads one expression per line from stdin until EOF, `exit` or `quit`.
/// Variables persist across lines through `session`.
pub fn start(session: &mut Session, style: ReportStyle) -> io::Result<()> {
    println!("bashmath v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'help' for the grammar, 'exit' or Ctrl+D to quit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF reached (Ctrl+D or piped input ended)
                println!();
                break;
            }
            Ok(_) => {
                let line = line.trim_end_matches(['\n', '\r']);
                if line.trim().is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    break;
                }

                runner::run(session, line, style, None)?;
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }

    Ok(())
}
