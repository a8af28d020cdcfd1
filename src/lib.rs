// bashmath
//
// Evaluates one line of integer arithmetic at a time: assignments, bitwise and
// shift operators, `**`, and bounded `sum ... over ... in ...` loops, with
// caret diagnostics pointing at the offending column.

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod help;
pub mod identifiers;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod session;

// Re-export commonly used items
pub use error::{ErrorKind, MathError, Paren};
pub use identifiers::{IdentifierEntry, IdentifierTable};
pub use lexer::{Lexer, Token, TokenType};
pub use parser::{MAX_NESTING_DEPTH, MAX_SUM_ITERATIONS};
pub use runner::ReportStyle;
pub use session::{Outcome, Session, MAX_INPUT_LEN};

pub use repl::start as start_repl;
pub use runner::run;
