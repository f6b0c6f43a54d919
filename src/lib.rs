//! A tiny interactive command interpreter.
//!
//! Each iteration reads one line, splits it on whitespace and either runs a
//! built-in command in-process or forks and executes an external program,
//! blocking until it finishes. The loop ends on the `exit` built-in or at the
//! end of input.
//!
//! The main entry point is [`Interpreter`]. The public modules [`reader`],
//! [`lexer`] and [`command`] expose the line reader, the tokenizer and the
//! traits commands are built on.

mod builtin;
pub mod command;
pub mod config;
pub mod error;
pub mod external;
mod interpreter;
pub mod lexer;
pub mod logging;
pub mod reader;

/// Name used as the prefix of every diagnostic written to standard error.
pub const SHELL_NAME: &str = "myshell";

pub use builtin::BuiltinTable;
pub use command::Continuation;
pub use interpreter::Interpreter;
