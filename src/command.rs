use crate::SHELL_NAME;
use crate::builtin::BuiltinTable;
use crate::lexer::ArgVector;
use anyhow::Result;
use std::fmt::Display;
use std::io::Write;

/// Result of every executed command, consumed by the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Read and execute the next line.
    Continue,
    /// Leave the loop and exit the interpreter.
    Terminate,
}

/// Output streams used by in-process commands.
///
/// External programs never write through these: they inherit the
/// interpreter's file descriptors directly.
pub struct Streams<'a> {
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

impl<'a> Streams<'a> {
    pub fn new(stdout: &'a mut dyn Write, stderr: &'a mut dyn Write) -> Self {
        Self { stdout, stderr }
    }

    /// Write a `myshell: <message>` diagnostic to the error stream.
    pub fn report(&mut self, message: impl Display) {
        let _ = writeln!(self.stderr, "{SHELL_NAME}: {message}");
    }

    /// Flush both streams, e.g. before a child process takes over the terminal.
    pub fn flush(&mut self) {
        let _ = self.stdout.flush();
        let _ = self.stderr.flush();
    }
}

/// Object-safe trait for a command ready to run in-process.
pub trait ExecutableCommand {
    /// Executes the command.
    ///
    /// `table` is the interpreter's builtin table, for commands that need to
    /// describe the shell itself.
    fn execute(
        self: Box<Self>,
        io: &mut Streams<'_>,
        table: &BuiltinTable,
    ) -> Result<Continuation>;
}

/// Factory that tries to create a command from an argument vector.
///
/// Returns `None` when the factory doesn't recognize `args[0]`.
pub trait CommandFactory {
    /// Name this factory answers to.
    fn name(&self) -> &'static str;

    /// Attempt to create a command instance for the provided arguments.
    fn try_create(&self, args: &ArgVector) -> Option<Box<dyn ExecutableCommand>>;
}
