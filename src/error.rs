use nix::errno::Errno;
use thiserror::Error;

/// Recoverable failures reported by built-ins and the process launcher.
///
/// None of these stop the interpreter: they are written to standard error as
/// `myshell: <message>` and the loop continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    /// A built-in was invoked without an argument it requires.
    #[error("expected argument to \"{0}\"")]
    MissingArgument(&'static str),

    /// A system call failed; displays the OS-provided description.
    #[error("{}", .0.desc())]
    Os(#[from] Errno),

    /// An argument cannot be passed to `execvp` because it contains a NUL byte.
    #[error("argument contains an interior NUL byte: {0:?}")]
    NulByte(String),
}

pub type ShellResult<T> = Result<T, ShellError>;
