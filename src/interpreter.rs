use crate::builtin::BuiltinTable;
use crate::command::{Continuation, Streams};
use crate::config::Config;
use crate::external;
use crate::lexer::{self, ArgVector};
use crate::reader::LineSource;
use log::{debug, info};

/// A minimal shell-like interpreter that can execute built-in and external commands.
///
/// The interpreter owns an immutable [`BuiltinTable`] that is consulted before
/// falling back to launching an external program.
///
/// Example
/// ```
/// use myshell::{Continuation, Interpreter};
/// use myshell::command::Streams;
/// use myshell::lexer::ArgVector;
///
/// let sh = Interpreter::default();
/// let (mut out, mut err) = (Vec::new(), Vec::new());
/// let mut io = Streams::new(&mut out, &mut err);
/// let args: ArgVector = ["exit"].into_iter().collect();
/// assert_eq!(sh.exec(&args, &mut io), Continuation::Terminate);
/// ```
pub struct Interpreter {
    config: Config,
    builtins: BuiltinTable,
}

impl Interpreter {
    /// Create a new interpreter with a custom builtin table.
    pub fn new(config: Config, builtins: BuiltinTable) -> Self {
        Self { config, builtins }
    }

    /// Execute one argument vector.
    ///
    /// A blank line is a no-op. A builtin's result is returned verbatim;
    /// anything else is launched as an external program.
    pub fn exec(&self, args: &ArgVector, io: &mut Streams<'_>) -> Continuation {
        let Some(name) = args.command() else {
            return Continuation::Continue;
        };
        match self.builtins.resolve(args) {
            Some(cmd) => {
                debug!("running builtin {name}");
                cmd.execute(io, &self.builtins).unwrap_or_else(|e| {
                    io.report(e);
                    Continuation::Continue
                })
            }
            None => {
                debug!("launching external command {name}");
                external::launch(args, io)
            }
        }
    }

    /// Read-eval loop: runs until `exit` or the end of input.
    pub fn repl(&self, source: &mut dyn LineSource, io: &mut Streams<'_>) -> anyhow::Result<()> {
        loop {
            let Some(line) = source.next_line(&self.config.prompt, &mut *io.stdout)? else {
                info!("end of input");
                break;
            };
            let args = lexer::parse_line(line);
            if self.exec(&args, io) == Continuation::Terminate {
                break;
            }
        }
        io.flush();
        Ok(())
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default configuration and builtins `cd`, `help`, `exit`.
    fn default() -> Self {
        Self::new(Config::default(), BuiltinTable::standard())
    }
}
