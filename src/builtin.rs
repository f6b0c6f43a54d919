use crate::command::{CommandFactory, Continuation, ExecutableCommand, Streams};
use crate::error::ShellError;
use crate::lexer::ArgVector;
use anyhow::{Result, bail};
use argh::{EarlyExit, FromArgs};
use log::debug;
use std::collections::HashSet;
use std::io::Write;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are constructed through the [`argh`] crate's `FromArgs` and executed
/// directly in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "help" or "cd".
    fn name() -> &'static str;

    /// Executes the command using the provided output streams.
    ///
    /// Errors are reported on the error stream by the caller and never stop the loop.
    fn execute(self, io: &mut Streams<'_>, table: &BuiltinTable) -> Result<Continuation>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        io: &mut Streams<'_>,
        table: &BuiltinTable,
    ) -> Result<Continuation> {
        match <T as BuiltinCommand>::execute(*self, io, table) {
            Ok(x) => Ok(x),
            Err(e) => {
                io.report(e);
                Ok(Continuation::Continue)
            }
        }
    }
}

struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        io: &mut Streams<'_>,
        _table: &BuiltinTable,
    ) -> Result<Continuation> {
        if self.is_error {
            io.report(self.output.trim_end());
        } else {
            writeln!(io.stdout, "{}", self.output.trim_end())?;
        }
        Ok(Continuation::Continue)
    }
}

/// Creates instances of one builtin command type.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn name(&self) -> &'static str {
        T::name()
    }

    fn try_create(&self, args: &ArgVector) -> Option<Box<dyn ExecutableCommand>> {
        let name = args.command()?;
        if name != T::name() {
            return None;
        }
        Some(match T::from_args(&[name], &args.rest()) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                output,
                is_error: status.is_err(),
            }),
        })
    }
}

/// Ordered, immutable registry of built-in commands.
///
/// Lookup is a linear scan in registration order, so the first matching
/// name wins. Names are unique.
pub struct BuiltinTable {
    entries: Vec<Box<dyn CommandFactory>>,
}

impl BuiltinTable {
    /// Build a table from custom factories, rejecting duplicate names.
    pub fn new(entries: Vec<Box<dyn CommandFactory>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.name()) {
                bail!("duplicate built-in name: {}", entry.name());
            }
        }
        Ok(Self { entries })
    }

    /// The fixed set of builtins: `cd`, `help`, `exit`.
    pub fn standard() -> Self {
        Self {
            entries: vec![
                Box::new(Factory::<Cd>::default()),
                Box::new(Factory::<Help>::default()),
                Box::new(Factory::<Exit>::default()),
            ],
        }
    }

    /// Registered names in table order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name())
    }

    /// Create the builtin named by `args[0]`, if there is one.
    pub fn resolve(&self, args: &ArgVector) -> Option<Box<dyn ExecutableCommand>> {
        self.entries.iter().find_map(|f| f.try_create(args))
    }
}

impl Default for BuiltinTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Change the current working directory.
pub struct Cd {
    /// Directory to switch to; further arguments are ignored.
    pub target: Option<String>,
}

// Shell paths may start with `-`, so arguments are taken verbatim.
impl FromArgs for Cd {
    fn from_args(_command_name: &[&str], args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Cd {
            target: args.first().map(|s| s.to_string()),
        })
    }
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _io: &mut Streams<'_>, _table: &BuiltinTable) -> Result<Continuation> {
        let Some(target) = self.target else {
            return Err(ShellError::MissingArgument("cd").into());
        };
        nix::unistd::chdir(target.as_str()).map_err(ShellError::from)?;
        debug!("changed directory to {target}");
        Ok(Continuation::Continue)
    }
}

/// Describe the shell and list its built-in commands.
pub struct Help;

// Arguments are ignored; every built-in is always listed.
impl FromArgs for Help {
    fn from_args(_command_name: &[&str], _args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Help)
    }
}

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn execute(self, io: &mut Streams<'_>, table: &BuiltinTable) -> Result<Continuation> {
        writeln!(io.stdout, "{}", crate::SHELL_NAME)?;
        writeln!(io.stdout, "Type program names and arguments, and hit enter.")?;
        writeln!(io.stdout, "The following are built in:")?;
        for name in table.names() {
            writeln!(io.stdout, "  {name}")?;
        }
        writeln!(io.stdout, "Use the man command for information on other programs.")?;
        Ok(Continuation::Continue)
    }
}

/// Leave the interpreter.
pub struct Exit;

// Any argument is accepted and ignored, `--help` included.
impl FromArgs for Exit {
    fn from_args(_command_name: &[&str], _args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Exit)
    }
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _io: &mut Streams<'_>, _table: &BuiltinTable) -> Result<Continuation> {
        Ok(Continuation::Terminate)
    }
}
