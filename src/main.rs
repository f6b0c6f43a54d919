use myshell::command::Streams;
use myshell::config::{Config, Options};
use myshell::reader::{EditorSource, LineReader, LineSource};
use myshell::{BuiltinTable, Interpreter, logging};
use std::io::{self, IsTerminal};

fn main() -> anyhow::Result<()> {
    let config = Config::from(argh::from_env::<Options>());
    logging::init(&config)?;

    let mut source: Box<dyn LineSource> = if config.use_editor && io::stdin().is_terminal() {
        Box::new(EditorSource::new()?)
    } else {
        Box::new(LineReader::new(io::stdin().lock()))
    };

    let interpreter = Interpreter::new(config, BuiltinTable::standard());
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    interpreter.repl(source.as_mut(), &mut Streams::new(&mut stdout, &mut stderr))
}
