use argh::FromArgs;
use log::LevelFilter;
use std::path::PathBuf;

pub const DEFAULT_PROMPT: &str = "> ";

#[derive(FromArgs, Debug)]
/// a minimal interactive command interpreter.
pub struct Options {
    #[argh(option, default = "String::from(DEFAULT_PROMPT)")]
    /// text written before each line is read.
    pub prompt: String,

    #[argh(switch)]
    /// read raw lines even when standard input is a terminal.
    pub no_editor: bool,

    #[argh(option, default = "LevelFilter::Off")]
    /// diagnostic log level: off, error, warn, info, debug or trace.
    pub log_level: LevelFilter,

    #[argh(option)]
    /// write log records to this file instead of standard error.
    pub log_file: Option<PathBuf>,
}

/// Runtime settings of the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    pub use_editor: bool,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            use_editor: true,
            log_level: LevelFilter::Off,
            log_file: None,
        }
    }
}

impl From<Options> for Config {
    fn from(opts: Options) -> Self {
        Self {
            prompt: opts.prompt,
            use_editor: !opts.no_editor,
            log_level: opts.log_level,
            log_file: opts.log_file,
        }
    }
}
