use crate::config::Config;
use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode, WriteLogger};
use std::fs::OpenOptions;

/// Install the global logger described by `config`.
///
/// Nothing is installed at `LevelFilter::Off`, so standard error only ever
/// carries the interpreter's own diagnostics.
pub fn init(config: &Config) -> Result<()> {
    if config.log_level == LevelFilter::Off {
        return Ok(());
    }
    let log_config = simplelog::Config::default();
    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("can't open log file {}", path.display()))?;
            WriteLogger::init(config.log_level, log_config, file)?;
        }
        None => TermLogger::init(
            config.log_level,
            log_config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )?,
    }
    Ok(())
}
