//! Line acquisition: the byte-stream [`LineReader`] and the terminal [`EditorSource`].

use crate::SHELL_NAME;
use anyhow::Result;
use log::debug;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::collections::TryReserveError;
use std::io::{self, BufRead, ErrorKind, Read, Write};

/// Initial capacity of a line buffer, and the fixed amount it grows by.
pub const LINE_BUFFER_STEP: usize = 1024;

/// Reports an allocation failure and terminates the process.
///
/// Input buffers are a few kilobytes at most, there is nothing sensible left
/// to do once they cannot be allocated.
pub(crate) fn allocation_failure(err: TryReserveError) -> ! {
    let _ = writeln!(io::stderr(), "{SHELL_NAME}: allocation error");
    log::error!("allocation failure: {err}");
    std::process::exit(1)
}

/// One line of raw input, without its trailing newline.
///
/// Capacity is always strictly greater than the length and grows in
/// [`LINE_BUFFER_STEP`] increments.
#[derive(Debug)]
pub struct InputLine {
    buf: Vec<u8>,
}

impl InputLine {
    pub fn new() -> Self {
        let mut buf = Vec::new();
        if let Err(e) = buf.try_reserve_exact(LINE_BUFFER_STEP) {
            allocation_failure(e);
        }
        Self { buf }
    }

    pub fn push(&mut self, byte: u8) {
        self.buf.push(byte);
        if self.buf.len() == self.buf.capacity() {
            if let Err(e) = self.buf.try_reserve_exact(LINE_BUFFER_STEP) {
                allocation_failure(e);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

impl Default for InputLine {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for InputLine {
    fn from(s: &str) -> Self {
        let mut line = InputLine::new();
        for &b in s.as_bytes() {
            line.push(b);
        }
        line
    }
}

/// Anything the main loop can pull lines from.
pub trait LineSource {
    /// Returns the next line, or `None` once the input is exhausted.
    ///
    /// `prompt` is shown before reading; sources that render their own prompt
    /// ignore `stdout`.
    fn next_line(&mut self, prompt: &str, stdout: &mut dyn Write) -> Result<Option<InputLine>>;
}

/// Reads lines one byte at a time from an already buffered reader, such as
/// a locked standard input.
pub struct LineReader<R> {
    inner: R,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read bytes until a newline or the end of the stream.
    ///
    /// The newline is discarded. A final line without a newline is still
    /// returned; the end of the stream with nothing accumulated yields `None`.
    pub fn read_line(&mut self) -> io::Result<Option<InputLine>> {
        let mut line = InputLine::new();
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) if line.is_empty() => return Ok(None),
                Ok(0) => return Ok(Some(line)),
                Ok(_) if byte[0] == b'\n' => return Ok(Some(line)),
                Ok(_) => line.push(byte[0]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: BufRead> LineSource for LineReader<R> {
    fn next_line(&mut self, prompt: &str, stdout: &mut dyn Write) -> Result<Option<InputLine>> {
        write!(stdout, "{prompt}")?;
        stdout.flush()?;
        Ok(self.read_line()?)
    }
}

/// Interactive source backed by a rustyline editor with in-memory history.
pub struct EditorSource {
    editor: DefaultEditor,
}

impl EditorSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for EditorSource {
    fn next_line(&mut self, prompt: &str, _stdout: &mut dyn Write) -> Result<Option<InputLine>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(InputLine::from(line.as_str())))
            }
            // Ctrl-C discards the current line
            Err(ReadlineError::Interrupted) => {
                debug!("line interrupted");
                Ok(Some(InputLine::new()))
            }
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
