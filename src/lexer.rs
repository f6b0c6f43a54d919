//! Splitting an input line into an argument vector.

use crate::reader::{InputLine, allocation_failure};

/// Initial capacity of an argument vector, and the fixed amount it grows by.
pub const ARG_BUFFER_STEP: usize = 64;

/// Bytes that separate tokens: space, tab, carriage return, newline and bell.
pub const DELIMITERS: &[u8] = b" \t\r\n\x07";

fn is_delimiter(b: u8) -> bool {
    DELIMITERS.contains(&b)
}

/// Ordered, owned command arguments. Argument 0, if any, is the command name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgVector {
    args: Vec<String>,
}

impl ArgVector {
    pub fn new() -> Self {
        let mut args = Vec::new();
        if let Err(e) = args.try_reserve_exact(ARG_BUFFER_STEP) {
            allocation_failure(e);
        }
        Self { args }
    }

    pub fn push(&mut self, arg: String) {
        if self.args.len() == self.args.capacity() {
            if let Err(e) = self.args.try_reserve_exact(ARG_BUFFER_STEP) {
                allocation_failure(e);
            }
        }
        self.args.push(arg);
    }

    /// The command name, `None` for a blank line.
    pub fn command(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.args
    }

    /// Arguments after the command name.
    pub fn rest(&self) -> Vec<&str> {
        self.args.iter().skip(1).map(String::as_str).collect()
    }
}

impl Default for ArgVector {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Into<String>> FromIterator<S> for ArgVector {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut v = ArgVector::new();
        for arg in iter {
            v.push(arg.into());
        }
        v
    }
}

/// Split `line` on maximal runs of [`DELIMITERS`].
///
/// Each non-delimiter run becomes one token, copied out of the line. Invalid
/// UTF-8 is replaced rather than rejected.
pub fn parse_line(line: InputLine) -> ArgVector {
    let mut args = ArgVector::new();
    for token in line
        .as_bytes()
        .split(|&b| is_delimiter(b))
        .filter(|t| !t.is_empty())
    {
        args.push(String::from_utf8_lossy(token).into_owned());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<String> {
        parse_line(InputLine::from(s)).as_slice().to_vec()
    }

    #[test]
    fn empty_line_has_no_tokens() {
        assert!(parse_line(InputLine::from("")).is_empty());
    }

    #[test]
    fn all_delimiters_have_no_tokens() {
        let args = parse_line(InputLine::from(" \t\r\n\x07  \t"));
        assert!(args.is_empty());
        assert_eq!(args.command(), None);
    }

    #[test]
    fn surrounding_and_repeated_whitespace() {
        assert_eq!(tokens("  cd   /tmp  "), vec!["cd", "/tmp"]);
    }

    #[test]
    fn every_delimiter_splits() {
        assert_eq!(
            tokens("a\tb\rc\nd\x07e f"),
            vec!["a", "b", "c", "d", "e", "f"]
        );
    }

    #[test]
    fn quotes_are_not_special() {
        assert_eq!(tokens("echo \"a b\""), vec!["echo", "\"a", "b\""]);
    }

    #[test]
    fn many_tokens_grow_past_initial_capacity() {
        let line: String = (0..ARG_BUFFER_STEP * 3 + 1)
            .map(|i| format!("arg{i} "))
            .collect();
        let args = parse_line(InputLine::from(line.as_str()));
        assert_eq!(args.len(), ARG_BUFFER_STEP * 3 + 1);
        assert_eq!(args.command(), Some("arg0"));
        assert_eq!(args.as_slice().last().unwrap(), &format!("arg{}", ARG_BUFFER_STEP * 3));
    }

    #[test]
    fn rest_skips_command_name() {
        let args: ArgVector = ["cd", "/tmp", "extra"].into_iter().collect();
        assert_eq!(args.rest(), vec!["/tmp", "extra"]);
    }
}
