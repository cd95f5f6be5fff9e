use std::io::{self, BufRead, Write};

use pgedge_core::builder::Prompter;
use pgedge_core::{PgEdgeError, PgEdgeResult};

/// Line-oriented prompter over any reader/writer pair (stdin/stdout in the
/// CLI, in-memory buffers in tests).
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, question: &str, default: &str) -> PgEdgeResult<String> {
        if default.is_empty() {
            write!(self.output, "{question}: ").map_err(PgEdgeError::Prompt)?;
        } else {
            write!(self.output, "{question} (default: {default}): ").map_err(PgEdgeError::Prompt)?;
        }
        self.output.flush().map_err(PgEdgeError::Prompt)?;

        let mut line = String::new();
        let n = self.input.read_line(&mut line).map_err(PgEdgeError::Prompt)?;
        if n == 0 {
            return Err(PgEdgeError::Prompt(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("input ended while waiting for: {question}"),
            )));
        }

        let answer = line.trim();
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer.to_string()
        })
    }

    fn say(&mut self, line: &str) -> PgEdgeResult<()> {
        writeln!(self.output, "{line}").map_err(PgEdgeError::Prompt)
    }
}
