//! Line-oriented terminal I/O used by the selection prompt and session loop.

use std::io::{BufRead, Write};

use crate::github::IntakeError;
use crate::render::MarkdownRenderer;

/// Prompts, reads operator lines and writes plain or Markdown output.
#[derive(Debug)]
pub struct Terminal<R, W> {
    input: R,
    output: W,
    renderer: MarkdownRenderer,
}

impl<R, W> Terminal<R, W>
where
    R: BufRead,
    W: Write,
{
    /// Wraps an input source and an output sink.
    pub const fn new(input: R, output: W, renderer: MarkdownRenderer) -> Self {
        Self {
            input,
            output,
            renderer,
        }
    }

    /// Writes `prompt` without a newline and reads one line.
    ///
    /// The line terminator is stripped; everything else, including leading
    /// and trailing spaces, is returned as typed. Returns `None` at end of
    /// input.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Io`] when writing the prompt or reading fails.
    pub fn prompt(&mut self, prompt: &str) -> Result<Option<String>, IntakeError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let stripped = line
            .strip_suffix('\n')
            .map_or(line.as_str(), |rest| rest.strip_suffix('\r').unwrap_or(rest));
        Ok(Some(stripped.to_owned()))
    }

    /// Writes one plain line.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Io`] when writing fails.
    pub fn say(&mut self, line: &str) -> Result<(), IntakeError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Renders Markdown and writes it.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Io`] when writing fails.
    pub fn say_markdown(&mut self, markdown: &str) -> Result<(), IntakeError> {
        self.renderer.render_to(&mut self.output, markdown)?;
        Ok(())
    }

    /// Releases the underlying reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}
