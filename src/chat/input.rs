//! Line sources for the chat loop.

use anyhow::{Context, Result};
use inquire::ui::{Attributes, Color, RenderConfig, Styled};
use inquire::{InquireError, Text};
use std::io::{BufRead, Write};

/// Outcome of reading one line from the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    Line(String),
    /// Ctrl+C (or Esc) while the prompt was active.
    Interrupted,
    /// The input stream was closed.
    EndOfInput,
}

/// Blocking source of operator input.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<LineEvent>;
}

/// Interactive prompt for terminals.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptLineSource;

impl LineSource for PromptLineSource {
    fn read_line(&mut self, prompt: &str) -> Result<LineEvent> {
        let prefix = Styled::new(prompt.trim_end())
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let render_config = RenderConfig::default()
            .with_prompt_prefix(prefix)
            .with_answered_prompt_prefix(prefix);

        match Text::new("").with_render_config(render_config).prompt() {
            Ok(line) => Ok(LineEvent::Line(line)),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Ok(LineEvent::Interrupted)
            }
            Err(e) => Err(e).context("Failed to read input"),
        }
    }
}

/// Reads lines from any buffered reader, echoing the prompt to `prompt_out`.
///
/// Used when stdin is not a terminal, and in tests.
pub struct ReaderLineSource<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> ReaderLineSource<R, W> {
    pub const fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }
}

impl<R: BufRead, W: Write> LineSource for ReaderLineSource<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<LineEvent> {
        write!(self.prompt_out, "{prompt}")?;
        self.prompt_out.flush()?;

        let mut line = String::new();
        let bytes_read = self
            .reader
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if bytes_read == 0 {
            return Ok(LineEvent::EndOfInput);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(LineEvent::Line(line))
    }
}
