//! Chat mode UI components.

use std::io::{self, Write};

use crate::ui::Style;

pub const INPUT_PROMPT: &str = "You: ";
pub const REPLY_PREFIX: &str = "Llama: ";

pub fn print_loaded(out: &mut dyn Write) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        Style::success("Llama model loaded. You can start chatting!")
    )
}

pub fn print_reply(out: &mut dyn Write, display: &str) -> io::Result<()> {
    writeln!(out, "{REPLY_PREFIX}{display}")?;
    out.flush()
}

pub fn print_exit(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Exiting chat.")
}

/// Best effort; used from the signal task as well.
pub fn print_interrupted(out: &mut dyn Write) {
    let _ = writeln!(out, "\nChat interrupted by user.");
    let _ = out.flush();
}

pub fn print_warning(out: &mut dyn Write, message: &str) -> io::Result<()> {
    writeln!(out, "{} {message}", Style::warning("Warning:"))
}

pub fn print_error(out: &mut dyn Write, message: &str) -> io::Result<()> {
    writeln!(out, "{} {message}", Style::error("Error:"))
}
