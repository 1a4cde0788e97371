//! Interactive chat mode.
//!
//! A [`ChatSession`] reads a line, sends the conversation to the generation
//! engine, appends the reply to its transcript and prints it, until the
//! operator types `quit`, interrupts, or closes the input.

/// Input line parsing.
pub mod command;
mod input;
mod interrupt;
mod session;
mod ui;

pub use input::{LineEvent, LineSource, PromptLineSource, ReaderLineSource};
pub use interrupt::InterruptSignal;
pub use session::{ChatSession, SessionConfig, SessionState, TerminationReason};
pub use ui::print_loaded;
