use anyhow::Result;
use std::io::Write;

use super::command::{Input, parse_input};
use super::input::{LineEvent, LineSource};
use super::interrupt::InterruptSignal;
use super::ui;
use crate::engine::{EngineError, GenerationConfig, GenerationEngine, Reply};
use crate::format::classify;
use crate::render::{Renderer, SyntectRenderer, render_or_plain};
use crate::transcript::{Role, Transcript, Turn};
use crate::ui::Spinner;

/// Configuration for a chat session. Fixed at construction.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sampling parameters passed to every engine call.
    pub generation: GenerationConfig,
    /// Send the whole transcript to the engine (`true`) or only the
    /// current user turn (`false`).
    pub retain_history: bool,
    /// Classify and syntax-highlight replies before display.
    pub highlight: bool,
    /// Seeds the transcript with a system turn.
    pub system_prompt: Option<String>,
    /// Show a spinner while waiting on the engine.
    pub progress: bool,
}

impl SessionConfig {
    /// Stateless, unhighlighted session with no system prompt.
    pub const fn new(generation: GenerationConfig) -> Self {
        Self {
            generation,
            retain_history: false,
            highlight: false,
            system_prompt: None,
            progress: false,
        }
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    ExitKeyword,
    Interrupted,
    EndOfInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingInput,
    Generating,
    Rendering,
    Terminated(TerminationReason),
}

/// Drives the read, generate, append, render loop.
///
/// The session is the sole owner of its [`Transcript`]. Each cycle stages
/// the user turn on a copy and commits only after the assistant reply has
/// been accepted, so a failed cycle leaves the transcript untouched.
pub struct ChatSession<E, S, W> {
    config: SessionConfig,
    engine: E,
    input: S,
    out: W,
    renderer: Box<dyn Renderer>,
    interrupt: InterruptSignal,
    transcript: Transcript,
    state: SessionState,
}

impl<E, S, W> ChatSession<E, S, W>
where
    E: GenerationEngine,
    S: LineSource,
    W: Write,
{
    pub fn new(config: SessionConfig, engine: E, input: S, out: W) -> Self {
        let transcript = Transcript::new(config.system_prompt.as_deref());
        Self {
            config,
            engine,
            input,
            out,
            renderer: Box::new(SyntectRenderer),
            interrupt: InterruptSignal::new(),
            transcript,
            state: SessionState::Idle,
        }
    }

    /// Replaces the renderer used when highlighting is enabled.
    #[must_use]
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    #[must_use]
    pub fn with_interrupt(mut self, interrupt: InterruptSignal) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub const fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs cycles until the session terminates.
    ///
    /// Recoverable per-cycle failures are reported to the operator and the
    /// loop continues. Only I/O failures on the input or output streams are
    /// returned as errors.
    pub async fn run(&mut self) -> Result<TerminationReason> {
        if self.state == SessionState::Idle {
            self.state = SessionState::AwaitingInput;
        }
        loop {
            if let SessionState::Terminated(reason) = self.state {
                return Ok(reason);
            }
            self.cycle().await?;
        }
    }

    async fn cycle(&mut self) -> Result<()> {
        if self.interrupt.is_triggered() {
            return self.terminate(TerminationReason::Interrupted);
        }

        let line = match self.input.read_line(ui::INPUT_PROMPT)? {
            LineEvent::Line(line) => line,
            LineEvent::Interrupted => return self.terminate(TerminationReason::Interrupted),
            LineEvent::EndOfInput => return self.terminate(TerminationReason::EndOfInput),
        };
        if self.interrupt.is_triggered() {
            return self.terminate(TerminationReason::Interrupted);
        }

        match parse_input(&line) {
            Input::Quit => self.terminate(TerminationReason::ExitKeyword),
            Input::Text(text) => self.exchange(&text).await,
        }
    }

    /// One user turn and its reply.
    async fn exchange(&mut self, text: &str) -> Result<()> {
        let staged = match self.transcript.append_user(text) {
            Ok(staged) => staged,
            Err(e) => {
                ui::print_warning(&mut self.out, &format!("{e}. Please enter a message."))?;
                return Ok(());
            }
        };

        self.state = SessionState::Generating;
        let payload = self.payload(&staged);
        tracing::debug!(
            turns = payload.len(),
            retain_history = self.config.retain_history,
            "generating"
        );
        let result = {
            let _spinner = self.config.progress.then(|| Spinner::new("Generating..."));
            self.engine
                .generate(std::slice::from_ref(&payload), &self.config.generation)
                .await
        };

        if self.interrupt.is_triggered() {
            return self.terminate(TerminationReason::Interrupted);
        }

        let reply = match result.and_then(single_reply) {
            Ok(reply) => reply,
            Err(e) => {
                tracing::debug!(error = %e, "generation failed");
                ui::print_error(&mut self.out, &format!("Generation failed: {e}"))?;
                self.state = SessionState::AwaitingInput;
                return Ok(());
            }
        };

        match staged.append_assistant(&reply) {
            Ok(committed) => self.transcript = committed,
            Err(e) => {
                ui::print_warning(&mut self.out, &format!("{e}. Please try again."))?;
                self.state = SessionState::AwaitingInput;
                return Ok(());
            }
        }

        self.state = SessionState::Rendering;
        self.display(&reply)?;
        self.state = SessionState::AwaitingInput;
        Ok(())
    }

    fn payload(&self, staged: &Transcript) -> Vec<Turn> {
        if self.config.retain_history {
            staged.snapshot().to_vec()
        } else {
            staged.last().cloned().into_iter().collect()
        }
    }

    fn display(&mut self, reply: &str) -> Result<()> {
        if self.config.highlight {
            let rendered = render_or_plain(self.renderer.as_ref(), reply, classify(reply));
            ui::print_reply(&mut self.out, &rendered)?;
        } else {
            ui::print_reply(&mut self.out, reply)?;
        }
        Ok(())
    }

    fn terminate(&mut self, reason: TerminationReason) -> Result<()> {
        match reason {
            TerminationReason::ExitKeyword => ui::print_exit(&mut self.out)?,
            TerminationReason::Interrupted => ui::print_interrupted(&mut self.out),
            TerminationReason::EndOfInput => {}
        }
        tracing::debug!(?reason, turns = self.transcript.len(), "session terminated");
        self.state = SessionState::Terminated(reason);
        Ok(())
    }
}

/// A batch of one must yield exactly one assistant reply.
fn single_reply(replies: Vec<Reply>) -> Result<String, EngineError> {
    let count = replies.len();
    let mut replies = replies.into_iter();
    match (replies.next(), count) {
        (Some(reply), 1) if reply.role == Role::Assistant => Ok(reply.content),
        (Some(reply), 1) => Err(EngineError::UnexpectedReply(format!(
            "expected an assistant reply, got role '{}'",
            reply.role
        ))),
        _ => Err(EngineError::UnexpectedReply(format!(
            "expected 1 reply, got {count}"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_new_defaults() {
        let generation = GenerationConfig::new(0.6, 0.9, 512).unwrap();
        let config = SessionConfig::new(generation);

        assert_eq!(config.generation, generation);
        assert!(!config.retain_history);
        assert!(!config.highlight);
        assert!(config.system_prompt.is_none());
        assert!(!config.progress);
    }

    #[test]
    fn test_single_reply_accepts_one_assistant() {
        assert_eq!(
            single_reply(vec![Reply::assistant("OK")]).unwrap(),
            "OK".to_string()
        );
    }

    #[test]
    fn test_single_reply_rejects_wrong_count() {
        assert!(matches!(
            single_reply(vec![]),
            Err(EngineError::UnexpectedReply(_))
        ));
        assert!(matches!(
            single_reply(vec![Reply::assistant("a"), Reply::assistant("b")]),
            Err(EngineError::UnexpectedReply(_))
        ));
    }

    #[test]
    fn test_single_reply_rejects_non_assistant_role() {
        let reply = Reply {
            role: Role::User,
            content: "hi".to_string(),
        };
        let err = single_reply(vec![reply]).unwrap_err();
        assert!(err.to_string().contains("role 'user'"));
    }
}
