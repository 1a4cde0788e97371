//! Conversation transcript: an ordered, append-only log of role-tagged turns.
//!
//! Appends never mutate in place. Each append returns a new [`Transcript`],
//! which lets the chat loop stage a user turn, call the engine, and only
//! commit once the assistant turn has been accepted.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name used by chat-completion APIs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single conversational contribution. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// What made an append break the turn protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderViolation {
    /// The previous turn does not allow this role next.
    OutOfSequence,
    /// The text is empty after trimming.
    BlankText,
}

/// Reasons an append is rejected. The transcript is never modified on error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptError {
    #[error("invalid turn order: {}", describe_violation(*.attempted, *.last, *.reason))]
    InvalidTurnOrder {
        attempted: Role,
        last: Option<Role>,
        reason: OrderViolation,
    },
    #[error("the model returned an empty reply")]
    EmptyGeneration,
}

fn with_article(role: Role) -> String {
    match role {
        Role::Assistant => format!("an {role}"),
        Role::System | Role::User => format!("a {role}"),
    }
}

fn describe_violation(attempted: Role, last: Option<Role>, reason: OrderViolation) -> String {
    match reason {
        OrderViolation::BlankText => format!("the {attempted} message is empty"),
        OrderViolation::OutOfSequence => {
            let after = last.map_or_else(
                || "an empty transcript".to_string(),
                |role| format!("{} turn", with_article(role)),
            );
            format!("cannot append {} turn after {after}", with_article(attempted))
        }
    }
}

/// Ordered sequence of turns presented to the generation engine.
///
/// Invariants:
/// - at most one `system` turn, and only at position 0;
/// - after it, roles alternate strictly, starting with `user`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Creates a transcript, optionally seeded with a system turn.
    ///
    /// A prompt that is empty after trimming is treated as absent.
    pub fn new(system_prompt: Option<&str>) -> Self {
        let turns = system_prompt
            .filter(|prompt| !prompt.trim().is_empty())
            .map(|prompt| vec![Turn::system(prompt)])
            .unwrap_or_default();
        Self { turns }
    }

    /// Returns a new transcript with a user turn appended.
    ///
    /// Fails with [`TranscriptError::InvalidTurnOrder`] if the last turn is
    /// already a user turn, or if `text` is blank.
    pub fn append_user(&self, text: &str) -> Result<Self, TranscriptError> {
        let last = self.last_role();
        let reason = if last == Some(Role::User) {
            OrderViolation::OutOfSequence
        } else if text.trim().is_empty() {
            OrderViolation::BlankText
        } else {
            return Ok(self.with(Turn::user(text)));
        };
        Err(TranscriptError::InvalidTurnOrder {
            attempted: Role::User,
            last,
            reason,
        })
    }

    /// Returns a new transcript with an assistant turn appended.
    ///
    /// The assistant may only answer a user turn; anything else is
    /// [`TranscriptError::InvalidTurnOrder`]. Blank replies are
    /// [`TranscriptError::EmptyGeneration`].
    pub fn append_assistant(&self, text: &str) -> Result<Self, TranscriptError> {
        let last = self.last_role();
        if last != Some(Role::User) {
            return Err(TranscriptError::InvalidTurnOrder {
                attempted: Role::Assistant,
                last,
                reason: OrderViolation::OutOfSequence,
            });
        }
        if text.trim().is_empty() {
            return Err(TranscriptError::EmptyGeneration);
        }
        Ok(self.with(Turn::assistant(text)))
    }

    /// Read-only view in insertion order, system turn included.
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.turns
            .first()
            .filter(|turn| turn.role() == Role::System)
            .map(Turn::content)
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    fn last_role(&self) -> Option<Role> {
        self.turns.last().map(Turn::role)
    }

    fn with(&self, turn: Turn) -> Self {
        let mut turns = Vec::with_capacity(self.turns.len() + 1);
        turns.extend_from_slice(&self.turns);
        turns.push(turn);
        Self { turns }
    }
}
