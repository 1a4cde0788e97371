//! Generation engine contract and its OpenAI-compatible implementation.

mod client;
mod config;

pub use client::ChatCompletionEngine;
pub use config::{
    DEFAULT_ENDPOINT, DEFAULT_MAX_BATCH_SIZE, DEFAULT_MAX_SEQ_LEN, DEFAULT_TEMPERATURE,
    DEFAULT_TOP_P, EngineConfig, GenerationConfig,
};

use async_trait::async_trait;
use thiserror::Error;

use crate::transcript::{Role, Turn};

/// One generated message returned by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub role: Role,
    pub content: String,
}

impl Reply {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// Building the engine failed. Fatal: the chat loop never starts.
    #[error("failed to initialize engine: {0}")]
    Init(String),
    #[error("failed to reach engine at {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("engine request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed engine response: {0}")]
    Malformed(String),
    #[error("batch of {size} exceeds the maximum batch size of {max}")]
    BatchTooLarge { size: usize, max: usize },
    #[error("unexpected engine reply: {0}")]
    UnexpectedReply(String),
}

/// Produces replies for a batch of transcripts.
///
/// The chat loop always submits a batch of one and expects exactly one reply
/// per transcript, in order.
#[async_trait]
pub trait GenerationEngine: Send + Sync {
    async fn generate(
        &self,
        batch: &[Vec<Turn>],
        params: &GenerationConfig,
    ) -> Result<Vec<Reply>, EngineError>;
}
