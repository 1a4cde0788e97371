//! # llama-chat - Interactive Terminal Chat
//!
//! `llama-chat` runs a line-oriented conversation with a Llama-family model
//! served behind an OpenAI-compatible chat completion endpoint.
//!
//! ## Features
//!
//! - **Stateless or stateful turns**: send only the current message, or the
//!   whole conversation with `--retain-history`
//! - **System prompts**: seed the conversation with `--system-prompt` or
//!   `--system-prompt-file`
//! - **Highlighting**: replies that look like Python, YAML, JSON or Markdown
//!   are syntax-highlighted with `--highlight`
//!
//! ## Quick Start
//!
//! ```bash
//! llama-chat --ckpt-dir ./llama-2-7b-chat --tokenizer-path ./tokenizer.model
//!
//! # Keep the conversation and highlight replies
//! llama-chat -c ./llama-2-7b-chat -k ./tokenizer.model -r -H
//! ```
//!
//! Type `quit` or press Ctrl+C to leave.
//!
//! ## Configuration
//!
//! Defaults are read from `~/.config/llama-chat/config.toml`:
//!
//! ```toml
//! [chat]
//! temperature = 0.6
//! top_p = 0.9
//! retain_history = true
//!
//! [engine]
//! ckpt_dir = "/models/llama-2-7b-chat"
//! tokenizer_path = "/models/tokenizer.model"
//! endpoint = "http://localhost:8080"
//! ```

/// Interactive chat loop.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management.
pub mod config;

/// Generation engine contract and client.
pub mod engine;

/// Reply format detection.
pub mod format;

/// System prompt file loading.
pub mod input;

/// Global output configuration (quiet mode, colors, logging).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Syntax highlighting of replies.
pub mod render;

/// Conversation transcript.
pub mod transcript;

/// Terminal UI components (spinner, colors).
pub mod ui;
