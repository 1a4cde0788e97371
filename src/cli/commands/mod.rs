//! Subcommand implementations.

/// Chat mode command handler.
pub mod chat;

/// Config command handler.
pub mod config;
