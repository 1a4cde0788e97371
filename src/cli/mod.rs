//! Command-line interface definitions and handlers.

/// CLI argument parsing with clap.
pub mod args;

/// Subcommand implementations.
pub mod commands;

pub use args::{Args, Command};

use crate::config::ResolveOptions;
use crate::output::OutputConfig;

impl Args {
    /// CLI overrides for config resolution. Unset flags defer to the file.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            ckpt_dir: self.ckpt_dir.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
            endpoint: self.endpoint.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            max_seq_len: self.max_seq_len,
            max_batch_size: self.max_batch_size,
            max_gen_len: self.max_gen_len,
            retain_history: switch(self.retain_history, self.no_retain_history),
            highlight: switch(self.highlight, self.no_highlight),
            system_prompt: self.system_prompt.clone(),
            system_prompt_file: self.system_prompt_file.clone(),
            // Terminal detection only affects owo-colors output, not highlighting.
            no_color: self.no_color || OutputConfig::default().no_color,
        }
    }
}

/// A `--flag`/`--no-flag` pair; `None` defers to the config file.
const fn switch(on: bool, off: bool) -> Option<bool> {
    if on {
        Some(true)
    } else if off {
        Some(false)
    } else {
        None
    }
}
