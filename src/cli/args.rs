use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "llama-chat")]
#[command(about = "Interactive terminal chat with a Llama model")]
#[command(version)]
pub struct Args {
    /// Directory holding the model checkpoint
    #[arg(short = 'c', long)]
    pub ckpt_dir: Option<PathBuf>,

    /// Tokenizer model file
    #[arg(short = 'k', long)]
    pub tokenizer_path: Option<PathBuf>,

    /// OpenAI-compatible server URL hosting the checkpoint
    #[arg(short = 'e', long)]
    pub endpoint: Option<String>,

    /// Sampling temperature [default: 0.6]
    #[arg(short = 't', long)]
    pub temperature: Option<f32>,

    /// Nucleus sampling threshold [default: 0.9]
    #[arg(short = 'p', long)]
    pub top_p: Option<f32>,

    /// Maximum sequence length [default: 512]
    #[arg(long)]
    pub max_seq_len: Option<usize>,

    /// Maximum batch size [default: 8]
    #[arg(long)]
    pub max_batch_size: Option<usize>,

    /// Maximum tokens per reply [default: max sequence length]
    #[arg(short = 'g', long)]
    pub max_gen_len: Option<usize>,

    /// Send the whole conversation to the model on every turn
    #[arg(short = 'r', long, overrides_with = "no_retain_history")]
    pub retain_history: bool,

    /// Send only the current message, even if the config file retains history
    #[arg(long, overrides_with = "retain_history")]
    pub no_retain_history: bool,

    /// Syntax-highlight replies
    #[arg(short = 'H', long, overrides_with = "no_highlight")]
    pub highlight: bool,

    /// Show replies as plain text, even if the config file enables highlighting
    #[arg(long, overrides_with = "highlight")]
    pub no_highlight: bool,

    /// System prompt that seeds the conversation
    #[arg(short = 's', long, conflicts_with = "system_prompt_file")]
    pub system_prompt: Option<String>,

    /// File containing the system prompt
    #[arg(short = 'f', long)]
    pub system_prompt_file: Option<PathBuf>,

    /// Disable colors and highlighting
    #[arg(long)]
    pub no_color: bool,

    /// Suppress the startup banner
    #[arg(short = 'q', long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the config file location and effective settings
    Config,
}
