use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::{
    DEFAULT_ENDPOINT, DEFAULT_MAX_BATCH_SIZE, DEFAULT_MAX_SEQ_LEN, DEFAULT_TEMPERATURE,
    DEFAULT_TOP_P, EngineConfig, GenerationConfig,
};
use crate::input::read_prompt_file;
use crate::paths;

/// Session defaults in the `[chat]` section of config.toml.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatSection {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    /// Maximum tokens per reply. Defaults to `max_seq_len`.
    pub max_gen_len: Option<usize>,
    /// Send the full conversation to the model on every turn.
    pub retain_history: Option<bool>,
    /// Syntax-highlight replies.
    pub highlight: Option<bool>,
    /// Inline system prompt.
    pub system_prompt: Option<String>,
    /// Path to a file holding the system prompt.
    pub system_prompt_file: Option<PathBuf>,
}

/// Engine settings in the `[engine]` section of config.toml.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineSection {
    /// Directory holding the model checkpoint.
    pub ckpt_dir: Option<PathBuf>,
    /// Tokenizer model file.
    pub tokenizer_path: Option<PathBuf>,
    /// OpenAI-compatible server URL.
    pub endpoint: Option<String>,
    /// API key stored directly in config (not recommended).
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,
    pub max_seq_len: Option<usize>,
    pub max_batch_size: Option<usize>,
}

impl EngineSection {
    /// Gets the API key, preferring the environment variable over the config file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(env_var) = &self.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone()
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/llama-chat/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub chat: ChatSection,
    #[serde(default)]
    pub engine: EngineSection,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub ckpt_dir: Option<PathBuf>,
    pub tokenizer_path: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_seq_len: Option<usize>,
    pub max_batch_size: Option<usize>,
    pub max_gen_len: Option<usize>,
    pub retain_history: Option<bool>,
    pub highlight: Option<bool>,
    pub system_prompt: Option<String>,
    pub system_prompt_file: Option<PathBuf>,
    /// Colors off; also disables highlighting.
    pub no_color: bool,
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub engine: EngineConfig,
    pub generation: GenerationConfig,
    pub retain_history: bool,
    pub highlight: bool,
    pub system_prompt: Option<String>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// Priority: CLI option, then config file, then built-in default.
///
/// # Errors
///
/// Returns an error if the checkpoint or tokenizer location is missing,
/// a sampling parameter is out of range, or the system prompt file cannot
/// be read.
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> Result<ResolvedConfig> {
    let chat = &config_file.chat;
    let engine = &config_file.engine;

    let ckpt_dir = options
        .ckpt_dir
        .clone()
        .or_else(|| engine.ckpt_dir.clone())
        .ok_or_else(|| missing("ckpt_dir", "--ckpt-dir <dir>", "engine.ckpt_dir"))?;

    let tokenizer_path = options
        .tokenizer_path
        .clone()
        .or_else(|| engine.tokenizer_path.clone())
        .ok_or_else(|| {
            missing(
                "tokenizer_path",
                "--tokenizer-path <file>",
                "engine.tokenizer_path",
            )
        })?;

    let max_seq_len = options
        .max_seq_len
        .or(engine.max_seq_len)
        .unwrap_or(DEFAULT_MAX_SEQ_LEN);
    let max_batch_size = options
        .max_batch_size
        .or(engine.max_batch_size)
        .unwrap_or(DEFAULT_MAX_BATCH_SIZE);
    if max_seq_len == 0 {
        bail!("Invalid max_seq_len: 0 (expected a positive integer)");
    }
    if max_batch_size == 0 {
        bail!("Invalid max_batch_size: 0 (expected a positive integer)");
    }

    let generation = GenerationConfig::new(
        options
            .temperature
            .or(chat.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE),
        options.top_p.or(chat.top_p).unwrap_or(DEFAULT_TOP_P),
        options
            .max_gen_len
            .or(chat.max_gen_len)
            .unwrap_or(max_seq_len),
    )?;

    let system_prompt = resolve_system_prompt(options, chat)?;

    let highlight = !options.no_color
        && options
            .highlight
            .or(chat.highlight)
            .unwrap_or(false);

    Ok(ResolvedConfig {
        engine: EngineConfig {
            ckpt_dir,
            tokenizer_path,
            endpoint: options
                .endpoint
                .clone()
                .or_else(|| engine.endpoint.clone())
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            api_key: engine.get_api_key(),
            max_seq_len,
            max_batch_size,
        },
        generation,
        retain_history: options
            .retain_history
            .or(chat.retain_history)
            .unwrap_or(false),
        highlight,
        system_prompt,
    })
}

fn missing(key: &str, flag: &str, file_key: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Missing required configuration: '{key}'\n\n\
         Please provide it via:\n  \
         - CLI option: llama-chat {flag}\n  \
         - Config file: set {file_key} in ~/.config/llama-chat/config.toml"
    )
}

/// CLI text, then CLI file, then config text, then config file.
/// Blank prompts count as absent.
fn resolve_system_prompt(options: &ResolveOptions, chat: &ChatSection) -> Result<Option<String>> {
    if options.system_prompt.is_some() && options.system_prompt_file.is_some() {
        bail!("--system-prompt and --system-prompt-file cannot be used together");
    }

    let prompt = if let Some(text) = &options.system_prompt {
        Some(text.clone())
    } else if let Some(path) = &options.system_prompt_file {
        Some(read_prompt_file(path)?)
    } else if let Some(text) = &chat.system_prompt {
        Some(text.clone())
    } else if let Some(path) = &chat.system_prompt_file {
        Some(read_prompt_file(path)?)
    } else {
        None
    };

    Ok(prompt.filter(|p| !p.trim().is_empty()))
}

/// Manages loading configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a config manager for `$XDG_CONFIG_HOME/llama-chat/config.toml`
    /// or `~/.config/llama-chat/config.toml`.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    /// Uses an explicit config file path.
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        toml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })
    }

    /// Loads the config file, or the defaults if it does not exist.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}
