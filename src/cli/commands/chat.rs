use anyhow::{Context, Result};
use std::io::{self, IsTerminal};

use crate::chat::{
    ChatSession, InterruptSignal, PromptLineSource, ReaderLineSource, SessionConfig,
    print_loaded,
};
use crate::config::{ConfigManager, ResolveOptions, resolve_config};
use crate::engine::ChatCompletionEngine;
use crate::output;

pub async fn run_chat(options: &ResolveOptions) -> Result<()> {
    let manager = ConfigManager::new()?;
    let file_config = manager.load_or_default()?;
    let resolved = resolve_config(options, &file_config)?;

    let engine =
        ChatCompletionEngine::build(resolved.engine).context("Failed to load the model")?;
    if !output::is_quiet() {
        print_loaded(&mut io::stdout())?;
    }

    let interrupt = InterruptSignal::new();
    interrupt.listen_for_ctrl_c();

    let interactive = io::stdin().is_terminal();
    let config = SessionConfig {
        generation: resolved.generation,
        retain_history: resolved.retain_history,
        highlight: resolved.highlight,
        system_prompt: resolved.system_prompt,
        progress: interactive && io::stderr().is_terminal(),
    };

    let reason = if interactive {
        ChatSession::new(config, engine, PromptLineSource, io::stdout())
            .with_interrupt(interrupt)
            .run()
            .await?
    } else {
        let input = ReaderLineSource::new(io::stdin().lock(), io::stdout());
        ChatSession::new(config, engine, input, io::stdout())
            .with_interrupt(interrupt)
            .run()
            .await?
    };
    tracing::debug!(?reason, "chat finished");

    Ok(())
}
