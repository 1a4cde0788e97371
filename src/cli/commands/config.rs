//! Config command handler.

use anyhow::Result;
use std::io::{self, Write};

use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use crate::ui::Style;

/// Prints the config file location and the effective settings.
///
/// Missing required settings are reported, not treated as failures.
pub fn print_config(options: &ResolveOptions) -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut out = io::stdout().lock();

    let exists = manager.config_path().exists();
    writeln!(
        out,
        "{} {}{}",
        Style::header("Config file:"),
        Style::secondary(manager.config_path().display()),
        if exists { "" } else { " (not found)" }
    )?;
    writeln!(out)?;

    let file_config = manager.load_or_default()?;
    match resolve_config(options, &file_config) {
        Ok(resolved) => write_resolved(&mut out, &resolved)?,
        Err(e) => writeln!(out, "{} {e:#}", Style::warning("Incomplete configuration:"))?,
    }
    Ok(())
}

fn write_resolved(out: &mut dyn Write, resolved: &ResolvedConfig) -> io::Result<()> {
    let engine = &resolved.engine;
    let generation = &resolved.generation;
    let system_prompt = resolved.system_prompt.as_deref().map_or_else(
        || Style::secondary("(none)"),
        |prompt| Style::value(format!("{} chars", prompt.chars().count())),
    );

    let rows = [
        ("ckpt_dir", Style::value(engine.ckpt_dir.display())),
        ("tokenizer_path", Style::value(engine.tokenizer_path.display())),
        ("endpoint", Style::secondary(&engine.endpoint)),
        (
            "api_key",
            Style::secondary(if engine.api_key.is_some() { "(set)" } else { "(not set)" }),
        ),
        ("max_seq_len", Style::value(engine.max_seq_len)),
        ("max_batch_size", Style::value(engine.max_batch_size)),
        ("temperature", Style::value(generation.temperature())),
        ("top_p", Style::value(generation.top_p())),
        ("max_gen_len", Style::value(generation.max_gen_len())),
        ("retain_history", Style::value(resolved.retain_history)),
        ("highlight", Style::value(resolved.highlight)),
        ("system_prompt", system_prompt),
    ];

    writeln!(out, "{}", Style::header("Configuration"))?;
    for (label, value) in rows {
        writeln!(out, "  {:<16} {value}", Style::label(label))?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use std::path::PathBuf;

    #[test]
    fn test_write_resolved_lists_settings() {
        let options = ResolveOptions {
            ckpt_dir: Some(PathBuf::from("/models/llama-2-7b-chat")),
            tokenizer_path: Some(PathBuf::from("/models/tokenizer.model")),
            system_prompt: Some("Be brief.".to_string()),
            ..ResolveOptions::default()
        };
        let resolved = resolve_config(&options, &ConfigFile::default()).unwrap();

        let mut buf = Vec::new();
        write_resolved(&mut buf, &resolved).unwrap();
        let output = String::from_utf8(buf).unwrap();

        assert!(output.contains("/models/llama-2-7b-chat"));
        assert!(output.contains("temperature"));
        assert!(output.contains("0.6"));
        assert!(output.contains("512"));
        assert!(output.contains("9 chars"));
    }
}
