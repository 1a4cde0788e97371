#![allow(clippy::unwrap_used)]
//! Config priority contract tests.
//!
//! These tests verify that CLI options take priority over config file settings.
//! Priority order (highest to lowest):
//! 1. CLI arguments
//! 2. Config file defaults
//! 3. Built-in defaults

use std::fs;
use std::path::PathBuf;

use llama_chat::config::{
    ChatSection, ConfigFile, ConfigManager, EngineSection, ResolveOptions, resolve_config,
};

fn make_config_with_defaults() -> ConfigFile {
    ConfigFile {
        chat: ChatSection {
            temperature: Some(0.3),
            top_p: Some(0.7),
            max_gen_len: Some(100),
            retain_history: Some(true),
            highlight: Some(true),
            system_prompt: Some("config prompt".to_string()),
            system_prompt_file: None,
        },
        engine: EngineSection {
            ckpt_dir: Some(PathBuf::from("/config/ckpt")),
            tokenizer_path: Some(PathBuf::from("/config/tokenizer.model")),
            endpoint: Some("http://config.local".to_string()),
            api_key: None,
            api_key_env: None,
            max_seq_len: Some(1024),
            max_batch_size: Some(2),
        },
    }
}

#[test]
fn test_config_values_used_when_cli_not_specified() {
    let config = make_config_with_defaults();

    let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();

    assert_eq!(resolved.engine.ckpt_dir, PathBuf::from("/config/ckpt"));
    assert_eq!(resolved.engine.endpoint, "http://config.local");
    assert_eq!(resolved.engine.max_seq_len, 1024);
    assert_eq!(resolved.engine.max_batch_size, 2);
    assert_eq!(resolved.generation.max_gen_len(), 100);
    assert!(resolved.retain_history);
    assert!(resolved.highlight);
    assert_eq!(resolved.system_prompt.as_deref(), Some("config prompt"));
}

#[test]
fn test_cli_paths_override_config_paths() {
    let config = make_config_with_defaults();
    let options = ResolveOptions {
        ckpt_dir: Some(PathBuf::from("/cli/ckpt")),
        tokenizer_path: Some(PathBuf::from("/cli/tokenizer.model")),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.engine.ckpt_dir, PathBuf::from("/cli/ckpt"));
    assert_eq!(
        resolved.engine.tokenizer_path,
        PathBuf::from("/cli/tokenizer.model")
    );
}

#[test]
fn test_cli_sampling_overrides_config_sampling() {
    let config = make_config_with_defaults();
    let options = ResolveOptions {
        temperature: Some(0.9),
        top_p: Some(0.5),
        max_gen_len: Some(32),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert!((resolved.generation.temperature() - 0.9).abs() < f32::EPSILON);
    assert!((resolved.generation.top_p() - 0.5).abs() < f32::EPSILON);
    assert_eq!(resolved.generation.max_gen_len(), 32);
}

#[test]
fn test_cli_system_prompt_overrides_config_prompt() {
    let config = make_config_with_defaults();
    let options = ResolveOptions {
        system_prompt: Some("cli prompt".to_string()),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.system_prompt.as_deref(), Some("cli prompt"));
}

#[test]
fn test_cli_prompt_file_overrides_config_prompt() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let prompt_path = temp_dir.path().join("prompt.md");
    fs::write(&prompt_path, "file prompt").unwrap();

    let config = make_config_with_defaults();
    let options = ResolveOptions {
        system_prompt_file: Some(prompt_path),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.system_prompt.as_deref(), Some("file prompt"));
}

#[test]
fn test_max_gen_len_defaults_to_resolved_max_seq_len() {
    let mut config = make_config_with_defaults();
    config.chat.max_gen_len = None;
    let options = ResolveOptions {
        max_seq_len: Some(4096),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.generation.max_gen_len(), 4096);
}

#[test]
fn test_cli_endpoint_overrides_config_endpoint() {
    let config = make_config_with_defaults();
    let options = ResolveOptions {
        endpoint: Some("http://cli.local".to_string()),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.engine.endpoint, "http://cli.local");
}

#[test]
fn test_config_file_round_trip_through_manager() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        "[engine]\nckpt_dir = \"/m\"\ntokenizer_path = \"/t\"\n\n[chat]\nretain_history = true\n",
    )
    .unwrap();

    let manager = ConfigManager::with_path(&path);
    let file_config = manager.load_or_default().unwrap();
    let resolved = resolve_config(&ResolveOptions::default(), &file_config).unwrap();

    assert_eq!(resolved.engine.ckpt_dir, PathBuf::from("/m"));
    assert!(resolved.retain_history);
    assert!(!resolved.highlight);
}
