use anyhow::{Result, bail};
use std::path::PathBuf;

pub const DEFAULT_TEMPERATURE: f32 = 0.6;
pub const DEFAULT_TOP_P: f32 = 0.9;
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;
pub const DEFAULT_MAX_BATCH_SIZE: usize = 8;
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

/// Sampling parameters, fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_gen_len: usize,
}

impl GenerationConfig {
    /// Validates and builds sampling parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `temperature` is negative or not finite, `top_p`
    /// is outside `(0, 1]`, or `max_gen_len` is zero.
    pub fn new(temperature: f32, top_p: f32, max_gen_len: usize) -> Result<Self> {
        if !temperature.is_finite() || temperature < 0.0 {
            bail!("Invalid temperature: {temperature} (expected a finite value >= 0)");
        }
        if !(top_p > 0.0 && top_p <= 1.0) {
            bail!("Invalid top_p: {top_p} (expected a value in (0, 1])");
        }
        if max_gen_len == 0 {
            bail!("Invalid max_gen_len: 0 (expected a positive integer)");
        }
        Ok(Self {
            temperature,
            top_p,
            max_gen_len,
        })
    }

    pub const fn temperature(&self) -> f32 {
        self.temperature
    }

    pub const fn top_p(&self) -> f32 {
        self.top_p
    }

    pub const fn max_gen_len(&self) -> usize {
        self.max_gen_len
    }
}

/// Everything needed to build a [`super::ChatCompletionEngine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding the model checkpoint.
    pub ckpt_dir: PathBuf,
    /// Tokenizer model file.
    pub tokenizer_path: PathBuf,
    /// Base URL of the OpenAI-compatible server hosting the checkpoint.
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_seq_len: usize,
    pub max_batch_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_accepts_defaults() {
        let config =
            GenerationConfig::new(DEFAULT_TEMPERATURE, DEFAULT_TOP_P, DEFAULT_MAX_SEQ_LEN);
        assert!(config.is_ok());
    }

    #[test]
    fn test_generation_config_accepts_greedy_sampling() {
        assert!(GenerationConfig::new(0.0, 1.0, 1).is_ok());
    }

    #[test]
    fn test_generation_config_rejects_negative_temperature() {
        assert!(GenerationConfig::new(-0.1, 0.9, 64).is_err());
        assert!(GenerationConfig::new(f32::NAN, 0.9, 64).is_err());
    }

    #[test]
    fn test_generation_config_rejects_top_p_out_of_range() {
        assert!(GenerationConfig::new(0.6, 0.0, 64).is_err());
        assert!(GenerationConfig::new(0.6, 1.5, 64).is_err());
    }

    #[test]
    fn test_generation_config_rejects_zero_length() {
        let Err(err) = GenerationConfig::new(0.6, 0.9, 0) else {
            panic!("expected an error");
        };
        assert!(err.to_string().contains("max_gen_len"));
    }
}
