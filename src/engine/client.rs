use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{EngineConfig, EngineError, GenerationConfig, GenerationEngine, Reply};
use crate::transcript::{Role, Turn};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    max_tokens: usize,
    temperature: f32,
    top_p: f32,
    stream: bool,
}

impl<'a> ChatCompletionRequest<'a> {
    fn new(model: &'a str, messages: &'a [Turn], params: &GenerationConfig) -> Self {
        Self {
            model,
            messages,
            max_tokens: params.max_gen_len(),
            temperature: params.temperature(),
            top_p: params.top_p(),
            stream: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

/// Generation engine backed by an OpenAI-compatible chat completion server
/// (llama.cpp server, vLLM, Ollama) that serves the configured checkpoint.
#[derive(Debug)]
pub struct ChatCompletionEngine {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
    max_seq_len: usize,
    max_batch_size: usize,
}

impl ChatCompletionEngine {
    /// Validates the checkpoint and tokenizer locations and prepares the
    /// HTTP client. Nothing is sent over the network until [`generate`].
    ///
    /// [`generate`]: GenerationEngine::generate
    pub fn build(config: EngineConfig) -> Result<Self, EngineError> {
        if !config.ckpt_dir.is_dir() {
            return Err(EngineError::Init(format!(
                "checkpoint directory not found: {}",
                config.ckpt_dir.display()
            )));
        }
        if !config.tokenizer_path.is_file() {
            return Err(EngineError::Init(format!(
                "tokenizer file not found: {}",
                config.tokenizer_path.display()
            )));
        }
        if config.max_seq_len == 0 {
            return Err(EngineError::Init(
                "max_seq_len must be at least 1".to_string(),
            ));
        }
        if config.max_batch_size == 0 {
            return Err(EngineError::Init(
                "max_batch_size must be at least 1".to_string(),
            ));
        }

        let model = model_id(&config);
        let url = format!(
            "{}/v1/chat/completions",
            config.endpoint.trim_end_matches('/')
        );
        tracing::debug!(%url, %model, max_seq_len = config.max_seq_len, "engine built");

        Ok(Self {
            client: Client::new(),
            url,
            model,
            api_key: config.api_key,
            max_seq_len: config.max_seq_len,
            max_batch_size: config.max_batch_size,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub const fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    async fn complete(
        &self,
        messages: &[Turn],
        params: &GenerationConfig,
    ) -> Result<Reply, EngineError> {
        let body = ChatCompletionRequest::new(&self.model, messages, params);

        let mut http_request = self.client.post(&self.url).json(&body);
        if let Some(api_key) = &self.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {api_key}"));
        }

        tracing::debug!(turns = messages.len(), "sending chat completion request");
        let response = http_request
            .send()
            .await
            .map_err(|source| EngineError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| EngineError::Request {
            url: self.url.clone(),
            source,
        })?;
        if !status.is_success() {
            return Err(EngineError::Status { status, body: text });
        }

        parse_reply(&text)
    }
}

#[async_trait]
impl GenerationEngine for ChatCompletionEngine {
    async fn generate(
        &self,
        batch: &[Vec<Turn>],
        params: &GenerationConfig,
    ) -> Result<Vec<Reply>, EngineError> {
        if batch.len() > self.max_batch_size {
            return Err(EngineError::BatchTooLarge {
                size: batch.len(),
                max: self.max_batch_size,
            });
        }

        let mut replies = Vec::with_capacity(batch.len());
        for messages in batch {
            replies.push(self.complete(messages, params).await?);
        }
        Ok(replies)
    }
}

/// The server identifies the model by the checkpoint directory name.
fn model_id(config: &EngineConfig) -> String {
    config.ckpt_dir.file_name().map_or_else(
        || config.ckpt_dir.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

fn parse_role(role: &str) -> Result<Role, EngineError> {
    match role {
        "assistant" => Ok(Role::Assistant),
        "user" => Ok(Role::User),
        "system" => Ok(Role::System),
        other => Err(EngineError::Malformed(format!("unknown role '{other}'"))),
    }
}

fn parse_reply(body: &str) -> Result<Reply, EngineError> {
    let response: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| EngineError::Malformed(e.to_string()))?;

    let mut choices = response.choices.into_iter();
    let choice = choices
        .next()
        .ok_or_else(|| EngineError::Malformed("response contained no choices".to_string()))?;
    if choices.next().is_some() {
        return Err(EngineError::UnexpectedReply(
            "more than one choice for a single transcript".to_string(),
        ));
    }

    Ok(Reply {
        role: parse_role(&choice.message.role)?,
        content: choice.message.content.unwrap_or_default(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn engine_config(dir: &TempDir) -> EngineConfig {
        let ckpt_dir = dir.path().join("llama-2-7b-chat");
        std::fs::create_dir(&ckpt_dir).unwrap();
        let tokenizer_path = dir.path().join("tokenizer.model");
        std::fs::write(&tokenizer_path, b"tok").unwrap();
        EngineConfig {
            ckpt_dir,
            tokenizer_path,
            endpoint: "http://localhost:8080/".to_string(),
            api_key: None,
            max_seq_len: 512,
            max_batch_size: 1,
        }
    }

    #[test]
    fn test_build_uses_checkpoint_name_as_model() {
        let dir = TempDir::new().unwrap();
        let engine = ChatCompletionEngine::build(engine_config(&dir)).unwrap();
        assert_eq!(engine.model(), "llama-2-7b-chat");
        assert_eq!(engine.url, "http://localhost:8080/v1/chat/completions");
        assert_eq!(engine.max_seq_len(), 512);
    }

    #[test]
    fn test_build_rejects_missing_checkpoint() {
        let dir = TempDir::new().unwrap();
        let mut config = engine_config(&dir);
        config.ckpt_dir = dir.path().join("missing");
        let err = ChatCompletionEngine::build(config).unwrap_err();
        assert!(matches!(err, EngineError::Init(_)));
        assert!(err.to_string().contains("checkpoint directory not found"));
    }

    #[test]
    fn test_build_rejects_missing_tokenizer() {
        let dir = TempDir::new().unwrap();
        let mut config = engine_config(&dir);
        config.tokenizer_path = dir.path().join("nope.model");
        let err = ChatCompletionEngine::build(config).unwrap_err();
        assert!(err.to_string().contains("tokenizer file not found"));
    }

    #[test]
    fn test_build_rejects_zero_limits() {
        let dir = TempDir::new().unwrap();
        let mut config = engine_config(&dir);
        config.max_batch_size = 0;
        assert!(ChatCompletionEngine::build(config).is_err());
    }

    #[tokio::test]
    async fn test_generate_rejects_oversized_batch() {
        let dir = TempDir::new().unwrap();
        let engine = ChatCompletionEngine::build(engine_config(&dir)).unwrap();
        let params = GenerationConfig::new(0.6, 0.9, 16).unwrap();
        let batch = vec![vec![Turn::user("a")], vec![Turn::user("b")]];

        let err = engine.generate(&batch, &params).await.unwrap_err();
        assert!(matches!(err, EngineError::BatchTooLarge { size: 2, max: 1 }));
    }

    #[test]
    fn test_request_serializes_turns() {
        let messages = [Turn::system("Be brief."), Turn::user("hello")];
        let params = GenerationConfig::new(0.5, 0.9, 64).unwrap();
        let request = ChatCompletionRequest::new("llama", &messages, &params);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["max_tokens"], 64);
        assert!((json["temperature"].as_f64().unwrap() - 0.5).abs() < 1e-6);
        assert!((json["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
        assert_eq!(json["model"], "llama");
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_parse_reply_assistant() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"OK"}}]}"#;
        assert_eq!(parse_reply(body).unwrap(), Reply::assistant("OK"));
    }

    #[test]
    fn test_parse_reply_null_content_is_empty() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert_eq!(parse_reply(body).unwrap().content, "");
    }

    #[test]
    fn test_parse_reply_keeps_non_assistant_role() {
        let body = r#"{"choices":[{"message":{"role":"user","content":"hi"}}]}"#;
        assert_eq!(parse_reply(body).unwrap().role, Role::User);
    }

    #[test]
    fn test_parse_reply_no_choices() {
        let body = r#"{"choices":[]}"#;
        assert!(matches!(parse_reply(body), Err(EngineError::Malformed(_))));
    }

    #[test]
    fn test_parse_reply_multiple_choices() {
        let body = r#"{"choices":[
            {"message":{"role":"assistant","content":"a"}},
            {"message":{"role":"assistant","content":"b"}}
        ]}"#;
        assert!(matches!(
            parse_reply(body),
            Err(EngineError::UnexpectedReply(_))
        ));
    }

    #[test]
    fn test_parse_reply_invalid_json() {
        assert!(matches!(
            parse_reply("not json"),
            Err(EngineError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_reply_unknown_role() {
        let body = r#"{"choices":[{"message":{"role":"tool","content":"x"}}]}"#;
        assert!(matches!(parse_reply(body), Err(EngineError::Malformed(_))));
    }
}
