//! Gemini assistant - Generative Language REST API over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use planner_core::domain::PostScore;
use planner_core::ports::{AssistError, ContentAssistant};

use super::prompts;

/// Gemini client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash";
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: Self::DEFAULT_MODEL.to_string(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Load from `GEMINI_API_KEY` (or `API_KEY`), `GEMINI_MODEL`, `GEMINI_BASE_URL`.
    /// Returns `None` when no key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty())?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.model = model;
        }
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(secs) = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        Some(config)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

/// Assistant backed by the Gemini `generateContent` endpoint.
pub struct GeminiAssistant {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiAssistant {
    pub fn new(config: GeminiConfig) -> Result<Self, AssistError> {
        Self::build(reqwest::Client::builder(), config)
    }

    fn build(builder: reqwest::ClientBuilder, config: GeminiConfig) -> Result<Self, AssistError> {
        let client = builder
            .timeout(config.timeout)
            .build()
            .map_err(|e| AssistError::Remote(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send one prompt. With a schema the model answers in JSON.
    async fn generate(&self, prompt: String, schema: Option<Value>) -> Result<String, AssistError> {
        let mut body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        });
        if let Some(schema) = schema {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema
            });
        }

        tracing::debug!(model = %self.config.model, "Calling Gemini");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistError::Remote(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(%status, "Gemini request rejected");
            return Err(AssistError::Remote(format!(
                "{status}: {}",
                truncate(&detail, 200)
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AssistError::InvalidResponse(e.to_string()))?;

        parsed
            .text()
            .ok_or_else(|| AssistError::InvalidResponse("response contained no text".to_string()))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn parse_ideas(raw: &str) -> Result<Vec<String>, AssistError> {
    serde_json::from_str(raw.trim()).map_err(|e| {
        AssistError::InvalidResponse(format!("expected a JSON array of strings: {e}"))
    })
}

fn parse_score(raw: &str) -> Result<PostScore, AssistError> {
    let score: PostScore = serde_json::from_str(raw.trim())
        .map_err(|e| AssistError::InvalidResponse(format!("malformed score: {e}")))?;
    score.validate().map_err(AssistError::InvalidResponse)?;
    Ok(score)
}

#[async_trait]
impl ContentAssistant for GeminiAssistant {
    async fn check_readiness(
        &self,
        content: &[String],
        tones: &[String],
    ) -> Result<String, AssistError> {
        self.generate(prompts::readiness(content, tones), None).await
    }

    async fn suggest_hashtags(&self, content: &[String]) -> Result<String, AssistError> {
        self.generate(prompts::hashtags(content), None).await
    }

    async fn brainstorm_ideas(&self, topic: Option<&str>) -> Result<Vec<String>, AssistError> {
        let raw = self
            .generate(prompts::brainstorm(topic), Some(prompts::brainstorm_schema()))
            .await?;
        parse_ideas(&raw)
    }

    async fn rephrase(&self, text: &str, tones: &[String]) -> Result<String, AssistError> {
        let raw = self.generate(prompts::rephrase(text, tones), None).await?;
        Ok(raw.trim().to_string())
    }

    async fn format(&self, text: &str, tones: &[String]) -> Result<String, AssistError> {
        let raw = self.generate(prompts::format(text, tones), None).await?;
        Ok(raw.trim().to_string())
    }

    async fn analyze_post(&self, text: &str) -> Result<String, AssistError> {
        self.generate(prompts::analyze(text), None).await
    }

    async fn score_post(
        &self,
        content: &[String],
        tones: &[String],
    ) -> Result<PostScore, AssistError> {
        let raw = self
            .generate(prompts::score(content, tones), Some(prompts::score_schema()))
            .await?;
        parse_score(&raw)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serve a single canned response on a local port, returning the base URL.
    async fn serve_once(status: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{addr}/v1beta")
    }

    /// Drain headers and the declared body so the client sees a clean reply.
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);

            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length: usize = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }

    fn local_assistant(base_url: String) -> GeminiAssistant {
        let mut config = GeminiConfig::new("test-key");
        config.base_url = base_url;
        config.timeout = Duration::from_secs(5);
        GeminiAssistant::build(reqwest::Client::builder().no_proxy(), config).unwrap()
    }

    #[tokio::test]
    async fn test_generate_returns_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Ship it"}]}}]}"#;
        let assistant = local_assistant(serve_once("200 OK", body.to_string()).await);

        let text = assistant.generate("prompt".to_string(), None).await.unwrap();
        assert_eq!(text, "Ship it");
    }

    #[tokio::test]
    async fn test_generate_rejected_status_is_remote_error() {
        let detail = "overloaded ".repeat(50);
        let assistant = local_assistant(serve_once("503 Service Unavailable", detail).await);

        let err = assistant.generate("prompt".to_string(), None).await.unwrap_err();
        let message = match err {
            AssistError::Remote(message) => message,
            other => panic!("expected remote error, got {other:?}"),
        };
        assert!(message.starts_with("503"), "{message}");
        assert!(message.ends_with("..."), "{message}");
        assert!(message.len() < 300, "{message}");
    }

    #[tokio::test]
    async fn test_generate_without_text_is_invalid_response() {
        let body = r#"{"candidates":[{"content":{"parts":[]}}]}"#;
        let assistant = local_assistant(serve_once("200 OK", body.to_string()).await);

        let err = assistant.generate("prompt".to_string(), None).await.unwrap_err();
        assert!(matches!(err, AssistError::InvalidResponse(_)), "{err:?}");
    }

    #[test]
    fn test_response_text_joins_parts() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.text().as_deref(), Some("Hello world"));
    }

    #[test]
    fn test_response_without_candidates() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"promptFeedback":{}}"#).unwrap();
        assert_eq!(parsed.text(), None);
    }

    #[test]
    fn test_parse_ideas() {
        let ideas = parse_ideas(r#" ["one #a", "two #b"] "#).unwrap();
        assert_eq!(ideas, vec!["one #a", "two #b"]);
        assert!(matches!(
            parse_ideas(r#"{"ideas": []}"#),
            Err(AssistError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_score_rejects_out_of_range() {
        let raw = r#"{
            "engagement": {"score": 12, "rationale": "a"},
            "clarity": {"score": 5, "rationale": "b"},
            "toneAlignment": {"score": 5, "rationale": "c"},
            "overall": {"score": 5, "rationale": "d"}
        }"#;
        assert!(matches!(parse_score(raw), Err(AssistError::InvalidResponse(_))));
    }

    #[test]
    fn test_endpoint() {
        let mut config = GeminiConfig::new("key");
        config.base_url = "http://localhost:9000/v1beta/".to_string();
        let assistant = GeminiAssistant::new(config).unwrap();
        assert_eq!(
            assistant.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
