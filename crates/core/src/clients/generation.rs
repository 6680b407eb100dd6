//! Client for the AI Generation Service.

use async_trait::async_trait;
use ct_protocol::config_models::ServiceConfig;
use ct_protocol::language_models::Language;
use ct_protocol::wire_models::{GenerateRequest, GenerateResponse, GENERATE_PATH};
use std::time::Duration;
use tracing::{debug, warn};

use super::error::GenerationError;
use super::{endpoint_url, send_json, with_deadline, CallFailure};

/// Produces test code for a piece of source text.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate a test suite for `source` written in `language`.
    ///
    /// A single attempt is made. Every failure collapses into one
    /// [`GenerationError`].
    async fn generate(&self, source: &str, language: Language) -> Result<String, GenerationError>;
}

/// HTTP adapter for `POST /chat`.
pub struct HttpGenerationClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Option<Duration>,
}

impl HttpGenerationClient {
    /// Create a client sharing an existing connection pool.
    pub fn new(http: reqwest::Client, config: &ServiceConfig) -> Self {
        Self {
            http,
            endpoint: endpoint_url(&config.generation_url, GENERATE_PATH),
            timeout: config.generation_timeout_ms.map(Duration::from_millis),
        }
    }

    /// Create a client with its own connection pool.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(reqwest::Client::new(), config)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(&self, source: &str, language: Language) -> Result<String, GenerationError> {
        let body = GenerateRequest {
            text: source.to_string(),
            language,
        };
        debug!(endpoint = %self.endpoint, %language, bytes = source.len(), "requesting tests");

        let request = self.http.post(&self.endpoint).json(&body);
        let result = with_deadline(self.timeout, send_json::<GenerateResponse>(request))
            .await
            .and_then(|response| {
                let tests = strip_code_fences(&response.response);
                if tests.is_empty() {
                    Err(CallFailure::Response("empty test code".to_string()))
                } else {
                    Ok(tests)
                }
            });

        result.map_err(|failure| {
            let detail = match failure {
                CallFailure::Transport(detail) => format!("transport: {detail}"),
                CallFailure::Response(detail) => format!("response: {detail}"),
                CallFailure::TimedOut => format!("timed out after {:?}", self.timeout),
            };
            warn!(endpoint = %self.endpoint, %detail, "test generation failed");
            GenerationError { detail }
        })
    }
}

/// Remove a surrounding markdown code fence from generated code.
///
/// Drops a leading line starting with three backticks (with or without a
/// language tag) and a trailing fence line, then trims whitespace.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let mut lines: Vec<&str> = trimmed.lines().collect();
    if lines.first().is_some_and(|line| line.starts_with("```")) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|line| line.trim().starts_with("```")) {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}
