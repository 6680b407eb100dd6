//! Scripted client implementations for testing.

use async_trait::async_trait;
use ct_protocol::language_models::Language;
use ct_protocol::run_models::{PipelineOutcome, UploadedArchive};
use ct_protocol::wire_models::RunTestRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::error::{ExecutionError, GenerationError};
use super::execution::{single_run_request, ExecutionClient};
use super::generation::GenerationClient;

/// A generation client that returns a fixed result and records its inputs.
#[derive(Clone)]
pub struct MockGenerationClient {
    result: Result<String, GenerationError>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<(String, Language)>>>,
}

impl MockGenerationClient {
    pub fn new(result: Result<String, GenerationError>) -> Self {
        Self {
            result,
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn success(test_code: &str) -> Self {
        Self::new(Ok(test_code.to_string()))
    }

    pub fn failing() -> Self {
        Self::new(Err(GenerationError {
            detail: "Mock failure".to_string(),
        }))
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Inputs of every call so far.
    pub async fn calls(&self) -> Vec<(String, Language)> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn generate(&self, source: &str, language: Language) -> Result<String, GenerationError> {
        self.calls.lock().await.push((source.to_string(), language));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}

/// A call received by [`MockExecutionClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionCall {
    /// The `/run-test` body the HTTP adapter would have sent.
    Single(RunTestRequest),
    Archive {
        language: Language,
        archive: UploadedArchive,
    },
}

/// An execution client that returns a fixed result and records its inputs.
#[derive(Clone)]
pub struct MockExecutionClient {
    result: Result<PipelineOutcome, ExecutionError>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<ExecutionCall>>>,
}

impl MockExecutionClient {
    pub fn new(result: Result<PipelineOutcome, ExecutionError>) -> Self {
        Self {
            result,
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn passing(summary: &str) -> Self {
        Self::new(Ok(PipelineOutcome {
            success: true,
            summary: summary.to_string(),
            output: "Mock output".to_string(),
        }))
    }

    pub fn failing(error: ExecutionError) -> Self {
        Self::new(Err(error))
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn calls(&self) -> Vec<ExecutionCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    async fn answer(&self, call: ExecutionCall) -> Result<PipelineOutcome, ExecutionError> {
        self.calls.lock().await.push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}

#[async_trait]
impl ExecutionClient for MockExecutionClient {
    async fn run_single(
        &self,
        language: Language,
        code: &str,
        test_code: &str,
    ) -> Result<PipelineOutcome, ExecutionError> {
        let request = single_run_request(language, code, test_code);
        self.answer(ExecutionCall::Single(request)).await
    }

    async fn run_archive(
        &self,
        language: Language,
        archive: &UploadedArchive,
    ) -> Result<PipelineOutcome, ExecutionError> {
        self.answer(ExecutionCall::Archive {
            language,
            archive: archive.clone(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_generation_records_calls() {
        let client = MockGenerationClient::success("tests");
        let result = client.generate("code", Language::Python).await;

        assert_eq!(result, Ok("tests".to_string()));
        assert_eq!(
            client.calls().await,
            vec![("code".to_string(), Language::Python)]
        );
    }

    #[tokio::test]
    async fn test_mock_generation_failing() {
        let client = MockGenerationClient::failing();
        assert!(client.generate("code", Language::Java).await.is_err());
        assert_eq!(client.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_mock_execution_applies_java_rule() {
        let client = MockExecutionClient::passing("ok");
        client
            .run_single(Language::Java, "class A {}", "class TestRunner {}")
            .await
            .unwrap();

        match &client.calls().await[0] {
            ExecutionCall::Single(request) => assert_eq!(request.code, ""),
            other => panic!("Expected single call, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mock_clones_share_call_log() {
        let client = MockExecutionClient::passing("ok");
        let clone = client.clone();
        clone
            .run_single(Language::Python, "x = 1", "assert x == 1")
            .await
            .unwrap();
        assert_eq!(client.call_count().await, 1);
    }
}
