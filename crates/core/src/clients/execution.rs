//! Client for the Sandbox Execution Service.

use async_trait::async_trait;
use ct_protocol::config_models::ServiceConfig;
use ct_protocol::language_models::Language;
use ct_protocol::run_models::{PipelineOutcome, UploadedArchive};
use ct_protocol::wire_models::{
    RunTestRequest, ARCHIVE_FIELD, LANGUAGE_FIELD, RUN_PROJECT_PATH, RUN_TEST_PATH,
};
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, warn};

use super::error::ExecutionError;
use super::{endpoint_url, send_json, with_deadline, CallFailure};

/// Executes tests in the sandbox and reports a structured result.
///
/// Neither operation retries.
#[async_trait]
pub trait ExecutionClient: Send + Sync {
    /// Run generated tests against a single source file.
    async fn run_single(
        &self,
        language: Language,
        code: &str,
        test_code: &str,
    ) -> Result<PipelineOutcome, ExecutionError>;

    /// Run a whole project archive with its own test suite.
    async fn run_archive(
        &self,
        language: Language,
        archive: &UploadedArchive,
    ) -> Result<PipelineOutcome, ExecutionError>;
}

/// Build the `/run-test` body.
///
/// For java the user's code is withheld and `code` is sent empty: the
/// generated `TestRunner.java` already combines the code and its tests.
pub fn single_run_request(language: Language, code: &str, test_code: &str) -> RunTestRequest {
    let code = match language {
        Language::Java => String::new(),
        Language::Python | Language::Javascript => code.to_string(),
    };
    RunTestRequest {
        language,
        code,
        test_code: test_code.to_string(),
    }
}

/// HTTP adapter for the sandbox endpoints.
pub struct HttpExecutionClient {
    http: reqwest::Client,
    run_test_url: String,
    run_project_url: String,
    single_run_timeout: Option<Duration>,
    archive_timeout: Duration,
}

impl HttpExecutionClient {
    /// Create a client sharing an existing connection pool.
    pub fn new(http: reqwest::Client, config: &ServiceConfig) -> Self {
        Self {
            http,
            run_test_url: endpoint_url(&config.execution_url, RUN_TEST_PATH),
            run_project_url: endpoint_url(&config.execution_url, RUN_PROJECT_PATH),
            single_run_timeout: config.single_run_timeout_ms.map(Duration::from_millis),
            archive_timeout: Duration::from_millis(config.archive_timeout_ms),
        }
    }

    /// Create a client with its own connection pool.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(reqwest::Client::new(), config)
    }

    pub fn archive_timeout(&self) -> Duration {
        self.archive_timeout
    }

    fn map_failure(
        &self,
        failure: CallFailure,
        endpoint: &'static str,
        limit: Option<Duration>,
    ) -> ExecutionError {
        let error = match failure {
            CallFailure::Transport(detail) => ExecutionError::Unreachable { detail },
            CallFailure::Response(detail) => ExecutionError::BadResponse { detail },
            CallFailure::TimedOut => ExecutionError::Timeout {
                endpoint,
                limit_ms: limit.map(|d| d.as_millis() as u64).unwrap_or_default(),
            },
        };
        warn!(endpoint, error = ?error, "sandbox call failed");
        error
    }
}

#[async_trait]
impl ExecutionClient for HttpExecutionClient {
    async fn run_single(
        &self,
        language: Language,
        code: &str,
        test_code: &str,
    ) -> Result<PipelineOutcome, ExecutionError> {
        let body = single_run_request(language, code, test_code);
        debug!(
            endpoint = %self.run_test_url,
            %language,
            code_bytes = body.code.len(),
            test_bytes = body.test_code.len(),
            "submitting single-file run"
        );

        let request = self.http.post(&self.run_test_url).json(&body);
        with_deadline(self.single_run_timeout, send_json::<PipelineOutcome>(request))
            .await
            .map_err(|failure| self.map_failure(failure, RUN_TEST_PATH, self.single_run_timeout))
    }

    /// The archive timeout bounds the whole call, reading the archive from
    /// disk included.
    async fn run_archive(
        &self,
        language: Language,
        archive: &UploadedArchive,
    ) -> Result<PipelineOutcome, ExecutionError> {
        match tokio::time::timeout(self.archive_timeout, self.upload_archive(language, archive))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(self.map_failure(
                CallFailure::TimedOut,
                RUN_PROJECT_PATH,
                Some(self.archive_timeout),
            )),
        }
    }
}

impl HttpExecutionClient {
    async fn upload_archive(
        &self,
        language: Language,
        archive: &UploadedArchive,
    ) -> Result<PipelineOutcome, ExecutionError> {
        let bytes = tokio::fs::read(&archive.path).await.map_err(|e| {
            warn!(path = %archive.path.display(), error = %e, "archive read failed");
            ExecutionError::ArchiveUnreadable {
                display_name: archive.display_name.clone(),
                detail: e.to_string(),
            }
        })?;
        debug!(
            endpoint = %self.run_project_url,
            %language,
            archive = %archive.display_name,
            bytes = bytes.len(),
            "submitting project archive"
        );

        let part = Part::bytes(bytes)
            .file_name(archive.display_name.clone())
            .mime_str("application/zip")
            .map_err(|e| ExecutionError::BadResponse {
                detail: format!("invalid multipart part: {e}"),
            })?;
        let form = Form::new()
            .part(ARCHIVE_FIELD, part)
            .text(LANGUAGE_FIELD, language.as_str());

        let request = self.http.post(&self.run_project_url).multipart(form);
        send_json::<PipelineOutcome>(request)
            .await
            .map_err(|failure| self.map_failure(failure, RUN_PROJECT_PATH, None))
    }
}
