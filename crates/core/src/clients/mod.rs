//! Remote service clients.
//!
//! Each service sits behind a trait:
//! - [`GenerationClient`]: AI Generation Service, `POST /chat`
//! - [`ExecutionClient`]: Sandbox Execution Service, `POST /run-test` and
//!   `POST /run-project-zip`
//!
//! HTTP adapters talk to the real services; the mock adapters are scripted
//! stand-ins used by tests. None of the clients retry.

pub mod error;
pub mod execution;
pub mod generation;
pub mod mock;

pub use error::{ExecutionError, GenerationError};
pub use execution::{single_run_request, ExecutionClient, HttpExecutionClient};
pub use generation::{strip_code_fences, GenerationClient, HttpGenerationClient};
pub use mock::{ExecutionCall, MockExecutionClient, MockGenerationClient};

use std::future::Future;
use std::time::Duration;

/// Why a remote call did not produce a value.
#[derive(Debug)]
pub(crate) enum CallFailure {
    /// The request could not be sent or the connection dropped.
    Transport(String),
    /// The service answered, but not with a usable body.
    Response(String),
    /// The caller-side bound elapsed first.
    TimedOut,
}

/// Join a base URL and an endpoint path without doubling slashes.
pub(crate) fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Await `call`, bounded by `limit` when one is configured.
pub(crate) async fn with_deadline<T, F>(limit: Option<Duration>, call: F) -> Result<T, CallFailure>
where
    F: Future<Output = Result<T, CallFailure>>,
{
    match limit {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(CallFailure::TimedOut),
        },
        None => call.await,
    }
}

/// Send a prepared request and decode a JSON body of type `T`.
pub(crate) async fn send_json<T>(request: reqwest::RequestBuilder) -> Result<T, CallFailure>
where
    T: serde::de::DeserializeOwned,
{
    let response = request
        .send()
        .await
        .map_err(|e| CallFailure::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable>".to_string());
        return Err(CallFailure::Response(format!("status {status}: {body}")));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| CallFailure::Response(format!("malformed body: {e}")))
}
