//! Error types for the remote service clients.
//!
//! `Display` renders the coarse, user-facing category. The raw transport
//! detail stays in the `detail` fields and is only logged.

use thiserror::Error;

/// The generation stage failed. Sub-causes are not distinguished.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Could not reach the test generation service. Please make sure it is running.")]
pub struct GenerationError {
    /// Transport, status or parse detail, for diagnostics only.
    pub detail: String,
}

/// The execution stage failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// The sandbox could not be reached.
    #[error("Could not reach the sandbox execution service. Please make sure it is running.")]
    Unreachable { detail: String },

    /// The sandbox answered with an error status or an unreadable body.
    #[error("The sandbox execution service returned an unexpected response.")]
    BadResponse { detail: String },

    /// The archive bytes could not be read from disk.
    #[error("Could not read the project archive '{display_name}'.")]
    ArchiveUnreadable { display_name: String, detail: String },

    /// The caller-side time bound was exceeded.
    #[error("{}", timeout_message(.endpoint, .limit_ms))]
    Timeout {
        endpoint: &'static str,
        limit_ms: u64,
    },
}

impl ExecutionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExecutionError::Timeout { .. })
    }
}

fn timeout_message(endpoint: &str, limit_ms: &u64) -> String {
    let seconds = limit_ms / 1000;
    if endpoint == ct_protocol::wire_models::RUN_PROJECT_PATH {
        format!(
            "Request to {endpoint} timed out after {seconds} seconds. \
             The project may be too large or dependency installation too slow."
        )
    } else {
        format!("Request to {endpoint} timed out after {seconds} seconds.")
    }
}
