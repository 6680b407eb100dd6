//! Service configuration models for `.codetest-kit/config.toml`.
//!
//! This module defines where the two remote services live and how long the
//! caller is willing to wait for them.

use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

/// Default base URL of the AI Generation Service.
pub const DEFAULT_GENERATION_URL: &str = "http://127.0.0.1:8000";

/// Default base URL of the Sandbox Execution Service.
pub const DEFAULT_EXECUTION_URL: &str = "http://127.0.0.1:8001";

/// Default caller-side bound on a project archive run, in milliseconds.
pub const DEFAULT_ARCHIVE_TIMEOUT_MS: u64 = 310_000;

/// Represents service settings from `.codetest-kit/config.toml`.
///
/// Every field is optional in the file; missing fields take the defaults
/// documented on each field.
///
/// # Example
///
/// ```toml
/// # .codetest-kit/config.toml
/// generation_url = "http://127.0.0.1:8000"
/// execution_url = "http://127.0.0.1:8001"
/// archive_timeout_ms = 310000
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the AI Generation Service. Default [`DEFAULT_GENERATION_URL`].
    pub generation_url: String,

    /// Base URL of the Sandbox Execution Service. Default [`DEFAULT_EXECUTION_URL`].
    pub execution_url: String,

    /// Upper bound on `/run-project-zip`, end to end. Default 310 000 ms.
    pub archive_timeout_ms: u64,

    /// Optional upper bound on `/chat`. Unset means no caller bound.
    pub generation_timeout_ms: Option<u64>,

    /// Optional upper bound on `/run-test`. Unset means no caller bound.
    pub single_run_timeout_ms: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            generation_url: DEFAULT_GENERATION_URL.to_string(),
            execution_url: DEFAULT_EXECUTION_URL.to_string(),
            archive_timeout_ms: DEFAULT_ARCHIVE_TIMEOUT_MS,
            generation_timeout_ms: None,
            single_run_timeout_ms: None,
        }
    }
}
