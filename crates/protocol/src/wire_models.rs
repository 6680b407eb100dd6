//! Request and response bodies of the remote services.
//!
//! - AI Generation Service: `POST /chat`
//! - Sandbox Execution Service: `POST /run-test` and `POST /run-project-zip`
//!
//! The `/run-project-zip` request is multipart form data and has no body type
//! here; its form field names are exported as constants instead. Both sandbox
//! endpoints answer with a [`PipelineOutcome`](crate::run_models::PipelineOutcome).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::language_models::Language;

/// Path of the generation endpoint.
pub const GENERATE_PATH: &str = "/chat";

/// Path of the single-file execution endpoint.
pub const RUN_TEST_PATH: &str = "/run-test";

/// Path of the project-archive execution endpoint.
pub const RUN_PROJECT_PATH: &str = "/run-project-zip";

/// Multipart field carrying the archive binary.
pub const ARCHIVE_FIELD: &str = "zip_file";

/// Multipart field carrying the language tag.
pub const LANGUAGE_FIELD: &str = "language";

/// Body of `POST /chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct GenerateRequest {
    /// The user's source text.
    pub text: String,
    pub language: Language,
}

/// Response of `POST /chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct GenerateResponse {
    /// The generated test code.
    pub response: String,
}

/// Body of `POST /run-test`.
///
/// `code` is the empty string for java, whose generated test file already
/// embeds the user's code.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct RunTestRequest {
    pub language: Language,
    pub code: String,
    pub test_code: String,
}
