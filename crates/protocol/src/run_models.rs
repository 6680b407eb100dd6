//! Run result and run state models.
//!
//! These are the values presented to the user after a pipeline run:
//! a [`PipelineOutcome`] result card and, independently, a [`PipelineError`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use ts_rs::TS;

/// The terminal, displayable result of one run.
///
/// This is also the exact response body of both sandbox endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct PipelineOutcome {
    pub success: bool,
    pub summary: String,
    pub output: String,
}

impl PipelineOutcome {
    /// Build a failed outcome card.
    pub fn failed(summary: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            success: false,
            summary: summary.into(),
            output: output.into(),
        }
    }
}

/// The pipeline stage an error originated from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStage {
    Generation,
    Execution,
    Validation,
}

impl fmt::Display for ErrorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorStage::Generation => f.write_str("generation"),
            ErrorStage::Execution => f.write_str("execution"),
            ErrorStage::Validation => f.write_str("validation"),
        }
    }
}

/// A user-facing error, published independently of the outcome card.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct PipelineError {
    pub stage: ErrorStage,
    pub message: String,
}

impl PipelineError {
    pub fn new(stage: ErrorStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.stage, self.message)
    }
}

/// Flat lifecycle status of the pipeline, as reported to UIs.
///
/// The status progresses through these states during a run:
/// Idle -> Generating -> Running -> Done
///
/// Archive runs skip Generating. Any stage may end in Failed.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// No run has been attempted yet.
    Idle,

    /// Waiting for the generation service to return test code.
    Generating,

    /// Waiting for the sandbox to execute the tests.
    Running,

    /// The sandbox returned a result.
    Done,

    /// A stage failed; see the published error.
    Failed,
}

impl RunStatus {
    /// Whether a run is currently in flight.
    pub fn is_in_flight(self) -> bool {
        matches!(self, RunStatus::Generating | RunStatus::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Idle => "IDLE",
            RunStatus::Generating => "GENERATING",
            RunStatus::Running => "RUNNING",
            RunStatus::Done => "DONE",
            RunStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated project archive selected for upload.
///
/// Exists only in project-archive mode and only for the current session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct UploadedArchive {
    /// Location of the archive bytes on disk.
    #[ts(type = "string")]
    pub path: PathBuf,

    /// File name shown to the user and sent as the multipart file name.
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_flight_statuses() {
        assert!(RunStatus::Generating.is_in_flight());
        assert!(RunStatus::Running.is_in_flight());
        assert!(!RunStatus::Idle.is_in_flight());
        assert!(!RunStatus::Done.is_in_flight());
        assert!(!RunStatus::Failed.is_in_flight());
    }

    #[test]
    fn test_failed_outcome_builder() {
        let outcome = PipelineOutcome::failed("Execution Failed", "boom");
        assert!(!outcome.success);
        assert_eq!(outcome.summary, "Execution Failed");
        assert_eq!(outcome.output, "boom");
    }

    #[test]
    fn test_pipeline_error_display() {
        let error = PipelineError::new(ErrorStage::Validation, "No project selected");
        assert_eq!(error.to_string(), "validation error: No project selected");
    }
}
