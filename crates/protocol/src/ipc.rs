//! Inter-process communication protocol.
//!
//! This module defines the message types for asynchronous communication
//! between a user interface (CLI, web client) and the Core (pipeline logic).
//!
//! The protocol follows an Operation/Event pattern:
//! - `Op`: Commands sent from the UI to the Core
//! - `Event`: Status updates sent from the Core to the UI
//!
//! Communication is asynchronous and channel-based, allowing the UI to
//! remain responsive while a run waits on the remote services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use ts_rs::TS;
use uuid::Uuid;

use crate::language_models::{Language, Mode};
use crate::run_models::{PipelineError, PipelineOutcome, RunStatus, UploadedArchive};

/// Operations sent from the UI to the Core logic.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "setLanguage",
///   "payload": { "language": "java" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Switch between single-file and project-archive workflows.
    ///
    /// Refused while a run is in flight.
    SetMode { mode: Mode },

    /// Switch the active language and reset the source to its sample.
    ///
    /// Refused while a run is in flight.
    SetLanguage { language: Language },

    /// Replace the single-file source text. Allowed at any time.
    UpdateSource { text: String },

    /// Offer a file as the project archive.
    SelectArchive {
        #[ts(type = "string")]
        path: PathBuf,
        /// Declared media type, when the UI knows it.
        media_type: Option<String>,
    },

    /// Drop the selected archive, if any.
    ClearArchive,

    /// Start a run in the current mode.
    ///
    /// Dropped if a run is already in flight.
    StartRun,

    /// Request a full snapshot of the session state.
    GetSnapshot,

    /// Stop processing operations.
    Shutdown,
}

/// Events sent from the Core logic to the UI.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "stateChanged",
///   "payload": {
///     "run_id": "uuid-here",
///     "status": "RUNNING"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// The workflow mode changed and run state was reset.
    ModeChanged { mode: Mode },

    /// The language changed; `source` is the new sample source.
    LanguageChanged { language: Language, source: String },

    /// A project archive passed validation and is now selected.
    ArchiveSelected { display_name: String },

    /// The selected archive was dropped.
    ArchiveCleared,

    /// A run attempt was accepted.
    RunStarted {
        #[ts(type = "string")]
        run_id: Uuid,
        mode: Mode,
        language: Language,
        #[ts(type = "string")]
        started_at: DateTime<Utc>,
    },

    /// The pipeline moved to a new status.
    StateChanged {
        #[ts(type = "string | null")]
        run_id: Option<Uuid>,
        status: RunStatus,
    },

    /// The generation stage produced test code.
    TestsGenerated {
        #[ts(type = "string")]
        run_id: Uuid,
        test_code: String,
    },

    /// Diagnostic progress line for a run.
    LogChunk {
        #[ts(type = "string")]
        run_id: Uuid,
        content: String,
    },

    /// The result card of a run.
    OutcomePublished {
        #[ts(type = "string")]
        run_id: Uuid,
        outcome: PipelineOutcome,
    },

    /// A stage error. Not tied to a run when raised by archive selection.
    ErrorPublished {
        #[ts(type = "string | null")]
        run_id: Option<Uuid>,
        error: PipelineError,
    },

    /// A run attempt reached a terminal status.
    RunFinished {
        #[ts(type = "string")]
        run_id: Uuid,
        status: RunStatus,
        #[ts(type = "string")]
        finished_at: DateTime<Utc>,
    },

    /// An operation was refused, e.g. a mode change during a run.
    RequestRefused { reason: String },

    /// Full session state, sent in reply to `GetSnapshot`.
    Snapshot { snapshot: SessionSnapshot },
}

/// A read-only copy of the session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub language: Language,
    pub source: String,
    pub archive: Option<UploadedArchive>,
    pub generated_tests: Option<String>,
    pub outcome: Option<PipelineOutcome>,
    pub error: Option<PipelineError>,
    pub status: RunStatus,
}
