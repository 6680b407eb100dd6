//! Pipeline controller.
//!
//! The PipelineController owns the session and sequences one run attempt:
//! validate, generate (single-file mode only), execute, publish. Every
//! status change is mirrored on the events channel.

use crate::clients::{
    ExecutionClient, ExecutionError, GenerationClient, HttpExecutionClient, HttpGenerationClient,
};
use crate::state::machine::{RunState, TransitionError};
use crate::state::session::{ArchiveSelection, ChangeResult, Session, StartPlan};
use crate::upload::ArchiveCandidate;
use chrono::Utc;
use ct_protocol::config_models::ServiceConfig;
use ct_protocol::ipc::{Event, SessionSnapshot};
use ct_protocol::language_models::{Language, Mode};
use ct_protocol::run_models::{
    ErrorStage, PipelineError, PipelineOutcome, RunStatus, UploadedArchive,
};
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Summary of the failed outcome shown when a project run errors out.
pub const PROJECT_FAILURE_SUMMARY: &str = "Project Execution Failed";

/// Summary of the failed outcome shown when a single-file run errors out.
pub const SINGLE_FAILURE_SUMMARY: &str = "Test Execution Failed";

/// How a call to [`PipelineController::start`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// A run was already in flight; nothing happened.
    Ignored,
    /// The run reached a terminal state.
    Finished { run_id: Uuid, state: RunState },
}

/// Sequences the stages of a run and publishes their results.
///
/// The session lock is never held across a network call. A start request
/// that arrives while a run is in flight finds the in-flight state under the
/// lock and is dropped.
pub struct PipelineController {
    session: Arc<Mutex<Session>>,
    generator: Arc<dyn GenerationClient>,
    executor: Arc<dyn ExecutionClient>,
    events_tx: Sender<Event>,
}

impl PipelineController {
    /// Create a controller with a fresh session.
    ///
    /// # Arguments
    ///
    /// * `generator` - Client for the AI Generation Service
    /// * `executor` - Client for the Sandbox Execution Service
    /// * `events_tx` - Channel for sending events to the UI
    pub fn new(
        generator: Arc<dyn GenerationClient>,
        executor: Arc<dyn ExecutionClient>,
        events_tx: Sender<Event>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            generator,
            executor,
            events_tx,
        }
    }

    /// Create a controller backed by the HTTP clients, sharing one
    /// connection pool.
    pub fn from_config(config: &ServiceConfig, events_tx: Sender<Event>) -> Self {
        let http = reqwest::Client::new();
        Self::new(
            Arc::new(HttpGenerationClient::new(http.clone(), config)),
            Arc::new(HttpExecutionClient::new(http, config)),
            events_tx,
        )
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    pub async fn set_mode(&self, mode: Mode) -> ChangeResult {
        let result = self.session.lock().await.set_mode(mode);
        match result {
            ChangeResult::Applied => {
                info!(%mode, "mode changed");
                self.emit(Event::ModeChanged { mode }).await;
                self.emit_status(None, RunStatus::Idle).await;
            }
            ChangeResult::Refused => {
                self.refuse("Cannot change mode while a run is in progress.")
                    .await
            }
            ChangeResult::Unchanged => {}
        }
        result
    }

    pub async fn set_language(&self, language: Language) -> ChangeResult {
        let (result, source) = {
            let mut session = self.session.lock().await;
            let result = session.set_language(language);
            (result, session.source().to_string())
        };
        match result {
            ChangeResult::Applied => {
                info!(%language, "language changed");
                self.emit(Event::LanguageChanged { language, source }).await;
                self.emit_status(None, RunStatus::Idle).await;
            }
            ChangeResult::Refused => {
                self.refuse("Cannot change language while a run is in progress.")
                    .await
            }
            ChangeResult::Unchanged => {}
        }
        result
    }

    pub async fn update_source(&self, text: String) {
        self.session.lock().await.update_source(text);
    }

    /// Validate and hold an archive. A rejection publishes a validation
    /// error that is not tied to any run.
    pub async fn select_archive(&self, candidate: ArchiveCandidate) -> ArchiveSelection {
        let selection = self.session.lock().await.select_archive(&candidate);
        match &selection {
            ArchiveSelection::Selected(archive) => {
                info!(archive = %archive.display_name, "archive selected");
                self.emit(Event::ArchiveSelected {
                    display_name: archive.display_name.clone(),
                })
                .await;
            }
            ArchiveSelection::Rejected(err) => {
                warn!(path = %candidate.path.display(), error = %err, "archive rejected");
                self.emit(Event::ArchiveCleared).await;
                self.emit(Event::ErrorPublished {
                    run_id: None,
                    error: PipelineError::new(ErrorStage::Validation, err.to_string()),
                })
                .await;
            }
            ArchiveSelection::Refused => {
                self.refuse("Switch to project mode before selecting an archive.")
                    .await
            }
        }
        selection
    }

    pub async fn clear_archive(&self) {
        if self.session.lock().await.clear_archive() {
            self.emit(Event::ArchiveCleared).await;
        }
    }

    /// Run one attempt to completion: [`begin`](Self::begin) followed by
    /// [`complete`](Self::complete).
    ///
    /// Returns [`StartOutcome::Ignored`] without side effects when a run is
    /// already in flight.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] only if a stage result arrives in a
    /// state that cannot accept it.
    pub async fn start(&self) -> Result<StartOutcome, TransitionError> {
        let plan = self.begin().await?;
        self.complete(plan).await
    }

    /// Admit a run and announce it.
    ///
    /// The draft, language, mode and archive are captured here. Once this
    /// returns, the session is in flight and later changes are refused or
    /// only affect the next run.
    pub async fn begin(&self) -> Result<StartPlan, TransitionError> {
        let plan = self.session.lock().await.begin_run()?;

        match &plan {
            StartPlan::Ignored => debug!("start ignored: run already in flight"),
            StartPlan::Rejected { run_id, error } => {
                warn!(%run_id, error = %error, "run rejected");
                self.emit(Event::ErrorPublished {
                    run_id: Some(*run_id),
                    error: error.clone(),
                })
                .await;
            }
            StartPlan::Single {
                run_id, language, ..
            } => {
                self.announce(*run_id, Mode::SingleFile, *language, RunStatus::Generating)
                    .await;
            }
            StartPlan::Archive {
                run_id, language, ..
            } => {
                self.announce(
                    *run_id,
                    Mode::ProjectArchive,
                    *language,
                    RunStatus::Running,
                )
                .await;
            }
        }
        Ok(plan)
    }

    /// Run the remote stages of an admitted run and publish the final state.
    pub async fn complete(&self, plan: StartPlan) -> Result<StartOutcome, TransitionError> {
        let (run_id, state) = match plan {
            StartPlan::Ignored => return Ok(StartOutcome::Ignored),
            StartPlan::Rejected { run_id, error } => (run_id, RunState::Failed(error)),
            StartPlan::Single {
                run_id,
                language,
                source,
            } => (run_id, self.run_single(run_id, language, &source).await?),
            StartPlan::Archive {
                run_id,
                language,
                archive,
            } => (run_id, self.run_archive(run_id, language, &archive).await?),
        };

        let status = state.status();
        self.emit_status(Some(run_id), status).await;
        self.emit(Event::RunFinished {
            run_id,
            status,
            finished_at: Utc::now(),
        })
        .await;
        info!(%run_id, %status, "run finished");

        Ok(StartOutcome::Finished { run_id, state })
    }

    async fn run_single(
        &self,
        run_id: Uuid,
        language: Language,
        source: &str,
    ) -> Result<RunState, TransitionError> {
        self.log(run_id, format!("Generating {language} tests")).await;

        let test_code = match self.generator.generate(source, language).await {
            Ok(test_code) => test_code,
            Err(err) => {
                let error = PipelineError::new(ErrorStage::Generation, err.to_string());
                let state = self
                    .record(|session| session.record_generation_failure(error.clone()))
                    .await?;
                self.emit(Event::ErrorPublished {
                    run_id: Some(run_id),
                    error,
                })
                .await;
                return Ok(state);
            }
        };

        self.record(|session| session.record_tests(test_code.clone()))
            .await?;
        self.emit(Event::TestsGenerated {
            run_id,
            test_code: test_code.clone(),
        })
        .await;
        self.emit_status(Some(run_id), RunStatus::Running).await;
        self.log(run_id, "Running tests in the sandbox".to_string())
            .await;

        let result = self.executor.run_single(language, source, &test_code).await;
        self.publish_execution(run_id, Mode::SingleFile, result).await
    }

    async fn run_archive(
        &self,
        run_id: Uuid,
        language: Language,
        archive: &UploadedArchive,
    ) -> Result<RunState, TransitionError> {
        self.log(
            run_id,
            format!("Uploading {} to the sandbox", archive.display_name),
        )
        .await;

        let result = self.executor.run_archive(language, archive).await;
        self.publish_execution(run_id, Mode::ProjectArchive, result)
            .await
    }

    /// Record and publish the execution stage's result.
    ///
    /// An execution error is published twice: as the error and as a failed
    /// outcome whose output carries the error message.
    async fn publish_execution(
        &self,
        run_id: Uuid,
        mode: Mode,
        result: Result<PipelineOutcome, ExecutionError>,
    ) -> Result<RunState, TransitionError> {
        match result {
            Ok(outcome) => {
                let state = self
                    .record(|session| session.record_outcome(outcome.clone()))
                    .await?;
                debug!(%run_id, success = outcome.success, "outcome received");
                self.emit(Event::OutcomePublished { run_id, outcome }).await;
                Ok(state)
            }
            Err(err) => {
                let message = err.to_string();
                let summary = match mode {
                    Mode::SingleFile => SINGLE_FAILURE_SUMMARY,
                    Mode::ProjectArchive => PROJECT_FAILURE_SUMMARY,
                };
                let error = PipelineError::new(ErrorStage::Execution, message.clone());
                let outcome = PipelineOutcome::failed(summary, message);

                let state = self
                    .record(|session| {
                        session.record_execution_failure(error.clone(), outcome.clone())
                    })
                    .await?;
                self.emit(Event::ErrorPublished {
                    run_id: Some(run_id),
                    error,
                })
                .await;
                self.emit(Event::OutcomePublished { run_id, outcome }).await;
                Ok(state)
            }
        }
    }

    /// Apply a stage result and read the resulting state under one lock.
    async fn record<F>(&self, apply: F) -> Result<RunState, TransitionError>
    where
        F: FnOnce(&mut Session) -> Result<(), TransitionError>,
    {
        let mut session = self.session.lock().await;
        apply(&mut session)?;
        Ok(session.run_state().clone())
    }

    async fn announce(&self, run_id: Uuid, mode: Mode, language: Language, status: RunStatus) {
        info!(%run_id, %mode, %language, "run started");
        self.emit(Event::RunStarted {
            run_id,
            mode,
            language,
            started_at: Utc::now(),
        })
        .await;
        self.emit_status(Some(run_id), status).await;
    }

    async fn log(&self, run_id: Uuid, content: String) {
        self.emit(Event::LogChunk { run_id, content }).await;
    }

    async fn emit_status(&self, run_id: Option<Uuid>, status: RunStatus) {
        self.emit(Event::StateChanged { run_id, status }).await;
    }

    async fn refuse(&self, reason: &str) {
        debug!(reason, "request refused");
        self.emit(Event::RequestRefused {
            reason: reason.to_string(),
        })
        .await;
    }

    async fn emit(&self, event: Event) {
        let _ = self.events_tx.send(event).await;
    }
}
