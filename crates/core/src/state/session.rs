//! The interactive session: mode, language, draft, archive and run state.
//!
//! `Session` is plain data with synchronous operations. It is shared behind
//! a mutex by the [`PipelineController`](crate::engine::PipelineController),
//! which performs the network calls and feeds their results back here.

use crate::profiles::profile_for;
use crate::state::machine::{transition, RunInput, RunState, TransitionError};
use crate::upload::{validate, ArchiveCandidate, ValidationError};
use ct_protocol::ipc::SessionSnapshot;
use ct_protocol::language_models::{Language, Mode};
use ct_protocol::run_models::{ErrorStage, PipelineError, PipelineOutcome, UploadedArchive};
use uuid::Uuid;

/// Result of a mode or language change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeResult {
    Applied,
    /// The requested value was already active.
    Unchanged,
    /// A run is in flight.
    Refused,
}

/// Result of an archive selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveSelection {
    Selected(UploadedArchive),
    /// Validation failed and any held archive was dropped.
    Rejected(ValidationError),
    /// The session is not in project-archive mode.
    Refused,
}

/// What a start request turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartPlan {
    /// A run is already in flight. Nothing changed.
    Ignored,
    /// The run failed validation before any stage began.
    Rejected { run_id: Uuid, error: PipelineError },
    /// Generate tests for `source`, then execute them.
    Single {
        run_id: Uuid,
        language: Language,
        source: String,
    },
    /// Execute the project archive.
    Archive {
        run_id: Uuid,
        language: Language,
        archive: UploadedArchive,
    },
}

/// Session state for a single user.
#[derive(Debug, Clone)]
pub struct Session {
    mode: Mode,
    language: Language,
    source: String,
    archive: Option<UploadedArchive>,
    generated_tests: Option<String>,
    outcome: Option<PipelineOutcome>,
    error: Option<PipelineError>,
    run_state: RunState,
    run_id: Option<Uuid>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Single-file mode, python, with python's sample source in the draft.
    pub fn new() -> Self {
        let language = Language::default();
        Self {
            mode: Mode::default(),
            language,
            source: profile_for(language).default_source.clone(),
            archive: None,
            generated_tests: None,
            outcome: None,
            error: None,
            run_state: RunState::Idle,
            run_id: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn archive(&self) -> Option<&UploadedArchive> {
        self.archive.as_ref()
    }

    pub fn generated_tests(&self) -> Option<&str> {
        self.generated_tests.as_deref()
    }

    pub fn outcome(&self) -> Option<&PipelineOutcome> {
        self.outcome.as_ref()
    }

    pub fn error(&self) -> Option<&PipelineError> {
        self.error.as_ref()
    }

    pub fn run_state(&self) -> &RunState {
        &self.run_state
    }

    pub fn run_id(&self) -> Option<Uuid> {
        self.run_id
    }

    pub fn is_in_flight(&self) -> bool {
        self.run_state.is_in_flight()
    }

    /// Switch between single-file and project-archive mode.
    ///
    /// A real change drops the held archive, the outcome and the error.
    pub fn set_mode(&mut self, mode: Mode) -> ChangeResult {
        if self.is_in_flight() {
            return ChangeResult::Refused;
        }
        if self.mode == mode {
            return ChangeResult::Unchanged;
        }

        self.mode = mode;
        self.archive = None;
        self.clear_results();
        ChangeResult::Applied
    }

    /// Switch the active language.
    ///
    /// The draft is replaced with the language's sample source even when the
    /// language is unchanged. Generated tests, outcome and error are cleared.
    pub fn set_language(&mut self, language: Language) -> ChangeResult {
        if self.is_in_flight() {
            return ChangeResult::Refused;
        }

        self.language = language;
        self.source = profile_for(language).default_source.clone();
        self.clear_results();
        ChangeResult::Applied
    }

    /// Replace the draft. Allowed at any time; an in-flight run keeps the
    /// source it started with.
    pub fn update_source(&mut self, text: impl Into<String>) {
        self.source = text.into();
    }

    /// Validate and hold an archive for the next project run.
    ///
    /// On rejection the previously held archive is dropped and a validation
    /// error is recorded.
    pub fn select_archive(&mut self, candidate: &ArchiveCandidate) -> ArchiveSelection {
        if self.mode != Mode::ProjectArchive {
            return ArchiveSelection::Refused;
        }

        match validate(candidate) {
            Ok(archive) => {
                self.archive = Some(archive.clone());
                if !self.is_in_flight() {
                    self.error = None;
                }
                ArchiveSelection::Selected(archive)
            }
            Err(err) => {
                self.archive = None;
                if !self.is_in_flight() {
                    self.error = Some(PipelineError::new(ErrorStage::Validation, err.to_string()));
                }
                ArchiveSelection::Rejected(err)
            }
        }
    }

    /// Drop the held archive. Returns whether one was held.
    pub fn clear_archive(&mut self) -> bool {
        self.archive.take().is_some()
    }

    /// Begin a run attempt.
    ///
    /// While a run is in flight this is a no-op. Otherwise the previous
    /// generated tests, outcome and error are cleared and a new run id is
    /// assigned before the mode decides which stages to run.
    pub fn begin_run(&mut self) -> Result<StartPlan, TransitionError> {
        if self.is_in_flight() {
            return Ok(StartPlan::Ignored);
        }

        self.generated_tests = None;
        self.outcome = None;
        self.error = None;
        let run_id = Uuid::new_v4();
        self.run_id = Some(run_id);

        match (self.mode, self.archive.clone()) {
            (Mode::SingleFile, _) => {
                self.apply(RunInput::StartSingle)?;
                Ok(StartPlan::Single {
                    run_id,
                    language: self.language,
                    source: self.source.clone(),
                })
            }
            (Mode::ProjectArchive, Some(archive)) => {
                self.apply(RunInput::StartArchive)?;
                Ok(StartPlan::Archive {
                    run_id,
                    language: self.language,
                    archive,
                })
            }
            (Mode::ProjectArchive, None) => {
                let error = PipelineError::new(
                    ErrorStage::Validation,
                    ValidationError::NoProjectSelected.to_string(),
                );
                self.error = Some(error.clone());
                self.apply(RunInput::Reject(error.clone()))?;
                Ok(StartPlan::Rejected { run_id, error })
            }
        }
    }

    /// Store generated tests and move on to execution.
    pub fn record_tests(&mut self, test_code: impl Into<String>) -> Result<(), TransitionError> {
        self.apply(RunInput::TestsGenerated)?;
        self.generated_tests = Some(test_code.into());
        Ok(())
    }

    pub fn record_generation_failure(&mut self, error: PipelineError) -> Result<(), TransitionError> {
        self.apply(RunInput::GenerationFailed(error.clone()))?;
        self.error = Some(error);
        Ok(())
    }

    pub fn record_outcome(&mut self, outcome: PipelineOutcome) -> Result<(), TransitionError> {
        self.apply(RunInput::Executed(outcome.clone()))?;
        self.outcome = Some(outcome);
        Ok(())
    }

    /// Store both the execution error and the failed outcome shown in the
    /// results area.
    pub fn record_execution_failure(
        &mut self,
        error: PipelineError,
        outcome: PipelineOutcome,
    ) -> Result<(), TransitionError> {
        self.apply(RunInput::ExecutionFailed(error.clone()))?;
        self.error = Some(error);
        self.outcome = Some(outcome);
        Ok(())
    }

    /// Copy of everything a presenter needs to render.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            language: self.language,
            source: self.source.clone(),
            archive: self.archive.clone(),
            generated_tests: self.generated_tests.clone(),
            outcome: self.outcome.clone(),
            error: self.error.clone(),
            status: self.run_state.status(),
        }
    }

    fn clear_results(&mut self) {
        self.generated_tests = None;
        self.outcome = None;
        self.error = None;
        // Settled states always accept a reset.
        if let Ok(state) = transition(&self.run_state, RunInput::Reset) {
            self.run_state = state;
        }
    }

    fn apply(&mut self, input: RunInput) -> Result<(), TransitionError> {
        self.run_state = transition(&self.run_state, input)?;
        Ok(())
    }
}
