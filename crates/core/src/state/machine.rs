//! Run state machine.
//!
//! Every change of [`RunState`] goes through [`transition`]. Inputs that make
//! no sense in the current state are rejected with a [`TransitionError`]
//! instead of being applied.

use ct_protocol::run_models::{PipelineError, PipelineOutcome, RunStatus};
use std::fmt;
use thiserror::Error;

/// The pipeline's lifecycle, with the terminal values it carries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Generating,
    Running,
    Done(PipelineOutcome),
    Failed(PipelineError),
}

impl RunState {
    pub fn status(&self) -> RunStatus {
        match self {
            RunState::Idle => RunStatus::Idle,
            RunState::Generating => RunStatus::Generating,
            RunState::Running => RunStatus::Running,
            RunState::Done(_) => RunStatus::Done,
            RunState::Failed(_) => RunStatus::Failed,
        }
    }

    /// Whether a run is in flight. This is the only mutual-exclusion check.
    pub fn is_in_flight(&self) -> bool {
        self.status().is_in_flight()
    }
}

/// Inputs that drive [`RunState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunInput {
    /// A single-file run was accepted.
    StartSingle,
    /// An archive run was accepted.
    StartArchive,
    /// A run was refused before any stage began.
    Reject(PipelineError),
    TestsGenerated,
    GenerationFailed(PipelineError),
    Executed(PipelineOutcome),
    ExecutionFailed(PipelineError),
    /// Return to Idle after a mode or language change.
    Reset,
}

impl RunInput {
    fn name(&self) -> &'static str {
        match self {
            RunInput::StartSingle => "StartSingle",
            RunInput::StartArchive => "StartArchive",
            RunInput::Reject(_) => "Reject",
            RunInput::TestsGenerated => "TestsGenerated",
            RunInput::GenerationFailed(_) => "GenerationFailed",
            RunInput::Executed(_) => "Executed",
            RunInput::ExecutionFailed(_) => "ExecutionFailed",
            RunInput::Reset => "Reset",
        }
    }
}

impl fmt::Display for RunInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An input arrived in a state that cannot accept it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("illegal run transition: {input} while {from:?}")]
pub struct TransitionError {
    pub from: RunStatus,
    pub input: &'static str,
}

/// Compute the state that follows `state` on `input`.
///
/// Starting, rejecting and resetting are only accepted while no run is in
/// flight. Stage results are only accepted by the stage that is waiting
/// for them.
pub fn transition(state: &RunState, input: RunInput) -> Result<RunState, TransitionError> {
    use RunState::*;

    let settled = !state.is_in_flight();
    match input {
        RunInput::StartSingle if settled => Ok(Generating),
        RunInput::StartArchive if settled => Ok(Running),
        RunInput::Reject(error) if settled => Ok(Failed(error)),
        RunInput::Reset if settled => Ok(Idle),
        RunInput::TestsGenerated if *state == Generating => Ok(Running),
        RunInput::GenerationFailed(error) if *state == Generating => Ok(Failed(error)),
        RunInput::Executed(outcome) if *state == Running => Ok(Done(outcome)),
        RunInput::ExecutionFailed(error) if *state == Running => Ok(Failed(error)),
        input => Err(TransitionError {
            from: state.status(),
            input: input.name(),
        }),
    }
}
