//! Drives a core session over the Op/Event channels.
//!
//! The CLI is a thin UI: it sends the same [`Op`]s an interactive client
//! would and folds the resulting [`Event`]s into a [`RunReport`].

use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use ct_core::engine::PipelineController;
use ct_core::state::manager::SessionManager;
use ct_protocol::config_models::ServiceConfig;
use ct_protocol::ipc::{Event, Op};
use ct_protocol::run_models::{PipelineError, PipelineOutcome, RunStatus};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Everything the CLI reports about one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub outcome: Option<PipelineOutcome>,
    pub error: Option<PipelineError>,
    pub generated_tests: Option<String>,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.status == RunStatus::Done && self.outcome.as_ref().is_some_and(|o| o.success)
    }
}

pub struct Driver {
    op_tx: mpsc::Sender<Op>,
    events_rx: mpsc::Receiver<Event>,
    task: JoinHandle<Result<()>>,
    progress: bool,
}

impl Driver {
    /// Spawn a session manager backed by the HTTP clients.
    ///
    /// With `progress` set, stage changes are echoed to stderr.
    pub fn spawn(service: &ServiceConfig, progress: bool) -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        let (op_tx, op_rx) = mpsc::channel(32);
        let controller = PipelineController::from_config(service, events_tx.clone());
        let manager = SessionManager::new(Arc::new(controller), events_tx);
        let task = tokio::spawn(manager.run(op_rx));

        Self {
            op_tx,
            events_rx,
            task,
            progress,
        }
    }

    pub async fn send(&self, op: Op) -> Result<()> {
        self.op_tx
            .send(op)
            .await
            .map_err(|_| anyhow!("session closed unexpectedly"))
    }

    /// Wait for the answer to a `SelectArchive` op.
    ///
    /// Returns the validation error when the archive was rejected.
    pub async fn await_archive(&mut self) -> Result<Option<PipelineError>> {
        loop {
            match self.next_event().await? {
                Event::ArchiveSelected { display_name } => {
                    debug!(%display_name, "archive accepted");
                    return Ok(None);
                }
                Event::ErrorPublished { run_id: None, error } => return Ok(Some(error)),
                Event::RequestRefused { reason } => bail!(reason),
                _ => {}
            }
        }
    }

    /// Start a run and collect its events until it finishes.
    pub async fn run(&mut self) -> Result<RunReport> {
        self.send(Op::StartRun).await?;

        let mut report = RunReport {
            status: RunStatus::Idle,
            outcome: None,
            error: None,
            generated_tests: None,
        };
        loop {
            match self.next_event().await? {
                Event::StateChanged {
                    run_id: Some(_),
                    status,
                } => {
                    report.status = status;
                    self.show_progress(status);
                }
                Event::LogChunk { content, .. } => debug!(%content, "run log"),
                Event::TestsGenerated { test_code, .. } => report.generated_tests = Some(test_code),
                Event::OutcomePublished { outcome, .. } => report.outcome = Some(outcome),
                Event::ErrorPublished {
                    run_id: Some(_),
                    error,
                } => report.error = Some(error),
                Event::RunFinished { status, .. } => {
                    report.status = status;
                    return Ok(report);
                }
                Event::RequestRefused { reason } => bail!(reason),
                _ => {}
            }
        }
    }

    /// Stop the session and wait for it to wind down.
    pub async fn shutdown(self) -> Result<()> {
        self.send(Op::Shutdown).await?;
        self.task.await?
    }

    async fn next_event(&mut self) -> Result<Event> {
        self.events_rx
            .recv()
            .await
            .ok_or_else(|| anyhow!("session ended before the run finished"))
    }

    fn show_progress(&self, status: RunStatus) {
        if !self.progress {
            return;
        }
        let line = match status {
            RunStatus::Generating => "Generating tests...",
            RunStatus::Running => "Running tests in the sandbox...",
            _ => return,
        };
        eprintln!("{}", line.dimmed());
    }
}
