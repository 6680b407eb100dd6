//! Session manager: the Op dispatch loop.
//!
//! The SessionManager is the single entry point for a UI. It receives
//! [`Op`]s, applies them through the [`PipelineController`], and answers
//! on the events channel. A run is admitted inside the loop, so operations
//! are applied in the order they arrive. Only its remote stages execute on
//! a background task, and the loop keeps accepting operations meanwhile.

use crate::engine::PipelineController;
use crate::state::session::StartPlan;
use crate::upload::ArchiveCandidate;
use anyhow::Result;
use ct_protocol::ipc::{Event, Op};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Dispatches UI operations to the pipeline controller.
pub struct SessionManager {
    controller: Arc<PipelineController>,

    /// Channel for sending events to the UI.
    events_tx: mpsc::Sender<Event>,

    /// Background run tasks that have not been awaited yet.
    runs: Vec<JoinHandle<()>>,
}

impl SessionManager {
    /// Create a new SessionManager.
    ///
    /// # Arguments
    ///
    /// * `controller` - The controller owning the session
    /// * `events_tx` - Channel for sending events to the UI
    pub fn new(controller: Arc<PipelineController>, events_tx: mpsc::Sender<Event>) -> Self {
        Self {
            controller,
            events_tx,
            runs: Vec::new(),
        }
    }

    pub fn controller(&self) -> &Arc<PipelineController> {
        &self.controller
    }

    /// Apply one operation.
    ///
    /// # Returns
    ///
    /// `false` once `Shutdown` has been handled.
    pub async fn handle(&mut self, op: Op) -> Result<bool> {
        debug!(?op, "handling op");
        match op {
            Op::SetMode { mode } => {
                self.controller.set_mode(mode).await;
            }
            Op::SetLanguage { language } => {
                self.controller.set_language(language).await;
            }
            Op::UpdateSource { text } => self.controller.update_source(text).await,
            Op::SelectArchive { path, media_type } => {
                let candidate = match media_type {
                    Some(media_type) => ArchiveCandidate::new(path, Some(media_type)),
                    None => ArchiveCandidate::from_path(path),
                };
                self.controller.select_archive(candidate).await;
            }
            Op::ClearArchive => self.controller.clear_archive().await,
            Op::StartRun => self.start_run().await?,
            Op::GetSnapshot => {
                let snapshot = self.controller.snapshot().await;
                self.events_tx.send(Event::Snapshot { snapshot }).await?;
            }
            Op::Shutdown => return Ok(false),
        }
        Ok(true)
    }

    /// Process operations until `Shutdown` arrives or the channel closes,
    /// then wait for in-flight runs to finish.
    pub async fn run(mut self, mut op_rx: mpsc::Receiver<Op>) -> Result<()> {
        while let Some(op) = op_rx.recv().await {
            if !self.handle(op).await? {
                break;
            }
        }
        self.drain().await
    }

    /// Wait for every spawned run task.
    pub async fn drain(&mut self) -> Result<()> {
        for handle in self.runs.drain(..) {
            handle.await?;
        }
        Ok(())
    }

    /// Admit a run, then hand its remote stages to a background task.
    async fn start_run(&mut self) -> Result<()> {
        self.runs.retain(|handle| !handle.is_finished());

        let plan = match self.controller.begin().await {
            Ok(plan) => plan,
            Err(e) => {
                error!(error = %e, "run could not start");
                return Ok(());
            }
        };

        match plan {
            StartPlan::Ignored => {
                self.events_tx
                    .send(Event::RequestRefused {
                        reason: "A run is already in progress.".to_string(),
                    })
                    .await?;
            }
            StartPlan::Rejected { .. } => {
                if let Err(e) = self.controller.complete(plan).await {
                    error!(error = %e, "run aborted");
                }
            }
            StartPlan::Single { .. } | StartPlan::Archive { .. } => {
                let controller = Arc::clone(&self.controller);
                self.runs.push(tokio::spawn(async move {
                    if let Err(e) = controller.complete(plan).await {
                        error!(error = %e, "run aborted");
                    }
                }));
            }
        }
        Ok(())
    }
}
