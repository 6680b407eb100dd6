//! Test fixtures for controllers, archives and service configuration.

use ct_core::clients::{MockExecutionClient, MockGenerationClient};
use ct_core::engine::PipelineController;
use ct_core::state::manager::SessionManager;
use ct_protocol::config_models::ServiceConfig;
use ct_protocol::ipc::Event;
use ct_protocol::run_models::PipelineOutcome;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Local file header signature followed by filler; the sandbox contract
/// treats archive bytes as opaque.
pub const ARCHIVE_BYTES: &[u8] = b"PK\x03\x04codetest-kit-fixture";

/// Write a fake archive named `name` into `dir`.
#[allow(dead_code)]
pub fn create_archive(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, ARCHIVE_BYTES).expect("Failed to write archive fixture");
    path
}

/// The outcome used by passing executor mocks.
#[allow(dead_code)]
pub fn passing_outcome(summary: &str) -> PipelineOutcome {
    PipelineOutcome {
        success: true,
        summary: summary.to_string(),
        output: "...".to_string(),
    }
}

/// A controller wired to the given mocks, with its event receiver.
#[allow(dead_code)]
pub fn create_controller(
    generator: MockGenerationClient,
    executor: MockExecutionClient,
) -> (Arc<PipelineController>, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(256);
    let controller = PipelineController::new(Arc::new(generator), Arc::new(executor), tx);
    (Arc::new(controller), rx)
}

/// A session manager wired to the given mocks, with its event receiver.
#[allow(dead_code)]
pub fn create_manager(
    generator: MockGenerationClient,
    executor: MockExecutionClient,
) -> (SessionManager, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(256);
    let controller = PipelineController::new(Arc::new(generator), Arc::new(executor), tx.clone());
    (SessionManager::new(Arc::new(controller), tx), rx)
}

/// Service configuration pointing both services at `base_url`.
#[allow(dead_code)]
pub fn service_config(base_url: &str) -> ServiceConfig {
    ServiceConfig {
        generation_url: base_url.to_string(),
        execution_url: base_url.to_string(),
        ..ServiceConfig::default()
    }
}
