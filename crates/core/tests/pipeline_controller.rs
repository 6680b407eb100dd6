//! Integration tests for PipelineController.
//!
//! These tests verify that the controller:
//! - Sequences generation and execution in single-file mode
//! - Sends archives straight to execution in project mode
//! - Publishes errors and failed outcomes for each failing stage
//! - Ignores start requests while a run is in flight

mod common;

use common::*;
use ct_core::clients::{ExecutionCall, ExecutionError, MockExecutionClient, MockGenerationClient};
use ct_core::engine::{StartOutcome, PROJECT_FAILURE_SUMMARY};
use ct_core::state::machine::RunState;
use ct_core::state::session::{ArchiveSelection, ChangeResult};
use ct_core::upload::ArchiveCandidate;
use ct_protocol::ipc::Event;
use ct_protocol::language_models::{Language, Mode};
use ct_protocol::run_models::{ErrorStage, RunStatus};
use std::time::Duration;
use tempfile::tempdir;

#[tokio::test]
async fn test_single_file_happy_path() {
    let generator = MockGenerationClient::success("def test_add():\n    assert add(1, 2) == 3");
    let executor = MockExecutionClient::new(Ok(passing_outcome("3 passed")));
    let (controller, mut rx) = create_controller(generator.clone(), executor.clone());

    controller.set_language(Language::Python).await;
    controller
        .update_source("def add(a,b): return a+b".to_string())
        .await;
    drain_events(&mut rx);

    let result = controller.start().await.unwrap();
    let events = drain_events(&mut rx);

    assert!(matches!(
        result,
        StartOutcome::Finished { state: RunState::Done(ref o), .. } if o.summary == "3 passed"
    ));
    assert_event_sequence(&events);
    assert_eq!(
        run_statuses(&events),
        vec![RunStatus::Generating, RunStatus::Running, RunStatus::Done]
    );
    assert_eq!(published_outcomes(&events), vec![passing_outcome("3 passed")]);
    assert!(published_errors(&events).is_empty());

    assert_eq!(
        generator.calls().await,
        vec![("def add(a,b): return a+b".to_string(), Language::Python)]
    );
    match &executor.calls().await[..] {
        [ExecutionCall::Single(request)] => {
            assert_eq!(request.code, "def add(a,b): return a+b");
            assert!(request.test_code.contains("assert add(1, 2) == 3"));
        }
        other => panic!("Expected one single-file call, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generation_failure_never_executes() {
    let executor = MockExecutionClient::passing("unused");
    let (controller, mut rx) = create_controller(MockGenerationClient::failing(), executor.clone());

    controller.start().await.unwrap();
    let events = drain_events(&mut rx);

    assert_eq!(
        run_statuses(&events),
        vec![RunStatus::Generating, RunStatus::Failed]
    );
    let errors = published_errors(&events);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].stage, ErrorStage::Generation);
    assert!(published_outcomes(&events).is_empty());
    assert_eq!(executor.call_count().await, 0);

    let snapshot = controller.snapshot().await;
    assert!(snapshot.outcome.is_none());
    assert!(snapshot.generated_tests.is_none());
}

#[tokio::test]
async fn test_java_run_sends_empty_code() {
    let executor = MockExecutionClient::passing("1 passed");
    let (controller, _rx) = create_controller(
        MockGenerationClient::success("public class TestRunner {}"),
        executor.clone(),
    );

    controller.set_language(Language::Java).await;
    controller.start().await.unwrap();

    match &executor.calls().await[..] {
        [ExecutionCall::Single(request)] => {
            assert_eq!(request.language, Language::Java);
            assert_eq!(request.code, "");
            assert_eq!(request.test_code, "public class TestRunner {}");
        }
        other => panic!("Expected one single-file call, got {:?}", other),
    }
}

#[tokio::test]
async fn test_archive_run_skips_generation() {
    let dir = tempdir().unwrap();
    let path = create_archive(dir.path(), "project.zip");
    let generator = MockGenerationClient::success("unused");
    let executor = MockExecutionClient::passing("12 passed");
    let (controller, mut rx) = create_controller(generator.clone(), executor.clone());

    controller.set_mode(Mode::ProjectArchive).await;
    controller.set_language(Language::Javascript).await;
    let selection = controller
        .select_archive(ArchiveCandidate::from_path(&path))
        .await;
    assert!(matches!(selection, ArchiveSelection::Selected(_)));
    drain_events(&mut rx);

    controller.start().await.unwrap();
    let events = drain_events(&mut rx);

    assert_event_sequence(&events);
    assert_eq!(run_statuses(&events), vec![RunStatus::Running, RunStatus::Done]);
    assert_eq!(generator.call_count().await, 0);
    match &executor.calls().await[..] {
        [ExecutionCall::Archive { language, archive }] => {
            assert_eq!(*language, Language::Javascript);
            assert_eq!(archive.display_name, "project.zip");
            assert_eq!(archive.path, path);
        }
        other => panic!("Expected one archive call, got {:?}", other),
    }
}

#[tokio::test]
async fn test_archive_timeout_publishes_error_and_failed_outcome() {
    let dir = tempdir().unwrap();
    let path = create_archive(dir.path(), "project.zip");
    let executor = MockExecutionClient::failing(ExecutionError::Timeout {
        endpoint: "/run-project-zip",
        limit_ms: 310_000,
    });
    let (controller, mut rx) = create_controller(MockGenerationClient::success("x"), executor);

    controller.set_mode(Mode::ProjectArchive).await;
    controller
        .select_archive(ArchiveCandidate::from_path(&path))
        .await;
    drain_events(&mut rx);

    controller.start().await.unwrap();
    let events = drain_events(&mut rx);

    assert_eq!(run_statuses(&events), vec![RunStatus::Running, RunStatus::Failed]);

    let errors = published_errors(&events);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].stage, ErrorStage::Execution);

    let outcomes = published_outcomes(&events);
    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].success);
    assert_eq!(outcomes[0].summary, PROJECT_FAILURE_SUMMARY);
    assert_contains_ci(&outcomes[0].output, "timed out");
    assert_eq!(outcomes[0].output, errors[0].message);
}

#[tokio::test]
async fn test_no_archive_selected_is_rejected_without_running() {
    let executor = MockExecutionClient::passing("unused");
    let (controller, mut rx) = create_controller(MockGenerationClient::success("x"), executor.clone());

    controller.set_mode(Mode::ProjectArchive).await;
    drain_events(&mut rx);

    let result = controller.start().await.unwrap();
    let events = drain_events(&mut rx);

    assert!(matches!(
        result,
        StartOutcome::Finished { state: RunState::Failed(ref e), .. } if e.stage == ErrorStage::Validation
    ));
    assert!(!events.iter().any(|e| matches!(e, Event::RunStarted { .. })));
    assert!(!run_statuses(&events).contains(&RunStatus::Running));
    assert_contains_ci(&published_errors(&events)[0].message, "No project selected");
    assert_eq!(executor.call_count().await, 0);
}

#[tokio::test]
async fn test_rejected_archive_clears_selection() {
    let dir = tempdir().unwrap();
    let zip = create_archive(dir.path(), "project.zip");
    let rar = create_archive(dir.path(), "project.rar");
    let (controller, mut rx) = create_controller(
        MockGenerationClient::success("x"),
        MockExecutionClient::passing("ok"),
    );

    controller.set_mode(Mode::ProjectArchive).await;
    controller
        .select_archive(ArchiveCandidate::from_path(&zip))
        .await;
    let selection = controller
        .select_archive(ArchiveCandidate::from_path(&rar))
        .await;
    let events = drain_events(&mut rx);

    assert!(matches!(selection, ArchiveSelection::Rejected(_)));
    assert!(controller.snapshot().await.archive.is_none());
    assert!(events.iter().any(|e| matches!(e, Event::ArchiveCleared)));
    assert!(events.iter().any(|e| matches!(
        e,
        Event::ErrorPublished { run_id: None, error } if error.stage == ErrorStage::Validation
    )));
}

#[tokio::test]
async fn test_start_while_in_flight_is_ignored() {
    let generator = MockGenerationClient::success("tests").with_delay(Duration::from_millis(150));
    let executor = MockExecutionClient::passing("ok");
    let (controller, _rx) = create_controller(generator.clone(), executor.clone());

    let first = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.start().await })
    };
    tokio::time::sleep(Duration::from_millis(30)).await;

    let second = controller.start().await.unwrap();
    assert_eq!(second, StartOutcome::Ignored);
    assert_eq!(controller.snapshot().await.status, RunStatus::Generating);

    first.await.unwrap().unwrap();
    assert_eq!(generator.call_count().await, 1);
    assert_eq!(executor.call_count().await, 1);
}

#[tokio::test]
async fn test_language_change_refused_in_flight_then_allowed() {
    let executor = MockExecutionClient::passing("ok").with_delay(Duration::from_millis(150));
    let (controller, mut rx) = create_controller(MockGenerationClient::success("tests"), executor);

    let run = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.start().await })
    };
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert_eq!(
        controller.set_language(Language::Java).await,
        ChangeResult::Refused
    );
    run.await.unwrap().unwrap();

    assert_eq!(
        controller.set_language(Language::Java).await,
        ChangeResult::Applied
    );
    let events = drain_events(&mut rx);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::RequestRefused { .. })));

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.language, Language::Java);
    assert_eq!(snapshot.status, RunStatus::Idle);
    assert!(snapshot.outcome.is_none());
}

#[tokio::test]
async fn test_rerun_after_failure_clears_previous_error() {
    let (controller, _rx) = create_controller(
        MockGenerationClient::failing(),
        MockExecutionClient::passing("ok"),
    );
    controller.start().await.unwrap();
    assert!(controller.snapshot().await.error.is_some());

    controller.set_mode(Mode::ProjectArchive).await;
    controller.set_mode(Mode::SingleFile).await;
    let snapshot = controller.snapshot().await;
    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.status, RunStatus::Idle);
}
