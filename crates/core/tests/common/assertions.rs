//! Event collection and custom assertion helpers.

use ct_protocol::ipc::Event;
use ct_protocol::run_models::{PipelineError, PipelineOutcome, RunStatus};
use std::time::Duration;
use tokio::sync::mpsc;

/// Collect events until a `RunFinished` arrives, the channel closes, or
/// `timeout` elapses.
#[allow(dead_code)]
pub async fn collect_events_until_finished(
    rx: &mut mpsc::Receiver<Event>,
    timeout: Duration,
) -> Vec<Event> {
    let mut events = Vec::new();
    let start = tokio::time::Instant::now();

    while start.elapsed() < timeout {
        match tokio::time::timeout(Duration::from_millis(100), rx.recv()).await {
            Ok(Some(event)) => {
                let is_terminal = matches!(event, Event::RunFinished { .. });
                events.push(event);
                if is_terminal {
                    break;
                }
            }
            Ok(None) => break,
            Err(_) => continue,
        }
    }

    events
}

/// Drain whatever is already queued.
#[allow(dead_code)]
pub fn drain_events(rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Statuses of run-scoped `StateChanged` events, in order.
#[allow(dead_code)]
pub fn run_statuses(events: &[Event]) -> Vec<RunStatus> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::StateChanged {
                run_id: Some(_),
                status,
            } => Some(*status),
            _ => None,
        })
        .collect()
}

#[allow(dead_code)]
pub fn published_outcomes(events: &[Event]) -> Vec<PipelineOutcome> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::OutcomePublished { outcome, .. } => Some(outcome.clone()),
            _ => None,
        })
        .collect()
}

#[allow(dead_code)]
pub fn published_errors(events: &[Event]) -> Vec<PipelineError> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::ErrorPublished { error, .. } => Some(error.clone()),
            _ => None,
        })
        .collect()
}

/// Assert that a run's events start with `RunStarted` and end with
/// `RunFinished`.
#[allow(dead_code)]
pub fn assert_event_sequence(events: &[Event]) {
    if events.is_empty() {
        panic!("Event sequence is empty");
    }

    assert!(
        matches!(events[0], Event::RunStarted { .. }),
        "First event should be RunStarted, got: {:?}",
        events[0]
    );

    let last = events.last().unwrap();
    assert!(
        matches!(last, Event::RunFinished { .. }),
        "Last event should be RunFinished, got: {:?}",
        last
    );
}

/// Assert that a string contains a substring (case-insensitive).
#[allow(dead_code)]
pub fn assert_contains_ci(haystack: &str, needle: &str) {
    let haystack_lower = haystack.to_lowercase();
    let needle_lower = needle.to_lowercase();
    assert!(
        haystack_lower.contains(&needle_lower),
        "Expected '{}' to contain '{}' (case-insensitive)",
        haystack,
        needle
    );
}
