//! Integration tests for the worker supervisor
//!
//! Spawns real short-lived processes and watches the event stream: every
//! slot comes up, exited workers are replaced after the restart delay, and
//! the exit status is reported either way. Dropping the handle aborts the
//! slot tasks, which kills any straggling children via `kill_on_drop`.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use tokio::process::Command;
use tokio::time::timeout;

use quill_api::supervisor::{Supervisor, SupervisorConfig, SupervisorHandle, WorkerEvent};

/// Receive the next worker event or fail the test after five seconds
async fn next_event(handle: &mut SupervisorHandle) -> WorkerEvent {
    timeout(Duration::from_secs(5), handle.events.recv())
        .await
        .expect("timed out waiting for a worker event")
        .expect("event channel closed")
}

fn config(worker_count: usize) -> SupervisorConfig {
    SupervisorConfig {
        worker_count,
        restart_delay: Duration::from_millis(10),
    }
}

fn sleeper() -> Command {
    let mut command = Command::new("sleep");
    command.arg("30");
    command
}

#[test_log::test(tokio::test)]
async fn test_every_slot_starts_a_worker() {
    let factory_calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&factory_calls);
    let supervisor = Supervisor::new(config(3), move |slot| {
        recorded.lock().unwrap().push(slot);
        sleeper()
    });

    let mut handle = supervisor.start();

    let mut started_slots = Vec::new();
    for _ in 0..3 {
        match next_event(&mut handle).await {
            WorkerEvent::Started { slot, pid } => {
                assert!(pid.is_some());
                started_slots.push(slot);
            }
            other => panic!("expected a start event, got {other:?}"),
        }
    }
    started_slots.sort_unstable();
    assert_eq!(started_slots, vec![0, 1, 2]);

    let mut calls = factory_calls.lock().unwrap().clone();
    calls.sort_unstable();
    assert_eq!(calls, vec![0, 1, 2]);
}

#[test_log::test(tokio::test)]
async fn test_crashed_worker_is_replaced() {
    let supervisor = Supervisor::new(config(1), |_| Command::new("false"));
    let mut handle = supervisor.start();

    assert_matches!(
        next_event(&mut handle).await,
        WorkerEvent::Started { slot: 0, .. }
    );
    assert_matches!(
        next_event(&mut handle).await,
        WorkerEvent::Exited {
            slot: 0,
            success: false
        }
    );
    // The slot comes back after the restart delay
    assert_matches!(
        next_event(&mut handle).await,
        WorkerEvent::Started { slot: 0, .. }
    );
}

#[test_log::test(tokio::test)]
async fn test_cleanly_exited_worker_is_also_replaced() {
    let supervisor = Supervisor::new(config(1), |_| Command::new("true"));
    let mut handle = supervisor.start();

    assert_matches!(next_event(&mut handle).await, WorkerEvent::Started { .. });
    assert_matches!(
        next_event(&mut handle).await,
        WorkerEvent::Exited { success: true, .. }
    );
    assert_matches!(next_event(&mut handle).await, WorkerEvent::Started { .. });
}

#[test_log::test(tokio::test)]
async fn test_only_the_exited_slot_restarts() {
    let supervisor = Supervisor::new(config(2), |slot| {
        if slot == 0 {
            Command::new("false")
        } else {
            sleeper()
        }
    });
    let mut handle = supervisor.start();

    // Watch a few cycles: slot 0 churns while slot 1 starts exactly once
    let mut slot_one_starts = 0;
    let mut slot_zero_starts = 0;
    for _ in 0..6 {
        match next_event(&mut handle).await {
            WorkerEvent::Started { slot: 1, .. } => slot_one_starts += 1,
            WorkerEvent::Started { slot: 0, .. } => slot_zero_starts += 1,
            WorkerEvent::Exited { slot: 0, .. } => {}
            other => panic!("unexpected event: {other:?}"),
        }
    }
    assert_eq!(slot_one_starts, 1);
    assert!(slot_zero_starts >= 2);
}
