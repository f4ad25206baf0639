// tests/rotation_test.rs
// End-to-end rotation behaviour over fake collaborators

mod test_helpers;

use std::sync::Arc;

use agent_queue::queue::RotationError;
use test_helpers::{FakeDurable, FakeRoster, agent, rotator};

fn names(view: &agent_queue::queue::QueueView) -> Vec<String> {
    view.queue().map(|q| q.agent.name.clone()).collect()
}

#[tokio::test]
async fn test_round_robin_covers_every_agent_once() {
    let rotator = rotator(FakeRoster::with(&["A", "B", "C", "D"]), None);

    let mut served = Vec::new();
    for _ in 0..8 {
        served.push(rotator.advance().await.unwrap().current.agent.name);
    }

    assert_eq!(served, vec!["A", "B", "C", "D", "A", "B", "C", "D"]);
}

#[tokio::test]
async fn test_first_run_starts_at_zero_despite_durable_value() {
    let durable = FakeDurable::holding(Some(2));
    let rotator = rotator(FakeRoster::with(&["A", "B", "C"]), Some(durable.clone()));

    let view = rotator.peek().await.unwrap();

    assert_eq!(view.current.agent.name, "A");
    assert!(view.changed);
    assert_eq!(durable.cell(), Some(0));
}

#[tokio::test]
async fn test_addition_is_non_disruptive() {
    let roster = FakeRoster::with(&["A", "B", "C"]);
    let rotator = rotator(roster.clone(), None);
    rotator.advance().await.unwrap(); // pointer at B

    roster.set(&["A", "B", "C", "D"]);
    let view = rotator.peek().await.unwrap();

    assert!(view.changed);
    assert_eq!(view.current.agent.name, "B");
    assert_eq!(names(&view), vec!["B", "C", "D", "A"]);

    // D only becomes current when rotation reaches it
    let served: Vec<_> = [
        rotator.advance().await.unwrap(),
        rotator.advance().await.unwrap(),
        rotator.advance().await.unwrap(),
    ]
    .into_iter()
    .map(|v| v.current.agent.name)
    .collect();
    assert_eq!(served, vec!["B", "C", "D"]);
}

#[tokio::test]
async fn test_removal_before_pointer_keeps_same_agent() {
    let roster = FakeRoster::with(&["A", "B", "C"]);
    let rotator = rotator(roster.clone(), None);
    rotator.advance().await.unwrap();
    rotator.advance().await.unwrap(); // pointer at C (index 2)

    roster.set(&["B", "C"]);
    let view = rotator.peek().await.unwrap();

    assert_eq!(view.current.agent.name, "C");
    assert_eq!(view.pointer, 1);
}

#[tokio::test]
async fn test_removing_current_agent_stays_in_bounds() {
    let roster = FakeRoster::with(&["A", "B", "C"]);
    let rotator = rotator(roster.clone(), None);
    rotator.peek().await.unwrap(); // pointer at A (index 0)

    roster.set(&["B", "C"]);
    let view = rotator.peek().await.unwrap();

    assert!(view.pointer < 2);
    assert_eq!(view.current.agent.name, "B");
}

#[tokio::test]
async fn test_removing_last_current_agent_wraps_to_front() {
    let roster = FakeRoster::with(&["A", "B", "C"]);
    let rotator = rotator(roster.clone(), None);
    rotator.advance().await.unwrap();
    rotator.advance().await.unwrap(); // pointer at C

    roster.set(&["A", "B"]);
    assert_eq!(rotator.peek().await.unwrap().current.agent.name, "A");
}

#[tokio::test]
async fn test_peek_is_idempotent() {
    let rotator = rotator(FakeRoster::with(&["A", "B", "C"]), None);
    rotator.advance().await.unwrap();

    let first = rotator.peek().await.unwrap();
    let second = rotator.peek().await.unwrap();

    assert_eq!(first.current, second.current);
    assert_eq!(first.pointer, second.pointer);
    assert_eq!(rotator.store().memory_position(), first.pointer);
}

#[tokio::test]
async fn test_field_edits_and_reorder_are_not_changes() {
    let roster = FakeRoster::with(&["A", "B", "C"]);
    let rotator = rotator(roster.clone(), None);
    rotator.advance().await.unwrap();

    let mut edited = vec![agent("A"), agent("B"), agent("C")];
    edited[1].phone = "5599000000".into();
    roster.set_agents(edited);

    let view = rotator.peek().await.unwrap();
    assert!(!view.changed);
    assert_eq!(view.current.agent.name, "B");
    assert_eq!(view.current.agent.phone, "5599000000");
}

#[tokio::test]
async fn test_durable_outage_keeps_rotating() {
    let durable = FakeDurable::holding(None);
    let rotator = rotator(FakeRoster::with(&["A", "B", "C"]), Some(durable.clone()));
    rotator.advance().await.unwrap();

    durable.set_offline(true);
    assert_eq!(rotator.advance().await.unwrap().current.agent.name, "B");
    assert_eq!(rotator.advance().await.unwrap().current.agent.name, "C");

    assert_eq!(durable.cell(), Some(1));
    assert_eq!(rotator.store().memory_position(), 0);

    // Once readable again the durable cell is authoritative, even if stale
    durable.set_offline(false);
    assert_eq!(rotator.advance().await.unwrap().current.agent.name, "B");
    assert_eq!(durable.cell(), Some(2));
}

#[tokio::test]
async fn test_durable_value_from_other_instance_is_adopted() {
    let durable = FakeDurable::holding(None);
    let rotator = rotator(FakeRoster::with(&["A", "B", "C"]), Some(durable.clone()));
    rotator.peek().await.unwrap();

    // Another instance advanced the shared pointer
    durable.overwrite(Some(2));
    assert_eq!(rotator.peek().await.unwrap().current.agent.name, "C");
    assert_eq!(rotator.store().memory_position(), 2);
}

#[tokio::test]
async fn test_roster_failure_propagates() {
    let roster = FakeRoster::with(&["A"]);
    roster.set_offline(true);
    let rotator = rotator(roster, None);

    assert!(matches!(
        rotator.advance().await,
        Err(RotationError::RosterUnavailable(_))
    ));
    assert_eq!(rotator.store().memory_position(), 0);
}

#[tokio::test]
async fn test_concurrent_advances_serve_distinct_agents() {
    let rotator = Arc::new(rotator(FakeRoster::with(&["A", "B", "C", "D", "E"]), None));

    let tasks: Vec<_> = (0..5)
        .map(|_| {
            let rotator = rotator.clone();
            tokio::spawn(async move { rotator.advance().await.unwrap().current.agent.name })
        })
        .collect();

    let mut served = Vec::new();
    for task in tasks {
        served.push(task.await.unwrap());
    }
    served.sort();

    assert_eq!(served, vec!["A", "B", "C", "D", "E"]);
    assert_eq!(rotator.store().memory_position(), 0);
}
