// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn change(kind: StateChangeType, session: &str, pane: &str) -> StateChange {
    StateChange {
        timestamp_epoch_ms: 0,
        kind,
        session: Some(session.to_string()),
        pane: Some(pane.to_string()),
        details: serde_json::Map::new(),
    }
}

#[test]
fn record_stamps_timestamp_when_unset() {
    let tracker = ChangeTracker::new(100, 60_000);
    tracker.record(change(StateChangeType::AgentOutput, "s", "p"), 500);
    let events = tracker.all();
    assert_eq!(events[0].timestamp_epoch_ms, 500);
}

#[test]
fn bounded_size_evicts_oldest() {
    let tracker = ChangeTracker::new(3, 60_000);
    for i in 0..5u64 {
        tracker.record(change(StateChangeType::AgentOutput, "s", "p"), 1000 + i);
    }
    let events = tracker.all();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].timestamp_epoch_ms, 1002);
    assert_eq!(events[2].timestamp_epoch_ms, 1004);
}

#[test]
fn prune_drops_entries_older_than_max_age() {
    let tracker = ChangeTracker::new(100, 1_000);
    tracker.record(change(StateChangeType::AgentOutput, "s", "p"), 0);
    tracker.record(change(StateChangeType::AgentOutput, "s", "p"), 5_000);
    tracker.prune(5_000);
    let events = tracker.all();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].timestamp_epoch_ms, 5_000);
}

#[test]
fn since_returns_only_strictly_newer_events() {
    let tracker = ChangeTracker::new(100, 60_000);
    tracker.record(change(StateChangeType::AgentOutput, "s", "p"), 100);
    tracker.record(change(StateChangeType::AgentOutput, "s", "p"), 200);
    tracker.record(change(StateChangeType::AgentOutput, "s", "p"), 300);
    let events = tracker.since(200);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].timestamp_epoch_ms, 300);
}

#[test]
fn coalesce_collapses_consecutive_same_key_events() {
    let tracker = ChangeTracker::new(100, 60_000);
    tracker.record(change(StateChangeType::AgentOutput, "s", "p"), 1);
    tracker.record(change(StateChangeType::AgentOutput, "s", "p"), 2);
    tracker.record(change(StateChangeType::PaneCreated, "s", "p"), 3);
    let coalesced = tracker.coalesce();
    assert_eq!(coalesced.len(), 2);
    assert_eq!(coalesced[0].count, 2);
    assert_eq!(coalesced[0].first_at_epoch_ms, 1);
    assert_eq!(coalesced[0].last_at_epoch_ms, 2);
    assert_eq!(coalesced[1].count, 1);
}

#[test]
fn coalesce_on_all_distinct_keys_yields_count_one_each() {
    let tracker = ChangeTracker::new(100, 60_000);
    tracker.record(change(StateChangeType::AgentOutput, "s1", "p1"), 1);
    tracker.record(change(StateChangeType::PaneCreated, "s2", "p2"), 2);
    tracker.record(change(StateChangeType::SessionCreated, "s3", "p3"), 3);
    let coalesced = tracker.coalesce();
    assert_eq!(coalesced.len(), 3);
    assert!(coalesced.iter().all(|c| c.count == 1));
}

fn marker(agent_id: &str, kind: MarkerType) -> MarkerEvent {
    MarkerEvent { id: "m".into(), agent_id: agent_id.to_string(), kind, timestamp_epoch_ms: 0, message: None }
}

#[test]
fn marker_dedup_drops_repeat_fingerprint_within_window() {
    let tracker = ChangeTracker::new(100, 60_000);
    let m = marker("agent-1", MarkerType::ErrorDetected);
    tracker.record_marker(Some("s".into()), Some("p".into()), &m, 1_000);
    tracker.record_marker(Some("s".into()), Some("p".into()), &m, 1_000 + 29_000);
    assert_eq!(tracker.len(), 1);
}

#[test]
fn marker_dedup_admits_repeat_after_window_elapses() {
    let tracker = ChangeTracker::new(100, 120_000);
    let m = marker("agent-1", MarkerType::ErrorDetected);
    tracker.record_marker(Some("s".into()), Some("p".into()), &m, 1_000);
    tracker.record_marker(Some("s".into()), Some("p".into()), &m, 1_000 + 30_001);
    assert_eq!(tracker.len(), 2);
}

#[test]
fn marker_dedup_is_scoped_per_agent_id() {
    let tracker = ChangeTracker::new(100, 60_000);
    let m1 = marker("agent-1", MarkerType::ErrorDetected);
    let m2 = marker("agent-2", MarkerType::ErrorDetected);
    tracker.record_marker(Some("s".into()), Some("p".into()), &m1, 1_000);
    tracker.record_marker(Some("s".into()), Some("p".into()), &m2, 1_000);
    assert_eq!(tracker.len(), 2);
}
