// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change Tracker (spec 4.I): a bounded ring of [`StateChange`] events, the
//! one process-wide singleton permitted by spec 5/9 alongside the icon
//! registry. Also owns the 30s marker fingerprint dedup window (spec 4.C;
//! SPEC_FULL.md "Supplemented features" #1): the Detector stays pure and
//! stateless per call, so dedup lives here instead.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::model::{MarkerEvent, MarkerType, StateChange, StateChangeType};

const MARKER_DEDUP_WINDOW_MS: u64 = 30_000;

struct Ring {
    events: Vec<StateChange>,
    max_size: usize,
    max_age_ms: u64,
    marker_last_seen: HashMap<(String, MarkerTypeKey), u64>,
}

/// `MarkerType` isn't `Hash`/`Eq` by derive choice in [`crate::model`]
/// (it only needs to compare, not key a map, anywhere else); this local
/// newtype gives the dedup map a hashable key without changing the
/// public model type's derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MarkerTypeKey(u8);

fn marker_type_key(kind: MarkerType) -> MarkerTypeKey {
    MarkerTypeKey(match kind {
        MarkerType::PromptSent => 0,
        MarkerType::CompletionDetected => 1,
        MarkerType::ErrorDetected => 2,
        MarkerType::AgentStarted => 3,
        MarkerType::AgentStopped => 4,
    })
}

/// A change collapsed by [`ChangeTracker::coalesce`]: consecutive
/// same-`(Type, Session, Pane)` events summarized into one.
#[derive(Debug, Clone, PartialEq)]
pub struct CoalescedChange {
    pub kind: StateChangeType,
    pub session: Option<String>,
    pub pane: Option<String>,
    pub count: u64,
    pub first_at_epoch_ms: u64,
    pub last_at_epoch_ms: u64,
}

/// The process singleton. Construct once at startup, share via `Arc`, tear
/// down at exit (spec 5/9).
pub struct ChangeTracker {
    ring: RwLock<Ring>,
}

impl ChangeTracker {
    pub fn new(max_size: usize, max_age_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            ring: RwLock::new(Ring { events: Vec::new(), max_size, max_age_ms, marker_last_seen: HashMap::new() }),
        })
    }

    /// Append one event, stamping `timestamp_epoch_ms` if unset (`0`),
    /// pruning expired entries, and evicting the head if at capacity.
    pub fn record(&self, mut event: StateChange, now_epoch_ms: u64) {
        if event.timestamp_epoch_ms == 0 {
            event.timestamp_epoch_ms = now_epoch_ms;
        }
        let mut ring = self.ring.write();
        prune_locked(&mut ring, now_epoch_ms);
        if ring.events.len() >= ring.max_size {
            ring.events.remove(0);
        }
        ring.events.push(event);
    }

    /// Record a marker as a `StateChange`, unless its `(AgentID, Type)`
    /// fingerprint repeated within the last 30s (spec 4.C).
    pub fn record_marker(&self, session: Option<String>, pane: Option<String>, marker: &MarkerEvent, now_epoch_ms: u64) {
        let key = (marker.agent_id.clone(), marker_type_key(marker.kind));
        {
            let ring = self.ring.read();
            if let Some(&last) = ring.marker_last_seen.get(&key) {
                if now_epoch_ms.saturating_sub(last) < MARKER_DEDUP_WINDOW_MS {
                    return;
                }
            }
        }

        let mut details = serde_json::Map::new();
        details.insert("marker_id".to_string(), serde_json::Value::String(marker.id.clone()));
        details.insert("agent_id".to_string(), serde_json::Value::String(marker.agent_id.clone()));
        if let Some(msg) = &marker.message {
            details.insert("message".to_string(), serde_json::Value::String(msg.clone()));
        }

        let kind = match marker.kind {
            MarkerType::PromptSent | MarkerType::AgentStarted | MarkerType::AgentStopped | MarkerType::CompletionDetected => {
                StateChangeType::AgentState
            }
            MarkerType::ErrorDetected => StateChangeType::Alert,
        };

        self.record(
            StateChange { timestamp_epoch_ms: now_epoch_ms, kind, session, pane, details },
            now_epoch_ms,
        );
        self.ring.write().marker_last_seen.insert(key, now_epoch_ms);
    }

    /// A deep-copied snapshot of events with `timestamp_epoch_ms > ts`.
    pub fn since(&self, ts: u64) -> Vec<StateChange> {
        self.ring.read().events.iter().filter(|e| e.timestamp_epoch_ms > ts).cloned().collect()
    }

    /// A deep-copied snapshot of every event currently held.
    pub fn all(&self) -> Vec<StateChange> {
        self.ring.read().events.clone()
    }

    /// Collapse consecutive same-`(Type, Session, Pane)` events into
    /// summary records. All-distinct-keys input yields one
    /// `CoalescedChange` per event, each with `count = 1` (testable
    /// property 8).
    pub fn coalesce(&self) -> Vec<CoalescedChange> {
        let events = self.ring.read().events.clone();
        let mut out: Vec<CoalescedChange> = Vec::new();
        for e in events {
            if let Some(last) = out.last_mut() {
                if last.kind == e.kind && last.session == e.session && last.pane == e.pane {
                    last.count += 1;
                    last.last_at_epoch_ms = e.timestamp_epoch_ms;
                    continue;
                }
            }
            out.push(CoalescedChange {
                kind: e.kind,
                session: e.session,
                pane: e.pane,
                count: 1,
                first_at_epoch_ms: e.timestamp_epoch_ms,
                last_at_epoch_ms: e.timestamp_epoch_ms,
            });
        }
        out
    }

    /// Drop entries older than `max_age_ms`.
    pub fn prune(&self, now_epoch_ms: u64) {
        prune_locked(&mut self.ring.write(), now_epoch_ms);
    }

    pub fn len(&self) -> usize {
        self.ring.read().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn prune_locked(ring: &mut Ring, now_epoch_ms: u64) {
    let max_age_ms = ring.max_age_ms;
    ring.events.retain(|e| now_epoch_ms.saturating_sub(e.timestamp_epoch_ms) <= max_age_ms);
}

#[cfg(test)]
#[path = "change_tracker_tests.rs"]
mod tests;
