// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-Session File Reservation Service (spec 4.G).
//!
//! TTL-bounded advisory locks keyed on normalized path, scoped to a project
//! root. All grants for a given root go through a single critical section
//! so the conflict check-then-insert is atomic (spec 5).

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::NtmError;
use crate::model::{normalize_path, Reservation};

const MIN_TTL_SECS: u64 = 60;

/// A path and the agent(s) currently holding it, reported on conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConflict {
    pub path: String,
    pub holders: Vec<String>,
}

/// Translates a bound session name to the `AgentName` used to own
/// reservations. Spec 6: "Session-Agent registry" external collaborator.
/// Interface-only: production wiring is supplied by the CLI layer, which
/// talks to whatever process owns the real registry.
pub trait SessionAgentRegistry: Send + Sync {
    fn agent_for_session(&self, session: &str) -> Result<String, NtmError>;
}

/// One project root's reservation table. Exactly one exists per project
/// root in the running process (spec 3: "one Reservation service per
/// project root").
pub struct ReservationService {
    project_root: String,
    reservations: Mutex<HashMap<String, Reservation>>,
}

impl ReservationService {
    pub fn new(project_root: impl Into<String>) -> Arc<Self> {
        Arc::new(Self { project_root: project_root.into(), reservations: Mutex::new(HashMap::new()) })
    }

    pub fn project_root(&self) -> &str {
        &self.project_root
    }

    /// Grant reservations for `paths` to `agent_name`, or fail atomically
    /// with the full conflict list. No reservation is created if any path
    /// conflicts (spec 4.G, testable property 5).
    pub fn lock(
        &self,
        agent_name: &str,
        paths: &[String],
        ttl_secs: u64,
        reason: Option<String>,
        now_epoch_ms: u64,
    ) -> Result<Vec<Reservation>, NtmError> {
        if ttl_secs < MIN_TTL_SECS {
            return Err(NtmError::TtlTooShort { minimum_secs: MIN_TTL_SECS });
        }

        let normalized: Vec<String> = paths.iter().map(|p| normalize_path(p)).collect();
        let mut table = self.reservations.lock();

        let mut conflicts = Vec::new();
        for path in &normalized {
            if let Some(existing) = table.get(path) {
                if existing.is_active(now_epoch_ms) && existing.agent_name != agent_name {
                    conflicts.push(PathConflict {
                        path: path.clone(),
                        holders: vec![existing.agent_name.clone()],
                    });
                }
            }
        }

        if !conflicts.is_empty() {
            return Err(NtmError::LockConflict { conflicts });
        }

        let expires = now_epoch_ms + ttl_secs * 1000;
        let mut granted = Vec::with_capacity(normalized.len());
        for path in normalized {
            let reservation = Reservation {
                agent_name: agent_name.to_string(),
                project_root: self.project_root.clone(),
                path_pattern: path.clone(),
                acquired_epoch_ms: now_epoch_ms,
                expires_epoch_ms: expires,
                reason: reason.clone(),
                released_epoch_ms: None,
            };
            table.insert(path, reservation.clone());
            granted.push(reservation);
        }

        Ok(granted)
    }

    /// Release specific paths owned by `agent_name`. Returns the count
    /// released.
    pub fn unlock_paths(&self, agent_name: &str, paths: &[String], now_epoch_ms: u64) -> u64 {
        let normalized: Vec<String> = paths.iter().map(|p| normalize_path(p)).collect();
        let mut table = self.reservations.lock();
        let mut released = 0u64;
        for path in &normalized {
            if let Some(existing) = table.get_mut(path) {
                if existing.agent_name == agent_name && existing.is_active(now_epoch_ms) {
                    existing.released_epoch_ms = Some(now_epoch_ms);
                    released += 1;
                }
            }
        }
        released
    }

    /// Release every active reservation owned by `agent_name` within this
    /// project root. Returns the count released; the caller surfaces `-1`
    /// as the "all" sentinel per spec 4.G, not this method (a plain count
    /// here is not racy since it is computed and mutated under one lock
    /// acquisition).
    pub fn unlock_all(&self, agent_name: &str, now_epoch_ms: u64) -> u64 {
        let mut table = self.reservations.lock();
        let mut released = 0u64;
        for existing in table.values_mut() {
            if existing.agent_name == agent_name && existing.is_active(now_epoch_ms) {
                existing.released_epoch_ms = Some(now_epoch_ms);
                released += 1;
            }
        }
        released
    }

    /// Active reservations held by `agent_name`, for diagnostics/listing.
    pub fn active_for_agent(&self, agent_name: &str, now_epoch_ms: u64) -> Vec<Reservation> {
        self.reservations
            .lock()
            .values()
            .filter(|r| r.agent_name == agent_name && r.is_active(now_epoch_ms))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[path = "reservation_tests.rs"]
mod tests;
