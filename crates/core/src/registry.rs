// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pane Registry (spec 4.B): an ephemeral projection over the Multiplexer
//! Adapter's `list_panes`. Always safe to discard and rebuild; readers take
//! a shared lock, the single refresher takes an exclusive lock (spec 5).
//!
//! Also hosts [`TargetFilter::resolve`], factored once here and reused by
//! the Pipeline and the Lifecycle Manager's restart/kill paths rather than
//! duplicated per caller (SPEC_FULL.md "Supplemented features" #2).

use std::sync::Arc;

use parking_lot::RwLock;

use crate::adapter::MultiplexerAdapter;
use crate::error::NtmError;
use crate::model::{self, AgentType, LifecycleState, Pane};

/// `TargetFilter` selects a subset of a session's agent panes (spec 4.E).
/// The control pane (index 1) is never a valid target regardless of which
/// variant is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetFilter {
    /// Explicit pane indices, in the order given.
    Indices(Vec<u32>),
    /// Every pane of the given agent type.
    AgentType(AgentType),
    /// Every non-`User` pane (spec 4.E: `"all"`).
    All,
    /// Every non-`User` pane except the given indices.
    AllExcept(Vec<u32>),
}

impl TargetFilter {
    /// Resolve against the registry's current view of `session`, producing
    /// an ordered list of target panes. Never includes the control pane or
    /// `User`-type panes. An unknown session yields [`NtmError::SessionNotFound`].
    pub fn resolve(&self, registry: &PaneRegistry, session: &str) -> Result<Vec<Pane>, NtmError> {
        let panes = registry.panes(session)?;
        let eligible = |p: &&Pane| !p.is_control() && p.agent_type.is_prompt_target();

        let resolved = match self {
            TargetFilter::Indices(indices) => {
                let mut out = Vec::with_capacity(indices.len());
                for &idx in indices {
                    if let Some(p) = panes.iter().find(|p| p.index == idx).filter(eligible) {
                        out.push(p.clone());
                    }
                }
                out
            }
            TargetFilter::AgentType(t) => {
                let mut out: Vec<Pane> = panes.iter().filter(eligible).filter(|p| p.agent_type == *t).cloned().collect();
                out.sort_by_key(|p| p.index);
                out
            }
            TargetFilter::All => {
                let mut out: Vec<Pane> = panes.iter().filter(eligible).cloned().collect();
                out.sort_by_key(|p| p.index);
                out
            }
            TargetFilter::AllExcept(excluded) => {
                let mut out: Vec<Pane> =
                    panes.iter().filter(eligible).filter(|p| !excluded.contains(&p.index)).cloned().collect();
                out.sort_by_key(|p| p.index);
                out
            }
        };
        Ok(resolved)
    }
}

/// Ephemeral, rebuildable projection of one session's panes, keyed by
/// session name. Stale reads are tolerated per spec 5: the next `refresh`
/// re-checks via the adapter anyway.
pub struct PaneRegistry {
    adapter: Arc<dyn MultiplexerAdapter>,
    sessions: RwLock<indexmap::IndexMap<String, Vec<Pane>>>,
}

impl PaneRegistry {
    pub fn new(adapter: Arc<dyn MultiplexerAdapter>) -> Self {
        Self { adapter, sessions: RwLock::new(indexmap::IndexMap::new()) }
    }

    /// Calls `list_panes` and parses each title, replacing the registry's
    /// view of `session`. Unparseable titles become `AgentType::Unknown`
    /// panes rather than being dropped (spec 4.B).
    pub async fn refresh(&self, session: &str) -> Result<Vec<Pane>, NtmError> {
        let raw = self.adapter.list_panes(session).await?;
        let mut panes: Vec<Pane> = raw
            .into_iter()
            .map(|rp| match model::parse_title(&rp.title) {
                Some(parsed) => Pane {
                    session: parsed.session,
                    index: rp.index,
                    agent_type: parsed.agent_type,
                    variant: None,
                    title: rp.title,
                    ready: true,
                    state: LifecycleState::Unknown,
                },
                None => Pane {
                    session: session.to_string(),
                    index: rp.index,
                    agent_type: AgentType::Unknown,
                    variant: None,
                    title: rp.title,
                    ready: true,
                    state: LifecycleState::Unknown,
                },
            })
            .collect();
        panes.sort_by_key(|p| p.index);

        self.sessions.write().insert(session.to_string(), panes.clone());
        Ok(panes)
    }

    /// Current cached view of `session`'s panes. Does not touch the
    /// adapter; callers that need a fresh view must call [`Self::refresh`]
    /// first.
    pub fn panes(&self, session: &str) -> Result<Vec<Pane>, NtmError> {
        self.sessions
            .read()
            .get(session)
            .cloned()
            .ok_or_else(|| NtmError::SessionNotFound { session: session.to_string() })
    }

    /// Record an externally-observed state transition for one pane, e.g.
    /// after a State Detector call. Does not touch the adapter.
    pub fn set_pane_state(&self, session: &str, index: u32, state: LifecycleState) {
        if let Some(panes) = self.sessions.write().get_mut(session) {
            if let Some(p) = panes.iter_mut().find(|p| p.index == index) {
                p.state = state;
            }
        }
    }

    /// Drop a session entirely from the cache, e.g. after `kill_session`.
    pub fn forget(&self, session: &str) {
        self.sessions.write().shift_remove(session);
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
