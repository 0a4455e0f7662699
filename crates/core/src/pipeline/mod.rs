// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt Delivery Pipeline (spec 4.E): resolves a `TargetFilter` against
//! the Pane Registry, dispatches the agent-type-specific submission
//! protocol to each resolved pane with a mandatory inter-target stagger,
//! and optionally tracks acknowledgment.

pub mod protocol;

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::adapter::MultiplexerAdapter;
use crate::detector::{self, ClassifyInput};
use crate::error::NtmError;
use crate::model::LifecycleState;
use crate::registry::{PaneRegistry, TargetFilter};
use crate::timing::TimingConfig;

/// Inputs to one `send` call (spec 4.E).
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub session: String,
    pub filter: TargetFilter,
    pub message: String,
    pub options: SendOptions,
}

#[derive(Debug, Clone)]
pub struct SendOptions {
    pub track_acknowledgment: bool,
    /// Per-request stagger override; falls back to the session default.
    pub delay_ms: Option<u64>,
    pub timeout: Duration,
    pub dry_run: bool,
    pub literal: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            track_acknowledgment: false,
            delay_ms: None,
            timeout: Duration::from_secs(10),
            dry_run: false,
            literal: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTarget {
    pub pane: u32,
    pub reason: String,
}

/// Outcome of one `send` call. `targets` is always populated with every
/// pane the filter resolved to, even on `dry_run` (spec 4.E: an empty
/// resolution is a success with `Targets=[]`).
#[derive(Debug, Clone, Default)]
pub struct SendOutcome {
    pub targets: Vec<u32>,
    pub would_send_to: Option<Vec<u32>>,
    pub successful: Vec<u32>,
    pub failed: Vec<FailedTarget>,
    pub pending: Vec<u32>,
}

pub struct Pipeline {
    adapter: Arc<dyn MultiplexerAdapter>,
    registry: Arc<PaneRegistry>,
    timing: TimingConfig,
}

impl Pipeline {
    pub fn new(adapter: Arc<dyn MultiplexerAdapter>, registry: Arc<PaneRegistry>, timing: TimingConfig) -> Self {
        Self { adapter, registry, timing }
    }

    pub async fn send(&self, req: SendRequest, now_epoch_ms: u64) -> Result<SendOutcome, NtmError> {
        self.registry.refresh(&req.session).await?;
        let panes = req.filter.resolve(&self.registry, &req.session)?;
        let targets: Vec<u32> = panes.iter().map(|p| p.index).collect();

        if panes.is_empty() {
            return Ok(SendOutcome { targets, ..Default::default() });
        }

        if req.options.dry_run {
            return Ok(SendOutcome { targets: targets.clone(), would_send_to: Some(targets), ..Default::default() });
        }

        let stagger = req.options.delay_ms.map(Duration::from_millis).unwrap_or_else(|| self.timing.default_stagger());

        let mut outcome = SendOutcome { targets: targets.clone(), ..Default::default() };

        for (i, pane) in panes.iter().enumerate() {
            let target = match crate::adapter::Target::new(&req.session, pane.index) {
                Some(t) => t,
                None => {
                    outcome.failed.push(FailedTarget { pane: pane.index, reason: "invalid target".into() });
                    continue;
                }
            };

            let send_result = protocol::submit(self.adapter.as_ref(), &target, pane.agent_type, &req.message, &self.timing).await;

            match send_result {
                Ok(()) => {
                    if req.options.track_acknowledgment {
                        match self.track_acknowledgment(&target, pane, &req.message, req.options.timeout, now_epoch_ms).await {
                            AckOutcome::Acknowledged => outcome.successful.push(pane.index),
                            AckOutcome::Pending => outcome.pending.push(pane.index),
                            AckOutcome::Failed(kind) => {
                                outcome.failed.push(FailedTarget { pane: pane.index, reason: format!("{kind}") })
                            }
                        }
                    } else {
                        outcome.successful.push(pane.index);
                    }
                }
                Err(e) => outcome.failed.push(FailedTarget { pane: pane.index, reason: e.to_string() }),
            }

            if i + 1 < panes.len() {
                tokio::time::sleep(stagger).await;
            }
        }

        Ok(outcome)
    }

    async fn track_acknowledgment(
        &self,
        target: &crate::adapter::Target,
        pane: &crate::model::Pane,
        message: &str,
        timeout: Duration,
        now_epoch_ms: u64,
    ) -> AckOutcome {
        let deadline = Instant::now() + timeout;
        let poll_interval = self.timing.ack_poll_interval();

        loop {
            let capture = match self.adapter.capture_pane(target, 200).await {
                Ok(c) => c,
                Err(_) => return AckOutcome::Pending,
            };

            let (state, _) = detector::classify(ClassifyInput {
                agent_id: &format!("{}:{}", pane.session, pane.index),
                agent_type: pane.agent_type,
                scrollback: &capture,
                time_since_last_capture: poll_interval,
                previous_state: Some(&LifecycleState::Idle),
                now_epoch_ms,
            });

            if let LifecycleState::Error { kind } = state {
                return AckOutcome::Failed(kind);
            }
            if matches!(state, LifecycleState::Working | LifecycleState::Waiting) {
                return AckOutcome::Acknowledged;
            }
            if message_echoed_with_followup(&capture, message) {
                return AckOutcome::Acknowledged;
            }

            if Instant::now() >= deadline {
                return AckOutcome::Pending;
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}

enum AckOutcome {
    Acknowledged,
    Pending,
    Failed(crate::model::ErrorKind),
}

/// Second acknowledgment signal (spec 4.E): the message body appears in
/// scrollback followed by at least one additional output line.
fn message_echoed_with_followup(capture: &str, message: &str) -> bool {
    let Some(pos) = capture.find(message) else { return false };
    capture[pos + message.len()..].lines().any(|l| !l.trim().is_empty())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
