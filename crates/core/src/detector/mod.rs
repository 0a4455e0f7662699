// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State Detector (spec 4.C): a pure, stateless classifier from
//! `(AgentType, scrollback, time-since-last-capture)` to
//! `(LifecycleState, []MarkerEvent)`. All history lives in the Change
//! Tracker, never here.

pub mod patterns;

use std::time::Duration;

use crate::model::{AgentType, ErrorKind, LifecycleState, MarkerEvent, MarkerType};

/// Tail window size used for "is the prompt sitting at its sentinel right
/// now" checks. Matches the teacher's screen-scrollback classifier, which
/// only ever inspects the last handful of visible lines rather than the
/// full buffer.
const TAIL_LINES: usize = 12;

/// How recently the tail must have changed for rule 2 ("Working") to fire,
/// and conversely how long it must have been still for rule 4 ("Idle") to
/// fire.
const QUIET_THRESHOLD: Duration = Duration::from_secs(2);

/// Everything [`classify`] needs beyond the raw scrollback. `agent_id` and
/// `now_epoch_ms` are operational additions the spec's abstract 3-tuple
/// input implies but does not name, needed to stamp [`MarkerEvent`]s.
pub struct ClassifyInput<'a> {
    pub agent_id: &'a str,
    pub agent_type: AgentType,
    pub scrollback: &'a str,
    pub time_since_last_capture: Duration,
    pub previous_state: Option<&'a LifecycleState>,
    pub now_epoch_ms: u64,
}

fn tail(scrollback: &str) -> String {
    let lines: Vec<&str> = scrollback.lines().collect();
    let start = lines.len().saturating_sub(TAIL_LINES);
    lines[start..].join("\n")
}

fn marker(input: &ClassifyInput<'_>, kind: MarkerType, message: Option<String>) -> MarkerEvent {
    MarkerEvent {
        id: uuid::Uuid::new_v4().to_string(),
        agent_id: input.agent_id.to_string(),
        kind,
        timestamp_epoch_ms: input.now_epoch_ms,
        message,
    }
}

fn fatal_kind(p: &patterns::AgentPatterns, haystack: &str) -> Option<ErrorKind> {
    p.fatal.iter().find(|f| f.regex.is_match(haystack)).map(|f| f.kind)
}

/// Classify one capture. Rules are applied in order; the first match wins
/// (spec 4.C).
pub fn classify(input: ClassifyInput<'_>) -> (LifecycleState, Vec<MarkerEvent>) {
    if matches!(input.agent_type, AgentType::User | AgentType::Unknown) {
        return (LifecycleState::Unknown, Vec::new());
    }

    let p = patterns::for_agent_type(input.agent_type);
    let tail_text = tail(input.scrollback);

    // 1. Fatal banners anywhere in the capture.
    if let Some(kind) = fatal_kind(p, input.scrollback) {
        let m = marker(&input, MarkerType::ErrorDetected, Some(format!("{kind}")));
        return (LifecycleState::Error { kind }, vec![m]);
    }

    // 2. Active in-progress indicator, tail recently changed.
    let working = p.working_tail.iter().any(|re| re.is_match(&tail_text));
    if working && input.time_since_last_capture < QUIET_THRESHOLD {
        return (LifecycleState::Working, Vec::new());
    }

    // 3. Interactive confirmation prompt.
    if p.confirmation_tail.iter().any(|re| re.is_match(&tail_text)) {
        return (LifecycleState::Waiting, Vec::new());
    }

    // 4. Prompt sentinel with no recent change.
    if p.idle_sentinel.is_match(&tail_text) && input.time_since_last_capture >= QUIET_THRESHOLD {
        let mut markers = Vec::new();
        if matches!(input.previous_state, Some(LifecycleState::Working)) {
            markers.push(marker(&input, MarkerType::CompletionDetected, None));
        }
        return (LifecycleState::Idle, markers);
    }

    // 5. Empty or pre-initialization only.
    if input.scrollback.trim().is_empty() {
        return (LifecycleState::Unknown, Vec::new());
    }

    // 6. Agent process exited, shell prompt took its place.
    if p.shell_prompt.is_match(&tail_text) {
        let m = marker(&input, MarkerType::AgentStopped, None);
        return (LifecycleState::Stopped, vec![m]);
    }

    (LifecycleState::Unknown, Vec::new())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
