// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Core data model: agents, panes, sessions, lifecycle states, markers,
//! archive records, and reservations.
//!
//! Types here carry no behavior beyond parsing/formatting and small
//! invariant-preserving constructors; the engines in sibling modules own
//! the behavior that mutates or interprets them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical pane-title type code, e.g. the `cc` in `mysess__cc_2`.
pub const TYPE_CODE_CLAUDE: &str = "cc";
pub const TYPE_CODE_CODEX: &str = "cod";
pub const TYPE_CODE_GEMINI: &str = "gmi";
pub const TYPE_CODE_USER: &str = "user";

/// Known agent types. `User` denotes a human-controlled pane: it receives
/// no prompts and is excluded from `all`/type filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    Claude,
    Codex,
    Gemini,
    User,
    /// Title did not parse to a known type code. Never dropped from the
    /// registry, per spec 4.B.
    Unknown,
}

impl AgentType {
    /// The type code used in the canonical pane title.
    pub fn type_code(&self) -> &'static str {
        match self {
            Self::Claude => TYPE_CODE_CLAUDE,
            Self::Codex => TYPE_CODE_CODEX,
            Self::Gemini => TYPE_CODE_GEMINI,
            Self::User => TYPE_CODE_USER,
            Self::Unknown => "unknown",
        }
    }

    fn from_type_code(code: &str) -> Option<Self> {
        match code {
            TYPE_CODE_CLAUDE => Some(Self::Claude),
            TYPE_CODE_CODEX => Some(Self::Codex),
            TYPE_CODE_GEMINI => Some(Self::Gemini),
            TYPE_CODE_USER => Some(Self::User),
            _ => None,
        }
    }

    /// Whether this agent type participates in prompt delivery and
    /// archiving (spec 4.B/4.D: User and the control pane are excluded).
    pub fn is_prompt_target(&self) -> bool {
        !matches!(self, Self::User)
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_code())
    }
}

/// A parsed canonical pane title: `{session}__{type-code}_{ordinal}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTitle {
    pub session: String,
    pub agent_type: AgentType,
    pub ordinal: u32,
}

/// Parse a canonical pane title.
///
/// Unparseable titles are not an error at the call site: callers that need
/// spec 4.B's "never dropped" behavior should fall back to
/// `AgentType::Unknown` with the raw title preserved rather than discarding
/// the pane. This function returns `None` for anything that cannot be
/// split into the three canonical components, leaving that fallback to the
/// caller (see [`crate::registry::PaneRegistry::refresh`]).
pub fn parse_title(title: &str) -> Option<ParsedTitle> {
    let (session, rest) = title.split_once("__")?;
    let (code, ordinal_str) = rest.split_once('_')?;
    let agent_type = AgentType::from_type_code(code)?;
    let ordinal = ordinal_str.parse::<u32>().ok()?;
    if session.is_empty() {
        return None;
    }
    Some(ParsedTitle { session: session.to_string(), agent_type, ordinal })
}

/// Format the canonical pane title for the given components.
pub fn format_title(session: &str, agent_type: AgentType, ordinal: u32) -> String {
    format!("{session}__{}_{ordinal}", agent_type.type_code())
}

/// One terminal slot within a session's single window.
#[derive(Debug, Clone, PartialEq)]
pub struct Pane {
    pub session: String,
    pub index: u32,
    pub agent_type: AgentType,
    pub variant: Option<String>,
    pub title: String,
    pub ready: bool,
    pub state: LifecycleState,
}

impl Pane {
    /// The control pane is always index 1 and is excluded from prompt
    /// delivery and archiving.
    pub fn is_control(&self) -> bool {
        self.index == 1
    }
}

/// A named multiplexer session containing one window with control + agent
/// panes.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub name: String,
    pub window_index: u32,
    pub control_pane_index: u32,
    pub agent_panes: Vec<u32>,
    pub created_at_epoch_ms: u64,
    pub project_dir: String,
}

/// Session names must match `[A-Za-z0-9_-]+`.
pub fn is_valid_session_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Sub-classification of an `Error` lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    RateLimited,
    CrashedAuth,
    ToolFailure,
    ContextExhausted,
    OtherError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::CrashedAuth => "crashed_auth",
            Self::ToolFailure => "tool_failure",
            Self::ContextExhausted => "context_exhausted",
            Self::OtherError => "other_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified lifecycle state of one pane, produced by the State Detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LifecycleState {
    Idle,
    Working,
    Waiting,
    Error { kind: ErrorKind },
    Stopped,
    Unknown,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Working => "working",
            Self::Waiting => "waiting",
            Self::Error { .. } => "error",
            Self::Stopped => "stopped",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A derived, not stored, event surfaced by the State Detector and fed into
/// the Change Tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerEvent {
    pub id: String,
    pub agent_id: String,
    #[serde(rename = "type")]
    pub kind: MarkerType,
    pub timestamp_epoch_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerType {
    PromptSent,
    CompletionDetected,
    ErrorDetected,
    AgentStarted,
    AgentStopped,
}

impl MarkerEvent {
    /// The `(AgentID, Type)` pair used for 30s dedup in the Change Tracker
    /// (spec 4.C).
    pub fn fingerprint_key(&self) -> (String, MarkerType) {
        (self.agent_id.clone(), self.kind)
    }
}

/// Immutable once written: one line of an Archiver's JSONL output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    pub session: String,
    pub pane: String,
    pub pane_index: u32,
    pub agent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub timestamp: String,
    pub content: String,
    pub lines: usize,
    pub sequence: u64,
}

/// An advisory, TTL-bounded lock on a path owned by a named agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub agent_name: String,
    pub project_root: String,
    pub path_pattern: String,
    pub acquired_epoch_ms: u64,
    pub expires_epoch_ms: u64,
    pub reason: Option<String>,
    pub released_epoch_ms: Option<u64>,
}

impl Reservation {
    /// Active iff not released and not yet expired.
    pub fn is_active(&self, now_epoch_ms: u64) -> bool {
        self.released_epoch_ms.is_none() && self.expires_epoch_ms > now_epoch_ms
    }
}

/// Normalize a path to forward slashes, relative to nothing in particular —
/// callers are responsible for making the path relative to the project
/// root before calling this. Kept as a standalone pure function (see
/// SPEC_FULL.md "Supplemented features") so platform-specific separator
/// bugs are caught independently of the locking logic.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// One entry in the Change Tracker's bounded ring buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChange {
    pub timestamp_epoch_ms: u64,
    #[serde(rename = "type")]
    pub kind: StateChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pane: Option<String>,
    #[serde(default)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateChangeType {
    AgentOutput,
    AgentState,
    BeadUpdate,
    MailReceived,
    Alert,
    PaneCreated,
    PaneRemoved,
    SessionCreated,
    SessionRemoved,
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
