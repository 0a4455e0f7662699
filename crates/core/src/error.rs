// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unified error codes shared by every engine and surfaced in the robot
//! envelope.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of error kinds (spec 7).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NtmError {
    SessionNotFound { session: String },
    PaneNotFound { session: String, pane: String },
    BinaryMissing { binary: String },
    Timeout { op: String, after_ms: u64 },
    LockConflict { conflicts: Vec<crate::reservation::PathConflict> },
    TtlTooShort { minimum_secs: u64 },
    InvalidArgument { detail: String },
    IoError { detail: String },
    Internal { detail: String },
}

impl NtmError {
    /// Robot envelope `error_code`: upper-snake, from the closed set in
    /// spec 4.H.
    pub fn robot_code(&self) -> &'static str {
        match self {
            Self::SessionNotFound { .. } => "SESSION_NOT_FOUND",
            Self::PaneNotFound { .. } => "PANE_NOT_FOUND",
            Self::TtlTooShort { .. } => "TTL_TOO_SHORT",
            Self::LockConflict { .. } => "LOCK_CONFLICT",
            Self::BinaryMissing { .. } => "BINARY_MISSING",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::IoError { .. } => "IO_ERROR",
            Self::Internal { .. } => "INTERNAL",
            Self::Timeout { .. } => "IO_ERROR",
        }
    }

    /// A short, actionable remediation string for the envelope's `hint`
    /// field (spec 7).
    pub fn hint(&self) -> String {
        match self {
            Self::SessionNotFound { .. } => "Run `ntm list` to see available sessions.".into(),
            Self::PaneNotFound { .. } => "Run `ntm status <session>` to see available panes.".into(),
            Self::BinaryMissing { binary } => format!("Install or add `{binary}` to PATH."),
            Self::Timeout { .. } => "Increase the adapter timeout and retry.".into(),
            Self::LockConflict { .. } => "Unlock the conflicting paths or wait for their TTL to expire.".into(),
            Self::TtlTooShort { minimum_secs } => format!("Specify a TTL of at least {minimum_secs}s."),
            Self::InvalidArgument { .. } => "Check the command's arguments and retry.".into(),
            Self::IoError { .. } => "Check disk space and file permissions.".into(),
            Self::Internal { .. } => "This is an unexpected condition; please file a bug report.".into(),
        }
    }
}

impl fmt::Display for NtmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionNotFound { session } => write!(f, "session not found: {session}"),
            Self::PaneNotFound { session, pane } => write!(f, "pane not found: {session}:{pane}"),
            Self::BinaryMissing { binary } => write!(f, "required binary not found: {binary}"),
            Self::Timeout { op, after_ms } => write!(f, "{op} timed out after {after_ms}ms"),
            Self::LockConflict { conflicts } => {
                write!(f, "{} path(s) are already reserved", conflicts.len())
            }
            Self::TtlTooShort { minimum_secs } => write!(f, "TTL must be at least {minimum_secs}s"),
            Self::InvalidArgument { detail } => write!(f, "invalid argument: {detail}"),
            Self::IoError { detail } => write!(f, "I/O error: {detail}"),
            Self::Internal { detail } => write!(f, "internal error: {detail}"),
        }
    }
}

impl std::error::Error for NtmError {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
