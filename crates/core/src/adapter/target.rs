// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target identifier validation: the Multiplexer Adapter's trust boundary
//! (spec 4.A, spec 9 "Subprocess injection surface").
//!
//! Every target passed to the adapter must satisfy the strict form
//! `session:window.pane-index` before it is allowed anywhere near the
//! external binary's command line.

use crate::model::is_valid_session_name;

/// A validated `session:window.pane-index` target. Constructing one is the
/// only way to obtain a string the adapter will act on; nothing downstream
/// needs to re-validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    session: String,
    window: u32,
    pane_index: u32,
}

impl Target {
    /// Parse and validate a target string. `window` must be `1` (spec 3:
    /// `WindowIndex` is fixed at 1) and `pane_index` must be a non-negative
    /// decimal integer.
    pub fn parse(raw: &str) -> Option<Self> {
        let (session, rest) = raw.split_once(':')?;
        let (window_str, pane_str) = rest.split_once('.')?;

        if !is_valid_session_name(session) {
            return None;
        }
        let window: u32 = window_str.parse().ok()?;
        if window != 1 {
            return None;
        }
        let pane_index: u32 = pane_str.parse().ok()?;

        Some(Self { session: session.to_string(), window, pane_index })
    }

    pub fn new(session: impl Into<String>, pane_index: u32) -> Option<Self> {
        let session = session.into();
        if !is_valid_session_name(&session) {
            return None;
        }
        Some(Self { session, window: 1, pane_index })
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn pane_index(&self) -> u32 {
        self.pane_index
    }

    /// Render back to `session:window.pane-index` for the external binary's
    /// command line. This is the only place this string is constructed, and
    /// it is only reachable via a validated `Target`.
    pub fn as_tmux_arg(&self) -> String {
        format!("{}:{}.{}", self.session, self.window, self.pane_index)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_tmux_arg())
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
