// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`MultiplexerAdapter`] double for exercising the Pane
//! Registry, State Detector, Archiver, and Pipeline without a real `tmux`
//! process (SPEC_FULL.md "Supplemented features" #3).

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;

use crate::error::NtmError;

use super::{BoxFuture, MultiplexerAdapter, RawPane, SendKeysOptions, SplitDirection, Target};

#[derive(Debug, Clone, Default)]
struct FakePane {
    title: String,
    screen: String,
    sent: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct FakeSession {
    cwd: String,
    next_pane_index: u32,
    panes: HashMap<u32, FakePane>,
}

/// Records every call against it so tests can assert on sequencing
/// (stagger, submission protocol) in addition to end state.
#[derive(Default)]
pub struct FakeAdapter {
    sessions: Mutex<HashMap<String, FakeSession>>,
    calls: Mutex<Vec<String>>,
    failing_sends: Mutex<HashSet<(String, u32)>>,
}

impl FakeAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn log(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }

    /// Test hook: overwrite a pane's screen content as if the agent printed
    /// it directly, bypassing `send_keys`.
    pub fn set_screen(&self, session: &str, pane_index: u32, content: &str) {
        if let Some(s) = self.sessions.lock().get_mut(session) {
            if let Some(p) = s.panes.get_mut(&pane_index) {
                p.screen = content.to_string();
            }
        }
    }

    /// Fault injection: make the next and all subsequent `send_keys` calls
    /// against this pane fail, to exercise partial-batch-failure paths
    /// without tearing down the whole session.
    pub fn fail_sends(&self, session: &str, pane_index: u32) {
        self.failing_sends.lock().insert((session.to_string(), pane_index));
    }
}

impl MultiplexerAdapter for FakeAdapter {
    fn create_session<'a>(&'a self, name: &'a str, cwd: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            self.log(format!("create_session {name}"));
            let mut sessions = self.sessions.lock();
            if sessions.contains_key(name) {
                return Err(NtmError::Internal { detail: format!("session {name} already exists") });
            }
            let mut session = FakeSession { cwd: cwd.to_string(), next_pane_index: 1, panes: HashMap::new() };
            session.panes.insert(1, FakePane::default());
            sessions.insert(name.to_string(), session);
            Ok(())
        })
    }

    fn split_window<'a>(
        &'a self,
        session: &'a str,
        _direction: SplitDirection,
        _cwd: &'a str,
    ) -> BoxFuture<'a, u32> {
        Box::pin(async move {
            self.log(format!("split_window {session}"));
            let mut sessions = self.sessions.lock();
            let s = sessions
                .get_mut(session)
                .ok_or_else(|| NtmError::SessionNotFound { session: session.to_string() })?;
            s.next_pane_index += 1;
            let idx = s.next_pane_index;
            s.panes.insert(idx, FakePane::default());
            Ok(idx)
        })
    }

    fn list_sessions(&self) -> BoxFuture<'_, Vec<String>> {
        Box::pin(async move { Ok(self.sessions.lock().keys().cloned().collect()) })
    }

    fn list_panes<'a>(&'a self, session: &'a str) -> BoxFuture<'a, Vec<RawPane>> {
        Box::pin(async move {
            let sessions = self.sessions.lock();
            let s = sessions
                .get(session)
                .ok_or_else(|| NtmError::SessionNotFound { session: session.to_string() })?;
            let mut panes: Vec<RawPane> =
                s.panes.iter().map(|(index, p)| RawPane { index: *index, title: p.title.clone() }).collect();
            panes.sort_by_key(|p| p.index);
            Ok(panes)
        })
    }

    fn set_pane_title<'a>(&'a self, target: &'a Target, title: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            self.log(format!("set_pane_title {target} {title}"));
            let mut sessions = self.sessions.lock();
            let s = sessions
                .get_mut(target.session())
                .ok_or_else(|| NtmError::SessionNotFound { session: target.session().to_string() })?;
            let p = s.panes.get_mut(&target.pane_index()).ok_or_else(|| NtmError::PaneNotFound {
                session: target.session().to_string(),
                pane: target.pane_index().to_string(),
            })?;
            p.title = title.to_string();
            Ok(())
        })
    }

    fn select_layout<'a>(&'a self, session: &'a str, _layout: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            self.log(format!("select_layout {session}"));
            Ok(())
        })
    }

    fn capture_pane<'a>(&'a self, target: &'a Target, _max_lines: u32) -> BoxFuture<'a, String> {
        Box::pin(async move {
            let sessions = self.sessions.lock();
            let s = sessions
                .get(target.session())
                .ok_or_else(|| NtmError::SessionNotFound { session: target.session().to_string() })?;
            let p = s.panes.get(&target.pane_index()).ok_or_else(|| NtmError::PaneNotFound {
                session: target.session().to_string(),
                pane: target.pane_index().to_string(),
            })?;
            Ok(p.screen.clone())
        })
    }

    fn send_keys<'a>(
        &'a self,
        target: &'a Target,
        payload: &'a str,
        opts: SendKeysOptions,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            self.log(format!("send_keys {target} {payload:?} literal={} enter={}", opts.literal, opts.press_enter));
            if self.failing_sends.lock().contains(&(target.session().to_string(), target.pane_index())) {
                return Err(NtmError::Internal { detail: format!("injected send failure for {target}") });
            }
            let mut sessions = self.sessions.lock();
            let s = sessions
                .get_mut(target.session())
                .ok_or_else(|| NtmError::SessionNotFound { session: target.session().to_string() })?;
            let p = s.panes.get_mut(&target.pane_index()).ok_or_else(|| NtmError::PaneNotFound {
                session: target.session().to_string(),
                pane: target.pane_index().to_string(),
            })?;
            p.sent.push(payload.to_string());
            if opts.press_enter {
                p.sent.push("\n".to_string());
            }
            Ok(())
        })
    }

    fn send_paste_buffer<'a>(&'a self, target: &'a Target, payload: &'a str) -> BoxFuture<'a, ()> {
        self.send_keys(target, payload, SendKeysOptions { literal: true, press_enter: false })
    }

    fn kill_session<'a>(&'a self, name: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            self.log(format!("kill_session {name}"));
            self.sessions
                .lock()
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| NtmError::SessionNotFound { session: name.to_string() })
        })
    }

    fn has_session<'a>(&'a self, name: &'a str) -> BoxFuture<'a, bool> {
        Box::pin(async move { Ok(self.sessions.lock().contains_key(name)) })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
