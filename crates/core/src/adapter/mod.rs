// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Multiplexer Adapter (spec 4.A): the single trust boundary between user
//! strings and the external multiplexer binary.
//!
//! [`MultiplexerAdapter`] is a trait, not just a tmux implementation (see
//! SPEC_FULL.md "Supplemented features" #3), so the State Detector,
//! Archiver, and Pipeline can be exercised against an in-memory fake. The
//! production implementation, [`tmux::TmuxAdapter`], shells out to a real
//! `tmux` binary the way the teacher's `TmuxBackend` does.

pub mod fake;
pub mod target;
pub mod tmux;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::NtmError;
pub use target::Target;

/// Split direction for [`MultiplexerAdapter::split_window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitDirection {
    Horizontal,
    Vertical,
}

/// Options for [`MultiplexerAdapter::send_keys`] (spec 4.A).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendKeysOptions {
    /// No keybinding translation (`-l`).
    pub literal: bool,
    /// Append a carriage return after the payload.
    pub press_enter: bool,
}

/// A raw listed pane, before title parsing (spec 4.B consumes this).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPane {
    pub index: u32,
    pub title: String,
}

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, NtmError>> + Send + 'a>>;

/// Capability surface wrapping the external terminal multiplexer (spec
/// 4.A). Every method must reject targets that fail [`Target::parse`]
/// before touching the subprocess command line.
pub trait MultiplexerAdapter: Send + Sync {
    fn create_session<'a>(&'a self, name: &'a str, cwd: &'a str) -> BoxFuture<'a, ()>;

    fn split_window<'a>(
        &'a self,
        session: &'a str,
        direction: SplitDirection,
        cwd: &'a str,
    ) -> BoxFuture<'a, u32>;

    fn list_sessions(&self) -> BoxFuture<'_, Vec<String>>;

    fn list_panes<'a>(&'a self, session: &'a str) -> BoxFuture<'a, Vec<RawPane>>;

    fn set_pane_title<'a>(&'a self, target: &'a Target, title: &'a str) -> BoxFuture<'a, ()>;

    fn select_layout<'a>(&'a self, session: &'a str, layout: &'a str) -> BoxFuture<'a, ()>;

    fn capture_pane<'a>(&'a self, target: &'a Target, max_lines: u32) -> BoxFuture<'a, String>;

    fn send_keys<'a>(
        &'a self,
        target: &'a Target,
        payload: &'a str,
        opts: SendKeysOptions,
    ) -> BoxFuture<'a, ()>;

    fn send_paste_buffer<'a>(&'a self, target: &'a Target, payload: &'a str) -> BoxFuture<'a, ()>;

    fn kill_session<'a>(&'a self, name: &'a str) -> BoxFuture<'a, ()>;

    fn has_session<'a>(&'a self, name: &'a str) -> BoxFuture<'a, bool>;
}
