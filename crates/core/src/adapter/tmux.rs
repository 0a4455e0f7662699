// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Production [`MultiplexerAdapter`] backed by a real `tmux` binary,
//! grounded on the teacher's `TmuxBackend` (subprocess invocation via
//! `tokio::process::Command`, optional `-S <socket>` for an isolated
//! server during tests).

use std::path::PathBuf;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::NtmError;

use super::{MultiplexerAdapter, RawPane, SendKeysOptions, SplitDirection, Target};

/// Adapter that drives a `tmux` subprocess. Bit-exact to the standard tmux
/// CLI grammar (spec 6).
pub struct TmuxAdapter {
    binary: String,
    socket: Option<PathBuf>,
    call_timeout: Duration,
}

impl TmuxAdapter {
    pub fn new(binary: impl Into<String>, call_timeout: Duration) -> Self {
        Self { binary: binary.into(), socket: None, call_timeout }
    }

    /// Address an isolated tmux server instead of the user's default.
    /// Used by integration tests so they never collide with the operator's
    /// session (teacher's `TmuxBackend::with_socket`).
    pub fn with_socket(mut self, socket: PathBuf) -> Self {
        self.socket = Some(socket);
        self
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        if let Some(ref s) = self.socket {
            cmd.arg("-S").arg(s);
        }
        cmd
    }

    async fn run(&self, op: &str, args: &[&str]) -> Result<std::process::Output, NtmError> {
        debug!(op, binary = %self.binary, args = ?args, "tmux invoke");
        let fut = self.cmd().args(args).output();
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(Ok(out)) => Ok(out),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(NtmError::BinaryMissing { binary: self.binary.clone() })
            }
            Ok(Err(e)) => Err(NtmError::IoError { detail: format!("{op}: {e}") }),
            Err(_) => Err(NtmError::Timeout { op: op.to_string(), after_ms: self.call_timeout.as_millis() as u64 }),
        }
    }

    async fn run_checked(&self, op: &str, args: &[&str]) -> Result<(), NtmError> {
        let out = self.run(op, args).await?;
        if !out.status.success() {
            warn!(op, stderr = %String::from_utf8_lossy(&out.stderr), "tmux call failed");
            return Err(NtmError::Internal {
                detail: format!("{op} failed: {}", String::from_utf8_lossy(&out.stderr).trim()),
            });
        }
        Ok(())
    }
}

impl MultiplexerAdapter for TmuxAdapter {
    fn create_session<'a>(
        &'a self,
        name: &'a str,
        cwd: &'a str,
    ) -> super::BoxFuture<'a, ()> {
        Box::pin(async move {
            self.run_checked(
                "create_session",
                &["new-session", "-d", "-s", name, "-c", cwd, "-x", "200", "-y", "50"],
            )
            .await
        })
    }

    fn split_window<'a>(
        &'a self,
        session: &'a str,
        direction: SplitDirection,
        cwd: &'a str,
    ) -> super::BoxFuture<'a, u32> {
        Box::pin(async move {
            let flag = match direction {
                SplitDirection::Horizontal => "-h",
                SplitDirection::Vertical => "-v",
            };
            let out = self
                .run(
                    "split_window",
                    &["split-window", flag, "-t", session, "-c", cwd, "-P", "-F", "#{pane_index}"],
                )
                .await?;
            if !out.status.success() {
                return Err(NtmError::Internal {
                    detail: format!("split-window failed: {}", String::from_utf8_lossy(&out.stderr)),
                });
            }
            String::from_utf8_lossy(&out.stdout)
                .trim()
                .parse::<u32>()
                .map_err(|e| NtmError::Internal { detail: format!("unparseable pane index: {e}") })
        })
    }

    fn list_sessions(&self) -> super::BoxFuture<'_, Vec<String>> {
        Box::pin(async move {
            let out = self.run("list_sessions", &["list-sessions", "-F", "#{session_name}"]).await?;
            if !out.status.success() {
                // No server running at all is not an error: zero sessions.
                return Ok(vec![]);
            }
            Ok(String::from_utf8_lossy(&out.stdout).lines().map(str::to_string).collect())
        })
    }

    fn list_panes<'a>(&'a self, session: &'a str) -> super::BoxFuture<'a, Vec<RawPane>> {
        Box::pin(async move {
            let out = self
                .run(
                    "list_panes",
                    &["list-panes", "-t", session, "-F", "#{pane_index}\t#{pane_title}"],
                )
                .await?;
            if !out.status.success() {
                return Err(NtmError::SessionNotFound { session: session.to_string() });
            }
            let text = String::from_utf8_lossy(&out.stdout);
            let mut panes = Vec::new();
            for line in text.lines() {
                if let Some((idx, title)) = line.split_once('\t') {
                    if let Ok(index) = idx.parse::<u32>() {
                        panes.push(RawPane { index, title: title.to_string() });
                    }
                }
            }
            Ok(panes)
        })
    }

    fn set_pane_title<'a>(&'a self, target: &'a Target, title: &'a str) -> super::BoxFuture<'a, ()> {
        Box::pin(async move {
            let arg = target.as_tmux_arg();
            self.run_checked("set_pane_title", &["select-pane", "-t", &arg, "-T", title]).await
        })
    }

    fn select_layout<'a>(&'a self, session: &'a str, layout: &'a str) -> super::BoxFuture<'a, ()> {
        Box::pin(async move {
            self.run_checked("select_layout", &["select-layout", "-t", session, layout]).await
        })
    }

    fn capture_pane<'a>(&'a self, target: &'a Target, max_lines: u32) -> super::BoxFuture<'a, String> {
        Box::pin(async move {
            let arg = target.as_tmux_arg();
            let start = format!("-{max_lines}");
            let out = self
                .run("capture_pane", &["capture-pane", "-p", "-e", "-t", &arg, "-S", &start])
                .await?;
            if !out.status.success() {
                return Err(NtmError::PaneNotFound {
                    session: target.session().to_string(),
                    pane: target.pane_index().to_string(),
                });
            }
            Ok(String::from_utf8_lossy(&out.stdout).into_owned())
        })
    }

    fn send_keys<'a>(
        &'a self,
        target: &'a Target,
        payload: &'a str,
        opts: SendKeysOptions,
    ) -> super::BoxFuture<'a, ()> {
        Box::pin(async move {
            let arg = target.as_tmux_arg();
            let mut args: Vec<&str> = vec!["send-keys"];
            if opts.literal {
                args.push("-l");
            }
            args.push("-t");
            args.push(&arg);
            args.push(payload);
            if opts.press_enter {
                args.push("Enter");
            }
            self.run_checked("send_keys", &args).await
        })
    }

    fn send_paste_buffer<'a>(&'a self, target: &'a Target, payload: &'a str) -> super::BoxFuture<'a, ()> {
        Box::pin(async move {
            let arg = target.as_tmux_arg();
            self.run_checked("send_paste_buffer", &["send-keys", "-l", "-t", &arg, payload]).await
        })
    }

    fn kill_session<'a>(&'a self, name: &'a str) -> super::BoxFuture<'a, ()> {
        Box::pin(async move { self.run_checked("kill_session", &["kill-session", "-t", name]).await })
    }

    fn has_session<'a>(&'a self, name: &'a str) -> super::BoxFuture<'a, bool> {
        Box::pin(async move {
            let out = self.run("has_session", &["has-session", "-t", name]).await?;
            Ok(out.status.success())
        })
    }
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
